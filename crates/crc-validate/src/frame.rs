//! Violating-row tables.
//!
//! Rules copy the rows they flag into a [`RowTable`] of loosely typed
//! [`Value`]s; [`RowTable::to_frame`] turns it into a polars `DataFrame` once
//! the rule is done. Column types are inferred per column from the first
//! non-null value, and a column mixing types falls back to text.

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use crc_model::{
    Coding, Condition, DiagnosticProcedure, DrugExposure, EntityId, EntityKind, Patient,
    RecurrenceObservation, RegistryError, ResponseObservation, Result, Specimen, Stored,
    SubjectKey, Surgery, Therapy, TimeObservation, Tnm,
};

/// One cell of a violating-row table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text form used for CSV cells and duplicate detection.
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(text) => Some(text.clone()),
            Self::Int(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Bool(value) => Some(value.to_string()),
            Self::Date(date) => Some(date.to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::Null, Self::Int)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Self::Float(value)
        } else {
            Self::Null
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

fn code(coding: Option<&Coding>) -> Value {
    coding.map(|c| c.code.as_str()).into()
}

fn display(coding: Option<&Coding>) -> Value {
    coding.map(|c| c.display.as_str()).into()
}

/// An entity that can be flattened into table columns.
pub trait TableRow {
    const COLUMNS: &'static [&'static str];

    fn values(&self) -> Vec<Value>;
}

impl TableRow for Patient {
    const COLUMNS: &'static [&'static str] =
        &["identifier", "sex", "birth_year", "deceased", "deceased_at"];

    fn values(&self) -> Vec<Value> {
        vec![
            self.identifier.as_deref().into(),
            self.sex.as_deref().into(),
            self.birth_year.into(),
            self.deceased.into(),
            self.deceased_at.into(),
        ]
    }
}

impl TableRow for Condition {
    const COLUMNS: &'static [&'static str] =
        &["code", "display", "localization", "diagnosis_date"];

    fn values(&self) -> Vec<Value> {
        vec![
            code(self.code.as_ref()),
            display(self.code.as_ref()),
            self.localization.as_deref().into(),
            self.diagnosis_date.into(),
        ]
    }
}

impl TableRow for Specimen {
    const COLUMNS: &'static [&'static str] = &[
        "identifier",
        "material",
        "preservation",
        "kind_code",
        "kind_display",
        "collection_year",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            self.identifier.as_deref().into(),
            self.material.as_deref().into(),
            self.preservation.as_deref().into(),
            code(self.kind.as_ref()),
            display(self.kind.as_ref()),
            self.collection_year.into(),
        ]
    }
}

impl TableRow for Surgery {
    const COLUMNS: &'static [&'static str] = &[
        "start",
        "type_source",
        "type_code",
        "type_display",
        "radicality_code",
        "radicality_display",
        "body_site_code",
        "body_site_display",
        "note",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            self.start.into(),
            self.type_source.as_deref().into(),
            code(self.surgery_type.as_ref()),
            display(self.surgery_type.as_ref()),
            code(self.radicality.as_ref()),
            display(self.radicality.as_ref()),
            code(self.body_site.as_ref()),
            display(self.body_site.as_ref()),
            self.note.as_deref().into(),
        ]
    }
}

impl TableRow for Therapy {
    const COLUMNS: &'static [&'static str] = &["start", "end"];

    fn values(&self) -> Vec<Value> {
        vec![self.start.into(), self.end.into()]
    }
}

impl TableRow for DrugExposure {
    const COLUMNS: &'static [&'static str] = &["concept_id", "source_value", "start", "end"];

    fn values(&self) -> Vec<Value> {
        vec![
            self.concept_id.into(),
            self.source_value.as_deref().into(),
            self.start.into(),
            self.end.into(),
        ]
    }
}

impl TableRow for ResponseObservation {
    const COLUMNS: &'static [&'static str] = &["code", "display", "date"];

    fn values(&self) -> Vec<Value> {
        vec![
            code(self.response.as_ref()),
            display(self.response.as_ref()),
            self.date.into(),
        ]
    }
}

impl TableRow for TimeObservation {
    const COLUMNS: &'static [&'static str] = &["overall_survival_weeks", "last_update"];

    fn values(&self) -> Vec<Value> {
        vec![self.overall_survival_weeks.into(), self.last_update.into()]
    }
}

impl TableRow for RecurrenceObservation {
    const COLUMNS: &'static [&'static str] = &["weeks"];

    fn values(&self) -> Vec<Value> {
        vec![self.weeks.into()]
    }
}

impl TableRow for Tnm {
    const COLUMNS: &'static [&'static str] = &[
        "t",
        "n",
        "m",
        "stage",
        "computed_stage",
        "edition_code",
        "edition_display",
        "grade",
        "morphology",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            code(self.t.as_ref()),
            code(self.n.as_ref()),
            code(self.m.as_ref()),
            code(self.stage.as_ref()),
            self.computed_stage.as_deref().into(),
            code(self.edition.as_ref()),
            display(self.edition.as_ref()),
            display(self.grade.as_ref()),
            display(self.morphology.as_ref()),
        ]
    }
}

impl TableRow for DiagnosticProcedure {
    const COLUMNS: &'static [&'static str] = &["concept_id", "label", "date"];

    fn values(&self) -> Vec<Value> {
        vec![
            self.concept_id.into(),
            self.label.as_str().into(),
            self.date.into(),
        ]
    }
}

/// Column layout of a rule's row table: the subject key, then the columns of
/// every joined entity prefixed by its kind, then computed columns.
#[derive(Debug, Clone)]
pub struct RowSchema {
    columns: Vec<String>,
}

impl Default for RowSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSchema {
    pub fn new() -> Self {
        Self {
            columns: vec!["subject".to_string()],
        }
    }

    #[must_use]
    pub fn entity<T: TableRow>(self, kind: EntityKind) -> Self {
        self.record(kind, T::COLUMNS)
    }

    /// Id and attribute columns of `kind`, for rows whose type is only known
    /// at run time.
    #[must_use]
    pub fn record(mut self, kind: EntityKind, columns: &[&str]) -> Self {
        let prefix = kind.name();
        self.columns.push(format!("{prefix}_id"));
        self.columns
            .extend(columns.iter().map(|column| format!("{prefix}_{column}")));
        self
    }

    #[must_use]
    pub fn computed(mut self, name: &str) -> Self {
        self.columns.push(name.to_string());
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn table(self) -> RowTable {
        RowTable::new(self.columns)
    }
}

/// Builds one row in [`RowSchema`] order.
#[derive(Debug, Clone)]
pub struct RowBuilder {
    values: Vec<Value>,
}

impl RowBuilder {
    pub fn new(subject: &SubjectKey) -> Self {
        Self {
            values: vec![Value::Text(subject.to_string())],
        }
    }

    /// Appends an entity's id and columns, or nulls when the join found none.
    #[must_use]
    pub fn entity<T: TableRow>(mut self, row: Option<&Stored<T>>) -> Self {
        match row {
            Some(row) => {
                self.values.push(Value::Text(row.id.to_string()));
                self.values.extend(row.record.values());
            }
            None => {
                self.values
                    .extend(std::iter::repeat_n(Value::Null, T::COLUMNS.len() + 1));
            }
        }
        self
    }

    /// Appends an already flattened entity.
    #[must_use]
    pub fn record(mut self, id: &EntityId, values: Vec<Value>) -> Self {
        self.values.push(Value::Text(id.to_string()));
        self.values.extend(values);
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    pub fn finish(self) -> Vec<Value> {
        self.values
    }
}

/// Rows collected by a rule before conversion to a `DataFrame`.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

#[derive(Clone, Copy, PartialEq)]
enum ColumnType {
    Text,
    Int,
    Float,
    Bool,
}

fn infer_type<'a>(mut cells: impl Iterator<Item = &'a Value>) -> ColumnType {
    let mut inferred = None;
    for cell in cells.by_ref() {
        let kind = match cell {
            Value::Null => continue,
            Value::Int(_) => ColumnType::Int,
            Value::Float(_) => ColumnType::Float,
            Value::Bool(_) => ColumnType::Bool,
            Value::Text(_) | Value::Date(_) => ColumnType::Text,
        };
        match inferred {
            None => inferred = Some(kind),
            Some(ColumnType::Int) if kind == ColumnType::Float => {
                inferred = Some(ColumnType::Float);
            }
            Some(ColumnType::Float) if kind == ColumnType::Int => {}
            Some(existing) if existing != kind => return ColumnType::Text,
            Some(_) => {}
        }
    }
    inferred.unwrap_or(ColumnType::Text)
}

impl RowTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_columns(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(|column| (*column).to_string()).collect())
    }

    /// Appends a row; its width must match the column count.
    pub fn push(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(RegistryError::Frame(format!(
                "row has {} values but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn cells(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows
            .iter()
            .map(move |row| row.get(index).unwrap_or(&Value::Null))
    }

    fn column(&self, index: usize, name: &str) -> Column {
        let series = match infer_type(self.cells(index)) {
            ColumnType::Int => {
                let values: Vec<Option<i64>> = self
                    .cells(index)
                    .map(|cell| match cell {
                        Value::Int(value) => Some(*value),
                        _ => None,
                    })
                    .collect();
                Series::new(name.into(), values)
            }
            ColumnType::Float => {
                let values: Vec<Option<f64>> = self
                    .cells(index)
                    .map(|cell| match cell {
                        Value::Float(value) => Some(*value),
                        Value::Int(value) => Some(*value as f64),
                        _ => None,
                    })
                    .collect();
                Series::new(name.into(), values)
            }
            ColumnType::Bool => {
                let values: Vec<Option<bool>> = self
                    .cells(index)
                    .map(|cell| match cell {
                        Value::Bool(value) => Some(*value),
                        _ => None,
                    })
                    .collect();
                Series::new(name.into(), values)
            }
            ColumnType::Text => {
                let values: Vec<Option<String>> =
                    self.cells(index).map(Value::render).collect();
                Series::new(name.into(), values)
            }
        };
        series.into()
    }

    /// Converts the collected rows into a polars `DataFrame`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, name)| self.column(index, name))
            .collect();
        DataFrame::new(columns).map_err(|error| RegistryError::Frame(error.to_string()))
    }
}
