//! Flat CSV export of the entity tables.
//!
//! One `<kind>.csv` per entity kind, with the assigned `id` and `subject`
//! keys followed by the entity's attribute columns. Coded values take two
//! columns, one for the code and one for the display.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crc_model::{EntityKind, EntityTables, Stored};
use crc_validate::Value;
use crc_validate::frame::TableRow;

/// One written entity table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedTable {
    pub kind: EntityKind,
    pub path: PathBuf,
    pub rows: usize,
}

fn write_table<T: TableRow>(
    dir: &Path,
    kind: EntityKind,
    table: &[Stored<T>],
) -> Result<ExportedTable> {
    let path = dir.join(format!("{}.csv", kind.name()));
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("create {}", path.display()))?;

    let mut header = vec!["id", "subject"];
    header.extend_from_slice(T::COLUMNS);
    writer
        .write_record(&header)
        .with_context(|| format!("write {}", path.display()))?;

    for row in table {
        let mut record: Vec<Option<String>> = Vec::with_capacity(header.len());
        record.push(Some(row.id.to_string()));
        record.push(Some(row.subject.to_string()));
        record.extend(row.record.values().iter().map(Value::render));
        writer
            .serialize(&record)
            .with_context(|| format!("write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;

    tracing::debug!(kind = kind.name(), rows = table.len(), "entity table exported");
    Ok(ExportedTable {
        kind,
        path,
        rows: table.len(),
    })
}

/// Writes every entity table under `dir`, in [`EntityKind::all`] order.
pub fn export_entities(dir: &Path, tables: &EntityTables) -> Result<Vec<ExportedTable>> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut exported = Vec::with_capacity(EntityKind::all().len());
    for kind in EntityKind::all() {
        let table = match kind {
            EntityKind::Patient => write_table(dir, *kind, &tables.patients),
            EntityKind::Condition => write_table(dir, *kind, &tables.conditions),
            EntityKind::Specimen => write_table(dir, *kind, &tables.specimens),
            EntityKind::Surgery => write_table(dir, *kind, &tables.surgeries),
            EntityKind::RadiationTherapy => write_table(dir, *kind, &tables.radiation_therapies),
            EntityKind::TargetedTherapy => write_table(dir, *kind, &tables.targeted_therapies),
            EntityKind::Pharmacotherapy => write_table(dir, *kind, &tables.drug_exposures),
            EntityKind::Response => write_table(dir, *kind, &tables.responses),
            EntityKind::TimeObservation => write_table(dir, *kind, &tables.time_observations),
            EntityKind::Recurrence => write_table(dir, *kind, &tables.recurrences),
            EntityKind::Tnm => write_table(dir, *kind, &tables.tnms),
            EntityKind::DiagnosticProcedure => {
                write_table(dir, *kind, &tables.diagnostic_procedures)
            }
        }?;
        exported.push(table);
    }
    tracing::info!(
        tables = exported.len(),
        entities = tables.total_entities(),
        dir = %dir.display(),
        "entity tables exported"
    );
    Ok(exported)
}
