//! Form layouts of the registry export.
//!
//! Each layout lists the data elements of a form in their accepted order,
//! with the human-readable `name` label each element must carry.

/// One data element of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub element: &'static str,
    pub label: &'static str,
}

const fn field(element: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { element, label }
}

/// A form element, its expected `name` attribute, and its ordered fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLayout {
    pub form_element: &'static str,
    pub form_name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FormLayout {
    pub fn field(&self, element: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.element == element)
    }
}

/// Patient form data elements.
pub mod patient {
    pub const DIAGNOSIS_DATE: &str = "Dataelement_51_3";
    pub const LAST_UPDATE: &str = "Dataelement_6_3";
    pub const VITAL_STATUS: &str = "Dataelement_5_2";
    pub const OVERALL_SURVIVAL: &str = "Dataelement_7_2";
    pub const SEX: &str = "Dataelement_85_1";
    pub const AGE_AT_DIAGNOSIS: &str = "Dataelement_3_1";
    pub const LIVER_IMAGING: &str = "Dataelement_61_5";
    pub const CT: &str = "Dataelement_31_3";
    pub const COLONOSCOPY: &str = "Dataelement_88_1";
    pub const LUNG_IMAGING: &str = "Dataelement_63_4";
    pub const MRI: &str = "Dataelement_30_3";
    pub const TIME_OF_RECURRENCE: &str = "Dataelement_4_3";

    /// Elements reporting diagnostic procedures.
    pub const DIAGNOSTICS: &[&str] = &[LIVER_IMAGING, CT, COLONOSCOPY, LUNG_IMAGING, MRI];
}

pub mod surgery {
    pub const WEEKS: &str = "Dataelement_8_3";
    pub const TYPE: &str = "Dataelement_49_1";
    pub const OTHER_TYPE: &str = "Dataelement_67_1";
    pub const RADICALITY: &str = "Dataelement_9_2";
    pub const LOCATION: &str = "Dataelement_93_1";
}

pub mod sample {
    pub const ID: &str = "Dataelement_56_2";
    pub const MATERIAL: &str = "Dataelement_54_2";
    pub const PRESERVATION: &str = "Dataelement_55_2";
    pub const YEAR: &str = "Dataelement_89_3";
}

pub mod histopathology {
    pub const METASTASIS: &str = "Dataelement_75_1";
    pub const GRADE: &str = "Dataelement_83_1";
    pub const STAGE: &str = "Dataelement_70_2";
    pub const LOCALIZATION: &str = "Dataelement_92_1";
    pub const UICC_VERSION: &str = "Dataelement_73_3";
    pub const PRIMARY_TUMOR: &str = "Dataelement_71_1";
    pub const LYMPH_NODES: &str = "Dataelement_77_1";
    pub const MORPHOLOGY: &str = "Dataelement_91_1";
}

pub mod pharmacotherapy {
    pub const START_WEEK: &str = "Dataelement_10_2";
    pub const END_WEEK: &str = "Dataelement_11_2";
    pub const SCHEME: &str = "Dataelement_59_5";
    pub const OTHER_SCHEME: &str = "Dataelement_81_3";
}

pub mod response {
    pub const RESPONSE: &str = "Dataelement_33_1";
    pub const WEEKS: &str = "Dataelement_34_1";
}

pub mod radiation {
    pub const START_WEEK: &str = "Dataelement_12_4";
    pub const END_WEEK: &str = "Dataelement_13_2";
}

pub mod targeted {
    pub const START_WEEK: &str = "Dataelement_35_3";
    pub const END_WEEK: &str = "Dataelement_36_1";
}

const PATIENT_HEAD: [FieldSpec; 21] = [
    field(patient::DIAGNOSIS_DATE, "Date of diagnosis"),
    field("Dataelement_2_2", "Participation in clinical study"),
    field(patient::LAST_UPDATE, "Timestamp of last update of vital status"),
    field(patient::VITAL_STATUS, "Vital status"),
    field(patient::OVERALL_SURVIVAL, "Overall survival status"),
    field(patient::SEX, "Biological sex"),
    field(patient::AGE_AT_DIAGNOSIS, "Age at diagnosis (rounded to years)"),
    field(patient::LIVER_IMAGING, "Liver imaging"),
    field(patient::CT, "CT"),
    field(patient::COLONOSCOPY, "Colonoscopy"),
    field(patient::LUNG_IMAGING, "Lung imaging"),
    field(patient::MRI, "MRI"),
    field("Dataelement_20_3", "KRAS exon 2 (codons 12 or 13)"),
    field("Dataelement_21_5", "KRAS exon 3 (codons 59 or 61)"),
    field(
        "Dataelement_22_4",
        "KRAS exon 4 (codons 117 or 146) mutation status",
    ),
    field("Dataelement_87_1", "BRAF, PIC3CA, HER2 mutation status"),
    field("Dataelement_23_5", "NRAS exon 2 (codons 12 or 13)"),
    field("Dataelement_24_4", "NRAS exon 3 (codons 59 or 61)"),
    field("Dataelement_25_3", "NRAS exon 4 (codons 117 or 146)"),
    field("Dataelement_14_3", "Microsatellite instability"),
    field("Dataelement_15_2", "Mismatch repair gene expression"),
];

const RISK_SITUATION: FieldSpec = field("Dataelement_16_3", "Risk situation (only HNPCC)");
const RECURRENCE: FieldSpec = field(
    patient::TIME_OF_RECURRENCE,
    "Time of recurrence (metastasis diagnosis)",
);

const fn patient_fields<const N: usize>(tail: &[FieldSpec]) -> [FieldSpec; N] {
    let mut fields = [RISK_SITUATION; N];
    let mut index = 0;
    while index < PATIENT_HEAD.len() {
        fields[index] = PATIENT_HEAD[index];
        index += 1;
    }
    let mut offset = 0;
    while offset < tail.len() {
        fields[PATIENT_HEAD.len() + offset] = tail[offset];
        offset += 1;
    }
    fields
}

const PATIENT_FIELDS: [FieldSpec; 22] = patient_fields(&[RISK_SITUATION]);
const PATIENT_FIELDS_WITH_RECURRENCE: [FieldSpec; 23] =
    patient_fields(&[RECURRENCE, RISK_SITUATION]);

/// Patient form without the time-of-recurrence field.
pub const PATIENT_FORM: FormLayout = FormLayout {
    form_element: "Form",
    form_name: "form_28_ver-27",
    fields: &PATIENT_FIELDS,
};

/// Patient form with the time-of-recurrence field just before the HNPCC
/// risk situation.
pub const PATIENT_FORM_WITH_RECURRENCE: FormLayout = FormLayout {
    form_element: "Form",
    form_name: "form_28_ver-27",
    fields: &PATIENT_FIELDS_WITH_RECURRENCE,
};

/// Accepted patient form layouts.
pub const PATIENT_FORMS: &[FormLayout] = &[PATIENT_FORM, PATIENT_FORM_WITH_RECURRENCE];

pub const SURGERY_FORM: FormLayout = FormLayout {
    form_element: "Form",
    form_name: "form_32_ver-8",
    fields: &[
        field(
            surgery::WEEKS,
            "Time difference between initial diagnosis and surgery",
        ),
        field(surgery::TYPE, "Surgery type"),
        field(surgery::OTHER_TYPE, "Other surgery type"),
        field(surgery::RADICALITY, "Surgery radicality"),
        field(surgery::LOCATION, "Location of the tumor"),
    ],
};

pub const SAMPLE_FORM: FormLayout = FormLayout {
    form_element: "Form1",
    form_name: "form_35_ver-6",
    fields: &[
        field(sample::ID, "Sample ID"),
        field(sample::MATERIAL, "Material type"),
        field(sample::PRESERVATION, "Preservation mode"),
        field(sample::YEAR, "Year of sample collection"),
    ],
};

pub const HISTOPATHOLOGY_FORM: FormLayout = FormLayout {
    form_element: "Form2",
    form_name: "form_34_ver-22",
    fields: &[
        field(histopathology::METASTASIS, "Distant metastasis"),
        field(histopathology::GRADE, "Grade"),
        field(histopathology::STAGE, "Stage"),
        field(histopathology::LOCALIZATION, "Localization of primary tumor"),
        field(histopathology::UICC_VERSION, "UICC version"),
        field("Dataelement_53_3", "WHO version"),
        field(histopathology::PRIMARY_TUMOR, "Primary Tumor"),
        field(histopathology::LYMPH_NODES, "Regional lymph nodes"),
        field(histopathology::MORPHOLOGY, "Morphology"),
        field("Dataelement_57_3", "Availability digital imaging"),
        field(
            "Dataelement_58_2",
            "Availability invasion front digital imaging",
        ),
        field(
            "Dataelement_82_1",
            "Biological material from recurrence available",
        ),
        field("Dataelement_68_2", "Localization of metastasis"),
    ],
};

pub const PHARMACOTHERAPY_FORM: FormLayout = FormLayout {
    form_element: "Form3",
    form_name: "form_33_ver-10",
    fields: &[
        field(
            pharmacotherapy::START_WEEK,
            "Date of start of pharamacotherapy",
        ),
        field(pharmacotherapy::END_WEEK, "Date of end of pharamcotherapy"),
        field(pharmacotherapy::SCHEME, "Scheme of pharmacotherapy"),
        field(pharmacotherapy::OTHER_SCHEME, "Other pharmacotherapy scheme"),
    ],
};

pub const RESPONSE_FORM: FormLayout = FormLayout {
    form_element: "Form4",
    form_name: "form_31_ver-2",
    fields: &[
        field(response::RESPONSE, "Specific response"),
        field(
            response::WEEKS,
            "Date response was obtained in weeks since initial diagnosis",
        ),
    ],
};

pub const RADIATION_FORM: FormLayout = FormLayout {
    form_element: "Form5",
    form_name: "form_29_ver-5",
    fields: &[
        field(radiation::START_WEEK, "Date of start of radiation therapy"),
        field(radiation::END_WEEK, "Date of end of radiation therapy"),
    ],
};

pub const TARGETED_FORM: FormLayout = FormLayout {
    form_element: "Form6",
    form_name: "form_30_ver-3",
    fields: &[
        field(targeted::START_WEEK, "Date of start of targeted therapy"),
        field(targeted::END_WEEK, "Date of end of targeted therapy"),
    ],
};
