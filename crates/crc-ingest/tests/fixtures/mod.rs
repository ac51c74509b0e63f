//! Registry export fragments shared by the ingestion tests.

#![allow(dead_code)]

pub const NS: &str = "http://registry.samply.de/schemata/import_v1";

pub fn data(id: &str, label: &str, value: &str) -> String {
    format!(r#"<Dataelement_{id} name="{label}">{value}</Dataelement_{id}>"#)
}

pub fn event(eventtype: &str, form_element: &str, form_name: &str, fields: &[String]) -> String {
    format!(
        r#"<Event name="{eventtype} 1" eventtype="{eventtype}"><LogitudinalData><{form_element} name="{form_name}">{}</{form_element}></LogitudinalData></Event>"#,
        fields.concat()
    )
}

pub fn patient(identifier: &str, form: &[String], events: &[String]) -> String {
    format!(
        r#"<BHPatient><Identifier>{identifier}</Identifier><Locations><Location name="Biobank"><BasicData><Form name="form_28_ver-27">{}</Form></BasicData><Events>{}</Events></Location></Locations></BHPatient>"#,
        form.concat(),
        events.concat()
    )
}

pub fn document(patients: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><BHImport xmlns="{NS}"><Mdr><URL>https://mdr.example.org</URL><Namespace>colorectal</Namespace></Mdr>{}</BHImport>"#,
        patients.concat()
    )
}

/// Patient form; `recurrence` adds the time-of-recurrence element.
pub fn patient_form(recurrence: Option<&str>) -> Vec<String> {
    let mut form = vec![
        data("51_3", "Date of diagnosis", "2020-01-15"),
        data("6_3", "Timestamp of last update of vital status", "2022-01-15"),
        data("5_2", "Vital status", "DEATH"),
        data("7_2", "Overall survival status", "104"),
        data("85_1", "Biological sex", "female"),
        data("3_1", "Age at diagnosis (rounded to years)", "60"),
        data("61_5", "Liver imaging", "Liver imaging - Done"),
        data("31_3", "CT", "CT - Not done"),
    ];
    if let Some(weeks) = recurrence {
        form.push(data(
            "4_3",
            "Time of recurrence (metastasis diagnosis)",
            weeks,
        ));
    }
    form.push(data("16_3", "Risk situation (only HNPCC)", "Never"));
    form
}

pub fn surgery_event(surgery_type: &str, location: &str) -> String {
    event(
        "Surgery",
        "Form",
        "form_32_ver-8",
        &[
            data(
                "8_3",
                "Time difference between initial diagnosis and surgery",
                "2",
            ),
            data("49_1", "Surgery type", surgery_type),
            data("9_2", "Surgery radicality", "R0"),
            data("93_1", "Location of the tumor", location),
        ],
    )
}

pub fn sample_event() -> String {
    event(
        "Sample",
        "Form1",
        "form_35_ver-6",
        &[
            data("56_2", "Sample ID", "S-001"),
            data("54_2", "Material type", "Tumor"),
            data("55_2", "Preservation mode", "FFPE"),
            data("89_3", "Year of sample collection", "2020"),
        ],
    )
}

pub fn histopathology_event() -> String {
    event(
        "Histopathology",
        "Form2",
        "form_34_ver-22",
        &[
            data("75_1", "Distant metastasis", "Distant metastasis - M0"),
            data("83_1", "Grade", "Grade G2"),
            data("70_2", "Stage", "Stage - IIA"),
            data("92_1", "Localization of primary tumor", "Sigmoid colon - C18.7"),
            data("73_3", "UICC version", "UICC 7th edition"),
            data("71_1", "Primary Tumor", "Primary Tumor - T3"),
            data("77_1", "Regional lymph nodes", "Regional lymph nodes - N0"),
            data("91_1", "Morphology", "Adenocarcinoma"),
        ],
    )
}

pub fn pharmacotherapy_event() -> String {
    event(
        "Pharmacotherapy",
        "Form3",
        "form_33_ver-10",
        &[
            data("10_2", "Date of start of pharamacotherapy", "4"),
            data("11_2", "Date of end of pharamcotherapy", "20"),
            data("59_5", "Scheme of pharmacotherapy", "Other"),
            data("81_3", "Other pharmacotherapy scheme", "Capecitabine mono"),
        ],
    )
}

pub fn response_event() -> String {
    event(
        "Response to therapy",
        "Form4",
        "form_31_ver-2",
        &[
            data(
                "33_1",
                "Specific response",
                "Specific response - Complete response",
            ),
            data(
                "34_1",
                "Date response was obtained in weeks since initial diagnosis",
                "30",
            ),
        ],
    )
}

pub fn radiation_event() -> String {
    event(
        "Radiation therapy",
        "Form5",
        "form_29_ver-5",
        &[
            data("12_4", "Date of start of radiation therapy", "1"),
            data("13_2", "Date of end of radiation therapy", "5"),
        ],
    )
}

pub fn targeted_event(end_week: &str) -> String {
    event(
        "Targeted Therapy",
        "Form6",
        "form_30_ver-3",
        &[
            data("35_3", "Date of start of targeted therapy", "6"),
            data("36_1", "Date of end of targeted therapy", end_week),
        ],
    )
}

/// A patient with one event of every kind.
pub fn full_patient(identifier: &str, recurrence: Option<&str>) -> String {
    patient(
        identifier,
        &patient_form(recurrence),
        &[
            surgery_event("Sigmoid colectomy", "Sigmoid colon - C18.7"),
            sample_event(),
            histopathology_event(),
            pharmacotherapy_event(),
            response_event(),
            radiation_event(),
            targeted_event("not recorded"),
        ],
    )
}
