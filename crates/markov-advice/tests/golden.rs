//! Advice computed against the bundled heart-failure model.

use std::fs;

use markov_advice::{AdviceError, AdviceRequest, AdviceService, BnInput, Grade, Syncope};

const MODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/aid-hf.json");

fn service() -> AdviceService {
    AdviceService::new(MODEL)
}

#[test]
fn mixed_symptoms_call_for_contact_within_a_day() {
    let input = BnInput {
        orthopnea: Grade::Grade2,
        cough: Grade::Grade1,
        edema: Grade::Grade0,
        dizziness: Grade::Grade3,
        syncope: Syncope::Presyncope,
    };
    assert_eq!(
        service().calculate_advice(&input).unwrap(),
        "Contact your heart failure nurse within 24 hours."
    );
}

#[test]
fn no_symptoms_need_no_action() {
    let input = BnInput {
        orthopnea: Grade::Grade0,
        cough: Grade::Grade0,
        edema: Grade::Grade0,
        dizziness: Grade::Grade0,
        syncope: Syncope::None,
    };
    assert_eq!(
        service().calculate_advice(&input).unwrap(),
        "No action needed. Continue your current treatment."
    );
}

#[test]
fn severe_symptoms_call_for_contact_today() {
    let request = AdviceRequest::from_json(
        r#"{"orthopnea": "GRADE_3", "cough": "GRADE_3", "edema": "GRADE_3",
            "dizziness": "GRADE_3", "syncope": "SYNCOPE"}"#,
    )
    .unwrap();
    assert_eq!(
        service().advise(&request).unwrap(),
        "Contact your heart failure nurse today."
    );
}

#[test]
fn invalid_request_never_reaches_the_model() {
    let missing = AdviceService::new("/nonexistent/model.json");
    let request = AdviceRequest::from_json(r#"{"orthopnea": "GRADE_1"}"#).unwrap();
    match missing.advise(&request) {
        Err(AdviceError::Validation(errors)) => assert_eq!(errors.len(), 4),
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn missing_model_is_an_internal_error() {
    let missing = AdviceService::new("/nonexistent/model.json");
    let input = BnInput {
        orthopnea: Grade::Grade1,
        cough: Grade::Grade1,
        edema: Grade::Grade1,
        dizziness: Grade::Grade1,
        syncope: Syncope::None,
    };
    assert_eq!(missing.calculate_advice(&input), Err(AdviceError::Internal));
}

#[test]
fn model_without_the_finding_nodes_is_an_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(
        &path,
        r#"{"formatVersion": "1.0.0",
            "network": {"name": "empty", "type": "InfluenceDiagram", "variables": []}}"#,
    )
    .unwrap();
    let input = BnInput {
        orthopnea: Grade::Grade0,
        cough: Grade::Grade0,
        edema: Grade::Grade0,
        dizziness: Grade::Grade0,
        syncope: Syncope::None,
    };
    assert_eq!(
        AdviceService::new(&path).calculate_advice(&input),
        Err(AdviceError::Internal)
    );
}
