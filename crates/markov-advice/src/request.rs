//! Advice requests and their validation.
//!
//! A request carries five findings as loosely typed JSON. Every field is
//! validated on its own so a caller learns about all bad fields at once.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::AdviceError;

/// Symptom severity on a 0 to 3 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    Grade0,
    Grade1,
    Grade2,
    Grade3,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Grade0, Grade::Grade1, Grade::Grade2, Grade::Grade3];

    /// Request spelling, e.g. `GRADE_2`.
    pub fn name(&self) -> &'static str {
        match self {
            Grade::Grade0 => "GRADE_0",
            Grade::Grade1 => "GRADE_1",
            Grade::Grade2 => "GRADE_2",
            Grade::Grade3 => "GRADE_3",
        }
    }

    /// Label of the matching state in the model.
    pub fn state(&self) -> &'static str {
        match self {
            Grade::Grade0 => "0",
            Grade::Grade1 => "1",
            Grade::Grade2 => "2",
            Grade::Grade3 => "3",
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n
                .as_u64()
                .and_then(|i| Self::ALL.get(usize::try_from(i).ok()?).copied()),
            _ => None,
        }
    }
}

impl FromStr for Grade {
    type Err = String;

    /// Accepts the request spelling or the bare digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.name() == s || g.state() == s)
            .ok_or_else(|| format!("unknown grade '{s}'"))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the patient fainted or nearly fainted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syncope {
    None,
    Presyncope,
    Syncope,
}

impl Syncope {
    pub const ALL: [Syncope; 3] = [Syncope::None, Syncope::Presyncope, Syncope::Syncope];

    pub fn name(&self) -> &'static str {
        match self {
            Syncope::None => "NONE",
            Syncope::Presyncope => "PRESYNCOPE",
            Syncope::Syncope => "SYNCOPE",
        }
    }

    pub fn state(&self) -> &'static str {
        match self {
            Syncope::None => "none",
            Syncope::Presyncope => "presyncope",
            Syncope::Syncope => "syncope",
        }
    }
}

impl FromStr for Syncope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s || c.state() == s)
            .ok_or_else(|| format!("unknown syncope category '{s}'"))
    }
}

impl fmt::Display for Syncope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Model node names of the five findings.
pub const ORTHOPNEA: &str = "Orthopnea";
pub const COUGH: &str = "Cough";
pub const EDEMA: &str = "Edema";
pub const DIZZINESS: &str = "Dizziness";
pub const SYNCOPE: &str = "Syncope";

/// A validated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BnInput {
    pub orthopnea: Grade,
    pub cough: Grade,
    pub edema: Grade,
    pub dizziness: Grade,
    pub syncope: Syncope,
}

impl BnInput {
    /// `(node, state)` pairs to enter as evidence.
    pub fn findings(&self) -> [(&'static str, &'static str); 5] {
        [
            (ORTHOPNEA, self.orthopnea.state()),
            (COUGH, self.cough.state()),
            (EDEMA, self.edema.state()),
            (DIZZINESS, self.dizziness.state()),
            (SYNCOPE, self.syncope.state()),
        ]
    }
}

/// A request as received, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AdviceRequest {
    #[serde(default)]
    pub orthopnea: Option<Value>,
    #[serde(default)]
    pub cough: Option<Value>,
    #[serde(default)]
    pub edema: Option<Value>,
    #[serde(default)]
    pub dizziness: Option<Value>,
    #[serde(default)]
    pub syncope: Option<Value>,
}

const NOT_NULL: &str = "must not be null";

impl AdviceRequest {
    /// Parse a JSON body. A body that is not a JSON object is reported
    /// against the `body` field.
    pub fn from_json(json: &str) -> Result<Self, AdviceError> {
        serde_json::from_str(json).map_err(|e| {
            let mut errors = BTreeMap::new();
            errors.insert("body".to_string(), format!("is not a valid request: {e}"));
            warn!(?errors, "rejected malformed advice request");
            AdviceError::Validation(errors)
        })
    }

    /// Check every field, collecting one message per bad field.
    pub fn validate(&self) -> Result<BnInput, AdviceError> {
        let mut errors = BTreeMap::new();
        let orthopnea = grade_field(&mut errors, "orthopnea", &self.orthopnea);
        let cough = grade_field(&mut errors, "cough", &self.cough);
        let edema = grade_field(&mut errors, "edema", &self.edema);
        let dizziness = grade_field(&mut errors, "dizziness", &self.dizziness);
        let syncope = syncope_field(&mut errors, &self.syncope);

        match (orthopnea, cough, edema, dizziness, syncope) {
            (Some(orthopnea), Some(cough), Some(edema), Some(dizziness), Some(syncope))
                if errors.is_empty() =>
            {
                Ok(BnInput {
                    orthopnea,
                    cough,
                    edema,
                    dizziness,
                    syncope,
                })
            }
            _ => {
                warn!(?errors, "advice request failed validation");
                Err(AdviceError::Validation(errors))
            }
        }
    }
}

fn grade_field(
    errors: &mut BTreeMap<String, String>,
    field: &str,
    value: &Option<Value>,
) -> Option<Grade> {
    match value {
        None | Some(Value::Null) => {
            errors.insert(field.to_string(), NOT_NULL.to_string());
            None
        }
        Some(value) => {
            let grade = Grade::from_value(value);
            if grade.is_none() {
                errors.insert(
                    field.to_string(),
                    format!("has invalid value {value}; expected one of GRADE_0, GRADE_1, GRADE_2, GRADE_3"),
                );
            }
            grade
        }
    }
}

fn syncope_field(errors: &mut BTreeMap<String, String>, value: &Option<Value>) -> Option<Syncope> {
    match value {
        None | Some(Value::Null) => {
            errors.insert("syncope".to_string(), NOT_NULL.to_string());
            None
        }
        Some(value) => {
            let category = value.as_str().and_then(|s| s.parse().ok());
            if category.is_none() {
                errors.insert(
                    "syncope".to_string(),
                    format!("has invalid value {value}; expected one of NONE, PRESYNCOPE, SYNCOPE"),
                );
            }
            category
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_request_validates() {
        let request = AdviceRequest::from_json(
            r#"{"orthopnea": "GRADE_2", "cough": 1, "edema": "0",
                "dizziness": "GRADE_3", "syncope": "PRESYNCOPE"}"#,
        )
        .unwrap();
        let input = request.validate().unwrap();
        assert_eq!(
            input.findings(),
            [
                ("Orthopnea", "2"),
                ("Cough", "1"),
                ("Edema", "0"),
                ("Dizziness", "3"),
                ("Syncope", "presyncope"),
            ]
        );
    }

    #[test]
    fn every_bad_field_is_reported() {
        let request =
            AdviceRequest::from_json(r#"{"orthopnea": "GRADE_7", "cough": null, "edema": 2}"#)
                .unwrap();
        let Err(AdviceError::Validation(errors)) = request.validate() else {
            panic!("expected a validation error");
        };
        assert_eq!(
            errors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["cough", "dizziness", "orthopnea", "syncope"]
        );
        assert_eq!(errors["cough"], "must not be null");
        assert!(errors["orthopnea"].contains("\"GRADE_7\""));
    }

    #[test]
    fn malformed_body_is_a_validation_error() {
        let err = AdviceRequest::from_json("[1, 2").unwrap_err();
        assert!(matches!(err, AdviceError::Validation(ref e) if e.contains_key("body")));
    }

    #[test]
    fn grades_parse_from_either_spelling() {
        assert_eq!("GRADE_1".parse::<Grade>(), Ok(Grade::Grade1));
        assert_eq!("3".parse::<Grade>(), Ok(Grade::Grade3));
        assert!("4".parse::<Grade>().is_err());
        assert_eq!("none".parse::<Syncope>(), Ok(Syncope::None));
    }
}
