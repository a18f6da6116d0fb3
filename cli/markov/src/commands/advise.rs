//! `markov advise`: five symptom findings in, advice text out.

use std::path::Path;

use anyhow::Result;
use markov_advice::{AdviceRequest, AdviceService};
use serde_json::Value;

/// Symptom arguments as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct Symptoms {
    pub orthopnea: Option<String>,
    pub cough: Option<String>,
    pub edema: Option<String>,
    pub dizziness: Option<String>,
    pub syncope: Option<String>,
}

impl Symptoms {
    fn to_request(&self) -> AdviceRequest {
        AdviceRequest {
            orthopnea: self.orthopnea.clone().map(Value::String),
            cough: self.cough.clone().map(Value::String),
            edema: self.edema.clone().map(Value::String),
            dizziness: self.dizziness.clone().map(Value::String),
            syncope: self.syncope.clone().map(Value::String),
        }
    }
}

/// Compute the advice for a set of symptoms, or for a JSON request body.
pub fn advice(model: &Path, symptoms: &Symptoms, request_json: Option<&str>) -> Result<String> {
    let request = match request_json {
        Some(json) => AdviceRequest::from_json(json)?,
        None => symptoms.to_request(),
    };
    Ok(AdviceService::new(model).advise(&request)?)
}

pub fn run(model: &Path, symptoms: &Symptoms, request_json: Option<&str>) -> Result<()> {
    println!("{}", advice(model, symptoms, request_json)?);
    Ok(())
}
