use crate::error::{LifespanError, Result};
use crate::model::Model;
use crate::types::covariate::{AnswerSet, Covariate, FeatureVector};

/// Encodes raw answers against the standard model.
pub fn encode(answers: &AnswerSet) -> Result<FeatureVector> {
    encode_with(Model::standard(), answers)
}

/// Produces a feature vector covering every covariate in `model`.
///
/// Fails on the first malformed field; a partially encoded vector is never
/// returned.
pub fn encode_with(model: &Model, answers: &AnswerSet) -> Result<FeatureVector> {
    let mut features = FeatureVector::new();
    for covariate in model.covariates {
        let raw = answers.get(covariate.key).map(String::as_str);
        let value = if covariate.is_binary() {
            f64::from(covariate.canonicalize(parse_indicator(covariate, raw)?))
        } else {
            parse_continuous(covariate, raw)?
        };
        features.insert(covariate.key, value);
    }
    Ok(features)
}

/// Re-derives raw answers from canonical features.
pub fn decode(features: &FeatureVector) -> AnswerSet {
    decode_with(Model::standard(), features)
}

pub fn decode_with(model: &Model, features: &FeatureVector) -> AnswerSet {
    model
        .covariates
        .iter()
        .map(|covariate| {
            let value = features.get(covariate.key);
            let raw = if covariate.is_binary() {
                let canonical = u8::from(value != 0.0);
                covariate.canonicalize(canonical).to_string()
            } else {
                value.to_string()
            };
            (covariate.key.to_string(), raw)
        })
        .collect()
}

// A missing age is rejected rather than read as 0; a defaulted age would
// silently skew every estimate.
fn parse_continuous(covariate: &Covariate, raw: Option<&str>) -> Result<f64> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(LifespanError::InvalidInput(format!(
            "{} is required",
            covariate.key
        )));
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LifespanError::InvalidInput(format!(
            "{} must be a number",
            covariate.key
        ))),
    }
}

// Integers other than 0 and 1, and missing answers, read as 0.
fn parse_indicator(covariate: &Covariate, raw: Option<&str>) -> Result<u8> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    match raw.trim().parse::<i64>() {
        Ok(1) => Ok(1),
        Ok(_) => Ok(0),
        Err(_) => Err(LifespanError::InvalidInput(format!(
            "{} must be 0 or 1",
            covariate.key
        ))),
    }
}
