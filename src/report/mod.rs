pub mod html;
pub mod json;
pub mod md;

use crate::error::LifespanError;
use crate::score::{Scorer, VarianceModel};
use crate::types::prediction::PredictionResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub model_version: &'static str,
    pub variance_model: VarianceModel,
    #[serde(flatten)]
    pub result: PredictionResult,
}

impl PredictionReport {
    pub fn new(scorer: &Scorer, result: PredictionResult) -> Self {
        Self {
            model_version: scorer.model().version,
            variance_model: scorer.variance_model(),
            result,
        }
    }
}

pub fn render(report: &PredictionReport, format: OutputFormat) -> Result<String, LifespanError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(LifespanError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report)),
    }
}
