use crate::report::PredictionReport;

pub fn to_json(report: &PredictionReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
