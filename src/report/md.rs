use crate::model::Model;
use crate::report::PredictionReport;
use crate::types::covariate::Polarity;
use crate::types::prediction::PRECISION;

pub fn to_markdown(report: &PredictionReport) -> String {
    let precision = PRECISION as usize;
    let result = &report.result;
    let mut output = String::new();
    output.push_str("# Lifespan Prediction\n\n");
    output.push_str(&format!(
        "Predicted age at time of death: {:.precision$}\n\n",
        result.point_estimate
    ));
    output.push_str("## Confidence Interval\n\n");
    output.push_str(&format!(
        "- lower bound: {:.precision$}\n- upper bound: {:.precision$}\n- standard error: {:.precision$}\n- z: {}\n\n",
        result.lower_bound, result.upper_bound, result.standard_error, result.z
    ));
    output.push_str("## Model\n\n");
    output.push_str(&format!(
        "- version: {}\n- variance model: {:?}\n",
        report.model_version, report.variance_model
    ));
    output
}

pub fn covariates_to_markdown(model: &Model) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Covariates (model {})\n\n", model.version));
    output.push_str(&format!("Intercept: {}\n\n", model.intercept));
    output.push_str("| key | coefficient | standard error | polarity | question |\n");
    output.push_str("|---|---|---|---|---|\n");
    for covariate in model.covariates {
        let polarity = match covariate.polarity {
            Polarity::Normal => "normal",
            Polarity::Inverted => "inverted",
        };
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            covariate.key,
            covariate.coefficient,
            covariate.standard_error,
            polarity,
            covariate.question
        ));
    }
    output
}
