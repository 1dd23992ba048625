use crate::encode::encode_with;
use crate::error::LifespanError;
use crate::report::html::{render_page, Outcome};
use crate::report::PredictionReport;
use crate::server::AppState;
use crate::types::covariate::AnswerSet;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub struct ApiError(LifespanError);

impl From<LifespanError> for ApiError {
    fn from(error: LifespanError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            LifespanError::InvalidInput(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
            }
            other => {
                tracing::error!(error = %other, "prediction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_version: state.scorer.model().version,
    })
}

pub async fn form_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let page = render_page(state.scorer.model(), &AnswerSet::new(), Outcome::Blank)?;
    Ok(Html(page))
}

pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(answers): Form<AnswerSet>,
) -> Result<(StatusCode, Html<String>), ApiError> {
    let model = state.scorer.model();
    let (status, page) = match encode_with(model, &answers) {
        Ok(features) => {
            let result = state.scorer.score(&features);
            (
                StatusCode::OK,
                render_page(model, &answers, Outcome::Predicted(&result))?,
            )
        }
        Err(e) => {
            tracing::info!(error = %e, "rejected form submission");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                render_page(model, &answers, Outcome::Invalid)?,
            )
        }
    };
    Ok((status, Html(page)))
}

pub async fn predict_json(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<PredictionReport>, ApiError> {
    let answers = answers_from_json(body)?;
    let features = encode_with(state.scorer.model(), &answers)?;
    let result = state.scorer.score(&features);
    Ok(Json(PredictionReport::new(&state.scorer, result)))
}

// JSON clients may send numbers or booleans where the form sends strings.
fn answers_from_json(body: Map<String, Value>) -> Result<AnswerSet, LifespanError> {
    let mut answers = AnswerSet::new();
    for (key, value) in body {
        let raw = match value {
            Value::Null => continue,
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => u8::from(flag).to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(LifespanError::InvalidInput(format!(
                    "{key} must be a string, number or boolean"
                )));
            }
        };
        answers.insert(key, raw);
    }
    Ok(answers)
}
