use crate::error::Result;
use crate::model::Model;
use crate::types::covariate::{AnswerSet, Covariate};
use crate::types::prediction::{PredictionResult, PRECISION};
use minijinja::{context, AutoEscape, Environment};
use serde::Serialize;
use std::collections::BTreeMap;

pub const INVALID_INPUT_MESSAGE: &str = "Error: Please enter valid inputs.";

const CALCULATOR_TEMPLATE: &str = "calculator.html";

#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    Blank,
    Predicted(&'a PredictionResult),
    Invalid,
}

#[derive(Serialize)]
struct NumericField<'a> {
    key: &'a str,
    question: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum OutcomeView {
    Blank,
    Predicted {
        point_estimate: String,
        lower_bound: String,
        upper_bound: String,
        z: f64,
    },
    Invalid {
        message: &'static str,
    },
}

impl From<Outcome<'_>> for OutcomeView {
    fn from(outcome: Outcome<'_>) -> Self {
        let precision = PRECISION as usize;
        match outcome {
            Outcome::Blank => OutcomeView::Blank,
            Outcome::Predicted(result) => OutcomeView::Predicted {
                point_estimate: format!("{:.precision$}", result.point_estimate),
                lower_bound: format!("{:.precision$}", result.lower_bound),
                upper_bound: format!("{:.precision$}", result.upper_bound),
                z: result.z,
            },
            Outcome::Invalid => OutcomeView::Invalid {
                message: INVALID_INPUT_MESSAGE,
            },
        }
    }
}

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|name| {
        if name.ends_with(".html") {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });
    env.add_template(
        CALCULATOR_TEMPLATE,
        include_str!("templates/calculator.html"),
    )?;
    Ok(env)
}

/// Renders the calculator page. `answers` are echoed back into the form; any
/// question without a usable answer falls back to its reference answer.
pub fn render_page(model: &Model, answers: &AnswerSet, outcome: Outcome<'_>) -> Result<String> {
    let numeric = model
        .continuous_covariates()
        .map(|covariate| NumericField {
            key: covariate.key,
            question: covariate.question,
            value: answers
                .get(covariate.key)
                .map(String::as_str)
                .unwrap_or_default(),
        })
        .collect::<Vec<_>>();
    let questions = model.binary_covariates().collect::<Vec<&Covariate>>();
    let selected = questions
        .iter()
        .map(|covariate| {
            let answer = match answers.get(covariate.key).map(|value| value.trim()) {
                Some("1") => 1,
                Some("0") => 0,
                _ => covariate.reference_answer(),
            };
            (covariate.key, answer)
        })
        .collect::<BTreeMap<_, _>>();

    let env = environment()?;
    let template = env.get_template(CALCULATOR_TEMPLATE)?;
    let page = template.render(context! {
        numeric,
        questions,
        selected,
        outcome => OutcomeView::from(outcome),
    })?;
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(answers: &AnswerSet, outcome: Outcome<'_>) -> String {
        render_page(Model::standard(), answers, outcome).expect("page should render")
    }

    fn select_block<'a>(page: &'a str, key: &str) -> &'a str {
        page.split(&format!("<select id=\"{key}\""))
            .nth(1)
            .and_then(|rest| rest.split("</select>").next())
            .expect("select should render")
    }

    #[test]
    fn blank_page_lists_every_question() {
        let page = page(&AnswerSet::new(), Outcome::Blank);
        for covariate in Model::standard().binary_covariates() {
            assert!(page.contains(&format!("name=\"{}\"", covariate.key)));
        }
        assert!(page.contains("What is your age?"));
        assert!(!page.contains("heart's arteries"));
        assert!(page.contains("heart&#x27;s arteries"));
        assert!(!page.contains("Predicted age"));
    }

    #[test]
    fn inverted_questions_preselect_yes() {
        let page = page(&AnswerSet::new(), Outcome::Blank);
        assert!(select_block(&page, "married").contains("<option value=\"1\" selected>Yes</option>"));
        assert!(select_block(&page, "male").contains("<option value=\"0\" selected>No</option>"));
    }

    #[test]
    fn submitted_answers_are_preselected() {
        let mut answers = AnswerSet::new();
        answers.insert("married".to_string(), "0".to_string());
        answers.insert("male".to_string(), " 1 ".to_string());
        let page = page(&answers, Outcome::Blank);
        assert!(select_block(&page, "married").contains("<option value=\"0\" selected>No</option>"));
        assert!(select_block(&page, "male").contains("<option value=\"1\" selected>Yes</option>"));
    }

    #[test]
    fn predicted_page_shows_all_three_numbers() {
        let result = PredictionResult {
            point_estimate: 76.13,
            lower_bound: 74.25,
            upper_bound: 78.0,
            standard_error: 0.96,
            z: 1.96,
        };
        let page = page(&AnswerSet::new(), Outcome::Predicted(&result));
        assert!(page.contains("Predicted age at time of death: 76.13"));
        assert!(page.contains("74.25 to 78.00"));
    }

    #[test]
    fn invalid_page_shows_generic_message_and_escapes_echo() {
        let mut answers = AnswerSet::new();
        answers.insert("v1age01".to_string(), "<script>".to_string());
        let page = page(&answers, Outcome::Invalid);
        assert!(page.contains(INVALID_INPUT_MESSAGE));
        assert!(page.contains("value=\"&lt;script&gt;\""));
        assert!(!page.contains("<script>"));
    }
}
