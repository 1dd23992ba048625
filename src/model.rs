//! The fixed regression model served by the calculator.
//!
//! Coefficients predict age at death in years. Every binary coefficient is
//! expressed in canonical polarity: a canonical value of 1 marks the risk
//! state, so a negative coefficient always shortens the predicted lifespan.

use crate::error::{LifespanError, Result};
use crate::types::covariate::{Covariate, Polarity};
use std::collections::HashSet;

pub const AGE_KEY: &str = "v1age01";

#[derive(Debug, Clone, Copy)]
pub struct Model {
    pub version: &'static str,
    pub intercept: f64,
    pub covariates: &'static [Covariate],
}

static STANDARD_COVARIATES: [Covariate; 19] = [
    Covariate::continuous(AGE_KEY, "What is your age?", 0.8310039, 0.0231),
    Covariate::binary("male", "Are you a man?", -1.63956, 0.212, Polarity::Normal),
    Covariate::binary("black", "Are you Black?", -1.673291, 0.268, Polarity::Normal),
    Covariate::binary("married", "Are you married?", -2.825288, 0.224, Polarity::Inverted),
    Covariate::binary(
        "act3",
        "Do you do less than 1 hour of physical activity a week?",
        -1.061541,
        0.205,
        Polarity::Normal,
    ),
    Covariate::binary(
        "insurance",
        "Do you have insurance coverage?",
        -1.171212,
        0.336,
        Polarity::Inverted,
    ),
    Covariate::binary(
        "p_afat3",
        "Do you eat a lot of animal products?",
        -0.6661506,
        0.198,
        Polarity::Normal,
    ),
    Covariate::binary("diabts02", "Do you have diabetes?", -2.289035, 0.297, Polarity::Normal),
    Covariate::binary(
        "sbp3",
        "Is your blood pressure elevated?",
        -1.305727,
        0.231,
        Polarity::Normal,
    ),
    Covariate::binary("cursmk01", "Do you currently smoke?", -2.011954, 0.318, Polarity::Normal),
    Covariate::binary(
        "cig2",
        "Have you smoked for over ten years?",
        -1.501812,
        0.262,
        Polarity::Normal,
    ),
    Covariate::binary("cr_high", "Do you have kidney failure?", -3.541667, 0.611, Polarity::Normal),
    Covariate::binary("stroke", "Have you ever had a stroke?", -2.141647, 0.581, Polarity::Normal),
    Covariate::binary(
        "clvh01",
        "Do you have a history of left ventricular hypertrophy?",
        -2.295403,
        0.702,
        Polarity::Normal,
    ),
    Covariate::binary(
        "abnormal_abi",
        "Do you have peripheral vascular disease?",
        -1.638849,
        0.455,
        Polarity::Normal,
    ),
    Covariate::binary(
        "plaque03",
        "Do you have plaque buildup in your arteries?",
        -1.094031,
        0.219,
        Polarity::Normal,
    ),
    Covariate::binary(
        "low_plt",
        "Do you have a low platelet count?",
        -1.479228,
        0.472,
        Polarity::Normal,
    ),
    Covariate::binary(
        "prevhf01",
        "Do you have a history of heart failure?",
        -1.531617,
        0.549,
        Polarity::Normal,
    ),
    Covariate::binary(
        "prvchd05",
        "Have you had a heart attack or an operation to open up your heart's arteries?",
        -3.172856,
        0.433,
        Polarity::Normal,
    ),
];

pub static STANDARD_MODEL: Model = Model {
    version: "2024.1",
    intercept: 34.58353,
    covariates: &STANDARD_COVARIATES,
};

impl Model {
    pub fn standard() -> &'static Model {
        &STANDARD_MODEL
    }

    pub fn covariate(&self, key: &str) -> Option<&Covariate> {
        self.covariates.iter().find(|covariate| covariate.key == key)
    }

    pub fn binary_covariates(&self) -> impl Iterator<Item = &Covariate> {
        self.covariates.iter().filter(|covariate| covariate.is_binary())
    }

    pub fn continuous_covariates(&self) -> impl Iterator<Item = &Covariate> {
        self.covariates
            .iter()
            .filter(|covariate| !covariate.is_binary())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.intercept.is_finite() {
            return Err(LifespanError::ConfigParse(
                "model intercept must be finite".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for covariate in self.covariates {
            if !seen.insert(covariate.key) {
                return Err(LifespanError::ConfigParse(format!(
                    "duplicate covariate: {}",
                    covariate.key
                )));
            }
            if !covariate.coefficient.is_finite() {
                return Err(LifespanError::ConfigParse(format!(
                    "covariate {} has a non-finite coefficient",
                    covariate.key
                )));
            }
            if !covariate.standard_error.is_finite() || covariate.standard_error < 0.0 {
                return Err(LifespanError::ConfigParse(format!(
                    "covariate {} has an invalid standard error",
                    covariate.key
                )));
            }
            if !covariate.is_binary() && covariate.polarity == Polarity::Inverted {
                return Err(LifespanError::ConfigParse(format!(
                    "continuous covariate {} cannot be inverted",
                    covariate.key
                )));
            }
        }
        Ok(())
    }
}
