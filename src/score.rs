//! Linear scoring and confidence intervals.
//!
//! The point estimate is `intercept + sum(coefficient * feature)` over every
//! covariate in the model. Its standard error assumes independent
//! coefficient estimates and is propagated with exactly one
//! [`VarianceModel`] per result.

use crate::model::Model;
use crate::types::config::DEFAULT_Z;
use crate::types::covariate::FeatureVector;
use crate::types::prediction::{Estimate, PredictionResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum VarianceModel {
    /// `sum(coefficient^2 * se^2 * feature^2)`
    #[default]
    CoefficientWeighted,
    /// `sum(feature^2 * se^2)`
    Unweighted,
}

impl VarianceModel {
    /// Square root of one covariate's variance term.
    pub fn deviation(self, coefficient: f64, standard_error: f64, feature: f64) -> f64 {
        let base = (standard_error * feature).abs();
        match self {
            VarianceModel::CoefficientWeighted => coefficient.abs() * base,
            VarianceModel::Unweighted => base,
        }
    }

    pub fn term(self, coefficient: f64, standard_error: f64, feature: f64) -> f64 {
        self.deviation(coefficient, standard_error, feature).powi(2)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    model: &'static Model,
    z: f64,
    variance_model: VarianceModel,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(Model::standard())
    }
}

impl Scorer {
    pub fn new(model: &'static Model) -> Self {
        Self {
            model,
            z: DEFAULT_Z,
            variance_model: VarianceModel::default(),
        }
    }

    /// Negative or NaN critical values are clamped to 0, `+inf` to `f64::MAX`.
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = if z.is_nan() || z <= 0.0 {
            0.0
        } else {
            z.min(f64::MAX)
        };
        self
    }

    pub fn with_variance_model(mut self, variance_model: VarianceModel) -> Self {
        self.variance_model = variance_model;
        self
    }

    pub fn model(&self) -> &'static Model {
        self.model
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn variance_model(&self) -> VarianceModel {
        self.variance_model
    }

    /// Unrounded point estimate and standard error.
    ///
    /// The standard error accumulates per-covariate deviations with `hypot`,
    /// so it stays finite wherever the individual deviations are.
    pub fn estimate(&self, features: &FeatureVector) -> Estimate {
        let (point, standard_error) = self.model.covariates.iter().fold(
            (self.model.intercept, 0.0_f64),
            |(point, standard_error), covariate| {
                let feature = features.get(covariate.key);
                (
                    point + covariate.coefficient * feature,
                    standard_error.hypot(self.variance_model.deviation(
                        covariate.coefficient,
                        covariate.standard_error,
                        feature,
                    )),
                )
            },
        );
        Estimate {
            point,
            standard_error,
        }
    }

    pub fn score(&self, features: &FeatureVector) -> PredictionResult {
        let result = PredictionResult::from_estimate(self.estimate(features), self.z);
        tracing::debug!(
            point_estimate = result.point_estimate,
            z = self.z,
            variance_model = ?self.variance_model,
            "prediction scored"
        );
        result
    }
}

/// Scores against the standard model with the coefficient-weighted variance.
pub fn score(features: &FeatureVector, z: f64) -> PredictionResult {
    Scorer::default().with_z(z).score(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use crate::model::AGE_KEY;
    use crate::types::covariate::{AnswerSet, Covariate, Polarity};

    const EPSILON: f64 = 1e-9;

    fn reference_answers(age: &str) -> AnswerSet {
        let mut answers = AnswerSet::new();
        answers.insert(AGE_KEY.to_string(), age.to_string());
        for covariate in Model::standard().binary_covariates() {
            answers.insert(
                covariate.key.to_string(),
                covariate.reference_answer().to_string(),
            );
        }
        answers
    }

    fn features_for(age: &str, overrides: &[(&str, &str)]) -> FeatureVector {
        let mut answers = reference_answers(age);
        for (key, value) in overrides {
            answers.insert(key.to_string(), value.to_string());
        }
        encode(&answers).expect("answers should encode")
    }

    #[test]
    fn zero_features_score_the_intercept_exactly() {
        let features = Model::standard()
            .covariates
            .iter()
            .map(|covariate| (covariate.key, 0.0))
            .collect::<FeatureVector>();
        let estimate = Scorer::default().estimate(&features);
        assert_eq!(estimate.point, Model::standard().intercept);
        assert_eq!(estimate.standard_error, 0.0);
    }

    #[test]
    fn reference_answers_at_age_zero_score_the_intercept() {
        let estimate = Scorer::default().estimate(&features_for("0", &[]));
        assert_eq!(estimate.point, Model::standard().intercept);
    }

    #[test]
    fn age_fifty_with_reference_answers() {
        let result = score(&features_for("50", &[]), 1.96);
        // 34.58353 + 0.8310039 * 50
        assert_eq!(result.point_estimate, 76.13);
        // only age contributes variance: |0.8310039 * 0.0231 * 50| * 1.96
        assert_eq!(result.lower_bound, 74.25);
        assert_eq!(result.upper_bound, 78.01);
    }

    #[test]
    fn point_estimate_is_linear_in_age() {
        let scorer = Scorer::default();
        let coefficient = Model::standard()
            .covariate(AGE_KEY)
            .map(|covariate| covariate.coefficient)
            .expect("age covariate should exist");
        let base = scorer.estimate(&features_for("40", &[("cursmk01", "1")]));
        let later = scorer.estimate(&features_for("47.5", &[("cursmk01", "1")]));
        assert!((later.point - base.point - coefficient * 7.5).abs() < EPSILON);
    }

    #[test]
    fn answer_flips_follow_polarity() {
        let scorer = Scorer::default();
        let model = Model::standard();
        for covariate in model.binary_covariates() {
            let before = scorer.estimate(&features_for("60", &[(covariate.key, "0")]));
            let after = scorer.estimate(&features_for("60", &[(covariate.key, "1")]));
            let expected = match covariate.polarity {
                Polarity::Normal => covariate.coefficient,
                Polarity::Inverted => -covariate.coefficient,
            };
            assert!(
                (after.point - before.point - expected).abs() < EPSILON,
                "flip of {} moved the estimate by the wrong amount",
                covariate.key
            );
        }
    }

    #[test]
    fn bounds_bracket_the_point_estimate() {
        let features = features_for(
            "72",
            &[("male", "1"), ("married", "0"), ("stroke", "1"), ("cig2", "1")],
        );
        for z in [0.0, 0.5, 1.645, 1.96, 2.576, 10.0] {
            let result = score(&features, z);
            assert!(result.lower_bound <= result.point_estimate);
            assert!(result.point_estimate <= result.upper_bound);
        }
    }

    #[test]
    fn interval_width_grows_with_z() {
        let features = features_for("35", &[("diabts02", "1"), ("prvchd05", "1")]);
        let widths = [0.0, 1.0, 1.645, 1.96, 2.576, 3.29]
            .into_iter()
            .map(|z| score(&features, z).width())
            .collect::<Vec<_>>();
        assert!(widths.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn huge_age_keeps_bounds_ordered() {
        for age in ["1e200", "1e307"] {
            let features = features_for(age, &[("married", "0"), ("insurance", "0")]);
            let estimate = Scorer::default().estimate(&features);
            assert!(estimate.standard_error.is_finite());
            for z in [0.0, 1.96] {
                let result = score(&features, z);
                assert!(!result.lower_bound.is_nan(), "age {age} z {z}");
                assert!(!result.upper_bound.is_nan(), "age {age} z {z}");
                assert!(result.lower_bound <= result.point_estimate);
                assert!(result.point_estimate <= result.upper_bound);
            }
            let collapsed = score(&features, 0.0);
            assert_eq!(collapsed.lower_bound, collapsed.point_estimate);
            assert_eq!(collapsed.upper_bound, collapsed.point_estimate);
        }
    }

    #[test]
    fn infinite_z_with_zero_standard_error_stays_finite() {
        let scorer = Scorer::default().with_z(f64::INFINITY);
        assert_eq!(scorer.z(), f64::MAX);
        let result = scorer.score(&features_for("0", &[]));
        assert_eq!(result.lower_bound, result.point_estimate);
        assert_eq!(result.upper_bound, result.point_estimate);
        assert_eq!(Scorer::default().with_z(f64::NAN).z(), 0.0);
        assert_eq!(Scorer::default().with_z(f64::NEG_INFINITY).z(), 0.0);
    }

    #[test]
    fn variance_term_is_squared_deviation() {
        let model = VarianceModel::CoefficientWeighted;
        assert!((model.term(-2.0, 0.3, 1.0) - 0.36).abs() < EPSILON);
        assert!((VarianceModel::Unweighted.term(-2.0, 0.3, 1.0) - 0.09).abs() < EPSILON);
    }

    #[test]
    fn negative_z_is_clamped_to_zero() {
        let scorer = Scorer::default().with_z(-1.96);
        assert_eq!(scorer.z(), 0.0);
        let result = scorer.score(&features_for("50", &[]));
        assert_eq!(result.lower_bound, result.upper_bound);
    }

    // Pins the exact variance formula for each model so neither can silently
    // replace the other.
    static PINNED: [Covariate; 3] = [
        Covariate::continuous("age", "Age?", 0.5, 0.1),
        Covariate::binary("smoker", "Smoker?", -2.0, 0.3, Polarity::Normal),
        Covariate::binary("insured", "Insured?", -1.0, 0.4, Polarity::Inverted),
    ];
    static PINNED_MODEL: Model = Model {
        version: "pinned",
        intercept: 30.0,
        covariates: &PINNED,
    };

    fn pinned_features() -> FeatureVector {
        [("age", 10.0), ("smoker", 1.0), ("insured", 1.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn coefficient_weighted_variance_is_pinned() {
        let estimate = Scorer::new(&PINNED_MODEL).estimate(&pinned_features());
        // 0.25*0.01*100 + 4*0.09*1 + 1*0.16*1 = 0.25 + 0.36 + 0.16
        assert!((estimate.standard_error - 0.77_f64.sqrt()).abs() < EPSILON);
        assert!((estimate.point - 32.0).abs() < EPSILON);
    }

    #[test]
    fn unweighted_variance_is_pinned() {
        let estimate = Scorer::new(&PINNED_MODEL)
            .with_variance_model(VarianceModel::Unweighted)
            .estimate(&pinned_features());
        // 0.01*100 + 0.09*1 + 0.16*1 = 1.0 + 0.09 + 0.16
        assert!((estimate.standard_error - 1.25_f64.sqrt()).abs() < EPSILON);
        assert!((estimate.point - 32.0).abs() < EPSILON);
    }

    #[test]
    fn default_scorer_uses_coefficient_weighted_variance() {
        assert_eq!(
            Scorer::default().variance_model(),
            VarianceModel::CoefficientWeighted
        );
        let weighted = Scorer::new(&PINNED_MODEL).score(&pinned_features());
        let free_fn_equivalent = Scorer::new(&PINNED_MODEL)
            .with_variance_model(VarianceModel::CoefficientWeighted)
            .score(&pinned_features());
        assert_eq!(weighted, free_fn_equivalent);
    }
}
