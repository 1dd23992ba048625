//! Lifespan prediction from a fixed linear risk model.
//!
//! Raw yes/no answers are encoded into canonical features by [`encode`] and
//! scored by [`score`], which returns the point estimate with a confidence
//! interval. The [`server`] module exposes both behind an HTTP form.

pub mod config;
pub mod encode;
pub mod error;
pub mod model;
pub mod report;
pub mod score;
pub mod server;
pub mod types;

pub use encode::{decode, encode};
pub use error::{LifespanError, Result};
pub use model::Model;
pub use score::{score, Scorer, VarianceModel};
pub use types::covariate::{AnswerSet, FeatureVector};
pub use types::prediction::PredictionResult;
