pub mod config;
pub mod covariate;
pub mod prediction;
