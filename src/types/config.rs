use crate::error::LifespanError;
use crate::score::VarianceModel;
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_Z: f64 = 1.96;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LifespanConfig {
    pub server: Option<ServerConfig>,
    pub scoring: Option<ScoringConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringConfig {
    pub z: Option<f64>,
    pub variance_model: Option<VarianceModel>,
}

/// Fully resolved settings after defaults, files, environment and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub z: f64,
    pub variance_model: VarianceModel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            z: DEFAULT_Z,
            variance_model: VarianceModel::default(),
        }
    }
}

impl Settings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), LifespanError> {
        if self.port == 0 {
            return Err(LifespanError::ConfigParse(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if self.host.trim().is_empty() {
            return Err(LifespanError::ConfigParse(
                "server.host must not be empty".to_string(),
            ));
        }
        validate_z(self.z)
    }
}

pub fn validate_z(z: f64) -> Result<(), LifespanError> {
    if !z.is_finite() || z < 0.0 {
        return Err(LifespanError::ConfigParse(format!(
            "scoring.z must be a finite value >= 0 (found {z})"
        )));
    }
    Ok(())
}

impl LifespanConfig {
    /// Overlays the file values onto `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(server) = &self.server {
            if let Some(host) = &server.host {
                settings.host = host.clone();
            }
            if let Some(port) = server.port {
                settings.port = port;
            }
        }
        if let Some(scoring) = &self.scoring {
            if let Some(z) = scoring.z {
                settings.z = z;
            }
            if let Some(variance_model) = scoring.variance_model {
                settings.variance_model = variance_model;
            }
        }
    }
}
