use serde::Serialize;
use std::collections::BTreeMap;

/// Raw form answers keyed by covariate identifier.
pub type AnswerSet = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Normal,
    Inverted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CovariateKind {
    Continuous,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Covariate {
    pub key: &'static str,
    pub question: &'static str,
    pub kind: CovariateKind,
    pub coefficient: f64,
    pub standard_error: f64,
    pub polarity: Polarity,
}

impl Covariate {
    pub const fn continuous(
        key: &'static str,
        question: &'static str,
        coefficient: f64,
        standard_error: f64,
    ) -> Self {
        Self {
            key,
            question,
            kind: CovariateKind::Continuous,
            coefficient,
            standard_error,
            polarity: Polarity::Normal,
        }
    }

    pub const fn binary(
        key: &'static str,
        question: &'static str,
        coefficient: f64,
        standard_error: f64,
        polarity: Polarity,
    ) -> Self {
        Self {
            key,
            question,
            kind: CovariateKind::Binary,
            coefficient,
            standard_error,
            polarity,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.kind == CovariateKind::Binary
    }

    /// Maps a raw 0/1 answer into canonical polarity. The mapping is its own inverse.
    pub fn canonicalize(&self, raw: u8) -> u8 {
        match self.polarity {
            Polarity::Normal => raw,
            Polarity::Inverted => 1 - raw,
        }
    }

    /// The raw answer that encodes to canonical 0.
    pub fn reference_answer(&self) -> u8 {
        self.canonicalize(0)
    }
}

/// Canonical-polarity numeric inputs for the scoring engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    /// Missing features read as 0.
    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut features = Self::new();
        for (key, value) in iter {
            features.insert(key, value);
        }
        features
    }
}
