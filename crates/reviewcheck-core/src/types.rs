//! Core types for reviewcheck

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output label of a review classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Computer-generated (fake) review
    #[serde(rename = "CG")]
    ComputerGenerated,

    /// Original (genuine) review
    #[serde(rename = "OR")]
    Original,
}

impl Label {
    /// Short code used by the trained artifacts
    pub fn code(&self) -> &'static str {
        match self {
            Self::ComputerGenerated => "CG",
            Self::Original => "OR",
        }
    }

    /// Whether this label marks the review as fake
    pub fn is_fake(&self) -> bool {
        matches!(self, Self::ComputerGenerated)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CG" => Ok(Self::ComputerGenerated),
            "OR" => Ok(Self::Original),
            other => Err(format!("unknown label '{other}'")),
        }
    }
}

/// Identifier of a servable model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelKey {
    #[serde(rename = "rf")]
    RandomForest,
    #[serde(rename = "svc")]
    SupportVector,
    #[serde(rename = "lr")]
    LogisticRegression,
}

impl ModelKey {
    /// All keys in canonical order
    pub const ALL: [ModelKey; 3] = [
        ModelKey::RandomForest,
        ModelKey::SupportVector,
        ModelKey::LogisticRegression,
    ];

    /// Form value for this key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomForest => "rf",
            Self::SupportVector => "svc",
            Self::LogisticRegression => "lr",
        }
    }

    /// Name shown in the model picker
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::RandomForest => "Random Forest",
            Self::SupportVector => "Support Vector Classifier",
            Self::LogisticRegression => "Logistic Regression",
        }
    }

    /// Artifact file name used when no explicit path is configured
    pub fn default_artifact(&self) -> &'static str {
        match self {
            Self::RandomForest => "rf_model.json",
            Self::SupportVector => "svc_model.json",
            Self::LogisticRegression => "lr_model.json",
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rf" => Ok(Self::RandomForest),
            "svc" => Ok(Self::SupportVector),
            "lr" => Ok(Self::LogisticRegression),
            other => Err(format!("unknown model '{other}'")),
        }
    }
}

/// Per-label probabilities, in the classifier's label order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassProbabilities {
    entries: Vec<(Label, f64)>,
}

impl ClassProbabilities {
    /// Pair labels with probabilities positionally
    pub fn new(labels: &[Label], probabilities: &[f64]) -> Self {
        Self {
            entries: labels
                .iter()
                .copied()
                .zip(probabilities.iter().copied())
                .collect(),
        }
    }

    /// Probability of `label`, 0.0 when the classifier does not know it
    pub fn get(&self, label: Label) -> f64 {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }

    /// Sum over all labels
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Label, f64)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A review submitted for classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Raw review text, passed to the model unchanged
    pub review: String,

    /// Requested model, as submitted by the client
    pub model_choice: String,
}

impl PredictionRequest {
    pub fn new(review: impl Into<String>, model_choice: impl Into<String>) -> Self {
        Self {
            review: review.into(),
            model_choice: model_choice.into(),
        }
    }
}

/// Outcome of a successful prediction, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Human-readable verdict
    pub prediction_text: String,

    /// Formatted probability of the fake class
    pub fake_prob: String,

    /// Formatted probability of the real class
    pub real_prob: String,

    /// Echo of the submitted review
    pub submitted_review: String,

    /// Echo of the selected model
    pub last_model_choice: String,
}

impl PredictionResult {
    /// Build the display values from a predicted label and its probabilities
    pub fn from_prediction(
        review: impl Into<String>,
        model: ModelKey,
        predicted: Label,
        probabilities: &ClassProbabilities,
    ) -> Self {
        let fake = format_percent(probabilities.get(Label::ComputerGenerated));
        let real = format_percent(probabilities.get(Label::Original));

        let prediction_text = if predicted.is_fake() {
            "This review is likely FAKE."
        } else {
            "This review is likely REAL."
        };

        Self {
            prediction_text: prediction_text.to_string(),
            fake_prob: format!("Probability of being FAKE (CG): {fake}%"),
            real_prob: format!("Probability of being REAL (OR): {real}%"),
            submitted_review: review.into(),
            last_model_choice: model.as_str().to_string(),
        }
    }
}

/// Format a probability as a percentage rounded to two decimals.
///
/// The result is the shortest decimal that round-trips the rounded value,
/// always with at least one fractional digit: `0.1` -> `10.0`,
/// `1.0 / 3.0` -> `33.33`, `0.0` -> `0.0`.
pub fn format_percent(probability: f64) -> String {
    let percent = probability * 100.0;
    let rounded: f64 = format!("{percent:.2}").parse().unwrap_or(percent);
    // Debug keeps the trailing ".0" that Display drops
    format!("{:?}", rounded + 0.0)
}
