//! Bag-of-words features with optional TF-IDF weighting

use reviewcheck_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Vectorizer section of a model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerSpec {
    /// Token to column index
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per column; raw counts when absent
    #[serde(default)]
    pub idf: Option<Vec<f64>>,

    /// Use `1 + ln(tf)` instead of raw term frequency
    #[serde(default)]
    pub sublinear_tf: bool,

    /// Row normalization; `null` disables it
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Sparse feature row, sorted by column
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    n_features: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Non-zero entries as `(column, value)`
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Dot product with a dense weight row of length `n_features`
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(col, value)| weights.get(col).copied().unwrap_or(0.0) * value)
            .sum()
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.n_features];
        for &(col, value) in &self.entries {
            dense[col] = value;
        }
        dense
    }
}

/// Validated vectorizer ready for inference
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    sublinear_tf: bool,
    norm: Option<Norm>,
}

impl TfidfVectorizer {
    /// Build from an artifact section, rejecting inconsistent dimensions
    pub fn from_spec(spec: VectorizerSpec) -> Result<Self> {
        let n_features = spec.vocabulary.len();
        if n_features == 0 {
            return Err(Error::artifact("vectorizer vocabulary is empty"));
        }

        let mut seen = vec![false; n_features];
        for (token, &col) in &spec.vocabulary {
            if col >= n_features {
                return Err(Error::artifact(format!(
                    "vocabulary column {col} for '{token}' is out of range (n_features = {n_features})"
                )));
            }
            if std::mem::replace(&mut seen[col], true) {
                return Err(Error::artifact(format!(
                    "vocabulary column {col} is assigned to more than one token"
                )));
            }
        }

        if let Some(idf) = &spec.idf {
            if idf.len() != n_features {
                return Err(Error::artifact(format!(
                    "idf has {} entries, expected {n_features}",
                    idf.len()
                )));
            }
            if idf.iter().any(|v| !v.is_finite()) {
                return Err(Error::artifact("idf contains non-finite values"));
            }
        }

        Ok(Self {
            vocabulary: spec.vocabulary,
            idf: spec.idf,
            sublinear_tf: spec.sublinear_tf,
            norm: spec.norm,
        })
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Turn normalized tokens into a weighted feature row.
    ///
    /// Tokens outside the vocabulary are ignored.
    pub fn transform<S: AsRef<str>>(&self, tokens: &[S]) -> FeatureVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokens {
            if let Some(&col) = self.vocabulary.get(token.as_ref()) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, count)| {
                let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
                let weight = self.idf.as_ref().map_or(1.0, |idf| idf[col]);
                (col, tf * weight)
            })
            .collect();

        if let Some(norm) = self.norm {
            let magnitude = match norm {
                Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
                Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            };
            if magnitude > 0.0 {
                for (_, value) in &mut entries {
                    *value /= magnitude;
                }
            }
        }

        FeatureVector {
            n_features: self.n_features(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(idf: Option<Vec<f64>>, norm: Option<Norm>) -> VectorizerSpec {
        VectorizerSpec {
            vocabulary: [("great", 0), ("fake", 1), ("product", 2)]
                .into_iter()
                .map(|(t, c)| (t.to_string(), c))
                .collect(),
            idf,
            sublinear_tf: false,
            norm,
        }
    }

    #[test]
    fn test_raw_counts() {
        let v = TfidfVectorizer::from_spec(spec(None, None)).unwrap();
        let x = v.transform(&["great", "great", "product", "unknown"]);
        assert_eq!(x.entries(), &[(0, 2.0), (2, 1.0)]);
        assert_eq!(x.to_dense(), vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_tfidf_l2() {
        let v = TfidfVectorizer::from_spec(spec(Some(vec![1.0, 2.0, 1.0]), Some(Norm::L2))).unwrap();
        let x = v.transform(&["great", "fake"]);
        let norm = (1.0f64 + 4.0).sqrt();
        assert_eq!(x.entries(), &[(0, 1.0 / norm), (1, 2.0 / norm)]);
    }

    #[test]
    fn test_empty_tokens_yield_zero_row() {
        let v = TfidfVectorizer::from_spec(spec(None, Some(Norm::L2))).unwrap();
        let x = v.transform::<&str>(&[]);
        assert!(x.entries().is_empty());
        assert_eq!(x.dot(&[1.0, 1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_sublinear_tf() {
        let mut s = spec(None, None);
        s.sublinear_tf = true;
        let v = TfidfVectorizer::from_spec(s).unwrap();
        let x = v.transform(&["fake", "fake", "fake"]);
        assert_eq!(x.entries(), &[(1, 1.0 + 3.0f64.ln())]);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(TfidfVectorizer::from_spec(spec(Some(vec![1.0]), None)).is_err());

        let mut dup = spec(None, None);
        dup.vocabulary.insert("other".to_string(), 1);
        assert!(TfidfVectorizer::from_spec(dup).is_err());

        let mut out_of_range = spec(None, None);
        out_of_range.vocabulary.insert("great".to_string(), 7);
        assert!(TfidfVectorizer::from_spec(out_of_range).is_err());
    }

    #[test]
    fn test_norm_defaults_to_l2() {
        let s: VectorizerSpec = serde_json::from_str(r#"{"vocabulary": {"a": 0}}"#).unwrap();
        assert_eq!(s.norm, Some(Norm::L2));
        let s: VectorizerSpec =
            serde_json::from_str(r#"{"vocabulary": {"a": 0}, "norm": null}"#).unwrap();
        assert_eq!(s.norm, None);
    }
}
