//! Review text normalization
//!
//! The trained artifacts were fit on tokens produced by exactly this rule:
//! drop ASCII punctuation, split on whitespace, and discard tokens whose
//! lowercase form is an English stopword. Surviving tokens keep their
//! original case. Any change here changes what the models see.

use reviewcheck_core::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Location of the English stopword list inside an NLTK data directory
pub const STOPWORDS_RELATIVE_PATH: &str = "corpora/stopwords/english";

/// English stopword list loaded from an NLTK-style corpus file
#[derive(Debug, Clone)]
pub struct StopwordCorpus {
    words: HashSet<String>,
    source: PathBuf,
}

impl StopwordCorpus {
    /// Parse a corpus file body: one word per line, blank lines ignored
    pub fn parse(content: &str, source: impl Into<PathBuf>) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            words,
            source: source.into(),
        }
    }

    /// Load a corpus file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::corpus(format!("failed to read stopwords at {}: {e}", path.display()))
        })?;
        Ok(Self::parse(&content, path))
    }

    /// Find the corpus in the first data directory that has it
    pub fn locate(search_path: &[PathBuf]) -> Result<Self> {
        for dir in search_path {
            let candidate = dir.join(STOPWORDS_RELATIVE_PATH);
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
            debug!("No stopwords corpus at {}", candidate.display());
        }

        Err(Error::corpus(format!(
            "stopwords corpus '{}' not found in {}",
            STOPWORDS_RELATIVE_PATH,
            describe_search_path(search_path)
        )))
    }

    /// Whether `word` (already lowercased) is a stopword
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// File the corpus was read from
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Tokenizer shared by every loaded pipeline
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    corpus: std::result::Result<StopwordCorpus, String>,
}

impl TextNormalizer {
    /// Create a normalizer backed by `corpus`
    pub fn new(corpus: StopwordCorpus) -> Self {
        Self { corpus: Ok(corpus) }
    }

    /// Resolve the corpus from a list of data directories.
    ///
    /// A missing corpus does not fail here; it is logged and every later
    /// call to [`TextNormalizer::normalize`] reports it instead.
    pub fn from_search_path(search_path: &[PathBuf]) -> Self {
        match StopwordCorpus::locate(search_path) {
            Ok(corpus) => {
                info!(
                    "Stopwords corpus loaded from {} ({} words)",
                    corpus.source().display(),
                    corpus.len()
                );
                Self::new(corpus)
            }
            Err(e) => {
                warn!("{}", e);
                warn!("Predictions will fail until the stopwords corpus is installed");
                Self {
                    corpus: Err(e.to_string()),
                }
            }
        }
    }

    /// Whether the stopword corpus was found
    pub fn is_ready(&self) -> bool {
        self.corpus.is_ok()
    }

    /// Split `text` into the tokens the models were trained on
    pub fn normalize(&self, text: &str) -> Result<Vec<String>> {
        let corpus = self.corpus.as_ref().map_err(|e| Error::corpus(e.clone()))?;

        let stripped = strip_punctuation(text);
        Ok(stripped
            .split(is_separator)
            .filter(|token| !token.is_empty())
            .filter(|token| !corpus.contains(&token.to_lowercase()))
            .map(str::to_string)
            .collect())
    }
}

/// Remove the 32 ASCII punctuation characters, keeping everything else
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

// Unicode whitespace plus the ASCII file/group/record/unit separators.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn describe_search_path(search_path: &[PathBuf]) -> String {
    if search_path.is_empty() {
        return "an empty search path".to_string();
    }
    search_path
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
