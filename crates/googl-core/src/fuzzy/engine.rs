//! FuzzyEngine - closest-question lookup

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use super::strategies;

/// Default minimum similarity for a candidate to count as a match
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// A scored candidate
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub value: String,
    pub score: f64,
    pub strategy: &'static str,
}

impl FuzzyMatch {
    fn new(value: String, score: f64, strategy: &'static str) -> Self {
        Self {
            value,
            score,
            strategy,
        }
    }
}

/// Similarity metric used to score candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Ratcliff/Obershelp matching-block ratio
    #[default]
    SequenceRatio,
    /// Normalized Levenshtein distance
    Levenshtein,
    /// Jaro-Winkler similarity
    JaroWinkler,
}

impl Metric {
    /// Score `candidate` against `query`
    pub fn score(&self, candidate: &str, query: &str) -> f64 {
        match self {
            Metric::SequenceRatio => strategies::sequence_ratio(candidate, query),
            Metric::Levenshtein => strategies::levenshtein_ratio(candidate, query),
            Metric::JaroWinkler => strategies::jaro_winkler_ratio(candidate, query),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::SequenceRatio => "sequence",
            Metric::Levenshtein => "levenshtein",
            Metric::JaroWinkler => "jaro-winkler",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Unrecognised metric name
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unknown similarity metric '{0}' (expected sequence, levenshtein or jaro-winkler)")]
pub struct ParseMetricError(String);

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequence" | "ratio" => Ok(Metric::SequenceRatio),
            "levenshtein" => Ok(Metric::Levenshtein),
            "jaro-winkler" | "jaro_winkler" => Ok(Metric::JaroWinkler),
            _ => Err(ParseMetricError(s.to_string())),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub cutoff: f64,
    pub metric: Metric,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            metric: Metric::default(),
        }
    }
}

/// Approximate string matcher over a candidate list
#[derive(Debug, Clone, Default)]
pub struct FuzzyEngine {
    config: EngineConfig,
}

impl FuzzyEngine {
    /// Create a new FuzzyEngine with default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Up to `limit` candidates scoring at least `cutoff`, best first.
    ///
    /// Equal scores keep the order in which candidates were supplied.
    pub fn close_matches<I, S>(
        &self,
        query: &str,
        candidates: I,
        limit: usize,
        cutoff: f64,
    ) -> Vec<FuzzyMatch>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if limit == 0 {
            return Vec::new();
        }

        let metric = self.config.metric;
        let mut matches: Vec<FuzzyMatch> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let candidate = candidate.as_ref();
                let score = metric.score(candidate, query);
                (score >= cutoff)
                    .then(|| FuzzyMatch::new(candidate.to_string(), score, metric.name()))
            })
            .collect();

        // Stable sort, so ties stay in encounter order
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(limit);
        matches
    }

    /// The single closest candidate clearing the configured cutoff
    pub fn best_match<I, S>(&self, query: &str, candidates: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let best = self
            .close_matches(query, candidates, 1, self.config.cutoff)
            .into_iter()
            .next();

        match &best {
            Some(m) => debug!(query, matched = %m.value, score = m.score, "fuzzy match"),
            None => debug!(query, cutoff = self.config.cutoff, "no fuzzy match"),
        }
        best.map(|m| m.value)
    }
}
