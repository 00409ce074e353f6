//! Sentiment Scorer.
//!
//! Turns a short ordered list of headlines into one score in [-1, 1]. Only
//! the first `max_headlines` entries are used, in the order given; the score
//! is the mean of the per-headline compound polarities, and an empty list
//! scores a neutral 0.0.

pub mod analyzer;
pub mod lexicon;

use serde::{Deserialize, Serialize};

pub use analyzer::LexiconAnalyzer;
pub use lexicon::Lexicon;

/// Headlines considered per symbol when no limit is configured.
pub const DEFAULT_MAX_HEADLINES: usize = 5;

/// Score returned when there is nothing to score.
pub const NEUTRAL_SENTIMENT: f64 = 0.0;

/// A pure per-text polarity function returning a compound score in [-1, 1].
pub trait PolarityModel: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// Aggregate sentiment for one symbol plus the per-headline scores behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub score: f64,
    pub headlines_used: usize,
    pub headline_scores: Vec<f64>,
}

impl SentimentSummary {
    pub fn neutral() -> Self {
        Self {
            score: NEUTRAL_SENTIMENT,
            headlines_used: 0,
            headline_scores: Vec::new(),
        }
    }
}

/// Score headlines with the built-in lexicon analyzer.
pub fn score_sentiment<S: AsRef<str>>(headlines: &[S], max_headlines: usize) -> f64 {
    score_headlines(&LexiconAnalyzer::new(), headlines, max_headlines).score
}

/// Score headlines with any polarity model.
pub fn score_headlines<S: AsRef<str>>(
    model: &dyn PolarityModel,
    headlines: &[S],
    max_headlines: usize,
) -> SentimentSummary {
    let headline_scores: Vec<f64> = headlines
        .iter()
        .take(max_headlines)
        .map(|h| model.polarity(h.as_ref()).clamp(-1.0, 1.0))
        .collect();

    if headline_scores.is_empty() {
        return SentimentSummary::neutral();
    }

    let score = headline_scores.iter().sum::<f64>() / headline_scores.len() as f64;
    SentimentSummary {
        score,
        headlines_used: headline_scores.len(),
        headline_scores,
    }
}
