//! Rule-based polarity for a single headline.
//!
//! Token valences come from the [`Lexicon`]; the rules adjust them for
//! boosters, negation, capitalization, contrastive "but" and exclamation
//! marks, and the summed valence is squashed into a compound score in [-1, 1].

use super::lexicon::{is_negation, Lexicon, CAPS_INCREMENT};
use super::PolarityModel;

const NEGATION_SCALAR: f64 = -0.74;
const NORMALIZATION_ALPHA: f64 = 15.0;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCREMENT: f64 = 0.18;
const QUESTION_CAP: f64 = 0.96;

/// Lexicon-and-rules polarity scorer. Stateless across calls.
#[derive(Debug, Clone, Default)]
pub struct LexiconAnalyzer {
    lexicon: Lexicon,
}

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Signed boost contributed by the token at `j` toward a word of valence `valence`.
    fn booster_shift(&self, token: &str, lower: &str, valence: f64, caps_differ: bool) -> f64 {
        let Some(weight) = self.lexicon.booster(lower) else {
            return 0.0;
        };
        let mut shift = if valence < 0.0 { -weight } else { weight };
        if caps_differ && is_all_caps(token) {
            shift += if valence > 0.0 {
                CAPS_INCREMENT
            } else {
                -CAPS_INCREMENT
            };
        }
        shift
    }

    fn token_valences(&self, tokens: &[&str], lower: &[String]) -> Vec<f64> {
        let caps_differ = caps_differ(tokens);
        let mut valences = vec![0.0; tokens.len()];

        for i in 0..tokens.len() {
            // Boosters modify their neighbours and carry no valence of their own.
            if self.lexicon.booster(&lower[i]).is_some() {
                continue;
            }
            let Some(mut valence) = self.lexicon.valence(&lower[i]) else {
                continue;
            };

            if caps_differ && is_all_caps(tokens[i]) {
                valence += CAPS_INCREMENT * valence.signum();
            }

            for back in 0..3 {
                if i <= back {
                    break;
                }
                let j = i - back - 1;
                if self.lexicon.valence(&lower[j]).is_some() {
                    continue;
                }
                let mut shift = self.booster_shift(tokens[j], &lower[j], valence, caps_differ);
                match back {
                    1 => shift *= 0.95,
                    2 => shift *= 0.9,
                    _ => {}
                }
                valence += shift;
                if is_negation(&lower[j]) {
                    valence *= NEGATION_SCALAR;
                }
            }

            valences[i] = valence;
        }

        if let Some(pivot) = lower.iter().position(|w| w == "but") {
            for (i, v) in valences.iter_mut().enumerate() {
                if i < pivot {
                    *v *= 0.5;
                } else if i > pivot {
                    *v *= 1.5;
                }
            }
        }

        valences
    }
}

impl PolarityModel for LexiconAnalyzer {
    fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return 0.0;
        }
        let lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        let mut sum: f64 = self.token_valences(&tokens, &lower).iter().sum();
        if sum == 0.0 {
            return 0.0;
        }

        let emphasis = punctuation_emphasis(text);
        if sum > 0.0 {
            sum += emphasis;
        } else {
            sum -= emphasis;
        }

        normalize(sum)
    }
}

/// Split on whitespace, trim surrounding punctuation, drop single characters.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| t.chars().count() > 1)
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    let mut letters = token.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| c.is_uppercase())
}

/// True when some, but not all, tokens are shouted.
fn caps_differ(tokens: &[&str]) -> bool {
    let shouted = tokens.iter().filter(|t| is_all_caps(t)).count();
    shouted > 0 && shouted < tokens.len()
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let mut emphasis = exclamations as f64 * EXCLAMATION_INCREMENT;

    let questions = text.matches('?').count();
    if questions > 1 {
        emphasis += if questions <= 3 {
            questions as f64 * QUESTION_INCREMENT
        } else {
            QUESTION_CAP
        };
    }
    emphasis
}

/// Map an unbounded valence sum into [-1, 1].
pub fn normalize(score: f64) -> f64 {
    let norm = score / (score * score + NORMALIZATION_ALPHA).sqrt();
    norm.clamp(-1.0, 1.0)
}
