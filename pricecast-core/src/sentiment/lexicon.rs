//! Valence lexicon for headline scoring.
//!
//! Valences use a -4..+4 scale. The built-in table covers general polarity
//! words plus market vocabulary that shows up in equity headlines.

use std::collections::HashMap;

/// Intensity step for booster and dampener words.
pub const BOOST_INCREMENT: f64 = 0.293;
/// Extra weight for an ALL-CAPS sentiment word in a mixed-case headline.
pub const CAPS_INCREMENT: f64 = 0.733;

const WORDS: &[(&str, f64)] = &[
    // strong positive
    ("soar", 2.6),
    ("soars", 2.6),
    ("soaring", 2.6),
    ("skyrocket", 2.8),
    ("skyrockets", 2.8),
    ("surge", 2.2),
    ("surges", 2.2),
    ("surging", 2.2),
    ("rally", 2.0),
    ("rallies", 2.0),
    ("record", 1.4),
    ("breakthrough", 2.5),
    ("excellent", 2.7),
    ("amazing", 2.8),
    ("outstanding", 3.0),
    ("great", 3.1),
    ("best", 3.2),
    ("beat", 1.6),
    ("beats", 1.6),
    ("boom", 2.1),
    ("booming", 2.3),
    ("win", 2.8),
    ("wins", 2.7),
    ("winning", 2.4),
    ("success", 2.7),
    ("successful", 2.8),
    ("triumph", 3.1),
    ("love", 3.2),
    ("bullish", 2.2),
    ("upgrade", 1.9),
    ("upgraded", 1.9),
    ("upgrades", 1.9),
    ("outperform", 2.0),
    ("outperforms", 2.0),
    // moderate positive
    ("gain", 2.4),
    ("gains", 1.8),
    ("good", 1.9),
    ("strong", 2.3),
    ("stronger", 1.9),
    ("growth", 1.6),
    ("grow", 1.3),
    ("grows", 1.3),
    ("growing", 1.3),
    ("profit", 1.9),
    ("profits", 1.9),
    ("profitable", 1.9),
    ("rise", 1.2),
    ("rises", 1.2),
    ("rising", 1.2),
    ("climb", 1.2),
    ("climbs", 1.2),
    ("jump", 1.4),
    ("jumps", 1.4),
    ("rebound", 1.5),
    ("rebounds", 1.5),
    ("recover", 1.4),
    ("recovers", 1.4),
    ("recovery", 1.4),
    ("optimistic", 2.2),
    ("optimism", 2.1),
    ("confident", 2.2),
    ("confidence", 2.3),
    ("positive", 2.6),
    ("improve", 1.9),
    ("improves", 1.9),
    ("improved", 2.1),
    ("innovative", 1.9),
    ("innovation", 1.6),
    ("opportunity", 1.8),
    ("opportunities", 1.6),
    ("support", 1.7),
    ("boost", 1.7),
    ("boosts", 1.7),
    ("top", 0.8),
    ("high", 0.6),
    ("higher", 0.6),
    ("upbeat", 1.9),
    ("robust", 1.7),
    ("stable", 1.2),
    ("buy", 0.9),
    ("dividend", 0.6),
    ("approve", 1.9),
    ("approved", 1.8),
    ("approval", 1.7),
    ("expand", 1.3),
    ("expands", 1.3),
    ("expansion", 1.3),
    ("like", 2.0),
    ("happy", 2.7),
    ("exciting", 2.2),
    ("excited", 1.4),
    ("favorable", 2.1),
    ("attractive", 1.9),
    ("solid", 1.4),
    // moderate negative
    ("fall", -1.2),
    ("falls", -1.2),
    ("falling", -1.3),
    ("drop", -1.1),
    ("drops", -1.1),
    ("decline", -1.3),
    ("declines", -1.3),
    ("declining", -1.4),
    ("slip", -1.0),
    ("slips", -1.0),
    ("slide", -1.2),
    ("slides", -1.2),
    ("down", -1.0),
    ("lower", -0.8),
    ("low", -1.1),
    ("weak", -1.9),
    ("weaker", -1.7),
    ("weakness", -1.8),
    ("miss", -1.3),
    ("misses", -1.3),
    ("missed", -1.4),
    ("loss", -1.3),
    ("losses", -1.7),
    ("lose", -1.7),
    ("loses", -1.7),
    ("losing", -1.6),
    ("concern", -1.4),
    ("concerns", -1.4),
    ("worry", -1.9),
    ("worries", -1.8),
    ("worried", -1.2),
    ("risk", -1.1),
    ("risks", -1.1),
    ("risky", -1.4),
    ("uncertain", -1.2),
    ("uncertainty", -1.4),
    ("volatile", -1.2),
    ("pressure", -1.2),
    ("cut", -1.1),
    ("cuts", -1.1),
    ("delay", -1.3),
    ("delays", -1.3),
    ("delayed", -1.2),
    ("recall", -1.3),
    ("recalls", -1.3),
    ("probe", -1.2),
    ("investigation", -1.1),
    ("lawsuit", -1.7),
    ("sued", -1.8),
    ("sue", -1.6),
    ("fine", 0.8),
    ("fined", -1.6),
    ("layoffs", -2.0),
    ("layoff", -2.0),
    ("downgrade", -1.8),
    ("downgraded", -1.8),
    ("downgrades", -1.8),
    ("underperform", -1.7),
    ("bearish", -1.9),
    ("sell", -0.6),
    ("selloff", -2.0),
    ("negative", -2.7),
    ("bad", -2.5),
    ("problem", -1.7),
    ("problems", -1.7),
    ("trouble", -1.7),
    ("struggle", -1.5),
    ("struggles", -1.5),
    ("struggling", -1.6),
    ("fear", -2.2),
    ("fears", -2.2),
    ("warn", -1.3),
    ("warns", -1.3),
    ("warning", -1.4),
    ("debt", -1.5),
    ("slump", -1.8),
    ("slumps", -1.8),
    ("tumble", -1.8),
    ("tumbles", -1.8),
    ("sink", -1.5),
    ("sinks", -1.5),
    ("shortage", -1.6),
    ("disappointing", -2.2),
    ("disappoint", -2.0),
    ("disappoints", -2.0),
    // strong negative
    ("crash", -2.6),
    ("crashes", -2.6),
    ("plunge", -2.3),
    ("plunges", -2.3),
    ("plummet", -2.6),
    ("plummets", -2.6),
    ("collapse", -2.6),
    ("collapses", -2.6),
    ("bankrupt", -2.6),
    ("bankruptcy", -2.6),
    ("fraud", -2.8),
    ("scandal", -2.4),
    ("crisis", -3.1),
    ("disaster", -3.1),
    ("catastrophe", -3.4),
    ("terrible", -2.1),
    ("horrible", -2.5),
    ("awful", -2.0),
    ("worst", -3.1),
    ("fail", -2.5),
    ("fails", -2.3),
    ("failed", -2.3),
    ("failure", -2.3),
    ("panic", -2.3),
    ("turmoil", -2.0),
    ("recession", -2.3),
    ("hate", -2.7),
    ("kill", -3.7),
    ("dead", -3.3),
];

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOST_INCREMENT),
    ("completely", BOOST_INCREMENT),
    ("deeply", BOOST_INCREMENT),
    ("enormously", BOOST_INCREMENT),
    ("especially", BOOST_INCREMENT),
    ("exceptionally", BOOST_INCREMENT),
    ("extremely", BOOST_INCREMENT),
    ("greatly", BOOST_INCREMENT),
    ("highly", BOOST_INCREMENT),
    ("hugely", BOOST_INCREMENT),
    ("incredibly", BOOST_INCREMENT),
    ("massive", BOOST_INCREMENT),
    ("massively", BOOST_INCREMENT),
    ("most", BOOST_INCREMENT),
    ("much", BOOST_INCREMENT),
    ("really", BOOST_INCREMENT),
    ("sharply", BOOST_INCREMENT),
    ("significantly", BOOST_INCREMENT),
    ("so", BOOST_INCREMENT),
    ("strongly", BOOST_INCREMENT),
    ("substantially", BOOST_INCREMENT),
    ("totally", BOOST_INCREMENT),
    ("very", BOOST_INCREMENT),
    ("almost", -BOOST_INCREMENT),
    ("barely", -BOOST_INCREMENT),
    ("hardly", -BOOST_INCREMENT),
    ("marginally", -BOOST_INCREMENT),
    ("modestly", -BOOST_INCREMENT),
    ("partly", -BOOST_INCREMENT),
    ("slightly", -BOOST_INCREMENT),
    ("somewhat", -BOOST_INCREMENT),
];

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "never", "no", "nobody", "none",
    "nope", "nor", "not", "nothing", "nowhere", "shouldnt", "wasnt", "werent", "without", "wont",
    "wouldnt",
];

/// Word valences, booster weights and negation words.
#[derive(Debug, Clone)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
    boosters: HashMap<String, f64>,
}

impl Lexicon {
    /// Built-in general + market vocabulary.
    pub fn new() -> Self {
        Self {
            valences: WORDS.iter().map(|(w, v)| (w.to_string(), *v)).collect(),
            boosters: BOOSTERS.iter().map(|(w, v)| (w.to_string(), *v)).collect(),
        }
    }

    /// Add or override a word valence. The word is stored lowercase.
    pub fn with_entry(mut self, word: &str, valence: f64) -> Self {
        self.valences.insert(word.to_lowercase(), valence);
        self
    }

    /// Valence of a lowercase token.
    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    /// Booster weight of a lowercase token (negative for dampeners).
    pub fn booster(&self, word: &str) -> Option<f64> {
        self.boosters.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a lowercase token negates what follows.
///
/// Apostrophes are stripped before lookup, and any `n't` contraction counts.
pub fn is_negation(word: &str) -> bool {
    if word.ends_with("n't") {
        return true;
    }
    let bare: String = word.chars().filter(|c| *c != '\'').collect();
    NEGATIONS.contains(&bare.as_str())
}
