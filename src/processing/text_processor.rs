//! Per-message text signals: tokenization, sentiment and topics

use crate::config::VocabularyConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    positive_words: HashSet<String>,
    negative_words: HashSet<String>,
    topics: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Signals extracted from a single inbound message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSignals {
    pub sentiment: Sentiment,
    pub topics: Vec<String>,
    pub length: usize,
}

impl Sentiment {
    /// Strict majority wins; ties are neutral
    pub fn from_counts(positive: usize, negative: usize) -> Self {
        if positive > negative {
            Sentiment::Positive
        } else if negative > positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// Majority vote over a history of labels, with the same tie rule as `from_counts`
    pub fn majority<'a, I>(history: I) -> Self
    where
        I: IntoIterator<Item = &'a Sentiment>,
    {
        let (positive, negative) = history.into_iter().fold((0, 0), |(p, n), s| match s {
            Sentiment::Positive => (p + 1, n),
            Sentiment::Negative => (p, n + 1),
            Sentiment::Neutral => (p, n),
        });
        Self::from_counts(positive, negative)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new(&VocabularyConfig::default())
    }
}

impl TextProcessor {
    pub fn new(vocabulary: &VocabularyConfig) -> Self {
        Self {
            positive_words: lowercase_set(&vocabulary.positive_words),
            negative_words: lowercase_set(&vocabulary.negative_words),
            topics: lowercase_set(&vocabulary.topics),
        }
    }

    /// Analyze one inbound chat message
    pub fn analyze_message(&self, message: &str) -> MessageSignals {
        let tokens = self.tokenize(message);

        MessageSignals {
            sentiment: self.sentiment(&tokens),
            topics: self.topics(&tokens),
            length: char_length(message),
        }
    }

    /// Lower-cased Unicode words, punctuation dropped
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        normalize_unicode(text)
            .unicode_words()
            .map(|word| word.to_lowercase())
            .collect()
    }

    /// Keyword-count vote between the positive and negative word lists
    pub fn sentiment(&self, tokens: &[String]) -> Sentiment {
        let positive = tokens.iter().filter(|t| self.positive_words.contains(*t)).count();
        let negative = tokens.iter().filter(|t| self.negative_words.contains(*t)).count();
        Sentiment::from_counts(positive, negative)
    }

    /// Tokens that are known tech topics; repeats are kept
    pub fn topics(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .filter(|t| self.topics.contains(*t))
            .cloned()
            .collect()
    }
}

/// Length in characters, which is what the length thresholds are expressed in
pub fn char_length(text: &str) -> usize {
    text.chars().count()
}

/// Fold typographic quotes and dashes onto their ASCII forms
pub fn normalize_unicode(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            _ => c,
        })
        .collect()
}

pub(crate) fn lowercase_set(words: &[String]) -> HashSet<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
