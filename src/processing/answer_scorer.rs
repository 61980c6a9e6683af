//! Heuristic scoring of free-text interview answers

use crate::config::VocabularyConfig;
use crate::error::{InterviewerError, Result};
use crate::processing::questions::{InterviewQuestion, QuestionType};
use crate::processing::text_processor::{char_length, Sentiment};
use regex::Regex;
use serde::{Deserialize, Serialize};

const BASE_SCORE: f64 = 5.0;
const MAX_SCORE: f64 = 10.0;
const KEYWORD_BONUS: f64 = 0.5;
const ACCEPTANCE_BONUS: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerAnalysis {
    /// 0..=10
    pub score: f64,
    /// Number of distinct answer keywords present
    pub keywords: usize,
    pub length: usize,
    pub sentiment: Sentiment,
}

pub struct AnswerScorer {
    keywords: Vec<String>,
    acceptance: Option<Regex>,
}

impl AnswerScorer {
    pub fn new() -> Result<Self> {
        Self::from_vocabulary(&VocabularyConfig::default())
    }

    pub fn from_vocabulary(vocabulary: &VocabularyConfig) -> Result<Self> {
        let keywords: Vec<String> = vocabulary
            .answer_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let terms: Vec<String> = vocabulary
            .acceptance_terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(regex::escape)
            .collect();

        let acceptance = if terms.is_empty() {
            None
        } else {
            let pattern = format!(r"(?i)\b(?:{})\b", terms.join("|"));
            let regex = Regex::new(&pattern)
                .map_err(|e| InterviewerError::Configuration(format!("Invalid acceptance terms: {}", e)))?;
            Some(regex)
        };

        Ok(Self { keywords, acceptance })
    }

    pub fn analyze(&self, answer: &str, question: &InterviewQuestion) -> AnswerAnalysis {
        let length = char_length(answer);
        let lowered = answer.to_lowercase();

        let mut score = BASE_SCORE;
        if length > 50 {
            score += 1.0;
        }
        if length > 100 {
            score += 1.0;
        }

        let keywords = self.keywords.iter().filter(|k| lowered.contains(k.as_str())).count();
        score += keywords as f64 * KEYWORD_BONUS;

        if question.kind == QuestionType::TechnicalGap
            && self.acceptance.as_ref().map_or(false, |re| re.is_match(answer))
        {
            score += ACCEPTANCE_BONUS;
        }

        AnswerAnalysis {
            score: score.min(MAX_SCORE),
            keywords,
            length,
            sentiment: if length > 30 {
                Sentiment::Positive
            } else {
                Sentiment::Neutral
            },
        }
    }
}
