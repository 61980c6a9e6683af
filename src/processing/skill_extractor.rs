//! Skill, experience and education extraction from CVs and job descriptions

use crate::config::VocabularyConfig;
use crate::error::{InterviewerError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Extracts structured signals from free text using the configured vocabularies
pub struct SkillExtractor {
    skill_matcher: AhoCorasick,
    skill_patterns: Vec<String>,
    categories: Vec<(String, Vec<String>)>,
    experience_regex: Regex,
    education_regex: Option<Regex>,
    education_terms: Vec<String>,
}

/// Signals derived from a block of free text (a CV or a job description)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProfile {
    pub skills: Vec<String>,
    pub experience_years: u32,
    pub education: Vec<String>,
    pub level: SeniorityLevel,
    pub completeness: u8,
    pub categories: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeniorityLevel {
    Junior,
    #[serde(rename = "Mid-level")]
    MidLevel,
    Senior,
}

impl SeniorityLevel {
    pub fn from_years(years: u32) -> Self {
        match years {
            y if y >= 5 => SeniorityLevel::Senior,
            y if y >= 2 => SeniorityLevel::MidLevel,
            _ => SeniorityLevel::Junior,
        }
    }
}

impl fmt::Display for SeniorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeniorityLevel::Junior => write!(f, "Junior"),
            SeniorityLevel::MidLevel => write!(f, "Mid-level"),
            SeniorityLevel::Senior => write!(f, "Senior"),
        }
    }
}

impl SkillExtractor {
    /// Create an extractor with the default vocabularies
    pub fn new() -> Result<Self> {
        Self::from_vocabulary(&VocabularyConfig::default())
    }

    pub fn from_vocabulary(vocabulary: &VocabularyConfig) -> Result<Self> {
        let categories: Vec<(String, Vec<String>)> = vocabulary
            .skill_categories
            .iter()
            .map(|c| {
                let skills = c
                    .skills
                    .iter()
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                (c.name.clone(), skills)
            })
            .collect();

        let mut skill_patterns: Vec<String> = categories
            .iter()
            .flat_map(|(_, skills)| skills.iter().cloned())
            .collect();
        skill_patterns.sort();
        skill_patterns.dedup();

        // Overlapping search needs the standard match semantics
        let skill_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&skill_patterns)
            .map_err(|e| InterviewerError::Configuration(format!("Failed to build skill matcher: {}", e)))?;

        let experience_regex = Regex::new(r"(?i)(\d+)\s*(?:ans?|années?|years?|experience)")
            .map_err(|e| InterviewerError::Configuration(format!("Invalid experience pattern: {}", e)))?;

        let education_terms: Vec<String> = vocabulary
            .education
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let education_regex = if education_terms.is_empty() {
            None
        } else {
            let alternation = education_terms
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            let regex = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
                .map_err(|e| InterviewerError::Configuration(format!("Invalid education vocabulary: {}", e)))?;
            Some(regex)
        };

        Ok(Self {
            skill_matcher,
            skill_patterns,
            categories,
            experience_regex,
            education_regex,
            education_terms,
        })
    }

    /// Build the full profile of a text
    pub fn profile(&self, text: &str) -> SkillProfile {
        let skills = self.extract_skills(text);
        let experience_years = self.extract_experience_years(text);
        let education = self.extract_education(text);
        let categories = self.categorize(&skills);
        let completeness = completeness_score(skills.len(), experience_years);

        SkillProfile {
            level: SeniorityLevel::from_years(experience_years),
            skills,
            experience_years,
            education,
            completeness,
            categories,
        }
    }

    /// Known skills found in the text, lower-cased, in order of first appearance.
    ///
    /// At each position the longest skill whose edges sit on word boundaries
    /// wins, so "React Nativeapp" still yields "react".
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let mut candidates: Vec<(usize, usize, usize)> = self
            .skill_matcher
            .find_overlapping_iter(text)
            .filter(|mat| is_word_boundary(text, mat.start(), mat.end()))
            .map(|mat| (mat.start(), mat.end(), mat.pattern().as_usize()))
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut skills: Vec<String> = Vec::new();
        let mut covered_until = 0;
        for (start, end, pattern) in candidates {
            if start < covered_until {
                continue;
            }
            covered_until = end;
            let skill = &self.skill_patterns[pattern];
            if !skills.contains(skill) {
                skills.push(skill.clone());
            }
        }

        skills
    }

    /// Largest "<N> ans / années / years / experience" figure, 0 when absent
    pub fn extract_experience_years(&self, text: &str) -> u32 {
        self.experience_regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .filter_map(|m| m.as_str().parse::<u32>().ok())
            .max()
            .unwrap_or(0)
    }

    /// Degree keywords found in the text, using the vocabulary's spelling
    pub fn extract_education(&self, text: &str) -> Vec<String> {
        let Some(regex) = &self.education_regex else {
            return Vec::new();
        };

        let mut found: Vec<String> = Vec::new();
        for mat in regex.find_iter(text) {
            let matched = mat.as_str().to_lowercase();
            let canonical = self
                .education_terms
                .iter()
                .find(|t| t.to_lowercase() == matched)
                .cloned()
                .unwrap_or_else(|| mat.as_str().to_string());
            if !found.contains(&canonical) {
                found.push(canonical);
            }
        }
        found
    }

    /// Group skills by configured category; every category is present, possibly empty
    pub fn categorize(&self, skills: &[String]) -> BTreeMap<String, Vec<String>> {
        self.categories
            .iter()
            .map(|(name, members)| {
                let matched = skills
                    .iter()
                    .filter(|s| members.contains(*s))
                    .cloned()
                    .collect();
                (name.clone(), matched)
            })
            .collect()
    }
}

/// `min(100, skills*10 + years*5 + 20)`
pub fn completeness_score(skill_count: usize, experience_years: u32) -> u8 {
    let raw = skill_count as u64 * 10 + experience_years as u64 * 5 + 20;
    raw.min(100) as u8
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.map_or(false, is_word_char) && !after.map_or(false, is_word_char)
}
