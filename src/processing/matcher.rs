//! Candidate / job comparison

use crate::config::ScoringConfig;
use crate::processing::skill_extractor::SkillProfile;
use serde::{Deserialize, Serialize};

/// Comparison between a candidate profile and a job profile, all scores in 0..=100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub overall_score: u8,
    pub skills_match: u8,
    pub experience_match: u8,
    pub level_match: u8,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Pluggable scoring strategy, so a model-backed scorer can replace the keyword one
pub trait MatchScorer: Send + Sync {
    fn score(&self, candidate: &SkillProfile, job: &SkillProfile) -> MatchResult;

    fn name(&self) -> &str;
}

/// Keyword overlap, experience ratio and seniority comparison
#[derive(Debug, Clone)]
pub struct KeywordMatchScorer {
    skills_weight: f64,
    experience_weight: f64,
    level_weight: f64,
    level_mismatch_score: u8,
}

impl Default for KeywordMatchScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl KeywordMatchScorer {
    pub fn new(scoring: &ScoringConfig) -> Self {
        Self {
            skills_weight: scoring.skills_weight,
            experience_weight: scoring.experience_weight,
            level_weight: scoring.level_weight,
            level_mismatch_score: scoring.level_mismatch_score.min(100),
        }
    }
}

impl MatchScorer for KeywordMatchScorer {
    fn score(&self, candidate: &SkillProfile, job: &SkillProfile) -> MatchResult {
        let skills_match = skills_match(&candidate.skills, &job.skills);
        let experience_match = experience_match(candidate.experience_years, job.experience_years);
        let level_match = if candidate.level == job.level {
            100
        } else {
            self.level_mismatch_score
        };

        let weighted = skills_match as f64 * self.skills_weight
            + experience_match as f64 * self.experience_weight
            + level_match as f64 * self.level_weight;

        MatchResult {
            overall_score: clamp_percentage(weighted),
            skills_match,
            experience_match,
            level_match,
            matching_skills: matching_skills(&candidate.skills, &job.skills),
            missing_skills: missing_skills(&candidate.skills, &job.skills),
        }
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Two skills correspond when either one contains the other
pub fn skills_correspond(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// Percentage of job skills found among the candidate's; 100 when the job lists none
pub fn skills_match(candidate: &[String], job: &[String]) -> u8 {
    if job.is_empty() {
        return 100;
    }
    let found = job
        .iter()
        .filter(|j| candidate.iter().any(|c| skills_correspond(c, j)))
        .count();
    clamp_percentage(found as f64 / job.len() as f64 * 100.0)
}

pub fn experience_match(candidate_years: u32, required_years: u32) -> u8 {
    if required_years == 0 || candidate_years >= required_years {
        return 100;
    }
    clamp_percentage(candidate_years as f64 / required_years as f64 * 100.0)
}

pub fn matching_skills(candidate: &[String], job: &[String]) -> Vec<String> {
    candidate
        .iter()
        .filter(|c| job.iter().any(|j| skills_correspond(c, j)))
        .cloned()
        .collect()
}

pub fn missing_skills(candidate: &[String], job: &[String]) -> Vec<String> {
    job.iter()
        .filter(|j| !candidate.iter().any(|c| skills_correspond(c, j)))
        .cloned()
        .collect()
}

pub(crate) fn clamp_percentage(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::skill_extractor::SkillExtractor;

    fn profile(skills: &[&str], years: u32) -> SkillProfile {
        let extractor = SkillExtractor::new().unwrap();
        let skills: Vec<String> = skills.iter().map(|s| s.to_string()).collect();
        SkillProfile {
            categories: extractor.categorize(&skills),
            completeness: 0,
            skills,
            experience_years: years,
            education: Vec::new(),
            level: crate::processing::skill_extractor::SeniorityLevel::from_years(years),
        }
    }

    #[test]
    fn test_no_overlap_reports_all_missing() {
        let scorer = KeywordMatchScorer::default();
        let result = scorer.score(&profile(&["react", "figma"], 3), &profile(&["python", "docker"], 3));

        assert_eq!(result.skills_match, 0);
        assert_eq!(result.missing_skills, vec!["python", "docker"]);
        assert!(result.matching_skills.is_empty());
        // 0*0.5 + 100*0.3 + 100*0.2
        assert_eq!(result.overall_score, 50);
    }

    #[test]
    fn test_partial_overlap() {
        let scorer = KeywordMatchScorer::default();
        let result = scorer.score(
            &profile(&["python", "react"], 1),
            &profile(&["python", "docker", "aws"], 5),
        );

        assert_eq!(result.skills_match, 33);
        assert_eq!(result.experience_match, 20);
        assert_eq!(result.level_match, 70);
        assert_eq!(result.matching_skills, vec!["python"]);
        assert_eq!(result.missing_skills, vec!["docker", "aws"]);
        // 33*0.5 + 20*0.3 + 70*0.2 = 36.5
        assert_eq!(result.overall_score, 37);
    }

    #[test]
    fn test_empty_job_requirements() {
        let scorer = KeywordMatchScorer::default();
        let result = scorer.score(&profile(&[], 0), &profile(&[], 0));

        assert_eq!(result.skills_match, 100);
        assert_eq!(result.experience_match, 100);
        assert_eq!(result.level_match, 100);
        assert_eq!(result.overall_score, 100);
    }

    #[test]
    fn test_containment_works_both_ways() {
        assert!(skills_correspond("react native", "react"));
        assert!(skills_correspond("react", "react native"));
        assert!(!skills_correspond("vue", "react"));

        let candidate = vec!["react native".to_string()];
        let job = vec!["react".to_string()];
        assert_eq!(skills_match(&candidate, &job), 100);
        assert!(missing_skills(&candidate, &job).is_empty());
    }

    #[test]
    fn test_scores_stay_in_range() {
        assert_eq!(experience_match(10, 3), 100);
        assert_eq!(experience_match(0, 3), 0);
        assert_eq!(experience_match(2, 3), 67);
        assert_eq!(clamp_percentage(250.0), 100);
        assert_eq!(clamp_percentage(-4.0), 0);
        assert_eq!(clamp_percentage(f64::NAN), 0);
    }
}
