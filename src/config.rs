//! Configuration management for the interviewer

use crate::error::{InterviewerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vocabulary: VocabularyConfig,
    pub interview: InterviewConfig,
    pub scoring: ScoringConfig,
    pub sessions: SessionConfig,
    pub output: OutputConfig,
}

/// Static lookup tables used by every text extractor.
///
/// Terms are matched case-insensitively; they are lower-cased once when the
/// extractors are built, so the file may use any casing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub education: Vec<String>,
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    pub topics: Vec<String>,
    pub answer_keywords: Vec<String>,
    pub acceptance_terms: Vec<String>,
    pub commands: CommandKeywords,
    pub skill_categories: Vec<SkillCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

/// Keywords that trigger conversation transitions (substring match on the lower-cased message)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandKeywords {
    pub greeting: Vec<String>,
    pub start: Vec<String>,
    pub example: Vec<String>,
    pub restart: Vec<String>,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    /// CV texts must be strictly longer than this many characters
    pub min_cv_length: usize,
    /// Job descriptions must be strictly longer than this many characters
    pub min_job_length: usize,
    pub max_questions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub skills_weight: f64,
    pub experience_weight: f64,
    pub level_weight: f64,
    pub level_mismatch_score: u8,
    pub matching_weight: f64,
    pub interview_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle sessions older than this are evicted; `None` keeps them forever
    pub idle_ttl_minutes: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub typing_delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn category(name: &str, skills: &[&str]) -> SkillCategory {
    SkillCategory {
        name: name.to_string(),
        skills: words(skills),
    }
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            education: words(&[
                "Master", "Licence", "Bac", "Doctorat", "PhD", "Ingénieur", "DUT", "BTS", "MBA",
            ]),
            positive_words: words(&["bon", "bien", "excellent", "parfait", "super", "génial", "merci"]),
            negative_words: words(&["mauvais", "difficile", "problème", "erreur", "non", "pas"]),
            topics: words(&["javascript", "python", "react", "node", "sql", "docker", "aws"]),
            answer_keywords: words(&[
                "expérience", "projet", "équipe", "réussi", "appris", "développé", "créé", "géré",
                "optimisé",
            ]),
            acceptance_terms: words(&["oui", "expérience", "projet", "utilisé", "maîtrise", "formation"]),
            commands: CommandKeywords::default(),
            skill_categories: vec![
                category(
                    "programming",
                    &[
                        "python", "java", "javascript", "typescript", "php", "c++", "c#", "ruby",
                        "swift", "kotlin",
                    ],
                ),
                category(
                    "frameworks",
                    &["react", "angular", "vue", "node.js", "django", "flask", "flutter", "react native"],
                ),
                category("databases", &["sql", "mongodb", "postgresql", "mysql"]),
                category("cloud", &["aws", "azure", "gcp", "docker", "kubernetes"]),
                category(
                    "design",
                    &["figma", "adobe", "photoshop", "illustrator", "sketch", "invision", "zeplin"],
                ),
                category(
                    "management",
                    &["jira", "confluence", "agile", "scrum", "kanban", "trello", "slack"],
                ),
                category(
                    "data",
                    &["tensorflow", "pytorch", "scikit-learn", "pandas", "numpy", "matplotlib"],
                ),
                category("tools", &["git", "linux"]),
            ],
        }
    }
}

impl Default for CommandKeywords {
    fn default() -> Self {
        Self {
            greeting: words(&["bonjour", "commencer"]),
            start: words(&["commencer", "commençons"]),
            example: words(&["exemple"]),
            restart: words(&["nouvelle", "recommencer"]),
            details: words(&["détails"]),
        }
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            min_cv_length: 100,
            min_job_length: 100,
            max_questions: 4,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            skills_weight: 0.5,
            experience_weight: 0.3,
            level_weight: 0.2,
            level_mismatch_score: 70,
            matching_weight: 0.6,
            interview_weight: 0.4,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_minutes: Some(120),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            typing_delay_ms: 400,
        }
    }
}

impl Config {
    /// Load the configuration from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load the configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            InterviewerError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| InterviewerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-interviewer")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let commands = &self.vocabulary.commands;
        for (name, list) in [
            ("greeting", &commands.greeting),
            ("start", &commands.start),
            ("example", &commands.example),
            ("restart", &commands.restart),
            ("details", &commands.details),
        ] {
            if list.iter().all(|k| k.trim().is_empty()) {
                return Err(InterviewerError::Configuration(format!(
                    "vocabulary.commands.{} needs at least one keyword",
                    name
                )));
            }
        }

        let scoring = &self.scoring;
        let weights = [
            scoring.skills_weight,
            scoring.experience_weight,
            scoring.level_weight,
            scoring.matching_weight,
            scoring.interview_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(InterviewerError::Configuration(
                "scoring weights must be finite and non-negative".to_string(),
            ));
        }
        if scoring.level_mismatch_score > 100 {
            return Err(InterviewerError::Configuration(
                "scoring.level_mismatch_score must be within 0..=100".to_string(),
            ));
        }

        if self.interview.max_questions == 0 {
            return Err(InterviewerError::Configuration(
                "interview.max_questions must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
