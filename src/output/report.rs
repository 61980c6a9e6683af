//! Final evaluation report assembled at the end of the interview

use crate::config::ScoringConfig;
use crate::conversation::session::ConversationStats;
use crate::conversation::state::InterviewProgress;
use crate::processing::matcher::clamp_percentage;
use crate::processing::text_processor::Sentiment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    /// Blend of matching and interview scores (0-100)
    pub final_score: u8,
    pub matching_score: u8,
    /// Average answer score scaled to 0-100
    pub interview_score: f64,
    /// Minutes since the conversation started
    pub duration: i64,
    pub message_count: u32,
    pub recommendation: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub sentiment: Sentiment,
}

impl FinalReport {
    pub fn assemble(
        interview: &InterviewProgress,
        stats: &ConversationStats,
        scoring: &ScoringConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let matching_score = interview.matching.overall_score;
        let interview_score = interview_score(interview.answer_scores());
        let final_score = final_score(matching_score, interview_score, scoring);

        Self {
            final_score,
            matching_score,
            interview_score,
            duration: duration_minutes(stats.started_at, now),
            message_count: stats.message_count,
            recommendation: recommendation(final_score).to_string(),
            strengths: identify_strengths(interview),
            improvements: identify_improvements(interview),
            sentiment: Sentiment::majority(&stats.sentiment_history),
        }
    }

    pub fn level(&self) -> &'static str {
        score_level(self.final_score)
    }
}

/// Mean answer score times 10, or 0 without answers
pub fn interview_score<I>(scores: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64 * 10.0
    }
}

pub fn final_score(matching_score: u8, interview_score: f64, scoring: &ScoringConfig) -> u8 {
    clamp_percentage(
        matching_score as f64 * scoring.matching_weight + interview_score * scoring.interview_weight,
    )
}

pub fn duration_minutes(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (now - started_at).num_seconds().max(0);
    (seconds as f64 / 60.0).round() as i64
}

pub fn identify_strengths(interview: &InterviewProgress) -> Vec<String> {
    let mut strengths = Vec::new();

    if interview.matching.skills_match > 70 {
        strengths.push("Excellente correspondance technique".to_string());
    }
    if interview.candidate.cv_analysis.experience_years >= 3 {
        strengths.push("Expérience professionnelle solide".to_string());
    }
    if interview.answer_scores().any(|s| s > 8.0) {
        strengths.push("Excellentes réponses aux questions".to_string());
    }

    if strengths.is_empty() {
        strengths.push("Motivation et engagement".to_string());
    }
    strengths
}

pub fn identify_improvements(interview: &InterviewProgress) -> Vec<String> {
    let mut improvements = Vec::new();

    if let Some(skill) = interview.matching.missing_skills.first() {
        improvements.push(format!("Développer les compétences en {}", skill));
    }
    if interview.matching.experience_match < 80 {
        improvements.push("Acquérir plus d'expérience dans le domaine".to_string());
    }
    if interview.answer_scores().any(|s| s < 6.0) {
        improvements.push("Préparer des exemples concrets pour les entretiens".to_string());
    }

    if improvements.is_empty() {
        improvements.push("Continuer à développer vos compétences".to_string());
    }
    improvements
}

pub fn recommendation(score: u8) -> &'static str {
    match score {
        80..=u8::MAX => "Candidature fortement recommandée. Votre profil correspond parfaitement aux exigences.",
        60..=79 => "Candidature recommandée avec quelques formations complémentaires.",
        _ => "Candidature possible après développement des compétences manquantes.",
    }
}

pub fn score_emoji(score: u8) -> &'static str {
    match score {
        90..=u8::MAX => "🌟",
        80..=89 => "🎯",
        70..=79 => "👍",
        60..=69 => "⚡",
        _ => "💪",
    }
}

pub fn score_level(score: u8) -> &'static str {
    match score {
        90..=u8::MAX => "Excellent",
        80..=89 => "Très bon",
        70..=79 => "Bon",
        60..=69 => "Satisfaisant",
        _ => "À améliorer",
    }
}

pub fn score_description(score: u8) -> &'static str {
    match score {
        80..=u8::MAX => "**Excellent profil !** Vous êtes un candidat très prometteur pour ce poste.",
        60..=79 => "**Bon profil** avec quelques points à améliorer.",
        _ => "**Profil à développer** - Plusieurs axes d'amélioration identifiés.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::state::{AnsweredQuestion, CandidateDossier};
    use crate::processing::answer_scorer::AnswerAnalysis;
    use crate::processing::matcher::MatchResult;
    use crate::processing::questions::{InterviewQuestion, QuestionType};
    use crate::processing::skill_extractor::SkillExtractor;
    use chrono::Duration;

    fn answered(score: f64) -> AnsweredQuestion {
        AnsweredQuestion {
            question: InterviewQuestion {
                question: "Question".to_string(),
                kind: QuestionType::Motivation,
                weight: 2,
            },
            answer: "Réponse".to_string(),
            analysis: AnswerAnalysis {
                score,
                keywords: 0,
                length: 7,
                sentiment: Sentiment::Neutral,
            },
        }
    }

    fn progress(overall: u8, skills_match: u8, experience_match: u8, scores: &[f64]) -> InterviewProgress {
        let extractor = SkillExtractor::new().unwrap();
        let answers: Vec<AnsweredQuestion> = scores.iter().map(|s| answered(*s)).collect();
        let questions = answers.iter().map(|a| a.question.clone()).collect();
        InterviewProgress {
            candidate: CandidateDossier {
                cv_text: String::new(),
                cv_analysis: extractor.profile("Python, 4 ans"),
            },
            job_text: String::new(),
            job_analysis: extractor.profile("Python, Docker, 6 ans"),
            matching: MatchResult {
                overall_score: overall,
                skills_match,
                experience_match,
                level_match: 70,
                matching_skills: vec!["python".to_string()],
                missing_skills: vec!["docker".to_string()],
            },
            questions,
            answers,
        }
    }

    #[test]
    fn test_four_answers_at_eight_with_matching_ninety() {
        let interview = progress(90, 80, 100, &[8.0, 8.0, 8.0, 8.0]);
        let stats = ConversationStats::new(Utc::now());

        let report = FinalReport::assemble(&interview, &stats, &ScoringConfig::default(), Utc::now());

        assert_eq!(report.interview_score, 80.0);
        assert_eq!(report.matching_score, 90);
        assert_eq!(report.final_score, 86);
        assert_eq!(report.level(), "Très bon");
        assert!(report.recommendation.starts_with("Candidature fortement"));
    }

    #[test]
    fn test_interview_score_without_answers() {
        assert_eq!(interview_score(Vec::new()), 0.0);
        assert_eq!(interview_score(vec![5.0, 7.0]), 60.0);
    }

    #[test]
    fn test_strengths_and_fallbacks() {
        let strong = progress(90, 80, 100, &[9.0, 7.0]);
        assert_eq!(
            identify_strengths(&strong),
            vec![
                "Excellente correspondance technique",
                "Expérience professionnelle solide",
                "Excellentes réponses aux questions",
            ]
        );

        let mut weak = progress(40, 50, 100, &[7.0]);
        weak.candidate.cv_analysis.experience_years = 1;
        assert_eq!(identify_strengths(&weak), vec!["Motivation et engagement"]);
    }

    #[test]
    fn test_improvements_and_fallbacks() {
        let interview = progress(50, 50, 60, &[5.0]);
        assert_eq!(
            identify_improvements(&interview),
            vec![
                "Développer les compétences en docker",
                "Acquérir plus d'expérience dans le domaine",
                "Préparer des exemples concrets pour les entretiens",
            ]
        );

        let mut clean = progress(90, 100, 100, &[7.0]);
        clean.matching.missing_skills.clear();
        assert_eq!(identify_improvements(&clean), vec!["Continuer à développer vos compétences"]);
    }

    #[test]
    fn test_overall_sentiment_and_duration() {
        let start = Utc::now() - Duration::seconds(150);
        let mut stats = ConversationStats::new(start);
        stats.sentiment_history = vec![Sentiment::Negative, Sentiment::Negative, Sentiment::Positive];

        let report = FinalReport::assemble(
            &progress(70, 70, 70, &[6.0]),
            &stats,
            &ScoringConfig::default(),
            start + Duration::seconds(150),
        );
        assert_eq!(report.sentiment, Sentiment::Negative);
        // 2.5 minutes rounds up
        assert_eq!(report.duration, 3);
    }

    #[test]
    fn test_score_labels() {
        assert_eq!(score_emoji(95), "🌟");
        assert_eq!(score_emoji(60), "⚡");
        assert_eq!(score_emoji(12), "💪");
        assert_eq!(score_level(75), "Bon");
        assert_eq!(recommendation(60), "Candidature recommandée avec quelques formations complémentaires.");
        assert!(score_description(59).contains("Profil à développer"));
    }
}
