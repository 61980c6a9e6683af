//! Personalized interview question generation

use crate::processing::matcher::MatchResult;
use crate::processing::skill_extractor::SkillProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Informational only; answers are not weighted by it
    pub weight: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    TechnicalGap,
    ExperienceGap,
    Motivation,
    Achievement,
}

/// Questions in priority order: skill gap, experience gap, motivation, achievement.
///
/// The last two are unconditional, so the result is never empty as long as
/// `max_questions` is at least 1.
pub fn generate_questions(
    candidate: &SkillProfile,
    job: &SkillProfile,
    matching: &MatchResult,
    max_questions: usize,
) -> Vec<InterviewQuestion> {
    let mut questions = Vec::with_capacity(4);

    if let Some(skill) = matching.missing_skills.first() {
        questions.push(InterviewQuestion {
            question: format!(
                "L'offre d'emploi mentionne {}. Avez-vous de l'expérience avec cette technologie ou êtes-vous prêt(e) à l'apprendre ?",
                skill
            ),
            kind: QuestionType::TechnicalGap,
            weight: 3,
        });
    }

    if candidate.experience_years < job.experience_years {
        questions.push(InterviewQuestion {
            question: "Ce poste demande plus d'expérience que ce que montre votre CV. Comment comptez-vous compenser cette différence ?".to_string(),
            kind: QuestionType::ExperienceGap,
            weight: 3,
        });
    }

    questions.push(InterviewQuestion {
        question: "Qu'est-ce qui vous motive le plus dans ce type de poste ?".to_string(),
        kind: QuestionType::Motivation,
        weight: 2,
    });
    questions.push(InterviewQuestion {
        question: "Décrivez un projet dont vous êtes particulièrement fier et votre rôle dans sa réussite.".to_string(),
        kind: QuestionType::Achievement,
        weight: 3,
    });

    questions.truncate(max_questions.max(1));
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::matcher::{KeywordMatchScorer, MatchScorer};
    use crate::processing::skill_extractor::SkillExtractor;

    fn scenario(cv: &str, job: &str) -> (SkillProfile, SkillProfile, MatchResult) {
        let extractor = SkillExtractor::new().unwrap();
        let candidate = extractor.profile(cv);
        let job = extractor.profile(job);
        let matching = KeywordMatchScorer::default().score(&candidate, &job);
        (candidate, job, matching)
    }

    #[test]
    fn test_gap_questions_come_first() {
        let (candidate, job, matching) = scenario(
            "Designer Figma, 1 an d'expérience",
            "Backend Python et Docker, 4 ans minimum",
        );
        let questions = generate_questions(&candidate, &job, &matching, 4);

        let kinds: Vec<QuestionType> = questions.iter().map(|q| q.kind).collect();
        assert_eq!(
            kinds,
            vec![
                QuestionType::TechnicalGap,
                QuestionType::ExperienceGap,
                QuestionType::Motivation,
                QuestionType::Achievement,
            ]
        );
        assert!(questions[0].question.contains("python"));
    }

    #[test]
    fn test_no_gaps_leaves_standard_questions() {
        let (candidate, job, matching) = scenario("Python, 6 ans", "Python, 3 ans");
        let questions = generate_questions(&candidate, &job, &matching, 4);

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].kind, QuestionType::Motivation);
        assert_eq!(questions[0].weight, 2);
        assert_eq!(questions[1].kind, QuestionType::Achievement);
    }

    #[test]
    fn test_limit_keeps_priority_order() {
        let (candidate, job, matching) = scenario("Figma, 1 an", "Python, 4 ans");
        let questions = generate_questions(&candidate, &job, &matching, 3);

        assert_eq!(questions.len(), 3);
        assert_eq!(questions[2].kind, QuestionType::Motivation);

        // a zero limit still yields one question
        assert_eq!(generate_questions(&candidate, &job, &matching, 0).len(), 1);
    }

    #[test]
    fn test_question_type_wire_names() {
        let json = serde_json::to_value(QuestionType::TechnicalGap).unwrap();
        assert_eq!(json, "technical_gap");
    }
}
