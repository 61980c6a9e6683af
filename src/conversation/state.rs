//! Conversation steps, one variant per step carrying only the data valid there

use crate::output::report::FinalReport;
use crate::processing::answer_scorer::AnswerAnalysis;
use crate::processing::matcher::MatchResult;
use crate::processing::questions::InterviewQuestion;
use crate::processing::skill_extractor::SkillProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public step name, as shown to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Greeting,
    WaitingStart,
    CollectingCv,
    CollectingJob,
    Interview,
    Completed,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Greeting => "greeting",
            Step::WaitingStart => "waiting_start",
            Step::CollectingCv => "collecting_cv",
            Step::CollectingJob => "collecting_job",
            Step::Interview => "interview",
            Step::Completed => "completed",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Greeting,
    WaitingStart,
    CollectingCv,
    CollectingJob(CandidateDossier),
    Interview(InterviewProgress),
    Completed(CompletedEvaluation),
}

/// The captured CV, immutable once accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDossier {
    pub cv_text: String,
    pub cv_analysis: SkillProfile,
}

/// Everything known once the job description has been matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewProgress {
    pub candidate: CandidateDossier,
    pub job_text: String,
    pub job_analysis: SkillProfile,
    pub matching: MatchResult,
    pub questions: Vec<InterviewQuestion>,
    pub answers: Vec<AnsweredQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question: InterviewQuestion,
    pub answer: String,
    pub analysis: AnswerAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedEvaluation {
    pub interview: InterviewProgress,
    pub final_results: FinalReport,
}

impl ConversationState {
    pub fn step(&self) -> Step {
        match self {
            ConversationState::Greeting => Step::Greeting,
            ConversationState::WaitingStart => Step::WaitingStart,
            ConversationState::CollectingCv => Step::CollectingCv,
            ConversationState::CollectingJob(_) => Step::CollectingJob,
            ConversationState::Interview(_) => Step::Interview,
            ConversationState::Completed(_) => Step::Completed,
        }
    }

    pub fn cv_analysis(&self) -> Option<&SkillProfile> {
        match self {
            ConversationState::CollectingJob(dossier) => Some(&dossier.cv_analysis),
            ConversationState::Interview(progress) => Some(&progress.candidate.cv_analysis),
            ConversationState::Completed(done) => Some(&done.interview.candidate.cv_analysis),
            _ => None,
        }
    }

    pub fn matching(&self) -> Option<&MatchResult> {
        match self {
            ConversationState::Interview(progress) => Some(&progress.matching),
            ConversationState::Completed(done) => Some(&done.interview.matching),
            _ => None,
        }
    }

    pub fn final_results(&self) -> Option<&FinalReport> {
        match self {
            ConversationState::Completed(done) => Some(&done.final_results),
            _ => None,
        }
    }
}

impl InterviewProgress {
    /// Cursor into `questions`; always equal to the number of answers
    pub fn current_question_index(&self) -> usize {
        self.answers.len()
    }

    pub fn current_question(&self) -> Option<&InterviewQuestion> {
        self.questions.get(self.current_question_index())
    }

    pub fn answer_scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.answers.iter().map(|a| a.analysis.score)
    }
}
