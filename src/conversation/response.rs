//! Outbound payload of a chat turn

use crate::conversation::session::SessionAnalytics;
use crate::conversation::state::Step;
use crate::output::report::FinalReport;
use crate::processing::answer_scorer::AnswerAnalysis;
use crate::processing::matcher::MatchResult;
use crate::processing::skill_extractor::SkillProfile;
use crate::processing::text_processor::Sentiment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResult {
    /// Markdown-flavoured text: `**bold**` and `• ` bullets
    pub response: String,
    pub quick_replies: Vec<String>,
    pub step: Step,
    pub visualizations: Vec<Visualization>,
    pub analytics: AnalyticsSnapshot,
    /// UI hint to simulate typing before showing the response
    pub typing: bool,
}

/// Typed payload the presentation layer knows how to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Visualization {
    Progress {
        current: usize,
        total: usize,
        steps: Vec<String>,
    },
    StepIndicator {
        current: usize,
        total: usize,
        title: String,
    },
    CvAnalysis(SkillProfile),
    MatchingResults(MatchResult),
    InterviewProgress {
        current: usize,
        total: usize,
    },
    AnswerFeedback(AnswerAnalysis),
    FinalResults(FinalReport),
    DetailedAnalysis(FinalReport),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_messages: u64,
    pub sentiment_history: Vec<Sentiment>,
    pub topics_discussed: Vec<String>,
    /// Milliseconds since the current conversation started
    pub session_duration: i64,
}

impl From<&SessionAnalytics> for AnalyticsSnapshot {
    fn from(analytics: &SessionAnalytics) -> Self {
        Self {
            total_messages: analytics.total_messages,
            sentiment_history: analytics.sentiment_history.clone(),
            topics_discussed: analytics.topics_discussed.clone(),
            session_duration: analytics.session_duration_ms,
        }
    }
}

impl Visualization {
    pub fn kind(&self) -> &'static str {
        match self {
            Visualization::Progress { .. } => "progress",
            Visualization::StepIndicator { .. } => "step_indicator",
            Visualization::CvAnalysis(_) => "cv_analysis",
            Visualization::MatchingResults(_) => "matching_results",
            Visualization::InterviewProgress { .. } => "interview_progress",
            Visualization::AnswerFeedback(_) => "answer_feedback",
            Visualization::FinalResults(_) => "final_results",
            Visualization::DetailedAnalysis(_) => "detailed_analysis",
        }
    }

    pub fn step_indicator(current: usize, title: &str) -> Self {
        Visualization::StepIndicator {
            current,
            total: 3,
            title: title.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visualization_is_type_data_pair() {
        let json = serde_json::to_value(Visualization::step_indicator(1, "Analyse CV")).unwrap();
        assert_eq!(json["type"], "step_indicator");
        assert_eq!(json["data"]["current"], 1);
        assert_eq!(json["data"]["total"], 3);
        assert_eq!(json["data"]["title"], "Analyse CV");
    }

    #[test]
    fn test_chat_result_uses_camel_case() {
        let result = ChatResult {
            response: "ok".to_string(),
            quick_replies: vec!["a".to_string()],
            step: Step::Greeting,
            visualizations: Vec::new(),
            analytics: AnalyticsSnapshot::default(),
            typing: true,
        };
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["quickReplies"][0], "a");
        assert_eq!(json["step"], "greeting");
        assert_eq!(json["analytics"]["totalMessages"], 0);
        assert_eq!(json["typing"], true);
    }
}
