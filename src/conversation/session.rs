//! Session records kept by the store

use crate::conversation::state::ConversationState;
use crate::processing::text_processor::{MessageSignals, Sentiment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One conversation; replaced wholesale when the user starts a new evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub state: ConversationState,
    pub stats: ConversationStats,
}

/// Running counters of the current conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationStats {
    pub message_count: u32,
    pub started_at: DateTime<Utc>,
    pub sentiment_history: Vec<Sentiment>,
    pub topics_history: Vec<String>,
}

/// Counters over the whole lifetime of a session id, surviving resets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalytics {
    pub total_messages: u64,
    pub sentiment_history: Vec<Sentiment>,
    pub topics_discussed: Vec<String>,
    pub session_duration_ms: i64,
}

/// What the store keeps per session id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub session: Session,
    pub analytics: SessionAnalytics,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            state: ConversationState::default(),
            stats: ConversationStats::new(now),
        }
    }

    /// Fresh conversation positioned directly at CV collection
    pub fn restarted(now: DateTime<Utc>) -> Self {
        Self {
            state: ConversationState::CollectingCv,
            stats: ConversationStats::new(now),
        }
    }
}

impl ConversationStats {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            message_count: 0,
            started_at,
            sentiment_history: Vec::new(),
            topics_history: Vec::new(),
        }
    }

    pub fn record(&mut self, signals: &MessageSignals) {
        self.message_count += 1;
        self.sentiment_history.push(signals.sentiment);
        self.topics_history.extend(signals.topics.iter().cloned());
    }
}

impl SessionAnalytics {
    pub fn record(&mut self, signals: &MessageSignals, conversation_start: DateTime<Utc>, now: DateTime<Utc>) {
        self.total_messages += 1;
        self.sentiment_history.push(signals.sentiment);
        self.topics_discussed.extend(signals.topics.iter().cloned());
        self.session_duration_ms = (now - conversation_start).num_milliseconds().max(0);
    }
}

impl SessionRecord {
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            session: Session::new(now),
            analytics: SessionAnalytics::default(),
            last_active: now,
        }
    }
}
