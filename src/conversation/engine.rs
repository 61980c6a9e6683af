//! Conversation engine: one inbound message in, one `ChatResult` out

use crate::config::Config;
use crate::conversation::messages::{self, Reply};
use crate::conversation::response::{AnalyticsSnapshot, ChatResult};
use crate::conversation::session::{ConversationStats, Session, SessionRecord};
use crate::conversation::state::{
    AnsweredQuestion, CandidateDossier, CompletedEvaluation, ConversationState, InterviewProgress,
};
use crate::conversation::store::{InMemorySessionStore, SessionStore};
use crate::error::{InterviewerError, Result};
use crate::output::report::FinalReport;
use crate::processing::answer_scorer::AnswerScorer;
use crate::processing::matcher::{KeywordMatchScorer, MatchScorer};
use crate::processing::questions::generate_questions;
use crate::processing::skill_extractor::SkillExtractor;
use crate::processing::text_processor::{char_length, lowercase_set, TextProcessor};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct ConversationEngine {
    config: Config,
    store: Arc<dyn SessionStore>,
    text_processor: TextProcessor,
    skill_extractor: SkillExtractor,
    answer_scorer: AnswerScorer,
    match_scorer: Box<dyn MatchScorer>,
    commands: Commands,
    session_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// Lower-cased command keywords, matched as substrings of the lower-cased message
struct Commands {
    greeting: Vec<String>,
    start: Vec<String>,
    example: Vec<String>,
    restart: Vec<String>,
    details: Vec<String>,
}

impl Commands {
    fn from_config(config: &Config) -> Self {
        let commands = &config.vocabulary.commands;
        let lowered = |words: &[String]| lowercase_set(words).into_iter().collect::<Vec<_>>();

        Self {
            greeting: lowered(&commands.greeting),
            start: lowered(&commands.start),
            example: lowered(&commands.example),
            restart: lowered(&commands.restart),
            details: lowered(&commands.details),
        }
    }
}

fn mentions(message: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| message.contains(k.as_str()))
}

impl ConversationEngine {
    /// Engine backed by the in-memory store configured in `config.sessions`
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(InMemorySessionStore::with_ttl_minutes(config.sessions.idle_ttl_minutes));
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn SessionStore>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            text_processor: TextProcessor::new(&config.vocabulary),
            skill_extractor: SkillExtractor::from_vocabulary(&config.vocabulary)?,
            answer_scorer: AnswerScorer::from_vocabulary(&config.vocabulary)?,
            match_scorer: Box::new(KeywordMatchScorer::new(&config.scoring)),
            commands: Commands::from_config(&config),
            session_locks: Mutex::new(HashMap::new()),
            store,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Swap the matching strategy without touching the conversation flow
    pub fn with_match_scorer(mut self, scorer: Box<dyn MatchScorer>) -> Self {
        info!("Using match scorer: {}", scorer.name());
        self.match_scorer = scorer;
        self
    }

    /// Process one message for `session_id`, creating the session on first contact.
    ///
    /// Messages for the same session are handled one at a time; the session
    /// is loaded, transitioned and saved under its lock. Blank inputs are
    /// rejected before anything is read or written.
    pub async fn send_message(&self, session_id: &str, message: &str) -> Result<ChatResult> {
        if session_id.trim().is_empty() {
            return Err(InterviewerError::MissingField("sessionId"));
        }
        if message.trim().is_empty() {
            return Err(InterviewerError::MissingField("message"));
        }

        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let now = Utc::now();
        let mut record = match self.store.get(session_id).await? {
            Some(record) => record,
            None => {
                self.store.purge_expired(now).await?;
                info!("Starting session {}", session_id);
                SessionRecord::new(session_id, now)
            }
        };

        let signals = self.text_processor.analyze_message(message);
        record.session.stats.record(&signals);

        let previous = record.session.state.step();
        let reply = self.transition(&mut record.session, message, now);
        let step = record.session.state.step();
        debug!(
            "Session {}: {} -> {} ({} chars)",
            session_id, previous, step, signals.length
        );

        record
            .analytics
            .record(&signals, record.session.stats.started_at, now);
        record.last_active = now;

        let result = ChatResult {
            response: reply.response,
            quick_replies: reply.quick_replies,
            step,
            visualizations: reply.visualizations,
            analytics: AnalyticsSnapshot::from(&record.analytics),
            typing: true,
        };

        self.store.put(record).await?;
        Ok(result)
    }

    /// Current record of a session, if it exists and has not expired
    pub async fn session(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        self.store.get(session_id).await
    }

    pub async fn end_session(&self, session_id: &str) -> Result<()> {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;
        self.store.delete(session_id).await?;
        info!("Ended session {}", session_id);
        Ok(())
    }

    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.session_locks.lock().await;
        // Entries only referenced by the map have no waiter left
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Apply one message to a session, returning the reply to emit
    pub fn transition(&self, session: &mut Session, message: &str, now: DateTime<Utc>) -> Reply {
        let lowered = message.to_lowercase();
        let state = std::mem::take(&mut session.state);

        let (next, reply) = match state {
            ConversationState::Greeting => {
                if mentions(&lowered, &self.commands.greeting) {
                    (ConversationState::WaitingStart, messages::welcome())
                } else {
                    (ConversationState::Greeting, messages::greeting_prompt())
                }
            }
            ConversationState::WaitingStart => {
                if mentions(&lowered, &self.commands.start) {
                    (ConversationState::CollectingCv, messages::cv_prompt())
                } else if mentions(&lowered, &self.commands.example) {
                    (ConversationState::WaitingStart, messages::example_explanation())
                } else {
                    (ConversationState::WaitingStart, messages::capabilities())
                }
            }
            ConversationState::CollectingCv => self.collect_cv(message),
            ConversationState::CollectingJob(candidate) => self.collect_job(candidate, message),
            ConversationState::Interview(progress) => {
                self.record_answer(progress, &session.stats, message, now)
            }
            ConversationState::Completed(done) => {
                if mentions(&lowered, &self.commands.restart) {
                    info!("Restarting evaluation");
                    *session = Session::restarted(now);
                    return messages::restarted();
                } else if mentions(&lowered, &self.commands.details) {
                    let reply = messages::detailed_report(&done.final_results);
                    (ConversationState::Completed(done), reply)
                } else {
                    (ConversationState::Completed(done), messages::completed_menu())
                }
            }
        };

        session.state = next;
        reply
    }

    fn collect_cv(&self, message: &str) -> (ConversationState, Reply) {
        if char_length(message) <= self.config.interview.min_cv_length {
            return (ConversationState::CollectingCv, messages::cv_too_short());
        }

        let profile = self.skill_extractor.profile(message);
        debug!(
            "CV profile: {} skills, {} years",
            profile.skills.len(),
            profile.experience_years
        );
        let reply = messages::cv_accepted(&profile);

        let dossier = CandidateDossier {
            cv_text: message.to_string(),
            cv_analysis: profile,
        };
        (ConversationState::CollectingJob(dossier), reply)
    }

    fn collect_job(&self, candidate: CandidateDossier, message: &str) -> (ConversationState, Reply) {
        if char_length(message) <= self.config.interview.min_job_length {
            return (ConversationState::CollectingJob(candidate), messages::job_incomplete());
        }

        let job = self.skill_extractor.profile(message);
        let matching = self.match_scorer.score(&candidate.cv_analysis, &job);
        let questions = generate_questions(
            &candidate.cv_analysis,
            &job,
            &matching,
            self.config.interview.max_questions,
        );
        debug!(
            "Matching score {} with {} questions",
            matching.overall_score,
            questions.len()
        );
        let reply = messages::job_matched(&matching, &questions);

        let progress = InterviewProgress {
            candidate,
            job_text: message.to_string(),
            job_analysis: job,
            matching,
            questions,
            answers: Vec::new(),
        };
        (ConversationState::Interview(progress), reply)
    }

    fn record_answer(
        &self,
        mut progress: InterviewProgress,
        stats: &ConversationStats,
        message: &str,
        now: DateTime<Utc>,
    ) -> (ConversationState, Reply) {
        let question = match progress.current_question() {
            Some(question) => question.clone(),
            None => return (ConversationState::Interview(progress), messages::fallback()),
        };

        let analysis = self.answer_scorer.analyze(message, &question);
        progress.answers.push(AnsweredQuestion {
            question,
            answer: message.to_string(),
            analysis: analysis.clone(),
        });

        match progress.current_question().cloned() {
            Some(next) => {
                let reply = messages::answer_recorded(
                    &analysis,
                    progress.current_question_index(),
                    progress.questions.len(),
                    &next,
                );
                (ConversationState::Interview(progress), reply)
            }
            None => {
                let report = FinalReport::assemble(&progress, stats, &self.config.scoring, now);
                info!(
                    "Evaluation completed: final score {} (matching {}, interview {:.1})",
                    report.final_score, report.matching_score, report.interview_score
                );
                let reply = messages::final_report(&report);
                let done = CompletedEvaluation {
                    interview: progress,
                    final_results: report,
                };
                (ConversationState::Completed(done), reply)
            }
        }
    }
}
