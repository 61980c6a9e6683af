//! One-shot evaluations from a CV and a job description, as run by `evaluate`

use crate::config::OutputFormat;
use crate::conversation::engine::ConversationEngine;
use crate::conversation::response::ChatResult;
use crate::conversation::state::Step;
use crate::error::{InterviewerError, Result};
use crate::output::formatter::ChatRenderer;
use async_trait::async_trait;
use log::debug;
use std::collections::VecDeque;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Supplies the candidate's answers during an evaluation
#[async_trait]
pub trait AnswerSource: Send {
    /// Answer to the question carried by `turn`
    async fn answer(&mut self, turn: &ChatResult) -> Result<String>;
}

/// Prepared answers first; once they run out, each question is written to
/// `prompts` and the answer is read from `input`.
pub struct PromptingAnswers<R, W> {
    prepared: VecDeque<String>,
    input: Lines<R>,
    prompts: W,
    renderer: ChatRenderer,
}

impl<R, W> PromptingAnswers<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(prepared: Vec<String>, input: R, prompts: W, renderer: ChatRenderer) -> Self {
        Self {
            prepared: prepared.into(),
            input: input.lines(),
            prompts,
            renderer,
        }
    }
}

#[async_trait]
impl<R, W> AnswerSource for PromptingAnswers<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn answer(&mut self, turn: &ChatResult) -> Result<String> {
        if let Some(answer) = self.prepared.pop_front() {
            return Ok(answer);
        }

        let prompt = self.renderer.render(turn, &OutputFormat::Console)?;
        writeln!(self.prompts, "{}", prompt)?;
        self.prompts.flush()?;

        loop {
            match self.input.next_line().await? {
                Some(line) if !line.trim().is_empty() => return Ok(line.trim().to_string()),
                Some(_) => continue,
                None => {
                    return Err(InterviewerError::InvalidInput(
                        "Not enough answers for the interview questions".to_string(),
                    ))
                }
            }
        }
    }
}

/// Drive a whole conversation for `session_id` and return the transcript,
/// from the CV analysis to the final report (plus the detailed report when
/// `detailed` is set).
pub async fn run_evaluation(
    engine: &ConversationEngine,
    session_id: &str,
    cv_text: &str,
    job_text: &str,
    detailed: bool,
    answers: &mut dyn AnswerSource,
) -> Result<Vec<ChatResult>> {
    let commands = &engine.config().vocabulary.commands;
    let mut transcript = Vec::new();

    engine.send_message(session_id, &first_keyword(&commands.greeting)).await?;
    engine.send_message(session_id, &first_keyword(&commands.start)).await?;

    let result = engine.send_message(session_id, cv_text).await?;
    if result.step != Step::CollectingJob {
        return Err(InterviewerError::InvalidInput("CV text is too short to analyze".to_string()));
    }
    transcript.push(result);

    let mut result = engine.send_message(session_id, job_text).await?;
    if result.step != Step::Interview {
        return Err(InterviewerError::InvalidInput("Job description is incomplete".to_string()));
    }

    while result.step == Step::Interview {
        let answer = answers.answer(&result).await?;
        transcript.push(result);
        result = engine.send_message(session_id, &answer).await?;
    }
    transcript.push(result);

    if detailed {
        let details = first_keyword(&commands.details);
        transcript.push(engine.send_message(session_id, &details).await?);
    }

    debug!("Evaluation {} finished after {} turns", session_id, transcript.len());
    Ok(transcript)
}

/// Write the transcript alone to `out`: one JSON array, or one rendered block per turn
pub fn write_transcript<W: Write>(
    out: &mut W,
    transcript: &[ChatResult],
    format: &OutputFormat,
    renderer: &ChatRenderer,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(transcript)?)?,
        OutputFormat::Console => {
            for turn in transcript {
                writeln!(out, "{}", renderer.render(turn, format)?)?;
            }
        }
    }
    Ok(())
}

fn first_keyword(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| k.trim())
        .find(|k| !k.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tokio::io::BufReader;

    const CV: &str = "Développeur web passionné. Compétences : Python, React, 3 ans d'expérience \
                      en agence digitale sur des applications métier et des sites e-commerce.";
    const JOB: &str = "Poste de développeur backend Python et Docker, 3 ans d'expérience demandés, \
                       au sein d'une équipe produit travaillant sur une plateforme SaaS.";

    fn renderer() -> ChatRenderer {
        ChatRenderer::with_options(false, false, true)
    }

    #[tokio::test]
    async fn test_prompts_stay_out_of_json_transcript() {
        let engine = ConversationEngine::new(Config::default()).unwrap();
        let typed: &[u8] = b"Deuxieme reponse sur mon parcours.\n\nTroisieme reponse.\nQuatrieme.\nCinquieme.\n";
        let mut prompts: Vec<u8> = Vec::new();
        let mut answers = PromptingAnswers::new(
            vec!["Oui, j'ai utilisé Docker sur un projet personnel.".to_string()],
            BufReader::new(typed),
            &mut prompts,
            renderer(),
        );

        let transcript = run_evaluation(&engine, "eval", CV, JOB, true, &mut answers)
            .await
            .unwrap();
        drop(answers);

        let mut out = Vec::new();
        write_transcript(&mut out, &transcript, &OutputFormat::Json, &renderer()).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let turns = parsed.as_array().unwrap();
        assert_eq!(turns.len(), transcript.len());
        assert_eq!(turns[0]["step"], "collecting_job");

        assert_eq!(transcript[transcript.len() - 2].step, Step::Completed);
        assert!(transcript.last().unwrap().response.contains("RAPPORT DÉTAILLÉ"));

        // Typed answers were asked for on the prompt writer only
        let prompts = String::from_utf8(prompts).unwrap();
        assert!(prompts.contains("Question 2/"));
        let out = String::from_utf8(out).unwrap();
        assert!(out.trim_start().starts_with('['));
        assert!(out.trim_end().ends_with(']'));
    }

    #[tokio::test]
    async fn test_prepared_answers_need_no_prompt() {
        let engine = ConversationEngine::new(Config::default()).unwrap();
        let prepared = vec!["Une réponse détaillée sur mon expérience.".to_string(); 10];
        let mut prompts: Vec<u8> = Vec::new();
        let mut answers = PromptingAnswers::new(prepared, BufReader::new(&b""[..]), &mut prompts, renderer());

        let transcript = run_evaluation(&engine, "eval", CV, JOB, false, &mut answers)
            .await
            .unwrap();
        drop(answers);

        assert_eq!(transcript.last().unwrap().step, Step::Completed);
        assert!(prompts.is_empty());
    }

    #[tokio::test]
    async fn test_running_out_of_answers_is_an_error() {
        let engine = ConversationEngine::new(Config::default()).unwrap();
        let mut prompts: Vec<u8> = Vec::new();
        let mut answers = PromptingAnswers::new(Vec::new(), BufReader::new(&b"\n\n"[..]), &mut prompts, renderer());

        let err = run_evaluation(&engine, "eval", CV, JOB, false, &mut answers)
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewerError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_short_cv_is_rejected() {
        let engine = ConversationEngine::new(Config::default()).unwrap();
        let mut prompts: Vec<u8> = Vec::new();
        let mut answers = PromptingAnswers::new(Vec::new(), BufReader::new(&b""[..]), &mut prompts, renderer());

        let err = run_evaluation(&engine, "eval", "Développeur Python.", JOB, false, &mut answers)
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewerError::InvalidInput(_)));
    }
}
