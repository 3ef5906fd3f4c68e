//! Follow-up question replenishment for an open review.
//!
//! A [`QuestionPool`] tracks which suggested questions are on screen and which
//! have already been answered. Once answered, a question is never offered
//! again. A [`ReviewSession`] pairs the pool with the session's interaction
//! list and writes that list through an [`InteractionSink`].
//!
//! Pool state is never persisted. Reopening a review rebuilds it from the
//! stored triage questions and interactions.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use pretriaje_core::models::interaction::AiInteraction;
use pretriaje_core::models::session::Session;

use crate::content::EXTRA_QUESTIONS_POOL;
use crate::error::ReviewError;

/// How many questions a regenerate draws.
pub const REGENERATE_COUNT: usize = 3;

/// Persistence for a session's interaction list.
///
/// Always receives the full list, so re-sending after a failure is safe.
pub trait InteractionSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn save_interactions(
        &self,
        session_id: Uuid,
        interactions: &[AiInteraction],
    ) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone)]
pub struct QuestionPool {
    suggested: Vec<String>,
    offered: Vec<String>,
    answered: HashSet<String>,
}

impl QuestionPool {
    /// Seed the pool from the engine's questions, skipping any already
    /// answered in earlier interactions.
    pub fn new(ai_questions: &[String], interactions: &[AiInteraction]) -> Self {
        let answered: HashSet<String> = interactions.iter().map(|i| i.question.clone()).collect();
        let mut offered: Vec<String> = Vec::new();
        for q in ai_questions {
            if !answered.contains(q) && !offered.contains(q) {
                offered.push(q.clone());
            }
        }
        Self {
            suggested: ai_questions.to_vec(),
            offered,
            answered,
        }
    }

    /// Questions currently on offer. May hold fewer than three once the extra
    /// pool runs dry.
    pub fn offered(&self) -> &[String] {
        &self.offered
    }

    pub fn is_answered(&self, question: &str) -> bool {
        self.answered.contains(question)
    }

    /// Replace the offered set with a random draw from the engine's questions
    /// plus the extra pool, excluding answered ones.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[String] {
        let mut candidates: Vec<&str> = Vec::new();
        let all = self
            .suggested
            .iter()
            .map(String::as_str)
            .chain(EXTRA_QUESTIONS_POOL);
        for q in all {
            if !self.answered.contains(q) && !candidates.contains(&q) {
                candidates.push(q);
            }
        }
        candidates.shuffle(rng);
        self.offered = candidates
            .into_iter()
            .take(REGENERATE_COUNT)
            .map(str::to_string)
            .collect();
        &self.offered
    }

    /// Record `question` as answered, drop it from the offer and top the offer
    /// up with one unused extra question. Returns the replacement, if any.
    pub fn mark_answered<R: Rng + ?Sized>(
        &mut self,
        question: &str,
        rng: &mut R,
    ) -> Option<String> {
        self.answered.insert(question.to_string());
        self.offered.retain(|q| q != question);

        let candidates: Vec<&str> = EXTRA_QUESTIONS_POOL
            .into_iter()
            .filter(|q| !self.answered.contains(*q) && !self.offered.iter().any(|o| o == q))
            .collect();
        let replacement = candidates.choose(rng)?.to_string();
        self.offered.push(replacement.clone());
        Some(replacement)
    }
}

/// One reviewer's open view of a submitted session.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    session_id: Uuid,
    pool: QuestionPool,
    interactions: Vec<AiInteraction>,
}

impl ReviewSession {
    pub fn open(session: &Session) -> Self {
        let ai_questions = session
            .triage
            .as_ref()
            .map(|t| t.ai_questions.as_slice())
            .unwrap_or_default();
        Self {
            session_id: session.id,
            pool: QuestionPool::new(ai_questions, &session.ai_interactions),
            interactions: session.ai_interactions.clone(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn offered(&self) -> &[String] {
        self.pool.offered()
    }

    pub fn interactions(&self) -> &[AiInteraction] {
        &self.interactions
    }

    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[String] {
        self.pool.regenerate(rng)
    }

    /// Record the worker's answer to `question` and persist the full list.
    ///
    /// In-memory state is updated before the write, so a failed write can be
    /// retried with [`ReviewSession::persist`].
    pub fn answer<S, R>(
        &mut self,
        question: &str,
        answer: &str,
        now: jiff::Timestamp,
        rng: &mut R,
        sink: &S,
    ) -> Result<Option<String>, ReviewError>
    where
        S: InteractionSink + ?Sized,
        R: Rng + ?Sized,
    {
        let question = question.trim();
        if question.is_empty() {
            return Err(ReviewError::BlankQuestion);
        }
        if self.pool.is_answered(question) {
            return Err(ReviewError::AlreadyAnswered(question.to_string()));
        }

        self.interactions.push(AiInteraction {
            question: question.to_string(),
            answer: answer.to_string(),
            added_at: now,
        });
        let replacement = self.pool.mark_answered(question, rng);
        self.persist(sink)?;
        Ok(replacement)
    }

    /// Overwrite the answer of an earlier interaction and persist.
    pub fn edit<S>(&mut self, index: usize, answer: &str, sink: &S) -> Result<(), ReviewError>
    where
        S: InteractionSink + ?Sized,
    {
        let len = self.interactions.len();
        let interaction = self
            .interactions
            .get_mut(index)
            .ok_or(ReviewError::IndexOutOfRange { index, len })?;
        interaction.answer = answer.to_string();
        self.persist(sink)
    }

    pub fn persist<S>(&self, sink: &S) -> Result<(), ReviewError>
    where
        S: InteractionSink + ?Sized,
    {
        sink.save_interactions(self.session_id, &self.interactions)
            .map_err(|e| ReviewError::Persist(Box::new(e)))
    }
}
