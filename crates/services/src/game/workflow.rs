use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use quest_core::model::{Answer, GameMode, QuestionBatch};
use quest_core::{Advance, BatchApplied, BatchRequest, GameError, GameSession, Verdict};

use crate::config::DEFAULT_FEEDBACK_DELAY;
use crate::generator::QuestionGenerator;

/// Result of answering a question through [`GameLoopService::answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerReport {
    pub verdict: Verdict,
    pub advance: Advance,
    /// Outcome of loading the next batch, when the answer finished one.
    pub loaded: Option<BatchApplied>,
}

/// Fulfils the batch requests a `GameSession` issues.
///
/// Holds the seedable random source so a whole game can be replayed from one
/// seed. Each batch draws its own generator from it, so the lock is never held
/// across network waits.
pub struct GameLoopService {
    generator: QuestionGenerator,
    rng: Mutex<StdRng>,
    feedback_delay: Duration,
}

impl GameLoopService {
    #[must_use]
    pub fn new(generator: QuestionGenerator) -> Self {
        Self {
            generator,
            rng: Mutex::new(StdRng::from_os_rng()),
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    #[must_use]
    pub fn with_feedback_delay(mut self, delay: Duration) -> Self {
        self.feedback_delay = delay;
        self
    }

    /// How long answer feedback stays on screen before the game moves on.
    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        self.feedback_delay
    }

    /// Generate the batch for `request`.
    pub async fn load_batch(&self, request: BatchRequest) -> QuestionBatch {
        let mut rng = self.batch_rng();
        log::debug!(
            "generating {} batch for level {} ({})",
            request.mode,
            request.level,
            request.id
        );
        self.generator
            .generate_batch(request.level, request.mode, &mut rng)
            .await
    }

    //
    // ─── SEQUENTIAL DRIVING ────────────────────────────────────────────────────
    //
    // Helpers for drivers that own the session across awaits (headless play and
    // tests). Interactive frontends call `load_batch` and `feedback_delay`
    // themselves so the clock keeps ticking meanwhile.

    /// Start a game and load its first batch.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotInMenu` if a game is already running.
    pub async fn start_game(
        &self,
        session: &mut GameSession,
        mode: GameMode,
    ) -> Result<BatchApplied, GameError> {
        let request = session.start_game(mode)?;
        self.fulfil(session, request).await
    }

    /// Load and apply the batch for `request`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::StaleRequest` if the session moved on meanwhile.
    pub async fn fulfil(
        &self,
        session: &mut GameSession,
        request: BatchRequest,
    ) -> Result<BatchApplied, GameError> {
        let batch = self.load_batch(request).await;
        session.apply_batch(request, batch)
    }

    /// Answer the current question, wait out the feedback, and advance.
    ///
    /// # Errors
    ///
    /// Propagates the `GameError` of the rejected transition.
    pub async fn answer(
        &self,
        session: &mut GameSession,
        answer: Answer,
    ) -> Result<AnswerReport, GameError> {
        let ticket = session.submit_answer(answer)?;
        let verdict = session
            .feedback()
            .map(|feedback| feedback.verdict)
            .ok_or(GameError::StaleFeedback)?;

        if !self.feedback_delay.is_zero() {
            tokio::time::sleep(self.feedback_delay).await;
        }

        let advance = session.resolve_feedback(ticket)?;
        let loaded = match advance {
            Advance::NextQuestion => None,
            Advance::RepeatLevel(request) => {
                log::info!("level {} failed, replaying", request.level);
                Some(self.fulfil(session, request).await?)
            }
            Advance::NextLevel(request) => {
                log::info!("advanced to level {}", request.level);
                Some(self.fulfil(session, request).await?)
            }
        };

        Ok(AnswerReport {
            verdict,
            advance,
            loaded,
        })
    }

    fn batch_rng(&self) -> StdRng {
        let mut seed_rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        StdRng::from_rng(&mut *seed_rng)
    }
}

impl fmt::Debug for GameLoopService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLoopService")
            .field("generator", self.generator.config())
            .field("feedback_delay", &self.feedback_delay)
            .finish_non_exhaustive()
    }
}
