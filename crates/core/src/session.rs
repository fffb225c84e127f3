//! The game-session state machine.
//!
//! `GameSession` is pure state: it never performs I/O or sleeps. Whoever drives it
//! (a UI, a terminal loop, a test) performs the batch loads and the feedback delay,
//! then reports back through the ticketed operations so late results can be told
//! apart from current ones.

use std::fmt;

use crate::error::GameError;
use crate::model::{Answer, GameMode, Question, QuestionBatch, RequestId};
use crate::rules::{self, points_for, time_allowance};

//
// ─── TYPES ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Menu,
    Playing,
    GameOver,
}

/// A request for a fresh question batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRequest {
    pub id: RequestId,
    pub level: u32,
    pub mode: GameMode,
}

/// Identifies the question an answer was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackTicket {
    pub request: RequestId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Answer feedback currently on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub verdict: Verdict,
    pub selected: Answer,
    pub ticket: FeedbackTicket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchApplied {
    Ready { questions: usize, short: bool },
    /// Nothing could be generated; the session waits for `retry_batch`.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No game in progress.
    Idle,
    /// Clock stopped while questions load or after an empty batch.
    Paused,
    Running { remaining: u32 },
    TimedOut,
}

/// What happened after feedback was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextQuestion,
    RepeatLevel(BatchRequest),
    NextLevel(BatchRequest),
}

impl Advance {
    /// The batch request the driver has to fulfil, if any.
    #[must_use]
    pub fn request(self) -> Option<BatchRequest> {
        match self {
            Advance::NextQuestion => None,
            Advance::RepeatLevel(request) | Advance::NextLevel(request) => Some(request),
        }
    }
}

#[derive(Clone)]
struct LoadedBatch {
    request: RequestId,
    questions: QuestionBatch,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One player's game, from the menu to game over.
#[derive(Clone)]
pub struct GameSession {
    phase: GamePhase,
    mode: Option<GameMode>,
    level: u32,
    score: u32,
    time_remaining: u32,
    incorrect: u32,
    batch: Option<LoadedBatch>,
    index: usize,
    feedback: Option<Feedback>,
    pending: Option<BatchRequest>,
    last_request: RequestId,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Menu,
            mode: None,
            level: 1,
            score: 0,
            time_remaining: time_allowance(1),
            incorrect: 0,
            batch: None,
            index: 0,
            feedback: None,
            pending: None,
            last_request: RequestId::new(0),
        }
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Wrong answers given in the current batch.
    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn batch(&self) -> Option<&QuestionBatch> {
        self.batch.as_ref().map(|loaded| &loaded.questions)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.batch()?.get(self.index)
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == GamePhase::Playing && self.pending.is_some()
    }

    /// Playing, but the last batch came back empty.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        self.phase == GamePhase::Playing
            && self.pending.is_none()
            && self.batch().is_some_and(QuestionBatch::is_empty)
    }

    /// The clock only runs while a question is on screen.
    #[must_use]
    pub fn is_clock_running(&self) -> bool {
        self.phase == GamePhase::Playing && self.pending.is_none() && self.current_question().is_some()
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Begin a game in `mode` at level 1.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotInMenu` unless the session is on the menu.
    pub fn start_game(&mut self, mode: GameMode) -> Result<BatchRequest, GameError> {
        if self.phase != GamePhase::Menu {
            return Err(GameError::NotInMenu);
        }
        self.reset();
        self.mode = Some(mode);
        self.phase = GamePhase::Playing;
        Ok(self.issue_request(mode))
    }

    /// Install the batch generated for `request`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::StaleRequest` if `request` is not the one the session is
    /// waiting for (it was superseded by a restart, a time-out or a newer request).
    pub fn apply_batch(
        &mut self,
        request: BatchRequest,
        questions: QuestionBatch,
    ) -> Result<BatchApplied, GameError> {
        if self.phase != GamePhase::Playing || self.pending != Some(request) {
            return Err(GameError::StaleRequest);
        }

        let applied = if questions.is_empty() {
            BatchApplied::Empty
        } else {
            BatchApplied::Ready {
                questions: questions.len(),
                short: questions.is_short(),
            }
        };
        self.pending = None;
        self.index = 0;
        self.batch = Some(LoadedBatch {
            request: request.id,
            questions,
        });
        Ok(applied)
    }

    /// Ask again for the current level after an empty batch.
    ///
    /// Returns `None` unless the session is stalled.
    pub fn retry_batch(&mut self) -> Option<BatchRequest> {
        if !self.is_stalled() {
            return None;
        }
        let mode = self.mode?;
        self.batch = None;
        self.index = 0;
        Some(self.issue_request(mode))
    }

    /// Advance the clock by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != GamePhase::Playing {
            return TickOutcome::Idle;
        }
        if !self.is_clock_running() {
            return TickOutcome::Paused;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.end_game();
            return TickOutcome::TimedOut;
        }
        TickOutcome::Running {
            remaining: self.time_remaining,
        }
    }

    /// Judge `answer` against the current question and show feedback.
    ///
    /// # Errors
    ///
    /// Returns `GameError::FeedbackPending` while a previous answer is still shown,
    /// `GameError::NotPlaying`, `GameError::Loading` or `GameError::NoQuestion` when
    /// there is nothing to answer.
    pub fn submit_answer(&mut self, answer: Answer) -> Result<FeedbackTicket, GameError> {
        if self.phase != GamePhase::Playing {
            return Err(GameError::NotPlaying);
        }
        if self.feedback.is_some() {
            return Err(GameError::FeedbackPending);
        }
        if self.pending.is_some() {
            return Err(GameError::Loading);
        }

        let (ticket, correct) = {
            let loaded = self.batch.as_ref().ok_or(GameError::NoQuestion)?;
            let question = loaded
                .questions
                .get(self.index)
                .ok_or(GameError::NoQuestion)?;
            let ticket = FeedbackTicket {
                request: loaded.request,
                index: self.index,
            };
            (ticket, question.is_correct(&answer))
        };

        let verdict = if correct {
            self.score = self.score.saturating_add(points_for(self.level));
            Verdict::Correct
        } else {
            self.incorrect = self.incorrect.saturating_add(1);
            Verdict::Incorrect
        };
        self.feedback = Some(Feedback {
            verdict,
            selected: answer,
            ticket,
        });
        Ok(ticket)
    }

    /// Clear the feedback for `ticket` and move on.
    ///
    /// After the last question of a batch the level is either replayed (too many
    /// wrong answers) or advanced; both issue a new batch request.
    ///
    /// # Errors
    ///
    /// Returns `GameError::StaleFeedback` if the feedback was already cleared by a
    /// restart, a time-out or an earlier resolution.
    pub fn resolve_feedback(&mut self, ticket: FeedbackTicket) -> Result<Advance, GameError> {
        if self.phase != GamePhase::Playing {
            return Err(GameError::StaleFeedback);
        }
        match &self.feedback {
            Some(feedback) if feedback.ticket == ticket => {}
            _ => return Err(GameError::StaleFeedback),
        }
        self.feedback = None;

        let total = self.batch().map_or(0, QuestionBatch::len);
        if self.index + 1 < total {
            self.index += 1;
            return Ok(Advance::NextQuestion);
        }

        let mode = self.mode.ok_or(GameError::NotPlaying)?;
        let failed = rules::level_failed(self.incorrect);
        self.index = 0;
        self.incorrect = 0;
        self.batch = None;

        if failed {
            return Ok(Advance::RepeatLevel(self.issue_request(mode)));
        }
        self.level = self.level.saturating_add(1);
        self.time_remaining = time_allowance(self.level);
        Ok(Advance::NextLevel(self.issue_request(mode)))
    }

    /// Drop the current game and return to the menu.
    pub fn restart(&mut self) {
        self.reset();
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn reset(&mut self) {
        // Request ids keep counting across games so late batches stay stale.
        let last_request = self.last_request;
        *self = Self {
            last_request,
            ..Self::new()
        };
    }

    fn end_game(&mut self) {
        self.phase = GamePhase::GameOver;
        self.time_remaining = 0;
        self.feedback = None;
        self.pending = None;
        self.batch = None;
        self.index = 0;
    }

    fn issue_request(&mut self, mode: GameMode) -> BatchRequest {
        self.last_request = self.last_request.next();
        let request = BatchRequest {
            id: self.last_request,
            level: self.level,
            mode,
        };
        self.pending = Some(request);
        request
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("phase", &self.phase)
            .field("mode", &self.mode)
            .field("level", &self.level)
            .field("score", &self.score)
            .field("time_remaining", &self.time_remaining)
            .field("incorrect", &self.incorrect)
            .field("batch_len", &self.batch().map(QuestionBatch::len))
            .field("index", &self.index)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn episode_batch(len: usize) -> QuestionBatch {
        (0..len)
            .map(|i| {
                let correct = 10 + u32::try_from(i).unwrap() * 10;
                Question::episodes(
                    format!("Show {i}"),
                    vec![correct + 3, correct, correct + 1, correct + 2],
                    correct,
                )
                .unwrap()
            })
            .collect()
    }

    fn started(len: usize) -> GameSession {
        let mut session = GameSession::new();
        let request = session.start_game(GameMode::Episodes).unwrap();
        session.apply_batch(request, episode_batch(len)).unwrap();
        session
    }

    fn right(session: &GameSession) -> Answer {
        session.current_question().unwrap().correct_answer()
    }

    fn wrong(session: &GameSession) -> Answer {
        let question = session.current_question().unwrap();
        question
            .options()
            .into_iter()
            .find(|option| !question.is_correct(option))
            .unwrap()
    }

    fn answer(session: &mut GameSession, correct: bool) -> Advance {
        let choice = if correct { right(session) } else { wrong(session) };
        let ticket = session.submit_answer(choice).unwrap();
        session.resolve_feedback(ticket).unwrap()
    }

    #[test]
    fn start_game_resets_and_requests_level_one() {
        let mut session = GameSession::new();
        assert_eq!(session.phase(), GamePhase::Menu);

        let request = session.start_game(GameMode::Character).unwrap();
        assert_eq!(request.level, 1);
        assert_eq!(request.mode, GameMode::Character);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.time_remaining(), 60);
        assert!(session.is_loading());

        let err = session.start_game(GameMode::Episodes).unwrap_err();
        assert_eq!(err, GameError::NotInMenu);
    }

    #[test]
    fn consecutive_correct_answers_score_ten_per_level() {
        let mut session = started(5);
        for _ in 0..3 {
            assert_eq!(answer(&mut session, true), Advance::NextQuestion);
        }
        assert_eq!(session.score(), 10 * 1 * 3);

        answer(&mut session, true);
        let advance = answer(&mut session, true);
        let Advance::NextLevel(request) = advance else {
            panic!("expected level advance, got {advance:?}");
        };
        session.apply_batch(request, episode_batch(5)).unwrap();
        assert_eq!(session.level(), 2);

        let before = session.score();
        for _ in 0..4 {
            answer(&mut session, true);
        }
        assert_eq!(session.score() - before, 10 * 2 * 4);
    }

    #[test]
    fn double_submit_is_rejected_while_feedback_pending() {
        let mut session = started(5);
        let choice = right(&session);
        session.submit_answer(choice.clone()).unwrap();
        let score = session.score();

        let err = session.submit_answer(choice).unwrap_err();
        assert_eq!(err, GameError::FeedbackPending);
        assert_eq!(session.score(), score);
        assert_eq!(session.feedback().unwrap().verdict, Verdict::Correct);
    }

    #[test]
    fn fourth_miss_on_last_question_repeats_level() {
        let mut session = started(5);
        answer(&mut session, true);
        for _ in 0..3 {
            answer(&mut session, false);
        }
        assert_eq!(session.incorrect(), 3);

        let advance = answer(&mut session, false);
        let Advance::RepeatLevel(request) = advance else {
            panic!("expected repeat, got {advance:?}");
        };
        assert_eq!(request.level, 1);
        assert_eq!(session.level(), 1);
        assert_eq!(session.incorrect(), 0);
        assert_eq!(session.question_index(), 0);
        assert!(session.is_loading());
    }

    #[test]
    fn third_miss_on_last_question_advances_level() {
        let mut session = started(5);
        answer(&mut session, true);
        answer(&mut session, true);
        answer(&mut session, false);
        answer(&mut session, false);
        assert_eq!(session.incorrect(), 2);

        let advance = answer(&mut session, false);
        let Advance::NextLevel(request) = advance else {
            panic!("expected advance, got {advance:?}");
        };
        assert_eq!(request.level, 2);
        assert_eq!(session.level(), 2);
        assert_eq!(session.incorrect(), 0);
    }

    #[test]
    fn clock_runs_out_after_sixty_ticks() {
        let mut session = started(5);
        for _ in 0..59 {
            assert!(matches!(session.tick(), TickOutcome::Running { .. }));
        }
        assert_eq!(session.tick(), TickOutcome::TimedOut);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(session.current_question().is_none());
        assert_eq!(session.tick(), TickOutcome::Idle);
    }

    #[test]
    fn clock_pauses_while_loading() {
        let mut session = GameSession::new();
        let request = session.start_game(GameMode::Episodes).unwrap();
        for _ in 0..120 {
            assert_eq!(session.tick(), TickOutcome::Paused);
        }
        assert_eq!(session.time_remaining(), 60);

        session.apply_batch(request, episode_batch(5)).unwrap();
        assert_eq!(session.tick(), TickOutcome::Running { remaining: 59 });
    }

    #[test]
    fn entering_level_five_gives_thirty_seconds() {
        let mut session = started(1);
        for expected_level in 2..=5 {
            let request = answer(&mut session, true).request().unwrap();
            assert_eq!(session.level(), expected_level);
            let expected_time = if expected_level >= 5 { 30 } else { 60 };
            assert_eq!(session.time_remaining(), expected_time);
            session.apply_batch(request, episode_batch(1)).unwrap();
        }
    }

    #[test]
    fn repeating_a_level_keeps_the_clock() {
        let mut session = started(4);
        session.tick();
        session.tick();
        for _ in 0..4 {
            answer(&mut session, false);
        }
        assert_eq!(session.time_remaining(), 58);
    }

    #[test]
    fn restart_always_returns_to_menu() {
        let mut session = started(5);
        answer(&mut session, true);
        session.submit_answer(right(&session)).unwrap();
        session.restart();

        assert_eq!(session.phase(), GamePhase::Menu);
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.mode(), None);
        assert!(session.batch().is_none());
        assert!(session.feedback().is_none());

        let mut over = started(5);
        while over.tick() != TickOutcome::TimedOut {}
        over.restart();
        assert_eq!(over.phase(), GamePhase::Menu);
        assert_eq!(over.time_remaining(), 60);
    }

    #[test]
    fn stale_batch_after_restart_is_dropped() {
        let mut session = GameSession::new();
        let old = session.start_game(GameMode::Episodes).unwrap();
        session.restart();
        let current = session.start_game(GameMode::Episodes).unwrap();
        assert_ne!(old.id, current.id);

        let err = session.apply_batch(old, episode_batch(5)).unwrap_err();
        assert_eq!(err, GameError::StaleRequest);
        assert!(session.is_loading());

        session.apply_batch(current, episode_batch(5)).unwrap();
        assert!(session.current_question().is_some());
    }

    #[test]
    fn stale_feedback_after_timeout_is_dropped() {
        let mut session = started(5);
        let ticket = session.submit_answer(right(&session)).unwrap();
        while session.tick() != TickOutcome::TimedOut {}

        assert_eq!(
            session.resolve_feedback(ticket).unwrap_err(),
            GameError::StaleFeedback
        );
        assert_eq!(session.phase(), GamePhase::GameOver);
    }

    #[test]
    fn short_batch_ends_level_after_last_available_question() {
        let mut session = GameSession::new();
        let request = session.start_game(GameMode::Episodes).unwrap();
        let applied = session.apply_batch(request, episode_batch(2)).unwrap();
        assert_eq!(
            applied,
            BatchApplied::Ready {
                questions: 2,
                short: true
            }
        );

        answer(&mut session, true);
        assert!(matches!(answer(&mut session, true), Advance::NextLevel(_)));
    }

    #[test]
    fn empty_batch_stalls_until_retry() {
        let mut session = GameSession::new();
        let request = session.start_game(GameMode::Character).unwrap();
        let applied = session.apply_batch(request, QuestionBatch::default()).unwrap();
        assert_eq!(applied, BatchApplied::Empty);
        assert!(session.is_stalled());
        assert_eq!(session.tick(), TickOutcome::Paused);
        assert_eq!(
            session.submit_answer(Answer::Name("Anyone".into())).unwrap_err(),
            GameError::NoQuestion
        );

        let retry = session.retry_batch().unwrap();
        assert_eq!(retry.level, 1);
        assert!(retry.id > request.id);
        assert!(session.is_loading());
        assert!(session.retry_batch().is_none());
    }
}
