use quest_core::model::{Answer, GameMode, QuestionBatch};
use quest_core::rules::LEVEL_FAIL_THRESHOLD;
use quest_core::{
    Advance, BatchApplied, BatchRequest, FeedbackTicket, GameError, GamePhase, GameSession,
    TickOutcome, Verdict,
};

use super::time_fmt::format_clock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameIntent {
    Start(GameMode),
    Answer(Answer),
    Retry,
    Restart,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameScreen {
    Menu,
    Loading,
    /// The last batch came back empty.
    Stalled,
    Question(QuestionVm),
    GameOver(GameOverVm),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudVm {
    pub level_label: String,
    pub score_label: String,
    pub fails_label: String,
    pub time_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub prompt: String,
    pub image_url: Option<String>,
    pub options: Vec<OptionVm>,
    pub progress_label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Open,
    /// Feedback is showing and this option is neither picked nor right.
    Locked,
    Correct,
    Wrong,
}

impl OptionState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            OptionState::Open => "option",
            OptionState::Locked => "option option--locked",
            OptionState::Correct => "option option--correct",
            OptionState::Wrong => "option option--wrong",
        }
    }

    #[must_use]
    pub fn is_disabled(self) -> bool {
        self != OptionState::Open
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub answer: Answer,
    pub label: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOverVm {
    pub level_label: String,
    pub score_label: String,
}

/// Presentation wrapper around a `GameSession`.
#[derive(Clone, Debug, Default)]
pub struct GameVm {
    session: GameSession,
}

impl GameVm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// # Errors
    ///
    /// Returns `GameError::NotInMenu` while a game is running.
    pub fn start(&mut self, mode: GameMode) -> Result<BatchRequest, GameError> {
        self.session.start_game(mode)
    }

    /// # Errors
    ///
    /// Returns `GameError::StaleRequest` for superseded requests.
    pub fn apply_batch(
        &mut self,
        request: BatchRequest,
        batch: QuestionBatch,
    ) -> Result<BatchApplied, GameError> {
        self.session.apply_batch(request, batch)
    }

    pub fn retry(&mut self) -> Option<BatchRequest> {
        self.session.retry_batch()
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.session.tick()
    }

    /// # Errors
    ///
    /// Propagates the session's refusal to take an answer.
    pub fn submit(&mut self, answer: Answer) -> Result<FeedbackTicket, GameError> {
        self.session.submit_answer(answer)
    }

    /// # Errors
    ///
    /// Returns `GameError::StaleFeedback` when the ticket no longer applies.
    pub fn resolve(&mut self, ticket: FeedbackTicket) -> Result<Advance, GameError> {
        self.session.resolve_feedback(ticket)
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    #[must_use]
    pub fn screen(&self) -> GameScreen {
        let session = &self.session;
        match session.phase() {
            GamePhase::Menu => GameScreen::Menu,
            GamePhase::GameOver => GameScreen::GameOver(GameOverVm {
                level_label: format!("You reached Level {}", session.level()),
                score_label: format!("Final Score: {}", session.score()),
            }),
            GamePhase::Playing if session.is_loading() => GameScreen::Loading,
            GamePhase::Playing if session.is_stalled() => GameScreen::Stalled,
            GamePhase::Playing => self.question().map_or(GameScreen::Loading, GameScreen::Question),
        }
    }

    #[must_use]
    pub fn hud(&self) -> HudVm {
        let session = &self.session;
        HudVm {
            level_label: format!("Level: {}", session.level()),
            score_label: format!("Score: {}", session.score()),
            fails_label: format!("Fails: {} / {LEVEL_FAIL_THRESHOLD}", session.incorrect()),
            time_label: format!("Time: {}", format_clock(session.time_remaining())),
        }
    }

    fn question(&self) -> Option<QuestionVm> {
        let question = self.session.current_question()?;
        let total = self.session.batch().map_or(0, QuestionBatch::len);
        let feedback = self.session.feedback();

        let options = question
            .options()
            .into_iter()
            .map(|answer| {
                let state = match feedback {
                    None => OptionState::Open,
                    Some(_) if question.is_correct(&answer) => OptionState::Correct,
                    Some(feedback) if feedback.selected == answer => match feedback.verdict {
                        Verdict::Correct => OptionState::Correct,
                        Verdict::Incorrect => OptionState::Wrong,
                    },
                    Some(_) => OptionState::Locked,
                };
                OptionVm {
                    label: answer.to_string(),
                    answer,
                    state,
                }
            })
            .collect();

        Some(QuestionVm {
            prompt: question.prompt(),
            image_url: question.image_url().map(str::to_string),
            options,
            progress_label: format!("Question {} of {total}", self.session.question_index() + 1),
        })
    }
}
