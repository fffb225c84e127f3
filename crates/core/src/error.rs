use thiserror::Error;

/// Rejected game-session transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("a game can only be started from the menu")]
    NotInMenu,

    #[error("no game is in progress")]
    NotPlaying,

    #[error("questions are still loading")]
    Loading,

    #[error("there is no question to answer")]
    NoQuestion,

    #[error("an answer is already being shown")]
    FeedbackPending,

    #[error("batch result does not belong to the current request")]
    StaleRequest,

    #[error("feedback does not belong to the current question")]
    StaleFeedback,
}
