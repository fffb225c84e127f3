#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod rules;
pub mod session;

pub use error::GameError;
pub use session::{
    Advance, BatchApplied, BatchRequest, Feedback, FeedbackTicket, GamePhase, GameSession,
    TickOutcome, Verdict,
};
