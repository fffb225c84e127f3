mod workflow;

// Public API of the game subsystem.
pub use workflow::{AnswerReport, GameLoopService};
