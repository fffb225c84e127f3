mod anime;
mod ids;
mod question;

pub use anime::{AnimeSummary, CharacterOption, GameMode, ParseModeError};
pub use ids::{AnimeId, RequestId};
pub use question::{Answer, MultipleChoice, OPTION_COUNT, Question, QuestionBatch, QuestionError};
