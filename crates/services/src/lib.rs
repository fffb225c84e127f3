#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod game;
pub mod generator;
pub mod provider;

pub use config::{GeneratorConfig, ProviderConfig};
pub use error::{ConfigError, ProviderError};
pub use game::{AnswerReport, GameLoopService};
pub use generator::QuestionGenerator;
pub use provider::{ContentProvider, JikanClient, StaticProvider};
