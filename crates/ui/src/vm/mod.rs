mod game_vm;
mod time_fmt;

pub use game_vm::{
    GameIntent, GameOverVm, GameScreen, GameVm, HudVm, OptionState, OptionVm, QuestionVm,
};
pub use time_fmt::format_clock;
