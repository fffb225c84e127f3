mod game;
mod game_over;
mod menu;
mod play;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use game::GameView;
pub use game_over::GameOverView;
pub use menu::MenuView;
pub use play::{LoadingSpinner, PlayView};
