use dioxus::prelude::*;

use crate::vm::GameOverVm;

#[component]
pub fn GameOverView(summary: GameOverVm, on_restart: EventHandler<()>) -> Element {
    rsx! {
        section { class: "game-over",
            h2 { "Game Over" }
            p { "{summary.level_label}" }
            p { class: "final-score", "{summary.score_label}" }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_restart.call(()),
                "Play Again"
            }
        }
    }
}
