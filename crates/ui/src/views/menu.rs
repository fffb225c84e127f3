use dioxus::prelude::*;
use quest_core::model::GameMode;

#[component]
pub fn MenuView(on_start: EventHandler<GameMode>) -> Element {
    let buttons = GameMode::ALL.iter().map(|&mode| {
        rsx! {
            button {
                key: "{mode}",
                class: "btn btn-primary menu-mode",
                r#type: "button",
                onclick: move |_| on_start.call(mode),
                "{mode.label()}"
            }
        }
    });

    rsx! {
        section { class: "menu",
            h2 { "Choose Your Challenge" }
            div { class: "menu-modes", {buttons} }
        }
    }
}
