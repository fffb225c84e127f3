use dioxus::prelude::*;
use quest_core::model::Answer;

use crate::vm::{GameScreen, HudVm, QuestionVm};

#[component]
pub fn PlayView(
    hud: HudVm,
    screen: GameScreen,
    on_answer: EventHandler<Answer>,
    on_retry: EventHandler<()>,
) -> Element {
    rsx! {
        section { class: "play",
            Hud { hud }
            match screen {
                GameScreen::Question(question) => rsx! {
                    QuestionCard { question, on_answer }
                },
                GameScreen::Stalled => rsx! {
                    div { class: "stalled",
                        p { "Could not find enough questions for this level." }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| on_retry.call(()),
                            "Try Again"
                        }
                    }
                },
                _ => rsx! { LoadingSpinner {} },
            }
        }
    }
}

#[component]
fn Hud(hud: HudVm) -> Element {
    rsx! {
        div { class: "hud",
            span { "{hud.level_label}" }
            span { "{hud.score_label}" }
            span { "{hud.fails_label}" }
            span { "{hud.time_label}" }
        }
    }
}

#[component]
fn QuestionCard(question: QuestionVm, on_answer: EventHandler<Answer>) -> Element {
    let buttons = question.options.iter().map(|option| {
        let answer = option.answer.clone();
        rsx! {
            button {
                key: "{option.label}",
                class: "{option.state.class()}",
                r#type: "button",
                disabled: option.state.is_disabled(),
                onclick: move |_| on_answer.call(answer.clone()),
                "{option.label}"
            }
        }
    });

    rsx! {
        div { class: "question",
            p { class: "question-progress", "{question.progress_label}" }
            h2 { class: "question-prompt", "{question.prompt}" }
            if let Some(url) = question.image_url.as_ref() {
                img { class: "portrait", src: "{url}", alt: "Character portrait" }
            }
            div { class: "options", {buttons} }
        }
    }
}

#[component]
pub fn LoadingSpinner() -> Element {
    rsx! {
        div { class: "loading",
            div { class: "spinner" }
            p { "Fetching Questions..." }
        }
    }
}
