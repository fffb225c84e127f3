use dioxus::prelude::*;

use crate::views::GameView;

const STYLE: &str = r"
.app-root { font-family: sans-serif; max-width: 720px; margin: 0 auto; text-align: center; }
.hud { display: flex; justify-content: space-between; font-weight: bold; }
.options { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; }
.option { padding: 12px; border-radius: 8px; border: 1px solid #888; cursor: pointer; }
.option--correct { background: #2e9d4a; color: white; }
.option--wrong { background: #c93c3c; color: white; }
.option--locked { opacity: 0.6; }
.portrait { max-height: 280px; border-radius: 8px; }
.spinner { width: 32px; height: 32px; margin: 24px auto; border: 4px solid #ccc;
  border-top-color: #555; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
";

#[component]
pub fn App() -> Element {
    rsx! {
        document::Title { "Anime Knowledge Quest" }
        document::Style { {STYLE} }

        div { class: "app-root",
            header { class: "app-header",
                h1 { "Anime Knowledge Quest" }
                p { class: "app-tagline", "Test Your Otaku Skills!" }
            }
            main {
                ErrorBoundary {
                    handle_error: |errors: ErrorContext| rsx! {
                        div { class: "fatal",
                            h2 { "Something went wrong" }
                            pre { "{errors:?}" }
                        }
                    },
                    GameView {}
                }
            }
            footer { class: "app-footer",
                p { "Anime data from the Jikan API (MyAnimeList)." }
            }
        }
    }
}
