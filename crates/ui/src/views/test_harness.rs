use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use quest_core::model::GameMode;
use services::{GameLoopService, GeneratorConfig, QuestionGenerator, StaticProvider};

use crate::context::{UiApp, build_app_context};
use crate::views::GameView;
use crate::views::game::GameTestHandles;

struct TestApp {
    game_loop: Arc<GameLoopService>,
    launch_mode: Option<GameMode>,
}

impl UiApp for TestApp {
    fn game_loop(&self) -> Arc<GameLoopService> {
        Arc::clone(&self.game_loop)
    }

    fn launch_mode(&self) -> Option<GameMode> {
        self.launch_mode
    }
}

#[derive(Props, Clone)]
struct GameHarnessProps {
    app: Arc<TestApp>,
    handles: GameTestHandles,
}

impl PartialEq for GameHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn GameHarness(props: GameHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { GameView {} }
}

pub(crate) struct ViewHarness {
    pub dom: VirtualDom,
    pub provider: StaticProvider,
    pub handles: GameTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    /// Let spawned tasks run, then re-render. Repeats a few times so chained work
    /// (feedback, then a batch load) settles.
    pub async fn drive_async(&mut self) {
        for _ in 0..4 {
            let _ = tokio::time::timeout(Duration::from_millis(50), self.dom.wait_for_work()).await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub(crate) fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub(crate) fn setup_game_harness(provider: StaticProvider) -> ViewHarness {
    setup_game_harness_with_mode(provider, None)
}

pub(crate) fn setup_game_harness_with_mode(
    provider: StaticProvider,
    launch_mode: Option<GameMode>,
) -> ViewHarness {
    let generator = QuestionGenerator::new(Arc::new(provider.clone()))
        .with_config(GeneratorConfig::default().with_attempt_delay(Duration::ZERO));
    let game_loop = GameLoopService::new(generator)
        .with_seed(17)
        .with_feedback_delay(Duration::ZERO);
    let app = Arc::new(TestApp {
        game_loop: Arc::new(game_loop),
        launch_mode,
    });
    let handles = GameTestHandles::default();

    let dom = VirtualDom::new_with_props(
        GameHarness,
        GameHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    ViewHarness {
        dom,
        provider,
        handles,
    }
}
