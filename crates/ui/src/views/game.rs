use std::time::Duration;

use dioxus::prelude::*;
use quest_core::{BatchRequest, TickOutcome};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::context::AppContext;
use crate::views::{GameOverView, MenuView, PlayView};
use crate::vm::{GameIntent, GameScreen, GameVm};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const TICK: Duration = Duration::from_secs(1);

/// First tick lands one period from now. A late tick pushes the next one back
/// instead of firing a burst to catch up.
fn clock_ticker() -> Interval {
    let mut ticker = tokio::time::interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Owns the game session and drives it: batch loads, feedback delays and the clock.
#[component]
pub fn GameView() -> Element {
    let ctx = use_context::<AppContext>();
    let game_loop = ctx.game_loop();
    let vm = use_signal(GameVm::new);

    let load_batch = {
        let game_loop = game_loop.clone();
        use_callback(move |request: BatchRequest| {
            let game_loop = game_loop.clone();
            let mut vm = vm;
            spawn(async move {
                let batch = game_loop.load_batch(request).await;
                let applied = vm.write().apply_batch(request, batch);
                match applied {
                    Ok(applied) => log::debug!("batch {} applied: {applied:?}", request.id),
                    Err(err) => log::debug!("dropped batch {}: {err}", request.id),
                }
            });
        })
    };

    let dispatch_intent = use_callback(move |intent: GameIntent| {
        let mut vm = vm;
        match intent {
            GameIntent::Start(mode) => {
                let started = vm.write().start(mode);
                match started {
                    Ok(request) => load_batch.call(request),
                    Err(err) => log::debug!("ignored start: {err}"),
                }
            }
            GameIntent::Answer(answer) => {
                let submitted = vm.write().submit(answer);
                let ticket = match submitted {
                    Ok(ticket) => ticket,
                    Err(err) => {
                        log::debug!("ignored answer: {err}");
                        return;
                    }
                };
                let delay = game_loop.feedback_delay();
                spawn(async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let resolved = vm.write().resolve(ticket);
                    match resolved {
                        Ok(advance) => {
                            if let Some(request) = advance.request() {
                                load_batch.call(request);
                            }
                        }
                        Err(err) => log::debug!("dropped feedback: {err}"),
                    }
                });
            }
            GameIntent::Retry => {
                let retry = vm.write().retry();
                if let Some(request) = retry {
                    load_batch.call(request);
                }
            }
            GameIntent::Restart => vm.write().restart(),
        }
    });

    let launch_mode = ctx.launch_mode();
    use_effect(move || {
        if let Some(mode) = launch_mode {
            dispatch_intent.call(GameIntent::Start(mode));
        }
    });

    use_future(move || {
        let mut vm = vm;
        async move {
            let mut ticker = clock_ticker();
            loop {
                ticker.tick().await;
                if !vm.peek().session().is_clock_running() {
                    continue;
                }
                if vm.write().tick() == TickOutcome::TimedOut {
                    log::info!("time is up");
                }
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<GameTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let screen = vm.read().screen();
    let hud = vm.read().hud();

    rsx! {
        match screen {
            GameScreen::Menu => rsx! {
                MenuView { on_start: move |mode| dispatch_intent.call(GameIntent::Start(mode)) }
            },
            GameScreen::GameOver(summary) => rsx! {
                GameOverView { summary, on_restart: move |()| dispatch_intent.call(GameIntent::Restart) }
            },
            screen => rsx! {
                PlayView {
                    hud,
                    screen,
                    on_answer: move |answer| dispatch_intent.call(GameIntent::Answer(answer)),
                    on_retry: move |()| dispatch_intent.call(GameIntent::Retry),
                }
            },
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct GameTestHandles {
    dispatch: Rc<RefCell<Option<Callback<GameIntent>>>>,
    vm: Rc<RefCell<Option<Signal<GameVm>>>>,
}

#[cfg(test)]
impl GameTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<GameIntent>, vm: Signal<GameVm>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<GameIntent> {
        (*self.dispatch.borrow()).expect("game dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<GameVm> {
        (*self.vm.borrow()).expect("game vm registered")
    }
}
