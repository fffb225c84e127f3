use dioxus::prelude::{ReadableExt, WritableExt};
use quest_core::model::{AnimeId, AnimeSummary, Answer, GameMode};
use services::StaticProvider;

use super::test_harness::{ViewHarness, setup_game_harness, setup_game_harness_with_mode};
use crate::vm::GameIntent;

fn bebop() -> StaticProvider {
    StaticProvider::new().with_page(
        1,
        vec![AnimeSummary::new(AnimeId::new(1), "Cowboy Bebop", Some(26))],
    )
}

fn dispatch(harness: &ViewHarness, intent: GameIntent) {
    let handles = harness.handles.clone();
    harness.dom.in_runtime(move || handles.dispatch().call(intent));
}

fn correct_answer(harness: &ViewHarness) -> Answer {
    let handles = harness.handles.clone();
    harness.dom.in_runtime(move || {
        handles
            .vm()
            .peek()
            .session()
            .current_question()
            .map(|question| question.correct_answer())
            .expect("question on screen")
    })
}

#[tokio::test(flavor = "current_thread")]
async fn menu_offers_both_modes() {
    let mut harness = setup_game_harness(bebop());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Choose Your Challenge"), "missing title in {html}");
    assert!(html.contains("Guess The Character"), "missing mode in {html}");
    assert!(html.contains("Guess The Episodes"), "missing mode in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn launch_mode_skips_the_menu() {
    let mut harness = setup_game_harness_with_mode(bebop(), Some(GameMode::Episodes));
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("How many episodes does Cowboy Bebop have?"),
        "missing prompt in {html}"
    );
    assert!(html.contains("Level: 1"), "missing level in {html}");
    assert!(html.contains("Score: 0"), "missing score in {html}");
    assert!(html.contains("Fails: 0 / 4"), "missing fails in {html}");
    assert!(html.contains("Time: 1:00"), "missing clock in {html}");
    assert!(html.contains("26"), "missing correct option in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn correct_answer_scores_and_moves_on() {
    let mut harness = setup_game_harness(bebop());
    harness.rebuild();
    dispatch(&harness, GameIntent::Start(GameMode::Episodes));
    harness.drive_async().await;
    assert!(harness.render().contains("Question 1 of 5"));

    let answer = correct_answer(&harness);
    dispatch(&harness, GameIntent::Answer(answer));
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Score: 10"), "missing score in {html}");
    assert!(html.contains("Question 2 of 5"), "missing progress in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn empty_page_offers_a_retry() {
    let mut harness = setup_game_harness(StaticProvider::new());
    harness.rebuild();
    dispatch(&harness, GameIntent::Start(GameMode::Episodes));
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Try Again"), "missing retry in {html}");
    assert!(html.contains("Time: 1:00"), "clock should be paused in {html}");

    harness.provider.insert_page(
        1,
        vec![AnimeSummary::new(AnimeId::new(2), "Trigun", Some(26))],
    );
    dispatch(&harness, GameIntent::Retry);
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("How many episodes does Trigun have?"),
        "missing prompt in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn timing_out_shows_game_over_and_restart_returns_to_menu() {
    let mut harness = setup_game_harness(bebop());
    harness.rebuild();
    dispatch(&harness, GameIntent::Start(GameMode::Episodes));
    harness.drive_async().await;

    let answer = correct_answer(&harness);
    dispatch(&harness, GameIntent::Answer(answer));
    harness.drive_async().await;

    let handles = harness.handles.clone();
    harness.dom.in_runtime(move || {
        let mut vm = handles.vm();
        for _ in 0..60 {
            vm.write().tick();
        }
    });
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Game Over"), "missing title in {html}");
    assert!(html.contains("You reached Level 1"), "missing level in {html}");
    assert!(html.contains("Final Score: 10"), "missing score in {html}");
    assert!(html.contains("Play Again"), "missing restart in {html}");

    dispatch(&harness, GameIntent::Restart);
    harness.drive_async().await;
    assert!(harness.render().contains("Choose Your Challenge"));
}
