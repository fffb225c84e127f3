//! Line-based client for playing in a terminal.

use std::io;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use quest_core::model::{Answer, GameMode, QuestionBatch};
use quest_core::{Advance, BatchRequest, FeedbackTicket, GamePhase, TickOutcome, Verdict};
use services::GameLoopService;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use ui::vm::{GameScreen, GameVm, QuestionVm};

const TICK: Duration = Duration::from_secs(1);

/// Seconds left at which the clock is announced.
const CLOCK_CALLOUTS: [u32; 5] = [30, 15, 10, 5, 3];

#[derive(Debug)]
enum Event {
    BatchReady(BatchRequest, QuestionBatch),
    FeedbackElapsed(FeedbackTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Play until the player quits or stdin closes.
///
/// # Errors
///
/// Returns an I/O error if stdin cannot be read.
pub async fn play(game_loop: Arc<GameLoopService>, mode: Option<GameMode>) -> io::Result<()> {
    let (events, mut inbox) = mpsc::unbounded_channel();
    let mut client = TerminalClient::new(game_loop, events);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    match mode {
        Some(mode) => client.start(mode),
        None => client.show_menu(),
    }

    loop {
        tokio::select! {
            _ = ticker.tick() => client.on_tick(),
            Some(event) = inbox.recv() => client.on_event(event),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if client.on_input(line.trim()) == Flow::Quit {
                    break;
                }
            }
        }
    }

    println!("Thanks for playing!");
    Ok(())
}

struct TerminalClient {
    vm: GameVm,
    game_loop: Arc<GameLoopService>,
    events: mpsc::UnboundedSender<Event>,
}

impl TerminalClient {
    fn new(game_loop: Arc<GameLoopService>, events: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            vm: GameVm::new(),
            game_loop,
            events,
        }
    }

    fn on_input(&mut self, input: &str) -> Flow {
        if input.eq_ignore_ascii_case("q") {
            return Flow::Quit;
        }

        match self.vm.session().phase() {
            GamePhase::Menu => match parse_menu_choice(input) {
                Some(mode) => self.start(mode),
                None => self.show_menu(),
            },
            GamePhase::Playing if input.eq_ignore_ascii_case("r") => {
                if let Some(request) = self.vm.retry() {
                    self.load(request);
                } else {
                    self.vm.restart();
                    self.show_menu();
                }
            }
            GamePhase::Playing => self.answer(input),
            GamePhase::GameOver if input.eq_ignore_ascii_case("r") => {
                self.vm.restart();
                self.show_menu();
            }
            GamePhase::GameOver => println!("Press r to play again or q to quit."),
        }
        Flow::Continue
    }

    fn on_tick(&mut self) {
        match self.vm.tick() {
            TickOutcome::Running { remaining } if CLOCK_CALLOUTS.contains(&remaining) => {
                println!("{}", self.vm.hud().time_label);
            }
            TickOutcome::TimedOut => {
                println!("Time's up!");
                self.show_screen();
            }
            _ => {}
        }
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::BatchReady(request, batch) => match self.vm.apply_batch(request, batch) {
                Ok(_) => self.show_screen(),
                Err(err) => log::debug!("dropped batch {}: {err}", request.id),
            },
            Event::FeedbackElapsed(ticket) => match self.vm.resolve(ticket) {
                Ok(Advance::NextQuestion) => self.show_screen(),
                Ok(Advance::RepeatLevel(request)) => {
                    println!("Too many mistakes! Replaying level {}.", request.level);
                    self.load(request);
                }
                Ok(Advance::NextLevel(request)) => {
                    println!("Level up! Welcome to level {}.", request.level);
                    self.load(request);
                }
                Err(err) => log::debug!("dropped feedback: {err}"),
            },
        }
    }

    fn start(&mut self, mode: GameMode) {
        match self.vm.start(mode) {
            Ok(request) => {
                println!("{}", mode.label());
                self.load(request);
            }
            Err(err) => log::debug!("ignored start: {err}"),
        }
    }

    fn answer(&mut self, input: &str) {
        let GameScreen::Question(question) = self.vm.screen() else {
            return;
        };
        let Some(answer) = parse_option(&question, input) else {
            println!("Pick an option from 1 to {}, r to restart, or q to quit.", question.options.len());
            return;
        };

        let ticket = match self.vm.submit(answer) {
            Ok(ticket) => ticket,
            Err(err) => {
                log::debug!("ignored answer: {err}");
                return;
            }
        };
        self.show_verdict();

        let delay = self.game_loop.feedback_delay();
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if events.send(Event::FeedbackElapsed(ticket)).is_err() {
                log::debug!("client gone before feedback elapsed");
            }
        });
    }

    fn load(&self, request: BatchRequest) {
        println!("Fetching Questions...");
        let game_loop = Arc::clone(&self.game_loop);
        let events = self.events.clone();
        tokio::spawn(async move {
            let batch = game_loop.load_batch(request).await;
            if events.send(Event::BatchReady(request, batch)).is_err() {
                log::debug!("client gone before batch {} arrived", request.id);
            }
        });
    }

    fn show_menu(&self) {
        println!();
        println!("Anime Knowledge Quest - Test Your Otaku Skills!");
        println!("Choose Your Challenge:");
        for (number, mode) in GameMode::ALL.iter().enumerate() {
            println!("  {}) {}", number + 1, mode.label());
        }
        println!("  q) Quit");
    }

    fn show_screen(&self) {
        match self.vm.screen() {
            GameScreen::Menu => self.show_menu(),
            GameScreen::Loading => println!("Fetching Questions..."),
            GameScreen::Stalled => {
                println!("Could not find enough questions for this level. Press r to try again.");
            }
            GameScreen::Question(question) => {
                let hud = self.vm.hud();
                println!();
                println!(
                    "{} | {} | {} | {}",
                    hud.level_label, hud.score_label, hud.fails_label, hud.time_label
                );
                println!("{}", question.progress_label);
                println!("{}", question.prompt);
                if let Some(url) = question.image_url.as_deref() {
                    println!("  {url}");
                }
                for (number, option) in question.options.iter().enumerate() {
                    println!("  {}) {}", number + 1, option.label);
                }
            }
            GameScreen::GameOver(summary) => {
                println!();
                println!("Game Over");
                println!("{}", summary.level_label);
                println!("{}", summary.score_label);
                println!("Press r to play again or q to quit.");
            }
        }
    }

    fn show_verdict(&self) {
        let session = self.vm.session();
        let Some(feedback) = session.feedback() else {
            return;
        };
        match feedback.verdict {
            Verdict::Correct => println!("Correct! {}", self.vm.hud().score_label),
            Verdict::Incorrect => {
                let correct = session.current_question().map(|question| question.correct_answer());
                match correct {
                    Some(correct) => println!("Wrong! The answer was {correct}."),
                    None => println!("Wrong!"),
                }
            }
        }
    }
}

fn parse_menu_choice(input: &str) -> Option<GameMode> {
    if let Ok(number) = input.parse::<usize>() {
        return number.checked_sub(1).and_then(|index| GameMode::ALL.get(index).copied());
    }
    GameMode::from_str(input).ok()
}

fn parse_option(question: &QuestionVm, input: &str) -> Option<Answer> {
    let number = input.parse::<usize>().ok()?;
    let option = question.options.get(number.checked_sub(1)?)?;
    Some(option.answer.clone())
}
