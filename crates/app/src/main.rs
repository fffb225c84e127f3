mod terminal;

use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quest_core::model::GameMode;
use services::config::{parse_millis, parse_number, seed_from_env};
use services::{
    ConfigError, GameLoopService, GeneratorConfig, JikanClient, ProviderConfig, QuestionGenerator,
};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidMode { raw: String },
    Config(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidMode { raw } => {
                write!(f, "invalid --mode value: {raw} (expected character or episodes)")
            }
            ArgsError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArgsError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for ArgsError {
    fn from(err: ConfigError) -> Self {
        ArgsError::Config(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    game_loop: Arc<GameLoopService>,
    launch_mode: Option<GameMode>,
}

impl UiApp for DesktopApp {
    fn game_loop(&self) -> Arc<GameLoopService> {
        Arc::clone(&self.game_loop)
    }

    fn launch_mode(&self) -> Option<GameMode> {
        self.launch_mode
    }
}

#[derive(Debug, Default)]
struct Args {
    provider: ProviderConfig,
    generator: GeneratorConfig,
    seed: Option<u64>,
    mode: Option<GameMode>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [options]   # desktop window (default)");
    eprintln!("  cargo run -p app -- play [options]   # play in the terminal");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --provider-url <url>      anime API base (default https://api.jikan.moe/v4/)");
    eprintln!("  --seed <u64>              replay the same questions");
    eprintln!("  --attempt-delay-ms <ms>   pause between provider lookups (default 400)");
    eprintln!("  --mode character|episodes start a game right away");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUEST_PROVIDER_URL, QUEST_PAGE_SIZE, QUEST_ATTEMPT_DELAY_MS, QUEST_SEED, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Play,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "play" => Some(Self::Play),
            _ => None,
        }
    }
}

impl Args {
    fn from_env() -> Result<Self, ArgsError> {
        Ok(Self {
            provider: ProviderConfig::from_env()?,
            generator: GeneratorConfig::from_env()?,
            seed: seed_from_env()?,
            mode: None,
        })
    }

    /// Flags override whatever the environment set.
    fn apply_flags(mut self, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--provider-url" => {
                    let value = require_value(args, "--provider-url")?;
                    self.provider = self.provider.with_base_url(&value)?;
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    self.seed = Some(parse_number("--seed", &value)?);
                }
                "--attempt-delay-ms" => {
                    let value = require_value(args, "--attempt-delay-ms")?;
                    self.generator.attempt_delay = parse_millis("--attempt-delay-ms", &value)?;
                }
                "--mode" => {
                    let value = require_value(args, "--mode")?;
                    let mode = value
                        .parse::<GameMode>()
                        .map_err(|_| ArgsError::InvalidMode { raw: value.clone() })?;
                    self.mode = Some(mode);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(self)
    }

    fn game_loop(&self) -> GameLoopService {
        let client = JikanClient::new(self.provider.clone());
        let generator =
            QuestionGenerator::new(Arc::new(client)).with_config(self.generator.clone());
        let game_loop = GameLoopService::new(generator);
        match self.seed {
            Some(seed) => game_loop.with_seed(seed),
            None => game_loop,
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::from_env()
        .and_then(|args| args.apply_flags(&mut iter))
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;
    log::info!(
        "using provider {} (page size {}, seed {:?})",
        parsed.provider.base_url,
        parsed.provider.page_size,
        parsed.seed
    );

    let game_loop = Arc::new(parsed.game_loop());
    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                game_loop,
                launch_mode: parsed.mode,
            });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Anime Knowledge Quest")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Play => {
            terminal::play(game_loop, parsed.mode).await?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
