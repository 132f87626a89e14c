use clap::{Parser, ValueEnum};
use crossterm::tty::IsTty;
use keydrill::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    game::{Game, ReportMode},
    phrases::PhraseSet,
    store::PlayerStore,
};
use std::{
    error::Error,
    io::{self, stdout},
    path::PathBuf,
};

/// terminal typing trainer with per-player history and progress charts
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing trainer: timed drills scored by string similarity, per-player trial history in a flat append-only log, and progress charts over your typing speed and accuracy."
)]
pub struct Cli {
    /// directory holding the per-player trial logs
    #[clap(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// phrase set to practice
    #[clap(short = 'p', long, value_enum)]
    phrase_set: Option<SupportedPhraseSet>,

    /// log in as this player on startup
    #[clap(long)]
    player: Option<String>,

    /// print performance reports as text instead of charts
    #[clap(long)]
    plain: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum SupportedPhraseSet {
    Classic,
    Code,
}

impl SupportedPhraseSet {
    fn as_set(&self) -> PhraseSet {
        PhraseSet::load(&self.to_string().to_lowercase())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config_store = FileConfigStore::new();
    if !config_store.path().exists() {
        // drop a template the user can edit
        if let Err(e) = config_store.save(&Config::default()) {
            log::warn!("could not write default config: {e}");
        }
    }
    let config = config_store.load();

    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .or_else(AppDirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("keydrill-data"));
    log::debug!("player data directory: {}", data_dir.display());

    let phrases = match cli.phrase_set {
        Some(set) => set.as_set(),
        None => PhraseSet::try_load(&config.phrase_set).unwrap_or_else(|| {
            log::warn!("unknown phrase set {:?} in config, using classic", config.phrase_set);
            PhraseSet::load("classic")
        }),
    };

    // charts need a real terminal
    let report_mode = if cli.plain || config.plain_report || !stdout().is_tty() {
        ReportMode::Plain
    } else {
        ReportMode::Chart
    };

    let stdin = io::stdin();
    let mut game = Game::new(
        PlayerStore::new(data_dir),
        phrases,
        report_mode,
        stdin.lock(),
        stdout(),
    );

    if let Some(name) = &cli.player {
        if !game.try_login(name) {
            println!("keydrill: No player named {name}; create one from the menu.");
        }
    }

    game.run()?;

    Ok(())
}
