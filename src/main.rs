use chrono::Utc;
use clap::{CommandFactory, Parser};
use hs_deck_analyzer::analysis::engine::{
    summarize_games, AnalysisOptions, HeroAnalysis, TurnBoundary,
};
use hs_deck_analyzer::analysis::match_record::MatchRecord;
use hs_deck_analyzer::analysis::report::{HeroReport, ReportOptions};
use hs_deck_analyzer::api::client::{fetch_window, window_cutoff, TrackobotClient};
use hs_deck_analyzer::api::models::RawGame;
use hs_deck_analyzer::config::{Config, MAX_WINDOW_DAYS};
use hs_deck_analyzer::display::output::{
    display_error, display_hero_report, display_info, display_overall_summary, display_success,
};
use hs_deck_analyzer::error::AppError;
use hs_deck_analyzer::store;
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hs-deck-analyzer")]
#[command(about = "Win rate breakdowns for your Track-o-bot game history", long_about = None)]
struct Args {
    /// Your Track-o-bot username
    #[arg(short, long)]
    username: Option<String>,

    /// Your Track-o-bot API token
    #[arg(short, long)]
    token: Option<String>,

    /// JSON file with the games to analyze; used instead of fetching when given
    #[arg(short, long)]
    infile: Option<PathBuf>,

    /// Where to store the games fetched from Track-o-bot
    #[arg(short, long, default_value = "trackobot_games.json")]
    outfile: PathBuf,

    /// Hero class to analyze in detail, e.g. Mage
    #[arg(short = 'c', long)]
    hero: Option<String>,

    /// Minimum games behind a card or turn play before it is shown
    #[arg(short, long = "sample-size", default_value = "0")]
    sample_size: u32,

    /// Days of history to fetch (max: 10)
    #[arg(short, long, default_value_t = MAX_WINDOW_DAYS)]
    days: u32,

    /// Only count games where you played at least one card
    #[arg(long)]
    require_cards: bool,

    /// Include each game's final turn in the per-turn analysis
    #[arg(long)]
    include_last_turn: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        if matches!(e, AppError::ConfigError(_)) {
            let _ = Args::command().print_help();
            println!();
        }
        display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let raw_games = match &args.infile {
        Some(infile) => {
            display_info(&format!("Loading games from {}", infile.display()));
            store::load_games(infile)?
        }
        None => fetch_games(&args)?,
    };

    let games: Vec<MatchRecord> = raw_games.into_iter().map(MatchRecord::from).collect();
    for game in &games {
        debug!("{}", game);
    }

    display_overall_summary(&summarize_games(&games));

    let Some(hero) = &args.hero else {
        return Ok(());
    };

    let options = AnalysisOptions {
        require_played_cards: args.require_cards,
        turn_boundary: if args.include_last_turn {
            TurnBoundary::IncludeLast
        } else {
            TurnBoundary::ExcludeLast
        },
    };

    match HeroAnalysis::new(&games, hero, options) {
        Ok(analysis) => {
            let report = HeroReport::build(
                &analysis,
                &ReportOptions {
                    min_sample_size: args.sample_size,
                },
            );
            display_hero_report(&report);
        }
        // An empty hero sample only skips the detailed sections.
        Err(e @ AppError::CannotAnalyze(_)) => display_error(&e.to_string()),
        Err(e) => return Err(e),
    }

    Ok(())
}

fn fetch_games(args: &Args) -> Result<Vec<RawGame>, AppError> {
    let config = Config::from_env(args.username.clone(), args.token.clone(), args.days)?;
    let credentials = config.require_credentials()?.clone();

    display_info(&format!(
        "Fetching the last {} days of games from Track-o-bot for {}",
        config.days, credentials.username
    ));

    let client = TrackobotClient::new(credentials, config.history_url.clone());
    let cutoff = window_cutoff(config.days, Utc::now());

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(120));
    let games = fetch_window(&client, cutoff, &pb);
    pb.finish_and_clear();
    let games = games?;

    display_success(&format!("Fetched {} games", games.len()));

    // Saved every run so the analysis can be repeated offline.
    store::save_games(&args.outfile, &games)?;
    display_success(&format!("Saved games to {}", args.outfile.display()));

    Ok(games)
}
