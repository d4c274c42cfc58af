use anyhow::{bail, Context, Result};
use clap::Parser;
use hs_deck_analyzer::display::output::display_success;
use hs_deck_analyzer::store::{self, MergeFilter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Merge several saved game files into one, dropping duplicate game ids.
#[derive(Parser, Debug)]
#[command(name = "smoosh")]
struct Args {
    /// Files containing JSON game data; earlier files win on duplicate ids
    #[arg(short, long, num_args = 1..)]
    infiles: Vec<PathBuf>,

    /// Where to write the merged games
    #[arg(short, long, default_value = "smooshed_games.json")]
    outfile: PathBuf,

    /// Only keep games played with this hero, e.g. Mage
    #[arg(short = 'c', long)]
    hero: Option<String>,

    /// Only keep games played with this deck, e.g. Other
    #[arg(short = 'k', long)]
    deck: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.infiles.is_empty() {
        bail!("no input files given, pass them with --infiles");
    }

    let filter = MergeFilter {
        hero: args.hero,
        deck: args.deck,
    };
    let games = store::merge_files(&args.infiles, &filter).context("failed to merge game files")?;

    store::save_games(&args.outfile, &games)
        .with_context(|| format!("failed to write {}", args.outfile.display()))?;

    display_success(&format!(
        "Wrote {} games to {}",
        games.len(),
        args.outfile.display()
    ));
    Ok(())
}
