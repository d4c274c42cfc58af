use crate::analysis::match_record::UNKNOWN_DECK;
use crate::api::models::RawGame;
use crate::error::AppError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Optional hero/deck restriction applied while merging files.
#[derive(Debug, Clone, Default)]
pub struct MergeFilter {
    pub hero: Option<String>,
    pub deck: Option<String>,
}

impl MergeFilter {
    fn accepts(&self, game: &RawGame) -> bool {
        let hero_ok = self.hero.as_deref().map_or(true, |hero| hero == game.hero);
        let deck = game.hero_deck.as_deref().unwrap_or(UNKNOWN_DECK);
        let deck_ok = self.deck.as_deref().map_or(true, |wanted| wanted == deck);
        hero_ok && deck_ok
    }
}

pub fn load_games(path: &Path) -> Result<Vec<RawGame>, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;

    let games: Vec<RawGame> = serde_json::from_str(&content).map_err(|e| {
        AppError::JsonError(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    info!(path = %path.display(), games = games.len(), "loaded game history");
    Ok(games)
}

pub fn save_games(path: &Path, games: &[RawGame]) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(games)
        .map_err(|e| AppError::JsonError(format!("Failed to serialize games: {}", e)))?;

    fs::write(path, json)
        .map_err(|e| AppError::IoError(format!("Failed to write {}: {}", path.display(), e)))?;

    info!(path = %path.display(), games = games.len(), "saved game history");
    Ok(())
}

/// Keep the first occurrence of every game id, preserving order.
pub fn dedup_games(games: impl IntoIterator<Item = RawGame>) -> Vec<RawGame> {
    let mut seen = HashSet::new();
    games
        .into_iter()
        .filter(|game| seen.insert(game.id))
        .collect()
}

/// Load every file in order and merge them into one de-duplicated list.
pub fn merge_files<P: AsRef<Path>>(
    paths: &[P],
    filter: &MergeFilter,
) -> Result<Vec<RawGame>, AppError> {
    let mut merged = Vec::new();
    for path in paths {
        merged.extend(
            load_games(path.as_ref())?
                .into_iter()
                .filter(|game| filter.accepts(game)),
        );
    }

    let before = merged.len();
    let merged = dedup_games(merged);
    debug!(
        duplicates = before - merged.len(),
        kept = merged.len(),
        "merged game files"
    );
    Ok(merged)
}
