use super::match_record::MatchRecord;
use super::stat_bucket::StatBucket;
use crate::error::AppError;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::RangeInclusive;
use tracing::{debug, warn};

/// Play recorded for a turn on which the hero's side played nothing.
pub const PASS: &str = "pass";

/// Hearthstone ends a game as a draw after turn 89; later turn numbers are bogus.
pub const TURN_LIMIT: u32 = 90;

/// Which turns of a game feed the per-turn statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnBoundary {
    /// Turns `1..last_turn`; the final turn is left out.
    #[default]
    ExcludeLast,
    /// Turns `1..=last_turn`.
    IncludeLast,
}

impl TurnBoundary {
    fn turns(self, last_turn: u32) -> RangeInclusive<u32> {
        let last_turn = last_turn.min(TURN_LIMIT);
        match self {
            TurnBoundary::ExcludeLast => 1..=last_turn.saturating_sub(1),
            TurnBoundary::IncludeLast => 1..=last_turn,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    /// Drop games where the hero's side has no recorded plays.
    pub require_played_cards: bool,
    pub turn_boundary: TurnBoundary,
}

/// Cards played on turns 1, 2 and 3. Slots compare as sets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opening(pub [BTreeSet<String>; 3]);

impl Opening {
    pub fn of(record: &MatchRecord) -> Self {
        Opening(record.opening().map(|turn| {
            turn.into_iter().map(str::to_string).collect::<BTreeSet<_>>()
        }))
    }

    pub fn turn(&self, turn: usize) -> &BTreeSet<String> {
        &self.0[turn]
    }
}

/// Mana differential ranges, declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ManaBucket {
    BigDisadvantage,
    SlightDisadvantage,
    AboutEven,
    SlightAdvantage,
    BigAdvantage,
}

impl ManaBucket {
    pub const ALL: [ManaBucket; 5] = [
        ManaBucket::BigDisadvantage,
        ManaBucket::SlightDisadvantage,
        ManaBucket::AboutEven,
        ManaBucket::SlightAdvantage,
        ManaBucket::BigAdvantage,
    ];

    pub fn from_differential(differential: i64) -> Self {
        if differential < -7 {
            ManaBucket::BigDisadvantage
        } else if differential < -2 {
            ManaBucket::SlightDisadvantage
        } else if differential < 2 {
            ManaBucket::AboutEven
        } else if differential < 8 {
            ManaBucket::SlightAdvantage
        } else {
            ManaBucket::BigAdvantage
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ManaBucket::BigDisadvantage => "big disadvantage",
            ManaBucket::SlightDisadvantage => "slight disadvantage",
            ManaBucket::AboutEven => "about even",
            ManaBucket::SlightAdvantage => "slight advantage",
            ManaBucket::BigAdvantage => "big advantage",
        }
    }

    pub fn range(self) -> &'static str {
        match self {
            ManaBucket::BigDisadvantage => "-8 or less",
            ManaBucket::SlightDisadvantage => "-7 to -3",
            ManaBucket::AboutEven => "-2 to 1",
            ManaBucket::SlightAdvantage => "2 to 7",
            ManaBucket::BigAdvantage => "8 or more",
        }
    }
}

/// Per-card tally with a nested breakdown by opponent.
#[derive(Debug, Clone, Default)]
pub struct CardStat {
    pub totals: StatBucket,
    pub opponents: HashMap<String, StatBucket>,
}

/// Win/loss totals over every game, regardless of hero.
pub fn summarize_games(records: &[MatchRecord]) -> StatBucket {
    let mut totals = StatBucket::new();
    for record in records {
        totals.record(record.won());
    }
    totals
}

/// Statistics for one hero over a borrowed game list.
#[derive(Debug)]
pub struct HeroAnalysis<'a> {
    hero: String,
    options: AnalysisOptions,
    games: Vec<&'a MatchRecord>,
    overall: StatBucket,
    opponents: HashMap<String, StatBucket>,
}

impl<'a> HeroAnalysis<'a> {
    /// Fails with `CannotAnalyze` when no game survives the hero filter.
    pub fn new(
        records: &'a [MatchRecord],
        hero: &str,
        options: AnalysisOptions,
    ) -> Result<Self, AppError> {
        let mut games = Vec::new();
        let mut overall = StatBucket::new();
        let mut opponents: HashMap<String, StatBucket> = HashMap::new();

        for record in records {
            if record.hero() != hero {
                continue;
            }
            if options.require_played_cards && !record.had_played_cards() {
                continue;
            }

            overall.record(record.won());
            opponents
                .entry(record.opponent().to_string())
                .or_default()
                .record(record.won());
            games.push(record);
        }

        if overall.games == 0 {
            return Err(AppError::CannotAnalyze(hero.to_string()));
        }

        debug!(
            "{} of {} games selected for {}",
            games.len(),
            records.len(),
            hero
        );

        Ok(HeroAnalysis {
            hero: hero.to_string(),
            options,
            games,
            overall,
            opponents,
        })
    }

    pub fn hero(&self) -> &str {
        &self.hero
    }

    pub fn overall(&self) -> &StatBucket {
        &self.overall
    }

    pub fn opponents(&self) -> &HashMap<String, StatBucket> {
        &self.opponents
    }

    /// Each distinct card counts once per game it was played in.
    pub fn card_stats(&self) -> HashMap<String, CardStat> {
        let mut cards: HashMap<String, CardStat> = HashMap::new();

        for game in &self.games {
            let won = game.won();
            for card in game.cards() {
                let stat = cards.entry(card.to_string()).or_default();
                stat.totals.record(won);
                stat.opponents
                    .entry(game.opponent().to_string())
                    .or_default()
                    .record(won);
            }
        }

        cards
    }

    pub fn opening_stats(&self) -> HashMap<Opening, StatBucket> {
        let mut openings: HashMap<Opening, StatBucket> = HashMap::new();
        for game in &self.games {
            openings.entry(Opening::of(game)).or_default().record(game.won());
        }
        openings
    }

    /// Keyed by turn, then by card name (or `PASS`).
    pub fn turn_play_stats(&self) -> BTreeMap<u32, HashMap<String, StatBucket>> {
        let mut turns: BTreeMap<u32, HashMap<String, StatBucket>> = BTreeMap::new();

        for game in &self.games {
            let won = game.won();
            let last_turn = game.last_turn();
            if last_turn > TURN_LIMIT {
                warn!(
                    id = game.raw().id,
                    last_turn, "turn number past the game limit, later turns ignored"
                );
            }

            for turn in self.options.turn_boundary.turns(last_turn) {
                let cards = game.cards_on_turn(turn);
                let plays = turns.entry(turn).or_default();

                if cards.is_empty() {
                    plays.entry(PASS.to_string()).or_default().record(won);
                }
                for card in cards {
                    plays.entry(card.to_string()).or_default().record(won);
                }
            }
        }

        turns
    }

    pub fn mana_stats(&self) -> BTreeMap<ManaBucket, StatBucket> {
        let mut buckets: BTreeMap<ManaBucket, StatBucket> = BTreeMap::new();
        for game in &self.games {
            let bucket = ManaBucket::from_differential(game.mana_differential());
            buckets.entry(bucket).or_default().record(game.won());
        }
        buckets
    }

    /// `None` collects games without a ladder rank.
    pub fn rank_stats(&self) -> BTreeMap<Option<u32>, StatBucket> {
        let mut ranks: BTreeMap<Option<u32>, StatBucket> = BTreeMap::new();
        for game in &self.games {
            ranks.entry(game.rank()).or_default().record(game.won());
        }
        ranks
    }
}
