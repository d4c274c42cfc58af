use crate::api::models::{CardPlayDto, Player, RawGame};
use std::collections::BTreeSet;
use std::fmt;

/// Deck name shown when Track-o-bot could not identify the archetype.
pub const UNKNOWN_DECK: &str = "Other";

const WIN_MARKER: &str = "win";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Loss,
}

/// Read-only view over one recorded game.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    raw: RawGame,
}

impl MatchRecord {
    pub fn new(raw: RawGame) -> Self {
        MatchRecord { raw }
    }

    pub fn raw(&self) -> &RawGame {
        &self.raw
    }

    pub fn hero(&self) -> &str {
        &self.raw.hero
    }

    pub fn deck(&self) -> &str {
        self.raw.hero_deck.as_deref().unwrap_or(UNKNOWN_DECK)
    }

    pub fn opponent(&self) -> &str {
        &self.raw.opponent
    }

    pub fn opponent_deck(&self) -> &str {
        self.raw.opponent_deck.as_deref().unwrap_or(UNKNOWN_DECK)
    }

    pub fn date(&self) -> &str {
        &self.raw.added
    }

    pub fn rank(&self) -> Option<u32> {
        self.raw.rank
    }

    /// Anything other than an exact "win" counts as a loss; draws are not modeled.
    pub fn result(&self) -> GameResult {
        if self.raw.result == WIN_MARKER {
            GameResult::Win
        } else {
            GameResult::Loss
        }
    }

    pub fn won(&self) -> bool {
        self.result() == GameResult::Win
    }

    /// Distinct cards the hero's side played during the game.
    pub fn cards(&self) -> BTreeSet<&str> {
        self.own_plays().map(|play| play.card.name.as_str()).collect()
    }

    pub fn cards_on_turn(&self, turn: u32) -> BTreeSet<&str> {
        self.own_plays()
            .filter(|play| play.turn == turn)
            .map(|play| play.card.name.as_str())
            .collect()
    }

    pub fn opening(&self) -> [BTreeSet<&str>; 3] {
        [
            self.cards_on_turn(1),
            self.cards_on_turn(2),
            self.cards_on_turn(3),
        ]
    }

    /// 0 when no plays were recorded for the hero's side.
    pub fn last_turn(&self) -> u32 {
        self.own_plays().map(|play| play.turn).max().unwrap_or(0)
    }

    pub fn had_played_cards(&self) -> bool {
        self.last_turn() > 0
    }

    pub fn mana_spent(&self, player: Player) -> i64 {
        self.raw
            .card_history
            .iter()
            .filter(|play| play.player == player)
            .map(|play| i64::from(play.card.mana.unwrap_or(0)))
            .sum()
    }

    /// Negative when the opponent spent more.
    pub fn mana_differential(&self) -> i64 {
        self.mana_spent(Player::Me) - self.mana_spent(Player::Opponent)
    }

    fn own_plays(&self) -> impl Iterator<Item = &CardPlayDto> {
        self.raw
            .card_history
            .iter()
            .filter(|play| play.player == Player::Me)
    }
}

impl From<RawGame> for MatchRecord {
    fn from(raw: RawGame) -> Self {
        MatchRecord::new(raw)
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = if self.won() { "W" } else { "L" };
        write!(
            f,
            "{}: {} {} vs. {} {} on {}",
            result,
            self.deck(),
            self.hero(),
            self.opponent_deck(),
            self.opponent(),
            self.date()
        )
    }
}
