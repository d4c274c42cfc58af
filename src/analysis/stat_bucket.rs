/// Win/loss tally shared by every grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatBucket {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
}

impl StatBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, won: bool) {
        self.games += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    /// Callers only ask this of buckets that saw at least one game.
    pub fn win_percentage(&self) -> f64 {
        debug_assert!(self.games > 0, "win percentage of an empty bucket");
        percentage(self.wins, self.games)
    }

    /// Share of `total` games that fell into this bucket.
    pub fn share_of(&self, total: u32) -> f64 {
        debug_assert!(total > 0, "share of an empty sample");
        percentage(self.games, total)
    }

    /// Results of the games in `total` that are not in this bucket.
    pub fn unplayed(&self, total: &StatBucket) -> UnplayedStats {
        UnplayedStats {
            wins: total.wins - self.wins,
            losses: total.losses - self.losses,
        }
    }
}

/// Counterfactual tally for the games where a card was not played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnplayedStats {
    pub wins: u32,
    pub losses: u32,
}

impl UnplayedStats {
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    /// 0 when the card was played in every game.
    pub fn win_percentage(&self) -> f64 {
        percentage(self.wins, self.games())
    }
}

pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}
