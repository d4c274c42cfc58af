use super::engine::{CardStat, HeroAnalysis, ManaBucket, Opening};
use super::stat_bucket::{StatBucket, UnplayedStats};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Opponents below this share of the hero's games get no card breakdown.
pub const CARD_VS_OPPONENT_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Card and turn-play rows backed by fewer games are hidden.
    pub min_sample_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupRow {
    pub opponent: String,
    pub stats: StatBucket,
    pub win_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardLine {
    pub card: String,
    pub stats: StatBucket,
    pub win_percentage: f64,
    pub played_percentage: f64,
    pub unplayed: UnplayedStats,
    pub unplayed_win_percentage: f64,
}

impl CardLine {
    fn new(card: &str, stats: StatBucket, sample: &StatBucket) -> Self {
        let unplayed = stats.unplayed(sample);
        CardLine {
            card: card.to_string(),
            stats,
            win_percentage: stats.win_percentage(),
            played_percentage: stats.share_of(sample.games),
            unplayed,
            unplayed_win_percentage: unplayed.win_percentage(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardRow {
    /// Marks where card win rates drop below the hero's overall rate.
    DeckAverage {
        wins: u32,
        win_percentage: f64,
        games: u32,
    },
    Card(CardLine),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpponentCardTable {
    pub opponent: String,
    pub games: u32,
    pub rows: Vec<CardLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardSummaryRow {
    /// Card name; empty on the deck average row.
    pub label: String,
    pub deck_average: bool,
    pub win_percentage: f64,
    /// One slot per opponent in `CardSummary::opponents` order.
    pub against: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardSummary {
    pub hero_games: u32,
    pub opponents: Vec<(String, u32)>,
    pub rows: Vec<CardSummaryRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpeningRow {
    pub turns: [Vec<String>; 3],
    pub stats: StatBucket,
    pub win_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnPlayRow {
    pub turn: u32,
    pub play: String,
    pub stats: StatBucket,
    pub win_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManaRow {
    pub bucket: ManaBucket,
    pub stats: StatBucket,
    pub games_percentage: f64,
    pub win_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankRow {
    pub rank: Option<u32>,
    pub stats: StatBucket,
    pub win_percentage: f64,
}

/// Every report section for one hero, ready for rendering.
#[derive(Debug, Clone)]
pub struct HeroReport {
    pub hero: String,
    pub overall: StatBucket,
    pub min_sample_size: u32,
    pub matchups: Vec<MatchupRow>,
    pub cards: Vec<CardRow>,
    pub card_vs_opponents: Vec<OpponentCardTable>,
    pub card_summary: CardSummary,
    pub openings: Vec<OpeningRow>,
    pub turn_plays: Vec<TurnPlayRow>,
    pub mana: Vec<ManaRow>,
    pub ranks: Vec<RankRow>,
}

impl HeroReport {
    pub fn build(analysis: &HeroAnalysis<'_>, options: &ReportOptions) -> Self {
        let card_stats = analysis.card_stats();
        let card_order = cards_by_win_percentage(&card_stats, options.min_sample_size);

        HeroReport {
            hero: analysis.hero().to_string(),
            overall: *analysis.overall(),
            min_sample_size: options.min_sample_size,
            matchups: matchup_rows(analysis),
            cards: card_rows(analysis, &card_stats, &card_order),
            card_vs_opponents: card_vs_opponent_tables(analysis, &card_stats, &card_order),
            card_summary: card_summary(analysis, &card_stats, &card_order),
            openings: opening_rows(&analysis.opening_stats()),
            turn_plays: turn_play_rows(analysis, options.min_sample_size),
            mana: mana_rows(analysis),
            ranks: rank_rows(analysis),
        }
    }
}

fn by_win_percentage_desc(a: (f64, &str), b: (f64, &str)) -> Ordering {
    b.0.partial_cmp(&a.0)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.1.cmp(b.1))
}

/// Opponents ordered by game count, most frequent first.
pub fn opponents_by_frequency<'r>(
    analysis: &'r HeroAnalysis<'_>,
) -> Vec<(&'r str, &'r StatBucket)> {
    let mut opponents: Vec<_> = analysis
        .opponents()
        .iter()
        .map(|(name, stats)| (name.as_str(), stats))
        .collect();
    opponents.sort_by(|a, b| b.1.games.cmp(&a.1.games).then_with(|| a.0.cmp(b.0)));
    opponents
}

pub fn matchup_rows(analysis: &HeroAnalysis<'_>) -> Vec<MatchupRow> {
    let overall = analysis.overall();
    let mut rows = vec![MatchupRow {
        opponent: "All".to_string(),
        stats: *overall,
        win_percentage: overall.win_percentage(),
    }];

    rows.extend(
        opponents_by_frequency(analysis)
            .into_iter()
            .map(|(opponent, stats)| MatchupRow {
                opponent: opponent.to_string(),
                stats: *stats,
                win_percentage: stats.win_percentage(),
            }),
    );
    rows
}

/// Displayed card names, best win rate first, small samples removed.
pub fn cards_by_win_percentage(
    cards: &HashMap<String, CardStat>,
    min_sample_size: u32,
) -> Vec<String> {
    let mut order: Vec<(&str, f64)> = cards
        .iter()
        .filter(|(_, stat)| stat.totals.games >= min_sample_size)
        .map(|(card, stat)| (card.as_str(), stat.totals.win_percentage()))
        .collect();
    order.sort_by(|a, b| by_win_percentage_desc((a.1, a.0), (b.1, b.0)));
    order.into_iter().map(|(card, _)| card.to_string()).collect()
}

pub fn card_rows(
    analysis: &HeroAnalysis<'_>,
    cards: &HashMap<String, CardStat>,
    card_order: &[String],
) -> Vec<CardRow> {
    let overall = analysis.overall();
    let deck_percentage = overall.win_percentage();
    let mut rows = Vec::with_capacity(card_order.len() + 1);
    let mut deck_inserted = false;

    for card in card_order {
        let Some(stat) = cards.get(card) else {
            continue;
        };
        let line = CardLine::new(card, stat.totals, overall);

        if !deck_inserted && line.win_percentage < deck_percentage {
            deck_inserted = true;
            rows.push(CardRow::DeckAverage {
                wins: overall.wins,
                win_percentage: deck_percentage,
                games: overall.games,
            });
        }
        rows.push(CardRow::Card(line));
    }

    rows
}

/// Card breakdowns for opponents making up at least 10% of the hero's games.
pub fn card_vs_opponent_tables(
    analysis: &HeroAnalysis<'_>,
    cards: &HashMap<String, CardStat>,
    card_order: &[String],
) -> Vec<OpponentCardTable> {
    let hero_games = f64::from(analysis.overall().games);

    opponents_by_frequency(analysis)
        .into_iter()
        .filter(|(_, stats)| f64::from(stats.games) >= hero_games * CARD_VS_OPPONENT_THRESHOLD)
        .map(|(opponent, opponent_stats)| {
            let rows = card_order
                .iter()
                .filter_map(|card| {
                    let against = cards.get(card)?.opponents.get(opponent)?;
                    Some(CardLine::new(card, *against, opponent_stats))
                })
                .collect();

            OpponentCardTable {
                opponent: opponent.to_string(),
                games: opponent_stats.games,
                rows,
            }
        })
        .collect()
}

pub fn card_summary(
    analysis: &HeroAnalysis<'_>,
    cards: &HashMap<String, CardStat>,
    card_order: &[String],
) -> CardSummary {
    let overall = analysis.overall();
    let deck_percentage = overall.win_percentage();
    let opponents = opponents_by_frequency(analysis);

    let mut rows = Vec::with_capacity(card_order.len() + 1);
    let mut deck_inserted = false;

    for card in card_order {
        let Some(stat) = cards.get(card) else {
            continue;
        };
        let win_percentage = stat.totals.win_percentage();

        if !deck_inserted && win_percentage < deck_percentage {
            deck_inserted = true;
            rows.push(CardSummaryRow {
                label: String::new(),
                deck_average: true,
                win_percentage: deck_percentage,
                against: opponents
                    .iter()
                    .map(|(_, stats)| Some(stats.win_percentage()))
                    .collect(),
            });
        }

        rows.push(CardSummaryRow {
            label: card.clone(),
            deck_average: false,
            win_percentage,
            against: opponents
                .iter()
                .map(|(opponent, _)| stat.opponents.get(*opponent).map(StatBucket::win_percentage))
                .collect(),
        });
    }

    CardSummary {
        hero_games: overall.games,
        opponents: opponents
            .iter()
            .map(|(opponent, stats)| (opponent.to_string(), stats.games))
            .collect(),
        rows,
    }
}

/// Ordered by the turn 1, 2, 3 plays.
pub fn opening_rows(openings: &HashMap<Opening, StatBucket>) -> Vec<OpeningRow> {
    let mut sorted: Vec<_> = openings.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    sorted
        .into_iter()
        .map(|(opening, stats)| OpeningRow {
            turns: opening.0.clone().map(|turn| turn.into_iter().collect()),
            stats: *stats,
            win_percentage: stats.win_percentage(),
        })
        .collect()
}

pub fn turn_play_rows(analysis: &HeroAnalysis<'_>, min_sample_size: u32) -> Vec<TurnPlayRow> {
    let mut rows = Vec::new();

    for (turn, plays) in analysis.turn_play_stats() {
        let mut turn_rows: Vec<TurnPlayRow> = plays
            .into_iter()
            .filter(|(_, stats)| stats.games >= min_sample_size)
            .map(|(play, stats)| TurnPlayRow {
                turn,
                play,
                stats,
                win_percentage: stats.win_percentage(),
            })
            .collect();
        turn_rows.sort_by(|a, b| {
            by_win_percentage_desc(
                (a.win_percentage, a.play.as_str()),
                (b.win_percentage, b.play.as_str()),
            )
        });
        rows.extend(turn_rows);
    }

    rows
}

pub fn mana_rows(analysis: &HeroAnalysis<'_>) -> Vec<ManaRow> {
    let hero_games = analysis.overall().games;
    let buckets = analysis.mana_stats();

    ManaBucket::ALL
        .iter()
        .filter_map(|bucket| {
            let stats = buckets.get(bucket).filter(|stats| stats.games > 0)?;
            Some(ManaRow {
                bucket: *bucket,
                stats: *stats,
                games_percentage: stats.share_of(hero_games),
                win_percentage: stats.win_percentage(),
            })
        })
        .collect()
}

/// Highest rank number first; unranked games last.
pub fn rank_rows(analysis: &HeroAnalysis<'_>) -> Vec<RankRow> {
    let ranks = analysis.rank_stats();
    let ranked = ranks.iter().rev().filter(|(rank, _)| rank.is_some());
    let unranked = ranks.iter().filter(|(rank, _)| rank.is_none());

    ranked
        .chain(unranked)
        .map(|(rank, stats)| RankRow {
            rank: *rank,
            stats: *stats,
            win_percentage: stats.win_percentage(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::engine::AnalysisOptions;
    use crate::analysis::match_record::tests::{game, play};
    use crate::analysis::match_record::MatchRecord;
    use crate::api::models::Player::{Me, Opponent};

    fn deck_markers(rows: &[CardRow]) -> usize {
        rows.iter()
            .filter(|row| matches!(row, CardRow::DeckAverage { .. }))
            .count()
    }

    fn card_names(rows: &[CardRow]) -> Vec<&str> {
        rows.iter()
            .map(|row| match row {
                CardRow::DeckAverage { .. } => "-- deck --",
                CardRow::Card(line) => line.card.as_str(),
            })
            .collect()
    }

    fn sample() -> Vec<MatchRecord> {
        vec![
            game(
                1,
                "Mage",
                "Warrior",
                "win",
                vec![play(Me, 1, "Mirror Image", 1), play(Me, 2, "Frostbolt", 2)],
            ),
            game(
                2,
                "Mage",
                "Warrior",
                "win",
                vec![play(Me, 1, "Mirror Image", 1), play(Me, 3, "Flamestrike", 7)],
            ),
            game(
                3,
                "Mage",
                "Druid",
                "loss",
                vec![play(Me, 2, "Frostbolt", 2), play(Me, 4, "Flamestrike", 7)],
            ),
            game(
                4,
                "Mage",
                "Druid",
                "loss",
                vec![play(Me, 2, "Polymorph", 4), play(Opponent, 2, "Wild Growth", 2)],
            ),
        ]
    }

    #[test]
    fn matchups_start_with_all_then_frequency() {
        let mut records = sample();
        records.push(game(5, "Mage", "Hunter", "win", vec![]));
        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        let rows = matchup_rows(&analysis);

        let names: Vec<_> = rows.iter().map(|row| row.opponent.as_str()).collect();
        assert_eq!(names, vec!["All", "Druid", "Warrior", "Hunter"]);
        assert_eq!(rows[0].stats.games, 5);
        assert!((rows[0].win_percentage - 60.0).abs() < 1e-9);
    }

    #[test]
    fn deck_marker_precedes_first_card_below_average() {
        let records = sample();
        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        let report = HeroReport::build(&analysis, &ReportOptions::default());

        assert_eq!(
            card_names(&report.cards),
            vec![
                "Mirror Image",
                "Flamestrike",
                "Frostbolt",
                "-- deck --",
                "Polymorph"
            ]
        );
        assert_eq!(deck_markers(&report.cards), 1);
    }

    #[test]
    fn deck_marker_appears_once_with_several_cards_below_average() {
        let records = vec![
            game(1, "Mage", "Warrior", "win", vec![play(Me, 1, "Arcane Missiles", 1)]),
            game(2, "Mage", "Warrior", "win", vec![play(Me, 1, "Arcane Missiles", 1)]),
            game(
                3,
                "Mage",
                "Druid",
                "loss",
                vec![play(Me, 1, "Arcane Missiles", 1), play(Me, 2, "Blizzard", 6)],
            ),
            game(4, "Mage", "Druid", "loss", vec![play(Me, 1, "Counterspell", 3)]),
        ];
        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        let report = HeroReport::build(&analysis, &ReportOptions::default());

        assert_eq!(
            card_names(&report.cards),
            vec!["Arcane Missiles", "-- deck --", "Blizzard", "Counterspell"]
        );
        assert_eq!(deck_markers(&report.cards), 1);

        let summary = &report.card_summary.rows;
        assert_eq!(summary.iter().filter(|row| row.deck_average).count(), 1);
        assert!(summary[1].deck_average);
        assert!((summary[1].win_percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn no_deck_marker_when_no_card_is_below_average() {
        let records = vec![
            game(1, "Mage", "Warrior", "win", vec![play(Me, 1, "Arcane Missiles", 1)]),
            game(2, "Mage", "Warrior", "loss", vec![play(Me, 1, "Arcane Missiles", 1)]),
        ];
        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        let report = HeroReport::build(&analysis, &ReportOptions::default());
        assert_eq!(deck_markers(&report.cards), 0);
        assert!(report.card_summary.rows.iter().all(|row| !row.deck_average));
    }

    #[test]
    fn card_rows_carry_unplayed_stats() {
        let records = sample();
        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        let report = HeroReport::build(&analysis, &ReportOptions::default());
        let overall = report.overall;

        for row in &report.cards {
            if let CardRow::Card(line) = row {
                assert_eq!(line.unplayed.wins + line.stats.wins, overall.wins);
                assert_eq!(line.unplayed.losses + line.stats.losses, overall.losses);
            }
        }

        let CardRow::Card(mirror) = &report.cards[0] else {
            panic!("first row should be a card");
        };
        assert!((mirror.played_percentage - 50.0).abs() < 1e-9);
        assert_eq!(mirror.unplayed_win_percentage, 0.0);
    }

    #[test]
    fn min_sample_size_hides_rows_but_not_totals() {
        let records = sample();
        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        let report = HeroReport::build(&analysis, &ReportOptions { min_sample_size: 2 });

        let names = card_names(&report.cards);
        assert!(!names.contains(&"Polymorph"));
        let CardRow::Card(frostbolt) = report
            .cards
            .iter()
            .find(|row| matches!(row, CardRow::Card(line) if line.card == "Frostbolt"))
            .expect("frostbolt shown")
        else {
            unreachable!();
        };
        assert_eq!(frostbolt.unplayed.losses, 1);
        assert!(report.turn_plays.iter().all(|row| row.stats.games >= 2));
    }

    #[test]
    fn card_vs_opponent_uses_ten_percent_threshold() {
        let mut records = Vec::new();
        let mut id = 0;
        for (opponent, count) in [("Warrior", 79), ("Shaman", 12), ("Priest", 9)] {
            for i in 0..count {
                id += 1;
                let result = if i % 2 == 0 { "win" } else { "loss" };
                records.push(game(id, "Mage", opponent, result, vec![play(Me, 1, "Frostbolt", 2)]));
            }
        }

        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        assert_eq!(analysis.overall().games, 100);
        let report = HeroReport::build(&analysis, &ReportOptions::default());

        let opponents: Vec<_> = report
            .card_vs_opponents
            .iter()
            .map(|table| table.opponent.as_str())
            .collect();
        assert_eq!(opponents, vec!["Warrior", "Shaman"]);

        let shaman = &report.card_vs_opponents[1];
        assert_eq!(shaman.games, 12);
        assert_eq!(shaman.rows[0].stats.games, 12);
        assert!((shaman.rows[0].played_percentage - 100.0).abs() < 1e-9);
        assert_eq!(shaman.rows[0].unplayed.games(), 0);
    }

    #[test]
    fn card_summary_leaves_unseen_matchups_blank() {
        let records = sample();
        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        let report = HeroReport::build(&analysis, &ReportOptions::default());
        let summary = &report.card_summary;

        assert_eq!(
            summary.opponents,
            vec![("Druid".to_string(), 2), ("Warrior".to_string(), 2)]
        );
        let mirror = &summary.rows[0];
        assert_eq!(mirror.label, "Mirror Image");
        assert_eq!(mirror.against, vec![None, Some(100.0)]);

        let deck = &summary.rows[3];
        assert!(deck.deck_average);
        assert_eq!(deck.against, vec![Some(0.0), Some(100.0)]);
    }

    #[test]
    fn openings_sort_by_turn_plays() {
        let records = sample();
        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        let rows = opening_rows(&analysis.opening_stats());

        assert_eq!(rows.len(), 4);
        assert!(rows[0].turns[0].is_empty());
        assert_eq!(rows[0].turns[1], vec!["Frostbolt".to_string()]);
        assert_eq!(rows[1].turns[1], vec!["Polymorph".to_string()]);
        assert_eq!(rows[2].turns[0], vec!["Mirror Image".to_string()]);
        assert!(rows[2].turns[1].is_empty());
        assert_eq!(rows[3].turns[1], vec!["Frostbolt".to_string()]);
    }

    #[test]
    fn turn_plays_group_by_turn_then_win_rate() {
        let records = sample();
        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        let rows = turn_play_rows(&analysis, 0);

        let keys: Vec<_> = rows.iter().map(|row| (row.turn, row.play.as_str())).collect();
        assert_eq!(
            keys,
            vec![
                (1, "Mirror Image"),
                (1, "pass"),
                (2, "pass"),
                (2, "Frostbolt"),
                (3, "pass"),
            ]
        );
    }

    #[test]
    fn mana_rows_follow_bucket_order_and_skip_empty() {
        let records = vec![
            game(1, "Mage", "Warrior", "win", vec![play(Me, 5, "Big Spell", 10)]),
            game(2, "Mage", "Warrior", "loss", vec![play(Opponent, 5, "Big Spell", 10)]),
            game(3, "Mage", "Warrior", "win", vec![play(Me, 5, "Big Spell", 9)]),
        ];
        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        let rows = mana_rows(&analysis);

        let buckets: Vec<_> = rows.iter().map(|row| row.bucket).collect();
        assert_eq!(
            buckets,
            vec![ManaBucket::BigDisadvantage, ManaBucket::BigAdvantage]
        );
        assert_eq!(rows[1].stats.games, 2);
        assert!((rows[1].games_percentage - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn ranks_descend_with_unranked_last() {
        let with_rank = |record: MatchRecord, rank: Option<u32>| {
            let mut raw = record.raw().clone();
            raw.rank = rank;
            MatchRecord::new(raw)
        };
        let records = vec![
            with_rank(game(1, "Mage", "Warrior", "win", vec![]), Some(3)),
            with_rank(game(2, "Mage", "Warrior", "win", vec![]), None),
            with_rank(game(3, "Mage", "Warrior", "loss", vec![]), Some(15)),
        ];
        let analysis =
            HeroAnalysis::new(&records, "Mage", AnalysisOptions::default()).expect("games");
        let ranks: Vec<_> = rank_rows(&analysis).iter().map(|row| row.rank).collect();
        assert_eq!(ranks, vec![Some(15), Some(3), None]);
    }
}
