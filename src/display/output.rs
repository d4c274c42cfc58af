use crate::analysis::report::{
    CardLine, CardRow, CardSummary, CardSummaryRow, HeroReport, ManaRow, MatchupRow, OpeningRow,
    OpponentCardTable, RankRow, TurnPlayRow,
};
use crate::analysis::stat_bucket::StatBucket;
use colored::*;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

#[derive(Tabled)]
struct MatchupDisplayRow {
    opponent: String,
    games: String,
    wins: String,
    losses: String,
    #[tabled(rename = "win %")]
    win_rate: String,
}

#[derive(Tabled)]
struct OpeningDisplayRow {
    #[tabled(rename = "turn 1")]
    turn_1: String,
    #[tabled(rename = "turn 2")]
    turn_2: String,
    #[tabled(rename = "turn 3")]
    turn_3: String,
    games: String,
    wins: String,
    losses: String,
    #[tabled(rename = "win %")]
    win_rate: String,
}

#[derive(Tabled)]
struct TurnPlayDisplayRow {
    turn: String,
    play: String,
    games: String,
    wins: String,
    losses: String,
    #[tabled(rename = "win %")]
    win_rate: String,
}

#[derive(Tabled)]
struct ManaDisplayRow {
    #[tabled(rename = "mana differential")]
    differential: String,
    games: String,
    #[tabled(rename = "games %")]
    games_share: String,
    wins: String,
    losses: String,
    #[tabled(rename = "win %")]
    win_rate: String,
}

#[derive(Tabled)]
struct RankDisplayRow {
    #[tabled(rename = "ladder rank")]
    rank: String,
    games: String,
    wins: String,
    losses: String,
    #[tabled(rename = "win %")]
    win_rate: String,
}

fn pct(value: f64) -> String {
    format!("{:.2}", value)
}

fn heading(title: &str) {
    println!("\n{}", format!("## {}", title).bold().cyan());
}

fn markdown(mut table: Table) -> Table {
    table.with(Style::markdown());
    table
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn display_overall_summary(totals: &StatBucket) {
    println!();
    if totals.games == 0 {
        println!("{}", "No games to analyze.".yellow());
        return;
    }

    println!("{}", format!("Analyzing {} games.", totals.games).bold());
    println!("{} wins", totals.wins.to_string().green());
    println!("{} losses", totals.losses.to_string().red());
    println!("{}% win percentage", pct(totals.win_percentage()));
}

pub fn display_hero_report(report: &HeroReport) {
    println!(
        "\n{}",
        format!("--- Analyzing {} games ---", report.hero).bold()
    );

    heading(&format!("{} Matchup Win Rates", report.hero));
    println!("Opponents are ordered by frequency, most common matchups first.\n");
    println!("{}", matchup_table(&report.matchups));

    heading("Card Win Rates");
    println!("Cards are ordered by win rate. Played % is the share of games where you played the card.");
    println!("Unplayed columns cover the games where the card was never played.");
    println!(
        "Only cards played in at least {} games are shown.\n",
        report.min_sample_size
    );
    println!("{}", card_table(&report.cards));

    for table in &report.card_vs_opponents {
        println!("\n{}", card_vs_opponent_table(table));
    }

    heading("Card Win Rate Summary");
    println!("Opponents are ordered by frequency; game counts are in parentheses.\n");
    println!("{}", card_summary_table(&report.card_summary));

    heading("Opening Sequence Win Rates");
    println!("Openings are your plays for the first 3 turns.\n");
    println!(
        "Found {} different openings in {} games:\n",
        report.openings.len(),
        report.overall.games
    );
    println!("{}", opening_table(&report.openings));

    heading("Win Rates When Playing Cards on Specific Turns");
    println!(
        "Only plays made on a turn at least {} times are shown.\n",
        report.min_sample_size
    );
    println!("{}", turn_play_table(&report.turn_plays));

    heading("Mana Differential Win Rates");
    println!("Mana you spent minus mana your opponent spent. Games % is the share of games in each range.\n");
    println!("{}", mana_table(&report.mana));

    heading("Ladder Rank Win Rates");
    println!();
    println!("{}", rank_table(&report.ranks));
}

fn matchup_table(rows: &[MatchupRow]) -> Table {
    let rows = rows.iter().map(|row| MatchupDisplayRow {
        opponent: row.opponent.clone(),
        games: row.stats.games.to_string(),
        wins: row.stats.wins.to_string(),
        losses: row.stats.losses.to_string(),
        win_rate: pct(row.win_percentage),
    });
    markdown(Table::new(rows))
}

const DECK_MARKER: &str = "-- deck --";

fn card_line_record(line: &CardLine) -> Vec<String> {
    vec![
        line.card.clone(),
        line.stats.wins.to_string(),
        pct(line.win_percentage),
        line.stats.games.to_string(),
        pct(line.played_percentage),
        line.unplayed.wins.to_string(),
        line.unplayed.losses.to_string(),
        pct(line.unplayed_win_percentage),
    ]
}

fn card_headers(first: String) -> Vec<String> {
    let mut headers = vec![first];
    headers.extend(
        [
            "wins",
            "win %",
            "games",
            "played %",
            "unplayed wins",
            "unplayed losses",
            "unplayed win %",
        ]
        .map(String::from),
    );
    headers
}

fn card_table(rows: &[CardRow]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(card_headers("card vs. All".to_string()));

    for row in rows {
        match row {
            CardRow::DeckAverage {
                wins,
                win_percentage,
                games,
            } => {
                let mut record = vec![
                    DECK_MARKER.to_string(),
                    wins.to_string(),
                    pct(*win_percentage),
                    games.to_string(),
                ];
                record.resize(8, String::new());
                builder.push_record(record);
            }
            CardRow::Card(line) => builder.push_record(card_line_record(line)),
        }
    }

    markdown(builder.build())
}

fn card_vs_opponent_table(table: &OpponentCardTable) -> Table {
    let mut builder = Builder::default();
    builder.push_record(card_headers(format!(
        "{} games vs. {}",
        table.games, table.opponent
    )));
    for line in &table.rows {
        builder.push_record(card_line_record(line));
    }
    markdown(builder.build())
}

fn summary_label(row: &CardSummaryRow) -> String {
    if row.deck_average {
        DECK_MARKER.to_string()
    } else {
        row.label.clone()
    }
}

fn card_summary_table(summary: &CardSummary) -> Table {
    let mut builder = Builder::default();

    let mut headers = vec!["Card".to_string(), format!("All ({})", summary.hero_games)];
    headers.extend(
        summary
            .opponents
            .iter()
            .map(|(opponent, games)| format!("{} ({})", opponent, games)),
    );
    builder.push_record(headers);

    for row in &summary.rows {
        let mut record = vec![summary_label(row), pct(row.win_percentage)];
        record.extend(row.against.iter().map(|rate| rate.map(pct).unwrap_or_default()));
        builder.push_record(record);
    }

    markdown(builder.build())
}

fn join_turn(cards: &[String]) -> String {
    cards.join(", ")
}

fn opening_table(rows: &[OpeningRow]) -> Table {
    let rows = rows.iter().map(|row| OpeningDisplayRow {
        turn_1: join_turn(&row.turns[0]),
        turn_2: join_turn(&row.turns[1]),
        turn_3: join_turn(&row.turns[2]),
        games: row.stats.games.to_string(),
        wins: row.stats.wins.to_string(),
        losses: row.stats.losses.to_string(),
        win_rate: pct(row.win_percentage),
    });
    markdown(Table::new(rows))
}

fn turn_play_table(rows: &[TurnPlayRow]) -> Table {
    let rows = rows.iter().map(|row| TurnPlayDisplayRow {
        turn: row.turn.to_string(),
        play: row.play.clone(),
        games: row.stats.games.to_string(),
        wins: row.stats.wins.to_string(),
        losses: row.stats.losses.to_string(),
        win_rate: pct(row.win_percentage),
    });
    markdown(Table::new(rows))
}

fn mana_table(rows: &[ManaRow]) -> Table {
    let rows = rows.iter().map(|row| ManaDisplayRow {
        differential: format!("{}: {}", row.bucket.label(), row.bucket.range()),
        games: row.stats.games.to_string(),
        games_share: pct(row.games_percentage),
        wins: row.stats.wins.to_string(),
        losses: row.stats.losses.to_string(),
        win_rate: pct(row.win_percentage),
    });
    markdown(Table::new(rows))
}

fn rank_table(rows: &[RankRow]) -> Table {
    let rows = rows.iter().map(|row| RankDisplayRow {
        rank: row
            .rank
            .map(|rank| rank.to_string())
            .unwrap_or_else(|| "unranked".to_string()),
        games: row.stats.games.to_string(),
        wins: row.stats.wins.to_string(),
        losses: row.stats.losses.to_string(),
        win_rate: pct(row.win_percentage),
    });
    markdown(Table::new(rows))
}
