use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// One game as returned by the history endpoint. Fields the analyzer does not
// read are kept in `extra` so that saved files round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGame {
    pub id: u64,
    pub hero: String,
    #[serde(default)]
    pub hero_deck: Option<String>,
    pub opponent: String,
    #[serde(default)]
    pub opponent_deck: Option<String>,
    pub added: String,
    pub result: String,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub card_history: Vec<CardPlayDto>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Me,
    Opponent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPlayDto {
    pub player: Player,
    pub turn: u32,
    pub card: CardDto,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDto {
    pub name: String,
    // Null for a handful of generated cards
    #[serde(default)]
    pub mana: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// History V1 response
#[derive(Debug, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub history: Vec<RawGame>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_items: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = r#"{
            "id": 7, "mode": "ranked", "hero": "Mage", "hero_deck": null,
            "opponent": "Warrior", "opponent_deck": "Control", "added": "2016-05-01T10:00:00.000Z",
            "result": "win", "rank": 12, "coin": true,
            "card_history": [
                {"player": "me", "turn": 1, "card": {"id": "CS2_029", "name": "Fireball", "mana": 4}}
            ]
        }"#;
        let game: RawGame = serde_json::from_str(raw).expect("game should parse");
        assert_eq!(game.hero_deck, None);
        assert_eq!(game.rank, Some(12));
        assert_eq!(game.card_history[0].player, Player::Me);
        assert_eq!(game.card_history[0].card.extra["id"], "CS2_029");

        let value = serde_json::to_value(&game).expect("game should serialize");
        assert_eq!(value["mode"], "ranked");
        assert_eq!(value["coin"], true);
        assert_eq!(value["card_history"][0]["card"]["id"], "CS2_029");
    }

    #[test]
    fn page_without_meta_parses() {
        let page: HistoryPage = serde_json::from_str(r#"{"history": []}"#).expect("page");
        assert!(page.history.is_empty());
        assert!(page.meta.is_none());
    }
}
