// Track-o-bot endpoints

pub const HISTORY_ENDPOINT: &str = "https://trackobot.com/profile/history.json";

pub const USER_AGENT: &str = concat!("hs_deck_analyzer/", env!("CARGO_PKG_VERSION"));
