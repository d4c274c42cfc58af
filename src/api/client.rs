use crate::api::endpoints::USER_AGENT;
use crate::config::Credentials;
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use indicatif::ProgressBar;
use std::num::NonZeroU32;
use std::thread;
use tracing::{debug, info};

use super::models::*;

const REQUESTS_PER_SECOND: u32 = 2;
const RATE_LIMIT_POLL: std::time::Duration = std::time::Duration::from_millis(50);

/// Anything that can hand out pages of game history, first page is 1.
pub trait HistorySource {
    fn fetch_page(&self, page: u32) -> Result<HistoryPage, AppError>;
}

pub struct TrackobotClient {
    credentials: Credentials,
    history_url: String,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl TrackobotClient {
    pub fn new(credentials: Credentials, history_url: String) -> Self {
        let per_second = NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN);
        TrackobotClient {
            credentials,
            history_url,
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        }
    }

    fn wait_for_slot(&self) {
        while self.rate_limiter.check().is_err() {
            thread::sleep(RATE_LIMIT_POLL);
        }
    }
}

impl HistorySource for TrackobotClient {
    fn fetch_page(&self, page: u32) -> Result<HistoryPage, AppError> {
        self.wait_for_slot();
        debug!(page, "requesting history page");

        let response = ureq::get(&self.history_url)
            .set("User-Agent", USER_AGENT)
            .query("username", &self.credentials.username)
            .query("token", &self.credentials.token)
            .query("page", &page.to_string())
            .call();

        match response {
            Ok(resp) => resp
                .into_json::<HistoryPage>()
                .map_err(|e| AppError::JsonError(format!("history page {}: {}", page, e))),
            Err(ureq::Error::Status(code, resp)) => Err(AppError::HttpError(format!(
                "history page {} returned {} {}",
                page,
                code,
                resp.status_text()
            ))),
            Err(e) => Err(AppError::HttpError(e.to_string())),
        }
    }
}

pub fn window_cutoff(days: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(i64::from(days))
}

/// Compares as instants when `added` is RFC 3339, as strings otherwise.
pub fn is_before_cutoff(added: &str, cutoff: &DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(added) {
        Ok(timestamp) => timestamp.with_timezone(&Utc) < *cutoff,
        Err(_) => added < cutoff.format("%Y-%m-%dT%H:%M:%S").to_string().as_str(),
    }
}

/// Page through the history until a game older than `cutoff` shows up.
///
/// Any failed page aborts the whole fetch; nothing collected so far is returned.
pub fn fetch_window<S: HistorySource>(
    source: &S,
    cutoff: DateTime<Utc>,
    progress: &ProgressBar,
) -> Result<Vec<RawGame>, AppError> {
    let mut games = Vec::new();
    let mut page = 0;

    loop {
        page += 1;
        progress.set_message(format!("Fetching history page {}", page));
        let batch = source.fetch_page(page)?;
        progress.inc(1);

        if batch.history.is_empty() {
            info!(page, "history exhausted");
            break;
        }

        let mut reached_cutoff = false;
        for game in batch.history {
            if is_before_cutoff(&game.added, &cutoff) {
                reached_cutoff = true;
                break;
            }
            debug!(
                id = game.id,
                hero = %game.hero,
                opponent = %game.opponent,
                result = %game.result,
                "fetched game"
            );
            games.push(game);
        }

        if reached_cutoff {
            info!(page, games = games.len(), "reached the end of the day window");
            break;
        }

        let last_page = batch.meta.and_then(|meta| meta.total_pages);
        if matches!(last_page, Some(total) if page >= total) {
            info!(page, "last history page reached");
            break;
        }
    }

    Ok(games)
}
