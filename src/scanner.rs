use chrono::{DateTime, Utc};

use crate::{
    client::{fetch_json, Endpoint, RequestError, Upstream},
    halo::{history::MatchHistory, GameMode},
    model::{parse_instant, same_instant, MatchCandidate},
};

/// At most this many candidates are normalized per request.
pub const MAX_CANDIDATES: usize = 5;

/// List the matches `gamertag` completed in `mode` exactly at `date`.
///
/// An empty list is not an error here; the caller decides what no candidates means.
pub async fn scan_history<U: Upstream + ?Sized>(
    upstream: &U,
    gamertag: &str,
    mode: GameMode,
    date: &DateTime<Utc>,
) -> Result<Vec<MatchCandidate>, RequestError> {
    let history: MatchHistory =
        fetch_json(upstream, Endpoint::PlayerMatches { gamertag, mode }).await?;
    let total = history.results.len();
    let found = candidates(history, date);
    log::debug!(
        "{} of {} recent matches of {} completed at {}",
        found.len(),
        total,
        gamertag,
        date
    );
    Ok(found)
}

/// Provider order is kept, it lists the most recent matches first.
pub fn candidates(history: MatchHistory, date: &DateTime<Utc>) -> Vec<MatchCandidate> {
    history
        .results
        .into_iter()
        .filter(|entry| {
            let reported = &entry.match_completed_date.iso8601_date;
            match parse_instant(reported) {
                Some(completed) => same_instant(&completed, date),
                None => {
                    log::warn!(
                        "problematic history entry {}: completion date {:?}",
                        entry.id.match_id,
                        reported
                    );
                    false
                }
            }
        })
        .take(MAX_CANDIDATES)
        .map(|entry| MatchCandidate {
            match_id: entry.id.match_id,
            completed_at: entry.match_completed_date.iso8601_date,
        })
        .collect()
}
