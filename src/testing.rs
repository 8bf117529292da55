use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::{
    client::{unexpected_status, Endpoint, RequestError, Upstream},
    halo::GameMode,
};

/// In-memory provider keyed by endpoint, counting every request it serves.
#[derive(Default)]
pub struct FakeUpstream {
    responses: HashMap<String, (StatusCode, String)>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

fn key(endpoint: Endpoint<'_>) -> String {
    endpoint.to_string()
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match(self, mode: GameMode, match_id: &str, body: Value) -> Self {
        self.with_raw(Endpoint::Match { mode, match_id }, StatusCode::OK, &body.to_string())
    }

    pub fn with_history(self, gamertag: &str, mode: GameMode, body: Value) -> Self {
        self.with_raw(
            Endpoint::PlayerMatches { gamertag, mode },
            StatusCode::OK,
            &body.to_string(),
        )
    }

    pub fn with_raw(mut self, endpoint: Endpoint<'_>, status: StatusCode, body: &str) -> Self {
        self.responses
            .insert(key(endpoint), (status, body.to_string()));
        self
    }

    pub fn with_delay(mut self, endpoint: Endpoint<'_>, delay: Duration) -> Self {
        self.delays.insert(key(endpoint), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn get(&self, endpoint: Endpoint<'_>) -> Result<String, RequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = key(endpoint);
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        match self.responses.get(&key) {
            Some((status, body)) if status.is_success() => Ok(body.clone()),
            Some((status, body)) => Err(unexpected_status(*status, body)),
            None => Err(unexpected_status(StatusCode::NOT_FOUND, "")),
        }
    }
}

/// A provider match body; `players` are `(gamertag, team id)` in reporting
/// order and `ranks` are the positional team stats.
pub fn match_body(over: bool, players: &[(&str, u32)], ranks: &[i64]) -> Value {
    let player_stats: Vec<Value> = players
        .iter()
        .map(|(gamertag, team_id)| {
            json!({
                "Player": { "Gamertag": gamertag, "Xuid": null },
                "TeamId": team_id,
                "TotalKills": 3,
            })
        })
        .collect();
    let team_stats: Vec<Value> = ranks
        .iter()
        .enumerate()
        .map(|(index, rank)| {
            json!({
                "TeamId": index,
                "Score": 100 - rank * 10,
                "Rank": rank,
                "RoundStats": [{ "RoundNumber": 0, "Rank": rank, "Score": 1 }],
            })
        })
        .collect();
    json!({
        "IsMatchOver": over,
        "IsTeamGame": true,
        "TotalDuration": "PT11M35.4S",
        "MapId": "c7edbf0f-f206-11e4-aa52-24be05e24f7e",
        "GameVariantId": "1e473914-46e4-408d-af26-178fb115de76",
        "PlayerStats": player_stats,
        "TeamStats": team_stats,
    })
}

/// Two teams of two, `["A","B"]` ranked first and `["C","D"]` second.
pub fn two_team_body(over: bool) -> Value {
    match_body(over, &[("A", 0), ("B", 0), ("C", 1), ("D", 1)], &[1, 2])
}

/// A player history body listing `(match id, completion date)` pairs.
pub fn history_body(entries: &[(&str, &str)]) -> Value {
    let results: Vec<Value> = entries
        .iter()
        .map(|(match_id, date)| {
            json!({
                "Id": { "MatchId": match_id, "GameMode": 3 },
                "MatchCompletedDate": { "ISO8601Date": date },
                "MatchDuration": "PT8M",
            })
        })
        .collect();
    json!({
        "Start": 0,
        "Count": results.len(),
        "ResultCount": results.len(),
        "Results": results,
    })
}
