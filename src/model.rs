use std::{collections::HashSet, fmt::Display};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::halo::GameMode;

/// Validated caller input, one variant per pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchQuery {
    ById {
        match_id: String,
        mode: GameMode,
    },
    ByPlayer {
        gamertag: String,
        mode: GameMode,
        date: DateTime<Utc>,
        declared_teams: Vec<Vec<String>>,
    },
}

/// A match completed at the requested instant, still awaiting team correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    pub match_id: String,
    // kept exactly as the provider reported it
    pub completed_at: String,
}

/// What the caller declared about a candidate, carried onto the normalized record.
#[derive(Debug, Clone, PartialEq)]
pub struct Declared {
    pub completed_at: String,
    pub teams: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TeamRoster {
    #[serde(skip)]
    pub label: String,
    pub score: i64,
    pub rank: i64,
    pub round_stats: Value,
    pub members: Vec<String>,
}

impl TeamRoster {
    pub fn member_set(&self) -> HashSet<&str> {
        self.members.iter().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winner {
    Team(String),
    Pending,
    Undecided,
}

impl Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Team(label) => f.write_str(label),
            Winner::Pending => f.write_str("Pending"),
            Winner::Undecided => Ok(()),
        }
    }
}

impl Serialize for Winner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Canonical result for a single match.
///
/// Field names follow the provider's casing, which is what the consuming
/// contract reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchInfo {
    pub is_match_over: bool,
    pub is_team_game: bool,
    #[serde(rename = "MatchID")]
    pub match_id: String,
    pub total_duration: String,
    pub map_id: String,
    pub winner: Winner,
    #[serde(serialize_with = "team_map::serialize")]
    pub teams: Vec<TeamRoster>,
    #[serde(rename = "MatchCompleteDate", skip_serializing_if = "Option::is_none")]
    pub match_completed_at: Option<String>,
    #[serde(rename = "TeamsFromContract", skip_serializing_if = "Option::is_none")]
    pub declared_teams: Option<Vec<Vec<String>>>,
}

#[cfg(test)]
impl MatchInfo {
    pub fn team(&self, label: &str) -> Option<&TeamRoster> {
        self.teams.iter().find(|team| team.label == label)
    }
}

mod team_map {
    use serde::Serializer;

    use super::TeamRoster;

    // teams are kept in slot order, written out as { "Team0": {...}, "Team1": {...} }
    pub fn serialize<S: Serializer>(teams: &[TeamRoster], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(teams.iter().map(|team| (&team.label, team)))
    }
}

/// Parse an RFC 3339 instant, or a bare `YYYY-MM-DD` date taken as midnight UTC.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Instants are compared at millisecond precision.
pub fn same_instant(left: &DateTime<Utc>, right: &DateTime<Utc>) -> bool {
    left.timestamp_millis() == right.timestamp_millis()
}
