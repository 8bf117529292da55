// response definition of the player match history endpoint

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct MatchIdentity {
    pub match_id: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct CompletedDate {
    #[serde(rename = "ISO8601Date")]
    pub iso8601_date: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct HistoryEntry {
    pub id: MatchIdentity,
    pub match_completed_date: CompletedDate,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct MatchHistory {
    #[serde(default)]
    pub results: Vec<HistoryEntry>,
}
