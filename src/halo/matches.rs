// response definition of the custom match result endpoint
// only the fields we hand back to the contract are decoded

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Player {
    pub gamertag: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerStat {
    pub player: Player,
    pub team_id: u32,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TeamStat {
    pub score: i64,
    pub rank: i64,
    #[serde(default)]
    pub round_stats: Value,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct MatchResult {
    pub is_match_over: bool,
    pub is_team_game: bool,
    #[serde(default)]
    pub total_duration: String,
    #[serde(default)]
    pub map_id: String,
    pub player_stats: Vec<PlayerStat>,
    #[serde(default)]
    pub team_stats: Vec<TeamStat>,
}
