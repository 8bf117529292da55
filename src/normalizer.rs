use itertools::Itertools;

use crate::{
    client::{fetch_json, Endpoint, RequestError, Upstream},
    halo::{matches::MatchResult, GameMode},
    model::{Declared, MatchInfo, TeamRoster, Winner},
};

/// Fetch a single match and turn it into a [`MatchInfo`].
///
/// `declared` is attached untouched so the correlator can check it later.
pub async fn normalize<U: Upstream + ?Sized>(
    upstream: &U,
    mode: GameMode,
    match_id: &str,
    declared: Option<Declared>,
) -> Result<MatchInfo, RequestError> {
    let result: MatchResult = fetch_json(upstream, Endpoint::Match { mode, match_id }).await?;
    let mut info = match_info(match_id, result)?;
    if let Some(declared) = declared {
        info.match_completed_at = Some(declared.completed_at);
        info.declared_teams = Some(declared.teams);
    }
    log::debug!("normalized match {}, winner: {:?}", match_id, info.winner);
    Ok(info)
}

pub fn match_info(match_id: &str, result: MatchResult) -> Result<MatchInfo, RequestError> {
    // team ids are arbitrary, slots follow the order teams first show up
    let team_ids: Vec<u32> = result
        .player_stats
        .iter()
        .map(|stat| stat.team_id)
        .unique()
        .collect();

    // team stats are positional, the nth distinct team takes the nth entry
    if result.team_stats.len() < team_ids.len() {
        return Err(RequestError::MalformedResponse(format!(
            "match {} has {} teams but only {} team stats",
            match_id,
            team_ids.len(),
            result.team_stats.len()
        )));
    }

    let player_stats = &result.player_stats;
    let teams: Vec<TeamRoster> = team_ids
        .iter()
        .zip(result.team_stats)
        .enumerate()
        .map(|(slot, (&team_id, stat))| TeamRoster {
            label: format!("Team{}", slot),
            score: stat.score,
            rank: stat.rank,
            round_stats: stat.round_stats,
            members: player_stats
                .iter()
                .filter(|player| player.team_id == team_id)
                .map(|player| player.player.gamertag.clone())
                .collect(),
        })
        .collect();

    let winner = if !result.is_match_over {
        Winner::Pending
    } else {
        teams
            .iter()
            .find(|team| team.rank == 1)
            .map_or(Winner::Undecided, |team| Winner::Team(team.label.clone()))
    };

    Ok(MatchInfo {
        is_match_over: result.is_match_over,
        is_team_game: result.is_team_game,
        match_id: match_id.to_string(),
        total_duration: result.total_duration,
        map_id: result.map_id,
        winner,
        teams,
        match_completed_at: None,
        declared_teams: None,
    })
}
