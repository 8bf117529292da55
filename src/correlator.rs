use std::collections::HashSet;

use crate::model::{MatchInfo, TeamRoster};

/// Keep the matches whose actual rosters cover every declared roster.
///
/// Rosters compare as sets of gamertags. A single actual roster may satisfy
/// more than one declared roster when those are identical. Input order is kept.
pub fn correlate(matches: Vec<MatchInfo>) -> Vec<MatchInfo> {
    matches
        .into_iter()
        .filter(|info| {
            let keep = rosters_match(info);
            if !keep {
                log::debug!("match {} does not have the declared teams", info.match_id);
            }
            keep
        })
        .collect()
}

fn rosters_match(info: &MatchInfo) -> bool {
    let declared = info.declared_teams.as_deref().unwrap_or_default();
    let actual: Vec<HashSet<&str>> = info.teams.iter().map(TeamRoster::member_set).collect();
    let found = declared
        .iter()
        .filter(|roster| {
            let roster: HashSet<&str> = roster.iter().map(String::as_str).collect();
            actual.iter().any(|team| *team == roster)
        })
        .count();
    found == declared.len()
}
