use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::context::SimulationContext;
use crate::error::SimulationError;
use crate::game::{play_match, MatchResult};
use crate::schedule::round_robin;
use crate::team::{Group, TeamId, TeamRegistry, TeamStats};
use crate::tiebreak::{rank_group, TieBreakError};

/// One group-stage result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMatch {
    pub group: String,
    pub team1: TeamId,
    pub team2: TeamId,
    pub result: MatchResult,
}

/// Every match played on one matchday, across all groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRound {
    pub round: usize,
    pub matches: Vec<GroupMatch>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub rank: usize,
    pub id: TeamId,
    pub name: String,
    pub stats: TeamStats,
}

/// Final table of one group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStanding {
    pub label: String,
    pub rows: Vec<StandingRow>,
}

/// Play every group's round-robin.
///
/// Matchday `r` is played in every group before any group starts matchday
/// `r + 1`, so form carries across groups in calendar order.
pub fn play_group_stage<R: Rng>(
    ctx: &mut SimulationContext<R>,
    groups: &[Group],
) -> Result<Vec<GroupRound>, SimulationError> {
    let schedules: Vec<_> = groups.iter().map(|g| round_robin(g.teams.len())).collect();
    let matchdays = schedules.iter().map(Vec::len).max().unwrap_or(0);

    let mut rounds = Vec::with_capacity(matchdays);
    for round in 0..matchdays {
        let mut matches = Vec::new();
        for (group, schedule) in groups.iter().zip(&schedules) {
            let Some(pairs) = schedule.get(round) else {
                continue;
            };
            for &(i, j) in pairs {
                let (team1, team2) = (&group.teams[i], &group.teams[j]);
                let result = play_match(ctx, team1, team2)?;
                record_result(&mut ctx.teams, team1, team2, result)?;
                matches.push(GroupMatch {
                    group: group.label.clone(),
                    team1: team1.clone(),
                    team2: team2.clone(),
                    result,
                });
            }
        }
        log::info!("group stage round {} done: {} match(es)", round + 1, matches.len());
        rounds.push(GroupRound {
            round: round + 1,
            matches,
        });
    }

    Ok(rounds)
}

/// Book a result on both teams' stats and head-to-head records.
pub fn record_result(
    teams: &mut TeamRegistry,
    team1: &str,
    team2: &str,
    result: MatchResult,
) -> Result<(), SimulationError> {
    teams
        .get_mut(team1)
        .ok_or_else(|| SimulationError::UnknownTeam(team1.to_string()))?
        .record_result(team2, result.score1, result.score2);
    teams
        .get_mut(team2)
        .ok_or_else(|| SimulationError::UnknownTeam(team2.to_string()))?
        .record_result(team1, result.score2, result.score1);
    Ok(())
}

/// Reorder a group into its final standing.
pub fn resolve_standings(teams: &TeamRegistry, group: &mut Group) -> Result<(), SimulationError> {
    group.teams = rank_group(teams, &group.teams).map_err(|e| match e {
        TieBreakError::Unresolved(tied) => SimulationError::TieResolutionExhausted {
            group: group.label.clone(),
            teams: tied,
        },
    })?;
    Ok(())
}

/// Snapshot of a resolved group.
pub fn standing(teams: &TeamRegistry, group: &Group) -> GroupStanding {
    let rows = group
        .teams
        .iter()
        .enumerate()
        .filter_map(|(i, id)| {
            teams.get(id).map(|t| StandingRow {
                rank: i + 1,
                id: t.id.clone(),
                name: t.name.clone(),
                stats: t.stats.clone(),
            })
        })
        .collect();
    GroupStanding {
        label: group.label.clone(),
        rows,
    }
}
