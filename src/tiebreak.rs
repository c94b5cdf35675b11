//! Ordering of teams that finished a group level on points.
//!
//! Tied teams play a mini-league built from their recorded results against
//! each other (2 points per win, 1 per loss, nothing if they never met). Any
//! smaller subset still level on mini-league points is resolved the same way,
//! so two teams are always separated by their head-to-head result. A block
//! the mini-league cannot split at all falls back to mini-league point
//! difference, overall point difference and overall points scored.

use std::cmp::Ordering;
use thiserror::Error;

use crate::constants::{LOSS_POINTS, WIN_POINTS};
use crate::team::{TeamId, TeamRegistry};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TieBreakError {
    /// Teams identical on every criterion.
    #[error("Teams {0:?} are level on every tie-break criterion")]
    Unresolved(Vec<TeamId>),
}

/// A team's line in a mini-league restricted to the tied teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniLeagueRow {
    pub id: TeamId,
    pub points: u32,
    pub scores_for: u32,
    pub scores_against: u32,
}

impl MiniLeagueRow {
    pub fn point_difference(&self) -> i64 {
        self.scores_for as i64 - self.scores_against as i64
    }
}

/// Mini-league table for `members`, in the order given.
pub fn mini_league(teams: &TeamRegistry, members: &[TeamId]) -> Vec<MiniLeagueRow> {
    members
        .iter()
        .map(|id| {
            let mut row = MiniLeagueRow {
                id: id.clone(),
                points: 0,
                scores_for: 0,
                scores_against: 0,
            };
            let Some(team) = teams.get(id) else {
                return row;
            };
            for other in members.iter().filter(|o| *o != id) {
                if let Some(h2h) = team.head_to_head(other) {
                    row.points += if h2h.won() { WIN_POINTS } else { LOSS_POINTS };
                    row.scores_for += h2h.points_for;
                    row.scores_against += h2h.points_against;
                }
            }
            row
        })
        .collect()
}

/// Order a group by points, separating level teams with the mini-league rules.
pub fn rank_group(
    teams: &TeamRegistry,
    members: &[TeamId],
) -> Result<Vec<TeamId>, TieBreakError> {
    let points = |id: &TeamId| teams.get(id).map_or(0, |t| t.stats.points);

    let mut ordered = members.to_vec();
    ordered.sort_by(|a, b| points(b).cmp(&points(a)));

    let mut ranked = Vec::with_capacity(ordered.len());
    for block in ordered.chunk_by(|a, b| points(a) == points(b)) {
        if block.len() == 1 {
            ranked.extend_from_slice(block);
        } else {
            ranked.extend(resolve_block(teams, block)?);
        }
    }
    Ok(ranked)
}

/// Strict order for a block of teams level on league points.
pub fn resolve_block(
    teams: &TeamRegistry,
    block: &[TeamId],
) -> Result<Vec<TeamId>, TieBreakError> {
    let mut table = mini_league(teams, block);
    table.sort_by(|a, b| b.points.cmp(&a.points));

    if table.first().map(|r| r.points) == table.last().map(|r| r.points) {
        return fall_back(teams, table);
    }

    let mut ranked = Vec::with_capacity(block.len());
    for sub in table.chunk_by(|a, b| a.points == b.points) {
        if sub.len() == 1 {
            ranked.push(sub[0].id.clone());
        } else {
            let ids: Vec<TeamId> = sub.iter().map(|r| r.id.clone()).collect();
            ranked.extend(resolve_block(teams, &ids)?);
        }
    }
    Ok(ranked)
}

fn fall_back(
    teams: &TeamRegistry,
    mut table: Vec<MiniLeagueRow>,
) -> Result<Vec<TeamId>, TieBreakError> {
    let overall = |id: &str| {
        teams
            .get(id)
            .map_or((0, 0), |t| (t.stats.point_difference, t.stats.scores_for))
    };
    let compare = |a: &MiniLeagueRow, b: &MiniLeagueRow| -> Ordering {
        let (a_diff, a_for) = overall(&a.id);
        let (b_diff, b_for) = overall(&b.id);
        b.point_difference()
            .cmp(&a.point_difference())
            .then(b_diff.cmp(&a_diff))
            .then(b_for.cmp(&a_for))
    };

    table.sort_by(|a, b| compare(a, b));

    let mut level: Vec<TeamId> = table
        .windows(2)
        .filter(|w| compare(&w[0], &w[1]) == Ordering::Equal)
        .flat_map(|w| [w[0].id.clone(), w[1].id.clone()])
        .collect();
    if !level.is_empty() {
        level.dedup();
        return Err(TieBreakError::Unresolved(level));
    }

    Ok(table.into_iter().map(|r| r.id).collect())
}
