use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{LOSS_POINTS, WIN_POINTS};

/// ISO code identifying a team.
pub type TeamId = String;

/// Rolling average of how a team performed against expectation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub average: f64,
    pub sum: f64,
    pub count: u32,
}

impl Form {
    pub fn record(&mut self, diff: f64) {
        self.sum += diff;
        self.count += 1;
        self.average = self.sum / self.count as f64;
    }
}

/// Group-stage totals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
    pub scores_for: u32,
    pub scores_against: u32,
    pub point_difference: i32,
}

impl TeamStats {
    pub fn played(&self) -> u32 {
        self.wins + self.losses
    }

    fn record(&mut self, points_for: u32, points_against: u32) {
        if points_for > points_against {
            self.wins += 1;
            self.points += WIN_POINTS;
        } else {
            self.losses += 1;
            self.points += LOSS_POINTS;
        }
        self.scores_for += points_for;
        self.scores_against += points_against;
        self.point_difference = self.scores_for as i32 - self.scores_against as i32;
    }
}

/// Score of the last group-stage meeting, from the owning team's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub points_for: u32,
    pub points_against: u32,
}

impl HeadToHead {
    pub fn won(&self) -> bool {
        self.points_for > self.points_against
    }
}

/// Tournament entrant with its static rating and everything a run mutates.
///
/// `rating` is a ranking position, so a lower value means a stronger team.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub rating: f64,
    pub form: Form,
    pub stats: TeamStats,
    pub results: HashMap<TeamId, HeadToHead>,
}

impl Team {
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>, rating: f64) -> Self {
        Team {
            id: id.into(),
            name: name.into(),
            rating,
            form: Form::default(),
            stats: TeamStats::default(),
            results: HashMap::new(),
        }
    }

    pub fn head_to_head(&self, opponent: &str) -> Option<HeadToHead> {
        self.results.get(opponent).copied()
    }

    pub fn has_played(&self, opponent: &str) -> bool {
        self.results.contains_key(opponent)
    }

    /// Book a group-stage result against `opponent`.
    pub fn record_result(&mut self, opponent: &str, points_for: u32, points_against: u32) {
        debug_assert_ne!(self.id, opponent, "a team cannot play itself");
        self.stats.record(points_for, points_against);
        self.results.insert(
            opponent.to_string(),
            HeadToHead {
                points_for,
                points_against,
            },
        );
    }
}

/// Group label and its members, in current standing order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    pub teams: Vec<TeamId>,
}

impl Group {
    pub fn new(label: impl Into<String>, teams: Vec<TeamId>) -> Self {
        Group {
            label: label.into(),
            teams,
        }
    }
}

/// Every team taking part in one run, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRegistry {
    teams: HashMap<TeamId, Team>,
}

impl TeamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a team, returning it back if the id is already taken.
    pub fn insert(&mut self, team: Team) -> Result<(), Team> {
        if self.teams.contains_key(&team.id) {
            return Err(team);
        }
        self.teams.insert(team.id.clone(), team);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Team> {
        self.teams.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Team> {
        self.teams.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.teams.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }
}

impl FromIterator<Team> for TeamRegistry {
    /// Later duplicates replace earlier ones; use `insert` to detect them.
    fn from_iter<I: IntoIterator<Item = Team>>(iter: I) -> Self {
        TeamRegistry {
            teams: iter.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}
