//! Input shapes handed over by whatever loads the tournament data, and the
//! validation that turns them into something a run can trust.
//!
//! Field names of the usual `groups.json` / `exibitions.json` files
//! (`ISOCode`, `Team`, `FIBARanking`, `Opponent`, `Result`, `Date`) are
//! accepted as aliases.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::LoadError;
use crate::team::{Group, Team, TeamId, TeamRegistry};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    #[serde(alias = "ISOCode")]
    pub id: TeamId,
    #[serde(alias = "Team")]
    pub name: String,
    #[serde(alias = "FIBARanking")]
    pub rating: f64,
}

/// Pre-tournament game as it arrives, score still a `"own-opponent"` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExhibition {
    #[serde(alias = "Date", default)]
    pub date: Option<String>,
    #[serde(alias = "Opponent")]
    pub opponent: TeamId,
    #[serde(alias = "Result")]
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhibitionResult {
    pub opponent: TeamId,
    pub own_score: u32,
    pub opponent_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInput {
    pub label: String,
    pub teams: Vec<TeamRecord>,
}

/// Validated groups and exhibition history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentInput {
    groups: Vec<GroupInput>,
    exhibitions: BTreeMap<TeamId, Vec<ExhibitionResult>>,
}

/// Parse a `"86-79"` style score.
pub fn parse_result(team: &str, raw: &str) -> Result<(u32, u32), LoadError> {
    let malformed = || LoadError::MalformedHistoricalResult {
        team: team.to_string(),
        raw: raw.to_string(),
    };

    let (own, opponent) = raw.split_once('-').ok_or_else(malformed)?;
    let own = own.trim().parse::<u32>().map_err(|_| malformed())?;
    let opponent = opponent.trim().parse::<u32>().map_err(|_| malformed())?;
    Ok((own, opponent))
}

impl TournamentInput {
    /// Validate groups and exhibitions.
    ///
    /// Exhibition opponents may be teams outside the tournament; the team
    /// owning a history must be in a group.
    pub fn new(
        groups: BTreeMap<String, Vec<TeamRecord>>,
        exhibitions: BTreeMap<TeamId, Vec<RawExhibition>>,
    ) -> Result<Self, LoadError> {
        let mut seen = HashSet::new();
        for (label, teams) in &groups {
            if teams.len() < 2 {
                return Err(LoadError::GroupTooSmall {
                    group: label.clone(),
                    size: teams.len(),
                });
            }
            for team in teams {
                if !team.rating.is_finite() {
                    return Err(LoadError::InvalidRating { id: team.id.clone() });
                }
                if !seen.insert(team.id.clone()) {
                    return Err(LoadError::DuplicateTeam { id: team.id.clone() });
                }
            }
        }

        let mut parsed = BTreeMap::new();
        for (team, games) in exhibitions {
            if !seen.contains(&team) {
                return Err(LoadError::UnknownTeam {
                    id: team,
                    context: "exhibitions".to_string(),
                });
            }
            let results = games
                .iter()
                .map(|game| {
                    let (own_score, opponent_score) = parse_result(&team, &game.result)?;
                    Ok(ExhibitionResult {
                        opponent: game.opponent.clone(),
                        own_score,
                        opponent_score,
                    })
                })
                .collect::<Result<Vec<_>, LoadError>>()?;
            parsed.insert(team, results);
        }

        let groups = groups
            .into_iter()
            .map(|(label, teams)| GroupInput { label, teams })
            .collect();

        Ok(TournamentInput {
            groups,
            exhibitions: parsed,
        })
    }

    /// Parse and validate the two JSON documents.
    pub fn from_json(groups: &str, exhibitions: &str) -> Result<Self, LoadError> {
        let groups: BTreeMap<String, Vec<TeamRecord>> = serde_json::from_str(groups)?;
        let exhibitions: BTreeMap<TeamId, Vec<RawExhibition>> = serde_json::from_str(exhibitions)?;
        Self::new(groups, exhibitions)
    }

    pub fn groups(&self) -> &[GroupInput] {
        &self.groups
    }

    pub fn exhibitions(&self) -> &BTreeMap<TeamId, Vec<ExhibitionResult>> {
        &self.exhibitions
    }

    pub fn team_count(&self) -> usize {
        self.groups.iter().map(|g| g.teams.len()).sum()
    }

    /// Fresh, unplayed teams for a new run.
    pub fn registry(&self) -> TeamRegistry {
        self.groups
            .iter()
            .flat_map(|g| &g.teams)
            .map(|t| Team::new(t.id.clone(), t.name.clone(), t.rating))
            .collect()
    }

    /// Groups ordered by label, teams in listed order.
    pub fn group_layout(&self) -> Vec<Group> {
        self.groups
            .iter()
            .map(|g| Group::new(g.label.clone(), g.teams.iter().map(|t| t.id.clone()).collect()))
            .collect()
    }
}
