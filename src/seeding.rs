use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::error::SimulationError;
use crate::team::{Group, TeamId, TeamRegistry};

/// Teams that finished at the same position in their groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub label: String,
    pub rank: usize,
    pub teams: Vec<TeamId>,
}

/// Two consecutive teams of the overall ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hat {
    pub label: String,
    pub teams: [TeamId; 2],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seeding {
    pub pots: Vec<Pot>,
    /// Every potted team, best first.
    pub ranking: Vec<TeamId>,
    /// Hats for the teams that reach the bracket.
    pub hats: Vec<Hat>,
}

impl Seeding {
    pub fn hat_of(&self, team: &str) -> Option<&Hat> {
        self.hats.iter().find(|h| h.teams.iter().any(|t| t == team))
    }
}

/// Spreadsheet-style label for the `index`-th bucket: A..Z, AA, AB, ...
pub fn bucket_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        label.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

/// Build pots from resolved groups, rank across them and cut the top
/// `bracket_size` teams into hats.
///
/// Only as many finishing positions as the bracket can draw from are potted:
/// with three groups and eight places the fourth-placed teams are out.
/// Within a pot teams are ordered by points, then point difference, then
/// points scored. Hat labels continue the letters after the last pot.
pub fn assign_seeds(
    teams: &TeamRegistry,
    groups: &[Group],
    bracket_size: usize,
) -> Result<Seeding, SimulationError> {
    if groups.is_empty() {
        return Err(SimulationError::NotEnoughTeams {
            needed: bracket_size,
            available: 0,
        });
    }
    let largest = groups.iter().map(|g| g.teams.len()).max().unwrap_or(0);
    let tiers = bracket_size.div_ceil(groups.len()).min(largest);

    let mut pots = Vec::with_capacity(tiers);
    for rank in 0..tiers {
        let mut members = groups
            .iter()
            .filter_map(|g| g.teams.get(rank))
            .map(|id| {
                teams
                    .get(id)
                    .ok_or_else(|| SimulationError::UnknownTeam(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        members.sort_by_key(|t| {
            (
                Reverse(t.stats.points),
                Reverse(t.stats.point_difference),
                Reverse(t.stats.scores_for),
            )
        });
        pots.push(Pot {
            label: bucket_label(rank),
            rank: rank + 1,
            teams: members.into_iter().map(|t| t.id.clone()).collect(),
        });
    }

    let ranking: Vec<TeamId> = pots.iter().flat_map(|p| p.teams.iter().cloned()).collect();
    if ranking.len() < bracket_size {
        return Err(SimulationError::NotEnoughTeams {
            needed: bracket_size,
            available: ranking.len(),
        });
    }

    let hats: Vec<Hat> = ranking[..bracket_size]
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| Hat {
            label: bucket_label(pots.len() + i),
            teams: [pair[0].clone(), pair[1].clone()],
        })
        .collect();

    for hat in &hats {
        log::info!("hat {}: {} / {}", hat.label, hat.teams[0], hat.teams[1]);
    }

    Ok(Seeding {
        pots,
        ranking,
        hats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::Team;

    fn team(id: &str, wins: u32, diff: i32, scored: u32) -> Team {
        let mut t = Team::new(id, id, 10.0);
        t.stats.wins = wins;
        t.stats.losses = 3 - wins;
        t.stats.points = 2 * wins + (3 - wins);
        t.stats.point_difference = diff;
        t.stats.scores_for = scored;
        t
    }

    fn fixture() -> (TeamRegistry, Vec<Group>) {
        let teams: TeamRegistry = vec![
            team("A1", 3, 40, 280),
            team("A2", 2, 10, 260),
            team("A3", 1, -5, 250),
            team("A4", 0, -45, 230),
            team("B1", 2, 30, 270),
            team("B2", 2, 12, 255),
            team("B3", 1, -5, 262),
            team("B4", 1, -37, 240),
            team("C1", 3, 55, 300),
            team("C2", 2, 10, 265),
            team("C3", 1, -20, 240),
            team("C4", 0, -45, 220),
        ]
        .into_iter()
        .collect();
        let ids = |l: [&str; 4]| l.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let groups = vec![
            Group::new("A", ids(["A1", "A2", "A3", "A4"])),
            Group::new("B", ids(["B1", "B2", "B3", "B4"])),
            Group::new("C", ids(["C1", "C2", "C3", "C4"])),
        ];
        (teams, groups)
    }

    #[test]
    fn labels() {
        assert_eq!(bucket_label(0), "A");
        assert_eq!(bucket_label(3), "D");
        assert_eq!(bucket_label(25), "Z");
        assert_eq!(bucket_label(26), "AA");
        assert_eq!(bucket_label(27), "AB");
    }

    #[test]
    fn pots_sorted_by_points_difference_then_scored() {
        let (teams, groups) = fixture();
        let seeding = assign_seeds(&teams, &groups, 8).unwrap();

        assert_eq!(seeding.pots.len(), 3);
        assert_eq!(seeding.pots[0].label, "A");
        assert_eq!(seeding.pots[0].teams, vec!["C1", "A1", "B1"]);
        // A2 and C2 level on points and difference; C2 scored more
        assert_eq!(seeding.pots[1].teams, vec!["B2", "C2", "A2"]);
        assert_eq!(seeding.pots[2].teams, vec!["B3", "A3", "C3"]);
    }

    #[test]
    fn hats_follow_pot_letters() {
        let (teams, groups) = fixture();
        let seeding = assign_seeds(&teams, &groups, 8).unwrap();

        assert_eq!(seeding.ranking.len(), 9);
        let labels: Vec<&str> = seeding.hats.iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["D", "E", "F", "G"]);
        assert_eq!(seeding.hats[0].teams, ["C1".to_string(), "A1".to_string()]);
        assert_eq!(seeding.hats[3].teams, ["B3".to_string(), "A3".to_string()]);
        assert!(seeding.hat_of("C3").is_none());
        assert_eq!(seeding.hat_of("B1").unwrap().label, "E");
    }

    #[test]
    fn two_groups_pot_every_position() {
        let (teams, groups) = fixture();
        let seeding = assign_seeds(&teams, &groups[..2], 8).unwrap();

        assert_eq!(seeding.pots.len(), 4);
        assert_eq!(seeding.ranking.len(), 8);
        assert_eq!(seeding.hats.last().unwrap().label, "H");
    }

    #[test]
    fn too_few_teams_for_bracket() {
        let (teams, groups) = fixture();
        let err = assign_seeds(&teams, &groups, 16).unwrap_err();
        assert!(matches!(err, SimulationError::NotEnoughTeams { needed: 16, available: 12 }));
    }
}
