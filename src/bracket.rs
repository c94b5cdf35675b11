use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::context::SimulationContext;
use crate::error::SimulationError;
use crate::game::{play_match, MatchResult};
use crate::seeding::Hat;
use crate::team::{TeamId, TeamRegistry};

/// A knockout pairing. `hat_label` names the part of the bracket it came from
/// ("DG" for the draw between hats D and G, "DG/EF" one round later).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMatchup {
    pub team1: TeamId,
    pub team2: TeamId,
    pub hat_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutMatch {
    pub matchup: BracketMatchup,
    pub result: MatchResult,
}

impl KnockoutMatch {
    pub fn winner(&self) -> &TeamId {
        if self.result.team1_won() {
            &self.matchup.team1
        } else {
            &self.matchup.team2
        }
    }

    pub fn loser(&self) -> &TeamId {
        if self.result.team1_won() {
            &self.matchup.team2
        } else {
            &self.matchup.team1
        }
    }
}

/// The whole knockout phase, draw to medals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub draw: Vec<BracketMatchup>,
    /// Played rounds in order; the last one is the semifinal.
    pub rounds: Vec<Vec<KnockoutMatch>>,
    pub third_place: KnockoutMatch,
    pub final_match: KnockoutMatch,
    /// Gold, silver, bronze.
    pub medals: [TeamId; 3],
}

impl Bracket {
    pub fn semifinals(&self) -> &[KnockoutMatch] {
        self.rounds.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

fn join_labels(a: &str, b: &str) -> String {
    format!("{a}/{b}")
}

/// Draw the first knockout round.
///
/// Hat `i` meets hat `H-1-i`. The upper hat's first team gets a random team
/// from the lower hat and its second team the other one, unless that would
/// repeat more group-stage meetings than the opposite assignment.
pub fn draw_matchups<R: Rng + ?Sized>(
    teams: &TeamRegistry,
    hats: &[Hat],
    rng: &mut R,
) -> Vec<BracketMatchup> {
    let played = |a: &TeamId, b: &TeamId| teams.get(a).is_some_and(|t| t.has_played(b));
    let rematches = |pairs: &[(&TeamId, &TeamId); 2]| {
        pairs.iter().filter(|(a, b)| played(*a, *b)).count()
    };

    let mut draw = Vec::with_capacity(hats.len());
    for i in 0..hats.len() / 2 {
        let (upper, lower) = (&hats[i], &hats[hats.len() - 1 - i]);
        let label = format!("{}{}", upper.label, lower.label);

        let pick = rng.gen_range(0..2);
        let picked = [
            (&upper.teams[0], &lower.teams[pick]),
            (&upper.teams[1], &lower.teams[1 - pick]),
        ];
        let other = [
            (&upper.teams[0], &lower.teams[1 - pick]),
            (&upper.teams[1], &lower.teams[pick]),
        ];

        let (picked_count, other_count) = (rematches(&picked), rematches(&other));
        let chosen = if other_count < picked_count { other } else { picked };
        if picked_count.min(other_count) > 0 {
            log::warn!(
                "draw {label}: every pairing repeats a group-stage meeting, keeping {} - {}",
                chosen[0].0,
                chosen[0].1
            );
        }

        for (team1, team2) in chosen {
            draw.push(BracketMatchup {
                team1: team1.clone(),
                team2: team2.clone(),
                hat_label: label.clone(),
            });
        }
    }
    draw
}

/// Pair the winners of a round.
///
/// Each remaining winner meets the first remaining winner from a different
/// part of the bracket, so teams drawn from the same pair of hats cannot meet
/// straight away. Winners arrive as `(team, label of the matchup they won)`.
pub fn pair_next_round(winners: &[(TeamId, String)]) -> Vec<BracketMatchup> {
    let mut pool = winners.to_vec();
    let mut next = Vec::with_capacity(pool.len() / 2);

    while pool.len() >= 2 {
        let (team1, label1) = pool.remove(0);
        let at = pool.iter().position(|(_, l)| *l != label1).unwrap_or(0);
        let (team2, label2) = pool.remove(at);
        next.push(BracketMatchup {
            team1,
            team2,
            hat_label: join_labels(&label1, &label2),
        });
    }
    next
}

fn play_matchup<R: Rng>(
    ctx: &mut SimulationContext<R>,
    matchup: BracketMatchup,
) -> Result<KnockoutMatch, SimulationError> {
    let result = play_match(ctx, &matchup.team1, &matchup.team2)?;
    Ok(KnockoutMatch { matchup, result })
}

/// Draw and play the knockout phase down to the medal matches.
pub fn play_knockout<R: Rng>(
    ctx: &mut SimulationContext<R>,
    hats: &[Hat],
) -> Result<Bracket, SimulationError> {
    if hats.len() < 2 || hats.len() % 2 != 0 {
        return Err(SimulationError::NotEnoughTeams {
            needed: usize::max(4, (hats.len() + 1) / 2 * 4),
            available: hats.len() * 2,
        });
    }

    let draw = draw_matchups(&ctx.teams, hats, &mut ctx.rng);
    log::info!("knockout draw: {} matchup(s)", draw.len());

    let mut matchups = draw.clone();
    let mut rounds: Vec<Vec<KnockoutMatch>> = Vec::new();
    let finalists = loop {
        let mut played = Vec::with_capacity(matchups.len());
        for matchup in matchups {
            played.push(play_matchup(ctx, matchup)?);
        }

        let winners: Vec<(TeamId, String)> = played
            .iter()
            .map(|m| (m.winner().clone(), m.matchup.hat_label.clone()))
            .collect();
        log::info!("knockout round {} done, {} team(s) left", rounds.len() + 1, winners.len());
        rounds.push(played);

        if winners.len() <= 2 {
            break winners;
        }
        matchups = pair_next_round(&winners);
    };

    let semifinals = rounds.last().map(Vec::as_slice).unwrap_or(&[]);
    let (third_place, final_match) = match (semifinals, finalists.as_slice()) {
        ([semi1, semi2], [(team1, label1), (team2, label2)]) => {
            let third = BracketMatchup {
                team1: semi1.loser().clone(),
                team2: semi2.loser().clone(),
                hat_label: join_labels(&semi1.matchup.hat_label, &semi2.matchup.hat_label),
            };
            let last = BracketMatchup {
                team1: team1.clone(),
                team2: team2.clone(),
                hat_label: join_labels(label1, label2),
            };
            (play_matchup(ctx, third)?, play_matchup(ctx, last)?)
        }
        _ => {
            return Err(SimulationError::NotEnoughTeams {
                needed: 4,
                available: hats.len() * 2,
            })
        }
    };

    let medals = [
        final_match.winner().clone(),
        final_match.loser().clone(),
        third_place.winner().clone(),
    ];
    log::info!("medals: {} / {} / {}", medals[0], medals[1], medals[2]);

    Ok(Bracket {
        draw,
        rounds,
        third_place,
        final_match,
        medals,
    })
}
