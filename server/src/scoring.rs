//! Point totals for a finished game.
//!
//! Everything here works on rows that were already loaded, so the same inputs
//! always produce the same scoreboard.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use db::models::{Guess, Player};

pub const TEAM_NAME_BONUS: i64 = 2;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScore {
    pub id: i32,
    pub name: String,
    pub team: i32,
    pub tell_points: i64,
    pub mission_points: i64,
    pub team_name_points: i64,
    pub total_points: i64,
    pub breakdown: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamScore {
    pub team: i32,
    pub total_points: i64,
    pub players: Vec<PlayerScore>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Scoreboard {
    pub players: Vec<PlayerScore>,
    pub teams: Vec<TeamScore>,
}

/// Everything the scoreboard is computed from.
pub struct ScoringInput<'a> {
    pub players: &'a [Player],
    pub guesses: &'a [Guess],
    /// player id -> id of the tell option they selected
    pub selected_tells: &'a HashMap<i32, i32>,
    /// player id -> missions completed
    pub mission_counts: &'a HashMap<i32, i64>,
    pub team_name_winners: &'a HashSet<i32>,
    pub ended_at: Option<NaiveDateTime>,
}

/// Whole hours between the guess and the end of the game, if positive.
pub fn early_bonus(updated_at: NaiveDateTime, ended_at: Option<NaiveDateTime>) -> i64 {
    match ended_at {
        Some(ended_at) => (ended_at - updated_at).num_hours().max(0),
        None => 0,
    }
}

pub fn stealth_bonus(wrong_guesses: i64) -> i64 {
    (wrong_guesses + 1) / 2
}

fn score_player(player: &Player, input: &ScoringInput) -> PlayerScore {
    let mut breakdown = Vec::new();
    let mut tell_points = 0;

    for guess in input.guesses.iter().filter(|g| g.guesser_id == player.id) {
        let target_tell = input.selected_tells.get(&guess.target_player_id).copied();
        if !guess.is_correct(target_tell) {
            continue;
        }

        tell_points += 1;
        breakdown.push("+1 for correctly guessing a tell".to_string());

        let hours = early_bonus(guess.updated_at, input.ended_at);
        if hours > 0 {
            tell_points += hours;
            breakdown.push(format!("+{} early guess bonus", hours));
        }
    }

    if let Some(selected) = input.selected_tells.get(&player.id) {
        let wrong = input
            .guesses
            .iter()
            .filter(|g| g.target_player_id == player.id && g.is_wrong(Some(*selected)))
            .count() as i64;

        let stealth = stealth_bonus(wrong);
        if stealth > 0 {
            tell_points += stealth;
            breakdown.push(format!(
                "+{} stealth bonus ({} wrong guesses)",
                stealth, wrong
            ));
        }
    }

    let mission_points = input.mission_counts.get(&player.id).copied().unwrap_or(0);
    if mission_points > 0 {
        breakdown.push(format!("+{} mission completions", mission_points));
    }

    let team_name_points = if input.team_name_winners.contains(&player.id) {
        breakdown.push(format!("+{} winning team name", TEAM_NAME_BONUS));
        TEAM_NAME_BONUS
    } else {
        0
    };

    PlayerScore {
        id: player.id,
        name: player.name.clone(),
        team: player.team_number,
        tell_points,
        mission_points,
        team_name_points,
        total_points: tell_points + mission_points + team_name_points,
        breakdown,
    }
}

pub fn compute(input: &ScoringInput) -> Scoreboard {
    let mut players: Vec<PlayerScore> = input
        .players
        .iter()
        .map(|player| score_player(player, input))
        .collect();

    players.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.name.cmp(&b.name))
    });

    let team_numbers: BTreeSet<i32> = input.players.iter().map(|p| p.team_number).collect();
    let mut teams: Vec<TeamScore> = team_numbers
        .into_iter()
        .map(|team| {
            let members: Vec<PlayerScore> =
                players.iter().filter(|p| p.team == team).cloned().collect();
            TeamScore {
                team,
                total_points: members.iter().map(|p| p.total_points).sum(),
                players: members,
            }
        })
        .collect();

    teams.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.team.cmp(&b.team))
    });

    Scoreboard { players, teams }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use db::models::{Guess, Player};

    use super::{compute, early_bonus, stealth_bonus, ScoringInput};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 25)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn player(id: i32, name: &str, team: i32) -> Player {
        Player {
            id,
            name: name.to_string(),
            team_number: team,
            is_admin: false,
            is_logged_in: true,
            logged_in_at: None,
            team_name_suggestion: None,
            created_at: at(9, 0),
        }
    }

    fn guess(
        guesser: i32,
        target: i32,
        matched: Option<i32>,
        status: &str,
        when: NaiveDateTime,
    ) -> Guess {
        Guess {
            id: guesser * 100 + target,
            guesser_id: guesser,
            target_player_id: target,
            free_text_guess: "something".to_string(),
            matched_option_id: matched,
            ai_reasoning: None,
            judge_status: status.to_string(),
            guessed_at: when,
            updated_at: when,
        }
    }

    #[test]
    fn test_stealth_bonus_rounds_up() {
        assert_eq!(stealth_bonus(0), 0);
        assert_eq!(stealth_bonus(1), 1);
        assert_eq!(stealth_bonus(2), 1);
        assert_eq!(stealth_bonus(3), 2);
        assert_eq!(stealth_bonus(4), 2);
        assert_eq!(stealth_bonus(7), 4);
    }

    #[test]
    fn test_early_bonus_whole_hours() {
        let ended = Some(at(20, 0));
        assert_eq!(early_bonus(at(17, 1), ended), 2);
        assert_eq!(early_bonus(at(17, 0), ended), 3);
        assert_eq!(early_bonus(at(19, 30), ended), 0);
        assert_eq!(early_bonus(at(20, 0) + Duration::minutes(5), ended), 0);
        assert_eq!(early_bonus(at(10, 0), None), 0);
    }

    #[test]
    fn test_full_scoreboard() {
        let players = vec![
            player(1, "David", 1),
            player(2, "Rosanne", 2),
            player(3, "Elaine", 3),
            player(4, "Emily", 1),
        ];
        // tell option ids: David 10, Rosanne 20, Emily 40. Elaine never picked.
        let selected_tells: HashMap<i32, i32> = [(1, 10), (2, 20), (4, 40)].into_iter().collect();
        let guesses = vec![
            // David spots Rosanne's tell three hours before the end
            guess(1, 2, Some(20), "graded", at(17, 0)),
            // Rosanne and Emily both miss David
            guess(2, 1, Some(11), "graded", at(18, 0)),
            guess(4, 1, None, "graded", at(19, 0)),
            // judging failed, counts for nobody
            guess(3, 1, Some(10), "ungraded", at(19, 0)),
            // Elaine has no tell, so a guess at her earns no stealth
            guess(2, 3, None, "graded", at(19, 0)),
        ];
        let mission_counts: HashMap<i32, i64> = [(3, 4)].into_iter().collect();
        let winners: HashSet<i32> = [4].into_iter().collect();

        let board = compute(&ScoringInput {
            players: &players,
            guesses: &guesses,
            selected_tells: &selected_tells,
            mission_counts: &mission_counts,
            team_name_winners: &winners,
            ended_at: Some(at(20, 0)),
        });

        let david = board.players.iter().find(|p| p.name == "David").unwrap();
        assert_eq!(david.tell_points, 1 + 3 + 1);
        assert_eq!(
            david.breakdown,
            vec![
                "+1 for correctly guessing a tell".to_string(),
                "+3 early guess bonus".to_string(),
                "+1 stealth bonus (2 wrong guesses)".to_string(),
            ]
        );

        let elaine = board.players.iter().find(|p| p.name == "Elaine").unwrap();
        assert_eq!(elaine.total_points, 4);
        assert_eq!(elaine.breakdown, vec!["+4 mission completions".to_string()]);

        let emily = board.players.iter().find(|p| p.name == "Emily").unwrap();
        assert_eq!(emily.team_name_points, 2);
        assert_eq!(emily.breakdown, vec!["+2 winning team name".to_string()]);

        let rosanne = board.players.iter().find(|p| p.name == "Rosanne").unwrap();
        assert_eq!(rosanne.total_points, 0);

        let order: Vec<&str> = board.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(order, vec!["David", "Elaine", "Emily", "Rosanne"]);

        let teams: Vec<(i32, i64)> = board.teams.iter().map(|t| (t.team, t.total_points)).collect();
        assert_eq!(teams, vec![(1, 7), (3, 4), (2, 0)]);
    }

    #[test]
    fn test_deterministic() {
        let players = vec![player(2, "Ben", 2), player(1, "Alex", 3), player(3, "Adam", 2)];
        let selected_tells: HashMap<i32, i32> = [(1, 5), (2, 6), (3, 7)].into_iter().collect();
        let guesses = vec![
            guess(1, 2, Some(6), "graded", at(12, 0)),
            guess(2, 1, Some(9), "graded", at(12, 0)),
            guess(3, 1, Some(5), "pending", at(12, 0)),
        ];
        let mission_counts = HashMap::new();
        let winners = HashSet::new();
        let input = ScoringInput {
            players: &players,
            guesses: &guesses,
            selected_tells: &selected_tells,
            mission_counts: &mission_counts,
            team_name_winners: &winners,
            ended_at: Some(at(14, 0)),
        };

        let first = compute(&input);
        assert_eq!(first, compute(&input));
        // Alex: 1 + 2 early + 1 stealth, Adam and Ben tie at zero and fall back to name order
        let order: Vec<&str> = first.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(order, vec!["Alex", "Adam", "Ben"]);
        assert_eq!(first.players[0].total_points, 4);
    }
}
