use std::collections::{HashMap, HashSet};

use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use db::models::{
    GameState, Guess, MissionCompletion, OptionKind, Player, Selection, TeamNameWinner,
};
use errors::Error;

use crate::scoring::{self, PlayerScore, ScoringInput, TeamScore};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TeamNameSuggestion {
    pub name: String,
    pub team: i32,
    pub suggestion: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoresResponse {
    pub players: Vec<PlayerScore>,
    pub teams: Vec<TeamScore>,
    pub team_name_winners: Vec<TeamNameWinner>,
    pub all_team_name_suggestions: Vec<TeamNameSuggestion>,
}

/// player id -> selected tell option id
pub fn selected_tell_ids(conn: &SqliteConnection) -> Result<HashMap<i32, i32>, Error> {
    Ok(Selection::find_all(conn, OptionKind::Tell)?
        .into_iter()
        .map(|(selection, _)| (selection.player_id, selection.option_id))
        .collect())
}

pub fn mission_counts(conn: &SqliteConnection) -> Result<HashMap<i32, i64>, Error> {
    let mut counts = HashMap::new();
    for completion in MissionCompletion::find_all(conn)? {
        *counts.entry(completion.player_id).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Loads a finished game and scores it.
pub fn load_scoreboard(
    conn: &SqliteConnection,
    state: &GameState,
) -> Result<ScoresResponse, Error> {
    let players = Player::find_all(conn)?;
    let guesses = Guess::find_all(conn)?;
    let selected_tells = selected_tell_ids(conn)?;
    let mission_counts = mission_counts(conn)?;
    let team_name_winners = state.team_name_winners();
    let winner_ids: HashSet<i32> = team_name_winners.iter().map(|w| w.player_id).collect();

    let board = scoring::compute(&ScoringInput {
        players: &players,
        guesses: &guesses,
        selected_tells: &selected_tells,
        mission_counts: &mission_counts,
        team_name_winners: &winner_ids,
        ended_at: state.ended_at,
    });

    let all_team_name_suggestions = Player::with_team_name_suggestions(conn)?
        .into_iter()
        .filter_map(|player| {
            player.team_name_suggestion.map(|suggestion| TeamNameSuggestion {
                name: player.name,
                team: player.team_number,
                suggestion,
            })
        })
        .collect();

    Ok(ScoresResponse {
        players: board.players,
        teams: board.teams,
        team_name_winners,
        all_team_name_suggestions,
    })
}
