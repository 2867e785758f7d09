use std::collections::BTreeMap;

use actix_web::web::{block, Data};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{GameState, Player, TeamNameWinner},
    DbPool,
};
use errors::Error;
use generator::{ContentGenerator, TeamNameEntry};

pub const WINNER_BY_DEFAULT: &str = "The only suggestion for this team - winner by default!";

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SuggestionEntry {
    pub id: i32,
    pub name: String,
    pub team: i32,
    pub suggestion: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamNameJudgement {
    pub winners: Vec<TeamNameWinner>,
    pub all_suggestions: BTreeMap<i32, Vec<SuggestionEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

async fn pick_winner(
    generator: &dyn ContentGenerator,
    team: i32,
    entries: &[SuggestionEntry],
) -> Option<TeamNameWinner> {
    let winner = |entry: &SuggestionEntry, reasoning: String| TeamNameWinner {
        player_id: entry.id,
        player_name: entry.name.clone(),
        team,
        suggestion: entry.suggestion.clone(),
        reasoning,
    };

    if let [only] = entries {
        return Some(winner(only, WINNER_BY_DEFAULT.to_string()));
    }

    let prompt_entries: Vec<TeamNameEntry> = entries
        .iter()
        .map(|entry| TeamNameEntry {
            player_name: entry.name.clone(),
            suggestion: entry.suggestion.clone(),
        })
        .collect();

    match generator::judge_team_names(generator, team, &prompt_entries).await {
        Ok(verdict) => match entries.iter().find(|e| e.name == verdict.winner_name) {
            Some(entry) => Some(winner(entry, verdict.reasoning)),
            None => {
                warn!(
                    "Team {} judge picked unknown player {:?}, no winner",
                    team, verdict.winner_name
                );
                None
            }
        },
        Err(err) => {
            error!("Could not judge team {} names - {}", team, err);
            None
        }
    }
}

/// Picks one team name per team from the players' suggestions and stores the winners.
pub async fn judge_team_names(
    pool: Data<DbPool>,
    generator: Data<dyn ContentGenerator>,
) -> Result<TeamNameJudgement, Error> {
    let load_pool = pool.clone();
    let suggesters = block(move || {
        let conn = get_conn(&load_pool)?;
        Player::with_team_name_suggestions(&conn)
    })
    .await??;

    let mut all_suggestions: BTreeMap<i32, Vec<SuggestionEntry>> = BTreeMap::new();
    for player in suggesters {
        if let Some(suggestion) = player.team_name_suggestion {
            all_suggestions
                .entry(player.team_number)
                .or_default()
                .push(SuggestionEntry {
                    id: player.id,
                    name: player.name,
                    team: player.team_number,
                    suggestion,
                });
        }
    }

    if all_suggestions.is_empty() {
        return Ok(TeamNameJudgement {
            winners: Vec::new(),
            all_suggestions,
            message: Some("No team name suggestions were made".to_string()),
        });
    }

    let mut winners = Vec::new();
    for (team, entries) in &all_suggestions {
        if let Some(winner) = pick_winner(generator.get_ref(), *team, entries).await {
            winners.push(winner);
        }
    }

    let stored = winners.clone();
    block(move || {
        let conn = get_conn(&pool)?;
        GameState::set_team_name_winners(&conn, &stored)
    })
    .await??;

    info!("Stored {} team name winners", winners.len());

    Ok(TeamNameJudgement {
        winners,
        all_suggestions,
        message: None,
    })
}
