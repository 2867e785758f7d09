use std::collections::{HashMap, HashSet};

use actix_web::web::{block, Data, Json};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{GameState, Guess, OptionKind, Player, Selection},
    DbPool,
};
use errors::Error;

use crate::handlers::mission_counts;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminGameState {
    pub status: String,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPlayer {
    pub id: i32,
    pub name: String,
    pub team: i32,
    pub is_admin: bool,
    pub is_logged_in: bool,
    pub team_name_suggestion: Option<String>,
    pub has_tell: bool,
    pub has_mission: bool,
    pub guess_count: i64,
    pub mission_count: i64,
}

#[derive(Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_players: usize,
    pub logged_in: usize,
    pub has_tell: usize,
    pub has_mission: usize,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatusResponse {
    pub game_state: AdminGameState,
    pub players: Vec<AdminPlayer>,
    pub stats: AdminStats,
}

pub async fn status(pool: Data<DbPool>) -> Result<Json<AdminStatusResponse>, Error> {
    let (state, players) = block(move || {
        let conn = get_conn(&pool)?;
        let state = GameState::get(&conn)?;
        let tells: HashSet<i32> = Selection::player_ids(&conn, OptionKind::Tell)?
            .into_iter()
            .collect();
        let missions: HashSet<i32> = Selection::player_ids(&conn, OptionKind::Mission)?
            .into_iter()
            .collect();
        let completions = mission_counts(&conn)?;
        let mut guess_counts: HashMap<i32, i64> = HashMap::new();
        for guess in Guess::find_all(&conn)? {
            *guess_counts.entry(guess.guesser_id).or_insert(0) += 1;
        }

        let players: Vec<AdminPlayer> = Player::find_all(&conn)?
            .into_iter()
            .map(|player| AdminPlayer {
                has_tell: tells.contains(&player.id),
                has_mission: missions.contains(&player.id),
                guess_count: guess_counts.get(&player.id).copied().unwrap_or(0),
                mission_count: completions.get(&player.id).copied().unwrap_or(0),
                id: player.id,
                name: player.name,
                team: player.team_number,
                is_admin: player.is_admin,
                is_logged_in: player.is_logged_in,
                team_name_suggestion: player.team_name_suggestion,
            })
            .collect();

        Ok::<_, Error>((state, players))
    })
    .await??;

    let stats = AdminStats {
        total_players: players.len(),
        logged_in: players.iter().filter(|p| p.is_logged_in).count(),
        has_tell: players.iter().filter(|p| p.has_tell).count(),
        has_mission: players.iter().filter(|p| p.has_mission).count(),
    };

    Ok(Json(AdminStatusResponse {
        game_state: AdminGameState {
            status: state.status,
            started_at: state.started_at,
            ended_at: state.ended_at,
        },
        players,
        stats,
    }))
}
