use serde::{Deserialize, Serialize};

use db::models::Player;

mod get_session;
mod login;
mod logout;
mod players;

pub use self::get_session::*;
pub use self::login::*;
pub use self::logout::*;
pub use self::players::*;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: i32,
    pub name: String,
    pub team: i32,
    pub is_admin: bool,
}

impl From<Player> for PlayerSummary {
    fn from(player: Player) -> Self {
        PlayerSummary {
            id: player.id,
            name: player.name,
            team: player.team_number,
            is_admin: player.is_admin,
        }
    }
}
