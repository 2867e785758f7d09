use diesel::SqliteConnection;

use db::models::GameState;
use errors::Error;

mod fun_awards;
mod judge_team_names;
mod reveals;
mod scores;

pub use self::fun_awards::*;
pub use self::judge_team_names::*;
pub use self::reveals::*;
pub use self::scores::*;

/// Everything on the prizes page stays hidden until the game is over.
fn finished_state(conn: &SqliteConnection) -> Result<GameState, Error> {
    let state = GameState::get(conn)?;
    if !state.is_finished() {
        return Err(Error::BadRequest("Game not finished yet".to_string()));
    }
    Ok(state)
}
