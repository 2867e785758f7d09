use serde::{Deserialize, Serialize};

mod end_game;
mod restart;
mod start_game;
mod status;

pub use self::end_game::*;
pub use self::restart::*;
pub use self::start_game::*;
pub use self::status::*;

#[derive(Debug, Deserialize, Serialize)]
pub struct AdminResponse {
    pub success: bool,
}
