mod players;
mod state;

pub use self::players::*;
pub use self::state::*;
