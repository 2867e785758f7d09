mod available_players;
mod complete;
mod completions;

pub use self::available_players::*;
pub use self::complete::*;
pub use self::completions::*;
