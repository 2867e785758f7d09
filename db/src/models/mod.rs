mod game_state;
mod generated_option;
mod guess;
mod mission_completion;
mod player;
mod selection;

pub use self::game_state::*;
pub use self::generated_option::*;
pub use self::guess::*;
pub use self::mission_completion::*;
pub use self::player::*;
pub use self::selection::*;
