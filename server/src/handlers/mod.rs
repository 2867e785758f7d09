mod fun_awards;
mod image;
mod judge_guesses;
mod judge_team_names;
mod scoreboard;

pub use self::fun_awards::*;
pub use self::image::*;
pub use self::judge_guesses::*;
pub use self::judge_team_names::*;
pub use self::scoreboard::*;

use errors::Error;

/// Content provider failures surface as 502s.
pub fn upstream(err: generator::Error) -> Error {
    Error::Upstream(err.to_string())
}
