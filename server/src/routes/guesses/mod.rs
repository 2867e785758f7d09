mod about_me;
mod mine;
mod submit;

pub use self::about_me::*;
pub use self::mine::*;
pub use self::submit::*;
