mod all_options;

pub use self::all_options::*;
