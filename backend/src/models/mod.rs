pub mod params;
pub mod playlist;
pub mod time;

pub use params::*;
pub use playlist::*;
pub use time::*;
