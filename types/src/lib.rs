pub mod error;
pub mod player;
pub mod random;

pub use error::*;
pub use player::*;
pub use random::*;
