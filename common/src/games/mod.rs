pub mod clock;
mod session_rng;

pub mod tictactoe;

pub use clock::{Clock, FrozenClock, MonotonicClock, SteppingClock};
pub use session_rng::SessionRng;
