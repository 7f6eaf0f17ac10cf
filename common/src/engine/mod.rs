mod executor;
mod session;

pub use executor::{ExecutorStatus, MoveExecutor, StartRejected};
pub use session::GameSession;
