use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use crate::games::SessionRng;
use crate::games::clock::Clock;
use crate::games::tictactoe::{GameState, MoveComputed, Player, SearchEngine, TIME_PER_TURN};
use crate::log;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl ExecutorStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutorStatus::Completed | ExecutorStatus::Cancelled)
    }
}

/// A refused `start`; the state is handed back untouched.
#[derive(Debug)]
pub enum StartRejected {
    AlreadyRunning(GameState),
    NotComputerTurn(GameState),
}

impl StartRejected {
    pub fn into_state(self) -> GameState {
        match self {
            StartRejected::AlreadyRunning(state) | StartRejected::NotComputerTurn(state) => state,
        }
    }
}

struct Run {
    status: Arc<watch::Sender<ExecutorStatus>>,
    handle: Option<JoinHandle<GameState>>,
}

/// Runs the computer's search on the blocking pool. While a run is in
/// flight the executor owns the `GameState`; `wait` hands it back.
pub struct MoveExecutor<C: Clock> {
    clock: C,
    rng: SessionRng,
    time_per_turn: Duration,
    run: Option<Run>,
}

impl<C: Clock> MoveExecutor<C> {
    pub fn new(clock: C, rng: SessionRng) -> Self {
        Self {
            clock,
            rng,
            time_per_turn: TIME_PER_TURN,
            run: None,
        }
    }

    pub fn with_time_per_turn(mut self, time_per_turn: Duration) -> Self {
        self.time_per_turn = time_per_turn;
        self
    }

    pub fn status(&self) -> ExecutorStatus {
        match &self.run {
            Some(run) => *run.status.borrow(),
            None => ExecutorStatus::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status() == ExecutorStatus::Running
    }

    /// True while the background unit of the last run has not returned,
    /// including a cancelled one that is still searching.
    pub fn is_in_flight(&self) -> bool {
        self.run
            .as_ref()
            .and_then(|run| run.handle.as_ref())
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Status updates of the current run, if any.
    pub fn subscribe(&self) -> Option<watch::Receiver<ExecutorStatus>> {
        self.run.as_ref().map(|run| run.status.subscribe())
    }

    /// Starts a background search on `state`. The returned receiver yields
    /// the computed move once, or errors if the run was cancelled.
    pub fn start(
        &mut self,
        state: GameState,
    ) -> Result<oneshot::Receiver<MoveComputed>, StartRejected> {
        if self.is_running() || self.is_in_flight() {
            log!("Search already in flight, ignoring start");
            return Err(StartRejected::AlreadyRunning(state));
        }

        if state.current_mover() != Some(Player::Computer) {
            return Err(StartRejected::NotComputerTurn(state));
        }

        let (status_tx, _) = watch::channel(ExecutorStatus::Running);
        let status = Arc::new(status_tx);
        let (move_tx, move_rx) = oneshot::channel();

        let engine = SearchEngine::new(self.clock.clone(), self.rng.fork())
            .with_time_per_turn(self.time_per_turn);
        let run_status = status.clone();

        log!("Starting search on move {}", state.move_count());
        let handle = tokio::task::spawn_blocking(move || {
            search_and_deliver(engine, state, &run_status, move_tx)
        });

        self.run = Some(Run {
            status,
            handle: Some(handle),
        });
        Ok(move_rx)
    }

    /// Advisory: a search already underway runs to completion, but its
    /// result is discarded if this lands before it is delivered.
    pub fn request_cancel(&self) {
        let Some(run) = &self.run else {
            return;
        };

        let cancelled = run.status.send_if_modified(|status| {
            if *status != ExecutorStatus::Running {
                return false;
            }
            *status = ExecutorStatus::Cancelled;
            true
        });

        if cancelled {
            log!("Search cancellation requested");
        }
    }

    /// Waits for the background unit and takes the state back: with the
    /// computer's move applied if completed, unchanged if cancelled.
    /// Returns `None` if there is no run or its state was already taken.
    pub async fn wait(&mut self) -> Option<GameState> {
        let run = self.run.as_mut()?;
        let handle = run.handle.take()?;
        match handle.await {
            Ok(state) => Some(state),
            Err(e) => {
                log!("Search task failed: {}", e);
                run.status.send_replace(ExecutorStatus::Cancelled);
                None
            }
        }
    }
}

fn search_and_deliver<C: Clock>(
    mut engine: SearchEngine<C>,
    mut state: GameState,
    status: &watch::Sender<ExecutorStatus>,
    move_tx: oneshot::Sender<MoveComputed>,
) -> GameState {
    let chosen = engine.choose_computer_move(&mut state);

    // Cancellation is decided here, atomically with applying and delivering.
    status.send_if_modified(|status| {
        if *status != ExecutorStatus::Running {
            log!("Search finished after cancellation, discarding result");
            return false;
        }

        let Some(pos) = chosen else {
            *status = ExecutorStatus::Cancelled;
            return true;
        };

        match state.apply_move(pos, Player::Computer) {
            Ok(_) => {
                let sign = state.sign_of(Player::Computer);
                let _ = move_tx.send(MoveComputed { position: pos, sign });
                *status = ExecutorStatus::Completed;
            }
            Err(e) => {
                log!("Computed move {} was rejected: {}", pos, e);
                *status = ExecutorStatus::Cancelled;
            }
        }
        true
    });

    state
}
