use tokio::sync::oneshot;

use crate::error::GameError;
use crate::games::clock::Clock;
use crate::games::tictactoe::{GameSettings, GameState, MoveComputed, Outcome, Player, Position};
use crate::log;

use super::executor::{ExecutorStatus, MoveExecutor};

/// Owns the game and hands it to the executor for computer turns. While a
/// search is in flight the state is unavailable to the interactive side.
pub struct GameSession<C: Clock> {
    state: Option<GameState>,
    settings: GameSettings,
    executor: MoveExecutor<C>,
}

impl<C: Clock> GameSession<C> {
    pub fn new(settings: GameSettings, executor: MoveExecutor<C>) -> Result<Self, GameError> {
        Ok(Self {
            state: Some(GameState::new(settings)?),
            settings,
            executor,
        })
    }

    /// Cancels any search in flight and waits for it to finish before the
    /// new game replaces the old one.
    pub async fn new_game(&mut self, settings: GameSettings) -> Result<(), GameError> {
        let state = GameState::new(settings)?;

        self.executor.request_cancel();
        if self.executor.wait().await.is_some() {
            log!("Discarded previous game after its search finished");
        }

        log!(
            "New game: {}x{}, easy mode {}, computer first {}",
            settings.grid_size,
            settings.grid_size,
            settings.easy_mode,
            settings.computer_first
        );
        self.state = Some(state);
        self.settings = settings;
        Ok(())
    }

    /// `None` while a computer search holds the state.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn executor_status(&self) -> ExecutorStatus {
        self.executor.status()
    }

    pub fn human_move(&mut self, pos: Position) -> Result<Outcome, GameError> {
        let state = self
            .state
            .as_mut()
            .ok_or(GameError::NotYourTurn(Player::Human))?;
        state.apply_move(pos, Player::Human)
    }

    /// Hands the state to the executor if the computer is to move.
    pub fn begin_computer_turn(&mut self) -> Option<oneshot::Receiver<MoveComputed>> {
        let state = self.state.take()?;
        match self.executor.start(state) {
            Ok(rx) => Some(rx),
            Err(rejected) => {
                self.state = Some(rejected.into_state());
                None
            }
        }
    }

    /// Takes the state back once the background search has finished. A game
    /// lost with a failed search is replaced by a fresh one.
    pub async fn finish_computer_turn(&mut self) -> Option<&GameState> {
        if let Some(state) = self.executor.wait().await {
            self.state = Some(state);
        }

        if self.state.is_none() {
            log!("Game lost with the failed search, starting a new one");
            match GameState::new(self.settings) {
                Ok(state) => self.state = Some(state),
                Err(e) => log!("Failed to start a new game: {}", e),
            }
        }
        self.state.as_ref()
    }

    pub fn cancel_computer_turn(&self) {
        self.executor.request_cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::SessionRng;
    use crate::games::clock::{FrozenClock, GatedClock};
    use crate::games::tictactoe::{GameStatus, Mark, Sign};

    #[derive(Clone)]
    struct FailingClock;

    impl Clock for FailingClock {
        fn now(&self) -> std::time::Duration {
            panic!("clock unavailable");
        }
    }

    fn settings(grid_size: usize, computer_first: bool) -> GameSettings {
        GameSettings::new(grid_size, false, computer_first).unwrap()
    }

    #[tokio::test]
    async fn test_computer_first_opens_in_center() {
        let executor = MoveExecutor::new(FrozenClock, SessionRng::new(1));
        let mut session = GameSession::new(settings(3, true), executor).unwrap();

        let rx = session.begin_computer_turn().unwrap();
        assert!(session.state().is_none());

        let computed = rx.await.unwrap();
        assert_eq!(computed.position, Position::new(1, 1));
        assert_eq!(computed.sign, Sign::X);

        let state = session.finish_computer_turn().await.unwrap();
        assert_eq!(state.status(), GameStatus::HumanToMove);
        assert_eq!(state.board().at(1, 1), Mark::Computer);
    }

    #[tokio::test]
    async fn test_turns_alternate_through_session() {
        let executor = MoveExecutor::new(FrozenClock, SessionRng::new(2));
        let mut session = GameSession::new(settings(3, false), executor).unwrap();

        assert!(session.begin_computer_turn().is_none());
        assert_eq!(session.human_move(Position::new(1, 1)), Ok(Outcome::InProgress));
        assert_eq!(
            session.human_move(Position::new(0, 0)),
            Err(GameError::NotYourTurn(Player::Human))
        );

        let rx = session.begin_computer_turn().unwrap();
        assert_eq!(
            session.human_move(Position::new(0, 0)),
            Err(GameError::NotYourTurn(Player::Human))
        );
        let computed = rx.await.unwrap();
        let state = session.finish_computer_turn().await.unwrap();
        assert_eq!(state.move_count(), 2);
        assert_ne!(computed.position, Position::new(1, 1));
    }

    #[tokio::test]
    async fn test_new_game_cancels_search_in_flight() {
        let (clock, release) = GatedClock::new();
        let executor = MoveExecutor::new(clock, SessionRng::new(3));
        let mut session = GameSession::new(settings(3, false), executor).unwrap();
        session.human_move(Position::new(0, 0)).unwrap();

        let rx = session.begin_computer_turn().unwrap();
        release.send(()).unwrap();
        session.new_game(settings(5, true)).await.unwrap();

        let state = session.state().unwrap();
        assert_eq!(state.grid_size(), 5);
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.current_mover(), Some(Player::Computer));
        assert!(matches!(
            session.executor_status(),
            ExecutorStatus::Cancelled | ExecutorStatus::Completed
        ));
        drop(rx);
    }

    #[tokio::test]
    async fn test_new_game_rejects_invalid_settings() {
        let executor = MoveExecutor::new(FrozenClock, SessionRng::new(4));
        let mut session = GameSession::new(settings(3, false), executor).unwrap();
        let invalid = GameSettings {
            grid_size: 8,
            easy_mode: false,
            computer_first: false,
        };
        assert_eq!(session.new_game(invalid).await, Err(GameError::InvalidGridSize(8)));
        assert_eq!(session.state().unwrap().grid_size(), 3);
    }

    #[tokio::test]
    async fn test_failed_search_restarts_game() {
        let executor = MoveExecutor::new(FailingClock, SessionRng::new(5));
        let mut session = GameSession::new(settings(4, false), executor).unwrap();
        session.human_move(Position::new(0, 0)).unwrap();

        let rx = session.begin_computer_turn().unwrap();
        assert!(rx.await.is_err());

        let state = session.finish_computer_turn().await.unwrap();
        assert_eq!(state.grid_size(), 4);
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.status(), GameStatus::HumanToMove);
        assert_eq!(session.executor_status(), ExecutorStatus::Cancelled);
    }
}
