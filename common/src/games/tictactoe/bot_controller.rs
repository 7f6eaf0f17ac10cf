use std::time::Duration;

use crate::games::SessionRng;
use crate::games::clock::Clock;
use crate::log;

use super::board::Board;
use super::game_state::GameState;
use super::types::{Mark, Outcome, Player, Position};
use super::win_detector::is_game_over;

pub type Score = i32;

/// Depth up to which a branch is never cut by the time budget.
pub const MIN_DEPTH: usize = 2;
pub const TIME_PER_TURN: Duration = Duration::from_millis(1000);

pub const WIN_BASE: Score = 1000;
pub const LOSE_BASE: Score = -1000;
pub const DRAW: Score = 0;
/// Branch abandoned under time pressure, true value unknown. No terminal
/// score can equal it: those are 0 or at least 1000 - depth in magnitude.
pub const INEXACT: Score = -1;

const OPEN_MIN: Score = -10_000;
const OPEN_MAX: Score = 10_000;

pub struct SearchEngine<C: Clock> {
    clock: C,
    rng: SessionRng,
    time_per_turn: Duration,
}

impl<C: Clock> SearchEngine<C> {
    pub fn new(clock: C, rng: SessionRng) -> Self {
        Self {
            clock,
            rng,
            time_per_turn: TIME_PER_TURN,
        }
    }

    pub fn with_time_per_turn(mut self, time_per_turn: Duration) -> Self {
        self.time_per_turn = time_per_turn;
        self
    }

    /// Picks the computer's move. Returns `None` when it is not the
    /// computer's turn. `state` is only modified speculatively and is
    /// identical to its input on return.
    pub fn choose_computer_move(&mut self, state: &mut GameState) -> Option<Position> {
        if state.current_mover() != Some(Player::Computer) {
            return None;
        }

        if state.move_count() == 0 {
            return Some(state.board().center());
        }

        if state.settings().easy_mode {
            return self.random_move(state.board());
        }

        self.minimax_move(state)
    }

    fn random_move(&mut self, board: &Board) -> Option<Position> {
        let available = board.available_moves();
        if available.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..available.len());
        Some(available[idx])
    }

    fn minimax_move(&mut self, state: &mut GameState) -> Option<Position> {
        let available = state.board().available_moves();
        if available.is_empty() {
            return None;
        }

        let search_started = self.clock.now();
        let budget = self.time_per_turn / available.len() as u32;
        let mut search = Search {
            base_moves: state.move_count(),
            board: state.board_mut(),
            clock: &self.clock,
            budget,
            started: Duration::ZERO,
        };

        let mut best_score = OPEN_MIN;
        let mut best_move = None;
        let mut inexact_moves = Vec::new();

        for &pos in &available {
            search.board.set(pos, Mark::Computer);
            search.started = self.clock.now();
            let score = search.score(pos, 1, Player::Human);
            search.board.set(pos, Mark::Empty);

            if score > best_score || best_move.is_none() {
                best_score = score;
                best_move = Some(pos);
            }

            if score == INEXACT {
                inexact_moves.push(pos);
            }
        }

        debug_assert!(best_score.abs() <= WIN_BASE);

        if best_score == INEXACT {
            let idx = self.rng.random_range(0..inexact_moves.len());
            best_move = Some(inexact_moves[idx]);
            log!(
                "Search undetermined for {} of {} moves, picked {} at random",
                inexact_moves.len(),
                available.len(),
                inexact_moves[idx]
            );
        }

        if let Some(pos) = best_move {
            let elapsed = self.clock.now().saturating_sub(search_started);
            log!(
                "Search picked {} with score {} in {} ms",
                pos,
                best_score,
                elapsed.as_millis()
            );
        }

        best_move
    }
}

struct Search<'a, C: Clock> {
    board: &'a mut Board,
    base_moves: usize,
    clock: &'a C,
    budget: Duration,
    started: Duration,
}

impl<C: Clock> Search<'_, C> {
    /// Scores the position after `last`, with `mover` to play next.
    /// Computer maximizes, human minimizes.
    fn score(&mut self, last: Position, depth: usize, mover: Player) -> Score {
        if depth > MIN_DEPTH && self.clock.now().saturating_sub(self.started) > self.budget {
            return INEXACT;
        }

        match is_game_over(self.board, last, self.base_moves + depth) {
            Outcome::Won(Player::Computer) => return WIN_BASE - depth as Score,
            Outcome::Won(Player::Human) => return LOSE_BASE + depth as Score,
            Outcome::Draw => return DRAW,
            Outcome::InProgress => {}
        }

        let maximizing = mover == Player::Computer;
        let mut best = if maximizing { OPEN_MIN } else { OPEN_MAX };

        for pos in self.board.available_moves() {
            self.board.set(pos, mover.mark());
            let score = self.score(pos, depth + 1, mover.opponent());
            self.board.set(pos, Mark::Empty);

            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::games::clock::{FrozenClock, SteppingClock};
    use crate::games::tictactoe::GameSettings;

    fn settings(grid_size: usize, easy_mode: bool, computer_first: bool) -> GameSettings {
        GameSettings::new(grid_size, easy_mode, computer_first).unwrap()
    }

    fn position(rows: &[&str]) -> GameState {
        let board = Board::from_rows(rows);
        GameState::from_board(board.clone(), settings(board.size(), false, false), Player::Computer)
    }

    fn exhaustive_engine() -> SearchEngine<FrozenClock> {
        SearchEngine::new(FrozenClock, SessionRng::new(1))
    }

    fn hurried_engine(seed: u64) -> SearchEngine<SteppingClock> {
        SearchEngine::new(SteppingClock::new(Duration::from_secs(1)), SessionRng::new(seed))
    }

    #[test]
    fn test_opening_takes_center() {
        let mut state = GameState::new(settings(3, false, true)).unwrap();
        assert_eq!(exhaustive_engine().choose_computer_move(&mut state), Some(Position::new(1, 1)));

        let mut state = GameState::new(settings(4, true, true)).unwrap();
        assert_eq!(exhaustive_engine().choose_computer_move(&mut state), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_opening_does_not_read_the_clock() {
        let clock = SteppingClock::new(Duration::from_millis(1));
        let mut engine = SearchEngine::new(clock.clone(), SessionRng::new(3));
        let mut state = GameState::new(settings(7, false, true)).unwrap();
        assert_eq!(engine.choose_computer_move(&mut state), Some(Position::new(3, 3)));
        assert_eq!(clock.reads(), 0);
    }

    #[test]
    fn test_refuses_when_not_computer_turn() {
        let mut state = GameState::new(settings(3, false, false)).unwrap();
        assert_eq!(exhaustive_engine().choose_computer_move(&mut state), None);
    }

    #[test]
    fn test_easy_mode_picks_empty_cells_at_random() {
        let mut seen = HashSet::new();
        for seed in 0..40 {
            let mut state = GameState::new(settings(3, true, false)).unwrap();
            state.apply_move(Position::new(1, 1), Player::Human).unwrap();
            let before = state.clone();

            let mut engine = SearchEngine::new(FrozenClock, SessionRng::new(seed));
            let pos = engine.choose_computer_move(&mut state).unwrap();
            assert_ne!(pos, Position::new(1, 1));
            assert!(state.board().is_empty_at(pos));
            assert_eq!(state, before);
            seen.insert(pos);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_takes_immediate_win() {
        let mut state = position(&["C C .", "H H .", ". . ."]);
        assert_eq!(exhaustive_engine().choose_computer_move(&mut state), Some(Position::new(0, 2)));
    }

    #[test]
    fn test_blocks_immediate_loss() {
        let mut state = position(&["H H .", "C . .", ". . ."]);
        assert_eq!(exhaustive_engine().choose_computer_move(&mut state), Some(Position::new(0, 2)));
    }

    #[test]
    fn test_prefers_faster_win() {
        // (2, 2) wins at once; (0, 2) also forces a win but one move later.
        let mut state = position(&["C . .", "H C .", "H . ."]);
        assert_eq!(exhaustive_engine().choose_computer_move(&mut state), Some(Position::new(2, 2)));
    }

    #[test]
    fn test_search_leaves_state_unchanged() {
        let positions = [
            position(&["C . .", ". H .", ". . ."]),
            position(&["H . .", ". . .", ". . ."]),
            position(&["C H C", ". H .", ". . ."]),
        ];
        for mut state in positions {
            let before = state.clone();
            exhaustive_engine().choose_computer_move(&mut state);
            assert_eq!(state, before);
        }

        let mut state = position(&["H . . . .", ". C . . .", ". . . . .", ". . . H .", ". . . . ."]);
        let before = state.clone();
        hurried_engine(5).choose_computer_move(&mut state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_time_pressure_breaks_ties_at_random() {
        let mut seen = HashSet::new();
        for seed in 0..20 {
            let mut state = position(&["H . . . .", ". . . . .", ". . . . .", ". . . . .", ". . . . ."]);
            let pos = hurried_engine(seed).choose_computer_move(&mut state).unwrap();
            assert!(state.board().is_empty_at(pos));
            seen.insert(pos);
        }
        assert!(seen.len() > 1, "sentinel tiebreak always returned {seen:?}");
    }

    #[test]
    fn test_exact_win_beats_sentinel() {
        let mut state = position(&[
            "C C C C .",
            ". . . . .",
            "H H . . .",
            ". . . H .",
            "H . . . .",
        ]);
        assert_eq!(hurried_engine(11).choose_computer_move(&mut state), Some(Position::new(0, 4)));
    }

    #[test]
    fn test_moves_always_target_empty_cells() {
        let mut rng = SessionRng::new(21);
        for size in 3..=6 {
            for round in 0..4 {
                let mut state = GameState::new(settings(size, false, false)).unwrap();
                let human_moves = 1 + round;
                let mut engine = hurried_engine(round as u64);
                for _ in 0..human_moves {
                    if state.is_over() {
                        break;
                    }
                    let available = state.board().available_moves();
                    let pos = available[rng.random_range(0..available.len())];
                    state.apply_move(pos, Player::Human).unwrap();
                    if state.is_over() {
                        break;
                    }
                    let reply = engine.choose_computer_move(&mut state).unwrap();
                    assert!(state.board().contains(reply));
                    assert!(state.board().is_empty_at(reply));
                    state.apply_move(reply, Player::Computer).unwrap();
                }
            }
        }
    }

    fn play_out_every_human_line(
        state: &GameState,
        engine: &mut SearchEngine<FrozenClock>,
        finished: &mut Vec<Option<Player>>,
    ) {
        match state.current_mover() {
            None => finished.push(state.winner()),
            Some(Player::Computer) => {
                let mut next = state.clone();
                let pos = engine.choose_computer_move(&mut next).unwrap();
                next.apply_move(pos, Player::Computer).unwrap();
                play_out_every_human_line(&next, engine, finished);
            }
            Some(Player::Human) => {
                for pos in state.board().available_moves() {
                    let mut next = state.clone();
                    next.apply_move(pos, Player::Human).unwrap();
                    play_out_every_human_line(&next, engine, finished);
                }
            }
        }
    }

    #[test]
    fn test_never_loses_on_3x3_when_human_starts() {
        let state = GameState::new(settings(3, false, false)).unwrap();
        let mut finished = Vec::new();
        play_out_every_human_line(&state, &mut exhaustive_engine(), &mut finished);
        assert!(!finished.is_empty());
        assert!(finished.iter().all(|winner| *winner != Some(Player::Human)));
    }

    #[test]
    fn test_never_loses_on_3x3_when_computer_starts() {
        let state = GameState::new(settings(3, false, true)).unwrap();
        let mut finished = Vec::new();
        play_out_every_human_line(&state, &mut exhaustive_engine(), &mut finished);
        assert!(!finished.is_empty());
        assert!(finished.iter().all(|winner| *winner != Some(Player::Human)));
    }

    #[test]
    fn test_punishes_edge_reply_to_center_opening() {
        let mut state = GameState::new(settings(3, false, true)).unwrap();
        state.apply_move(Position::new(1, 1), Player::Computer).unwrap();
        state.apply_move(Position::new(0, 1), Player::Human).unwrap();

        let mut finished = Vec::new();
        play_out_every_human_line(&state, &mut exhaustive_engine(), &mut finished);
        assert!(finished.iter().all(|winner| *winner == Some(Player::Computer)));
    }
}
