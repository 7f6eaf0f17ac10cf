use tictactoe_common::games::tictactoe::{GameState, GameStatus, Position};

pub fn status_text(status: GameStatus) -> &'static str {
    match status {
        GameStatus::HumanToMove => "Your move, enter row and column",
        GameStatus::ComputerToMove => "CPU thinking..",
        GameStatus::HumanWon => "You won! Congratulations!",
        GameStatus::ComputerWon => "You lost! Better luck next time!",
        GameStatus::Draw => "It is a draw!",
    }
}

pub fn render_board(state: &GameState) -> String {
    let size = state.grid_size();
    let mut out = String::from("  ");
    for col in 0..size {
        out.push_str(&format!(" {}", col));
    }
    out.push('\n');

    for row in 0..size {
        out.push_str(&format!("{} ", row));
        for col in 0..size {
            let cell = match state.sign_at(Position::new(row, col)) {
                Some(sign) => sign.to_string(),
                None => ".".to_string(),
            };
            out.push(' ');
            out.push_str(&cell);
        }
        out.push('\n');
    }

    if let Some(line) = state.winning_line() {
        out.push_str(&format!("Winning line: {} to {}\n", line.start, line.end));
    }

    out
}
