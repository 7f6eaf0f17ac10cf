use tictactoe_common::games::tictactoe::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Place(Position),
    NewGame,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => return Ok(Command::Quit),
            "n" | "new" => return Ok(Command::NewGame),
            _ => {}
        }

        let parts: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .collect();

        let [row, col] = parts.as_slice() else {
            return Err(format!("Expected \"row col\", \"new\" or \"quit\", got \"{}\"", line));
        };

        let row = row
            .parse::<usize>()
            .map_err(|_| format!("Invalid row: {}", row))?;
        let col = col
            .parse::<usize>()
            .map_err(|_| format!("Invalid column: {}", col))?;

        Ok(Command::Place(Position::new(row, col)))
    }
}
