mod command;
mod render;

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use command::Command;
use render::{render_board, status_text};
use tictactoe_common::config::{ConfigManager, FileContentConfigProvider, GameConfig, Validate};
use tictactoe_common::engine::{GameSession, MoveExecutor};
use tictactoe_common::games::tictactoe::{GameSettings, GameStatus, Player};
use tictactoe_common::games::{MonotonicClock, SessionRng};
use tictactoe_common::{log, logger};

#[derive(Parser)]
#[command(name = "tictactoe_console")]
struct Args {
    #[arg(long, default_value = "tictactoe.yaml")]
    config: PathBuf,
    #[arg(long)]
    grid_size: Option<usize>,
    #[arg(long)]
    easy: bool,
    #[arg(long)]
    computer_first: bool,
    #[arg(long)]
    time_per_turn_ms: Option<u64>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    save_config: bool,
    #[arg(long)]
    use_log_prefix: bool,
}

impl Args {
    fn apply_to(&self, config: &mut GameConfig) {
        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if self.easy {
            config.easy_mode = true;
        }
        if self.computer_first {
            config.computer_first = true;
        }
        if let Some(time_per_turn_ms) = self.time_per_turn_ms {
            config.time_per_turn_ms = time_per_turn_ms;
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = args.use_log_prefix.then(|| "Console".to_string());
    logger::init_logger(prefix);

    let config_manager: ConfigManager<FileContentConfigProvider, GameConfig> =
        ConfigManager::from_yaml_file(&args.config);
    let mut config = config_manager.get_config()?;
    args.apply_to(&mut config);
    config.validate()?;

    if args.save_config {
        config_manager.set_config(&config)?;
        log!("Config saved to {}", args.config.display());
    }

    let settings = GameSettings::try_from(&config)?;
    let rng = args.seed.map(SessionRng::new).unwrap_or_else(SessionRng::from_random);
    log!("Session seed {}", rng.seed());

    let executor = MoveExecutor::new(MonotonicClock::new(), rng)
        .with_time_per_turn(config.time_per_turn());
    let mut session = GameSession::new(settings, executor)?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(state) = session.state() else {
            break;
        };
        println!("{}", render_board(state));
        println!("{}", status_text(state.status()));

        let flow = match state.status() {
            GameStatus::ComputerToMove => computer_turn(&mut session, &mut input, settings).await?,
            GameStatus::HumanToMove => human_turn(&mut session, &mut input, settings).await?,
            GameStatus::HumanWon | GameStatus::ComputerWon | GameStatus::Draw => {
                println!("Type \"new\" for another game or \"quit\" to leave");
                game_over(&mut session, &mut input, settings).await?
            }
        };

        if let Flow::Quit = flow {
            break;
        }
    }

    session.cancel_computer_turn();
    Ok(())
}

async fn human_turn(
    session: &mut GameSession<MonotonicClock>,
    input: &mut Input,
    settings: GameSettings,
) -> std::io::Result<Flow> {
    let Some(line) = input.next_line().await? else {
        return Ok(Flow::Quit);
    };

    match Command::parse(&line) {
        Ok(Command::Place(pos)) => {
            if let Err(e) = session.human_move(pos) {
                println!("{}", e);
            }
        }
        Ok(Command::NewGame) => start_new_game(session, settings).await,
        Ok(Command::Quit) => return Ok(Flow::Quit),
        Err(e) => println!("{}", e),
    }
    Ok(Flow::Continue)
}

async fn computer_turn(
    session: &mut GameSession<MonotonicClock>,
    input: &mut Input,
    settings: GameSettings,
) -> std::io::Result<Flow> {
    let Some(mut computed) = session.begin_computer_turn() else {
        return Ok(Flow::Continue);
    };

    loop {
        tokio::select! {
            result = &mut computed => {
                if let Ok(computed) = result {
                    println!("Computer plays {} at {}", computed.sign, computed.position);
                }
                session.finish_computer_turn().await;
                return Ok(Flow::Continue);
            }
            line = input.next_line() => {
                match line?.as_deref().map(Command::parse) {
                    None | Some(Ok(Command::Quit)) => {
                        session.cancel_computer_turn();
                        return Ok(Flow::Quit);
                    }
                    Some(Ok(Command::NewGame)) => {
                        start_new_game(session, settings).await;
                        return Ok(Flow::Continue);
                    }
                    Some(_) => println!("{}", status_text(GameStatus::ComputerToMove)),
                }
            }
        }
    }
}

async fn game_over(
    session: &mut GameSession<MonotonicClock>,
    input: &mut Input,
    settings: GameSettings,
) -> std::io::Result<Flow> {
    let Some(line) = input.next_line().await? else {
        return Ok(Flow::Quit);
    };

    match Command::parse(&line) {
        Ok(Command::Quit) => return Ok(Flow::Quit),
        Ok(Command::NewGame) => start_new_game(session, settings).await,
        Ok(Command::Place(_)) | Err(_) => {
            if let Some(state) = session.state() {
                let result = match state.winner() {
                    Some(Player::Human) => "you won",
                    Some(Player::Computer) => "the computer won",
                    None => "it was a draw",
                };
                println!("The game is over, {}", result);
            }
        }
    }
    Ok(Flow::Continue)
}

async fn start_new_game(session: &mut GameSession<MonotonicClock>, settings: GameSettings) {
    if let Err(e) = session.new_game(settings).await {
        println!("{}", e);
    }
}
