use chessduel::chess_errors::*;
use chessduel::game::*;
use chessduel::game_state::*;
use chessduel::positions::Position;
use std::io::{stdout, Write};
use std::str::FromStr;
use text_io::try_read;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Commands:
  e2        click a square (select a piece, or move the selected piece there)
  e2e4      move in one go
  u, undo   take back the last move (and the reply to it)
  a, ai     toggle the automated opponent
  +, -      change the search depth of the automated opponent
  h, help   show this text
  q, quit   leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Click(Position),
    Move(Position, Position),
    Undo,
    ToggleOpponent,
    Deeper,
    Shallower,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let unknown = || ChessError::UnknownCommand(s.trim().to_string());
        let cmd = match input.as_str() {
            "u" | "undo" => Command::Undo,
            "a" | "ai" => Command::ToggleOpponent,
            "+" => Command::Deeper,
            "-" => Command::Shallower,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            sq if sq.len() == 2 => Command::Click(sq.parse().map_err(|_| unknown())?),
            mv if mv.len() == 4 && mv.is_ascii() => Command::Move(
                mv[..2].parse().map_err(|_| unknown())?,
                mv[2..].parse().map_err(|_| unknown())?,
            ),
            _ => return Err(unknown()),
        };
        Ok(cmd)
    }
}

fn print_report(report: &SearchReport) {
    match report.result.best_move {
        Some(mv) if report.applied => println!(
            "{} plays {} (score {}, depth {}, {} nodes, {:.2?})",
            report.color,
            mv,
            report.result.score,
            report.depth,
            report.result.nodes,
            report.elapsed
        ),
        Some(mv) => println!("{} found {} but it was not played", report.color, mv),
        None => println!("{} has no move", report.color),
    }
}

fn settle(game: &mut Game) {
    while game.search_in_progress() {
        println!("Thinking...");
        if let Some(report) = game.wait_for_search() {
            print_report(&report);
        }
    }
}

fn print_settings(state: &GameState) {
    let ai = if state.automated_opponent_enabled() { "on" } else { "off" };
    println!(
        "Automated opponent: {} (plays {}, depth {})",
        ai,
        state.opponent(),
        state.search_depth()
    );
}

/// Returns false once the session should end.
fn execute(game: &mut Game, cmd: Command) -> bool {
    match cmd {
        Command::Click(pos) => match game.click(pos) {
            ClickOutcome::Selected => {
                let targets: Vec<String> = game
                    .state()
                    .legal_destinations()
                    .iter()
                    .map(|p| p.to_string())
                    .collect();
                println!("Selected {}: {}", pos, targets.join(" "));
            }
            ClickOutcome::Moved(record) => println!("Played {}", record),
            ClickOutcome::Deselected => println!("Selection cleared"),
            ClickOutcome::Ignored => println!("Nothing to select on {}", pos),
            ClickOutcome::Busy => println!("Still thinking"),
        },
        Command::Move(from, to) => {
            game.clear_selection();
            let played = match game.click(from) {
                ClickOutcome::Selected => game.click(to),
                other => other,
            };
            match played {
                ClickOutcome::Moved(record) => println!("Played {}", record),
                ClickOutcome::Busy => println!("Still thinking"),
                _ => println!("{}{} is not a legal move", from, to),
            }
        }
        Command::Undo => match game.undo() {
            0 => println!("Nothing to undo"),
            n => println!("Took back {} move(s)", n),
        },
        Command::ToggleOpponent => {
            game.toggle_automated_opponent();
            print_settings(game.state());
        }
        Command::Deeper => {
            game.increase_depth();
            print_settings(game.state());
        }
        Command::Shallower => {
            game.decrease_depth();
            print_settings(game.state());
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    debug!("Starting with {:?}", config);

    let mut game = Game::new(config);
    println!("{}", HELP);
    print_settings(game.state());
    settle(&mut game);

    loop {
        println!("\n{}", game.state());
        if game.state().is_over() {
            println!("Game over. Undo or quit.");
        }
        print!("> ");
        let _ = stdout().flush();

        let line: String = match try_read!("{}\n") {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(cmd) => {
                if !execute(&mut game, cmd) {
                    break;
                }
            }
            Err(e) => println!("{}. Type h for help.", e),
        }
        settle(&mut game);
    }
}
