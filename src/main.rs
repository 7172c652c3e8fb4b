//! Cube Guessing Game
//!
//! Command-line front end for the cube guessing puzzle: play a game on the
//! terminal, reveal the answer for a seed, or check a saved state.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};

use cubedle::facelets::{format_grid, format_net, NUM_FACELETS};
use cubedle::persistence;
use cubedle::pieces::{self, NUM_PIECES};
use cubedle::session::GuessFeedback;
use cubedle::{project, CameraBasis, Direction, PuzzleSession, SessionConfig, Status};

/// Guess the hidden state of a 3x3x3 cube, one full guess at a time.
#[derive(Parser)]
#[command(name = "cubedle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a game on the terminal.
    Play {
        /// Puzzle seed; defaults to a practice seed from the current time.
        #[arg(long)]
        seed: Option<String>,
        /// Number of guesses allowed.
        #[arg(long, default_value_t = SessionConfig::default().max_attempts)]
        attempts: usize,
        /// Save file to resume from and write after every command.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print the answer for a seed.
    Reveal {
        #[arg(long)]
        seed: String,
    },
    /// Check a saved state file for shape and parity problems.
    Check { file: PathBuf },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Play {
            seed,
            attempts,
            save,
        } => run_play(seed, attempts, save.as_deref()),
        Command::Reveal { seed } => run_reveal(&seed),
        Command::Check { file } => run_check(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Seed for practice games: milliseconds since the epoch.
fn practice_seed() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    millis.to_string()
}

/// One line of player input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Set { slot: usize, piece: usize },
    Clear(usize),
    Rotate(usize),
    Select(usize),
    Move(Direction),
    Show,
    Check,
    Submit,
    Quit,
}

fn parse_piece(word: Option<&str>) -> Result<usize, String> {
    let word = word.ok_or("missing piece name")?;
    pieces::index_of(&word.to_ascii_uppercase()).ok_or_else(|| format!("unknown piece {word:?}"))
}

fn parse_input(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let input = match command {
        "set" => Input::Set {
            slot: parse_piece(words.next())?,
            piece: parse_piece(words.next())?,
        },
        "clear" => Input::Clear(parse_piece(words.next())?),
        "rotate" => Input::Rotate(parse_piece(words.next())?),
        "select" => Input::Select(parse_piece(words.next())?),
        "move" => Input::Move(match words.next() {
            Some("up") => Direction::Up,
            Some("down") => Direction::Down,
            Some("left") => Direction::Left,
            Some("right") => Direction::Right,
            other => return Err(format!("unknown direction {other:?}")),
        }),
        "show" => Input::Show,
        "check" => Input::Check,
        "submit" => Input::Submit,
        "quit" => Input::Quit,
        other => return Err(format!("unknown command {other:?}")),
    };
    Ok(input)
}

/// Summarizes a scored guess, with a net marking matching facelets.
fn describe_feedback(feedback: &GuessFeedback) -> String {
    let matches = &feedback.comparison.matches;
    let net = format_grid(|facelet| if matches[facelet] { '#' } else { '.' });
    format!(
        "{net}{}/{NUM_FACELETS} stickers, {}/{NUM_PIECES} pieces\n",
        feedback.stickers_correct, feedback.pieces_correct
    )
}

fn print_state(session: &PuzzleSession) {
    print!("{}", format_net(&session.guess_facelets()));
    let selected = session.selection().map_or("none", pieces::name);
    println!(
        "selected: {selected}, attempts left: {}",
        session.attempts_left()
    );
}

/// Runs an interactive game on stdin.
fn run_play(seed: Option<String>, attempts: usize, save: Option<&Path>) -> CliResult {
    let mut session = match save.filter(|path| path.exists()) {
        Some(path) => persistence::load(path)?,
        None => {
            let seed = seed.unwrap_or_else(practice_seed);
            let config = SessionConfig {
                max_attempts: attempts,
            };
            PuzzleSession::new(&seed, config)?
        }
    };
    // the CLI has no 3D view, so navigation assumes a camera facing F
    let camera = CameraBasis::front();

    println!("Puzzle {:?}. Type commands, or 'quit'.", session.seed());
    print_state(&session);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let outcome = match input {
            Input::Set { slot, piece } => session.assign(slot, piece),
            Input::Clear(slot) => session.erase(slot),
            Input::Rotate(slot) => session.rotate(slot),
            Input::Select(slot) => session.select(Some(slot)),
            Input::Move(direction) => {
                if session.navigate(direction, &camera).is_none() {
                    println!("no piece that way");
                }
                Ok(())
            }
            Input::Show => {
                print_state(&session);
                Ok(())
            }
            Input::Check => {
                println!("{:?}", session.guess_parity());
                Ok(())
            }
            Input::Submit => session.submit().map(|feedback| {
                print!("{}", describe_feedback(&feedback));
            }),
            Input::Quit => break,
        };
        if let Err(e) = outcome {
            println!("{e}");
        }

        if let Some(path) = save {
            persistence::save(path, &session)?;
        }

        match session.status() {
            Status::Playing => {}
            Status::Won => {
                println!("Solved in {} attempt(s)!", session.history().len());
                break;
            }
            Status::Lost => {
                println!("Out of attempts. The answer was:");
                if let Some(answer) = session.answer() {
                    print!("{}", format_net(&project(answer)));
                }
                break;
            }
        }
    }

    io::stdout().flush()?;
    Ok(())
}

/// Prints the answer for a seed.
fn run_reveal(seed: &str) -> CliResult {
    let answer = cubedle::generate(seed)?;
    print!("{}", format_net(&project(&answer)));
    Ok(())
}

/// Prints diagnostics for a saved state.
fn run_check(file: &Path) -> CliResult {
    let state = persistence::load_state(file)?;
    let report = state.parity_report();
    print!("{}", format_net(&project(&state)));
    match report.permutation {
        Some(parity) => println!("permutation parity: {parity}"),
        None => println!("permutation parity: incomplete"),
    }
    println!("edge parity: {}", report.edge);
    println!("corner twist: {}", report.corner_twist);
    match state.verify() {
        Ok(true) => println!("reachable"),
        Ok(false) => println!("unreachable"),
        Err(e) => println!("{e}"),
    }
    Ok(())
}
