//! Play command - Interactive games in the terminal

use std::{
    io::{self, BufRead, BufReader, Stdin, Stdout, Write},
    path::PathBuf,
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::{
    Error,
    app::{AgentConfig, App, Difficulty},
    checkers::{Board, GameSession, PlayMode, TurnOutcome},
    ports::TurnPolicy,
    q_learning::QLearningAgent,
    types::{Action, Color, Square},
};

#[derive(Parser, Debug)]
#[command(about = "Play checkers against a trained agent, a friend, or watch two agents")]
pub struct PlayArgs {
    /// Who controls each side
    #[arg(long, short = 'm', value_enum, default_value_t = PlayMode::HumanVsAi)]
    pub mode: PlayMode,

    /// Exploration rate applied to loaded agents
    #[arg(long, short = 'd', value_enum, default_value_t = Difficulty::Medium)]
    pub difficulty: Difficulty,

    /// Red Q-table checkpoint
    #[arg(long, default_value = "q_red.msgpack")]
    pub red: PathBuf,

    /// Black Q-table checkpoint
    #[arg(long, default_value = "q_black.msgpack")]
    pub black: PathBuf,

    /// Side the human plays in human-vs-ai mode
    #[arg(long, default_value = "red")]
    pub human_color: Color,

    /// Random seed for the agents
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause between agent turns, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,
}

/// Reads moves typed as `sr,sc->dr,dc` and rejects anything outside the
/// legal action space.
///
/// One instance serves both colors, so two humans can share a terminal.
pub struct HumanPolicy<R, W> {
    input: R,
    output: W,
}

impl HumanPolicy<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanPolicy<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    fn write(&mut self, text: &str) -> crate::Result<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(|source| Error::Io {
                operation: "write to terminal".to_string(),
                source,
            })
    }

    /// Next trimmed line; `InputClosed` on end of input or `quit`.
    fn read_line(&mut self) -> crate::Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|source| Error::Io {
                operation: "read move".to_string(),
                source,
            })?;
        let line = line.trim().to_string();
        if read == 0 || line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
            return Err(Error::InputClosed);
        }
        Ok(line)
    }

    fn prompt_for(&mut self, prompt: &str, allowed: &[Action]) -> crate::Result<Action> {
        loop {
            self.write(prompt)?;
            let line = self.read_line()?;
            if line == "?" || line.eq_ignore_ascii_case("help") {
                self.write(&format!("Legal moves: {}\n", list(allowed)))?;
                continue;
            }
            match line.parse::<Action>() {
                Ok(action) if allowed.contains(&action) => return Ok(action),
                Ok(action) => {
                    self.write(&format!(
                        "{action} is not legal here. Legal moves: {}\n",
                        list(allowed)
                    ))?;
                }
                Err(err) => self.write(&format!("{err}\n"))?,
            }
        }
    }

    /// Yes/no question; anything but `y`/`yes` is no.
    pub fn confirm(&mut self, question: &str) -> crate::Result<bool> {
        self.write(question)?;
        match self.read_line() {
            Ok(answer) => Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")),
            Err(Error::InputClosed) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

fn list(actions: &[Action]) -> String {
    actions
        .iter()
        .map(Action::to_string)
        .collect::<Vec<_>>()
        .join("  ")
}

impl<R: BufRead, W: Write> TurnPolicy for HumanPolicy<R, W> {
    fn select_action(&mut self, board: &Board, color: Color) -> crate::Result<Action> {
        let allowed = board.legal_actions(color);
        if board.has_capture(color) {
            self.write("You must capture.\n")?;
        }
        self.prompt_for(&format!("{color} to move (sr,sc->dr,dc, ? for help): "), &allowed)
    }

    fn select_continuation(
        &mut self,
        board: &Board,
        piece: Square,
    ) -> crate::Result<Option<Action>> {
        let allowed: Vec<Action> = board
            .capture_moves(piece)
            .iter()
            .map(|mv| mv.action())
            .collect();
        if allowed.is_empty() {
            return Ok(None);
        }
        self.write(&format!("{board}\n"))?;
        self.prompt_for(&format!("Continue jumping from {piece}: "), &allowed)
            .map(Some)
    }

    fn name(&self) -> &str {
        "human"
    }
}

/// Who sits at each side of the board.
pub struct Seats<R, W> {
    pub mode: PlayMode,
    pub human_color: Color,
    pub human: HumanPolicy<R, W>,
    pub red: Option<QLearningAgent>,
    pub black: Option<QLearningAgent>,
    pub delay: Duration,
}

impl<R: BufRead, W: Write> Seats<R, W> {
    fn is_human(&self, color: Color) -> bool {
        self.mode.is_human(color, self.human_color)
    }

    fn policy(&mut self, color: Color) -> crate::Result<&mut dyn TurnPolicy> {
        if self.is_human(color) {
            return Ok(&mut self.human);
        }
        let seat = match color {
            Color::Red => self.red.as_mut(),
            Color::Black => self.black.as_mut(),
        };
        match seat {
            Some(agent) => Ok(agent),
            None => Err(Error::InvalidConfiguration {
                message: format!("no agent seated for {color}"),
            }),
        }
    }
}

fn describe(outcome: &TurnOutcome) -> String {
    let moves = outcome
        .actions()
        .iter()
        .map(Action::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    match outcome.captured_count() {
        0 => format!("{} plays {moves}\n", outcome.color()),
        n => format!("{} plays {moves}, capturing {n}\n", outcome.color()),
    }
}

/// Play one game to the end.
///
/// Returns the winner, or `None` when a human quit.
pub fn play_game<R: BufRead, W: Write>(
    session: &mut GameSession,
    seats: &mut Seats<R, W>,
) -> crate::Result<Option<Color>> {
    while !session.is_over() {
        let color = session.to_move();
        seats.human.write(&format!("\n{}\n", session.board()))?;

        let human = seats.is_human(color);
        if !human && !seats.delay.is_zero() {
            thread::sleep(seats.delay);
        }

        let policy = seats.policy(color)?;
        let outcome = match session.play_turn(policy) {
            Ok(outcome) => outcome.clone(),
            Err(Error::InputClosed) => return Ok(None),
            Err(err) => return Err(err),
        };
        debug!(%color, actions = outcome.steps(), "turn complete");
        seats.human.write(&describe(&outcome))?;
    }

    seats.human.write(&format!("\n{}\n", session.board()))?;
    if let Some(winner) = session.winner() {
        seats.human.write(&format!("{winner} wins!\n"))?;
    }
    seats.human.write(&game_summary(session))?;
    Ok(session.winner())
}

fn game_summary(session: &GameSession) -> String {
    let captures = |color: Color| -> usize {
        session
            .history()
            .iter()
            .filter(|outcome| outcome.color() == color)
            .map(TurnOutcome::captured_count)
            .sum()
    };
    format!(
        "{} turns; red captured {}, black captured {}\n",
        session.turns_played(),
        captures(Color::Red),
        captures(Color::Black)
    )
}

fn load_seat(app: &App, color: Color, args: &PlayArgs) -> Result<Option<QLearningAgent>> {
    if args.mode.is_human(color, args.human_color) {
        return Ok(None);
    }
    let path = match color {
        Color::Red => &args.red,
        Color::Black => &args.black,
    };
    let mut config = AgentConfig::default();
    if let Some(seed) = args.seed {
        config = config.with_seed(match color {
            Color::Red => seed,
            Color::Black => seed.wrapping_add(1),
        });
    }
    let mut agent = app
        .load_or_fresh(color, config, path)
        .with_context(|| format!("failed to prepare {color} agent"))?;
    agent.set_epsilon(args.difficulty.epsilon());
    Ok(Some(agent))
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let app = App::new();

    let mut seats = Seats {
        mode: args.mode,
        human_color: args.human_color,
        human: HumanPolicy::stdio(),
        red: load_seat(&app, Color::Red, &args)?,
        black: load_seat(&app, Color::Black, &args)?,
        delay: Duration::from_millis(args.delay_ms),
    };

    let mut session = GameSession::new();
    loop {
        let winner = play_game(&mut session, &mut seats)?;
        if winner.is_none() || args.mode == PlayMode::AiVsAi {
            break;
        }
        if !seats.human.confirm("Play again? [y/N] ")? {
            break;
        }
        session.restart();
    }

    Ok(())
}
