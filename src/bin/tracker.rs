//! Hand Tracker Binary
//!
//! Interactive REPL that drives one hand at a time through the engine and
//! prints each completed hand as JSON. Reads table stakes from the file named
//! by `TRACKER_CONFIG`, falling back to the defaults.

use clap::Parser;
use colored::Colorize;
use pokertrack::*;
use std::io::BufRead;
use std::io::Write;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
enum Command {
    #[command(
        about = "Start a hand, e.g. `new utg=100 sb=80 bb=120 --hero utg --hole AsKd`",
        alias = "n"
    )]
    New {
        #[arg(required = true, num_args = 2..)]
        players: Vec<String>,
        #[arg(long)]
        hero: String,
        #[arg(long)]
        hole: Option<String>,
    },
    #[command(about = "Apply an action, e.g. `act co raise 6`", alias = "a")]
    Act {
        #[arg(required = true)]
        position: String,
        #[arg(required = true, num_args = 1..=2)]
        action: Vec<String>,
    },
    #[command(about = "Open the next street with optional board cards", alias = "d")]
    Deal {
        #[arg(num_args = 0..)]
        cards: Vec<String>,
    },
    #[command(about = "Record showdown verdicts, e.g. `show co=won bb=lost`", alias = "s")]
    Show {
        #[arg(required = true, num_args = 1..)]
        verdicts: Vec<String>,
    },
    #[command(about = "List legal actions for a seat, default the next to act", alias = "l")]
    Legal { position: Option<String> },
    #[command(about = "Print the current hand", alias = "p")]
    Print,
    #[command(about = "Undo the last n events", alias = "u")]
    Undo {
        #[arg(default_value_t = 1)]
        n: usize,
    },
}

struct Tracker {
    config: Config,
    number: Number,
    history: Option<History>,
}

impl Tracker {
    fn new(config: Config) -> Self {
        Self {
            config,
            number: 0,
            history: None,
        }
    }

    fn run(&mut self) -> anyhow::Result<()> {
        log::info!("tracking hands at {}", self.config);
        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next() else { break };
            let line = line?;
            match line.trim() {
                "" => continue,
                "quit" | "exit" => break,
                input => match self.handle(input) {
                    Ok(()) => continue,
                    Err(e) => eprintln!("{}", e.to_string().red()),
                },
            }
        }
        Ok(())
    }

    fn handle(&mut self, input: &str) -> anyhow::Result<()> {
        match Command::try_parse_from(std::iter::once("> ").chain(input.split_whitespace()))? {
            Command::New {
                players,
                hero,
                hole,
            } => {
                let players = players
                    .iter()
                    .map(|p| seat(p))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                let hero = Position::try_from(hero.as_str()).map_err(anyhow::Error::msg)?;
                self.number += 1;
                let mut setup = Setup::new(self.number, self.config, players, hero);
                if let Some(hole) = hole {
                    let hole = Hole::try_from(hole.as_str()).map_err(anyhow::Error::msg)?;
                    setup = setup.with_hole(hole);
                }
                let history = History::new(setup)?;
                for entry in history.head().round().actions() {
                    println!("{}", paint(entry.position, &entry.action));
                }
                self.history = Some(history);
                self.prompt()
            }
            Command::Act { position, action } => {
                let position = Position::try_from(position.as_str()).map_err(anyhow::Error::msg)?;
                let action = action.join(" ");
                let action = Action::try_from(action.as_str()).map_err(anyhow::Error::msg)?;
                self.push(Event::Act {
                    position,
                    action,
                    timestamp: now(),
                })?;
                println!("{}", paint(position, &action));
                self.prompt()
            }
            Command::Deal { cards } => {
                let cards = Card::parse(&cards.concat()).map_err(anyhow::Error::msg)?;
                self.push(Event::Deal { cards })?;
                let hand = self.hand()?;
                println!("{}", format!("{} {}", hand.street(), board(hand)).white());
                self.prompt()
            }
            Command::Show { verdicts } => {
                let verdicts = verdicts
                    .iter()
                    .map(|v| verdict(v))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                self.push(Event::Resolve { verdicts })?;
                self.prompt()
            }
            Command::Legal { position } => {
                let hand = self.hand()?;
                let position = match position {
                    Some(p) => Position::try_from(p.as_str()).map_err(anyhow::Error::msg)?,
                    None => hand
                        .next_to_act()
                        .ok_or_else(|| anyhow::anyhow!("nobody is owed a decision"))?,
                };
                for action in hand.legal(position) {
                    println!("  {}", paint(position, &action));
                }
                Ok(())
            }
            Command::Print => {
                print!("{}", self.hand()?);
                Ok(())
            }
            Command::Undo { n } => {
                let history = self
                    .history
                    .as_mut()
                    .ok_or_else(|| anyhow::anyhow!("no hand in progress"))?;
                print!("{}", history.rewind(n)?);
                Ok(())
            }
        }
    }

    fn push(&mut self, event: Event) -> anyhow::Result<()> {
        let history = self
            .history
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("no hand in progress; start one with `new`"))?;
        history.push(event)?;
        Ok(())
    }

    fn hand(&self) -> anyhow::Result<&Hand> {
        self.history
            .as_ref()
            .map(|h| h.head())
            .ok_or_else(|| anyhow::anyhow!("no hand in progress"))
    }

    /// Tells the operator what the hand is waiting on, or emits the record.
    fn prompt(&mut self) -> anyhow::Result<()> {
        let hand = self.hand()?;
        match hand.turn() {
            Turn::Choice(position) => println!("{}", format!("{} to act", position).bold()),
            Turn::Chance(street) => println!("{}", format!("deal the {}", street).bold()),
            Turn::Showdown => println!("{}", "record verdicts with `show`".bold()),
            Turn::Terminal => {
                let stored = hand.record()?;
                for settlement in stored.settlements.iter() {
                    println!("{}", settlement);
                }
                println!("{}", stored.to_json()?);
                self.history = None;
            }
        }
        Ok(())
    }
}

/// Parses `POSITION=STACK`.
fn seat(s: &str) -> anyhow::Result<(Position, Chips)> {
    let (position, stack) = s
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected POSITION=STACK, got {}", s))?;
    let position = Position::try_from(position).map_err(anyhow::Error::msg)?;
    Ok((position, stack.parse::<Chips>()?))
}

/// Parses `POSITION=VERDICT`.
fn verdict(s: &str) -> anyhow::Result<(Position, Verdict)> {
    let (position, verdict) = s
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected POSITION=VERDICT, got {}", s))?;
    let position = Position::try_from(position).map_err(anyhow::Error::msg)?;
    let verdict = Verdict::try_from(verdict).map_err(anyhow::Error::msg)?;
    Ok((position, verdict))
}

fn board(hand: &Hand) -> String {
    hand.board()
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn paint(position: Position, action: &Action) -> String {
    let text = action.to_string();
    let text = match action {
        Action::Fold => text.red(),
        Action::Check => text.cyan(),
        Action::Call(_) => text.yellow(),
        Action::Raise(_) => text.green(),
        Action::Shove(_) => text.magenta(),
        Action::Blind(_) | Action::Ante(_) => text.white(),
    };
    format!("{:<4} {}", position, text)
}

fn main() -> anyhow::Result<()> {
    pokertrack::log()?;
    let config = Config::from_env()?;
    Tracker::new(config).run()
}
