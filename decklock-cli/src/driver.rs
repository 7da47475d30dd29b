//! Command loop driving one [`GameSession`] from a line-oriented script.
use colored::Colorize;
use decklock_game::{Ending, GameSession, Notice, Severity, format_clock};
use serde::Serialize;

/// One parsed player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Take(String),
    Open(String),
    Flip,
    Close,
    Code(String),
    Wait(u32),
    Hints,
    Cards,
    Note(String),
    Status,
    Quit,
}

/// Parse a script line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Option<Result<Command, String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let needs_arg = |cmd: fn(String) -> Command| {
        if rest.is_empty() {
            Err(format!("`{verb}` needs an argument"))
        } else {
            Ok(cmd(rest.to_string()))
        }
    };

    Some(match verb {
        "take" => needs_arg(Command::Take),
        "open" => needs_arg(Command::Open),
        "flip" => Ok(Command::Flip),
        "close" => Ok(Command::Close),
        "code" => needs_arg(Command::Code),
        "wait" => rest
            .parse()
            .map(Command::Wait)
            .map_err(|_| format!("`wait` needs a number of seconds, got `{rest}`")),
        "hints" => Ok(Command::Hints),
        "cards" => Ok(Command::Cards),
        "note" => Ok(Command::Note(rest.to_string())),
        "status" => Ok(Command::Status),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command `{other}`")),
    })
}

/// Final snapshot of a driven run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub commands: usize,
    pub remaining_seconds: u32,
    pub owned: Vec<String>,
    pub completed: Vec<String>,
    pub revealed: Vec<String>,
    pub ending: Option<Ending>,
    /// Free-text scratchpad; never interpreted by the engine.
    pub notes: String,
}

/// Drives a session and accumulates the run report.
pub struct Driver {
    session: GameSession,
    /// Card shown in the zoom view, mirrored here so `flip`/`code` need no
    /// argument.
    open_id: Option<String>,
    notes: String,
    commands: usize,
    announced_victory: bool,
}

impl Driver {
    #[must_use]
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            open_id: None,
            notes: String::new(),
            commands: 0,
            announced_victory: false,
        }
    }

    /// Whether the loop should keep reading commands.
    #[must_use]
    pub fn running(&self) -> bool {
        self.session.ending() != Some(Ending::TimeUp)
    }

    /// Apply one command. Returns false when the loop should stop.
    pub fn apply(&mut self, command: Command) -> bool {
        self.commands += 1;
        match command {
            Command::Take(input) => {
                let notice = self.session.take_card(&input).notice();
                print_notice(&notice);
            }
            Command::Open(id) => match self.session.open_card(&id) {
                Some(view) => {
                    self.open_id = Some(view.id.clone());
                    println!("  [{}] {} ({})", view.id, view.name, face_word(view.face_up));
                }
                None => {
                    print_notice(&Notice::new(
                        Severity::Info,
                        format!("Card {id} is not on the desk."),
                    ));
                }
            },
            Command::Close => {
                self.session.close_card();
                self.open_id = None;
            }
            Command::Flip => match self.open_id.clone() {
                Some(id) => {
                    if let Some(view) = self.session.flip_card(&id) {
                        println!("  [{}] {} ({})", view.id, view.name, face_word(view.face_up));
                        if let Some(text) = &view.text {
                            println!("  {text}");
                        }
                        if let Some(prompt) = &view.prompt {
                            println!("  {} {prompt}", "prompt:".bold());
                        }
                    }
                }
                None => log::warn!("flip with no open card"),
            },
            Command::Code(code) => match self.open_id.clone() {
                Some(id) => {
                    let notice = self.session.submit_code(&id, &code).notice();
                    print_notice(&notice);
                    if self.session.is_completed(&id) {
                        self.open_id = None;
                    }
                }
                None => log::warn!("code with no open card"),
            },
            Command::Wait(seconds) => {
                for _ in 0..seconds {
                    self.session.tick();
                    if !self.running() {
                        break;
                    }
                }
                log::debug!(
                    "waited; clock now {}",
                    format_clock(self.session.remaining_seconds())
                );
            }
            Command::Hints => {
                let mut any = false;
                for id in self.session.state().unlocked_hint_ids() {
                    if let Some(hint) = self.session.hint_for(id) {
                        println!("  [{id}] {hint}");
                        any = true;
                    }
                }
                if !any {
                    println!("  No hints yet.");
                }
            }
            Command::Cards => {
                for id in self.session.owned_ids() {
                    let mut marks = String::new();
                    if self.session.is_revealed(id) {
                        marks.push('*');
                    }
                    if self.session.is_completed(id) {
                        marks.push('x');
                    }
                    let name = self
                        .session
                        .catalog()
                        .lookup(id)
                        .map_or("?", |card| card.name.as_str());
                    println!("  [{id}{marks}] {name}");
                }
            }
            Command::Note(text) => {
                self.notes.push_str(&text);
                self.notes.push('\n');
            }
            Command::Status => {
                println!(
                    "  clock {}  owned {}  completed {}",
                    format_clock(self.session.remaining_seconds()).bold(),
                    self.session.owned_ids().len(),
                    self.session
                        .owned_ids()
                        .iter()
                        .filter(|id| self.session.is_completed(id))
                        .count(),
                );
            }
            Command::Quit => return false,
        }

        if self.session.ending() == Some(Ending::TimeUp) {
            println!("{}", "TIME'S UP.".red().bold());
            return false;
        }
        if self.session.ending() == Some(Ending::Victory) && !self.announced_victory {
            self.announced_victory = true;
            println!("{}", "You escaped!".green().bold());
        }
        true
    }

    /// Snapshot the run for reporting.
    #[must_use]
    pub fn report(&self) -> RunReport {
        let owned: Vec<String> = self.session.owned_ids().to_vec();
        let completed = owned
            .iter()
            .filter(|id| self.session.is_completed(id))
            .cloned()
            .collect();
        let revealed = owned
            .iter()
            .filter(|id| self.session.is_revealed(id))
            .cloned()
            .collect();
        RunReport {
            commands: self.commands,
            remaining_seconds: self.session.remaining_seconds(),
            owned,
            completed,
            revealed,
            ending: self.session.ending(),
            notes: self.notes.clone(),
        }
    }
}

const fn face_word(face_up: bool) -> &'static str {
    if face_up { "face up" } else { "face down" }
}

fn print_notice(notice: &Notice) {
    let line = match notice.severity {
        Severity::Success => notice.message.green(),
        Severity::Info => notice.message.cyan(),
        Severity::Warning => notice.message.yellow(),
        Severity::Error => notice.message.red(),
    };
    println!("{line}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use decklock_game::Catalog;
    use std::rc::Rc;

    #[test]
    fn parses_commands_and_comments() {
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("# note"), None);
        assert_eq!(
            parse_command("take 37"),
            Some(Ok(Command::Take("37".into())))
        );
        assert_eq!(parse_command("flip"), Some(Ok(Command::Flip)));
        assert_eq!(
            parse_command("code 555 886 633"),
            Some(Ok(Command::Code("555 886 633".into())))
        );
        assert_eq!(parse_command("wait 30"), Some(Ok(Command::Wait(30))));
        assert!(matches!(parse_command("take"), Some(Err(_))));
        assert!(matches!(parse_command("wibble"), Some(Err(_))));
    }

    #[test]
    fn scripted_run_reaches_victory() {
        let session = GameSession::new(Rc::new(Catalog::standard().unwrap()));
        let mut driver = Driver::new(session);
        let script = [
            "take 37", "open 37", "flip", "code 555886633", "take 13", "open 13", "flip",
            "code 0818", "take 56", "open 56", "flip", "code VERTU", "take 55", "open 55", "flip",
            "code 88179401",
        ];
        for line in script {
            let command = parse_command(line).unwrap().unwrap();
            assert!(driver.apply(command), "run ended early at `{line}`");
        }
        let report = driver.report();
        assert_eq!(report.ending, Some(Ending::Victory));
        assert!(report.owned.iter().any(|id| id == "22"));
        assert_eq!(report.remaining_seconds, 3_600);
    }

    #[test]
    fn run_stops_when_the_clock_empties() {
        let catalog = Catalog::from_json(
            r#"{
                "starting_seconds": 2,
                "cards": [{ "id": "1", "name": "Booklet", "kind": "info" }]
            }"#,
        )
        .unwrap();
        let mut driver = Driver::new(GameSession::new(Rc::new(catalog)));
        assert!(!driver.apply(Command::Wait(10)));
        let report = driver.report();
        assert_eq!(report.ending, Some(Ending::TimeUp));
        assert_eq!(report.remaining_seconds, 0);
    }
}
