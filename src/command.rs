//! Text commands typed on the command line

use crate::controller::{Controller, RunState};
use crate::error::LifeError;
use crate::pattern::{PatternFormat, PatternStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const MSG_STARTED: &str = "Started animation.";
pub const MSG_PAUSED: &str = "Paused animation.";
pub const MSG_STEPPING: &str = "Moving forward one generation.";
pub const MSG_NO_TEMPLATE: &str = "No template specified. Usage: set [template name]";

/// A parsed command line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Step,
    /// Enter on an empty line
    Empty,
    Quit,
    Clear,
    Set(Option<String>),
    Templates,
    Unknown(String),
}

impl Command {
    /// Parse a line. Surrounding whitespace and `/` are ignored; only the
    /// first word selects the command.
    pub fn parse(line: &str) -> Self {
        let line = line.trim().trim_matches('/');
        let mut words = line.split_whitespace();

        match words.next() {
            None => Command::Empty,
            Some("play") => Command::Play,
            Some("pause") => Command::Pause,
            Some("step") => Command::Step,
            Some("quit") => Command::Quit,
            Some("clear") | Some("reset") => Command::Clear,
            Some("set") => Command::Set(words.next().map(str::to_string)),
            Some("templates") => Command::Templates,
            Some(other) => Command::Unknown(other.to_string()),
        }
    }
}

/// Result of running a command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Status text for the command line, possibly empty
    Message(String),
    /// The user asked to exit
    Quit,
}

impl Outcome {
    fn message(text: impl Into<String>) -> Self {
        Outcome::Message(text.into())
    }
}

/// Applies commands to a controller. Never draws anything itself.
pub struct CommandInterpreter {
    controller: Arc<Controller>,
    store: Arc<dyn PatternStore>,
    format: PatternFormat,
}

impl CommandInterpreter {
    pub fn new(controller: Arc<Controller>, store: Arc<dyn PatternStore>, format: PatternFormat) -> Self {
        Self {
            controller,
            store,
            format,
        }
    }

    /// Parse and run one completed line
    pub fn execute(&self, line: &str) -> Outcome {
        let line = line.trim().trim_matches('/');
        self.controller.record_command(line);

        let command = Command::parse(line);
        debug!(?command, "dispatching command");
        self.apply(command)
    }

    pub fn apply(&self, command: Command) -> Outcome {
        match command {
            Command::Play => match self.controller.play() {
                Ok(true) => Outcome::message(MSG_STARTED),
                Ok(false) => Outcome::message(""),
                Err(e) => rejected(e),
            },
            Command::Pause => {
                self.controller.pause();
                Outcome::message(MSG_PAUSED)
            }
            Command::Empty if self.controller.run_state() == RunState::Animating => {
                Outcome::message("")
            }
            Command::Step | Command::Empty => match self.controller.request_step() {
                Ok(()) => Outcome::message(MSG_STEPPING),
                Err(e) => rejected(e),
            },
            Command::Quit => {
                info!("quit requested");
                Outcome::Quit
            }
            Command::Clear => match self.controller.reset() {
                Ok(()) => Outcome::message(""),
                Err(e) => rejected(e),
            },
            Command::Set(None) => Outcome::message(MSG_NO_TEMPLATE),
            Command::Set(Some(name)) => self.set_template(&name),
            Command::Templates => match self.store.names() {
                Ok(names) => Outcome::Message(names.join(", ")),
                Err(e) => rejected(e),
            },
            Command::Unknown(word) => {
                debug!(%word, "ignoring unknown command");
                Outcome::message("")
            }
        }
    }

    fn set_template(&self, name: &str) -> Outcome {
        let requested = name.to_lowercase();

        let names = match self.store.names() {
            Ok(names) => names,
            Err(e) => return rejected(e),
        };
        let Some(found) = names.iter().find(|n| n.to_lowercase() == requested) else {
            return rejected(LifeError::UnknownPattern(requested));
        };

        let loaded = self
            .store
            .load(found)
            .and_then(|text| self.controller.load_pattern(&text, &self.format));

        match loaded {
            Ok(()) => {
                info!(template = %found, "template loaded");
                Outcome::Message(format!("Template {} set.", requested))
            }
            Err(e) => rejected(e),
        }
    }
}

/// User-facing failures end up on the command line, never as a crash
fn rejected(error: LifeError) -> Outcome {
    warn!(%error, "command failed");
    Outcome::Message(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayConfig, SimulationConfig};
    use crate::error::Result;
    use crate::grid::Grid;
    use crate::pattern::{BuiltinPatterns, DirPatterns};
    use std::collections::HashSet;

    /// Store with a fixed set of patterns
    struct FixedStore(Vec<(&'static str, &'static str)>);

    impl PatternStore for FixedStore {
        fn names(&self) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|(n, _)| n.to_string()).collect())
        }

        fn load(&self, name: &str) -> Result<String> {
            self.0
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, t)| t.to_string())
                .ok_or_else(|| LifeError::UnknownPattern(name.to_string()))
        }
    }

    fn interpreter_with(store: Arc<dyn PatternStore>) -> (CommandInterpreter, Arc<Controller>) {
        let grid = Grid::from_pattern("..O..\n...O.\n.OOO.", &PatternFormat::default()).unwrap();
        let config = SimulationConfig {
            width: 12,
            height: 12,
            ..SimulationConfig::default()
        };
        let controller = Arc::new(Controller::new(grid, &config, DisplayConfig::default()));
        let interpreter = CommandInterpreter::new(controller.clone(), store, PatternFormat::default());
        (interpreter, controller)
    }

    fn live(controller: &Controller) -> HashSet<(isize, isize)> {
        controller.with_grid(|g| g.live_cells().collect())
    }

    fn msg(text: &str) -> Outcome {
        Outcome::Message(text.to_string())
    }

    #[test]
    fn parse_strips_whitespace_and_slashes() {
        assert_eq!(Command::parse("  /play/ "), Command::Play);
        assert_eq!(Command::parse("/"), Command::Empty);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("reset"), Command::Clear);
        assert_eq!(Command::parse("set  Pulsar extra"), Command::Set(Some("Pulsar".into())));
        assert_eq!(Command::parse("set"), Command::Set(None));
        assert_eq!(Command::parse("dance now"), Command::Unknown("dance".into()));
    }

    #[test]
    fn play_pause_messages() {
        let (interp, controller) = interpreter_with(Arc::new(BuiltinPatterns));
        assert_eq!(interp.execute("play"), msg(MSG_STARTED));
        assert_eq!(controller.run_state(), RunState::Animating);
        assert_eq!(interp.execute("play"), msg(""));
        assert_eq!(interp.execute("pause"), msg(MSG_PAUSED));
        assert_eq!(controller.run_state(), RunState::Idle);
        assert_eq!(controller.last_command(), "pause");
    }

    #[test]
    fn empty_line_steps_only_when_not_animating() {
        let (interp, controller) = interpreter_with(Arc::new(BuiltinPatterns));
        assert_eq!(interp.execute(""), msg(MSG_STEPPING));
        assert_eq!(controller.run_state(), RunState::SteppingOnce);

        controller.pause();
        controller.play().unwrap();
        assert_eq!(interp.execute("   "), msg(""));
        assert_eq!(controller.run_state(), RunState::Animating);
    }

    #[test]
    fn second_step_before_first_applies_is_rejected() {
        let (interp, controller) = interpreter_with(Arc::new(BuiltinPatterns));
        assert_eq!(interp.execute("step"), msg(MSG_STEPPING));
        let before = live(&controller);

        let Outcome::Message(text) = interp.execute("step") else {
            panic!("step should not quit");
        };
        assert!(text.starts_with("Cannot step"), "{}", text);
        assert_eq!(controller.run_state(), RunState::SteppingOnce);
        assert_eq!(live(&controller), before);

        controller.advance().unwrap();
        assert_eq!(interp.execute("step"), msg(MSG_STEPPING));
    }

    #[test]
    fn quit_is_reported_to_caller() {
        let (interp, _) = interpreter_with(Arc::new(BuiltinPatterns));
        assert_eq!(interp.execute("/quit"), Outcome::Quit);
    }

    #[test]
    fn clear_and_reset_empty_the_grid() {
        let (interp, controller) = interpreter_with(Arc::new(BuiltinPatterns));
        for word in ["clear", "reset"] {
            controller.play().ok();
            controller.advance();
            assert_eq!(interp.execute(word), msg(""));
            assert!(live(&controller).is_empty());
            assert_eq!(controller.generation(), 0);
            controller.with_grid(|g| assert_eq!((g.width(), g.height()), (12, 12)));
        }
    }

    #[test]
    fn set_unknown_template_leaves_grid() {
        let store = Arc::new(FixedStore(vec![("blinker", "...\nOOO\n...")]));
        let (interp, controller) = interpreter_with(store);
        let before = live(&controller);

        assert_eq!(
            interp.execute("set glider"),
            msg("Template with that name doesn't exist. Try 'templates' to see a list.")
        );
        assert_eq!(live(&controller), before);
    }

    #[test]
    fn set_without_name_shows_usage() {
        let (interp, _) = interpreter_with(Arc::new(BuiltinPatterns));
        assert_eq!(interp.execute("set"), msg(MSG_NO_TEMPLATE));
    }

    #[test]
    fn set_is_case_insensitive_and_extends() {
        let store = Arc::new(FixedStore(vec![("Block", "OO\nOO")]));
        let (interp, controller) = interpreter_with(store);

        assert_eq!(interp.execute("set BLOCK"), msg("Template block set."));
        let expected: HashSet<_> = [(0, 0), (1, 0), (0, 1), (1, 1)].into_iter().collect();
        assert_eq!(live(&controller), expected);
        controller.with_grid(|g| assert_eq!((g.width(), g.height()), (12, 12)));
    }

    #[test]
    fn set_with_malformed_template_reports_parse_error() {
        let store = Arc::new(FixedStore(vec![("broken", "OO\nO")]));
        let (interp, controller) = interpreter_with(store);
        let before = live(&controller);

        let Outcome::Message(text) = interp.execute("set broken") else {
            panic!("set should not quit");
        };
        assert!(text.contains("line 2"), "{}", text);
        assert_eq!(live(&controller), before);
    }

    #[test]
    fn templates_lists_names() {
        let store = Arc::new(FixedStore(vec![("a", "O"), ("b", "O"), ("c", "O")]));
        let (interp, _) = interpreter_with(store);
        assert_eq!(interp.execute("templates"), msg("a, b, c"));
    }

    #[test]
    fn unavailable_store_degrades_to_message() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DirPatterns::new(dir.path().join("gone")));
        let (interp, controller) = interpreter_with(store);
        let before = live(&controller);

        for line in ["templates", "set glider"] {
            let Outcome::Message(text) = interp.execute(line) else {
                panic!("{} should not quit", line);
            };
            assert!(text.starts_with("Failed to read patterns"), "{}", text);
        }
        assert_eq!(live(&controller), before);
    }

    #[test]
    fn unknown_command_is_a_no_op() {
        let (interp, controller) = interpreter_with(Arc::new(BuiltinPatterns));
        assert_eq!(interp.execute("dance"), msg(""));
        assert_eq!(controller.run_state(), RunState::Idle);
    }
}
