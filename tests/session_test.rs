/// Drives the interpreter and the animation thread together, the way the
/// interactive session does
use std::io;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use termlife::animation::{AnimationLoop, FrameSink};
use termlife::command::{CommandInterpreter, Outcome};
use termlife::config::{DisplayConfig, SimulationConfig};
use termlife::controller::{Controller, Frame, RunState};
use termlife::grid::Grid;
use termlife::pattern::{BuiltinPatterns, PatternFormat, DEFAULT_PATTERN};

const TICK: Duration = Duration::from_millis(10);

#[derive(Default)]
struct LastFrame(Mutex<Option<Frame>>);

impl FrameSink for LastFrame {
    fn show_frame(&self, frame: &Frame) -> io::Result<()> {
        *self.0.lock().unwrap() = Some(frame.clone());
        Ok(())
    }

    fn show_status(&self, _message: &str) -> io::Result<()> {
        Ok(())
    }
}

fn session() -> (Arc<Controller>, CommandInterpreter, Arc<LastFrame>, AnimationLoop) {
    let format = PatternFormat::default();
    let grid = Grid::from_pattern(DEFAULT_PATTERN, &format).unwrap();
    let config = SimulationConfig {
        interval: TICK,
        ..SimulationConfig::default()
    };
    let controller = Arc::new(Controller::new(grid, &config, DisplayConfig::default()));
    let interpreter = CommandInterpreter::new(controller.clone(), Arc::new(BuiltinPatterns), format);
    let sink = Arc::new(LastFrame::default());
    let animation = AnimationLoop::spawn(controller.clone(), sink.clone(), TICK);
    (controller, interpreter, sink, animation)
}

fn message(text: &str) -> Outcome {
    Outcome::Message(text.to_string())
}

#[test]
fn play_then_pause_advances_generations() {
    let (controller, interpreter, sink, animation) = session();
    assert_eq!(controller.run_state(), RunState::Idle);

    assert_eq!(interpreter.execute("play"), message("Started animation."));
    assert_eq!(controller.run_state(), RunState::Animating);

    thread::sleep(TICK * 10);
    assert_eq!(interpreter.execute("pause"), message("Paused animation."));
    assert_eq!(controller.run_state(), RunState::Idle);
    animation.stop();

    assert!(controller.generation() >= 1);
    let last = sink.0.lock().unwrap().clone().expect("a frame was drawn");
    assert_eq!(last.generation, controller.generation());
    assert_eq!(last.lines.len(), 100);
    assert!(last.lines.iter().all(|line| line.chars().count() == 200));
}

#[test]
fn step_commands_advance_one_generation_each() {
    let (controller, interpreter, _sink, animation) = session();

    for expected in 1..=3 {
        assert_eq!(interpreter.execute("/step/"), message("Moving forward one generation."));
        let start = Instant::now();
        while controller.generation() < expected && start.elapsed() < Duration::from_secs(2) {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(controller.generation(), expected);
        assert_eq!(controller.run_state(), RunState::Idle);
    }

    animation.stop();
}

#[test]
fn set_template_replaces_running_grid() {
    let (controller, interpreter, _sink, animation) = session();
    interpreter.execute("play");
    thread::sleep(TICK * 3);

    assert_eq!(interpreter.execute("set Blinker"), message("Template blinker set."));
    interpreter.execute("pause");
    animation.stop();

    // Blinker keeps three cells whichever phase it is in
    controller.with_grid(|g| {
        assert_eq!((g.width(), g.height()), (100, 100));
        assert_eq!(g.population(), 3);
    });
}
