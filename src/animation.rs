//! Timer-driven stepping on its own thread

use crate::controller::{Controller, Frame, RunState};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Receives renderings of the grid and command line messages
pub trait FrameSink: Send + Sync {
    fn show_frame(&self, frame: &Frame) -> io::Result<()>;
    fn show_status(&self, message: &str) -> io::Result<()>;
}

/// Handle to the animation thread. Stops and joins it on drop.
pub struct AnimationLoop {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AnimationLoop {
    /// Start the thread.
    ///
    /// While animating it sleeps `interval` before each generation; while
    /// idle it polls every `interval`; a pending single step is applied on
    /// the next pass without sleeping.
    pub fn spawn(controller: Arc<Controller>, sink: Arc<dyn FrameSink>, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();

        let handle = thread::spawn(move || {
            debug!(?interval, "animation thread started");
            while !flag.load(Ordering::Relaxed) {
                match controller.run_state() {
                    RunState::Idle => thread::sleep(interval),
                    RunState::Animating => {
                        thread::sleep(interval);
                        present(&controller, sink.as_ref());
                    }
                    RunState::SteppingOnce => present(&controller, sink.as_ref()),
                }
            }
            debug!("animation thread stopped");
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Ask the thread to finish and wait for it
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("animation thread panicked");
            }
        }
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn present(controller: &Controller, sink: &dyn FrameSink) {
    // Paused between the state check and here, nothing to draw
    let Some(frame) = controller.advance() else {
        return;
    };
    if let Err(e) = sink.show_frame(&frame) {
        warn!(error = %e, generation = frame.generation, "failed to draw frame");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayConfig, SimulationConfig};
    use crate::grid::Grid;
    use crate::pattern::PatternFormat;
    use std::sync::Mutex;
    use std::time::Instant;

    #[derive(Default)]
    struct Recorder {
        generations: Mutex<Vec<u64>>,
    }

    impl Recorder {
        fn seen(&self) -> Vec<u64> {
            self.generations.lock().unwrap().clone()
        }
    }

    impl FrameSink for Recorder {
        fn show_frame(&self, frame: &Frame) -> io::Result<()> {
            self.generations.lock().unwrap().push(frame.generation);
            Ok(())
        }

        fn show_status(&self, _message: &str) -> io::Result<()> {
            Ok(())
        }
    }

    const TICK: Duration = Duration::from_millis(5);

    fn blinker() -> Arc<Controller> {
        let grid = Grid::from_pattern("...\nOOO\n...", &PatternFormat::default()).unwrap();
        let config = SimulationConfig {
            width: 10,
            height: 10,
            interval: TICK,
            ..SimulationConfig::default()
        };
        Arc::new(Controller::new(grid, &config, DisplayConfig::default()))
    }

    fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        done()
    }

    #[test]
    fn idle_loop_draws_nothing() {
        let controller = blinker();
        let recorder = Arc::new(Recorder::default());
        let animation = AnimationLoop::spawn(controller.clone(), recorder.clone(), TICK);
        thread::sleep(TICK * 6);
        animation.stop();
        assert!(recorder.seen().is_empty());
        assert_eq!(controller.generation(), 0);
    }

    #[test]
    fn pending_step_is_applied_once() {
        let controller = blinker();
        let recorder = Arc::new(Recorder::default());
        let animation = AnimationLoop::spawn(controller.clone(), recorder.clone(), TICK);

        controller.request_step().unwrap();
        assert!(wait_until(Duration::from_secs(2), || controller.run_state() == RunState::Idle));
        thread::sleep(TICK * 4);
        animation.stop();

        assert_eq!(recorder.seen(), vec![1]);
        assert_eq!(controller.generation(), 1);
    }

    #[test]
    fn animation_advances_until_paused() {
        let controller = blinker();
        let recorder = Arc::new(Recorder::default());
        let animation = AnimationLoop::spawn(controller.clone(), recorder.clone(), TICK);

        controller.play().unwrap();
        assert!(wait_until(Duration::from_secs(2), || controller.generation() >= 3));
        controller.pause();
        let paused_at = controller.generation();
        thread::sleep(TICK * 6);
        animation.stop();

        assert_eq!(controller.generation(), paused_at);
        let seen = recorder.seen();
        assert_eq!(seen.last().copied(), Some(paused_at));
        assert!(seen.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn dropping_the_handle_stops_the_thread() {
        let controller = blinker();
        let recorder = Arc::new(Recorder::default());
        {
            let _animation = AnimationLoop::spawn(controller.clone(), recorder.clone(), TICK);
            controller.play().unwrap();
            assert!(wait_until(Duration::from_secs(2), || controller.generation() >= 1));
        }
        let stopped_at = controller.generation();
        thread::sleep(TICK * 6);
        assert_eq!(controller.generation(), stopped_at);
    }
}
