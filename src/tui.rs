//! Interactive session: a cells view above a one-line command prompt

use crate::animation::{AnimationLoop, FrameSink};
use crate::command::{CommandInterpreter, Outcome};
use crate::boundary::BoundaryKind;
use crate::controller::{Controller, EditorMode, Frame};
use crate::error::Result;
use crate::terminal::{next_event, Terminal};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Color;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

/// Rows below the cells view: title bar and command line
const FOOTER_ROWS: u16 = 2;
const INPUT_POLL: Duration = Duration::from_millis(50);

const CELL_COLOR: Color = Color::Green;
const BAR_COLOR: Color = Color::DarkGrey;
const MESSAGE_COLOR: Color = Color::Green;
const INPUT_COLOR: Color = Color::White;

/// Draws frames and status text into the shared terminal
pub struct Screen {
    term: Mutex<Terminal>,
    controller: Arc<Controller>,
    alive_glyph: char,
}

impl Screen {
    pub fn new(term: Terminal, controller: Arc<Controller>, alive_glyph: char) -> Self {
        Self {
            term: Mutex::new(term),
            controller,
            alive_glyph,
        }
    }

    /// Callers read the controller first; it is never locked under the terminal
    fn with_term(&self, draw: impl FnOnce(&mut Terminal) -> io::Result<()>) -> io::Result<()> {
        match self.term.lock() {
            Ok(mut term) => draw(&mut term),
            Err(_) => Err(io::Error::other("terminal lock poisoned")),
        }
    }

    /// Redraw the cells view, the title bar and the command line
    pub fn redraw(&self, input: &str) -> io::Result<()> {
        let frame = self.controller.frame();
        let prompt = Prompt::of(&self.controller);
        self.with_term(|term| {
            draw_cells(term, &frame, self.alive_glyph);
            draw_bar(term, &frame, &prompt);
            draw_command_line(term, &prompt, input);
            term.render()
        })
    }

    /// Show the command being typed
    pub fn show_input(&self, input: &str) -> io::Result<()> {
        let prompt = Prompt::of(&self.controller);
        self.with_term(|term| {
            draw_command_line(term, &prompt, input);
            term.render()
        })
    }

    pub fn resize(&self, width: u16, height: u16) -> io::Result<()> {
        self.with_term(|term| term.resize(width, height))
    }
}

impl FrameSink for Screen {
    fn show_frame(&self, frame: &Frame) -> io::Result<()> {
        let prompt = Prompt::of(&self.controller);
        self.with_term(|term| {
            draw_cells(term, frame, self.alive_glyph);
            draw_bar(term, frame, &prompt);
            term.render()
        })
    }

    fn show_status(&self, message: &str) -> io::Result<()> {
        self.with_term(|term| {
            let (_, height) = term.size();
            let row = height.saturating_sub(1);
            term.clear_rows(row, height);
            term.set_str(0, row as i32, &format!(" {}", message), Some(MESSAGE_COLOR), false);
            term.render()
        })
    }
}

/// Bottom-left of the grid sits at the bottom-left of the view
fn draw_cells(term: &mut Terminal, frame: &Frame, alive_glyph: char) {
    let (_, height) = term.size();
    let rows = height.saturating_sub(FOOTER_ROWS);
    term.clear_rows(0, rows);

    let skip = frame.lines.len().saturating_sub(rows as usize);
    let top = rows as usize - frame.lines.len().min(rows as usize);
    for (i, line) in frame.lines.iter().skip(skip).enumerate() {
        let y = (top + i) as i32;
        for (x, ch) in line.chars().enumerate() {
            let fg = if ch == alive_glyph { Some(CELL_COLOR) } else { Some(BAR_COLOR) };
            term.set(x as i32, y, ch, fg, ch == alive_glyph);
        }
    }
}

/// Command line fields copied out of the controller for one draw
#[derive(Clone, Debug, PartialEq, Eq)]
struct Prompt {
    boundary: BoundaryKind,
    last_command: String,
    mode: EditorMode,
    message: String,
}

impl Prompt {
    fn of(controller: &Controller) -> Self {
        Self {
            boundary: controller.boundary(),
            last_command: controller.last_command(),
            mode: controller.editor_mode(),
            message: controller.message(),
        }
    }

    /// Text of the title bar, before padding
    fn title(&self, frame: &Frame) -> String {
        let mut title = format!(
            "─ Cells │ gen {} │ pop {} │ {} │ {} ",
            frame.generation, frame.population, frame.run_state, self.boundary,
        );
        if !self.last_command.is_empty() {
            title.push_str(&format!("│ last: {} ", self.last_command));
        }
        title
    }

    /// Text of the bottom line: the message, or the line being typed
    fn line(&self, input: &str) -> String {
        match self.mode {
            EditorMode::ShowingMessage => format!(" {}", self.message),
            EditorMode::AwaitingCommand => format!("> {}█", input),
        }
    }
}

fn draw_bar(term: &mut Terminal, frame: &Frame, prompt: &Prompt) {
    let (width, height) = term.size();
    let row = height.saturating_sub(FOOTER_ROWS);
    term.clear_rows(row, row + 1);

    let title = prompt.title(frame);
    let fill = (width as usize).saturating_sub(title.chars().count());
    let bar = format!("{}{}", title, "─".repeat(fill));
    term.set_str(0, row as i32, &bar, Some(BAR_COLOR), false);
}

fn draw_command_line(term: &mut Terminal, prompt: &Prompt, input: &str) {
    let (_, height) = term.size();
    let row = height.saturating_sub(1);
    term.clear_rows(row, height);

    let color = match prompt.mode {
        EditorMode::ShowingMessage => MESSAGE_COLOR,
        EditorMode::AwaitingCommand => INPUT_COLOR,
    };
    term.set_str(0, row as i32, &prompt.line(input), Some(color), false);
}

/// What a key press did to the line being edited
#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Edited,
    Submit(String),
    Quit,
    Ignored,
}

/// Line editing for the command prompt
fn handle_key(input: &mut String, key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignored;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            input.push(c);
            KeyAction::Edited
        }
        KeyCode::Backspace => {
            input.pop();
            KeyAction::Edited
        }
        KeyCode::Esc => {
            input.clear();
            KeyAction::Edited
        }
        KeyCode::Enter => KeyAction::Submit(std::mem::take(input)),
        _ => KeyAction::Ignored,
    }
}

/// Run the interactive session until `quit` or Ctrl-C
pub fn run(controller: Arc<Controller>, interpreter: CommandInterpreter, interval: Duration, alive_glyph: char) -> Result<()> {
    let term = Terminal::new()?;
    let screen = Arc::new(Screen::new(term, controller.clone(), alive_glyph));

    controller.set_message("Type 'quit' to exit.");
    screen.redraw("")?;

    let animation = AnimationLoop::spawn(controller.clone(), screen.clone(), interval);
    let mut input = String::new();

    loop {
        let event = match next_event(INPUT_POLL)? {
            Some(event) => event,
            None => continue,
        };

        let key = match event {
            Event::Key(key) => key,
            Event::Resize(width, height) => {
                screen.resize(width, height)?;
                screen.redraw(&input)?;
                continue;
            }
            _ => continue,
        };

        // First key after a message clears it and starts a new command
        if controller.editor_mode() == EditorMode::ShowingMessage && key.kind != KeyEventKind::Release {
            controller.begin_editing();
            input.clear();
        }

        match handle_key(&mut input, key) {
            KeyAction::Edited => screen.show_input(&input)?,
            KeyAction::Ignored => {}
            KeyAction::Quit => break,
            KeyAction::Submit(line) => match interpreter.execute(&line) {
                Outcome::Quit => break,
                Outcome::Message(message) => {
                    controller.set_message(message.clone());
                    // `clear` and `set` replace the grid, so redraw it too
                    if let Err(e) = screen.show_frame(&controller.frame()) {
                        warn!(error = %e, "failed to draw frame");
                    }
                    screen.show_status(&message)?;
                }
            },
        }
    }

    animation.stop();
    info!(generation = controller.generation(), "session ended");
    Ok(())
}
