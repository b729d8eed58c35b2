//! Terminal event loop for the review client.
//!
//! Owns the crossterm session, feeds key/mouse/resize events and periodic
//! ticks into [`App`], hands the commands it returns to the [`Dispatcher`],
//! and folds gateway completions back in.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as TerminalEvent,
    KeyCode as TerminalKeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
};
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use mailpilot_core::Email;
use mailpilot_gateway::Gateway;
use mailpilot_tui_adapter::input::{
    InputEvent, Key, KeyEvent, Modifiers, MouseEvent, MouseWheelDirection, ResizeEvent,
};
use mailpilot_tui_adapter::render::{CellStyle, RenderFrame, TermColor};
use mailpilot_tui_adapter::style::ThemeSpec;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::{App, Command, Completion};
use crate::dispatch::Dispatcher;

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const WORKER_THREADS: usize = 2;

/// Everything the event loop needs from the command line.
pub struct RuntimeConfig {
    pub gateway: Arc<dyn Gateway>,
    pub emails: Vec<Email>,
    pub theme: ThemeSpec,
    pub request_timeout: Duration,
}

pub fn run(config: RuntimeConfig) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(WORKER_THREADS)
        .thread_name("mailpilot-gateway")
        .enable_all()
        .build()
        .map_err(|err| format!("start async runtime: {err}"))?;
    let (dispatcher, mut completions) = Dispatcher::new(
        config.gateway,
        runtime.handle().clone(),
        config.request_timeout,
    );

    let result = {
        let mut terminal_session =
            TerminalSession::enter().map_err(|err| format!("enter tui terminal mode: {err}"))?;
        let mut app = App::new(config.emails, config.theme);
        let (width, height) =
            terminal_size().map_err(|err| format!("read terminal size: {err}"))?;
        let _ = app.update(InputEvent::Resize(ResizeEvent { width, height }));
        tracing::info!(width, height, "review session started");

        event_loop(&mut terminal_session, &mut app, &dispatcher, &mut completions)
    };

    runtime.shutdown_background();
    tracing::info!("review session ended");
    result
}

fn event_loop(
    terminal_session: &mut TerminalSession,
    app: &mut App,
    dispatcher: &Dispatcher,
    completions: &mut UnboundedReceiver<Completion>,
) -> Result<(), String> {
    let mut dirty = true;
    let mut next_tick = Instant::now() + TICK_INTERVAL;

    loop {
        loop {
            match completions.try_recv() {
                Ok(completion) => {
                    let command = app.handle_completion(completion);
                    issue(command, dispatcher);
                    dirty = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Err("gateway dispatcher stopped".to_owned());
                }
            }
        }

        if dirty {
            let frame = app.render();
            render_frame(&mut terminal_session.stdout, &frame)
                .map_err(|err| format!("render frame: {err}"))?;
            dirty = false;
        }

        if app.quitting() {
            return Ok(());
        }

        let now = Instant::now();
        if now >= next_tick {
            let _ = app.update(InputEvent::Tick);
            dirty |= app.screen().is_busy();
            next_tick = Instant::now() + TICK_INTERVAL;
            continue;
        }

        let timeout = next_tick.saturating_duration_since(now);
        let has_event =
            event::poll(timeout).map_err(|err| format!("poll terminal event: {err}"))?;
        if !has_event {
            continue;
        }

        let event = event::read().map_err(|err| format!("read terminal event: {err}"))?;
        let Some(input) = map_terminal_event(event) else {
            continue;
        };
        let command = app.update(input);
        issue(command, dispatcher);
        dirty = true;
    }
}

fn issue(command: Command, dispatcher: &Dispatcher) {
    if command.is_none() {
        return;
    }
    tracing::debug!(?command, "dispatching command");
    let _ = dispatcher.dispatch(command);
}

fn terminal_size() -> io::Result<(usize, usize)> {
    let (width, height) = terminal::size()?;
    Ok((usize::from(width), usize::from(height)))
}

fn map_terminal_event(event: TerminalEvent) -> Option<InputEvent> {
    match event {
        TerminalEvent::Resize(width, height) => Some(InputEvent::Resize(ResizeEvent {
            width: usize::from(width),
            height: usize::from(height),
        })),
        TerminalEvent::Mouse(mouse) => {
            let wheel = match mouse.kind {
                MouseEventKind::ScrollUp => MouseWheelDirection::Up,
                MouseEventKind::ScrollDown => MouseWheelDirection::Down,
                _ => return None,
            };
            Some(InputEvent::Mouse(MouseEvent { wheel: Some(wheel) }))
        }
        TerminalEvent::Key(key_event) => {
            if !matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                return None;
            }

            let key = match key_event.code {
                TerminalKeyCode::Char(ch) => Key::Char(ch),
                TerminalKeyCode::Enter => Key::Enter,
                TerminalKeyCode::Esc => Key::Escape,
                TerminalKeyCode::Tab | TerminalKeyCode::BackTab => Key::Tab,
                TerminalKeyCode::Backspace => Key::Backspace,
                TerminalKeyCode::Delete => Key::Delete,
                TerminalKeyCode::Up => Key::Up,
                TerminalKeyCode::Down => Key::Down,
                TerminalKeyCode::Left => Key::Left,
                TerminalKeyCode::Right => Key::Right,
                TerminalKeyCode::PageUp => Key::PageUp,
                TerminalKeyCode::PageDown => Key::PageDown,
                TerminalKeyCode::Home => Key::Home,
                TerminalKeyCode::End => Key::End,
                _ => return None,
            };

            let mut modifiers = Modifiers {
                shift: key_event.modifiers.contains(KeyModifiers::SHIFT),
                ctrl: key_event.modifiers.contains(KeyModifiers::CONTROL),
                alt: key_event.modifiers.contains(KeyModifiers::ALT),
            };
            if matches!(key_event.code, TerminalKeyCode::BackTab) {
                modifiers.shift = true;
            }

            Some(InputEvent::Key(KeyEvent { key, modifiers }))
        }
        _ => None,
    }
}

fn render_frame<W: Write>(out: &mut W, frame: &RenderFrame) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    let size = frame.size();

    for y in 0..size.height {
        queue!(out, MoveTo(0, to_u16(y)))?;
        let mut style = None;
        for x in 0..size.width {
            if let Some(cell) = frame.cell(x, y) {
                if style != Some(cell.style) {
                    queue_style(out, cell.style)?;
                    style = Some(cell.style);
                }
                queue!(out, Print(cell.glyph))?;
            }
        }
    }

    queue!(
        out,
        SetAttribute(Attribute::Reset),
        MoveTo(0, to_u16(size.height))
    )?;
    out.flush()
}

fn term_color_to_crossterm(color: TermColor) -> Color {
    match color {
        TermColor::Ansi256(idx) => Color::AnsiValue(idx),
    }
}

fn queue_style<W: Write>(out: &mut W, style: CellStyle) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(term_color_to_crossterm(style.fg)),
        SetBackgroundColor(term_color_to_crossterm(style.bg)),
    )?;
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    } else if style.dim {
        queue!(out, SetAttribute(Attribute::Dim))?;
    } else {
        queue!(out, SetAttribute(Attribute::NormalIntensity))?;
    }
    if style.reverse {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    } else {
        queue!(out, SetAttribute(Attribute::NoReverse))?;
    }
    Ok(())
}

fn to_u16(value: usize) -> u16 {
    value.min(usize::from(u16::MAX)) as u16
}

struct TerminalSession {
    stdout: io::Stdout,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            DisableMouseCapture,
            LeaveAlternateScreen,
            Show,
            MoveTo(0, 0)
        );
        let _ = terminal::disable_raw_mode();
    }
}
