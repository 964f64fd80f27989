// Terminal front end: layout, input handling, and widget rendering.
//
// The run loop owns the App. Input events become UserCommands that the App
// applies synchronously; rendering reads the App plus a small ViewState of
// UI-only concerns (pending confirmations and the pitch viewports of the
// last frame, which the mouse handler needs to translate clicks).

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream};
use futures_util::StreamExt;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tracing::{info, warn};

use crate::app::App;
use layout::{build_layout, Viewport};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that is not part of the capture session.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Waiting for y/n before quitting.
    pub confirm_quit: bool,
    /// Waiting for y/n before clearing every event.
    pub confirm_clear: bool,
    /// Full pitch drawable area from the last render.
    pub full_pitch: Option<Viewport>,
    /// Half pitch drawable area from the last render.
    pub half_pitch: Option<Viewport>,
    /// Left button went down on the half pitch and has not been released.
    pub dragging: bool,
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete screen, refitting both pitches to their panels first.
pub fn render_frame(frame: &mut Frame, app: &mut App, view: &mut ViewState) {
    let layout = build_layout(frame.area());
    let aspect = app.config.pitch.cell_aspect;
    let full = Viewport::inside_border(layout.full_pitch, aspect);
    let half = Viewport::inside_border(layout.half_pitch, aspect);
    app.resize(full.bounds(), half.bounds());
    view.full_pitch = Some(full);
    view.half_pitch = Some(half);

    widgets::status_bar::render(frame, layout.status_bar, app.event_kind, app.status.as_deref());
    widgets::pitch::render_full(frame, layout.full_pitch, &full, &app.full_pitch, &app.selection);
    widgets::pitch::render_half(frame, layout.half_pitch, &half, &app.half_pitch, &app.log);
    widgets::session::render(frame, layout.session, &app.meta, &app.selection, app.event_kind);
    widgets::summary::render(frame, layout.summary, &app.log.summarize());
    widgets::event_list::render(frame, layout.event_list, app.log.events());
    render_help_bar(frame, layout.help_bar, view);
}

/// Key hints, or the pending confirmation prompt.
pub fn help_line(view: &ViewState) -> Line<'static> {
    let prompt = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    if view.confirm_quit {
        return Line::from(Span::styled(" Quit? (y/n) ", prompt));
    }
    if view.confirm_clear {
        return Line::from(Span::styled(
            " Clear all events? This cannot be undone. (y/n) ",
            prompt,
        ));
    }
    Line::from(Span::styled(
        " 1-4:kind  f:formation  r:role  g:game type  d/D:date  h/H m/M:time  Esc:deselect  u:undo  c:clear  s:save  q:quit",
        Style::default().fg(Color::Gray),
    ))
}

fn render_help_bar(frame: &mut Frame, area: Rect, view: &ViewState) {
    let paragraph = Paragraph::new(help_line(view)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

/// Run the TUI until the user quits or the input stream ends.
pub async fn run(mut app: App) -> anyhow::Result<()> {
    // 1. Initialize terminal and mouse reporting
    let mut terminal = ratatui::init();
    crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;

    // 2. Restore the terminal on panic, then run the original hook.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    // 3. Render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 4. Main loop
    let result = loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            if app.handle_command(cmd) {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(Event::Mouse(mouse_event))) => {
                        if let Some(cmd) = input::handle_mouse(mouse_event, &mut view_state) {
                            app.handle_command(cmd);
                        }
                    }
                    // Resizes are picked up by the next render.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("terminal input error: {e}");
                        break Err(anyhow::Error::from(e).context("terminal input failed"));
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                let drawn = terminal.draw(|frame| render_frame(frame, &mut app, &mut view_state));
                if let Err(e) = drawn {
                    break Err(anyhow::Error::from(e).context("failed to draw frame"));
                }
            }
        }
    };

    // 5. Restore terminal
    let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    info!("TUI stopped");

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
