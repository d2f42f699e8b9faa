//! TUI rendering: header, map, status bar and the prompt overlay.

pub mod map;
pub mod prompt;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use crate::{
  app::{App, Screen},
  layers,
};

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // map
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  map::draw(f, rows[1], app);
  draw_status(f, rows[2], app);

  if app.screen == Screen::Prompt {
    prompt::draw(f, rows[1], app);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let left = Span::styled(
    " moodmap  [m] mood  [r] refresh  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let layer_names: Vec<_> = layers::visible_layers(app.camera.zoom)
    .into_iter()
    .map(|l| l.label())
    .collect();
  let right = Span::styled(
    format!(
      "{} moods  z{}  {} ",
      app.source.len(),
      app.camera.zoom,
      layer_names.join("+")
    ),
    Style::default().fg(Color::Gray),
  );

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen {
    Screen::Map => ("MAP", "←↓↑→/hjkl pan  +/- zoom  c center  m mood  r refresh  q quit"),
    Screen::Prompt => ("MOOD", "←→ rating  type to describe  Enter submit  Esc cancel"),
  };

  let status = if app.status_msg.is_empty() {
    hints
  } else {
    app.status_msg.as_str()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
