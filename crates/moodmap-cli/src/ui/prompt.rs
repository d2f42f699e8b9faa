//! The "how are you feeling?" modal.

use moodmap_core::mood::{MAX_DESCRIPTION_CHARS, Rating};
use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{app::App, layers::rating_color};

/// Render the prompt centred over `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let popup = centered(area, 50, 9);
  f.render_widget(Clear, popup);

  let block = Block::default()
    .title(" How are you feeling? ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(popup);
  f.render_widget(block, popup);

  let prompt = &app.prompt;

  // Slider: every rating, the selected one highlighted in its own color.
  let mut slider = vec![Span::raw(" Rating  ")];
  for r in Rating::all() {
    let style = if r == prompt.rating {
      Style::default()
        .fg(Color::Black)
        .bg(rating_color(r))
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(rating_color(r))
    };
    slider.push(Span::styled(format!(" {r} "), style));
    slider.push(Span::raw(" "));
  }

  let used = MAX_DESCRIPTION_CHARS - prompt.remaining();
  let lines = vec![
    Line::from(slider),
    Line::from(""),
    Line::from(vec![
      Span::raw(" "),
      Span::raw(prompt.description.as_str()),
      Span::styled("▏", Style::default().fg(Color::Cyan)),
    ]),
    Line::from(Span::styled(
      format!(" {used}/{MAX_DESCRIPTION_CHARS}"),
      Style::default().fg(Color::DarkGray),
    )),
    Line::from(""),
    Line::from(Span::styled(
      " ←→ rating  Enter submit  Esc cancel",
      Style::default().fg(Color::DarkGray),
    )),
  ];

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width)])
    .flex(Flex::Center)
    .areas(row);
  cell
}
