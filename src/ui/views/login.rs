use crate::app::{LoginField, LoginForm};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Draw the centered sign-in form
pub fn draw_login(frame: &mut Frame, area: Rect, form: &LoginForm) {
  let width = area.width.min(52);
  let height = area.height.min(8);
  let x = area.x + area.width.saturating_sub(width) / 2;
  let y = area.y + area.height.saturating_sub(height) / 2;
  let overlay = Rect::new(x, y, width, height);

  frame.render_widget(Clear, overlay);

  let title = if form.busy {
    " Sign in (working...) "
  } else {
    " Sign in "
  };
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue))
    .title(title);
  let inner = block.inner(overlay);
  frame.render_widget(block, overlay);

  if inner.height == 0 {
    return;
  }

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Email
      Constraint::Length(1), // Password
      Constraint::Length(1), // Spacer
      Constraint::Min(0),    // Error
    ])
    .split(inner);

  frame.render_widget(
    field_line("Email", form.email.value(), form.focus == LoginField::Email),
    chunks[0],
  );

  let masked = form.password.masked_value();
  frame.render_widget(
    field_line("Password", &masked, form.focus == LoginField::Password),
    chunks[1],
  );

  if let Some(error) = &form.error {
    if chunks[3].height > 0 {
      frame.render_widget(
        Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
        chunks[3],
      );
    }
  }
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Paragraph<'a> {
  let marker = if focused { "▸ " } else { "  " };
  let cursor = if focused { "_" } else { "" };

  let line = Line::from(vec![
    Span::styled(marker, Style::default().fg(Color::Cyan)),
    Span::styled(format!("{:<10}", label), Style::default().fg(Color::DarkGray)),
    Span::raw(value),
    Span::styled(cursor, Style::default().fg(Color::Cyan)),
  ]);

  Paragraph::new(line)
}
