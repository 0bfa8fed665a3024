use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::App;

/// Draw the header bar with logo, store, and account
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
  let title = app.title().unwrap_or_else(|| extract_domain(app.store_url()));
  let account = app.account().unwrap_or("signed out");

  let header = Line::from(vec![
    Span::styled(" t9s ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", account),
      Style::default().fg(Color::Yellow).bold(),
    ),
  ]);

  let paragraph = Paragraph::new(header).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Extract domain from the store URL
fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_domain() {
    assert_eq!(
      extract_domain("https://store.example.com/v1/"),
      "store.example.com"
    );
    assert_eq!(extract_domain("http://localhost:8080"), "localhost:8080");
    assert_eq!(extract_domain("store.example.com"), "store.example.com");
  }
}
