pub mod components;

mod header;
mod views;

use crate::app::{App, Mode, ViewState};
use crate::commands;
use crate::ui::components::TextInput;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  header::draw_header(frame, chunks[0], app);

  // Draw current view
  match app.view() {
    ViewState::Login { form } => {
      views::login::draw_login(frame, chunks[1], form);
    }
    ViewState::TodoList { selected, loading } => {
      views::todo_list::draw_todo_list(frame, chunks[1], app.items(), *selected, *loading);

      match app.mode() {
        Mode::Insert => draw_new_item_overlay(frame, chunks[1], app.item_input()),
        Mode::Command => draw_command_overlay(frame, chunks[1], app),
        Mode::Normal => {}
      }
    }
  }

  // Draw status bar
  draw_status_bar(frame, chunks[2], app);
}

/// Overlay for typing a new item
fn draw_new_item_overlay(frame: &mut Frame, area: Rect, input: &TextInput) {
  let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
  let overlay = Rect::new(area.x + 1, area.y + 1, width, 3);

  frame.render_widget(Clear, overlay);

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Green))
    .title(" New item ");
  let inner = block.inner(overlay);
  frame.render_widget(block, overlay);

  if inner.height == 0 {
    return;
  }

  let line = Line::from(vec![
    Span::raw(input.value()),
    Span::styled("_", Style::default().fg(Color::Green)),
  ]);
  frame.render_widget(Paragraph::new(line), inner);
}

/// Command overlay with autocomplete suggestions
fn draw_command_overlay(frame: &mut Frame, area: Rect, app: &App) {
  let suggestions = commands::get_suggestions(app.command_input());

  let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
  let suggestion_count = suggestions.len().min(8);
  let height = if suggestions.is_empty() {
    3 // Just input line with borders
  } else {
    3 + suggestion_count as u16
  };

  let overlay = Rect::new(area.x + 1, area.y + 1, width, height.min(area.height));

  frame.render_widget(Clear, overlay);

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow))
    .title(" Command ");
  let inner = block.inner(overlay);
  frame.render_widget(block, overlay);

  if inner.height == 0 {
    return;
  }

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Input line
      Constraint::Min(0),    // Suggestions
    ])
    .split(inner);

  let input_line = Line::from(vec![
    Span::styled(":", Style::default().fg(Color::Yellow)),
    Span::raw(app.command_input()),
    Span::styled("_", Style::default().fg(Color::Yellow)),
  ]);
  frame.render_widget(Paragraph::new(input_line), chunks[0]);

  if !suggestions.is_empty() && chunks[1].height > 0 {
    let items: Vec<ListItem> = suggestions
      .iter()
      .take(8)
      .map(|cmd| {
        let line = Line::from(vec![
          Span::styled(
            format!("{:<10}", cmd.name),
            Style::default().fg(Color::Cyan),
          ),
          Span::styled(cmd.description, Style::default().fg(Color::DarkGray)),
        ]);
        ListItem::new(line)
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(app.selected_suggestion()));

    frame.render_stateful_widget(list, chunks[1], &mut state);
  }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  if let Some(status) = app.status() {
    let paragraph =
      Paragraph::new(format!(" {}", status)).style(Style::default().fg(Color::Yellow));
    frame.render_widget(paragraph, area);
    return;
  }

  let (content, style) = match app.view() {
    ViewState::Login { .. } => {
      let hint = " Enter:sign in  Tab:switch field  Esc:quit";
      (hint.to_string(), Style::default().fg(Color::DarkGray))
    }
    ViewState::TodoList { .. } => match app.mode() {
      Mode::Normal => {
        let hint = " :command  a:add  d:delete  r:refresh  j/k:nav  q:quit";
        (hint.to_string(), Style::default().fg(Color::DarkGray))
      }
      Mode::Insert => (
        " Enter:save  Esc:cancel".to_string(),
        Style::default().fg(Color::Green),
      ),
      Mode::Command => (
        format!(" :{}", app.command_input()),
        Style::default().fg(Color::Yellow),
      ),
    },
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
