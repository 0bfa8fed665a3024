use crate::store::types::TodoItem;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

pub fn draw_todo_list(
  frame: &mut Frame,
  area: Rect,
  items: &[TodoItem],
  selected: usize,
  loading: bool,
) {
  let title = if loading {
    " To-do (loading...) ".to_string()
  } else {
    format!(" To-do ({}) ", items.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if items.is_empty() && !loading {
    let paragraph = Paragraph::new("Nothing to do. Press 'a' to add an item.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let rows: Vec<ListItem> = items
    .iter()
    .map(|item| ListItem::new(Line::from(item.description.clone())))
    .collect();

  let list = List::new(rows)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  if !items.is_empty() {
    state.select(Some(selected.min(items.len() - 1)));
  }

  frame.render_stateful_widget(list, area, &mut state);
}
