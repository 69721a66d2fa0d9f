//! UI rendering helpers for the terminal user interface.
//!
//! This module draws an `app::RenderModel` using `ratatui`. All decisions
//! about what to show are made before this point.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{RenderModel, Row};

const PLAYING_MARKER: &str = "♪ ";
const IDLE_MARKER: &str = "  ";

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "down/up");
    map.insert("enter", "open/play");
    map.insert("esc", "back");
    map.insert("p", "play album");
    map.insert("space", "pause");
    map.insert("n", "next");
    map.insert("s", "shuffle all");
    map.insert("x/z", "volume +/-");
    map.insert("b or /", "search");
    map.insert("R", "re-index");
    map.insert("q", "quit");
    map
});

/// Render the controls help text.
fn controls_text() -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "enter", "esc", "p", "space", "n", "s", "x/z", "b or /", "R", "q",
    ];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}")))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn row_item(row: &Row) -> ListItem<'_> {
    if row.playing {
        ListItem::new(Line::from(vec![
            Span::raw(PLAYING_MARKER),
            Span::raw(row.text.as_str()),
        ]))
        .style(Style::default().fg(Color::Green))
    } else {
        ListItem::new(Line::from(vec![
            Span::raw(IDLE_MARKER),
            Span::raw(row.text.as_str()),
        ]))
    }
}

pub fn draw(frame: &mut Frame, model: &RenderModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(model.title.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" allegro ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let mut status = vec![model.status.clone(), model.summary.clone()];
    if let Some(notice) = &model.notice {
        status.push(notice.clone());
    }
    let status_par = Paragraph::new(status.join(" • "))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list
    {
        let items: Vec<ListItem> = model.rows.iter().map(row_item).collect();
        let title = if model.total > model.rows.len() {
            format!(
                " {} ({}-{} of {}) ",
                model.header,
                model.offset + 1,
                model.offset + model.rows.len(),
                model.total
            )
        } else {
            format!(" {} ", model.header)
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(model.rows.iter().position(|r| r.selected));
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Footer: the query while searching, controls otherwise.
    let (footer_title, footer_text) = match &model.query {
        Some(query) => (
            " search (enter keeps, esc cancels) ",
            format!("Search: {query}_"),
        ),
        None => (" controls ", controls_text()),
    };
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(footer_title)
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
