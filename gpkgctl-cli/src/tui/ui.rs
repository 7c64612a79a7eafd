//! UI rendering using ratatui

use gpkgctl_core::DomainKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::app::{App, Mode, Pane};

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for selected items
const HIGHLIGHT: Color = Color::Yellow;
/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Content area
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let content = if app.show_detail {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(28), // Tables pane
                Constraint::Percentage(28), // Fields pane
                Constraint::Percentage(44), // Detail pane
            ])
            .split(chunks[0])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0])
    };

    render_tables(frame, app, content[0]);
    render_fields(frame, app, content[1]);
    if app.show_detail {
        render_detail(frame, app, content[2]);
    }

    render_status_bar(frame, app, chunks[1]);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(SECONDARY)
    };
    let title_style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(SECONDARY)
    };
    Block::default()
        .title(title)
        .title_style(title_style)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn highlight_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

fn pane_title(name: &str, count: usize, filtering: bool, filter: &str) -> String {
    if filtering {
        format!(" {} /{} ", name, filter)
    } else {
        format!(" {} ({}) ", name, count)
    }
}

/// Render the tables pane
fn render_tables(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focused == Pane::Tables;
    let filtering = focused && app.mode == Mode::Filter;
    let tables = app.visible_tables();

    let items: Vec<ListItem> = tables
        .iter()
        .map(|t| {
            ListItem::new(Line::from(vec![
                Span::raw(t.name.clone()),
                Span::styled(
                    format!("  {} fields", t.fields.len()),
                    Style::default().fg(DIM),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(
            pane_title("Tables", tables.len(), filtering, &app.filter_input),
            focused,
        ))
        .highlight_style(highlight_style(focused))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !tables.is_empty() {
        state.select(Some(app.table_index.min(tables.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the fields pane, linked to the selected table
fn render_fields(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focused == Pane::Fields;
    let filtering = focused && app.mode == Mode::Filter;
    let fields = app.visible_fields();

    let title = match app.selected_table() {
        Some(t) if !filtering => format!(" Fields :: {} ", t.name),
        _ => pane_title("Fields", fields.len(), filtering, &app.filter_input),
    };

    let items: Vec<ListItem> = fields
        .iter()
        .map(|f| {
            let mut spans = vec![
                Span::raw(f.name.clone()),
                Span::styled(
                    format!("  {}", f.field_type.as_str()),
                    Style::default().fg(DIM),
                ),
            ];
            if f.domain.is_some() {
                spans.push(Span::styled("  ⊂", Style::default().fg(ACCENT)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(title, focused))
        .highlight_style(highlight_style(focused))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !fields.is_empty() {
        state.select(Some(app.field_index.min(fields.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the detail pane: field properties, then the domain rows
fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = pane_block(" Detail ".to_string(), false);

    let Some(detail) = app.detail() else {
        let empty = Paragraph::new(Span::styled("no selection", Style::default().fg(DIM)))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let f = detail.field;
    let mut lines = vec![
        prop_line("table", detail.table.to_string()),
        prop_line("field", f.name.clone()),
        prop_line("alias", f.alias.clone().unwrap_or_else(|| "-".into())),
        prop_line("type", f.field_type.to_string()),
        prop_line(
            "length",
            f.length.map(|l| l.to_string()).unwrap_or_else(|| "-".into()),
        ),
        prop_line("nullable", yes_no(f.nullable)),
        prop_line("editable", yes_no(f.editable)),
        prop_line("default", f.default.clone().unwrap_or_else(|| "-".into())),
    ];

    match detail.domain {
        None => lines.push(prop_line("domain", "-".to_string())),
        Some(d) => {
            lines.push(prop_line("domain", format!("{} ({})", d.name, d.kind.as_str())));
            lines.push(Line::from(""));
            match &d.kind {
                // The coded-value table only exists for coded domains.
                DomainKind::Coded { values } => {
                    let code_w = values.iter().map(|v| v.code.len()).max().unwrap_or(4).max(4);
                    lines.push(Line::from(Span::styled(
                        format!("{:<code_w$}  LABEL", "CODE"),
                        Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD),
                    )));
                    for v in values {
                        lines.push(Line::from(vec![
                            Span::styled(
                                format!("{:<code_w$}", v.code),
                                Style::default().fg(ACCENT),
                            ),
                            Span::raw(format!("  {}", v.label)),
                        ]));
                    }
                }
                DomainKind::Range {
                    min,
                    min_inclusive,
                    max,
                    max_inclusive,
                } => {
                    let open = if *min_inclusive { '[' } else { '(' };
                    let close = if *max_inclusive { ']' } else { ')' };
                    let lo = min.map_or("-inf".to_string(), |v| v.to_string());
                    let hi = max.map_or("+inf".to_string(), |v| v.to_string());
                    lines.push(prop_line("range", format!("{open}{lo}, {hi}{close}")));
                }
                DomainKind::Glob { pattern } => {
                    lines.push(prop_line("pattern", pattern.clone()));
                }
            }
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn prop_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<9} ", label), Style::default().fg(SECONDARY)),
        Span::raw(value),
    ])
}

fn yes_no(value: bool) -> String {
    if value { "yes".into() } else { "no".into() }
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.mode == Mode::Filter {
        Line::from(vec![
            Span::styled(
                format!("/{}", app.filter_input),
                Style::default().fg(ACCENT),
            ),
            Span::styled("  enter:keep  esc:cancel", Style::default().fg(DIM)),
        ])
    } else if let Some(msg) = &app.status_message {
        Line::from(Span::styled(msg.clone(), Style::default().fg(HIGHLIGHT)))
    } else {
        Line::from(Span::styled(
            " q:quit  tab:pane  j/k:move  /:filter  p:detail",
            Style::default().fg(DIM),
        ))
    };

    frame.render_widget(Paragraph::new(line), area);
}
