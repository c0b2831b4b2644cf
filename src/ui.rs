//! TUI rendering for the nearby-places explorer.
//!
//! This module draws the application state with `ratatui`: the search form,
//! the status line, the results list, and the map canvas. It only reads
//! [`App`]; every state change happens in `app.rs`.

use crate::app::{App, Field};
use crate::status::Severity;
use ratatui::{
    prelude::*,
    widgets::{canvas::*, *}, // Imports Points, Map, etc.
};

/// Renders one frame of the TUI based on current application state.
///
/// Left column: form, status line, results. Right: the map. A single help
/// line runs along the bottom.
pub fn render(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.size());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(chunks[0]);

    render_form(f, app, sidebar[0]);
    render_status(f, app, sidebar[1]);
    render_results(f, app, sidebar[2]);
    render_map(f, app, chunks[1]);

    let help = Paragraph::new(
        " d detect  s search  c category  Tab edit form  ←/→ category (in form)  ↑/↓ select  Enter show on map  q quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, rows[1]);
}

/// Search form: coordinates, radius and category, focused field highlighted.
fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let placeholder = |text: &str, fallback: String| {
        if text.is_empty() {
            Span::styled(fallback, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(text.to_string())
        }
    };
    let category = match app.inputs.category {
        Some(c) => Span::raw(format!("◂ {} ▸", c)),
        None => Span::styled(
            format!("◂ {} ▸", app.defaults.category),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let rows = [
        (
            Field::Latitude,
            "Latitude ",
            placeholder(&app.inputs.latitude, "not set".to_string()),
        ),
        (
            Field::Longitude,
            "Longitude",
            placeholder(&app.inputs.longitude, "not set".to_string()),
        ),
        (
            Field::Radius,
            "Radius km",
            placeholder(&app.inputs.radius, format!("{}", app.defaults.radius_km)),
        ),
        (Field::Category, "Category ", category),
    ];

    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(field, label, value)| {
            let label_style = if app.focus == Some(field) {
                Style::default()
                    .fg(Color::Cyan)
                    .bg(Color::Rgb(30, 30, 60))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            Line::from(vec![
                Span::styled(format!(" {} ", label), label_style),
                Span::raw(" "),
                value,
            ])
        })
        .collect();

    let form = Paragraph::new(lines).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(form, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let status = app.status.current();
    let (icon, color) = match status.severity {
        Severity::Info => (app.spinner().unwrap_or("ℹ"), Color::Gray),
        Severity::Success => ("✔", Color::Green),
        Severity::Error => ("✘", Color::Red),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", status.at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{} {}", icon, status.message),
            Style::default().fg(color),
        ),
    ]);

    let p = Paragraph::new(line)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    f.render_widget(p, area);
}

/// Results region: loading indicator, empty-state text, or place cards.
fn render_results(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Nearby Places ({}) ", app.scene.entries.len()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    if app.scene.loading {
        let spinner = app.spinner().unwrap_or("");
        let p = Paragraph::new(format!("{} Loading nearby places...", spinner))
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    }

    if let Some(ref msg) = app.scene.empty_message {
        let p = Paragraph::new(msg.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = app
        .scene
        .entries
        .iter()
        .map(|entry| {
            let mut header = vec![Span::styled(
                entry.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if let Some(rating) = entry.rating {
                header.push(Span::styled(
                    format!("  ★ {}", rating),
                    Style::default().fg(Color::Yellow),
                ));
            }

            ListItem::new(vec![
                Line::from(header),
                Line::from(format!("  {}", entry.address)),
                Line::from(vec![
                    Span::styled(
                        format!("  [{}] ", entry.source),
                        Style::default().fg(Color::Magenta),
                    ),
                    Span::styled(
                        entry.navigation_url.clone(),
                        Style::default()
                            .fg(Color::Blue)
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                ]),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(30, 30, 60)))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.scene.entries.is_empty() {
        state.select(Some(app.selected_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Map canvas: coastlines, result markers, user marker, open popup.
fn render_map(f: &mut Frame, app: &App, area: Rect) {
    let view = app.scene.map.visible_bounds();
    let markers = &app.scene.markers;

    let canvas = Canvas::default()
        .block(Block::bordered().title(format!(" Map ({}) ", app.scene.map.center)))
        .marker(symbols::Marker::Braille)
        .x_bounds([view.west, view.east])
        .y_bounds([view.south, view.north])
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::Rgb(50, 50, 50),
                resolution: MapResolution::High,
            });
            ctx.layer();

            for (i, marker) in markers.result_markers().iter().enumerate() {
                let selected = i == app.selected_index;
                let style = if selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Red)
                };
                ctx.print(
                    marker.coordinate.longitude,
                    marker.coordinate.latitude,
                    Line::from(Span::styled("●", style)),
                );
            }

            if let Some(user) = markers.user_marker() {
                ctx.print(
                    user.coordinate.longitude,
                    user.coordinate.latitude,
                    Line::from(Span::styled(" ⌖ ", Style::default().fg(Color::Cyan))),
                );
            }

            if let Some(open) = markers.open_popup_marker() {
                let label = open.popup.replace('\n', " · ");
                ctx.print(
                    open.coordinate.longitude,
                    open.coordinate.latitude,
                    Line::from(Span::styled(
                        format!("  {} ", label),
                        Style::default().fg(Color::Black).bg(Color::Yellow),
                    )),
                );
            }
        });

    f.render_widget(canvas, area);
}
