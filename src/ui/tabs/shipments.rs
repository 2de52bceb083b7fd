//! Shipments tab: shipment table with a detail pane showing nested lines.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::format::{format_money, format_optional_date};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_shipment_list(frame, app, chunks[0]);
    render_shipment_detail(frame, app, chunks[1]);
}

fn render_shipment_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Tracking #"),
        Cell::from("Type"),
        Cell::from("Status"),
        Cell::from("Carrier"),
        Cell::from("ETA"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .shipments
        .iter()
        .map(|shipment| {
            Row::new(vec![
                Cell::from(shipment.tracking_number.as_str()),
                Cell::from(Span::styled(
                    shipment.shipment_type.label(),
                    styles::shipment_type_style(shipment.shipment_type),
                )),
                Cell::from(Span::styled(
                    shipment.status.label(),
                    styles::shipment_status_style(shipment.status),
                )),
                Cell::from(shipment.carrier.as_str()),
                Cell::from(format_optional_date(&shipment.estimated_arrival)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(14),
    ];

    let filter = match app.shipment_status_filter {
        Some(status) => status.label(),
        None => "all",
    };
    let title = format!(
        " Shipments ({}) - [f]ilter: {} ",
        app.shipments.len(),
        filter
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.shipment_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_shipment_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let selected = app.shipments.get(app.shipment_selection);

    let content = match selected {
        Some(shipment) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled(
                        shipment.tracking_number.clone(),
                        styles::title_style(),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        shipment.status.label(),
                        styles::shipment_status_style(shipment.status),
                    ),
                ]),
                Line::from(""),
                detail_line("Type:      ", shipment.shipment_type.label().to_string()),
                detail_line("Carrier:   ", shipment.carrier.clone()),
                detail_line(
                    "ETA:       ",
                    format_optional_date(&shipment.estimated_arrival),
                ),
                detail_line(
                    "Arrived:   ",
                    format_optional_date(&shipment.actual_arrival),
                ),
                detail_line(
                    "Created:   ",
                    format_optional_date(&shipment.created_at),
                ),
            ];

            if let Some(ref user) = shipment.created_by {
                lines.push(detail_line("By:        ", user.display_name()));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(
                    "Items ({} lines, {} units, {})",
                    shipment.items.len(),
                    shipment.total_units(),
                    format_money(shipment.total_value()),
                ),
                styles::title_style(),
            )));

            for line in &shipment.items {
                let price = line
                    .unit_price_value()
                    .map(format_money)
                    .unwrap_or_else(|| line.unit_price.clone());
                lines.push(Line::from(vec![
                    Span::styled(format!("item #{:<6}", line.item), styles::muted_style()),
                    Span::raw(format!("{} x {}", line.quantity, price)),
                ]));
            }

            if shipment.status.is_final() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Final status - no further changes",
                    styles::muted_style(),
                )));
            }

            lines
        }
        None => vec![Line::from(Span::styled(
            "No shipment selected",
            styles::muted_style(),
        ))],
    };

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Detail - [s]tatus [d]elete ")
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        );

    frame.render_widget(paragraph, area);
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label.to_string(), styles::muted_style()),
        Span::raw(value),
    ])
}
