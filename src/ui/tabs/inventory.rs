//! Inventory tab: item table with a detail pane and shipment history.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::format::{format_optional_date, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_item_list(frame, app, chunks[0]);
    render_item_detail(frame, app, chunks[1]);
}

fn render_item_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("SKU"),
        Cell::from("Qty"),
        Cell::from("Location"),
        Cell::from("Category"),
    ])
    .style(styles::title_style())
    .height(1);

    let items = app.sorted_inventory();

    let rows: Vec<Row> = items
        .iter()
        .map(|item| {
            let style = if item.is_low_stock() {
                styles::warning_style()
            } else {
                styles::list_item_style()
            };
            let qty = if item.is_low_stock() {
                format!("{} !", item.quantity)
            } else {
                item.quantity.to_string()
            };
            Row::new(vec![
                Cell::from(truncate_string(&item.name, 32)),
                Cell::from(item.sku.as_str()),
                Cell::from(qty),
                Cell::from(item.location.as_str()),
                Cell::from(item.category.as_str()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Length(7),
        Constraint::Length(14),
        Constraint::Length(14),
    ];

    let sort = format!(
        "sort: {} {}",
        app.inventory_sort_column.title(),
        if app.inventory_sort_ascending { "^" } else { "v" }
    );
    let title = format!(" Inventory ({}) - {} ", items.len(), sort);

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
    state.select(Some(app.inventory_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_item_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let items = app.sorted_inventory();
    let selected = items.get(app.inventory_selection).copied();

    let content = match selected {
        Some(item) => {
            let mut lines = vec![
                Line::from(Span::styled(item.name.clone(), styles::title_style())),
                Line::from(""),
                detail_line("SKU:        ", item.sku.clone()),
                detail_line("Quantity:   ", item.quantity.to_string()),
                detail_line("Min stock:  ", item.minimum_stock.to_string()),
                detail_line("Location:   ", item.location.clone()),
                detail_line("Category:   ", item.category.clone()),
                detail_line("Updated:    ", format_optional_date(&item.updated_at)),
            ];

            if let Some(ref user) = item.last_updated_by {
                lines.push(detail_line("Updated by: ", user.display_name()));
            }

            if item.is_low_stock() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Below minimum stock",
                    styles::warning_style(),
                )));
            }

            if !item.description.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    item.description.clone(),
                    styles::muted_style(),
                )));
            }

            // Shipment history, once loaded via [h]
            if let Some(ref history) = app.item_history {
                if history.item_id == item.id {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        format!(
                            "History for {} ({} shipments)",
                            history.item_name,
                            history.shipments.len()
                        ),
                        styles::title_style(),
                    )));
                    for shipment in history.shipments.iter().take(10) {
                        lines.push(Line::from(vec![
                            Span::styled(
                                format!("{:<9}", shipment.shipment_type.label()),
                                styles::shipment_type_style(shipment.shipment_type),
                            ),
                            Span::styled(
                                format!("{:<11}", shipment.status.label()),
                                styles::shipment_status_style(shipment.status),
                            ),
                            Span::raw(shipment.tracking_number.clone()),
                        ]));
                    }
                }
            }

            lines
        }
        None => vec![Line::from(Span::styled(
            "No item selected",
            styles::muted_style(),
        ))],
    };

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Detail - [a]dd [e]dit [d]elete [h]istory ")
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
