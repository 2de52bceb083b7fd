//! Dashboard tab: aggregate statistics, shipment activity and low stock.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::models::ShipmentType;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stat boxes
            Constraint::Length(4), // Shipment activity
            Constraint::Min(5),    // Top items / low stock
        ])
        .split(area);

    render_stats(frame, app, chunks[0]);
    render_activity(frame, app, chunks[1]);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    render_top_items(frame, app, lower[0]);
    render_low_stock(frame, app, lower[1]);
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let stats = [
        ("Items", app.inventory.len().to_string(), styles::title_style()),
        ("Low Stock", app.low_stock.len().to_string(), styles::warning_style()),
        (
            "Outstanding",
            app.outstanding_shipments().to_string(),
            styles::highlight_style(),
        ),
        ("Categories", app.categories.len().to_string(), styles::success_style()),
    ];

    for (i, (label, value, style)) in stats.iter().enumerate() {
        let line = Line::from(vec![
            Span::styled(format!(" {}: ", label), styles::muted_style()),
            Span::styled(value.clone(), *style),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::muted_style());
        frame.render_widget(Paragraph::new(line).block(block), chunks[i]);
    }
}

fn render_activity(frame: &mut Frame, app: &App, area: Rect) {
    let incoming = app.dashboard.activity_count(ShipmentType::Incoming);
    let outgoing = app.dashboard.activity_count(ShipmentType::Outgoing);
    let total = (incoming + outgoing).max(1);

    let block = Block::default()
        .title(" Shipment Activity (30 days) ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::muted_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let incoming_gauge = Gauge::default()
        .label(format!("Incoming {}", incoming))
        .ratio(incoming as f64 / total as f64)
        .gauge_style(styles::success_style());
    frame.render_widget(incoming_gauge, rows[0]);

    let outgoing_gauge = Gauge::default()
        .label(format!("Outgoing {}", outgoing))
        .ratio(outgoing as f64 / total as f64)
        .gauge_style(styles::title_style());
    frame.render_widget(outgoing_gauge, rows[1]);
}

fn render_top_items(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new([
        Cell::from("Item"),
        Cell::from("Qty"),
        Cell::from("Min"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .dashboard
        .top_items
        .iter()
        .map(|item| {
            let style = if item.quantity <= item.minimum_stock {
                styles::warning_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(item.name.as_str()),
                Cell::from(item.quantity.to_string()),
                Cell::from(item.minimum_stock.to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Top Items ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::muted_style()),
    );

    frame.render_widget(table, area);
}

fn render_low_stock(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new([
        Cell::from("Item"),
        Cell::from("SKU"),
        Cell::from("Qty"),
        Cell::from("Min"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .low_stock
        .iter()
        .map(|item| {
            Row::new(vec![
                Cell::from(item.name.as_str()),
                Cell::from(item.sku.as_str()),
                Cell::from(item.quantity.to_string()),
                Cell::from(item.minimum_stock.to_string()),
            ])
            .style(styles::warning_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let title = format!(" Low Stock ({}) ", app.low_stock.len());
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::muted_style()),
    );

    frame.render_widget(table, area);
}
