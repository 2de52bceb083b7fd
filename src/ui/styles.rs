use ratatui::style::{Color, Modifier, Style};

use crate::models::{ShipmentStatus, ShipmentType};

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn warning_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

/// Status badge colors: pending yellow, in transit blue, delivered green,
/// cancelled red.
pub fn shipment_status_style(status: ShipmentStatus) -> Style {
    match status {
        ShipmentStatus::Pending => Style::default().fg(ACCENT),
        ShipmentStatus::InTransit => Style::default().fg(PRIMARY),
        ShipmentStatus::Delivered => Style::default().fg(SECONDARY),
        ShipmentStatus::Cancelled => Style::default().fg(ERROR),
    }
}

/// Incoming shipments green, outgoing blue.
pub fn shipment_type_style(shipment_type: ShipmentType) -> Style {
    match shipment_type {
        ShipmentType::Incoming => Style::default().fg(SECONDARY),
        ShipmentType::Outgoing => Style::default().fg(PRIMARY),
    }
}
