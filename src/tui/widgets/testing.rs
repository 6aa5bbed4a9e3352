/// Testing utilities for widget rendering
///
/// Helpers for rendering an `ElementWidget` into a scratch buffer.
use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use crate::config::DisplayConfig;
use crate::formatting::BoxChars;
use crate::tui::component::ElementWidget;

/// DisplayConfig with unicode box characters and fixed colors
pub fn test_config() -> DisplayConfig {
    DisplayConfig {
        use_unicode: true,
        selection_fg: Color::Rgb(255, 200, 0), // Gold
        unfocused_selection_fg: None,
        header_fg: Color::Rgb(159, 226, 191), // Seafoam
        error_fg: Color::Red,
        box_chars: BoxChars::unicode(),
    }
}

/// DisplayConfig with ASCII box characters
pub fn test_config_ascii() -> DisplayConfig {
    DisplayConfig {
        use_unicode: false,
        box_chars: BoxChars::ascii(),
        ..test_config()
    }
}

/// Render a widget with `test_config` and return the buffer
pub fn render_widget(widget: &dyn ElementWidget, width: u16, height: u16) -> Buffer {
    render_widget_with_config(widget, width, height, &test_config())
}

pub fn render_widget_with_config(
    widget: &dyn ElementWidget,
    width: u16,
    height: u16,
    config: &DisplayConfig,
) -> Buffer {
    let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
    widget.render(buf.area, &mut buf, config);
    buf
}
