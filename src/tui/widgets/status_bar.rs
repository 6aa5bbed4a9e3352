/// StatusBar widget - status message and context hint at the bottom
///
/// Two lines: a rule with a junction above the divider, then the message
/// on the left and the hint on the right of a vertical bar. Error messages
/// use the error color.
use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use unicode_width::UnicodeWidthStr;

use crate::config::DisplayConfig;
use crate::tui::component::ElementWidget;

#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    pub message: String,
    pub is_error: bool,
    /// Right-hand text (current list mode, save progress)
    pub hint: String,
}

impl StatusBar {
    pub fn new(message: impl Into<String>, is_error: bool, hint: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error,
            hint: hint.into(),
        }
    }

    /// Column of the vertical divider: leaves room for the hint plus margins
    fn bar_position(&self, width: u16) -> u16 {
        width.saturating_sub(self.hint.width() as u16 + 3)
    }
}

impl ElementWidget for StatusBar {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        if area.width == 0 || area.height < 2 {
            return;
        }
        let width = area.width as usize;
        let bar = self.bar_position(area.width);

        let separator = format!(
            "{}{}{}",
            config.box_chars.horizontal.repeat(bar as usize),
            config.box_chars.top_junction,
            config
                .box_chars
                .horizontal
                .repeat(width.saturating_sub(bar as usize + 1))
        );
        buf.set_stringn(area.x, area.y, separator, width, Style::default());

        let y = area.y + 1;
        let style = if self.is_error {
            Style::default().fg(config.error_fg)
        } else {
            Style::default()
        };
        let message_width = (bar as usize).saturating_sub(1);
        if message_width > 0 {
            buf.set_stringn(area.x + 1, y, &self.message, message_width.saturating_sub(1), style);
        }
        buf.set_stringn(
            area.x + bar,
            y,
            format!("{} {}", config.box_chars.vertical, self.hint),
            width.saturating_sub(bar as usize),
            Style::default(),
        );
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(2)
    }
}
