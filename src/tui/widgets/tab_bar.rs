/// TabBar widget - one tab per report kind
///
/// Renders the tab labels separated by vertical bars, with a rule below
/// whose junctions line up with the separators. The selected tab is
/// highlighted; the whole bar dims while focus is on the content.
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
};
use unicode_width::UnicodeWidthStr;

use crate::config::DisplayConfig;
use crate::tui::component::ElementWidget;
use crate::tui::types::Tab;
use crate::types::ReportKind;

#[derive(Debug, Clone)]
pub struct TabBar {
    pub current: Tab,
    /// Whether the tab bar is focused (affects styling)
    pub focused: bool,
}

impl TabBar {
    pub fn new(current: Tab, focused: bool) -> Self {
        Self { current, focused }
    }

    fn base_style(&self) -> Style {
        if self.focused {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn tab_style(&self, tab: ReportKind, config: &DisplayConfig) -> Style {
        if tab != self.current {
            return self.base_style();
        }
        if self.focused {
            self.base_style().fg(config.selection_fg)
        } else {
            self.base_style().fg(config.unfocused_selection_fg())
        }
    }

    fn tab_segments(&self, config: &DisplayConfig) -> Vec<(String, Style)> {
        let separator = format!(" {} ", config.box_chars.vertical);
        let mut segments = Vec::new();
        for (i, tab) in ReportKind::all().into_iter().enumerate() {
            if i > 0 {
                segments.push((separator.clone(), self.base_style()));
            }
            segments.push((tab.label().to_string(), self.tab_style(tab, config)));
        }
        segments
    }

    fn separator_line(&self, width: usize, config: &DisplayConfig) -> String {
        let horizontal = &config.box_chars.horizontal;
        let mut line = String::new();
        let mut pos = 0;
        for (i, tab) in ReportKind::all().into_iter().enumerate() {
            if i > 0 {
                line.push_str(horizontal);
                line.push_str(&config.box_chars.bottom_junction);
                line.push_str(horizontal);
                pos += 3;
            }
            let tab_width = tab.label().width();
            line.push_str(&horizontal.repeat(tab_width));
            pos += tab_width;
        }
        if pos < width {
            line.push_str(&horizontal.repeat(width - pos));
        }
        line
    }
}

impl ElementWidget for TabBar {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        if area.width == 0 || area.height < 2 {
            return;
        }
        let right = area.x + area.width;
        let mut x = area.x;
        for (text, style) in self.tab_segments(config) {
            if x >= right {
                break;
            }
            let (next_x, _) = buf.set_stringn(x, area.y, &text, (right - x) as usize, style);
            x = next_x;
        }
        buf.set_stringn(
            area.x,
            area.y + 1,
            self.separator_line(area.width as usize, config),
            area.width as usize,
            self.base_style(),
        );
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(2) // Tab line + separator line
    }
}
