/// ReportPageWidget - one print page of a report, as text
///
/// A heading line and a rule, then the page lines from `scroll` down, indented
/// by `PAGE_MARGIN`. The stamp line is highlighted and turns to the selection
/// color while it is being dragged.
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};

use crate::config::DisplayConfig;
use crate::report::render::points_per_column;
use crate::report::ReportDocument;
use crate::tui::component::ElementWidget;

/// Columns between the screen edge and the page text
pub const PAGE_MARGIN: u16 = 2;

/// Map a terminal column of the preview onto page points
pub fn pointer_points(doc: &ReportDocument, column: u16) -> f32 {
    column.saturating_sub(PAGE_MARGIN) as f32 * points_per_column(doc)
}

#[derive(Debug, Clone, Default)]
pub struct ReportPageWidget {
    pub heading: String,
    pub lines: Vec<String>,
    pub scroll: u16,
    /// Index into `lines` of the stamp, on the last page only
    pub stamp_line: Option<usize>,
    pub dragging: bool,
    /// Shown instead of the page while nothing can be rendered
    pub placeholder: Option<String>,
    pub is_error: bool,
}

impl ElementWidget for ReportPageWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        if area.width == 0 || area.height < 2 {
            return;
        }
        let width = area.width as usize;
        buf.set_stringn(
            area.x,
            area.y,
            &self.heading,
            width,
            Style::default().fg(config.header_fg).add_modifier(Modifier::BOLD),
        );
        buf.set_stringn(
            area.x,
            area.y + 1,
            config.box_chars.horizontal.repeat(width),
            width,
            Style::default(),
        );

        let body_y = area.y + 2;
        let body_height = area.height.saturating_sub(2) as usize;
        if let Some(placeholder) = &self.placeholder {
            let style = if self.is_error {
                Style::default().fg(config.error_fg)
            } else {
                Style::default()
            };
            if body_height > 0 {
                buf.set_stringn(area.x + PAGE_MARGIN, body_y, placeholder, width.saturating_sub(PAGE_MARGIN as usize), style);
            }
            return;
        }

        let text_x = area.x + PAGE_MARGIN.min(area.width);
        let text_width = width.saturating_sub(PAGE_MARGIN as usize);
        for (row, (i, line)) in self
            .lines
            .iter()
            .enumerate()
            .skip(self.scroll as usize)
            .take(body_height)
            .enumerate()
        {
            let style = match self.stamp_line {
                Some(stamp) if stamp == i && self.dragging => {
                    Style::default().fg(config.selection_fg).add_modifier(Modifier::BOLD)
                }
                Some(stamp) if stamp == i => Style::default().fg(config.header_fg),
                _ => Style::default(),
            };
            buf.set_stringn(text_x, body_y + row as u16, line, text_width, style);
        }
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }
}
