/// DataTableWidget - renders one frame of a `TableView`
///
/// Layout, top to bottom: search line, column headers, the optional filter
/// row, a rule, the body and the pagination footer. The body shows exactly
/// one of: skeleton rows, the empty message or the page rows. A fetch error
/// leaves the body as it was; the status bar reports it.
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};
use unicode_width::UnicodeWidthStr;

use crate::config::DisplayConfig;
use crate::formatting::fit_cell;
use crate::table::{Alignment, SortDirection, TableView, ViewColumn, EMPTY_MESSAGE};
use crate::tui::component::ElementWidget;
use crate::tui::components::data_table::{EditTarget, Editing};

/// Width of the selector/expander gutter in front of every row
const GUTTER: usize = 3;
const CELL_SEPARATOR: &str = " │ ";

#[derive(Clone)]
pub struct DataTableWidget {
    pub title: String,
    pub view: TableView,
    pub editing: Option<Editing>,
    pub focused: bool,
}

impl DataTableWidget {
    fn selection_style(&self, config: &DisplayConfig) -> Style {
        if self.focused {
            Style::default().fg(config.selection_fg)
        } else {
            Style::default().fg(config.unfocused_selection_fg())
        }
    }

    fn search_line(&self) -> String {
        let editing_search = matches!(
            self.editing,
            Some(Editing { target: EditTarget::Search, .. })
        );
        let text = match &self.editing {
            Some(Editing { target: EditTarget::Search, buffer }) => buffer.as_str(),
            _ => self.view.search_text.as_str(),
        };
        let cursor = if editing_search { "_" } else { "" };
        let pending = if self.view.search_pending { " …" } else { "" };
        format!("{}  Search: {}{}{}", self.title, text, cursor, pending)
    }

    fn header_cells(&self) -> Vec<String> {
        self.view
            .columns
            .iter()
            .map(|column| {
                let mark = match column.sort {
                    Some(SortDirection::Asc) => " ▲",
                    Some(SortDirection::Desc) => " ▼",
                    None => "",
                };
                fit_cell(&format!("{}{}", column.header, mark), column.width, column.align)
            })
            .collect()
    }

    fn filter_cells(&self) -> Vec<String> {
        self.view
            .columns
            .iter()
            .map(|column| {
                let mut text = match &self.editing {
                    Some(Editing { target: EditTarget::Filter(id), buffer }) if *id == column.id => {
                        format!("{}_", buffer)
                    }
                    _ => column.filter.clone(),
                };
                if column.filter_pending {
                    text.push('*');
                }
                fit_cell(&text, column.width, Alignment::Left)
            })
            .collect()
    }

    fn rule(&self, config: &DisplayConfig) -> String {
        let horizontal = &config.box_chars.horizontal;
        let junction = format!("{}{}{}", horizontal, config.box_chars.cross, horizontal);
        let cells: Vec<String> = self
            .view
            .columns
            .iter()
            .map(|c| horizontal.repeat(c.width))
            .collect();
        format!("{}{}", horizontal.repeat(GUTTER), cells.join(&junction))
    }

    /// Body lines with their styles; the index of the focused row's line
    /// comes back for scrolling
    fn body_lines(&self, height: usize, config: &DisplayConfig) -> (Vec<(String, Style)>, usize) {
        let plain = Style::default();
        if self.view.skeleton {
            let dim = plain.fg(Color::DarkGray);
            let cells: Vec<String> = self
                .view
                .columns
                .iter()
                .map(|c| config.box_chars.skeleton.repeat(c.width))
                .collect();
            let line = format!("{}{}", " ".repeat(GUTTER), cells.join(CELL_SEPARATOR));
            let count = self.view.page_size.min(height);
            return (vec![(line, dim); count], 0);
        }
        if self.view.empty {
            return (vec![(EMPTY_MESSAGE.to_string(), plain)], 0);
        }

        let mut lines = Vec::new();
        let mut focused_line = 0;
        for (i, row) in self.view.rows.iter().enumerate() {
            let is_focused = i == self.view.focused_row;
            if is_focused {
                focused_line = lines.len();
            }
            let selector = if is_focused {
                config.box_chars.selector.as_str()
            } else {
                " "
            };
            let expander = match (row.expandable, row.expanded.is_some()) {
                (false, _) => " ",
                (true, false) => "+",
                (true, true) => "-",
            };
            let cells: Vec<String> = row
                .cells
                .iter()
                .zip(&self.view.columns)
                .map(|(cell, column)| fit_cell(&cell.display_text(), column.width, column.align))
                .collect();
            let style = if is_focused {
                self.selection_style(config)
            } else {
                plain
            };
            lines.push((format!("{}{} {}", selector, expander, cells.join(CELL_SEPARATOR)), style));
            if let Some(expanded) = &row.expanded {
                lines.push((format!("{}{}", " ".repeat(GUTTER + 2), expanded), plain.add_modifier(Modifier::ITALIC)));
            }
        }
        (lines, focused_line)
    }

    fn footer_segments(&self, config: &DisplayConfig) -> Vec<(String, Style)> {
        let controls = &self.view.controls;
        let enabled = Style::default();
        let disabled = Style::default().fg(Color::DarkGray);
        let pick = |on: bool| if on { enabled } else { disabled };
        vec![
            ("« ".to_string(), pick(controls.can_first)),
            ("‹ ".to_string(), pick(controls.can_prev)),
            (controls.label(), enabled.fg(config.header_fg)),
            (" ›".to_string(), pick(controls.can_next)),
            (" »".to_string(), pick(controls.can_last)),
            (
                format!(
                    "   {} rows · {} per page",
                    controls.total_rows, self.view.page_size
                ),
                enabled,
            ),
        ]
    }

    fn render_cells(
        &self,
        buf: &mut Buffer,
        area: Rect,
        y: u16,
        cells: &[String],
        base: Style,
        focus_style: Style,
    ) {
        let mut x = area.x + GUTTER as u16;
        let right = area.x + area.width;
        for (i, cell) in cells.iter().enumerate() {
            if x >= right {
                break;
            }
            if i > 0 {
                let (next_x, _) = buf.set_stringn(x, y, CELL_SEPARATOR, (right - x) as usize, base);
                x = next_x;
                if x >= right {
                    break;
                }
            }
            let style = if i == self.view.focused_column { focus_style } else { base };
            let (next_x, _) = buf.set_stringn(x, y, cell, (right - x) as usize, style);
            x = next_x;
        }
    }
}

fn column_span(columns: &[ViewColumn]) -> usize {
    columns.iter().map(|c| c.width).sum::<usize>()
        + CELL_SEPARATOR.width() * columns.len().saturating_sub(1)
}

impl ElementWidget for DataTableWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        if area.width == 0 || area.height < 4 {
            return;
        }
        let width = area.width as usize;
        let bottom = area.y + area.height;
        let mut y = area.y;

        buf.set_stringn(area.x, y, self.search_line(), width, Style::default());
        y += 1;

        let header_style = Style::default().fg(config.header_fg).add_modifier(Modifier::BOLD);
        self.render_cells(
            buf,
            area,
            y,
            &self.header_cells(),
            header_style,
            self.selection_style(config).add_modifier(Modifier::BOLD),
        );
        y += 1;

        if self.view.show_filters && y < bottom {
            self.render_cells(
                buf,
                area,
                y,
                &self.filter_cells(),
                Style::default().fg(Color::Gray),
                self.selection_style(config),
            );
            y += 1;
        }

        if y < bottom {
            buf.set_stringn(area.x, y, self.rule(config), width, Style::default());
            y += 1;
        }

        let footer_y = bottom - 1;
        let body_height = footer_y.saturating_sub(y) as usize;
        let (lines, focused_line) = self.body_lines(body_height, config);
        let start = if focused_line >= body_height {
            focused_line + 1 - body_height
        } else {
            0
        };
        let body_width = if self.view.empty {
            (GUTTER + column_span(&self.view.columns)).min(width)
        } else {
            width
        };
        for (text, style) in lines.iter().skip(start).take(body_height) {
            let text = if self.view.empty {
                fit_cell(text, body_width, Alignment::Center)
            } else {
                text.clone()
            };
            buf.set_stringn(area.x, y, &text, width, *style);
            y += 1;
        }

        let mut x = area.x;
        for (text, style) in self.footer_segments(config) {
            if x >= area.x + area.width {
                break;
            }
            let remaining = (area.x + area.width - x) as usize;
            let (next_x, _) = buf.set_stringn(x, footer_y, &text, remaining, style);
            x = next_x;
        }
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }
}
