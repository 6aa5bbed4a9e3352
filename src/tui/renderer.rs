use ratatui::{
    buffer::Buffer,
    layout::{Constraint as RatatuiConstraint, Direction, Layout as RatatuiLayout, Rect},
};

use super::component::{Constraint, ContainerLayout, Element};
use crate::config::DisplayConfig;

/// Renders virtual element tree to ratatui buffer
///
/// Containers split their area with ratatui's layout engine and hand one
/// chunk to each child; widgets draw themselves into their chunk.
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Render an element tree to the given area in the buffer
    pub fn render(&self, element: &Element, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        match element {
            Element::Widget(widget) => widget.render(area, buf, config),
            Element::Container { children, layout } => {
                let chunks = self.calculate_layout(layout, area);
                for (child, chunk) in children.iter().zip(chunks) {
                    self.render(child, chunk, buf, config);
                }
            }
            Element::None => {}
        }
    }

    /// Calculate layout constraints and split the area
    fn calculate_layout(&self, layout: &ContainerLayout, area: Rect) -> Vec<Rect> {
        let (direction, constraints) = match layout {
            ContainerLayout::Vertical(constraints) => (Direction::Vertical, constraints),
            ContainerLayout::Horizontal(constraints) => (Direction::Horizontal, constraints),
        };

        RatatuiLayout::default()
            .direction(direction)
            .constraints(constraints.iter().map(|c| convert_constraint(*c)))
            .split(area)
            .to_vec()
    }
}

fn convert_constraint(constraint: Constraint) -> RatatuiConstraint {
    match constraint {
        Constraint::Length(n) => RatatuiConstraint::Length(n),
        Constraint::Min(n) => RatatuiConstraint::Min(n),
        Constraint::Max(n) => RatatuiConstraint::Max(n),
        Constraint::Percentage(n) => RatatuiConstraint::Percentage(n),
    }
}
