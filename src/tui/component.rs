use ratatui::{buffer::Buffer, layout::Rect};
use std::future::Future;
use std::pin::Pin;

use super::action::Action;
use crate::config::DisplayConfig;
use crate::table::ListQuery;
use crate::types::{AnyReport, ReportKind};

/// Core component trait - like React.Component
///
/// Components are the building blocks of the UI. Each component:
/// - Has Props (input data, like React props)
/// - Has State (internal state, kept in the `ComponentStateStore`)
/// - Renders to an Element tree (virtual DOM)
///
/// Messages reach component state through `Action::ComponentMessage`.
pub trait Component: Send {
    /// Props type for this component
    type Props: Clone;

    /// Local state type
    type State: Clone + Send + Sync + 'static;

    /// Create initial state from props (like useState)
    fn init(props: &Self::Props) -> Self::State;

    /// Render component given props and state (pure function)
    fn view(&self, props: &Self::Props, state: &Self::State) -> Element;
}

/// Element in virtual component tree
#[derive(Clone)]
pub enum Element {
    /// A widget that can be directly rendered to ratatui buffer
    Widget(Box<dyn ElementWidget>),

    /// A container with layout and children
    Container {
        children: Vec<Element>,
        layout: ContainerLayout,
    },

    /// Nothing to render
    None,
}

/// Layout for container elements
#[derive(Clone, Debug, PartialEq)]
pub enum ContainerLayout {
    Vertical(Vec<Constraint>),
    Horizontal(Vec<Constraint>),
}

/// Constraint for layout
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Constraint {
    Length(u16),
    Min(u16),
    Max(u16),
    Percentage(u16),
}

/// Side effects returned by reducers and component messages
///
/// Fetch variants are turned into async work by the runtime, which owns the
/// data provider.
pub enum Effect {
    None,
    Action(Action),
    Batch(Vec<Effect>),
    Async(Pin<Box<dyn Future<Output = Action> + Send>>),
    /// Fetch a list: one server page for `Some(query)`, everything for `None`
    FetchList {
        kind: ReportKind,
        query: Option<ListQuery>,
    },
    FetchReport {
        kind: ReportKind,
        id: i64,
    },
    SaveReport(Box<AnyReport>),
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Action(action) => write!(f, "Action({:?})", action),
            Self::Batch(effects) => f.debug_list().entries(effects).finish(),
            Self::Async(_) => write!(f, "Async(..)"),
            Self::FetchList { kind, query } => write!(f, "FetchList({}, {:?})", kind, query),
            Self::FetchReport { kind, id } => write!(f, "FetchReport({}, {})", kind, id),
            Self::SaveReport(report) => write!(f, "SaveReport({}, {:?})", report.kind(), report.id()),
        }
    }
}

/// Trait for widgets that can be wrapped in the Element tree
pub trait ElementWidget: Send + Sync {
    /// Render this widget into the provided buffer
    ///
    /// # Arguments
    ///
    /// * `area` - The rectangular area to render into
    /// * `buf` - The buffer to write to
    /// * `config` - Display configuration (colors, box chars, etc.)
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig);

    /// Clone this widget into a boxed trait object
    fn clone_box(&self) -> Box<dyn ElementWidget>;

    /// Get the preferred height of this widget
    ///
    /// Returns None if the widget can adapt to any height.
    fn preferred_height(&self) -> Option<u16> {
        None
    }
}

impl Clone for Box<dyn ElementWidget> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Helper to create a container with vertical layout
pub fn vertical<const N: usize>(constraints: [Constraint; N], children: Vec<Element>) -> Element {
    Element::Container {
        children,
        layout: ContainerLayout::Vertical(constraints.to_vec()),
    }
}

/// Helper to create a container with horizontal layout
pub fn horizontal<const N: usize>(constraints: [Constraint; N], children: Vec<Element>) -> Element {
    Element::Container {
        children,
        layout: ContainerLayout::Horizontal(constraints.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestWidget;

    impl ElementWidget for TestWidget {
        fn render(&self, _area: Rect, _buf: &mut Buffer, _config: &DisplayConfig) {}

        fn clone_box(&self) -> Box<dyn ElementWidget> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn test_widget_default_preferred_height() {
        assert_eq!(TestWidget.preferred_height(), None);
    }

    #[test]
    fn test_box_element_widget_clone() {
        let widget: Box<dyn ElementWidget> = Box::new(TestWidget);
        let _cloned = widget.clone();
    }

    #[test]
    fn test_vertical_helper() {
        let element = vertical(
            [Constraint::Length(2), Constraint::Min(0)],
            vec![Element::None, Element::None],
        );
        match element {
            Element::Container { children, layout } => {
                assert_eq!(children.len(), 2);
                assert_eq!(
                    layout,
                    ContainerLayout::Vertical(vec![Constraint::Length(2), Constraint::Min(0)])
                );
            }
            _ => panic!("Expected Container element"),
        }
    }

    #[test]
    fn test_horizontal_helper() {
        let element = horizontal([Constraint::Percentage(50)], vec![Element::None]);
        assert!(matches!(
            element,
            Element::Container { layout: ContainerLayout::Horizontal(_), .. }
        ));
    }

    #[test]
    fn test_effect_debug_names_requests() {
        let effect = Effect::FetchReport { kind: ReportKind::Acb, id: 4 };
        assert_eq!(format!("{:?}", effect), "FetchReport(acb, 4)");
        let batch = Effect::Batch(vec![Effect::None, Effect::FetchList { kind: ReportKind::Acb, query: None }]);
        assert_eq!(format!("{:?}", batch), "[None, FetchList(acb, None)]");
    }
}
