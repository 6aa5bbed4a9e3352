use crate::config::PrintConfig;
use crate::formatting::BoxChars;
use crate::report::render::{render_page_with_stamp, STAMP_LABEL};
use crate::report::ReportDocument;
use crate::tui::component::{Component, Element};
use crate::tui::state::PreviewState;
use crate::tui::types::Panel;
use crate::tui::widgets::ReportPageWidget;
use crate::types::AnyReport;

/// Print preview of the report on top of the panel stack
pub struct ReportPreview;

#[derive(Clone, Debug)]
pub struct ReportPreviewProps {
    pub preview: PreviewState,
    pub report: Option<AnyReport>,
    pub print: PrintConfig,
    pub box_chars: BoxChars,
}

/// One laid-out preview page
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame {
    pub document: ReportDocument,
    pub page_index: usize,
    pub lines: Vec<String>,
    /// Line of the stamp; only the last page has one
    pub stamp_line: Option<usize>,
}

impl PreviewFrame {
    pub fn is_last_page(&self) -> bool {
        self.page_index == self.document.last_page()
    }
}

/// Lay out `report` and render the page the preview is on
///
/// The stamp is drawn at the drag offset rather than the stored one, so it
/// follows the pointer while being dragged.
pub fn preview_frame(
    report: &AnyReport,
    preview: &PreviewState,
    print: &PrintConfig,
    box_chars: &BoxChars,
) -> PreviewFrame {
    let document = ReportDocument::build(report, print);
    let page_index = preview.page_index.min(document.last_page());
    let (lines, stamp_line) = match document.pages.get(page_index) {
        Some(page) => {
            let stamp_x = page
                .stamp_x
                .map(|stored| preview.drag.map_or(stored, |d| d.offset()));
            let lines = render_page_with_stamp(&document, page, box_chars, stamp_x);
            let stamp_line = stamp_x.and_then(|_| lines.iter().position(|l| l.trim() == STAMP_LABEL));
            (lines, stamp_line)
        }
        None => (Vec::new(), None),
    };
    PreviewFrame {
        document,
        page_index,
        lines,
        stamp_line,
    }
}

impl Component for ReportPreview {
    type Props = ReportPreviewProps;
    type State = ();

    fn init(_props: &Self::Props) -> Self::State {}

    fn view(&self, props: &Self::Props, _state: &Self::State) -> Element {
        let preview = &props.preview;
        let label = Panel::Preview {
            kind: preview.kind,
            id: preview.id,
        }
        .label();

        let widget = match (&props.report, &preview.error) {
            (_, Some(error)) => ReportPageWidget {
                heading: label,
                placeholder: Some(error.clone()),
                is_error: true,
                ..ReportPageWidget::default()
            },
            (None, None) => ReportPageWidget {
                heading: label,
                placeholder: Some("Loading report...".to_string()),
                ..ReportPageWidget::default()
            },
            (Some(report), None) => {
                let frame = preview_frame(report, preview, &props.print, &props.box_chars);
                let mut heading = format!(
                    "{} · {}  Page {} of {}",
                    label,
                    report.header().report_no,
                    frame.page_index + 1,
                    frame.document.page_count()
                );
                if preview.saving {
                    heading.push_str("  saving...");
                } else if frame.stamp_line.is_some() {
                    heading.push_str("  drag the stamp to move it");
                }
                ReportPageWidget {
                    heading,
                    lines: frame.lines,
                    scroll: preview.scroll,
                    stamp_line: frame.stamp_line,
                    dragging: preview.drag.is_some_and(|d| d.is_dragging()),
                    placeholder: None,
                    is_error: false,
                }
            }
        };
        Element::Widget(Box::new(widget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::report::render::stamp_column;
    use crate::report::{PointerEvent, StampDrag};
    use crate::tui::testing::buffer_lines;
    use crate::tui::widgets::testing::render_widget;
    use crate::types::ReportKind;

    fn props(report: Option<AnyReport>, preview: PreviewState) -> ReportPreviewProps {
        ReportPreviewProps {
            preview,
            report,
            print: PrintConfig::default(),
            box_chars: BoxChars::unicode(),
        }
    }

    fn earth_report(pits: usize) -> AnyReport {
        AnyReport::EarthTest(fixtures::earth_test_report(7, &fixtures::earth_locations(pits)))
    }

    fn render(element: Element, height: u16) -> Vec<String> {
        match element {
            Element::Widget(widget) => buffer_lines(&render_widget(widget.as_ref(), 140, height)),
            _ => panic!("preview renders a single widget"),
        }
    }

    #[test]
    fn test_stamp_only_on_last_page() {
        let report = earth_report(60);
        let print = PrintConfig::default();
        let mut preview = PreviewState::new(ReportKind::EarthTest, 7);

        let first = preview_frame(&report, &preview, &print, &BoxChars::unicode());
        assert!(first.document.page_count() > 1);
        assert_eq!(first.stamp_line, None);
        assert!(!first.is_last_page());

        preview.page_index = 99;
        let last = preview_frame(&report, &preview, &print, &BoxChars::unicode());
        assert!(last.is_last_page());
        assert!(last.stamp_line.is_some());
    }

    #[test]
    fn test_stamp_follows_drag_offset() {
        let report = earth_report(3);
        let print = PrintConfig::default();
        let (pw, sw) = (print.page_width_pt, print.stamp_width_pt);
        let mut preview = PreviewState::new(ReportKind::EarthTest, 7);
        let (drag, _) = StampDrag::new(0.0, pw, sw).reduce(PointerEvent::Down { x: 10.0 }, pw, sw);
        let (drag, _) = drag.reduce(PointerEvent::Move { x: 210.0 }, pw, sw);
        preview.drag = Some(drag);

        let frame = preview_frame(&report, &preview, &print, &BoxChars::unicode());
        let line = &frame.lines[frame.stamp_line.unwrap()];
        let column = line.find(STAMP_LABEL).unwrap();
        assert_eq!(column, stamp_column(&frame.document, 200.0));
    }

    #[test]
    fn test_loading_placeholder() {
        let lines = render(
            ReportPreview.view(&props(None, PreviewState::new(ReportKind::Acb, 5)), &()),
            4,
        );
        assert!(lines[0].starts_with("ACB #5"));
        assert!(lines[2].contains("Loading report..."));
    }

    #[test]
    fn test_error_placeholder() {
        let mut preview = PreviewState::new(ReportKind::Acb, 5);
        preview.loading = false;
        preview.error = Some("Report not found".to_string());
        let lines = render(
            ReportPreview.view(&props(Some(fixtures::report(ReportKind::Acb, 5)), preview), &()),
            4,
        );
        assert!(lines[2].contains("Report not found"));
    }

    #[test]
    fn test_heading_names_page() {
        let mut preview = PreviewState::new(ReportKind::EarthTest, 7);
        preview.loading = false;
        let lines = render(ReportPreview.view(&props(Some(earth_report(3)), preview), &()), 6);
        assert!(lines[0].starts_with("Earth Test #7 · EARTH-TEST-0007  Page 1 of 1"));
        assert!(lines[0].contains("drag the stamp"));
    }
}
