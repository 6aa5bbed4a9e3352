//! General test utilities for TUI tests.
//!
//! For widget-specific rendering helpers, see `crate::tui::widgets::testing`.

use std::sync::Arc;

use ratatui::buffer::Buffer;

use crate::config::Config;
use crate::data_provider::ReportProvider;
use crate::dev::mock_client::MockClient;
use crate::tui::state::AppState;

/// Mock provider behind the trait object the runtime expects
pub fn create_client() -> Arc<dyn ReportProvider> {
    Arc::new(MockClient::new())
}

/// State with default config and the tab bar focused
pub fn create_state() -> AppState {
    AppState::new(Config::default())
}

/// Helper to extract lines from buffer
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area();
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buf[(area.x + x, area.y + y)].symbol())
                .collect::<String>()
        })
        .collect()
}

/// Helper for buffer assertions
pub fn assert_buffer(buf: &Buffer, expected: &[&str]) {
    let actual = buffer_lines(buf);
    let buffer_width = buf.area().width as usize;

    assert_eq!(
        actual.len(),
        expected.len(),
        "Buffer height mismatch: expected {} lines, got {}",
        expected.len(),
        actual.len()
    );
    for (i, expected_line) in expected.iter().enumerate() {
        assert_eq!(
            actual[i].chars().count(),
            buffer_width,
            "Line {} width mismatch: expected {}, got {}",
            i,
            buffer_width,
            actual[i].chars().count()
        );
        assert_eq!(
            actual[i].trim_end(),
            expected_line.trim_end(),
            "Line {} mismatch:\nExpected: '{}'\nActual:   '{}'",
            i,
            expected_line,
            actual[i]
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    #[test]
    fn test_buffer_lines_reads_symbols() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 2));
        buf.set_string(0, 1, "ab", ratatui::style::Style::default());
        assert_eq!(buffer_lines(&buf), vec!["    ".to_string(), "ab  ".to_string()]);
    }

    #[test]
    fn test_create_client_is_shared() {
        let client = create_client();
        let other = Arc::clone(&client);
        assert_eq!(Arc::strong_count(&other), 2);
    }
}
