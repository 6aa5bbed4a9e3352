pub mod action;
pub mod component;
pub mod component_store;
pub mod components;
pub mod effects;
pub mod error;
pub mod keys;
pub mod reducer;
pub mod reducers;
pub mod renderer;
pub mod runtime;
pub mod state;
pub mod types;
pub mod widgets;

#[cfg(test)]
pub mod testing;

pub use action::Action;
pub use component::{Component, Effect, Element};
pub use effects::DataEffects;
pub use error::{TuiError, TuiResult};
pub use keys::{key_to_action, mouse_to_action};
pub use reducer::reduce;
pub use renderer::Renderer;
pub use runtime::Runtime;
pub use state::AppState;
pub use types::{Panel, Tab};

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::Config;
use crate::data_provider::ReportProvider;

/// Main entry point for TUI mode
pub async fn run(client: Arc<dyn ReportProvider>, config: Config) -> TuiResult<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let data_effects = Arc::new(DataEffects::new(client));
    let mut runtime = Runtime::new(AppState::new(config), data_effects);
    let renderer = Renderer::new();

    // Initial load of the first tab
    runtime.dispatch(Action::RefreshList);

    let result = event_loop(&mut terminal, &mut runtime, &renderer);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &mut Runtime,
    renderer: &Renderer,
) -> TuiResult<()> {
    loop {
        // Process any actions from effects FIRST (so data loads trigger re-render)
        let actions_processed = runtime.process_actions();
        if actions_processed > 0 {
            tracing::debug!("LOOP: Processed {} actions", actions_processed);
        }

        terminal.draw(|f| {
            let area = f.area();
            let element = runtime.build(Instant::now());
            let config = &runtime.state().system.config.display;
            renderer.render(&element, area, f.buffer_mut(), config);
        })?;

        if actions_processed > 0 {
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let action = match event::read()? {
                Event::Key(key) => {
                    key_to_action(key, runtime.state(), runtime.component_states(), Instant::now())
                }
                Event::Mouse(mouse) => mouse_to_action(mouse, runtime.state()),
                _ => None,
            };

            if let Some(action) = action {
                if matches!(action, Action::Quit) {
                    runtime.dispatch(action);
                    tracing::debug!("ACTION: Quitting application");
                    return Ok(());
                }
                runtime.dispatch(action);
                continue;
            }
        }

        // Debouncers and loading windows advance on the idle tick
        runtime.dispatch(Action::Tick(Instant::now()));
    }
}
