use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use super::action::Action;
use super::component::{Component, Effect, Element};
use super::component_store::ComponentStateStore;
use super::components::{App, AppProps};
use super::effects::DataEffects;
use super::reducer::reduce;
use super::state::AppState;

/// Component runtime - manages component lifecycle and action processing
///
/// The Runtime is responsible for:
/// - Managing the application state
/// - Managing component state instances
/// - Dispatching actions through the reducer
/// - Executing side effects asynchronously
/// - Building the virtual component tree
pub struct Runtime {
    /// Current application state
    state: AppState,

    /// Component state storage for lifecycle management
    component_states: ComponentStateStore,

    /// Channel for dispatching actions
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,

    /// Channel for queuing effects
    effect_tx: mpsc::UnboundedSender<Effect>,

    /// Data effects handler
    data_effects: Arc<DataEffects>,
}

impl Runtime {
    /// Create a new runtime with initial state and data effects handler
    pub fn new(initial_state: AppState, data_effects: Arc<DataEffects>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (effect_tx, mut effect_rx) = mpsc::unbounded_channel();

        // Spawn effect executor task
        let action_tx_clone = action_tx.clone();
        tokio::spawn(async move {
            Self::run_effect_executor(&mut effect_rx, action_tx_clone).await;
        });

        Self {
            state: initial_state,
            component_states: ComponentStateStore::new(),
            action_tx,
            action_rx,
            effect_tx,
            data_effects,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn component_states(&self) -> &ComponentStateStore {
        &self.component_states
    }

    /// Dispatch an action to be processed by the reducer
    ///
    /// Uses mem::take to avoid cloning AppState.
    pub fn dispatch(&mut self, action: Action) {
        if !action.is_tick() {
            trace!("ACTION: Dispatching {:?}", action);
        }
        let state = std::mem::take(&mut self.state);
        let (new_state, effect) = reduce(state, action, &mut self.component_states);
        self.state = new_state;
        self.execute_effect(effect);
    }

    /// Turn fetch variants into async work and queue the rest
    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::FetchList { kind, query } => {
                debug!("EFFECT: Executing list fetch for {}", kind);
                let _ = self.effect_tx.send(self.data_effects.fetch_list(kind, query));
            }
            Effect::FetchReport { kind, id } => {
                debug!("EFFECT: Executing report fetch for {} {}", kind, id);
                let _ = self.effect_tx.send(self.data_effects.fetch_report(kind, id));
            }
            Effect::SaveReport(report) => {
                let _ = self.effect_tx.send(self.data_effects.save_report(*report));
            }
            Effect::Batch(effects) => {
                for e in effects {
                    self.execute_effect(e);
                }
            }
            Effect::Action(_) | Effect::Async(_) => {
                trace!("ACTION: Queueing effect for async execution");
                let _ = self.effect_tx.send(effect);
            }
        }
    }

    /// Process all pending actions in the queue
    ///
    /// Returns the number of actions processed
    pub fn process_actions(&mut self) -> usize {
        let mut count = 0;
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action);
            count += 1;
        }
        count
    }

    /// Build the virtual element tree from current state
    pub fn build(&mut self, now: Instant) -> Element {
        let props = AppProps::build(&self.state, &mut self.component_states, now);
        App.view(&props, &())
    }

    /// Get a sender for dispatching actions from external sources
    pub fn action_sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Execute effects asynchronously
    ///
    /// Runs in its own task; finished effects feed actions back into the
    /// runtime's queue.
    async fn run_effect_executor(
        effect_rx: &mut mpsc::UnboundedReceiver<Effect>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) {
        while let Some(effect) = effect_rx.recv().await {
            Self::process_effect_async(effect, &action_tx);
        }
    }

    fn process_effect_async(effect: Effect, action_tx: &mpsc::UnboundedSender<Action>) {
        match effect {
            Effect::None => {}
            Effect::Action(action) => {
                let _ = action_tx.send(action);
            }
            Effect::Batch(effects) => {
                for e in effects {
                    Self::process_effect_async(e, action_tx);
                }
            }
            Effect::Async(future) => {
                let action_tx = action_tx.clone();
                tokio::spawn(async move {
                    let action = future.await;
                    let _ = action_tx.send(action);
                });
            }
            // Handled by execute_effect() before queueing
            Effect::FetchList { .. } | Effect::FetchReport { .. } | Effect::SaveReport(_) => {
                warn!("Fetch effect reached async executor - this should be handled by execute_effect()");
            }
        }
    }
}
