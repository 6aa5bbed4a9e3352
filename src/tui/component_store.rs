use std::any::Any;
use std::collections::HashMap;

use crate::tui::component::Component;

/// Stores component states by path for lifecycle management
///
/// Each component instance is identified by a unique path (e.g.
/// "app/acb/table") and keeps its state across renders until removed.
/// Lookups with the wrong state type behave like a missing entry.
#[derive(Default)]
pub struct ComponentStateStore {
    states: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl ComponentStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or initialize component state
    ///
    /// Calls `C::init(props)` when the path is empty or holds another type.
    pub fn get_or_init<C: Component>(&mut self, path: &str, props: &C::Props) -> &mut C::State {
        let entry = self
            .states
            .entry(path.to_string())
            .or_insert_with(|| Box::new(C::init(props)));
        if !(**entry).is::<C::State>() {
            *entry = Box::new(C::init(props));
        }
        match (**entry).downcast_mut::<C::State>() {
            Some(state) => state,
            None => unreachable!("state for {} was just initialized", path),
        }
    }

    pub fn get<S: 'static + Send + Sync>(&self, path: &str) -> Option<&S> {
        self.states.get(path).and_then(|state| state.downcast_ref())
    }

    pub fn get_mut<S: 'static + Send + Sync>(&mut self, path: &str) -> Option<&mut S> {
        self.states.get_mut(path).and_then(|state| state.downcast_mut())
    }

    /// Get mutable state as Any for dynamic dispatch
    pub fn get_mut_any(&mut self, path: &str) -> Option<&mut (dyn Any + Send + Sync)> {
        self.states.get_mut(path).map(|state| &mut **state)
    }

    pub fn insert<S: 'static + Send + Sync>(&mut self, path: String, state: S) {
        self.states.insert(path, Box::new(state));
    }

    /// Remove state for a component path (unmount)
    pub fn remove(&mut self, path: &str) -> bool {
        self.states.remove(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::component::Element;

    #[derive(Clone)]
    struct TestProps {
        value: i32,
    }

    #[derive(Clone, Default)]
    struct TestState {
        counter: i32,
    }

    struct TestComponent;

    impl Component for TestComponent {
        type Props = TestProps;
        type State = TestState;

        fn init(props: &Self::Props) -> Self::State {
            TestState {
                counter: props.value * 2,
            }
        }

        fn view(&self, _props: &Self::Props, _state: &Self::State) -> Element {
            Element::None
        }
    }

    #[test]
    fn test_get_or_init_initializes_once() {
        let mut store = ComponentStateStore::new();
        let state = store.get_or_init::<TestComponent>("app/test", &TestProps { value: 5 });
        assert_eq!(state.counter, 10);
        state.counter = 3;

        let state = store.get_or_init::<TestComponent>("app/test", &TestProps { value: 100 });
        assert_eq!(state.counter, 3);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_wrong_type_reads_as_missing() {
        let mut store = ComponentStateStore::new();
        store.insert("app/test".to_string(), 42u32);
        assert!(store.get::<TestState>("app/test").is_none());
        assert_eq!(store.get::<u32>("app/test"), Some(&42));

        let state = store.get_or_init::<TestComponent>("app/test", &TestProps { value: 1 });
        assert_eq!(state.counter, 2);
    }

    #[test]
    fn test_remove_and_empty() {
        let mut store = ComponentStateStore::new();
        assert!(store.is_empty());
        store.insert("a".to_string(), TestState::default());
        assert!(store.get_mut_any("a").is_some());
        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert!(store.is_empty());
    }
}
