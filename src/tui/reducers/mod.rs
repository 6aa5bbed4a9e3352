//! Sub-reducers chained by `reducer::reduce`
//!
//! Each returns `Ok((state, effect))` when it handled the action, or
//! `Err(state)` to hand ownership to the next one.

pub mod data_loading;
pub mod navigation;
pub mod preview;

pub use data_loading::{reduce_data_loading, start_list_fetch};
pub use navigation::reduce_navigation;
pub use preview::reduce_preview;
