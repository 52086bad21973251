/// State management module
///
/// This module handles all engineering-bearing logic, including:
/// - Shared data structures (data.rs)
/// - Pure re-bucketing and filter engines (bucketing.rs)
/// - The result store and its refresh boundary (store.rs)
/// - Flat-list keyboard navigation (navigator.rs)
/// - Derived statistics (stats.rs)
/// - Session persistence (session.rs)
/// - The staged analysis pipeline and score source (pipeline.rs, score.rs)
///
/// Nothing in here touches the GUI; everything is unit-tested in place.

pub mod bucketing;
pub mod data;
pub mod navigator;
pub mod pipeline;
pub mod score;
pub mod session;
pub mod stats;
pub mod store;
