//! Store metrics.
//!
//! The store records through the `metrics` facade only. Installing a
//! recorder or exporter is left to the application; without one every
//! call here is a no-op.
//!
//! # Example
//!
//! ```
//! use redux_kit_runtime::metrics::register_metrics;
//!
//! // Once at startup, after installing a recorder.
//! register_metrics();
//! ```

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Actions reduced by a store.
pub const ACTIONS_DISPATCHED: &str = "store.actions.dispatched";

/// Effects run by a store.
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Dispatches that left the root state `same` as before.
pub const STATE_UNCHANGED: &str = "store.state.unchanged";

/// Time spent inside the root reducer.
pub const REDUCE_DURATION: &str = "store.reduce.duration_seconds";

/// Dispatches refused because of the nesting limit.
pub const DEPTH_EXCEEDED: &str = "store.dispatch.depth_exceeded";

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(ACTIONS_DISPATCHED, "Total number of actions reduced by the store");
    describe_counter!(EFFECTS_EXECUTED, "Total number of effects run by the store");
    describe_counter!(
        STATE_UNCHANGED,
        "Total number of actions that produced the same root state"
    );
    describe_counter!(
        DEPTH_EXCEEDED,
        "Total number of dispatches rejected by the nesting limit"
    );
    describe_histogram!(REDUCE_DURATION, "Time taken to run the root reducer");
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record one reduced action.
    pub fn record_action(duration: Duration, changed: bool) {
        counter!(ACTIONS_DISPATCHED).increment(1);
        histogram!(REDUCE_DURATION).record(duration.as_secs_f64());
        if !changed {
            counter!(STATE_UNCHANGED).increment(1);
        }
    }

    /// Record one effect run.
    pub fn record_effect() {
        counter!(EFFECTS_EXECUTED).increment(1);
    }

    /// Record a dispatch refused by the nesting limit.
    pub fn record_depth_exceeded() {
        counter!(DEPTH_EXCEEDED).increment(1);
    }
}
