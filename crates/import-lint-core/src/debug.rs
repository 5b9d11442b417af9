//! Opt-in tracing of rule internals.

use std::fmt::Debug;

/// Emits labelled intermediate values of a rule when its `debug` option is set.
///
/// Output goes through `tracing` at info level so it shows up with the
/// default filter; a disabled debugger does nothing.
#[derive(Debug, Clone, Copy)]
pub struct RuleDebugger {
    rule: &'static str,
    enabled: bool,
}

impl RuleDebugger {
    /// Creates a debugger for the given rule.
    #[must_use]
    pub const fn new(rule: &'static str, enabled: bool) -> Self {
        Self { rule, enabled }
    }

    /// Traces one labelled value.
    pub fn trace(&self, label: &str, value: &dyn Debug) {
        if self.enabled {
            tracing::info!(rule = self.rule, "{label}: {value:?}");
        }
    }

    /// Traces a labelled list of values.
    pub fn trace_all<T: Debug>(&self, label: &str, values: impl IntoIterator<Item = T>) {
        if self.enabled {
            let values: Vec<T> = values.into_iter().collect();
            tracing::info!(rule = self.rule, "{label}: {values:?}");
        }
    }
}
