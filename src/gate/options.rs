// src/gate/options.rs

/// Caller-supplied switches for a gate evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateOptions {
    /// Ignore prerequisite outcomes entirely: a job whose prerequisites are
    /// pending or failed is still reported as `Go`.
    pub ignore_prereq_gating: bool,
}

impl GateOptions {
    /// Derive options from a whitespace-separated list of ignorable caveats
    /// (e.g. `"prereq heavy"`). `prereq` or `all` turns the bypass on.
    pub fn from_ignored_caveats(caveats: &str) -> Self {
        let ignore_prereq_gating = caveats
            .split_whitespace()
            .map(str::to_lowercase)
            .any(|c| c == "prereq" || c == "all");

        Self {
            ignore_prereq_gating,
        }
    }
}
