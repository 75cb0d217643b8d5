use serde::{Deserialize, Serialize};

/// Resource bounds for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineLimits {
    /// Deepest allowed procedure nesting, the entry procedure included.
    pub max_call_depth: usize,
    /// Frame operations a single step may perform before it must act.
    pub max_control_ops_per_step: u64,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_call_depth: 1_000,
            max_control_ops_per_step: 100_000,
        }
    }
}

impl EngineLimits {
    /// These limits with every bound raised to at least one.
    pub fn normalized(self) -> Self {
        Self {
            max_call_depth: self.max_call_depth.max(1),
            max_control_ops_per_step: self.max_control_ops_per_step.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bounds_are_raised_to_one() {
        let limits = EngineLimits {
            max_call_depth: 0,
            max_control_ops_per_step: 0,
        }
        .normalized();
        assert_eq!(limits.max_call_depth, 1);
        assert_eq!(limits.max_control_ops_per_step, 1);
        assert_eq!(EngineLimits::default().normalized(), EngineLimits::default());
    }
}
