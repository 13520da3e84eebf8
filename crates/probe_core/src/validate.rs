//! Argument validation cascades.
//!
//! Each driver lists its precondition checks as ordered `(violated, status)`
//! pairs; the first violated check decides the outcome. The order is part of
//! the contract: dimension checks come before leading-dimension checks, so a
//! request that is invalid in several ways surfaces the same status the
//! kernel family documents.

use crate::status::KernelStatus;

/// Returns the status of the first violated check, or `Success`.
pub fn first_failure(checks: &[(bool, KernelStatus)]) -> KernelStatus {
    checks
        .iter()
        .find(|(violated, _)| *violated)
        .map(|&(_, status)| status)
        .unwrap_or(KernelStatus::Success)
}

/// Increment-sign policy of a kernel family.
///
/// Not a universal rule: some families accept negative increments, others
/// reject them as a documented precondition of their reference
/// implementation. Each driver names its own policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementPolicy {
    /// Any non-zero increment is legal.
    NonZero,
    /// Only strictly positive increments are legal.
    StrictlyPositive,
}

impl IncrementPolicy {
    pub fn rejects(self, inc: i32) -> bool {
        match self {
            IncrementPolicy::NonZero => inc == 0,
            IncrementPolicy::StrictlyPositive => inc <= 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_violated_check_wins() {
        let status = first_failure(&[
            (false, KernelStatus::InvalidValue),
            (true, KernelStatus::NotSupported),
            (true, KernelStatus::InvalidValue),
        ]);
        assert_eq!(status, KernelStatus::NotSupported);
    }

    #[test]
    fn no_violation_is_success() {
        assert_eq!(
            first_failure(&[(false, KernelStatus::InvalidValue)]),
            KernelStatus::Success
        );
        assert_eq!(first_failure(&[]), KernelStatus::Success);
    }

    #[test]
    fn cascade_order_is_preserved() {
        // rows-before-lda ordering: both invalid, the dimension check decides
        let rows = -1;
        let lda = 0;
        let status = first_failure(&[
            (rows < 0, KernelStatus::InvalidValue),
            (lda <= 0, KernelStatus::InvalidValue),
        ]);
        assert_eq!(status, KernelStatus::InvalidValue);
    }

    #[test]
    fn increment_policies_differ_on_negatives() {
        assert!(!IncrementPolicy::NonZero.rejects(-2));
        assert!(IncrementPolicy::NonZero.rejects(0));
        assert!(IncrementPolicy::StrictlyPositive.rejects(-2));
        assert!(IncrementPolicy::StrictlyPositive.rejects(0));
        assert!(!IncrementPolicy::StrictlyPositive.rejects(3));
    }
}
