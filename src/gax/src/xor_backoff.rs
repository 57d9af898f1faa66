// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The default polling backoff for zone operations.
//!
//! The zone operation helpers wait `2000 ^ n` milliseconds before the `n`-th
//! status query, where `^` is a bitwise XOR and not a power. The wait period
//! barely changes between attempts: the low bits of `2000` are zero, so for
//! the first fifteen attempts the wait is simply `2000 + n` milliseconds.
//!
//! [XorBackoff] implements that schedule. Applications that want a
//! growing wait period should use
//! [ExponentialBackoff][crate::exponential_backoff::ExponentialBackoff].

use crate::polling_backoff_policy::PollingBackoffPolicy;
use crate::polling_state::PollingState;
use std::time::Duration;

/// The base period, in milliseconds, used by [XorBackoff::default].
pub const DEFAULT_BASE_MILLIS: u64 = 2000;

/// Waits `base XOR n` milliseconds before the `n`-th status query.
///
/// # Example
/// ```
/// # use compute_ops_gax::polling_backoff_policy::PollingBackoffPolicy;
/// # use compute_ops_gax::polling_state::PollingState;
/// # use compute_ops_gax::xor_backoff::XorBackoff;
/// use std::time::Duration;
/// let policy = XorBackoff::default();
/// // One query completed, wait before the second one.
/// let state = PollingState::default().set_attempt_count(1_u32);
/// assert_eq!(policy.wait_period(&state), Duration::from_millis(2002));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct XorBackoff {
    base_millis: u64,
}

impl XorBackoff {
    /// Creates a policy with a custom base period.
    ///
    /// Tests use a small base to keep the schedule short.
    pub fn with_base_millis(base_millis: u64) -> Self {
        Self { base_millis }
    }

    /// The wait before query number `attempt`.
    fn delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_millis ^ u64::from(attempt))
    }
}

impl Default for XorBackoff {
    fn default() -> Self {
        Self::with_base_millis(DEFAULT_BASE_MILLIS)
    }
}

impl PollingBackoffPolicy for XorBackoff {
    fn wait_period(&self, state: &PollingState) -> Duration {
        self.delay(state.attempt_count.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1, 2002)]
    #[test_case(2, 2003)]
    #[test_case(3, 2004)]
    #[test_case(6, 2007)]
    #[test_case(7, 2008)]
    #[test_case(15, 2000 ^ 16)]
    fn default_schedule(completed: u32, want_millis: u64) {
        let policy = XorBackoff::default();
        let state = PollingState::default().set_attempt_count(completed);
        assert_eq!(policy.wait_period(&state), Duration::from_millis(want_millis));
    }

    #[test]
    fn does_not_grow() {
        let policy = XorBackoff::default();
        let waits = (1..8)
            .map(|n| policy.wait_period(&PollingState::default().set_attempt_count(n as u32)))
            .collect::<Vec<_>>();
        let total: Duration = waits.iter().sum();
        assert_eq!(total, Duration::from_millis(14_035));
        assert!(
            waits.iter().all(|w| *w < Duration::from_millis(2016)),
            "{waits:?}"
        );
    }

    #[test]
    fn custom_base() {
        let policy = XorBackoff::with_base_millis(8);
        let state = PollingState::default().set_attempt_count(1_u32);
        // 8 ^ 2 == 10
        assert_eq!(policy.wait_period(&state), Duration::from_millis(10));
        let state = PollingState::default().set_attempt_count(7_u32);
        // 8 ^ 8 == 0
        assert_eq!(policy.wait_period(&state), Duration::ZERO);
    }

    #[test]
    fn saturates() {
        let policy = XorBackoff::default();
        let state = PollingState::default().set_attempt_count(u32::MAX);
        assert_eq!(
            policy.wait_period(&state),
            Duration::from_millis(2000 ^ u64::from(u32::MAX))
        );
    }
}
