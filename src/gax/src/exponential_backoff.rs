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

//! A growing wait period between status queries.
//!
//! Deleting a large disk can take minutes, well past the default budget of
//! eight queries about two seconds apart. [ExponentialBackoff] multiplies the
//! wait period after each query, up to a cap. There is no jitter: a poller
//! queries a single operation, so there is no herd to spread out.
//!
//! The wait before query `n + 1` is `initial_delay * scaling^(n - 1)`, capped
//! at `maximum_delay`.

use crate::polling_backoff_policy::PollingBackoffPolicy;
use crate::polling_state::PollingState;
use std::time::Duration;

const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(2);
const DEFAULT_MAXIMUM_DELAY: Duration = Duration::from_secs(60);
const DEFAULT_SCALING: f64 = 2.0;

// Ranges used by `ExponentialBackoffBuilder::clamp()`.
const MIN_INITIAL_DELAY: Duration = Duration::from_millis(100);
const MIN_MAXIMUM_DELAY: Duration = Duration::from_secs(1);
const MAX_MAXIMUM_DELAY: Duration = Duration::from_secs(10 * 60);
const MAX_SCALING: f64 = 8.0;

/// Invalid [ExponentialBackoffBuilder] parameters.
#[derive(thiserror::Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("the scaling factor must be at least 1.0, got {0}")]
    InvalidScalingFactor(f64),
    #[error("the initial delay must be positive, got {0:?}")]
    InvalidInitialDelay(Duration),
    #[error("the maximum delay ({maximum:?}) is shorter than the initial delay ({initial:?})")]
    EmptyRange {
        initial: Duration,
        maximum: Duration,
    },
}

/// Configures an [ExponentialBackoff].
///
/// # Example
/// ```
/// # use compute_ops_gax::exponential_backoff::{Error, ExponentialBackoffBuilder};
/// # use compute_ops_gax::polling_backoff_policy::PollingBackoffPolicy;
/// # use compute_ops_gax::polling_state::PollingState;
/// use std::time::Duration;
/// let policy = ExponentialBackoffBuilder::new()
///     .with_initial_delay(Duration::from_secs(5))
///     .with_maximum_delay(Duration::from_secs(30))
///     .build()?;
/// let after = |n: u32| policy.wait_period(&PollingState::default().set_attempt_count(n));
/// assert_eq!(after(1), Duration::from_secs(5));
/// assert_eq!(after(2), Duration::from_secs(10));
/// assert_eq!(after(3), Duration::from_secs(20));
/// assert_eq!(after(4), Duration::from_secs(30));
/// # Ok::<(), Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct ExponentialBackoffBuilder {
    policy: ExponentialBackoff,
}

impl ExponentialBackoffBuilder {
    /// Starts from the [ExponentialBackoff::default] parameters: two seconds,
    /// doubling up to one minute.
    pub fn new() -> Self {
        Self {
            policy: ExponentialBackoff::default(),
        }
    }

    /// Sets the wait before the second query.
    pub fn with_initial_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.policy.initial_delay = v.into();
        self
    }

    /// Sets the cap on the wait period.
    pub fn with_maximum_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.policy.maximum_delay = v.into();
        self
    }

    /// Sets the factor applied to the wait period after each query.
    pub fn with_scaling<V: Into<f64>>(mut self, v: V) -> Self {
        self.policy.scaling = v.into();
        self
    }

    /// Validates the parameters and creates the policy.
    pub fn build(self) -> Result<ExponentialBackoff, Error> {
        let ExponentialBackoff {
            initial_delay,
            maximum_delay,
            scaling,
        } = self.policy;
        if scaling.is_nan() || scaling < 1.0 {
            return Err(Error::InvalidScalingFactor(scaling));
        }
        if initial_delay.is_zero() {
            return Err(Error::InvalidInitialDelay(initial_delay));
        }
        if maximum_delay < initial_delay {
            return Err(Error::EmptyRange {
                initial: initial_delay,
                maximum: maximum_delay,
            });
        }
        Ok(self.policy)
    }

    /// Creates the policy, forcing each parameter into a usable range.
    ///
    /// The maximum delay is clamped to `[1s, 10min]`, then the initial delay
    /// to `[100ms, maximum]`, then the scaling factor to `[1.0, 8.0]`.
    pub fn clamp(self) -> ExponentialBackoff {
        let ExponentialBackoff {
            initial_delay,
            maximum_delay,
            scaling,
        } = self.policy;
        let maximum_delay = maximum_delay.clamp(MIN_MAXIMUM_DELAY, MAX_MAXIMUM_DELAY);
        let initial_delay = initial_delay.clamp(MIN_INITIAL_DELAY, maximum_delay);
        let scaling = if scaling.is_nan() {
            DEFAULT_SCALING
        } else {
            scaling.clamp(1.0, MAX_SCALING)
        };
        ExponentialBackoff {
            initial_delay,
            maximum_delay,
            scaling,
        }
    }
}

impl Default for ExponentialBackoffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncated exponential backoff without jitter.
#[derive(Clone, Debug, PartialEq)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    maximum_delay: Duration,
    scaling: f64,
}

impl ExponentialBackoff {
    /// The wait after `completed` queries.
    fn delay(&self, completed: u32) -> Duration {
        let exponent = i32::try_from(completed.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.scaling.powi(exponent);
        Duration::try_from_secs_f64(secs)
            .map(|d| d.min(self.maximum_delay))
            .unwrap_or(self.maximum_delay)
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            maximum_delay: DEFAULT_MAXIMUM_DELAY,
            scaling: DEFAULT_SCALING,
        }
    }
}

impl PollingBackoffPolicy for ExponentialBackoff {
    fn wait_period(&self, state: &PollingState) -> Duration {
        self.delay(state.attempt_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn after(policy: &ExponentialBackoff, completed: u32) -> Duration {
        policy.wait_period(&PollingState::default().set_attempt_count(completed))
    }

    #[test_case(Duration::ZERO, Duration::from_secs(5), 2.0, Error::InvalidInitialDelay(Duration::ZERO))]
    #[test_case(Duration::from_secs(10), Duration::from_secs(5), 2.0, Error::EmptyRange { initial: Duration::from_secs(10), maximum: Duration::from_secs(5) })]
    #[test_case(Duration::from_secs(1), Duration::from_secs(5), 0.5, Error::InvalidScalingFactor(0.5))]
    #[test_case(Duration::from_secs(1), Duration::from_secs(5), -1.0, Error::InvalidScalingFactor(-1.0))]
    fn build_errors(initial: Duration, maximum: Duration, scaling: f64, want: Error) {
        let got = ExponentialBackoffBuilder::new()
            .with_initial_delay(initial)
            .with_maximum_delay(maximum)
            .with_scaling(scaling)
            .build();
        assert_eq!(got, Err(want));
    }

    #[test]
    fn build_rejects_nan() {
        let got = ExponentialBackoffBuilder::new().with_scaling(f64::NAN).build();
        assert!(matches!(got, Err(Error::InvalidScalingFactor(_))), "{got:?}");
    }

    #[test]
    fn build_defaults() -> anyhow::Result<()> {
        let policy = ExponentialBackoffBuilder::default().build()?;
        assert_eq!(policy, ExponentialBackoff::default());
        assert_eq!(after(&policy, 1), Duration::from_secs(2));
        assert_eq!(after(&policy, 2), Duration::from_secs(4));
        assert_eq!(after(&policy, 6), Duration::from_secs(60));
        Ok(())
    }

    #[test]
    fn unit_scaling_is_constant() -> anyhow::Result<()> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_delay(Duration::from_millis(750))
            .with_scaling(1.0)
            .build()?;
        for n in [1, 2, 8, 1000] {
            assert_eq!(after(&policy, n), Duration::from_millis(750), "n={n}");
        }
        Ok(())
    }

    #[test]
    fn large_attempt_counts_are_capped() -> anyhow::Result<()> {
        let policy = ExponentialBackoffBuilder::new()
            .with_maximum_delay(Duration::MAX)
            .with_scaling(8.0)
            .build()?;
        assert_eq!(after(&policy, u32::MAX), Duration::MAX);
        assert_eq!(after(&ExponentialBackoff::default(), u32::MAX), Duration::from_secs(60));
        Ok(())
    }

    #[test_case(Duration::ZERO, Duration::ZERO, 0.0; "everything too small")]
    #[test_case(Duration::from_secs(3600), Duration::MAX, 100.0; "everything too large")]
    #[test_case(Duration::from_secs(30), Duration::from_secs(5), f64::NAN; "inverted range")]
    fn clamp(initial: Duration, maximum: Duration, scaling: f64) {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_delay(initial)
            .with_maximum_delay(maximum)
            .with_scaling(scaling)
            .clamp();
        assert!(
            (MIN_MAXIMUM_DELAY..=MAX_MAXIMUM_DELAY).contains(&policy.maximum_delay),
            "{policy:?}"
        );
        assert!(
            (MIN_INITIAL_DELAY..=policy.maximum_delay).contains(&policy.initial_delay),
            "{policy:?}"
        );
        assert!((1.0..=MAX_SCALING).contains(&policy.scaling), "{policy:?}");
        let rebuilt = ExponentialBackoffBuilder::new()
            .with_initial_delay(policy.initial_delay)
            .with_maximum_delay(policy.maximum_delay)
            .with_scaling(policy.scaling)
            .build();
        assert_eq!(rebuilt, Ok(policy));
    }
}
