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

//! Defines the trait for polling backoff policies and common implementations.
//!
//! The poller queries the status of a zone operation until it reaches a
//! terminal state. Between queries it waits, to avoid overloading the service.
//!
//! Two implementations are provided:
//!
//! * [XorBackoff][crate::xor_backoff::XorBackoff], the default. It waits
//!   `2000 XOR n` milliseconds before the `n`-th query. That is a nearly
//!   constant ~2 second period, **not** a growing one.
//! * [ExponentialBackoff][crate::exponential_backoff::ExponentialBackoff],
//!   truncated exponential backoff **without** jitter. The backoff period
//!   grows exponentially until some limit is reached.
//!
//! To configure the polling backoff policy for a request, use
//! [RequestOptionsBuilder::with_polling_backoff_policy].
//!
//! [RequestOptionsBuilder::with_polling_backoff_policy]: crate::options::RequestOptionsBuilder::with_polling_backoff_policy
//!
//! # Example
//! ```
//! # use compute_ops_gax::exponential_backoff::Error;
//! # use compute_ops_gax::exponential_backoff::ExponentialBackoffBuilder;
//! use std::time::Duration;
//!
//! let policy = ExponentialBackoffBuilder::new()
//!     .with_initial_delay(Duration::from_secs(2))
//!     .with_maximum_delay(Duration::from_secs(30))
//!     .with_scaling(2.0)
//!     .build()?;
//! // `policy` implements the `PollingBackoffPolicy` trait.
//! # Ok::<(), Error>(())
//! ```

use crate::polling_state::PollingState;
use std::sync::Arc;

/// Defines the trait implemented by all polling backoff strategies.
pub trait PollingBackoffPolicy: Send + Sync + std::fmt::Debug {
    /// Returns the wait period before the next status query.
    ///
    /// # Parameters
    /// * `state` - the polling loop state. This method is always called after
    ///   the first query, so `state.attempt_count` is at least 1, and the
    ///   returned value is the wait before query `state.attempt_count + 1`.
    fn wait_period(&self, state: &PollingState) -> std::time::Duration;
}

/// A helper type to use [PollingBackoffPolicy] in request options.
#[derive(Clone)]
pub struct PollingBackoffPolicyArg(pub(crate) Arc<dyn PollingBackoffPolicy>);

impl<T: PollingBackoffPolicy + 'static> std::convert::From<T> for PollingBackoffPolicyArg {
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl std::convert::From<Arc<dyn PollingBackoffPolicy>> for PollingBackoffPolicyArg {
    fn from(value: Arc<dyn PollingBackoffPolicy>) -> Self {
        Self(value)
    }
}

impl std::convert::From<PollingBackoffPolicyArg> for Arc<dyn PollingBackoffPolicy> {
    fn from(value: PollingBackoffPolicyArg) -> Self {
        value.0
    }
}
