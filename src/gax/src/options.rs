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

//! Per request polling options.
//!
//! The defaults allow at most
//! eight status queries, separated by the [XorBackoff] schedule. Applications
//! may need a different budget or a growing backoff for operations that take
//! longer, such as deleting large disks. The `*Builder` returned by each client
//! method implements the [RequestOptionsBuilder] trait where applications can
//! override these defaults.
//!
//! [XorBackoff]: crate::xor_backoff::XorBackoff

use crate::polling_backoff_policy::{PollingBackoffPolicy, PollingBackoffPolicyArg};
use crate::xor_backoff::XorBackoff;
use std::sync::Arc;

/// The number of status queries performed before giving up.
pub const DEFAULT_MAX_POLLING_ATTEMPTS: u32 = 8;

/// A set of options configuring a single poll sequence.
///
/// Application only use this class directly in mocks, where they may want to
/// verify their application has configured all the right request parameters and
/// options.
///
/// All other code uses this type indirectly, via the per-request builders.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    max_polling_attempts: Option<u32>,
    polling_backoff_policy: Option<Arc<dyn PollingBackoffPolicy>>,
}

impl RequestOptions {
    /// Gets the maximum number of status queries.
    ///
    /// Returns [DEFAULT_MAX_POLLING_ATTEMPTS] unless it was overridden.
    pub fn max_polling_attempts(&self) -> u32 {
        self.max_polling_attempts
            .unwrap_or(DEFAULT_MAX_POLLING_ATTEMPTS)
    }

    /// Sets the maximum number of status queries.
    ///
    /// A value of zero gives up before the first query.
    pub fn set_max_polling_attempts(&mut self, v: u32) {
        self.max_polling_attempts = Some(v);
    }

    /// Gets the polling backoff policy.
    ///
    /// Returns [XorBackoff] unless it was overridden.
    pub fn polling_backoff_policy(&self) -> Arc<dyn PollingBackoffPolicy> {
        self.polling_backoff_policy
            .clone()
            .unwrap_or_else(|| Arc::new(XorBackoff::default()))
    }

    /// Sets the polling backoff policy configuration.
    pub fn set_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(&mut self, v: V) {
        self.polling_backoff_policy = Some(v.into().0);
    }
}

/// Implementations of this trait provide setters to configure request options.
///
/// The client provides a builder for each zone resource mutation. These
/// builders can be used to set the request parameters, e.g., the name of the
/// instance targeted by the request, as well as any options affecting how the
/// resulting operation is polled.
pub trait RequestOptionsBuilder: internal::RequestBuilder {
    /// Sets the maximum number of status queries.
    fn with_max_polling_attempts(self, v: u32) -> Self;

    /// Sets the polling backoff policy configuration.
    fn with_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(self, v: V) -> Self;
}

#[doc(hidden)]
pub mod internal {
    //! This module contains implementation details. It is not part of the
    //! public API. Types and functions in this module may be changed or removed
    //! without warnings. Applications should not use any types contained
    //! within.
    use super::RequestOptions;

    /// Simplify implementation of the [super::RequestOptionsBuilder] trait.
    ///
    /// This is an implementation detail, most applications have little need to
    /// worry about or use this trait.
    pub trait RequestBuilder {
        fn request_options(&mut self) -> &mut RequestOptions;
    }
}

/// Implements the sealed [RequestOptionsBuilder] trait.
impl<T> RequestOptionsBuilder for T
where
    T: internal::RequestBuilder,
{
    fn with_max_polling_attempts(mut self, v: u32) -> Self {
        self.request_options().set_max_polling_attempts(v);
        self
    }

    fn with_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(mut self, v: V) -> Self {
        self.request_options().set_polling_backoff_policy(v);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::internal::*;
    use super::*;
    use crate::exponential_backoff::ExponentialBackoffBuilder;
    use crate::polling_state::PollingState;
    use std::time::Duration;
    type Result = std::result::Result<(), Box<dyn std::error::Error>>;

    #[derive(Debug, Default)]
    struct TestBuilder {
        request_options: RequestOptions,
    }
    impl RequestBuilder for TestBuilder {
        fn request_options(&mut self) -> &mut RequestOptions {
            &mut self.request_options
        }
    }

    #[test]
    fn request_options_defaults() {
        let opts = RequestOptions::default();
        assert_eq!(opts.max_polling_attempts(), DEFAULT_MAX_POLLING_ATTEMPTS);
        let state = PollingState::default().set_attempt_count(1_u32);
        assert_eq!(
            opts.polling_backoff_policy().wait_period(&state),
            Duration::from_millis(2002)
        );
    }

    #[test]
    fn request_options() -> Result {
        let mut opts = RequestOptions::default();

        opts.set_max_polling_attempts(3);
        assert_eq!(opts.max_polling_attempts(), 3);
        opts.set_max_polling_attempts(0);
        assert_eq!(opts.max_polling_attempts(), 0);

        opts.set_polling_backoff_policy(
            ExponentialBackoffBuilder::new()
                .with_initial_delay(Duration::from_secs(1))
                .with_maximum_delay(Duration::from_secs(10))
                .build()?,
        );
        let state = PollingState::default().set_attempt_count(1_u32);
        assert_eq!(
            opts.polling_backoff_policy().wait_period(&state),
            Duration::from_secs(1)
        );
        Ok(())
    }

    #[test]
    fn request_options_builder() -> Result {
        let mut builder = TestBuilder::default();
        assert_eq!(
            builder.request_options().max_polling_attempts(),
            DEFAULT_MAX_POLLING_ATTEMPTS
        );

        let mut builder = TestBuilder::default().with_max_polling_attempts(20);
        assert_eq!(builder.request_options().max_polling_attempts(), 20);

        let mut builder = TestBuilder::default().with_polling_backoff_policy(
            ExponentialBackoffBuilder::new()
                .with_initial_delay(Duration::from_millis(500))
                .build()?,
        );
        let state = PollingState::default().set_attempt_count(2_u32);
        assert_eq!(
            builder
                .request_options()
                .polling_backoff_policy()
                .wait_period(&state),
            Duration::from_secs(1)
        );
        Ok(())
    }
}
