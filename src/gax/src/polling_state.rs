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

//! The state of a polling loop.
//!
//! Polling backoff policies receive this state to compute the wait period
//! before the next status query.

/// The progress of a polling loop.
///
/// This struct may gain new fields in future versions.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct PollingState {
    /// The number of status queries performed so far.
    ///
    /// This does not include the request that submitted the operation.
    pub attempt_count: u32,
}

impl PollingState {
    /// Sets the [attempt_count][PollingState::attempt_count], useful in mocks.
    pub fn set_attempt_count<T: Into<u32>>(mut self, v: T) -> Self {
        self.attempt_count = v.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default() {
        assert_eq!(PollingState::default().attempt_count, 0);
    }

    #[test]
    fn set_attempt_count() {
        let state = PollingState::default().set_attempt_count(3_u32);
        assert_eq!(state, PollingState { attempt_count: 3 });
    }
}
