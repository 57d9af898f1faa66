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

//! A scripted implementation of `lro::stub::ZoneOperations`.

use compute_ops_lro as lro;
use lro::model::Operation;
use lro::{Error, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// A scripted response, returned after an optional delay.
pub struct Response {
    pub delay: Duration,
    pub result: Result<Operation>,
}

impl From<Result<Operation>> for Response {
    fn from(result: Result<Operation>) -> Self {
        Self {
            delay: Duration::ZERO,
            result,
        }
    }
}

impl From<Operation> for Response {
    fn from(operation: Operation) -> Self {
        Self::from(Ok(operation))
    }
}

/// A recorded call.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub project: String,
    pub zone: String,
    pub name: String,
    pub at: Instant,
}

#[derive(Default)]
pub struct ServerState {
    pub create: VecDeque<Response>,
    pub poll: VecDeque<Response>,
    pub calls: Vec<Call>,
}

/// Replays the `create` responses for `delete_*` calls, and the `poll`
/// responses for status queries.
#[derive(Clone, Default)]
pub struct FakeZoneOperations {
    state: Arc<Mutex<ServerState>>,
}

impl std::fmt::Debug for FakeZoneOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeZoneOperations").finish_non_exhaustive()
    }
}

impl FakeZoneOperations {
    pub fn new<C, P>(create: C, poll: P) -> Self
    where
        C: IntoIterator<Item = Response>,
        P: IntoIterator<Item = Response>,
    {
        let state = ServerState {
            create: create.into_iter().collect(),
            poll: poll.into_iter().collect(),
            calls: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state
            .lock()
            .expect("shared state is poisoned")
            .calls
            .clone()
    }

    /// The number of status queries started so far.
    pub fn queries(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method == "get_zone_operation")
            .count()
    }

    async fn respond(
        &self,
        method: &'static str,
        project: String,
        zone: String,
        name: String,
    ) -> Result<Operation> {
        let response = {
            let mut state = self.state.lock().expect("shared state is poisoned");
            state.calls.push(Call {
                method,
                project,
                zone,
                name,
                at: Instant::now(),
            });
            let queue = if method == "get_zone_operation" {
                &mut state.poll
            } else {
                &mut state.create
            };
            queue.pop_front()
        };
        let Some(response) = response else {
            return Err(Error::other(format!("exhausted {method} responses")));
        };
        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        response.result
    }
}

impl lro::stub::ZoneOperations for FakeZoneOperations {
    async fn delete_instance(
        &self,
        project: String,
        zone: String,
        instance: String,
    ) -> Result<Operation> {
        self.respond("delete_instance", project, zone, instance)
            .await
    }

    async fn delete_disk(&self, project: String, zone: String, disk: String) -> Result<Operation> {
        self.respond("delete_disk", project, zone, disk).await
    }

    async fn get_zone_operation(
        &self,
        project: String,
        zone: String,
        operation: String,
    ) -> Result<Operation> {
        self.respond("get_zone_operation", project, zone, operation)
            .await
    }
}
