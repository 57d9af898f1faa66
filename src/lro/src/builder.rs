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

//! Request builders for [ZoneOperations][crate::client::ZoneOperations].
//!
//! Each builder carries the request parameters and the polling options. Call
//! `send()` to submit the request only, `poller()` to obtain a [Poller], or
//! `until_done()` to submit the request and poll the resulting operation to
//! completion.

use crate::model::Operation;
use crate::self_link::name_from_self_link;
use crate::stub::ZoneOperations;
use crate::zone::Settings;
use crate::{Error, PollResult, Poller, ProgressSink, Result, ZonePollerBuilder};
use gax::options::RequestOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Returns a query closure for [ZonePollerBuilder].
pub(crate) fn query_fn<S>(
    stub: Arc<S>,
    project: String,
    zone: String,
) -> impl FnMut(String) -> std::pin::Pin<Box<dyn Future<Output = Result<Operation>> + Send>> + Send
where
    S: ZoneOperations + 'static,
{
    move |name| {
        let stub = stub.clone();
        let project = project.clone();
        let zone = zone.clone();
        Box::pin(async move { stub.get_zone_operation(project, zone, name).await })
    }
}

/// Validates a resource name. Names are used verbatim, never trimmed.
fn required(name: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::binding(format!(
            "missing required parameter `{name}`"
        )));
    }
    if value.contains('/') {
        return Err(Error::binding(format!(
            "invalid parameter `{name}`: expected a resource name, got `{value}`"
        )));
    }
    Ok(value.to_string())
}

/// Accepts a zone name or a zone URL.
fn zone_name(value: &str) -> Result<String> {
    match name_from_self_link(value) {
        Some(v) => Ok(v.to_string()),
        None => Err(Error::binding("missing required parameter `zone`")),
    }
}

macro_rules! poller_settings {
    ($builder:ident) => {
        impl<S> $builder<S>
        where
            S: ZoneOperations + 'static,
        {
            /// Sets the sink receiving the poll sequence events.
            pub fn with_sink<T>(mut self, v: T) -> Self
            where
                T: ProgressSink + 'static,
            {
                self.settings.set_sink(v);
                self
            }

            /// Sets the token used to cancel the poll sequence.
            pub fn with_cancellation(mut self, v: CancellationToken) -> Self {
                self.settings.cancel = v;
                self
            }

            /// Sets a callback invoked once with the terminal outcome.
            pub fn with_completion<F>(mut self, v: F) -> Self
            where
                F: FnOnce(&PollResult) + Send + 'static,
            {
                self.settings.set_completion(v);
                self
            }

            /// Creates a [Poller] to submit the request and poll the
            /// resulting zone operation.
            pub fn poller(mut self) -> impl Poller {
                let zone = name_from_self_link(&self.zone)
                    .unwrap_or_default()
                    .to_string();
                let query = query_fn(self.stub.clone(), self.project.clone(), zone.clone());
                let settings = std::mem::take(&mut self.settings);
                let start = move || self.send();
                ZonePollerBuilder::from_parts(start, query, zone, settings).build()
            }

            /// Submits the request and polls the resulting zone operation
            /// until it reaches a terminal state.
            pub async fn until_done(self) -> PollResult {
                self.poller().until_done().await
            }
        }

        impl<S> gax::options::internal::RequestBuilder for $builder<S> {
            fn request_options(&mut self) -> &mut RequestOptions {
                &mut self.settings.options
            }
        }
    };
}

/// The request builder for
/// [ZoneOperations::delete_instance][crate::client::ZoneOperations::delete_instance].
///
/// # Example
/// ```
/// # use compute_ops_lro as lro;
/// # use lro::model::Operation;
/// use gax::options::RequestOptionsBuilder;
/// use lro::client::ZoneOperations;
/// # #[derive(Debug)]
/// # struct Fake;
/// # impl lro::stub::ZoneOperations for Fake {}
/// # async fn sample() {
/// let client = ZoneOperations::from_stub(Fake, "my-project");
/// let result = client
///     .delete_instance("us-central1-f", "my-instance")
///     .with_max_polling_attempts(20)
///     .until_done()
///     .await;
/// println!("{}", result.message());
/// # }
/// ```
#[derive(Debug)]
pub struct DeleteInstance<S> {
    stub: Arc<S>,
    project: String,
    zone: String,
    instance: String,
    settings: Settings,
}

impl<S> DeleteInstance<S>
where
    S: ZoneOperations + 'static,
{
    pub(crate) fn new(stub: Arc<S>, project: String) -> Self {
        Self {
            stub,
            project,
            zone: String::new(),
            instance: String::new(),
            settings: Settings::default(),
        }
    }

    /// Sets the zone. Accepts a zone name or a zone URL.
    pub fn set_zone<T: Into<String>>(mut self, v: T) -> Self {
        self.zone = v.into();
        self
    }

    /// Sets the name of the instance to delete.
    pub fn set_instance<T: Into<String>>(mut self, v: T) -> Self {
        self.instance = v.into();
        self
    }

    /// Submits the request, returning the zone operation.
    pub async fn send(self) -> Result<Operation> {
        let project = required("project", &self.project)?;
        let zone = zone_name(&self.zone)?;
        let instance = required("instance", &self.instance)?;
        self.stub.delete_instance(project, zone, instance).await
    }
}

poller_settings!(DeleteInstance);

/// The request builder for
/// [ZoneOperations::delete_disk][crate::client::ZoneOperations::delete_disk].
#[derive(Debug)]
pub struct DeleteDisk<S> {
    stub: Arc<S>,
    project: String,
    zone: String,
    disk: String,
    settings: Settings,
}

impl<S> DeleteDisk<S>
where
    S: ZoneOperations + 'static,
{
    pub(crate) fn new(stub: Arc<S>, project: String) -> Self {
        Self {
            stub,
            project,
            zone: String::new(),
            disk: String::new(),
            settings: Settings::default(),
        }
    }

    /// Sets the zone. Accepts a zone name or a zone URL.
    pub fn set_zone<T: Into<String>>(mut self, v: T) -> Self {
        self.zone = v.into();
        self
    }

    /// Sets the name of the disk to delete.
    pub fn set_disk<T: Into<String>>(mut self, v: T) -> Self {
        self.disk = v.into();
        self
    }

    /// Submits the request, returning the zone operation.
    pub async fn send(self) -> Result<Operation> {
        let project = required("project", &self.project)?;
        let zone = zone_name(&self.zone)?;
        let disk = required("disk", &self.disk)?;
        self.stub.delete_disk(project, zone, disk).await
    }
}

poller_settings!(DeleteDisk);

/// The request builder for
/// [ZoneOperations::get_zone_operation][crate::client::ZoneOperations::get_zone_operation].
#[derive(Debug)]
pub struct GetZoneOperation<S> {
    stub: Arc<S>,
    project: String,
    zone: String,
    operation: String,
}

impl<S> GetZoneOperation<S>
where
    S: ZoneOperations + 'static,
{
    pub(crate) fn new(stub: Arc<S>, project: String) -> Self {
        Self {
            stub,
            project,
            zone: String::new(),
            operation: String::new(),
        }
    }

    /// Sets the zone. Accepts a zone name or a zone URL.
    pub fn set_zone<T: Into<String>>(mut self, v: T) -> Self {
        self.zone = v.into();
        self
    }

    /// Sets the name of the operation to query.
    pub fn set_operation<T: Into<String>>(mut self, v: T) -> Self {
        self.operation = v.into();
        self
    }

    /// Queries the operation status once.
    pub async fn send(self) -> Result<Operation> {
        let project = required("project", &self.project)?;
        let zone = zone_name(&self.zone)?;
        let operation = required("operation", &self.operation)?;
        self.stub
            .get_zone_operation(project, zone, operation)
            .await
    }
}
