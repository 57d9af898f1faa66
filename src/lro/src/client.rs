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

use crate::builder;
use crate::model::Operation;
use crate::self_link::name_from_self_link;
use crate::{PollResult, Poller, Result, ZonePollerBuilder, stub};
use gax::options::RequestOptions;
use std::future::Future;
use std::sync::Arc;

/// Implements a client for the Compute Engine zone operations used by this
/// crate.
///
/// # Example
/// ```
/// # use compute_ops_lro as lro;
/// # use lro::model::Operation;
/// use lro::client::ZoneOperations;
/// # #[derive(Debug)]
/// # struct MyStub;
/// # impl lro::stub::ZoneOperations for MyStub {}
/// # async fn sample() {
/// let client = ZoneOperations::from_stub(MyStub, "my-project");
/// let result = client
///     .delete_disk("us-central1-f", "my-disk")
///     .until_done()
///     .await;
/// println!("{}", result.message());
/// # }
/// ```
///
/// # Pooling and Cloning
///
/// `ZoneOperations` holds the stub in an [Arc]. Cloning the client is cheap,
/// and clones share the stub.
#[derive(Debug)]
pub struct ZoneOperations<S> {
    inner: Arc<S>,
    project: String,
}

impl<S> Clone for ZoneOperations<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            project: self.project.clone(),
        }
    }
}

impl<S> ZoneOperations<S>
where
    S: stub::ZoneOperations + 'static,
{
    /// Creates a new client from the provided stub.
    ///
    /// The most common case for calling this function is in tests mocking the
    /// client's behavior.
    pub fn from_stub<T>(stub: T, project: impl Into<String>) -> Self
    where
        T: Into<Arc<S>>,
    {
        Self {
            inner: stub.into(),
            project: project.into(),
        }
    }

    /// The project used in all requests.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Deletes the specified instance.
    ///
    /// `zone` may be a zone name or a zone URL.
    pub fn delete_instance(
        &self,
        zone: impl Into<String>,
        instance: impl Into<String>,
    ) -> builder::DeleteInstance<S> {
        builder::DeleteInstance::new(self.inner.clone(), self.project.clone())
            .set_zone(zone)
            .set_instance(instance)
    }

    /// Deletes the specified persistent disk.
    ///
    /// `zone` may be a zone name or a zone URL.
    pub fn delete_disk(
        &self,
        zone: impl Into<String>,
        disk: impl Into<String>,
    ) -> builder::DeleteDisk<S> {
        builder::DeleteDisk::new(self.inner.clone(), self.project.clone())
            .set_zone(zone)
            .set_disk(disk)
    }

    /// Retrieves the specified zone operation.
    pub fn get_zone_operation(
        &self,
        zone: impl Into<String>,
        operation: impl Into<String>,
    ) -> builder::GetZoneOperation<S> {
        builder::GetZoneOperation::new(self.inner.clone(), self.project.clone())
            .set_zone(zone)
            .set_operation(operation)
    }

    /// Polls the zone operation returned by `start` until it completes.
    ///
    /// Use this function for requests without a builder in this crate. The
    /// status queries use this client's stub and project.
    pub async fn submit_and_poll<F>(
        &self,
        options: RequestOptions,
        zone: impl Into<String>,
        start: F,
    ) -> PollResult
    where
        F: Future<Output = Result<Operation>> + Send,
    {
        let zone = zone.into();
        let zone = name_from_self_link(&zone).unwrap_or_default().to_string();
        let query = builder::query_fn(self.inner.clone(), self.project.clone(), zone.clone());
        ZonePollerBuilder::new(move || start, query)
            .with_options(options)
            .with_zone(zone)
            .build()
            .until_done()
            .await
    }
}
