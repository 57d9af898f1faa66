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

//! Types and functions to poll Compute Engine zone operations.
//!
//! Deleting an instance or a disk in Compute Engine starts a *zone operation*.
//! The request returns right away, with an [Operation][model::Operation]
//! describing the work in progress. The application must query the status of
//! that operation until it reaches a terminal state.
//!
//! This crate automates that loop. A [Poller] submits the request, queries the
//! operation status with a bounded number of attempts, waits between attempts
//! according to a [polling backoff policy], reports progress to a
//! [ProgressSink], and produces exactly one [PollResult].
//!
//! # Example
//! ```
//! # use compute_ops_lro as lro;
//! use lro::{Poller, PollResult};
//! use lro::client::ZoneOperations;
//! # use lro::model::Operation;
//! # #[derive(Debug)]
//! # struct Fake;
//! # impl lro::stub::ZoneOperations for Fake {
//! #     async fn delete_instance(&self, _: String, _: String, _: String) -> lro::Result<Operation> {
//! #         Ok(Operation::default().set_name("operation-1234").set_status("PENDING"))
//! #     }
//! #     async fn get_zone_operation(&self, _: String, _: String, _: String) -> lro::Result<Operation> {
//! #         Ok(Operation::default().set_name("operation-1234").set_status("DONE"))
//! #     }
//! # }
//! # tokio_test(async {
//! let client = ZoneOperations::from_stub(Fake, "my-project");
//! let result = client
//!     .delete_instance("us-central1-f", "my-instance")
//!     .until_done()
//!     .await;
//! match result {
//!     PollResult::Succeeded(op) => println!("deleted, operation={}", op.name),
//!     r => println!("{}", r.message()),
//! }
//! # });
//! # fn tokio_test<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(f);
//! # }
//! ```
//!
//! [polling backoff policy]: gax::polling_backoff_policy

pub use gax::Result;
pub use gax::error::Error;
use model::Operation;
use std::future::Future;

pub mod builder;
pub mod client;
pub mod model;
pub mod registry;
pub mod self_link;
pub mod sink;
pub mod stub;

mod zone;
pub use sink::ProgressSink;
pub use zone::{ZonePollerBuilder, new_zone_poller};

/// The final disposition of a poll sequence.
///
/// Each poll sequence produces exactly one `PollResult`.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum PollResult {
    /// The operation reached the `DONE` status.
    ///
    /// Compute Engine may report errors in a completed operation, see
    /// [PollResult::into_result].
    Succeeded(Operation),

    /// The operation reached the `ERROR` status.
    Failed(Operation),

    /// The service returned a status this library does not recognize.
    ///
    /// The raw status string is preserved in `status`.
    UnknownStatus { operation: Operation, status: String },

    /// The poller performed all its status queries and the operation was
    /// still in progress.
    ///
    /// The operation may still complete. Applications can start a new poll
    /// sequence using the operation `name`.
    ExhaustedRetries { name: String, attempts: u32 },

    /// Submitting the request, or querying the operation status, failed.
    ///
    /// Errors are not retried.
    TransportError(Error),

    /// The poll sequence was cancelled.
    Cancelled,
}

impl PollResult {
    /// Returns the user-facing progress value for terminal outcomes that map
    /// to one.
    pub fn progress(&self) -> Option<Progress> {
        match self {
            Self::Succeeded(_) => Some(Progress::Succeeded),
            Self::Failed(_) => Some(Progress::Failed),
            Self::UnknownStatus { .. } => Some(Progress::UnknownStatus),
            Self::ExhaustedRetries { .. } | Self::TransportError(_) | Self::Cancelled => None,
        }
    }

    /// A short message suitable to show to users.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Succeeded(_) => Progress::Succeeded.message(),
            Self::Failed(_) | Self::TransportError(_) => Progress::Failed.message(),
            Self::UnknownStatus { .. } => Progress::UnknownStatus.message(),
            Self::ExhaustedRetries { .. } => Progress::StillRunning.message(),
            Self::Cancelled => "Operation cancelled.",
        }
    }

    /// Returns true if the operation reached the `DONE` status.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Converts the outcome to a [Result].
    ///
    /// A completed operation that reports errors, or an operation in the
    /// `ERROR` status, maps to [Error::service] with the condensed error
    /// details.
    ///
    /// # Example
    /// ```
    /// # use compute_ops_lro::PollResult;
    /// # use compute_ops_lro::model::Operation;
    /// let result = PollResult::ExhaustedRetries { name: "operation-1234".into(), attempts: 8 };
    /// let err = result.into_result().unwrap_err();
    /// assert!(err.is_exhausted());
    /// ```
    pub fn into_result(self) -> Result<Operation> {
        use gax::error::rpc::{Code, Status};
        match self {
            Self::Succeeded(op) => match op.error_status() {
                None => Ok(op),
                Some(status) => Err(Error::service(status)),
            },
            Self::Failed(op) => {
                let status = op.error_status().unwrap_or_else(|| {
                    Status::default()
                        .set_code(Code::Unknown)
                        .set_message(format!("operation {} failed", op.name))
                });
                Err(Error::service(status))
            }
            Self::UnknownStatus { operation, status } => Err(Error::other(format!(
                "operation {} returned an unknown status {status:?}",
                operation.name
            ))),
            Self::ExhaustedRetries { name, attempts } => Err(Error::exhausted(format!(
                "operation {name} still running after {attempts} status queries"
            ))),
            Self::TransportError(e) => Err(e),
            Self::Cancelled => Err(Error::service(
                Status::default()
                    .set_code(Code::Cancelled)
                    .set_message("the poll sequence was cancelled"),
            )),
        }
    }
}

/// The user-facing progress of a zone operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Progress {
    StillRunning,
    Succeeded,
    Failed,
    UnknownStatus,
}

impl Progress {
    /// A short message suitable to show to users.
    pub fn message(&self) -> &'static str {
        match self {
            Self::StillRunning => "Operation still running.",
            Self::Succeeded => "Operation succeeded.",
            Self::Failed => "Operation failed.",
            Self::UnknownStatus => "Operation returned an unknown status.",
        }
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Reports an in-progress status query.
///
/// Every notification stands for [Progress::StillRunning]. Terminal outcomes
/// arrive as [Event::Completed].
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Notification {
    /// The status query number, starting at 1.
    pub attempt: u32,
    /// The operation snapshot returned by the query.
    pub operation: Operation,
}

/// The events produced by a poll sequence.
///
/// A sequence produces zero or more [Event::Progress] values, in attempt
/// order, followed by exactly one [Event::Completed].
#[derive(Clone, Debug)]
pub enum Event {
    Progress(Notification),
    Completed(PollResult),
}

/// The trait implemented by zone operation pollers.
///
/// This trait is sealed, applications obtain implementations from
/// [new_zone_poller], [ZonePollerBuilder::build], or the
/// [client][crate::client] builders.
pub trait Poller: Send + sealed::Poller {
    /// Advances the poll sequence by one step.
    ///
    /// The first call submits the request and performs the first status
    /// query. Later calls wait for the backoff period and query again. Returns
    /// `None` once an [Event::Completed] has been returned.
    fn poll(&mut self) -> impl Future<Output = Option<Event>> + Send;

    /// Runs the poll sequence to completion.
    fn until_done(self) -> impl Future<Output = PollResult> + Send;

    /// Converts a poller to a [futures::Stream].
    #[cfg(feature = "unstable-stream")]
    fn into_stream(self) -> impl futures::Stream<Item = Event> + Unpin;
}

pub(crate) mod sealed {
    pub trait Poller {}
}
