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

mod core_error;
pub use core_error::*;

/// Errors and error details returned by the Compute Engine service.
///
/// The poller distinguishes between errors detected while trying to reach
/// the service (e.g. cannot open a connection), errors trying to decode a
/// response, and errors returned by the service itself.
///
/// The types in this module represent the detailed information returned by
/// the service.
///
/// # Examples
///
/// ```
/// # use compute_ops_gax::error;
/// use error::Error;
/// use error::rpc::Status;
/// fn handle_error(e: Error) {
///     if let Some(status) = e.status() {
///         println!("the service reported {status:?}")
///     }
/// }
/// ```
pub mod rpc;
