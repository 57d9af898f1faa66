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

//! Traits to mock the clients in this library.
//!
//! This library does not include a transport. Applications implement
//! [ZoneOperations] on top of their HTTP client of choice, or mock it in
//! tests, and wrap it with [crate::client::ZoneOperations].

use crate::Result;
use crate::model::Operation;
use gax::error::Error;
use gax::error::rpc::{Code, Status};

/// Defines the trait used to implement [crate::client::ZoneOperations].
///
/// Application developers may need to implement this trait to mock
/// `client::ZoneOperations`. In other use-cases, application developers only
/// use `client::ZoneOperations` and need not be concerned with this trait or
/// its implementations.
///
/// The trait provides a default implementation of each method. These
/// implementations return an [Unimplemented][Code::Unimplemented] error.
pub trait ZoneOperations: std::fmt::Debug + Send + Sync {
    /// Implements [crate::client::ZoneOperations::delete_instance].
    fn delete_instance(
        &self,
        _project: String,
        _zone: String,
        _instance: String,
    ) -> impl std::future::Future<Output = Result<Operation>> + Send {
        unimplemented_stub("delete_instance")
    }

    /// Implements [crate::client::ZoneOperations::delete_disk].
    fn delete_disk(
        &self,
        _project: String,
        _zone: String,
        _disk: String,
    ) -> impl std::future::Future<Output = Result<Operation>> + Send {
        unimplemented_stub("delete_disk")
    }

    /// Queries the status of a zone operation.
    fn get_zone_operation(
        &self,
        _project: String,
        _zone: String,
        _operation: String,
    ) -> impl std::future::Future<Output = Result<Operation>> + Send {
        unimplemented_stub("get_zone_operation")
    }
}

async fn unimplemented_stub(method: &'static str) -> Result<Operation> {
    Err(Error::service(
        Status::default()
            .set_code(Code::Unimplemented)
            .set_message(format!("{method} is not implemented by this stub")),
    ))
}
