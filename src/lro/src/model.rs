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

//! The Compute Engine zone operation resource.

use gax::error::rpc::{Code, Status};
use serde::{Deserialize, Serialize};

/// A snapshot of a zone operation, as returned by the service.
///
/// Deleting an instance or a disk returns one of these. The poller reads the
/// [name][Operation::name] to query for newer snapshots, and the
/// [status][Operation::status] to decide when to stop. It never modifies the
/// snapshots it receives.
///
/// # Example
/// ```
/// # use compute_ops_lro::model::{Operation, operation::Status};
/// let op = Operation::default()
///     .set_name("operation-1234")
///     .set_zone("us-central1-f")
///     .set_status("RUNNING");
/// assert_eq!(op.status, Status::Running);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Operation {
    /// The server-assigned name of the operation.
    pub name: String,

    /// The status of the operation.
    pub status: operation::Status,

    /// The zone where the operation runs.
    ///
    /// The service reports this as a full URL, use
    /// [name_from_self_link][crate::self_link::name_from_self_link] to extract
    /// the zone name.
    pub zone: String,

    /// The type of operation, such as `delete`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,

    /// The URL of the resource the operation modifies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,

    /// The URL for this operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    /// An optional progress indicator that ranges from 0 to 100.
    ///
    /// The service does not guarantee this value is monotonic, or that it is
    /// set at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,

    /// An optional textual description of the current status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,

    /// Errors encountered while processing the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<operation::Error>,
}

impl Operation {
    /// Sets the value of [name][Operation::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [status][Operation::status].
    pub fn set_status<T: Into<operation::Status>>(mut self, v: T) -> Self {
        self.status = v.into();
        self
    }

    /// Sets the value of [zone][Operation::zone].
    pub fn set_zone<T: Into<String>>(mut self, v: T) -> Self {
        self.zone = v.into();
        self
    }

    /// Sets the value of [operation_type][Operation::operation_type].
    pub fn set_operation_type<T: Into<String>>(mut self, v: T) -> Self {
        self.operation_type = Some(v.into());
        self
    }

    /// Sets the value of [target_link][Operation::target_link].
    pub fn set_target_link<T: Into<String>>(mut self, v: T) -> Self {
        self.target_link = Some(v.into());
        self
    }

    /// Sets the value of [self_link][Operation::self_link].
    pub fn set_self_link<T: Into<String>>(mut self, v: T) -> Self {
        self.self_link = Some(v.into());
        self
    }

    /// Sets the value of [progress][Operation::progress].
    pub fn set_progress<T: Into<i32>>(mut self, v: T) -> Self {
        self.progress = Some(v.into());
        self
    }

    /// Sets the value of [status_message][Operation::status_message].
    pub fn set_status_message<T: Into<String>>(mut self, v: T) -> Self {
        self.status_message = Some(v.into());
        self
    }

    /// Sets the value of [error][Operation::error].
    pub fn set_error<T: Into<operation::Error>>(mut self, v: T) -> Self {
        self.error = Some(v.into());
        self
    }

    /// Condenses the operation errors, if any, into a single [Status].
    ///
    /// Returns `None` when the operation reports no errors.
    pub fn error_status(&self) -> Option<Status> {
        let error = self.error.as_ref()?;
        if error.errors.is_empty() {
            return None;
        }
        Some(error.into())
    }
}

/// Types nested in [Operation].
pub mod operation {
    use serde::{Deserialize, Serialize};

    /// The status of a zone operation.
    ///
    /// The service reports the status as a string. Values this library does
    /// not recognize are preserved in [Status::Unknown], so they can be
    /// logged and reported verbatim.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    #[non_exhaustive]
    pub enum Status {
        /// The operation was accepted, but it has not started.
        Pending,
        /// The operation is in progress.
        Running,
        /// The operation completed. It may have completed with errors.
        Done,
        /// The operation failed.
        Error,
        /// Any other value. This includes an empty (missing) status.
        Unknown(String),
    }

    impl Status {
        /// The string representation used by the service.
        pub fn name(&self) -> &str {
            match self {
                Self::Pending => "PENDING",
                Self::Running => "RUNNING",
                Self::Done => "DONE",
                Self::Error => "ERROR",
                Self::Unknown(s) => s.as_str(),
            }
        }

        /// Returns true if the operation has not reached a terminal state.
        pub fn is_in_progress(&self) -> bool {
            matches!(self, Self::Pending | Self::Running)
        }
    }

    impl Default for Status {
        fn default() -> Self {
            Self::Unknown(String::new())
        }
    }

    impl std::convert::From<&str> for Status {
        fn from(value: &str) -> Self {
            match value {
                "PENDING" => Self::Pending,
                "RUNNING" => Self::Running,
                "DONE" => Self::Done,
                "ERROR" => Self::Error,
                _ => Self::Unknown(value.to_string()),
            }
        }
    }

    impl std::convert::From<String> for Status {
        fn from(value: String) -> Self {
            Self::from(value.as_str())
        }
    }

    impl std::fmt::Display for Status {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.name())
        }
    }

    impl Serialize for Status {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for Status {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let value = String::deserialize(deserializer)?;
            Ok(Self::from(value))
        }
    }

    /// The errors reported by a zone operation.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    #[non_exhaustive]
    pub struct Error {
        /// The array of errors encountered while processing this operation.
        pub errors: Vec<error::Errors>,
    }

    impl Error {
        /// Sets the value of [errors][Error::errors].
        pub fn set_errors<T, V>(mut self, v: T) -> Self
        where
            T: IntoIterator<Item = V>,
            V: Into<error::Errors>,
        {
            self.errors = v.into_iter().map(|e| e.into()).collect();
            self
        }
    }

    /// Types nested in [Error].
    pub mod error {
        use serde::{Deserialize, Serialize};

        /// A single error entry.
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        #[non_exhaustive]
        pub struct Errors {
            /// The error type identifier for this error.
            #[serde(skip_serializing_if = "Option::is_none")]
            pub code: Option<String>,

            /// Indicates the field in the request that caused the error.
            #[serde(skip_serializing_if = "Option::is_none")]
            pub location: Option<String>,

            /// An optional, human-readable error message.
            #[serde(skip_serializing_if = "Option::is_none")]
            pub message: Option<String>,
        }

        impl Errors {
            /// Sets the value of [code][Errors::code].
            pub fn set_code<T: Into<String>>(mut self, v: T) -> Self {
                self.code = Some(v.into());
                self
            }

            /// Sets the value of [location][Errors::location].
            pub fn set_location<T: Into<String>>(mut self, v: T) -> Self {
                self.location = Some(v.into());
                self
            }

            /// Sets the value of [message][Errors::message].
            pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
                self.message = Some(v.into());
                self
            }
        }
    }
}

impl From<&operation::Error> for Status {
    fn from(value: &operation::Error) -> Self {
        let code = value
            .errors
            .iter()
            .filter_map(|e| e.code.as_ref())
            .filter_map(|c| Code::try_from(c.as_str()).ok())
            .next();
        let message = value.errors.iter().flat_map(|e| e.message.as_ref()).next();

        let status = Status::default();
        let status = code.into_iter().fold(status, |s, c| s.set_code(c));
        message.into_iter().fold(status, |s, m| s.set_message(m))
    }
}
