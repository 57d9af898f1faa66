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

use serde::{Deserialize, Serialize};

/// The error details reported by the service.
///
/// Compute Engine reports operation errors as a list of `{code, message}`
/// entries, where the code is a string. The poller condenses those entries
/// into a single `Status`, using the first entry with a recognized code and
/// the first entry with a message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Status {
    /// The status code.
    pub code: Code,

    /// A developer-facing error message, which should be in English.
    pub message: String,
}

impl Status {
    /// Sets the value for [code][Status::code].
    pub fn set_code<T: Into<Code>>(mut self, v: T) -> Self {
        self.code = v.into();
        self
    }

    /// Sets the value for [message][Status::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }
}

/// The canonical error codes for Google APIs.
///
/// Sometimes multiple error codes may apply. Services should return the most
/// specific error code that applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Code {
    /// Not an error; returned on success.
    Ok = 0,

    /// The operation was cancelled, typically by the caller.
    Cancelled = 1,

    /// Unknown error. Errors raised by APIs that do not return enough error
    /// information may be converted to this error.
    #[default]
    Unknown = 2,

    /// The client specified an invalid argument.
    InvalidArgument = 3,

    /// The deadline expired before the operation could complete.
    DeadlineExceeded = 4,

    /// Some requested entity (e.g., an instance or a disk) was not found.
    NotFound = 5,

    /// The entity that a client attempted to create already exists.
    AlreadyExists = 6,

    /// The caller does not have permission to execute the specified operation.
    PermissionDenied = 7,

    /// Some resource has been exhausted, perhaps a per-project quota.
    ResourceExhausted = 8,

    /// The system is not in a state required for the operation's execution.
    /// For example, deleting a disk that is still attached to an instance.
    FailedPrecondition = 9,

    /// The operation was aborted, typically due to a concurrency issue.
    Aborted = 10,

    /// The operation was attempted past the valid range.
    OutOfRange = 11,

    /// The operation is not implemented or is not supported/enabled.
    Unimplemented = 12,

    /// Internal errors.
    Internal = 13,

    /// The service is currently unavailable.
    Unavailable = 14,

    /// Unrecoverable data loss or corruption.
    DataLoss = 15,

    /// The request does not have valid authentication credentials.
    Unauthenticated = 16,
}

// Indexed by the numeric value of each code.
const CODES: [(Code, &str); 17] = [
    (Code::Ok, "OK"),
    (Code::Cancelled, "CANCELLED"),
    (Code::Unknown, "UNKNOWN"),
    (Code::InvalidArgument, "INVALID_ARGUMENT"),
    (Code::DeadlineExceeded, "DEADLINE_EXCEEDED"),
    (Code::NotFound, "NOT_FOUND"),
    (Code::AlreadyExists, "ALREADY_EXISTS"),
    (Code::PermissionDenied, "PERMISSION_DENIED"),
    (Code::ResourceExhausted, "RESOURCE_EXHAUSTED"),
    (Code::FailedPrecondition, "FAILED_PRECONDITION"),
    (Code::Aborted, "ABORTED"),
    (Code::OutOfRange, "OUT_OF_RANGE"),
    (Code::Unimplemented, "UNIMPLEMENTED"),
    (Code::Internal, "INTERNAL"),
    (Code::Unavailable, "UNAVAILABLE"),
    (Code::DataLoss, "DATA_LOSS"),
    (Code::Unauthenticated, "UNAUTHENTICATED"),
];

impl Code {
    /// The canonical name, as used in Compute Engine error entries.
    pub fn name(&self) -> &'static str {
        CODES[*self as usize].1
    }
}

impl std::convert::From<i32> for Code {
    fn from(value: i32) -> Self {
        usize::try_from(value)
            .ok()
            .and_then(|i| CODES.get(i))
            .map(|(c, _)| *c)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compute Engine also reports codes outside this set, such as
/// `RESOURCE_IN_USE_BY_ANOTHER_RESOURCE`. Those fail the conversion.
impl std::convert::TryFrom<&str> for Code {
    type Error = String;
    fn try_from(value: &str) -> std::result::Result<Code, Self::Error> {
        CODES
            .iter()
            .find(|(_, name)| *name == value)
            .map(|(c, _)| *c)
            .ok_or_else(|| format!("unknown status code value {value}"))
    }
}

impl Serialize for Code {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Code::try_from(value.as_str()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Code::Ok)]
    #[test_case(Code::Cancelled)]
    #[test_case(Code::Unknown)]
    #[test_case(Code::InvalidArgument)]
    #[test_case(Code::DeadlineExceeded)]
    #[test_case(Code::NotFound)]
    #[test_case(Code::AlreadyExists)]
    #[test_case(Code::PermissionDenied)]
    #[test_case(Code::ResourceExhausted)]
    #[test_case(Code::FailedPrecondition)]
    #[test_case(Code::Aborted)]
    #[test_case(Code::OutOfRange)]
    #[test_case(Code::Unimplemented)]
    #[test_case(Code::Internal)]
    #[test_case(Code::Unavailable)]
    #[test_case(Code::DataLoss)]
    #[test_case(Code::Unauthenticated)]
    fn code_names(input: Code) {
        let got = Code::try_from(input.name());
        assert_eq!(got, Ok(input));
        assert_eq!(Code::from(input as i32), input);
        assert_eq!(input.to_string(), input.name());
    }

    #[test]
    fn code_unknown_values() {
        assert_eq!(Code::from(-1), Code::Unknown);
        assert_eq!(Code::from(17), Code::Unknown);
        let got = Code::try_from("RESOURCE_NOT_FOUND");
        assert!(got.is_err(), "{got:?}");
    }

    #[test]
    fn status_setters() {
        let status = Status::default()
            .set_code(Code::NotFound)
            .set_message("instance not found");
        assert_eq!(status.code, Code::NotFound);
        assert_eq!(status.message, "instance not found");
    }

    #[test]
    fn status_serde() -> anyhow::Result<()> {
        let input = serde_json::json!({"code": "FAILED_PRECONDITION", "message": "disk in use"});
        let got = serde_json::from_value::<Status>(input)?;
        assert_eq!(
            got,
            Status::default()
                .set_code(Code::FailedPrecondition)
                .set_message("disk in use")
        );

        let input = serde_json::json!({"code": "QUOTA_EXCEEDED"});
        let got = serde_json::from_value::<Status>(input)?;
        assert_eq!(got, Status::default());

        let value = serde_json::to_value(
            Status::default()
                .set_code(Code::Unavailable)
                .set_message("try-again"),
        )?;
        assert_eq!(
            value,
            serde_json::json!({"code": "UNAVAILABLE", "message": "try-again"})
        );
        Ok(())
    }
}
