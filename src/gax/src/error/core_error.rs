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

use super::rpc::Status;
use std::error::Error as StdError;
use std::sync::Arc;

type BoxError = Box<dyn StdError + Send + Sync>;
type SharedError = Arc<dyn StdError + Send + Sync>;

fn shared<T: Into<BoxError>>(source: T) -> SharedError {
    let source: BoxError = source.into();
    SharedError::from(source)
}

/// The core error returned by the poller and the client.
///
/// Errors come from multiple sources. The service may reject a request, the
/// transport may be unable to reach the service, a response may not decode
/// into the expected shape, or the request may be missing required inputs.
///
/// Most applications will just report the error or log it. Some applications
/// may need to interrogate the error details, this type offers a series of
/// predicates to determine the error kind. Applications can query the error
/// [source][std::error::Error::source] for deeper information.
///
/// Unlike most error types, `Error` is cheap to clone. Terminal outcomes are
/// fanned out to progress sinks and completion callbacks, and each receives
/// its own copy.
///
/// # Example
/// ```
/// use compute_ops_gax::error::Error;
/// match example_function() {
///     Err(e) if matches!(e.status(), Some(_)) => {
///         println!("service error {e}, debug using {:?}", e.status().unwrap());
///     },
///     Err(e) if e.is_io() => { println!("cannot reach the service {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # use compute_ops_gax::error::rpc::{Code, Status};
///     # Err(Error::service(Status::default().set_code(Code::NotFound).set_message("NOT FOUND")))
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<SharedError>,
}

impl Error {
    /// Creates an error with the information returned by the service.
    ///
    /// # Example
    /// ```
    /// use compute_ops_gax::error::Error;
    /// use compute_ops_gax::error::rpc::{Code, Status};
    /// let status = Status::default().set_code(Code::NotFound).set_message("NOT FOUND");
    /// let error = Error::service(status.clone());
    /// assert_eq!(error.status(), Some(&status));
    /// ```
    pub fn service(status: Status) -> Self {
        Self {
            kind: ErrorKind::Service(Box::new(status)),
            source: None,
        }
    }

    /// The [Status] payload associated with this error.
    ///
    /// Only errors created with [Error::service] carry a status.
    pub fn status(&self) -> Option<&Status> {
        match &self.kind {
            ErrorKind::Service(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Creates an error representing an I/O problem reaching the service.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use compute_ops_gax::error::Error;
    /// let error = Error::io("connection reset by peer");
    /// assert!(error.is_io());
    /// assert!(error.source().is_some());
    /// ```
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Io,
            source: Some(shared(source)),
        }
    }

    /// The request could not be sent, or the response could not be received.
    ///
    /// The request may or may not have reached the service. If the request
    /// mutates any state in the service, it may or may not be safe to attempt
    /// it again.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }

    /// Creates an error representing a response that could not be decoded.
    ///
    /// # Example
    /// ```
    /// use compute_ops_gax::error::Error;
    /// let error = Error::deser("missing field `name`");
    /// assert!(error.is_deserialization());
    /// ```
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(shared(source)),
        }
    }

    /// The response was received, but it does not have the expected shape.
    ///
    /// # Troubleshooting
    ///
    /// This indicates a bug in the service or in the stub that produced the
    /// response. Operations handed to the poller must carry a non-empty name,
    /// a response without one is reported as a deserialization error.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Creates an error representing a request that could not be formatted.
    ///
    /// # Example
    /// ```
    /// use compute_ops_gax::error::Error;
    /// let error = Error::binding("missing zone");
    /// assert!(error.is_binding());
    /// ```
    pub fn binding<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Binding,
            source: Some(shared(source)),
        }
    }

    /// A required request parameter was missing or malformed.
    ///
    /// The request was never sent.
    pub fn is_binding(&self) -> bool {
        matches!(self.kind, ErrorKind::Binding)
    }

    /// Creates an error representing an exhausted policy.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use compute_ops_gax::error::Error;
    /// let error = Error::exhausted("too many polling attempts");
    /// assert!(error.is_exhausted());
    /// assert!(error.source().is_some());
    /// ```
    pub fn exhausted<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Exhausted,
            source: Some(shared(source)),
        }
    }

    /// The polling loop stopped before the operation reached a terminal state.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, ErrorKind::Exhausted)
    }

    /// Creates an unclassified error.
    pub fn other<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Other,
            source: Some(shared(source)),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let ErrorKind::Service(s) = &self.kind {
            return write!(f, "Compute Engine returned {}: {}", s.code, s.message);
        }
        let prefix = match self.kind {
            ErrorKind::Io => "cannot reach Compute Engine",
            ErrorKind::Deserialization => "unusable Compute Engine response",
            ErrorKind::Binding => "invalid request",
            ErrorKind::Exhausted => "polling budget exhausted",
            ErrorKind::Other | ErrorKind::Service(_) => "zone operation error",
        };
        match &self.source {
            Some(e) => write!(f, "{prefix}: {e}"),
            None => f.write_str(prefix),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// The type of error held by an [Error] instance.
#[derive(Clone, Debug)]
enum ErrorKind {
    Io,
    Deserialization,
    Binding,
    Exhausted,
    Service(Box<Status>),
    /// A uncategorized error.
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::rpc::Code;
    use std::error::Error as StdError;

    #[test]
    fn service() {
        let status = Status::default()
            .set_code(Code::NotFound)
            .set_message("NOT FOUND");
        let error = Error::service(status.clone());
        assert!(error.source().is_none(), "{error:?}");
        assert_eq!(error.status(), Some(&status));
        assert!(error.to_string().contains("NOT FOUND"), "{error}");
        assert!(error.to_string().contains(Code::NotFound.name()), "{error}");
        assert!(!error.is_io(), "{error:?}");
    }

    #[test]
    fn io() {
        let error = Error::io("connection reset");
        assert!(error.is_io(), "{error:?}");
        assert!(error.source().is_some(), "{error:?}");
        assert!(error.status().is_none(), "{error:?}");
        assert!(error.to_string().contains("connection reset"), "{error}");
    }

    #[test]
    fn deser() {
        let error = Error::deser("missing name");
        assert!(error.is_deserialization(), "{error:?}");
        assert!(!error.is_io(), "{error:?}");
        assert!(error.to_string().contains("missing name"), "{error}");
    }

    #[test]
    fn binding() {
        let error = Error::binding("missing zone");
        assert!(error.is_binding(), "{error:?}");
        assert!(error.to_string().contains("missing zone"), "{error}");
    }

    #[test]
    fn exhausted() {
        let error = Error::exhausted("too many attempts");
        assert!(error.is_exhausted(), "{error:?}");
        assert_eq!(error.to_string(), "polling budget exhausted: too many attempts");
    }

    #[test]
    fn other() {
        let error = Error::other("uh-oh");
        assert!(!error.is_io(), "{error:?}");
        assert!(!error.is_deserialization(), "{error:?}");
        assert!(error.to_string().contains("uh-oh"), "{error}");
    }

    #[test]
    fn clone_shares_source() {
        let error = Error::io("connection reset");
        let copy = error.clone();
        assert!(copy.is_io(), "{copy:?}");
        assert_eq!(copy.to_string(), error.to_string());
    }
}
