// Copyright 2024 The Kubernetes Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Admission error types.

use crate::chaos::ValidationError;
use crate::field::AggregateError;
use thiserror::Error;

/// Result type for admission operations.
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// AdmissionError represents errors that can occur during admission.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// BadRequest indicates a malformed request or plugin configuration.
    #[error("{0}")]
    BadRequest(String),

    /// Invalid indicates the object failed validation.
    #[error("{kind} \"{name}\" is invalid: {errors}")]
    Invalid {
        kind: String,
        name: String,
        errors: AggregateError,
    },

    /// Internal represents an internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AdmissionError {
    /// Create a new BadRequest error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AdmissionError::BadRequest(msg.into())
    }

    /// Create an Internal error.
    pub fn internal_error(msg: impl Into<String>) -> Self {
        AdmissionError::Internal(msg.into())
    }
}

impl From<ValidationError> for AdmissionError {
    fn from(err: ValidationError) -> Self {
        AdmissionError::Invalid {
            kind: err.kind,
            name: err.name,
            errors: err.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ErrorList, FieldError, Path};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_error_display() {
        let errors = ErrorList::from(FieldError::required(
            Path::new("spec").child("scheduler"),
            "",
        ))
        .to_aggregate()
        .unwrap();
        let err = AdmissionError::from(ValidationError {
            kind: "GcpChaos".to_string(),
            namespace: "default".to_string(),
            name: "stop".to_string(),
            errors,
        });
        assert_eq!(
            err.to_string(),
            "GcpChaos \"stop\" is invalid: spec.scheduler: Required value"
        );
    }

    #[test]
    fn test_bad_request_and_internal_display() {
        assert_eq!(AdmissionError::bad_request("bad config").to_string(), "bad config");
        assert_eq!(
            AdmissionError::internal_error("boom").to_string(),
            "internal error: boom"
        );
    }
}
