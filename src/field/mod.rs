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

//! Field-scoped validation errors.
//!
//! Every failed check produces a [`FieldError`] tagged with the [`Path`] of
//! the offending field. Checks collect into an [`ErrorList`], which folds into
//! a single [`AggregateError`] once validation of a resource is finished.

use serde_json::Value;
use std::fmt;

/// Path is the structural locator of a field inside a resource, e.g.
/// `spec.scheduler.cron` or `spec.deviceNames[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Field(String),
    Index(usize),
}

impl Path {
    /// Create a root path with the given field name.
    pub fn new(name: &str) -> Self {
        Self {
            segments: vec![Segment::Field(name.to_string())],
        }
    }

    /// Returns a new path pointing at the named child field.
    pub fn child(&self, name: &str) -> Self {
        self.with(Segment::Field(name.to_string()))
    }

    /// Returns a new path pointing at an element of a list field.
    pub fn index(&self, index: usize) -> Self {
        self.with(Segment::Index(index))
    }

    fn with(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => write!(f, "{}", name)?,
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// ErrorType classifies a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// Required indicates a required field is missing.
    Required,
    /// Invalid indicates the field holds a value that fails a constraint.
    Invalid,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Required => "Required value",
            ErrorType::Invalid => "Invalid value",
        }
    }
}

/// FieldError is a single validation failure on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub error_type: ErrorType,
    pub path: Path,
    pub bad_value: Value,
    pub detail: String,
}

impl FieldError {
    /// A field holds an invalid value. `None` records an absent value.
    pub fn invalid(path: Path, value: impl Into<Value>, detail: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::Invalid,
            path,
            bad_value: value.into(),
            detail: detail.into(),
        }
    }

    /// A required field is missing.
    pub fn required(path: Path, detail: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::Required,
            path,
            bad_value: Value::Null,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error_type.as_str())?;
        if self.error_type == ErrorType::Invalid {
            write!(f, ": {}", self.bad_value)?;
        }
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

/// ErrorList is an ordered collection of field errors. An empty list means
/// the checked fields are valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorList {
    errors: Vec<FieldError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Append every error of `other`, keeping its order.
    pub fn append(&mut self, other: ErrorList) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// Fold the list into a single error, or `None` when the list is empty.
    pub fn to_aggregate(&self) -> Option<AggregateError> {
        if self.errors.is_empty() {
            return None;
        }
        Some(AggregateError {
            errors: self.errors.clone(),
        })
    }
}

impl From<FieldError> for ErrorList {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl FromIterator<FieldError> for ErrorList {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// AggregateError is the immutable result of folding a non-empty ErrorList.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateError {
    errors: Vec<FieldError>,
}

impl AggregateError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.errors.as_slice() {
            return write!(f, "{}", only);
        }
        let error_strings: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "[{}]", error_strings.join(", "))
    }
}

impl std::error::Error for AggregateError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_path_display() {
        let spec = Path::new("spec");
        assert_eq!(spec.to_string(), "spec");
        assert_eq!(spec.child("scheduler").child("cron").to_string(), "spec.scheduler.cron");
        assert_eq!(spec.child("deviceNames").index(2).to_string(), "spec.deviceNames[2]");
    }

    #[test]
    fn test_child_does_not_modify_parent() {
        let spec = Path::new("spec");
        let _ = spec.child("action");
        assert_eq!(spec.to_string(), "spec");
    }

    #[test]
    fn test_invalid_error_display() {
        let err = FieldError::invalid(
            Path::new("spec").child("action"),
            "node-explode",
            "unknown action type",
        );
        assert_eq!(
            err.to_string(),
            "spec.action: Invalid value: \"node-explode\": unknown action type"
        );
    }

    #[test]
    fn test_invalid_error_with_absent_value() {
        let err = FieldError::invalid(
            Path::new("spec").child("deviceNames"),
            Value::Null,
            "at least one device name is required",
        );
        assert_eq!(
            err.to_string(),
            "spec.deviceNames: Invalid value: null: at least one device name is required"
        );
    }

    #[test]
    fn test_required_error_display() {
        let err = FieldError::required(Path::new("spec").child("scheduler"), "");
        assert_eq!(err.to_string(), "spec.scheduler: Required value");
    }

    #[test]
    fn test_empty_list_has_no_aggregate() {
        assert!(ErrorList::new().to_aggregate().is_none());
    }

    #[test]
    fn test_single_error_aggregate_is_unbracketed() {
        let list = ErrorList::from(FieldError::required(Path::new("spec").child("scheduler"), ""));
        let agg = list.to_aggregate().unwrap();
        assert_eq!(agg.to_string(), "spec.scheduler: Required value");
    }

    #[test]
    fn test_aggregate_preserves_order() {
        let spec = Path::new("spec");
        let mut list = ErrorList::new();
        list.push(FieldError::invalid(spec.child("scheduler").child("cron"), "bad", "first"));
        let mut other = ErrorList::new();
        other.push(FieldError::invalid(spec.child("deviceNames"), Value::Null, "second"));
        list.append(other);

        assert_eq!(list.len(), 2);
        let msg = list.to_aggregate().unwrap().to_string();
        assert!(msg.starts_with('['));
        assert!(msg.ends_with(']'));
        let first = msg.find("first").unwrap();
        let second = msg.find("second").unwrap();
        assert!(first < second);
        assert!(msg.contains("spec.scheduler.cron"));
        assert!(msg.contains("spec.deviceNames"));
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let list: ErrorList = vec![
            FieldError::invalid(Path::new("spec").child("a"), "x", "one"),
            FieldError::invalid(Path::new("spec").child("b"), 3, "two"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            list.to_aggregate().unwrap().to_string(),
            list.to_aggregate().unwrap().to_string()
        );
    }
}
