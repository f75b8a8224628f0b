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

//! Reporting of validation events.
//!
//! The validator never logs through global state; it is handed a
//! [`Reporter`] and reports through it.

use tracing::{error, info};

/// ResourceRef identifies the resource an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef<'a> {
    pub kind: &'a str,
    pub namespace: &'a str,
    pub name: &'a str,
}

/// Reporter receives validation events.
pub trait Reporter: Send + Sync {
    /// A lifecycle step for a resource, e.g. `validate create`.
    fn info(&self, message: &str, resource: ResourceRef<'_>);

    /// A failure worth surfacing on its own, e.g. an unknown action.
    fn error(&self, message: &str, detail: &str, resource: ResourceRef<'_>);
}

/// TracingReporter emits events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str, resource: ResourceRef<'_>) {
        info!(
            kind = resource.kind,
            namespace = resource.namespace,
            name = resource.name,
            "{}",
            message
        );
    }

    fn error(&self, message: &str, detail: &str, resource: ResourceRef<'_>) {
        error!(
            kind = resource.kind,
            namespace = resource.namespace,
            name = resource.name,
            error = detail,
            "{}",
            message
        );
    }
}

/// NoopReporter drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn info(&self, _message: &str, _resource: ResourceRef<'_>) {}

    fn error(&self, _message: &str, _detail: &str, _resource: ResourceRef<'_>) {}
}
