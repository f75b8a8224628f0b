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

//! Admission-time validation of chaos experiment resources.
//!
//! A chaos resource names an action to inject, an optional recurring
//! schedule, and action-specific parameters. Before the resource is stored,
//! [`chaos::ResourceValidator`] decides whether that definition is
//! internally consistent and reports every problem it finds in one error.
//! The [`plugins::chaosvalidation`] plugin hooks the validator into the
//! admission chain.

pub mod admission;
pub mod api;
pub mod chaos;
pub mod field;
pub mod plugins;

// Re-export commonly used types
pub use admission::{
    AdmissionError, AdmissionResult, Attributes, AttributesRecord, Handler, Interface,
    MutationInterface, Operation, ValidationInterface,
};
pub use api::chaos::{
    AwsAction, AwsChaos, AwsChaosSpec, GcpAction, GcpChaos, GcpChaosSpec, ObjectMeta,
    SchedulerSpec, SelectorSpec,
};
pub use chaos::{ChaosObject, RecurrencePolicy, Reporter, ResourceValidator, ValidationError};
pub use field::{ErrorList, FieldError, Path};
