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

//! Validation engine for chaos resources.
//!
//! [`ResourceValidator`] looks up the resource's action in its kind's rule
//! table, checks the scheduler under the action's [`RecurrencePolicy`], runs
//! the action-specific field checks, and folds everything into one verdict.

pub mod aws;
pub mod cron;
pub mod duration;
pub mod gcp;
pub mod reporter;
pub mod rules;
pub mod scheduler;
pub mod validator;

pub use reporter::{NoopReporter, Reporter, ResourceRef, TracingReporter};
pub use rules::{ActionCheck, ActionRule};
pub use scheduler::RecurrencePolicy;
pub use validator::{ChaosObject, ResourceValidator, ValidationError};
