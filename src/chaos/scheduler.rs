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

//! Recurrence (scheduler) validation.

use super::cron::parse_standard;
use super::duration::parse_duration;
use crate::api::chaos::SchedulerSpec;
use crate::field::{ErrorList, FieldError, Path};

/// RecurrencePolicy is how an action treats `spec.scheduler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrencePolicy {
    /// The action must run on a schedule.
    Required,
    /// The action may run once or on a schedule.
    Optional,
    /// The action has no notion of how long it lasts. A scheduler may be
    /// given; its cron must still parse but its duration is not looked at.
    Ignored,
}

/// Validate `scheduler` under `policy`. `spec` is the path of the enclosing
/// spec; errors are reported under `spec.scheduler`.
pub fn validate_scheduler(
    policy: RecurrencePolicy,
    scheduler: Option<&SchedulerSpec>,
    spec: &Path,
) -> ErrorList {
    let scheduler_field = spec.child("scheduler");
    let mut all_errs = ErrorList::new();

    match (policy, scheduler) {
        (RecurrencePolicy::Required, None) => {
            all_errs.push(FieldError::required(
                scheduler_field,
                "a scheduler is required for this action",
            ));
        }
        (RecurrencePolicy::Optional, None) | (RecurrencePolicy::Ignored, None) => {}
        (RecurrencePolicy::Required, Some(s)) | (RecurrencePolicy::Optional, Some(s)) => {
            all_errs.append(validate_cron(&s.cron, &scheduler_field.child("cron")));
            if let Some(duration) = &s.duration {
                all_errs.append(validate_duration(duration, &scheduler_field.child("duration")));
            }
        }
        (RecurrencePolicy::Ignored, Some(s)) => {
            all_errs.append(validate_cron(&s.cron, &scheduler_field.child("cron")));
        }
    }
    all_errs
}

/// Validate a cron expression at `field`.
pub fn validate_cron(cron: &str, field: &Path) -> ErrorList {
    match parse_standard(cron) {
        Ok(_) => ErrorList::new(),
        Err(e) => FieldError::invalid(
            field.clone(),
            cron,
            format!("parse cron spec error: {}", e),
        )
        .into(),
    }
}

/// Validate a duration string at `field`.
pub fn validate_duration(duration: &str, field: &Path) -> ErrorList {
    match parse_duration(duration) {
        Ok(_) => ErrorList::new(),
        Err(e) => FieldError::invalid(
            field.clone(),
            duration,
            format!("parse duration field error: {}", e),
        )
        .into(),
    }
}
