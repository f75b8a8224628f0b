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

//! Rules for GcpChaos.

use super::rules::ActionRule;
use super::scheduler::RecurrencePolicy;
use super::validator::ChaosObject;
use crate::api::chaos::{GcpAction, GcpChaos, GcpChaosSpec, SchedulerSpec};
use crate::field::{ErrorList, FieldError, Path};
use serde_json::Value;

/// Action rule table of GcpChaos.
pub static GCP_ACTION_RULES: &[ActionRule<GcpChaosSpec>] = &[
    ActionRule {
        action: GcpAction::NodeStop.as_str(),
        recurrence: RecurrencePolicy::Required,
        checks: &[],
    },
    ActionRule {
        action: GcpAction::DiskLoss.as_str(),
        recurrence: RecurrencePolicy::Required,
        checks: &[validate_device_names],
    },
    // A reset is instantaneous, so any duration given is ignored.
    ActionRule {
        action: GcpAction::NodeReset.as_str(),
        recurrence: RecurrencePolicy::Ignored,
        checks: &[],
    },
];

impl ChaosObject for GcpChaos {
    type Spec = GcpChaosSpec;

    fn spec(&self) -> &GcpChaosSpec {
        &self.spec
    }

    fn action(&self) -> &str {
        &self.spec.action
    }

    fn scheduler(&self) -> Option<&SchedulerSpec> {
        self.spec.scheduler.as_ref()
    }

    fn action_rules() -> &'static [ActionRule<GcpChaosSpec>] {
        GCP_ACTION_RULES
    }
}

/// `disk-loss` needs at least one non-empty device name.
fn validate_device_names(spec: &GcpChaosSpec, spec_path: &Path) -> ErrorList {
    let field = spec_path.child("deviceNames");
    let mut all_errs = ErrorList::new();

    match &spec.device_names {
        None => all_errs.push(FieldError::invalid(
            field,
            Value::Null,
            format!("at least one device name is required on {} action", spec.action),
        )),
        Some(names) if names.is_empty() => all_errs.push(FieldError::invalid(
            field,
            Value::Array(vec![]),
            format!("at least one device name is required on {} action", spec.action),
        )),
        Some(names) => {
            for (i, name) in names.iter().enumerate() {
                if name.is_empty() {
                    all_errs.push(FieldError::invalid(
                        field.index(i),
                        name.as_str(),
                        "device name must not be empty",
                    ));
                }
            }
        }
    }
    all_errs
}
