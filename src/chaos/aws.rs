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

//! Rules for AwsChaos.

use super::rules::ActionRule;
use super::scheduler::RecurrencePolicy;
use super::validator::ChaosObject;
use crate::api::chaos::{AwsAction, AwsChaos, AwsChaosSpec, SchedulerSpec};
use crate::field::{ErrorList, FieldError, Path};

/// Action rule table of AwsChaos.
pub static AWS_ACTION_RULES: &[ActionRule<AwsChaosSpec>] = &[
    ActionRule {
        action: AwsAction::Ec2Stop.as_str(),
        recurrence: RecurrencePolicy::Required,
        checks: &[],
    },
    ActionRule {
        action: AwsAction::DetachVolume.as_str(),
        recurrence: RecurrencePolicy::Optional,
        checks: &[validate_ebs_volume, validate_device_name],
    },
    ActionRule {
        action: AwsAction::Ec2Restart.as_str(),
        recurrence: RecurrencePolicy::Ignored,
        checks: &[],
    },
];

impl ChaosObject for AwsChaos {
    type Spec = AwsChaosSpec;

    fn spec(&self) -> &AwsChaosSpec {
        &self.spec
    }

    fn action(&self) -> &str {
        &self.spec.action
    }

    fn scheduler(&self) -> Option<&SchedulerSpec> {
        self.spec.scheduler.as_ref()
    }

    fn action_rules() -> &'static [ActionRule<AwsChaosSpec>] {
        AWS_ACTION_RULES
    }
}

fn validate_ebs_volume(spec: &AwsChaosSpec, spec_path: &Path) -> ErrorList {
    match spec.ebs_volume.as_deref() {
        Some(volume) if !volume.is_empty() => ErrorList::new(),
        _ => FieldError::required(
            spec_path.child("volumeID"),
            format!("the ID of the EBS volume is required on {} action", spec.action),
        )
        .into(),
    }
}

fn validate_device_name(spec: &AwsChaosSpec, spec_path: &Path) -> ErrorList {
    match spec.device_name.as_deref() {
        Some(device) if !device.is_empty() => ErrorList::new(),
        _ => FieldError::required(
            spec_path.child("deviceName"),
            format!("the device name is required on {} action", spec.action),
        )
        .into(),
    }
}
