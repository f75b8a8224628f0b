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

//! Resource validation and the admission hooks built on it.

use super::reporter::{Reporter, ResourceRef, TracingReporter};
use super::rules::{lookup, ActionRule};
use super::scheduler::validate_scheduler;
use crate::api::chaos::{ApiObject, SchedulerSpec, SelectorSpec};
use crate::field::{AggregateError, ErrorList, FieldError, Path};
use std::sync::Arc;
use thiserror::Error;

/// ChaosObject is a chaos resource that can be validated.
pub trait ChaosObject: ApiObject {
    type Spec: 'static;

    fn spec(&self) -> &Self::Spec;

    /// The raw action name from the spec.
    fn action(&self) -> &str;

    fn scheduler(&self) -> Option<&SchedulerSpec>;

    /// The action rule table of this kind.
    fn action_rules() -> &'static [ActionRule<Self::Spec>];

    /// Selectors used for authority checks. `None` for kinds that do not
    /// select targets.
    fn select_specs(&self) -> Option<Vec<SelectorSpec>> {
        None
    }
}

/// ValidationError is the rejection of a resource. Its message is the
/// aggregate of every field error found.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{errors}")]
pub struct ValidationError {
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub errors: AggregateError,
}

/// ResourceValidator validates chaos resources. It holds no per-call state
/// and can be shared across threads.
#[derive(Clone)]
pub struct ResourceValidator {
    reporter: Arc<dyn Reporter>,
}

impl Default for ResourceValidator {
    fn default() -> Self {
        Self::new(Arc::new(TracingReporter))
    }
}

fn resource_ref<T: ChaosObject>(obj: &T) -> ResourceRef<'_> {
    let meta = obj.object_meta();
    ResourceRef {
        kind: obj.kind(),
        namespace: &meta.namespace,
        name: &meta.name,
    }
}

impl ResourceValidator {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self { reporter }
    }

    /// Defaulting hook. Chaos resources have no defaults to fill in.
    pub fn default_object<T: ChaosObject>(&self, obj: &mut T) {
        self.reporter.info("default", resource_ref(obj));
    }

    pub fn validate_create<T: ChaosObject>(&self, obj: &T) -> Result<(), ValidationError> {
        self.reporter.info("validate create", resource_ref(obj));
        self.validate(obj)
    }

    /// The old object does not take part in validation.
    pub fn validate_update<T: ChaosObject>(&self, obj: &T, _old: Option<&T>) -> Result<(), ValidationError> {
        self.reporter.info("validate update", resource_ref(obj));
        self.validate(obj)
    }

    /// Deletion is always accepted.
    pub fn validate_delete<T: ChaosObject>(&self, obj: &T) -> Result<(), ValidationError> {
        self.reporter.info("validate delete", resource_ref(obj));
        Ok(())
    }

    pub fn get_select_spec<T: ChaosObject>(&self, obj: &T) -> Option<Vec<SelectorSpec>> {
        obj.select_specs()
    }

    /// Validate one resource, reporting every problem found.
    pub fn validate<T: ChaosObject>(&self, obj: &T) -> Result<(), ValidationError> {
        let all_errs = self.validate_spec(obj, &Path::new("spec"));
        match all_errs.to_aggregate() {
            None => Ok(()),
            Some(errors) => {
                let meta = obj.object_meta();
                Err(ValidationError {
                    kind: obj.kind().to_string(),
                    namespace: meta.namespace.clone(),
                    name: meta.name.clone(),
                    errors,
                })
            }
        }
    }

    /// Collect the field errors of `obj` without folding them.
    pub fn validate_spec<T: ChaosObject>(&self, obj: &T, spec: &Path) -> ErrorList {
        let mut all_errs = ErrorList::new();

        let Some(rule) = lookup(T::action_rules(), obj.action()) else {
            let meta = obj.object_meta();
            let msg = format!(
                "{}[{}/{}] have unknown action type",
                obj.kind().to_lowercase(),
                meta.namespace,
                meta.name
            );
            self.reporter
                .error("unknown action type", obj.action(), resource_ref(obj));
            all_errs.push(FieldError::invalid(spec.child("action"), obj.action(), msg));
            return all_errs;
        };

        all_errs.append(validate_scheduler(rule.recurrence, obj.scheduler(), spec));
        all_errs.append(rule.check_fields(obj.spec(), spec));
        all_errs
    }
}
