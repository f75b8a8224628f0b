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

//! Action rule tables.
//!
//! Each resource kind owns a static table mapping action names to the
//! constraints that apply to them. Supporting a new action means adding an
//! entry to the kind's table.

use super::scheduler::RecurrencePolicy;
use crate::field::{ErrorList, Path};
use std::fmt;

/// ActionCheck validates the action-specific fields of a spec. It receives
/// the path of the spec and reports errors under it.
pub type ActionCheck<S> = fn(&S, &Path) -> ErrorList;

/// ActionRule holds the constraints of one action.
pub struct ActionRule<S: 'static> {
    pub action: &'static str,
    pub recurrence: RecurrencePolicy,
    pub checks: &'static [ActionCheck<S>],
}

impl<S: 'static> fmt::Debug for ActionRule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRule")
            .field("action", &self.action)
            .field("recurrence", &self.recurrence)
            .field("checks", &self.checks.len())
            .finish()
    }
}

impl<S: 'static> ActionRule<S> {
    /// Run every action-specific check against `spec`, in table order.
    pub fn check_fields(&self, spec: &S, spec_path: &Path) -> ErrorList {
        let mut all_errs = ErrorList::new();
        for check in self.checks {
            all_errs.append(check(spec, spec_path));
        }
        all_errs
    }
}

/// Find the rule for `action`, or `None` if the action is not recognized.
pub fn lookup<S: 'static>(rules: &'static [ActionRule<S>], action: &str) -> Option<&'static ActionRule<S>> {
    rules.iter().find(|rule| rule.action == action)
}

/// Names of every action in `rules`, in table order.
pub fn action_names<S: 'static>(rules: &'static [ActionRule<S>]) -> Vec<&'static str> {
    rules.iter().map(|rule| rule.action).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldError;

    struct Spec {
        size: u32,
    }

    fn non_zero(spec: &Spec, path: &Path) -> ErrorList {
        if spec.size == 0 {
            return FieldError::invalid(path.child("size"), spec.size, "must not be zero").into();
        }
        ErrorList::new()
    }

    fn small(spec: &Spec, path: &Path) -> ErrorList {
        if spec.size > 10 {
            return FieldError::invalid(path.child("size"), spec.size, "too large").into();
        }
        ErrorList::new()
    }

    static RULES: &[ActionRule<Spec>] = &[
        ActionRule {
            action: "grow",
            recurrence: RecurrencePolicy::Required,
            checks: &[non_zero, small],
        },
        ActionRule {
            action: "noop",
            recurrence: RecurrencePolicy::Ignored,
            checks: &[],
        },
    ];

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(RULES, "grow").unwrap().recurrence, RecurrencePolicy::Required);
        assert_eq!(lookup(RULES, "noop").unwrap().recurrence, RecurrencePolicy::Ignored);
        assert!(lookup(RULES, "shrink").is_none());
        assert!(lookup(RULES, "").is_none());
    }

    #[test]
    fn test_action_names() {
        assert_eq!(action_names(RULES), vec!["grow", "noop"]);
    }

    #[test]
    fn test_check_fields_runs_all_checks() {
        let rule = lookup(RULES, "grow").unwrap();
        let path = Path::new("spec");
        assert!(rule.check_fields(&Spec { size: 5 }, &path).is_empty());
        assert_eq!(rule.check_fields(&Spec { size: 0 }, &path).len(), 1);
        assert_eq!(rule.check_fields(&Spec { size: 11 }, &path).len(), 1);
    }

    #[test]
    fn test_rule_without_checks() {
        let rule = lookup(RULES, "noop").unwrap();
        assert!(rule.check_fields(&Spec { size: 0 }, &Path::new("spec")).is_empty());
    }
}
