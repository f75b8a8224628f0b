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

//! ChaosResourceValidation admission controller.
//!
//! Runs the chaos resource validator on CREATE and UPDATE requests for the
//! chaos kinds it is configured for. DELETE requests are always admitted.
//! Objects of any other kind pass through untouched.

use crate::admission::{
    AdmissionError, AdmissionResult, Attributes, Handler, Interface, MutationInterface, Operation,
    Plugins, ValidationInterface,
};
use crate::api::chaos::{ApiObject, AwsChaos, GcpChaos, AWS_CHAOS_KIND, GCP_CHAOS_KIND};
use crate::chaos::{ChaosObject, ResourceValidator};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::sync::Arc;

/// Plugin name for the ChaosResourceValidation admission controller.
pub const PLUGIN_NAME: &str = "ChaosResourceValidation";

/// Kinds this plugin knows how to validate.
pub const SUPPORTED_KINDS: &[&str] = &[GCP_CHAOS_KIND, AWS_CHAOS_KIND];

/// Register the ChaosResourceValidation plugin with the plugin registry.
pub fn register(plugins: &Plugins) {
    plugins.register(PLUGIN_NAME, |config: Option<&mut dyn Read>| {
        Ok(Arc::new(Plugin::from_config(config)?) as Arc<dyn Interface>)
    });
}

/// Configuration of the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Configuration {
    /// Kinds to validate. Defaults to every supported kind.
    #[serde(default = "default_kinds")]
    pub kinds: Vec<String>,
}

fn default_kinds() -> Vec<String> {
    SUPPORTED_KINDS.iter().map(|k| k.to_string()).collect()
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            kinds: default_kinds(),
        }
    }
}

impl Configuration {
    /// Read a JSON configuration and check that every kind is supported.
    pub fn from_reader(reader: &mut dyn Read) -> AdmissionResult<Self> {
        let config: Configuration = serde_json::from_reader(reader).map_err(|e| {
            AdmissionError::bad_request(format!("failed to parse {} configuration: {}", PLUGIN_NAME, e))
        })?;
        for kind in &config.kinds {
            if !SUPPORTED_KINDS.contains(&kind.as_str()) {
                return Err(AdmissionError::bad_request(format!(
                    "{} configuration: unsupported kind {:?}, supported kinds: {}",
                    PLUGIN_NAME,
                    kind,
                    SUPPORTED_KINDS.join(", ")
                )));
            }
        }
        Ok(config)
    }
}

/// Plugin validates chaos resources on admission.
pub struct Plugin {
    handler: Handler,
    validator: ResourceValidator,
    kinds: BTreeSet<String>,
}

impl Plugin {
    /// Create a plugin validating every supported kind, reporting through `tracing`.
    pub fn new() -> Self {
        Self::with_validator(ResourceValidator::default(), Configuration::default())
    }

    pub fn with_validator(validator: ResourceValidator, config: Configuration) -> Self {
        Self {
            handler: Handler::new_create_update_delete(),
            validator,
            kinds: config.kinds.into_iter().collect(),
        }
    }

    /// Create a plugin from an optional JSON configuration stream.
    pub fn from_config(config: Option<&mut dyn Read>) -> AdmissionResult<Self> {
        let config = match config {
            Some(reader) => Configuration::from_reader(reader)?,
            None => Configuration::default(),
        };
        Ok(Self::with_validator(ResourceValidator::default(), config))
    }

    fn enabled(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }

    fn default_object<T: ChaosObject + 'static>(&self, obj: &mut dyn ApiObject) {
        if let Some(chaos) = obj.as_any_mut().downcast_mut::<T>() {
            self.validator.default_object(chaos);
        }
    }

    fn validate_object<T: ChaosObject + 'static>(&self, attributes: &dyn Attributes) -> AdmissionResult<()> {
        let result = match attributes.get_operation() {
            Operation::Create => self.validator.validate_create(typed_object::<T>(attributes)?),
            Operation::Update => {
                let old_object = attributes.get_old_object().and_then(downcast::<T>);
                self.validator
                    .validate_update(typed_object::<T>(attributes)?, old_object)
            }
            Operation::Delete => match attributes
                .get_object()
                .or(attributes.get_old_object())
                .and_then(downcast::<T>)
            {
                Some(obj) => self.validator.validate_delete(obj),
                None => Ok(()),
            },
            Operation::Connect => Ok(()),
        };
        result.map_err(AdmissionError::from)
    }
}

fn downcast<T: 'static>(obj: &dyn ApiObject) -> Option<&T> {
    obj.as_any().downcast_ref::<T>()
}

/// The request object as `T`. A missing object and an object of another kind
/// are both bad requests.
fn typed_object<T: 'static>(attributes: &dyn Attributes) -> AdmissionResult<&T> {
    let kind = &attributes.get_kind().kind;
    let Some(obj) = attributes.get_object() else {
        return Err(AdmissionError::bad_request(format!(
            "{} request for {} {:?} carries no object",
            attributes.get_operation(),
            kind,
            attributes.get_name()
        )));
    };
    downcast::<T>(obj).ok_or_else(|| {
        AdmissionError::bad_request(format!(
            "{} request for {} {:?} carries an object of kind {}",
            attributes.get_operation(),
            kind,
            attributes.get_name(),
            obj.kind()
        ))
    })
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Interface for Plugin {
    fn handles(&self, operation: Operation) -> bool {
        self.handler.handles(operation)
    }
}

impl MutationInterface for Plugin {
    /// Chaos resources have no defaults; the hook only reports the object.
    fn admit(&self, attributes: &mut dyn Attributes) -> AdmissionResult<()> {
        if !matches!(attributes.get_operation(), Operation::Create | Operation::Update) {
            return Ok(());
        }
        let kind = attributes.get_kind().kind.clone();
        if !self.enabled(&kind) {
            return Ok(());
        }
        let Some(obj) = attributes.get_object_mut() else {
            return Ok(());
        };
        match kind.as_str() {
            GCP_CHAOS_KIND => self.default_object::<GcpChaos>(obj),
            AWS_CHAOS_KIND => self.default_object::<AwsChaos>(obj),
            _ => {}
        }
        Ok(())
    }
}

impl ValidationInterface for Plugin {
    fn validate(&self, attributes: &dyn Attributes) -> AdmissionResult<()> {
        let kind = attributes.get_kind().kind.as_str();
        if !self.enabled(kind) {
            return Ok(());
        }
        match kind {
            GCP_CHAOS_KIND => self.validate_object::<GcpChaos>(attributes),
            AWS_CHAOS_KIND => self.validate_object::<AwsChaos>(attributes),
            _ => Ok(()),
        }
    }
}
