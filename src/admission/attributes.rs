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

//! Admission attributes that describe an admission request.

use super::interfaces::Operation;
use crate::api::chaos::{decode_object, ApiObject, DecodeError, GROUP, VERSION};
use crate::chaos::ChaosObject;

/// GroupVersionResource identifies a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionResource {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl GroupVersionResource {
    pub fn new(group: &str, version: &str, resource: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            resource: resource.to_string(),
        }
    }
}

/// GroupVersionKind identifies a kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Resource name of a chaos kind: the lower-cased kind, e.g. `gcpchaos`.
    pub fn resource(&self) -> GroupVersionResource {
        GroupVersionResource::new(&self.group, &self.version, &self.kind.to_lowercase())
    }
}

/// Attributes is the read side of an admission request.
pub trait Attributes {
    /// Returns the name of the object as presented in the request.
    fn get_name(&self) -> &str;

    /// Returns the namespace associated with the request (if any).
    fn get_namespace(&self) -> &str;

    /// Returns the resource being requested.
    fn get_resource(&self) -> &GroupVersionResource;

    /// Returns the operation being performed.
    fn get_operation(&self) -> Operation;

    /// Returns the object from the incoming request.
    fn get_object(&self) -> Option<&dyn ApiObject>;

    /// Returns the object as a mutable reference.
    fn get_object_mut(&mut self) -> Option<&mut (dyn ApiObject + 'static)>;

    /// Returns the existing object (only populated for UPDATE and DELETE requests).
    fn get_old_object(&self) -> Option<&dyn ApiObject>;

    /// Returns the kind of object being manipulated.
    fn get_kind(&self) -> &GroupVersionKind;

    /// Check if this request is a dry run.
    fn is_dry_run(&self) -> bool;
}

/// AttributesRecord is a concrete implementation of Attributes.
pub struct AttributesRecord {
    pub name: String,
    pub namespace: String,
    pub resource: GroupVersionResource,
    pub operation: Operation,
    pub object: Option<Box<dyn ApiObject>>,
    pub old_object: Option<Box<dyn ApiObject>>,
    pub kind: GroupVersionKind,
    pub dry_run: bool,
}

impl AttributesRecord {
    /// Create an AttributesRecord for a chaos resource.
    pub fn new_chaos<T: ChaosObject + 'static>(operation: Operation, object: T, old_object: Option<T>) -> Self {
        let kind = GroupVersionKind::new(GROUP, VERSION, object.kind());
        let meta = object.object_meta();
        Self {
            name: meta.name.clone(),
            namespace: meta.namespace.clone(),
            resource: kind.resource(),
            operation,
            object: Some(Box::new(object)),
            old_object: old_object.map(|o| Box::new(o) as Box<dyn ApiObject>),
            kind,
            dry_run: false,
        }
    }

    /// Create an AttributesRecord from the raw JSON objects of a request.
    ///
    /// DELETE requests usually carry only the old object; name and namespace
    /// are taken from whichever object is present.
    pub fn from_raw(
        operation: Operation,
        kind: &str,
        object: Option<&[u8]>,
        old_object: Option<&[u8]>,
    ) -> Result<Self, DecodeError> {
        let object = object.map(|raw| decode_object(kind, raw)).transpose()?;
        let old_object = old_object.map(|raw| decode_object(kind, raw)).transpose()?;
        let gvk = GroupVersionKind::new(GROUP, VERSION, kind);

        let mut record = Self {
            name: String::new(),
            namespace: String::new(),
            resource: gvk.resource(),
            operation,
            object,
            old_object,
            kind: gvk,
            dry_run: false,
        };
        if let Some((name, namespace)) = record.identity() {
            record.name = name;
            record.namespace = namespace;
        }
        Ok(record)
    }

    fn identity(&self) -> Option<(String, String)> {
        let obj = self.object.as_deref().or(self.old_object.as_deref())?;
        let meta = obj.object_meta();
        Some((meta.name.clone(), meta.namespace.clone()))
    }

    /// Mark the request as a dry run.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl Attributes for AttributesRecord {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_namespace(&self) -> &str {
        &self.namespace
    }

    fn get_resource(&self) -> &GroupVersionResource {
        &self.resource
    }

    fn get_operation(&self) -> Operation {
        self.operation
    }

    fn get_object(&self) -> Option<&dyn ApiObject> {
        self.object.as_deref()
    }

    fn get_object_mut(&mut self) -> Option<&mut (dyn ApiObject + 'static)> {
        self.object.as_deref_mut()
    }

    fn get_old_object(&self) -> Option<&dyn ApiObject> {
        self.old_object.as_deref()
    }

    fn get_kind(&self) -> &GroupVersionKind {
        &self.kind
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::chaos::{GcpAction, GcpChaos, GcpChaosSpec, AWS_CHAOS_KIND, GCP_CHAOS_KIND};

    #[test]
    fn test_attributes_record_new_chaos() {
        let chaos = GcpChaos::new("stop-vm", "chaos", GcpChaosSpec::new(GcpAction::NodeStop));
        let attrs = AttributesRecord::new_chaos(Operation::Create, chaos, None);

        assert_eq!(attrs.get_name(), "stop-vm");
        assert_eq!(attrs.get_namespace(), "chaos");
        assert_eq!(attrs.get_operation(), Operation::Create);
        assert_eq!(attrs.get_resource().resource, "gcpchaos");
        assert_eq!(attrs.get_resource().group, GROUP);
        assert_eq!(attrs.get_kind().kind, GCP_CHAOS_KIND);
        assert!(attrs.get_old_object().is_none());
        assert!(!attrs.is_dry_run());

        let obj = attrs.get_object().unwrap();
        assert!(obj.as_any().downcast_ref::<GcpChaos>().is_some());
    }

    #[test]
    fn test_from_raw_delete_uses_old_object() {
        let old = br#"{"metadata": {"name": "vol", "namespace": "ops"}, "spec": {"action": "detach-volume"}}"#;
        let attrs =
            AttributesRecord::from_raw(Operation::Delete, AWS_CHAOS_KIND, None, Some(&old[..])).unwrap();
        assert_eq!(attrs.get_name(), "vol");
        assert_eq!(attrs.get_namespace(), "ops");
        assert!(attrs.get_object().is_none());
        assert!(attrs.get_old_object().is_some());
        assert_eq!(attrs.get_resource().resource, "awschaos");
    }

    #[test]
    fn test_from_raw_rejects_malformed_object() {
        let result = AttributesRecord::from_raw(Operation::Create, GCP_CHAOS_KIND, Some(&b"42"[..]), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_dry_run() {
        let chaos = GcpChaos::new("a", "b", GcpChaosSpec::new(GcpAction::NodeReset));
        let attrs = AttributesRecord::new_chaos(Operation::Update, chaos, None).with_dry_run(true);
        assert!(attrs.is_dry_run());
    }
}
