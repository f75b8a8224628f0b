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

//! Chaos experiment resource types (GcpChaos, AwsChaos, ...).
//!
//! These are the deserialized forms of incoming admission objects. They are
//! plain data; all checks live in [`crate::chaos`].

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// API group of the chaos resources.
pub const GROUP: &str = "chaos-mesh.org";

/// API version of the chaos resources.
pub const VERSION: &str = "v1alpha1";

/// Kind name of the GCP chaos resource.
pub const GCP_CHAOS_KIND: &str = "GcpChaos";

/// Kind name of the AWS chaos resource.
pub const AWS_CHAOS_KIND: &str = "AwsChaos";

/// ApiObject is a trait for API objects that can be carried through admission.
pub trait ApiObject: Send + Sync {
    /// Returns the object as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the object as mutable Any for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the kind of this object.
    fn kind(&self) -> &str;

    /// Returns the identity of this object.
    fn object_meta(&self) -> &ObjectMeta;
}

/// ObjectMeta carries the identity of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            labels: BTreeMap::new(),
        }
    }
}

/// SchedulerSpec is the optional recurrence of an experiment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerSpec {
    /// Standard cron expression, e.g. `*/5 * * * *` or `@every 10m`.
    #[serde(default)]
    pub cron: String,
    /// How long each run lasts, e.g. `30s` or `1h30m`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl SchedulerSpec {
    pub fn new(cron: &str) -> Self {
        Self {
            cron: cron.to_string(),
            duration: None,
        }
    }

    pub fn with_duration(cron: &str, duration: &str) -> Self {
        Self {
            cron: cron.to_string(),
            duration: Some(duration.to_string()),
        }
    }
}

/// SelectorSpec selects the targets of an experiment. Resource kinds that act
/// on cloud APIs directly carry no selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorSpec {
    #[serde(default)]
    pub namespaces: Vec<String>,
    #[serde(default)]
    pub label_selectors: BTreeMap<String, String>,
}

// ============================================================================
// GcpChaos
// ============================================================================

/// GcpAction is the set of disruptions a GcpChaos can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GcpAction {
    /// Stop a GCE instance.
    NodeStop,
    /// Reset a GCE instance.
    NodeReset,
    /// Detach disks from a GCE instance.
    DiskLoss,
}

impl GcpAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            GcpAction::NodeStop => "node-stop",
            GcpAction::NodeReset => "node-reset",
            GcpAction::DiskLoss => "disk-loss",
        }
    }
}

impl fmt::Display for GcpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GcpChaosSpec is the content of a GcpChaos resource.
///
/// `action` is kept as the raw string from the request so that a value
/// outside [`GcpAction`] reaches validation instead of failing decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpChaosSpec {
    #[serde(default)]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub instance: String,
    /// Disks to detach. Only meaningful for `disk-loss`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_names: Option<Vec<String>>,
}

impl GcpChaosSpec {
    pub fn new(action: GcpAction) -> Self {
        Self {
            action: action.as_str().to_string(),
            ..Default::default()
        }
    }
}

/// GcpChaos disrupts Google Compute Engine instances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcpChaos {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: GcpChaosSpec,
}

impl GcpChaos {
    pub fn new(name: &str, namespace: &str, spec: GcpChaosSpec) -> Self {
        Self {
            metadata: ObjectMeta::new(name, namespace),
            spec,
        }
    }
}

impl ApiObject for GcpChaos {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn kind(&self) -> &str {
        GCP_CHAOS_KIND
    }

    fn object_meta(&self) -> &ObjectMeta {
        &self.metadata
    }
}

// ============================================================================
// AwsChaos
// ============================================================================

/// AwsAction is the set of disruptions an AwsChaos can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AwsAction {
    /// Stop an EC2 instance.
    Ec2Stop,
    /// Restart an EC2 instance.
    Ec2Restart,
    /// Detach an EBS volume from an EC2 instance.
    DetachVolume,
}

impl AwsAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AwsAction::Ec2Stop => "ec2-stop",
            AwsAction::Ec2Restart => "ec2-restart",
            AwsAction::DetachVolume => "detach-volume",
        }
    }
}

impl fmt::Display for AwsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AwsChaosSpec is the content of an AwsChaos resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsChaosSpec {
    #[serde(default)]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
    #[serde(default)]
    pub aws_region: String,
    #[serde(default)]
    pub ec2_instance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// EBS volume to detach. Only meaningful for `detach-volume`.
    #[serde(rename = "volumeID", default, skip_serializing_if = "Option::is_none")]
    pub ebs_volume: Option<String>,
    /// Device name of the volume. Only meaningful for `detach-volume`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
}

impl AwsChaosSpec {
    pub fn new(action: AwsAction) -> Self {
        Self {
            action: action.as_str().to_string(),
            ..Default::default()
        }
    }
}

/// AwsChaos disrupts EC2 instances and their volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsChaos {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: AwsChaosSpec,
}

impl AwsChaos {
    pub fn new(name: &str, namespace: &str, spec: AwsChaosSpec) -> Self {
        Self {
            metadata: ObjectMeta::new(name, namespace),
            spec,
        }
    }
}

impl ApiObject for AwsChaos {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn kind(&self) -> &str {
        AWS_CHAOS_KIND
    }

    fn object_meta(&self) -> &ObjectMeta {
        &self.metadata
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// DecodeError is returned when a raw admission object cannot be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported kind {0:?}")]
    UnsupportedKind(String),

    #[error("malformed {kind} object: {source}")]
    Json {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode the JSON body of an admission object of the given kind.
pub fn decode_object(kind: &str, raw: &[u8]) -> Result<Box<dyn ApiObject>, DecodeError> {
    let json_err = |source: serde_json::Error| DecodeError::Json {
        kind: kind.to_string(),
        source,
    };
    match kind {
        GCP_CHAOS_KIND => {
            let obj: GcpChaos = serde_json::from_slice(raw).map_err(json_err)?;
            Ok(Box::new(obj))
        }
        AWS_CHAOS_KIND => {
            let obj: AwsChaos = serde_json::from_slice(raw).map_err(json_err)?;
            Ok(Box::new(obj))
        }
        other => Err(DecodeError::UnsupportedKind(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_gcp_chaos() {
        let raw = br#"{
            "metadata": {"name": "disk", "namespace": "chaos"},
            "spec": {
                "action": "disk-loss",
                "project": "p",
                "zone": "us-central1-a",
                "instance": "vm-1",
                "deviceNames": ["disk-a", "disk-b"],
                "scheduler": {"cron": "@every 5m", "duration": "30s"}
            }
        }"#;
        let obj = decode_object(GCP_CHAOS_KIND, raw).unwrap();
        assert_eq!(obj.kind(), GCP_CHAOS_KIND);

        let chaos = obj.as_any().downcast_ref::<GcpChaos>().unwrap();
        assert_eq!(chaos.metadata.name, "disk");
        assert_eq!(chaos.metadata.namespace, "chaos");
        assert_eq!(chaos.spec.action, GcpAction::DiskLoss.as_str());
        assert_eq!(
            chaos.spec.device_names,
            Some(vec!["disk-a".to_string(), "disk-b".to_string()])
        );
        assert_eq!(
            chaos.spec.scheduler,
            Some(SchedulerSpec::with_duration("@every 5m", "30s"))
        );
    }

    #[test]
    fn test_decode_keeps_unknown_action() {
        let raw = br#"{"metadata": {"name": "x"}, "spec": {"action": "node-explode"}}"#;
        let obj = decode_object(GCP_CHAOS_KIND, raw).unwrap();
        let chaos = obj.as_any().downcast_ref::<GcpChaos>().unwrap();
        assert_eq!(chaos.spec.action, "node-explode");
        assert!(chaos.spec.scheduler.is_none());
        assert!(chaos.spec.device_names.is_none());
    }

    #[test]
    fn test_decode_aws_volume_fields() {
        let raw = br#"{
            "metadata": {"name": "vol", "namespace": "default"},
            "spec": {"action": "detach-volume", "volumeID": "vol-123", "deviceName": "/dev/sdf"}
        }"#;
        let obj = decode_object(AWS_CHAOS_KIND, raw).unwrap();
        let chaos = obj.as_any().downcast_ref::<AwsChaos>().unwrap();
        assert_eq!(chaos.spec.ebs_volume.as_deref(), Some("vol-123"));
        assert_eq!(chaos.spec.device_name.as_deref(), Some("/dev/sdf"));
    }

    #[test]
    fn test_decode_unsupported_kind() {
        let err = decode_object("PodChaos", b"{}").err().unwrap();
        assert!(matches!(err, DecodeError::UnsupportedKind(ref k) if k == "PodChaos"));
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = decode_object(GCP_CHAOS_KIND, b"{not json").err().unwrap();
        assert!(err.to_string().starts_with("malformed GcpChaos object"));
    }

    #[test]
    fn test_action_names() {
        assert_eq!(GcpAction::NodeStop.to_string(), "node-stop");
        assert_eq!(GcpAction::NodeReset.to_string(), "node-reset");
        assert_eq!(AwsAction::DetachVolume.to_string(), "detach-volume");
        assert_eq!(GcpChaosSpec::new(GcpAction::DiskLoss).action, "disk-loss");
    }
}
