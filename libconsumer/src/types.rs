//! Core types: the owning StorageCluster and provider-issued resources.
//!
//! Field names follow the Kubernetes manifest layout (camelCase) so a
//! StorageCluster can be read from and written back to YAML or JSON as-is.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::event::ObjectRef;
use crate::quantity::Quantity;

/// Provider kind naming an OCS provider cluster.
pub const KIND_OCS: &str = "ocs";

// ---------------------------------------------------------------------------
// StorageCluster
// ---------------------------------------------------------------------------

/// The owning resource whose spec drives the consumer lifecycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCluster {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: StorageClusterSpec,
    #[serde(default)]
    pub status: StorageClusterStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Unique identity of the object; keys the resource cache.
    #[serde(default)]
    pub uid: String,
    /// Set once the object is being deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClusterSpec {
    #[serde(default)]
    pub external_storage: ExternalStorageClusterSpec,
}

/// Desired external storage state, supplied by the cluster operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalStorageClusterSpec {
    #[serde(default)]
    pub enable: bool,
    /// `"ocs"` for a provider cluster speaking the consumer protocol.
    #[serde(default)]
    pub storage_provider_kind: String,
    /// base64 of `{"onboardingTicket": ..., "serverAddress": ...}`.
    #[serde(default)]
    pub connection_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_capacity: Option<Quantity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClusterStatus {
    #[serde(default)]
    pub external_storage: ExternalStorageClusterStatus,
}

/// Provider-confirmed external storage state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalStorageClusterStatus {
    /// Identity assigned by the provider at onboarding; empty when the
    /// cluster is not registered.
    #[serde(default, rename = "consumerID")]
    pub consumer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granted_capacity: Option<Quantity>,
}

impl StorageCluster {
    /// Whether this cluster consumes storage from an OCS provider.
    pub fn is_external_ocs_provider(&self) -> bool {
        let ext = &self.spec.external_storage;
        ext.enable && ext.storage_provider_kind == KIND_OCS
    }

    pub fn is_deleting(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    /// The provider-assigned consumer id, if onboarded.
    pub fn consumer_id(&self) -> Option<&str> {
        let id = self.status.external_storage.consumer_id.as_str();
        (!id.is_empty()).then_some(id)
    }

    /// Whether the requested capacity differs from the granted one.
    ///
    /// No capacity request means nothing to reconcile.
    pub fn capacity_needs_update(&self) -> bool {
        match &self.spec.external_storage.requested_capacity {
            Some(requested) => {
                self.status.external_storage.granted_capacity.as_ref() != Some(requested)
            }
            None => false,
        }
    }

    /// Requested capacity as sent on the wire.
    pub fn requested_capacity_string(&self) -> String {
        self.spec
            .external_storage
            .requested_capacity
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            name: self.metadata.name.clone(),
            namespace: self.metadata.namespace.clone(),
            uid: self.metadata.uid.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Connection details & external resources
// ---------------------------------------------------------------------------

/// Decoded form of the connection string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    pub onboarding_ticket: String,
    pub server_address: String,
}

/// One piece of provider-issued configuration to materialize locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalResource {
    /// Resource kind, e.g. `"Secret"` or `"ConfigMap"`.
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
metadata:
  name: ocs-storagecluster
  namespace: openshift-storage
  uid: d2f1c6a4-uid
spec:
  externalStorage:
    enable: true
    storageProviderKind: ocs
    connectionString: e30=
    requestedCapacity: 10Gi
status:
  externalStorage:
    consumerID: c-1
    grantedCapacity: 10240Mi
"#;

    #[test]
    fn manifest_deserializes() {
        let cluster: StorageCluster = serde_yaml::from_str(MANIFEST).expect("parse manifest");
        assert_eq!(cluster.metadata.uid, "d2f1c6a4-uid");
        assert!(cluster.is_external_ocs_provider());
        assert!(!cluster.is_deleting());
        assert_eq!(cluster.consumer_id(), Some("c-1"));
        assert!(!cluster.capacity_needs_update());
        assert_eq!(cluster.requested_capacity_string(), "10Gi");
    }

    #[test]
    fn status_field_names_round_trip() {
        let cluster: StorageCluster = serde_yaml::from_str(MANIFEST).unwrap();
        let json = serde_json::to_value(&cluster).unwrap();
        assert_eq!(json["status"]["externalStorage"]["consumerID"], "c-1");
        assert_eq!(
            json["status"]["externalStorage"]["grantedCapacity"],
            "10240Mi"
        );
    }

    #[test]
    fn provider_kind_must_match() {
        let mut cluster = StorageCluster::default();
        cluster.spec.external_storage.enable = true;
        cluster.spec.external_storage.storage_provider_kind = "rhcs".into();
        assert!(!cluster.is_external_ocs_provider());

        cluster.spec.external_storage.storage_provider_kind = KIND_OCS.into();
        assert!(cluster.is_external_ocs_provider());

        cluster.spec.external_storage.enable = false;
        assert!(!cluster.is_external_ocs_provider());
    }

    #[test]
    fn empty_consumer_id_means_unregistered() {
        let cluster = StorageCluster::default();
        assert_eq!(cluster.consumer_id(), None);
        assert!(!cluster.capacity_needs_update());
        assert_eq!(cluster.requested_capacity_string(), "");
    }

    #[test]
    fn connection_details_require_both_fields() {
        let ok: ConnectionDetails =
            serde_json::from_str(r#"{"onboardingTicket":"t","serverAddress":"a:1"}"#).unwrap();
        assert_eq!(ok.server_address, "a:1");
        assert!(serde_json::from_str::<ConnectionDetails>(r#"{"onboardingTicket":"t"}"#).is_err());
    }
}
