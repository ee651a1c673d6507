//! # Component Descriptor Model
//!
//! Data model for component descriptors: a structured metadata document
//! describing a software component, the components it depends on
//! ([`ComponentReference`]) and the artifacts it ships ([`Resource`]).
//! Descriptors persist as YAML; the canonical form used for hashing is
//! produced by the [`crate::normalisation`] module.
//!
//! Wire field names follow the descriptor schema (`schemaVersion`,
//! `componentReferences`, `extraIdentity`, `hashAlgorithm`, ...), so a
//! serialize → deserialize round trip re-normalizes byte-identically.
//!
//! ## Examples
//!
//! ```
//! use cdsig::descriptor::ComponentDescriptor;
//!
//! let yaml = r#"
//! meta:
//!   schemaVersion: v2
//! component:
//!   name: example.org/my-component
//!   version: v0.1.0
//!   componentReferences: []
//!   resources: []
//! "#;
//!
//! let cd = ComponentDescriptor::from_yaml(yaml).unwrap();
//! assert_eq!(cd.component.name, "example.org/my-component");
//! assert!(cd.signatures.is_empty());
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extra identity labels disambiguating otherwise-identical named entries.
///
/// A `BTreeMap` keeps keys unique and ordered, so two logically-equal
/// identities always compare and serialize identically.
pub type Identity = BTreeMap<String, String>;

/// Top-level component descriptor document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub meta: Metadata,
    pub component: ComponentSpec,
    /// Signatures attached to this descriptor. Excluded from the
    /// normalized payload, so adding a signature never invalidates
    /// previously attached ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<Signature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "schemaVersion")]
    pub schema_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    pub version: String,
    #[serde(rename = "componentReferences", default)]
    pub component_references: Vec<ComponentReference>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// A dependency edge to another component, by name/version/identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentReference {
    pub name: String,
    #[serde(rename = "componentName")]
    pub component_name: String,
    pub version: String,
    #[serde(rename = "extraIdentity", default, skip_serializing_if = "Identity::is_empty")]
    pub extra_identity: Identity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<DigestSpec>,
}

/// A named, versioned artifact referenced via an access method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub version: String,
    #[serde(rename = "extraIdentity", default, skip_serializing_if = "Identity::is_empty")]
    pub extra_identity: Identity,
    pub access: Access,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<DigestSpec>,
}

/// Access method describing where a resource's content lives.
///
/// Tagged on `type`. Unknown kinds deserialize into [`Access::Other`] so
/// they survive a round trip, but normalization refuses them (the
/// canonical form of an unknown kind is undefined).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Access {
    #[serde(rename = "github")]
    Github {
        #[serde(rename = "repoUrl")]
        repo_url: String,
        #[serde(rename = "ref")]
        git_ref: String,
        commit: String,
    },
    #[serde(rename = "ociArtifact")]
    OciArtifact {
        #[serde(rename = "imageReference")]
        image_reference: String,
    },
    #[serde(untagged)]
    Other(serde_json::Value),
}

impl Access {
    /// The access kind discriminator as it appears on the wire.
    pub fn kind(&self) -> &str {
        match self {
            Access::Github { .. } => "github",
            Access::OciArtifact { .. } => "ociArtifact",
            Access::Other(value) => value
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or("<untyped>"),
        }
    }
}

/// Algorithm-tagged, versioned content digest attached to an entity.
///
/// This is part of the wire contract:
/// `{hashAlgorithm, normalisationAlgorithm, value}` with a hex-encoded
/// value. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestSpec {
    #[serde(rename = "hashAlgorithm")]
    pub hash_algorithm: String,
    #[serde(rename = "normalisationAlgorithm")]
    pub normalisation_algorithm: String,
    pub value: String,
}

/// Named cryptographic attestation over a descriptor's digest.
///
/// The digest records which hash and normalization algorithm the signature
/// was computed over, so verification can replay exactly those even if the
/// descriptor's defaults change later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub digest: DigestSpec,
    pub algorithm: String,
    pub value: String,
}

impl ComponentDescriptor {
    /// Look up a signature by name.
    pub fn signature(&self, name: &str) -> Option<&Signature> {
        self.signatures.iter().find(|s| s.name == name)
    }

    /// Parse a descriptor from its persisted YAML form.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    /// Serialize the descriptor to its persisted YAML form.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Error::from)
    }
}

impl ComponentReference {
    pub fn element_identity(&self) -> ElementIdentity<'_> {
        ElementIdentity {
            element: "component reference",
            name: &self.name,
            version: &self.version,
            extra_identity: &self.extra_identity,
        }
    }
}

impl Resource {
    pub fn element_identity(&self) -> ElementIdentity<'_> {
        ElementIdentity {
            element: "resource",
            name: &self.name,
            version: &self.version,
            extra_identity: &self.extra_identity,
        }
    }
}

/// Borrowed (name, version, extraIdentity) triple identifying an element
/// within its list. Used for deterministic ordering and error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementIdentity<'a> {
    pub element: &'static str,
    pub name: &'a str,
    pub version: &'a str,
    pub extra_identity: &'a Identity,
}

impl ElementIdentity<'_> {
    /// Stable sort key: name, then version, then the extra identity pairs
    /// in key order.
    pub fn sort_key(&self) -> (String, String, String) {
        (
            self.name.to_string(),
            self.version.to_string(),
            self.extra_identity_label(),
        )
    }

    pub fn extra_identity_label(&self) -> String {
        if self.extra_identity.is_empty() {
            return "-".to_string();
        }
        self.extra_identity
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub(crate) fn wrap_error(&self, source: Error) -> Error {
        Error::DigestionCallback {
            element: self.element,
            name: self.name.to_string(),
            version: self.version.to_string(),
            extra_identity: self.extra_identity_label(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_descriptor() -> ComponentDescriptor {
        ComponentDescriptor {
            meta: Metadata {
                schema_version: "v2".to_string(),
            },
            component: ComponentSpec {
                name: "example.org/sample".to_string(),
                version: "v0.1.0".to_string(),
                component_references: vec![ComponentReference {
                    name: "dep".to_string(),
                    component_name: "example.org/dep".to_string(),
                    version: "v1.2.3".to_string(),
                    extra_identity: Identity::from([(
                        "refKey".to_string(),
                        "refName".to_string(),
                    )]),
                    digest: None,
                }],
                resources: vec![Resource {
                    name: "image".to_string(),
                    version: "v0.1.0".to_string(),
                    extra_identity: Identity::new(),
                    access: Access::OciArtifact {
                        image_reference: "registry.example.org/image:v0.1.0".to_string(),
                    },
                    digest: None,
                }],
            },
            signatures: vec![],
        }
    }

    #[test]
    fn test_yaml_round_trip() -> Result<()> {
        let cd = sample_descriptor();
        let yaml = cd.to_yaml()?;
        let parsed = ComponentDescriptor::from_yaml(&yaml)?;
        assert_eq!(cd, parsed);
        Ok(())
    }

    #[test]
    fn test_wire_field_names() -> Result<()> {
        let cd = sample_descriptor();
        let json = serde_json::to_value(&cd)?;
        assert!(json["meta"]["schemaVersion"].is_string());
        assert!(json["component"]["componentReferences"][0]["componentName"].is_string());
        assert_eq!(
            json["component"]["resources"][0]["access"]["type"],
            "ociArtifact"
        );
        // Empty signature list stays off the wire.
        assert!(json.get("signatures").is_none());
        Ok(())
    }

    #[test]
    fn test_unknown_access_kind_round_trips() -> Result<()> {
        let yaml = r#"
name: blob
version: v1
access:
  type: localBlob
  path: /tmp/blob
"#;
        let resource: Resource = serde_yaml::from_str(yaml)?;
        assert_eq!(resource.access.kind(), "localBlob");
        let back = serde_yaml::to_string(&resource)?;
        let again: Resource = serde_yaml::from_str(&back)?;
        assert_eq!(resource, again);
        Ok(())
    }

    #[test]
    fn test_signature_lookup() {
        let mut cd = sample_descriptor();
        cd.signatures.push(Signature {
            name: "team-a".to_string(),
            digest: DigestSpec {
                hash_algorithm: "sha256".to_string(),
                normalisation_algorithm: "jsonNormalisation/v1".to_string(),
                value: "00".to_string(),
            },
            algorithm: "RSASSA-PKCS1-V1_5".to_string(),
            value: "sig".to_string(),
        });
        assert!(cd.signature("team-a").is_some());
        assert!(cd.signature("team-b").is_none());
    }

    #[test]
    fn test_extra_identity_label_ordering() {
        let extra = Identity::from([
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ]);
        let reference = ComponentReference {
            name: "r".to_string(),
            component_name: "c".to_string(),
            version: "v1".to_string(),
            extra_identity: extra,
            digest: None,
        };
        assert_eq!(
            reference.element_identity().extra_identity_label(),
            "a=1,b=2"
        );
    }
}
