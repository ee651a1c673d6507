//! # Normalization
//!
//! Deterministic canonical serialization used as hashing input. Two
//! logically-equal documents (same fields, any declaration order, any key
//! ordering in identity maps) normalize to identical bytes; any semantic
//! difference changes the bytes.
//!
//! Normalization algorithms are named and versioned; the name is recorded
//! in the resulting `DigestSpec`, so digests produced by an old version
//! stay verifiable after new versions are introduced.
//!
//! - [`JSON_NORMALISATION_V1`] canonicalizes documents: object keys sorted
//!   lexicographically at every level, unordered element lists (component
//!   references, resources) sorted by (name, version, extraIdentity),
//!   compact JSON encoding with no incidental whitespace.
//! - [`OCI_ARTIFACT_DIGEST_V1`] addresses artifact content: the canonical
//!   bytes of a resource under this algorithm are its raw content bytes.
//!   It applies to content fetched by a resource digester, never to a
//!   descriptor document.

use crate::descriptor::{Access, ComponentDescriptor, ComponentReference, Resource};
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Canonical JSON document normalization, version 1.
pub const JSON_NORMALISATION_V1: &str = "jsonNormalisation/v1";

/// OCI artifact content normalization, version 1.
pub const OCI_ARTIFACT_DIGEST_V1: &str = "ociArtifactDigest/v1";

/// Canonical byte form of a whole descriptor.
///
/// The signature list is excluded entirely: signatures attest to the
/// descriptor, so they cannot be part of the signed payload. Element
/// digests stay in, which is why propagation must run first.
pub fn normalise_component_descriptor(
    cd: &ComponentDescriptor,
    algorithm: &str,
) -> Result<Vec<u8>> {
    require_json_v1(algorithm, "component descriptor")?;
    ensure_canonicalizable_accesses(&cd.component.resources)?;
    ensure_unique_identities("componentReferences", &cd.component.component_references, |r| {
        r.element_identity().sort_key()
    })?;
    ensure_unique_identities("resources", &cd.component.resources, |r| {
        r.element_identity().sort_key()
    })?;

    let mut root = to_object(cd)?;
    root.remove("signatures");

    if let Some(Value::Object(component)) = root.get_mut("component") {
        sort_elements_by_identity(component, "componentReferences", &cd.component.component_references)?;
        sort_elements_by_identity(component, "resources", &cd.component.resources)?;
    }

    encode_canonical(Value::Object(root))
}

/// Canonical byte form of a single component reference, excluding its own
/// digest field.
pub fn normalise_component_reference(
    reference: &ComponentReference,
    algorithm: &str,
) -> Result<Vec<u8>> {
    require_json_v1(algorithm, "component reference")?;
    let mut object = to_object(reference)?;
    object.remove("digest");
    encode_canonical(Value::Object(object))
}

/// Canonical byte form of a single resource: identity fields plus access
/// descriptor, excluding its own digest field.
pub fn normalise_resource(resource: &Resource, algorithm: &str) -> Result<Vec<u8>> {
    require_json_v1(algorithm, "resource")?;
    if let Access::Other(_) = resource.access {
        return Err(unknown_access_error(resource));
    }
    let mut object = to_object(resource)?;
    object.remove("digest");
    encode_canonical(Value::Object(object))
}

/// Canonical byte form of artifact content under a content normalization
/// algorithm. For [`OCI_ARTIFACT_DIGEST_V1`] this is the identity
/// transform over the raw content bytes.
pub fn normalise_artifact_content(content: &[u8], algorithm: &str) -> Result<Vec<u8>> {
    match algorithm {
        OCI_ARTIFACT_DIGEST_V1 => Ok(content.to_vec()),
        other => Err(Error::Normalization(format!(
            "unknown artifact content normalisation algorithm: {other}"
        ))),
    }
}

fn require_json_v1(algorithm: &str, target: &str) -> Result<()> {
    match algorithm {
        JSON_NORMALISATION_V1 => Ok(()),
        OCI_ARTIFACT_DIGEST_V1 => Err(Error::Normalization(format!(
            "{OCI_ARTIFACT_DIGEST_V1} addresses artifact content and cannot normalise a {target} document"
        ))),
        other => Err(Error::Normalization(format!(
            "unknown normalisation algorithm for {target}: {other}"
        ))),
    }
}

fn ensure_canonicalizable_accesses(resources: &[Resource]) -> Result<()> {
    for resource in resources {
        if let Access::Other(_) = resource.access {
            return Err(unknown_access_error(resource));
        }
    }
    Ok(())
}

fn unknown_access_error(resource: &Resource) -> Error {
    Error::Normalization(format!(
        "resource {} (version {}) has unknown access kind {:?}; no canonicalization rule registered",
        resource.name,
        resource.version,
        resource.access.kind()
    ))
}

fn ensure_unique_identities<T>(
    list: &str,
    items: &[T],
    key: impl Fn(&T) -> (String, String, String),
) -> Result<()> {
    let mut seen = BTreeMap::new();
    for item in items {
        let identity = key(item);
        if seen.insert(identity.clone(), ()).is_some() {
            let (name, version, extra) = identity;
            return Err(Error::Normalization(format!(
                "ambiguous order in {list}: duplicate identity (name: {name}, version: {version}, extraIdentity: {extra})"
            )));
        }
    }
    Ok(())
}

fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Normalization(format!(
            "expected an object document, got {other}"
        ))),
    }
}

/// Replace a serialized element list with the same entries sorted by
/// element identity. The JSON array and the typed slice index the same
/// declared order, so sorting an index permutation of the typed elements
/// carries over to the array.
fn sort_elements_by_identity<T>(
    component: &mut Map<String, Value>,
    field: &str,
    elements: &[T],
) -> Result<()>
where
    T: HasSortKey,
{
    let Some(Value::Array(entries)) = component.get_mut(field) else {
        return Ok(());
    };
    if entries.len() != elements.len() {
        return Err(Error::Normalization(format!(
            "serialized {field} list diverged from descriptor elements"
        )));
    }
    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by_key(|&i| elements[i].sort_key());
    let mut sorted = Vec::with_capacity(entries.len());
    for i in order {
        sorted.push(entries[i].take());
    }
    *entries = sorted;
    Ok(())
}

trait HasSortKey {
    fn sort_key(&self) -> (String, String, String);
}

impl HasSortKey for ComponentReference {
    fn sort_key(&self) -> (String, String, String) {
        self.element_identity().sort_key()
    }
}

impl HasSortKey for Resource {
    fn sort_key(&self) -> (String, String, String) {
        self.element_identity().sort_key()
    }
}

/// Rebuild the value with object keys in lexicographic order at every
/// nesting level, then encode compact JSON (no whitespace, serde_json
/// escaping and numeric formatting).
fn encode_canonical(value: Value) -> Result<Vec<u8>> {
    let canonical = canonical_value(value);
    serde_json::to_vec(&canonical).map_err(Error::from)
}

fn canonical_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, val)| (key, canonical_value(val)))
                .collect();
            let mut object = Map::with_capacity(sorted.len());
            for (key, val) in sorted {
                object.insert(key, val);
            }
            Value::Object(object)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonical_value).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{
        ComponentDescriptor, ComponentSpec, DigestSpec, Identity, Metadata, Signature,
    };

    fn descriptor_with(
        references: Vec<ComponentReference>,
        resources: Vec<Resource>,
    ) -> ComponentDescriptor {
        ComponentDescriptor {
            meta: Metadata {
                schema_version: "v2".to_string(),
            },
            component: ComponentSpec {
                name: "example.org/normalised".to_string(),
                version: "v1.0.0".to_string(),
                component_references: references,
                resources,
            },
            signatures: vec![],
        }
    }

    fn reference(name: &str, version: &str) -> ComponentReference {
        ComponentReference {
            name: name.to_string(),
            component_name: format!("example.org/{name}"),
            version: version.to_string(),
            extra_identity: Identity::new(),
            digest: None,
        }
    }

    fn github_resource(name: &str, version: &str) -> Resource {
        Resource {
            name: name.to_string(),
            version: version.to_string(),
            extra_identity: Identity::new(),
            access: Access::Github {
                repo_url: "https://github.com/example/repo".to_string(),
                git_ref: "main".to_string(),
                commit: "0123abc".to_string(),
            },
            digest: None,
        }
    }

    #[test]
    fn test_key_order_does_not_matter() -> Result<()> {
        let a: ComponentDescriptor = serde_yaml::from_str(
            r#"
meta:
  schemaVersion: v2
component:
  name: example.org/a
  version: v1
  componentReferences: []
  resources: []
"#,
        )?;
        let b: ComponentDescriptor = serde_yaml::from_str(
            r#"
component:
  resources: []
  componentReferences: []
  version: v1
  name: example.org/a
meta:
  schemaVersion: v2
"#,
        )?;
        assert_eq!(
            normalise_component_descriptor(&a, JSON_NORMALISATION_V1)?,
            normalise_component_descriptor(&b, JSON_NORMALISATION_V1)?
        );
        Ok(())
    }

    #[test]
    fn test_element_declaration_order_does_not_matter() -> Result<()> {
        let forward = descriptor_with(
            vec![reference("a", "v1"), reference("b", "v1")],
            vec![github_resource("r1", "v1"), github_resource("r2", "v1")],
        );
        let backward = descriptor_with(
            vec![reference("b", "v1"), reference("a", "v1")],
            vec![github_resource("r2", "v1"), github_resource("r1", "v1")],
        );
        assert_eq!(
            normalise_component_descriptor(&forward, JSON_NORMALISATION_V1)?,
            normalise_component_descriptor(&backward, JSON_NORMALISATION_V1)?
        );
        Ok(())
    }

    #[test]
    fn test_semantic_difference_changes_bytes() -> Result<()> {
        let a = descriptor_with(vec![], vec![github_resource("r1", "v1")]);
        let mut b = a.clone();
        b.component.resources[0].version = "v2".to_string();
        assert_ne!(
            normalise_component_descriptor(&a, JSON_NORMALISATION_V1)?,
            normalise_component_descriptor(&b, JSON_NORMALISATION_V1)?
        );
        Ok(())
    }

    #[test]
    fn test_signatures_excluded_from_canonical_form() -> Result<()> {
        let unsigned = descriptor_with(vec![], vec![]);
        let mut signed = unsigned.clone();
        signed.signatures.push(Signature {
            name: "sig".to_string(),
            digest: DigestSpec {
                hash_algorithm: "sha256".to_string(),
                normalisation_algorithm: JSON_NORMALISATION_V1.to_string(),
                value: "aa".to_string(),
            },
            algorithm: "RSASSA-PKCS1-V1_5".to_string(),
            value: "c2ln".to_string(),
        });
        assert_eq!(
            normalise_component_descriptor(&unsigned, JSON_NORMALISATION_V1)?,
            normalise_component_descriptor(&signed, JSON_NORMALISATION_V1)?
        );
        Ok(())
    }

    #[test]
    fn test_element_digest_excluded_from_its_own_canonical_form() -> Result<()> {
        let bare = github_resource("r1", "v1");
        let mut digested = bare.clone();
        digested.digest = Some(DigestSpec {
            hash_algorithm: "sha256".to_string(),
            normalisation_algorithm: OCI_ARTIFACT_DIGEST_V1.to_string(),
            value: "bb".to_string(),
        });
        assert_eq!(
            normalise_resource(&bare, JSON_NORMALISATION_V1)?,
            normalise_resource(&digested, JSON_NORMALISATION_V1)?
        );
        Ok(())
    }

    #[test]
    fn test_child_digests_included_in_descriptor_form() -> Result<()> {
        let bare = descriptor_with(vec![], vec![github_resource("r1", "v1")]);
        let mut digested = bare.clone();
        digested.component.resources[0].digest = Some(DigestSpec {
            hash_algorithm: "sha256".to_string(),
            normalisation_algorithm: OCI_ARTIFACT_DIGEST_V1.to_string(),
            value: "bb".to_string(),
        });
        assert_ne!(
            normalise_component_descriptor(&bare, JSON_NORMALISATION_V1)?,
            normalise_component_descriptor(&digested, JSON_NORMALISATION_V1)?
        );
        Ok(())
    }

    #[test]
    fn test_extra_identity_key_order_does_not_matter() -> Result<()> {
        // BTreeMap identity keys are ordered by construction; check the
        // canonical bytes stay stable across insertion orders.
        let mut a = reference("dep", "v1");
        a.extra_identity.insert("x".to_string(), "1".to_string());
        a.extra_identity.insert("b".to_string(), "2".to_string());
        let mut b = reference("dep", "v1");
        b.extra_identity.insert("b".to_string(), "2".to_string());
        b.extra_identity.insert("x".to_string(), "1".to_string());
        assert_eq!(
            normalise_component_reference(&a, JSON_NORMALISATION_V1)?,
            normalise_component_reference(&b, JSON_NORMALISATION_V1)?
        );
        Ok(())
    }

    #[test]
    fn test_compact_output_has_no_whitespace() -> Result<()> {
        let cd = descriptor_with(vec![reference("dep", "v1")], vec![]);
        let bytes = normalise_component_descriptor(&cd, JSON_NORMALISATION_V1)?;
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains('\n'));
        assert!(!text.contains(": "));
        Ok(())
    }

    #[test]
    fn test_unknown_access_kind_fails() {
        let mut resource = github_resource("blob", "v1");
        resource.access = Access::Other(serde_json::json!({
            "type": "localBlob",
            "path": "/tmp/blob"
        }));
        let cd = descriptor_with(vec![], vec![resource.clone()]);
        let err = normalise_component_descriptor(&cd, JSON_NORMALISATION_V1).unwrap_err();
        assert!(matches!(err, Error::Normalization(msg) if msg.contains("localBlob")));
        let err = normalise_resource(&resource, JSON_NORMALISATION_V1).unwrap_err();
        assert!(matches!(err, Error::Normalization(_)));
    }

    #[test]
    fn test_duplicate_identity_is_ambiguous() {
        let cd = descriptor_with(
            vec![reference("dup", "v1"), reference("dup", "v1")],
            vec![],
        );
        let err = normalise_component_descriptor(&cd, JSON_NORMALISATION_V1).unwrap_err();
        assert!(matches!(err, Error::Normalization(msg) if msg.contains("duplicate identity")));
    }

    #[test]
    fn test_extra_identity_disambiguates_same_name_version() -> Result<()> {
        let mut first = reference("dup", "v1");
        first.extra_identity.insert("slot".to_string(), "a".to_string());
        let mut second = reference("dup", "v1");
        second.extra_identity.insert("slot".to_string(), "b".to_string());
        let cd = descriptor_with(vec![first, second], vec![]);
        assert!(normalise_component_descriptor(&cd, JSON_NORMALISATION_V1).is_ok());
        Ok(())
    }

    #[test]
    fn test_unknown_algorithm_names_fail() {
        let cd = descriptor_with(vec![], vec![]);
        assert!(matches!(
            normalise_component_descriptor(&cd, "jsonNormalisation/v9").unwrap_err(),
            Error::Normalization(_)
        ));
        assert!(matches!(
            normalise_component_descriptor(&cd, OCI_ARTIFACT_DIGEST_V1).unwrap_err(),
            Error::Normalization(_)
        ));
        assert!(matches!(
            normalise_artifact_content(b"bytes", JSON_NORMALISATION_V1).unwrap_err(),
            Error::Normalization(_)
        ));
    }

    #[test]
    fn test_artifact_content_is_identity_under_oci_v1() -> Result<()> {
        let content = b"layer bytes";
        assert_eq!(
            normalise_artifact_content(content, OCI_ARTIFACT_DIGEST_V1)?,
            content.to_vec()
        );
        Ok(())
    }
}
