use crate::descriptor::{
    Access, ComponentDescriptor, ComponentReference, ComponentSpec, DigestSpec, Identity,
    Metadata, Resource,
};
use crate::hash::SHA256;
use crate::normalisation::{JSON_NORMALISATION_V1, OCI_ARTIFACT_DIGEST_V1};

/// Descriptor mirroring the canonical signing example: one undigested
/// component reference, one undigested resource, a component name full of
/// markup, unicode, and unprintable characters.
pub fn example_descriptor() -> ComponentDescriptor {
    ComponentDescriptor {
        meta: Metadata {
            schema_version: "v2".to_string(),
        },
        component: ComponentSpec {
            name: "CD-Name<html>cool</html> Unicode ♥ unprintable characters \u{0007} \u{0031}"
                .to_string(),
            version: "v0.0.1".to_string(),
            component_references: vec![ComponentReference {
                name: "compRefName".to_string(),
                component_name: "compRefNameComponentName".to_string(),
                version: "v0.0.2compRef".to_string(),
                extra_identity: Identity::from([("refKey".to_string(), "refName".to_string())]),
                digest: None,
            }],
            resources: vec![Resource {
                name: "Resource1".to_string(),
                version: "v0.0.3resource".to_string(),
                extra_identity: Identity::from([("key".to_string(), "value".to_string())]),
                access: Access::Github {
                    repo_url: "url2".to_string(),
                    git_ref: "ref".to_string(),
                    commit: "commit".to_string(),
                },
                digest: None,
            }],
        },
        signatures: vec![],
    }
}

/// Deterministic stub digest as the example digesters return it.
pub fn stub_digest(normalisation_algorithm: &str) -> DigestSpec {
    DigestSpec {
        hash_algorithm: SHA256.to_string(),
        normalisation_algorithm: normalisation_algorithm.to_string(),
        value: "value".to_string(),
    }
}

pub fn stub_reference_digest() -> DigestSpec {
    stub_digest(JSON_NORMALISATION_V1)
}

pub fn stub_resource_digest() -> DigestSpec {
    stub_digest(OCI_ARTIFACT_DIGEST_V1)
}
