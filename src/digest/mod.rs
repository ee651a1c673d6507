//! # Digest Engine and Propagation
//!
//! Pure normalize-then-hash digest computation for descriptors and their
//! elements, and the propagation pass that fills in missing element
//! digests through caller-supplied digesters.
//!
//! Digesters are the seam for content-addressable storage and registry
//! lookups: this module never performs I/O itself and never recurses into
//! referenced components. A reference digester will typically resolve the
//! referenced component's own descriptor and hash it; that recursion
//! strategy belongs to the caller.

use crate::descriptor::{ComponentDescriptor, ComponentReference, DigestSpec, Resource};
use crate::error::Result;
use crate::hash::Hasher;
use crate::normalisation::{self, JSON_NORMALISATION_V1};
use log::debug;

/// Compute the whole-descriptor digest used as the signing payload.
///
/// The descriptor must already be fully propagated; normalization covers
/// every element digest but excludes the signature list.
pub fn digest_for_component_descriptor(
    cd: &ComponentDescriptor,
    hasher: &mut dyn Hasher,
    normalisation_algorithm: &str,
) -> Result<DigestSpec> {
    let normalised = normalisation::normalise_component_descriptor(cd, normalisation_algorithm)?;
    Ok(digest_bytes(&normalised, hasher, normalisation_algorithm))
}

/// Digest a single component reference under its document canonical form.
pub fn digest_for_component_reference(
    reference: &ComponentReference,
    hasher: &mut dyn Hasher,
    normalisation_algorithm: &str,
) -> Result<DigestSpec> {
    let normalised = normalisation::normalise_component_reference(reference, normalisation_algorithm)?;
    Ok(digest_bytes(&normalised, hasher, normalisation_algorithm))
}

/// Digest a single resource under its document canonical form.
pub fn digest_for_resource(
    resource: &Resource,
    hasher: &mut dyn Hasher,
    normalisation_algorithm: &str,
) -> Result<DigestSpec> {
    let normalised = normalisation::normalise_resource(resource, normalisation_algorithm)?;
    Ok(digest_bytes(&normalised, hasher, normalisation_algorithm))
}

/// Digest fetched artifact content under a content normalization
/// algorithm (e.g. `ociArtifactDigest/v1`).
pub fn digest_for_artifact_content(
    content: &[u8],
    hasher: &mut dyn Hasher,
    normalisation_algorithm: &str,
) -> Result<DigestSpec> {
    let normalised = normalisation::normalise_artifact_content(content, normalisation_algorithm)?;
    Ok(digest_bytes(&normalised, hasher, normalisation_algorithm))
}

fn digest_bytes(
    normalised: &[u8],
    hasher: &mut dyn Hasher,
    normalisation_algorithm: &str,
) -> DigestSpec {
    hasher.reset();
    hasher.write(normalised);
    DigestSpec {
        hash_algorithm: hasher.algorithm_name().to_string(),
        normalisation_algorithm: normalisation_algorithm.to_string(),
        value: hasher.finalize_hex(),
    }
}

/// Convenience wrapper: whole-descriptor digest under the default
/// document normalization.
pub fn hash_for_component_descriptor(
    cd: &ComponentDescriptor,
    hasher: &mut dyn Hasher,
) -> Result<DigestSpec> {
    digest_for_component_descriptor(cd, hasher, JSON_NORMALISATION_V1)
}

/// Fill in missing element digests, making the descriptor self-describing
/// before it is hashed as a whole.
///
/// Each digester receives the owning descriptor for context and the
/// element to digest, and returns the element's `DigestSpec`.
///
/// Component references are processed in declared order, then resources in
/// declared order. Elements that already carry a digest are left untouched
/// and their digester is not invoked; a pre-existing digest is trusted,
/// never re-verified (caller trust boundary).
///
/// The first digester error aborts the whole operation, wrapped with the
/// (name, version, extraIdentity) of the failing element. Digests attached
/// before the failure stay attached; a failed propagation is fatal and
/// non-resumable for this descriptor instance.
pub fn add_digests_to_component_descriptor<R, S>(
    cd: &mut ComponentDescriptor,
    mut reference_digester: R,
    mut resource_digester: S,
) -> Result<()>
where
    R: FnMut(&ComponentDescriptor, &ComponentReference) -> Result<DigestSpec>,
    S: FnMut(&ComponentDescriptor, &Resource) -> Result<DigestSpec>,
{
    // Digesters see the descriptor as it was when propagation started;
    // the single-writer discipline keeps partially-attached digests out
    // of their view.
    let context = cd.clone();

    for reference in &mut cd.component.component_references {
        if reference.digest.is_some() {
            debug!(
                "component reference {} already digested, skipping",
                reference.name
            );
            continue;
        }
        let digest = reference_digester(&context, reference)
            .map_err(|e| reference.element_identity().wrap_error(e))?;
        reference.digest = Some(digest);
    }

    for resource in &mut cd.component.resources {
        if resource.digest.is_some() {
            debug!("resource {} already digested, skipping", resource.name);
            continue;
        }
        let digest = resource_digester(&context, resource)
            .map_err(|e| resource.element_identity().wrap_error(e))?;
        resource.digest = Some(digest);
    }

    Ok(())
}
