use super::commands::DescriptorCommands;
use crate::descriptor::ComponentDescriptor;
use crate::digest;
use crate::error::{Error, Result};
use crate::hash::HasherRegistry;
use crate::signing;
use crate::signing::rsa::{RsaSigner, RsaVerifier};
use log::info;
use std::fs;
use std::path::Path;

pub fn handle_descriptor_command(cmd: DescriptorCommands) -> Result<()> {
    let registry = HasherRegistry::builtin();
    match cmd {
        DescriptorCommands::Digest {
            descriptor,
            hash_alg,
        } => {
            let cd = load_descriptor(&descriptor)?;
            ensure_propagated(&cd)?;
            let mut hasher = registry.hasher_for_name(hash_alg.algorithm_name())?;
            let digest = digest::hash_for_component_descriptor(&cd, hasher.as_mut())?;
            println!("{}", digest.value);
            Ok(())
        }
        DescriptorCommands::Sign {
            descriptor,
            key,
            signature_name,
            hash_alg,
            output,
        } => {
            let mut cd = load_descriptor(&descriptor)?;
            ensure_propagated(&cd)?;
            let signer = RsaSigner::from_key_file(&key)?;
            let mut hasher = registry.hasher_for_name(hash_alg.algorithm_name())?;
            signing::sign_component_descriptor(&mut cd, &signer, hasher.as_mut(), &signature_name)?;
            info!(
                "attached signature {signature_name} to {}",
                cd.component.name
            );

            let yaml = cd.to_yaml()?;
            match output {
                Some(path) => fs::write(path, yaml)?,
                None => print!("{yaml}"),
            }
            Ok(())
        }
        DescriptorCommands::Verify {
            descriptor,
            public_key,
            signature_name,
        } => {
            let cd = load_descriptor(&descriptor)?;
            let verifier = RsaVerifier::from_key_file(&public_key)?;
            signing::verify_signed_component_descriptor(
                &cd,
                &verifier,
                &registry,
                &signature_name,
            )?;
            println!(
                "signature {signature_name} on {} verified",
                cd.component.name
            );
            Ok(())
        }
    }
}

fn load_descriptor(path: &Path) -> Result<ComponentDescriptor> {
    let yaml = fs::read_to_string(path)?;
    ComponentDescriptor::from_yaml(&yaml)
}

/// The CLI works on stored descriptors, so every element must already
/// carry its digest; digest propagation with live digesters is a library
/// concern.
fn ensure_propagated(cd: &ComponentDescriptor) -> Result<()> {
    for reference in &cd.component.component_references {
        if reference.digest.is_none() {
            return Err(Error::Validation(format!(
                "component reference {} (version {}) has no digest; run digest propagation first",
                reference.name, reference.version
            )));
        }
    }
    for resource in &cd.component.resources {
        if resource.digest.is_none() {
            return Err(Error::Validation(format!(
                "resource {} (version {}) has no digest; run digest propagation first",
                resource.name, resource.version
            )));
        }
    }
    Ok(())
}
