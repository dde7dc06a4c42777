//! Host collaborator for resolving `আমদানি "path";` imports into source
//! text (SPEC_FULL.md §9.6 "Host collaborators").
//!
//! The core pipeline has no filesystem or network access of its own;
//! resolving a module path to source text is a host concern, so it is
//! expressed as a trait a host implements however fits its environment
//! (reading from disk, an in-memory registry, a network fetch, ...).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModuleLoadError {
    #[error("this host does not support import resolution")]
    Unsupported,
    #[error("module not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Io(String),
}

pub trait ModuleLoader {
    fn load(&mut self, path: &str) -> Result<String, ModuleLoadError>;
}

/// The default loader: every import fails. A host whose programs never use
/// `আমদানি` (every scenario in spec.md §8 is single-file) can run the
/// pipeline without wiring anything up.
#[derive(Debug, Default)]
pub struct NullModuleLoader;

impl ModuleLoader for NullModuleLoader {
    fn load(&mut self, _path: &str) -> Result<String, ModuleLoadError> {
        Err(ModuleLoadError::Unsupported)
    }
}
