//! Process-wide Model Handle
//!
//! Owns the active [`ArtifactBundle`]. Readers clone an `Arc` and run
//! inference without holding the lock; reloads build a complete new bundle
//! first and then swap the reference.

use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::info;

use super::artifact::ArtifactBundle;

#[derive(Default)]
pub struct ModelHandle {
    current: RwLock<Option<Arc<ArtifactBundle>>>,
}

impl ModelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an artifact pair and make it active. Returns `false` (keeping the
    /// previous bundle, if any) when the pair is missing or invalid.
    pub fn load(&self, dir: impl AsRef<Path>) -> bool {
        match ArtifactBundle::try_load(dir) {
            Some(bundle) => {
                self.install(bundle);
                true
            }
            None => false,
        }
    }

    /// Activate `bundle`; in-flight readers keep the bundle they cloned.
    pub fn install(&self, bundle: ArtifactBundle) -> Arc<ArtifactBundle> {
        let bundle = Arc::new(bundle);
        let mut slot = self.current.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(bundle.clone());
        info!("Activated trait model (max_length {})", bundle.max_length());
        bundle
    }

    pub fn current(&self) -> Option<Arc<ArtifactBundle>> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
