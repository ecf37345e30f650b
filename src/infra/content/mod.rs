//! Content backend adapters and startup selection.

pub mod files;
pub mod remote;

use std::sync::Arc;

use crate::application::content::ContentSource;
use crate::config::ContentBackend;

use files::FileContentSource;
use remote::RemoteContentSource;

/// Construct the configured content adapter. The choice is made once at
/// startup; everything downstream sees only the trait object.
pub fn build(backend: &ContentBackend) -> Arc<dyn ContentSource> {
    match backend {
        ContentBackend::Files { directory } => {
            Arc::new(FileContentSource::new(directory.clone()))
        }
        ContentBackend::Remote { base_url } => {
            Arc::new(RemoteContentSource::new(base_url.clone()))
        }
    }
}
