//! Image dimension resolution.
//!
//! The embedding application knows how to actually load an image (DOM
//! `Image`, decoder, HTTP fetch); the core only needs the natural pixel
//! dimensions back, with failure reported distinctly from an indefinite
//! pend. The resolver wraps any [`ImageSource`] with a hard timeout so a
//! resource that never loads surfaces an error instead of hanging the
//! bounds computation forever.

use crate::{MapError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Natural pixel dimensions of an image resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Asynchronous image metadata provider supplied by the embedder
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Loads the resource and reports its natural dimensions
    async fn dimensions(&self, url: &str) -> Result<ImageDimensions>;
}

/// Deadline wrapper around an [`ImageSource`]
#[derive(Debug, Clone)]
pub struct DimensionResolver {
    timeout: Duration,
}

impl DimensionResolver {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Resolves dimensions for a URL, failing with
    /// [`MapError::ImageLoadTimeout`] when the source takes too long
    pub async fn resolve(&self, source: &dyn ImageSource, url: &str) -> Result<ImageDimensions> {
        match tokio::time::timeout(self.timeout, source.dimensions(url)).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("image load timed out for {url}");
                Err(MapError::ImageLoadTimeout(self.timeout))
            }
        }
    }
}

impl Default for DimensionResolver {
    fn default() -> Self {
        Self::new()
    }
}
