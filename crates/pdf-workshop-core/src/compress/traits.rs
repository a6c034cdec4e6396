use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// Trait for external size-optimization backends.
///
/// Implementations read `input` and write the optimized document to
/// `output`; they never touch `input`. Swapping the result into place is the
/// caller's job.
#[async_trait]
pub trait Compressor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Write an optimized copy of `input` to `output`
    async fn compress(&self, input: &Path, output: &Path) -> Result<()>;
}
