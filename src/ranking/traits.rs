// Text embedding capability trait — swap-ready abstraction.
//
// The ranker only needs "list of strings in, one vector per string out".
// Keeping that behind a trait lets tests drive the aggregation with
// hand-built vectors and keeps the model implementation swappable.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for embedding text into fixed-dimension vectors.
///
/// Implementations must preserve input order, return exactly one vector per
/// input, and be deterministic for identical input and configuration.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed a batch of texts.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;
}
