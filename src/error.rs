// Error taxonomy for the ranking pipeline.
//
// Three failure kinds, matching the three places the pipeline touches the
// outside world: the file handed to a segmenter, the document parser, and
// the embedding model.

use thiserror::Error;

/// Errors surfaced by the extraction and ranking stages.
#[derive(Debug, Error)]
pub enum Error {
    /// The file extension is not one the segmenter accepts. Format is
    /// decided by extension alone — no content sniffing.
    #[error("unsupported format: {file} (expected {expected})")]
    UnsupportedFormat {
        file: String,
        expected: &'static str,
    },

    /// The document could not be read or parsed. Partial results from a
    /// failed extraction are not valid.
    #[error("failed to extract content from {file}")]
    Extraction {
        file: String,
        #[source]
        source: anyhow::Error,
    },

    /// The embedding model could not be loaded or inference failed.
    /// Fatal for the ranking step only — extracted data stays displayable.
    #[error("embedding model unavailable")]
    EmbeddingUnavailable(#[source] anyhow::Error),
}
