// Similarity ranking — embeds topics and questions into a shared vector
// space and aggregates per-topic similarity across every question.

pub mod download;
pub mod embeddings;
pub mod rank;
pub mod traits;
