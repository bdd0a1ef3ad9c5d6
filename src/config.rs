use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. The only
/// knob that lives here is the model directory — the stemming toggle is a
/// per-invocation CLI flag, not configuration.
pub struct Config {
    /// Directory containing the ONNX embedding model files
    pub model_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let model_dir = env::var("STUDYRANK_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::ranking::download::default_model_dir());

        Ok(Self { model_dir })
    }

    /// Check that the embedding model files are on disk.
    /// Call this before anything that needs the similarity ranker.
    pub fn require_model(&self) -> Result<()> {
        if !crate::ranking::download::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "Embedding model files not found in {}\n\
                 Run `studyrank download-model` to download them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}
