// Sentence embeddings via all-MiniLM-L6-v2, run locally through ONNX.
//
// Each text is tokenized, run through the BERT encoder, and mean-pooled
// over the attention mask into a single 384-dimensional vector. The model
// is loaded once per process and holds no per-call mutable state, so one
// instance serves every ranking invocation.

use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::traits::TextEmbedder;

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

static GLOBAL: OnceLock<SentenceEmbedder> = OnceLock::new();

/// Local sentence embedder.
///
/// The session sits behind a mutex so a shared reference can run inference;
/// the tokenizer is shared via Arc for spawn_blocking.
pub struct SentenceEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl SentenceEmbedder {
    /// Load the model and tokenizer from the given directory.
    ///
    /// Expects `model.onnx` and `tokenizer.json`; run
    /// `studyrank download-model` first if they are missing.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        for required in [&model_path, &tokenizer_path] {
            if !required.exists() {
                anyhow::bail!(
                    "embedding model file not found: {}\nRun `studyrank download-model` first.",
                    required.display()
                );
            }
        }

        let session = Session::builder()
            .context("failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("failed to load model from {}", model_path.display()))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("failed to load tokenizer: {e}"))?;

        debug!("loaded embedding model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }

    /// Get the process-wide embedder, loading it on first use.
    ///
    /// Later calls ignore `model_dir` and return the already-loaded
    /// instance; teardown is process exit.
    pub fn global(model_dir: &Path) -> Result<&'static SentenceEmbedder> {
        if let Some(embedder) = GLOBAL.get() {
            return Ok(embedder);
        }
        let embedder = Self::load(model_dir)?;
        Ok(GLOBAL.get_or_init(|| embedder))
    }
}

#[async_trait]
impl TextEmbedder for SentenceEmbedder {
    /// Embed a batch of texts into 384-dimensional vectors.
    ///
    /// CPU-bound inference is offloaded to spawn_blocking so the runtime
    /// stays responsive.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || encode_batch(&session, &tokenizer, &texts))
            .await
            .context("spawn_blocking panicked")?
    }
}

/// Tokenize, run the encoder, and mean-pool one batch.
fn encode_batch(
    session: &Mutex<Session>,
    tokenizer: &Tokenizer,
    texts: &[String],
) -> Result<Vec<Vec<f64>>> {
    let encodings = texts
        .iter()
        .map(|text| {
            tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow::anyhow!("tokenization failed: {e}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let batch_size = encodings.len();
    let max_len = encodings
        .iter()
        .map(|enc| enc.get_ids().len())
        .max()
        .unwrap_or(0);

    if max_len == 0 {
        return Ok(vec![vec![0.0; EMBEDDING_DIM]; batch_size]);
    }

    // Padded model inputs: token ids, attention mask (1 = real token), and
    // all-zero token type ids for single-sentence input.
    let mut input_ids = Vec::with_capacity(batch_size * max_len);
    let mut attention_mask: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut token_type_ids = Vec::with_capacity(batch_size * max_len);

    for enc in &encodings {
        let seq_len = enc.get_ids().len();
        input_ids.extend(enc.get_ids().iter().map(|&id| id as i64));
        attention_mask.extend(enc.get_attention_mask().iter().map(|&m| m as i64));
        token_type_ids.extend(std::iter::repeat_n(0i64, seq_len));

        let pad = max_len - seq_len;
        input_ids.extend(std::iter::repeat_n(0i64, pad));
        attention_mask.extend(std::iter::repeat_n(0i64, pad));
        token_type_ids.extend(std::iter::repeat_n(0i64, pad));
    }

    let shape = [batch_size as i64, max_len as i64];
    let masks = attention_mask.clone();

    let input_ids_tensor =
        Tensor::from_array((shape, input_ids)).context("failed to build input_ids tensor")?;
    let attention_tensor = Tensor::from_array((shape, attention_mask))
        .context("failed to build attention_mask tensor")?;
    let token_type_tensor = Tensor::from_array((shape, token_type_ids))
        .context("failed to build token_type_ids tensor")?;

    let hidden_states = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("session lock poisoned: {e}"))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_tensor,
                "token_type_ids" => token_type_tensor
            })
            .context("embedding inference failed")?;

        // last_hidden_state: [batch, seq_len, EMBEDDING_DIM]
        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("failed to extract hidden states")?;
        data.to_vec()
    };

    let embeddings = (0..batch_size)
        .map(|row| mean_pool(&hidden_states, &masks, row, max_len))
        .collect();

    debug!(batch_size, dim = EMBEDDING_DIM, "computed sentence embeddings");
    Ok(embeddings)
}

/// Mean pooling for one batch row: average the token vectors where the
/// attention mask is set.
fn mean_pool(hidden_states: &[f32], masks: &[i64], row: usize, max_len: usize) -> Vec<f64> {
    let mut pooled = vec![0.0_f64; EMBEDDING_DIM];
    let mut token_count = 0.0_f64;

    for pos in 0..max_len {
        let cell = row * max_len + pos;
        if masks[cell] == 0 {
            continue;
        }
        token_count += 1.0;
        let offset = cell * EMBEDDING_DIM;
        for (dim, value) in pooled.iter_mut().enumerate() {
            *value += f64::from(hidden_states[offset + dim]);
        }
    }

    if token_count > 0.0 {
        for value in &mut pooled {
            *value /= token_count;
        }
    }

    pooled
}

/// Cosine similarity between two vectors: dot(u,v) / (|u||v|).
///
/// Defined as 0.0 when either vector is zero or the dimensions differ.
/// Negative similarities pass through unclamped — the aggregation sums raw
/// cosines.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = norm_a * norm_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        dot / denom
    }
}
