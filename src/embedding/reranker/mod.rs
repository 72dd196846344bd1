//! Cross-encoder relevance model (BERT + single-logit head).
//!
//! Without a configured model path the reranker runs in stub mode and scores
//! pairs by lexical overlap, which keeps tests and local runs model-free.

pub mod config;
pub mod error;


pub use config::{MAX_SEQ_LEN, RerankerConfig, ScoreActivation};
pub use error::RerankerError;

use std::collections::HashSet;

use candle_core::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::embedding::bert::BertClassifier;
use crate::embedding::device::select_device;
use crate::embedding::utils::{check_model_dir, load_tokenizer};

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "can", "to",
    "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "through", "during",
    "before", "after", "and", "but", "if", "or", "because", "while", "what", "which", "who",
    "this", "that", "these", "those", "am", "it", "its", "our", "your", "we", "you", "i", "my",
];

struct LoadedModel {
    model: BertClassifier,
    tokenizer: Tokenizer,
}

pub struct Reranker {
    device: candle_core::Device,
    config: RerankerConfig,
    loaded: Option<LoadedModel>,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl Reranker {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        config
            .validate()
            .map_err(|reason| RerankerError::InvalidConfig { reason })?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for reranker");

        let Some(model_path) = config.model_path.clone() else {
            info!("No reranker model path configured, operating in stub mode");
            return Ok(Self {
                device,
                config,
                loaded: None,
            });
        };

        if !model_path.exists() {
            return Err(RerankerError::ModelNotFound { path: model_path });
        }
        check_model_dir(&model_path).map_err(|reason| RerankerError::ModelLoadFailed { reason })?;

        info!(
            model_path = %model_path.display(),
            activation = ?config.activation,
            "Loading reranker model"
        );

        let model = BertClassifier::load(&model_path, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load BERT classifier: {}", e),
            }
        })?;

        let tokenizer = load_tokenizer(&model_path, MAX_SEQ_LEN).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        info!("Reranker model loaded successfully");

        Ok(Self {
            device,
            config,
            loaded: Some(LoadedModel { model, tokenizer }),
        })
    }

    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::stub())
    }

    /// Relevance of `candidate` to `query`.
    pub fn score(&self, query: &str, candidate: &str) -> Result<f32, RerankerError> {
        self.score_pairs(&[(query, candidate)])?
            .first()
            .copied()
            .ok_or_else(|| RerankerError::InferenceFailed {
                reason: "classifier returned no logits".to_string(),
            })
    }

    /// Scores each `(query, candidate)` pair, preserving order.
    ///
    /// With a loaded model all pairs go through a single padded forward pass.
    pub fn score_pairs(&self, pairs: &[(&str, &str)]) -> Result<Vec<f32>, RerankerError> {
        debug!(
            pairs = pairs.len(),
            model_loaded = self.is_model_loaded(),
            "Scoring text pairs"
        );

        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        match &self.loaded {
            Some(loaded) => self.score_batch_with_model(loaded, pairs),
            None => Ok(pairs
                .iter()
                .map(|(query, candidate)| placeholder_score(query, candidate))
                .collect()),
        }
    }

    fn score_batch_with_model(
        &self,
        loaded: &LoadedModel,
        pairs: &[(&str, &str)],
    ) -> Result<Vec<f32>, RerankerError> {
        let encodings = loaded
            .tokenizer
            .encode_batch(pairs.to_vec(), true)
            .map_err(|e| RerankerError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        let batch = |rows: Vec<&[u32]>| -> Result<Tensor, RerankerError> {
            let (values, width) = pad_rows(&rows);
            Ok(Tensor::from_vec(values, (rows.len(), width), &self.device)?)
        };
        let token_ids = batch(encodings.iter().map(|e| e.get_ids()).collect())?;
        let type_ids = batch(encodings.iter().map(|e| e.get_type_ids()).collect())?;
        let attention_mask = batch(encodings.iter().map(|e| e.get_attention_mask()).collect())?;

        let logits = loaded
            .model
            .forward(&token_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| RerankerError::InferenceFailed {
                reason: e.to_string(),
            })?
            .flatten_all()?
            .to_vec1::<f32>()?;

        if logits.len() != pairs.len() {
            return Err(RerankerError::InferenceFailed {
                reason: format!(
                    "classifier returned {} logits for {} pairs",
                    logits.len(),
                    pairs.len()
                ),
            });
        }

        Ok(logits
            .into_iter()
            .map(|logit| self.config.activation.apply(logit))
            .collect())
    }

    pub fn is_model_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }

    pub fn device(&self) -> &candle_core::Device {
        &self.device
    }
}

/// Right-pads `rows` with zeros to the longest row, returning the flattened
/// values and the padded width.
fn pad_rows(rows: &[&[u32]]) -> (Vec<u32>, usize) {
    let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    let mut values = Vec::with_capacity(rows.len() * width);
    for row in rows {
        values.extend_from_slice(row);
        values.resize(values.len() + width - row.len(), 0);
    }
    (values, width)
}

fn content_words(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Deterministic stand-in for the cross-encoder: squashed recall/Jaccard overlap in `[0, 1]`.
fn placeholder_score(query: &str, candidate: &str) -> f32 {
    let query_words = content_words(query);
    let candidate_words = content_words(candidate);

    if query_words.is_empty() {
        return 0.0;
    }

    let matches = query_words.intersection(&candidate_words).count();
    let recall = matches as f32 / query_words.len() as f32;

    let union = query_words.union(&candidate_words).count();
    let jaccard = matches as f32 / union as f32;

    let base_score = 0.6 * recall + 0.4 * jaccard;
    let squashed = 1.0 / (1.0 + (-8.0 * (base_score - 0.5)).exp());

    squashed.clamp(0.0, 1.0)
}
