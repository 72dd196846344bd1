use std::path::PathBuf;
use std::str::FromStr;

pub const MAX_SEQ_LEN: usize = 512;

/// How raw cross-encoder logits are mapped to relevance scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreActivation {
    /// `1 / (1 + e^-x)`, giving scores in `(0, 1)`.
    #[default]
    Sigmoid,
    /// Raw logits.
    Identity,
}

impl ScoreActivation {
    pub fn apply(self, logit: f32) -> f32 {
        match self {
            ScoreActivation::Sigmoid => 1.0 / (1.0 + (-logit).exp()),
            ScoreActivation::Identity => logit,
        }
    }
}

impl FromStr for ScoreActivation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sigmoid" => Ok(ScoreActivation::Sigmoid),
            "identity" | "none" | "logit" => Ok(ScoreActivation::Identity),
            other => Err(format!("unknown score activation '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RerankerConfig {
    pub model_path: Option<PathBuf>,

    pub activation: ScoreActivation,
}

impl RerankerConfig {
    pub const ENV_MODEL_PATH: &'static str = "RECOMMENDER_RERANKER_PATH";
    pub const ENV_ACTIVATION: &'static str = "RECOMMENDER_RERANKER_ACTIVATION";

    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_activation(mut self, activation: ScoreActivation) -> Self {
        self.activation = activation;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }

        Ok(())
    }

    pub fn from_env() -> Result<Self, String> {
        let model_path = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let activation = match std::env::var(Self::ENV_ACTIVATION) {
            Ok(value) => value.parse()?,
            Err(_) => ScoreActivation::default(),
        };

        Ok(Self {
            model_path,
            activation,
        })
    }
}
