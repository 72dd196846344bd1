use std::io;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

/// Resolves `tokenizer.json` from a model directory or an explicit file path.
pub fn tokenizer_path(model_path: &Path) -> io::Result<PathBuf> {
    if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new("tokenizer.json"))
    {
        return Ok(model_path.to_path_buf());
    }
    if model_path.is_dir() {
        return Ok(model_path.join("tokenizer.json"));
    }
    model_path
        .parent()
        .map(|parent| parent.join("tokenizer.json"))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "model path has no parent"))
}

/// Loads a tokenizer that truncates inputs to `max_len` tokens, the size of the
/// model's position-embedding table.
pub fn load_tokenizer(model_path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(tokenizer_path(model_path)?).map_err(io::Error::other)?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(|e| io::Error::other(format!("failed to configure truncation: {}", e)))?;

    Ok(tokenizer)
}

/// Checks that a model directory holds `config.json` and `model.safetensors`.
pub fn check_model_dir(model_dir: &Path) -> Result<(), String> {
    if !model_dir.is_dir() {
        return Err(format!("model directory not found: {}", model_dir.display()));
    }
    for required in ["config.json", "model.safetensors"] {
        if !model_dir.join(required).exists() {
            return Err(format!("missing {} in {}", required, model_dir.display()));
        }
    }
    Ok(())
}
