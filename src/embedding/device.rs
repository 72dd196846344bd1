use candle_core::Device;
use tracing::{debug, info, warn};

use super::error::EmbeddingError;

/// Picks the first usable accelerator compiled in (Metal, then CUDA), else CPU.
pub fn select_device() -> Result<Device, EmbeddingError> {
    let mut failures: Vec<String> = Vec::new();

    for (name, open) in accelerators() {
        match open(0) {
            Ok(device) => {
                info!(device = name, "Using GPU acceleration");
                return Ok(device);
            }
            Err(e) => {
                warn!(device = name, error = %e, "GPU device unavailable");
                failures.push(format!("{name} failed: {e}"));
            }
        }
    }

    let reason = if !cfg!(any(feature = "metal", feature = "cuda")) {
        debug!("No GPU features enabled");
        "no GPU backend compiled".to_string()
    } else {
        failures.join("; ")
    };

    debug!(reason = %reason, "Using CPU device");
    Ok(Device::Cpu)
}

type DeviceCtor = fn(usize) -> candle_core::Result<Device>;

/// Compiled-in accelerators in preference order. Each is only opened when tried.
#[allow(unused_mut)]
fn accelerators() -> Vec<(&'static str, DeviceCtor)> {
    let mut out: Vec<(&'static str, DeviceCtor)> = Vec::new();

    #[cfg(feature = "metal")]
    out.push(("metal", Device::new_metal));

    #[cfg(feature = "cuda")]
    out.push(("cuda", Device::new_cuda));

    out
}
