use retarget_utils::vector::{v3d_from_v3f, v3f_from_v3d, Vector3d, Vector3f};
use std::collections::HashMap;

/// Accumulates a window of consecutive per-frame samples per key and emits
/// one component-wise mean per window, reducing estimator jitter.
///
/// Keys are opaque: the session decides what "rotation", "translation" or
/// a joint id means. The window boundary is driven by the session's frame
/// counter (`frame_index % window == 0`), not by a fixed-size buffer, so
/// clips that start mid-window simply contribute a shorter first window.
#[derive(Debug)]
pub struct TemporalSmoother {
    window: u64,
    samples: HashMap<String, Vec<Vector3f>>,
}

impl TemporalSmoother {
    pub fn new(window: u64) -> Self {
        Self {
            window,
            samples: HashMap::new(),
        }
    }

    pub fn accumulate(&mut self, key: &str, sample: Vector3f) {
        self.samples.entry(key.to_owned()).or_default().push(sample);
    }

    /// Averages and clears all windows when `frame_index` sits on a window
    /// boundary and anything was accumulated
    pub fn try_flush(&mut self, frame_index: u64) -> Option<HashMap<String, Vector3f>> {
        if frame_index % self.window != 0 || self.samples.is_empty() {
            return None;
        }
        let averaged = self
            .samples
            .drain()
            .filter(|(_, samples)| !samples.is_empty())
            .map(|(key, samples)| {
                // Sum in f64 so long windows stay numerically stable
                let mut sum = Vector3d::zeros();
                for sample in &samples {
                    sum += v3d_from_v3f(sample);
                }
                (key, v3f_from_v3d(&(sum / samples.len() as f64)))
            })
            .collect();
        Some(averaged)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
