use serde::{Deserialize, Serialize};

/// Output buffer sizing for engine calls.
///
/// The first attempt gets `multiplier * n + 1` units. When the engine stops early
/// because the buffer is full, the capacity doubles until it would pass
/// `max_multiplier * n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferPolicy {
    pub multiplier: usize,
    pub max_multiplier: usize,
}

impl Default for BufferPolicy {
    fn default() -> Self {
        Self {
            multiplier: 4,
            max_multiplier: 64,
        }
    }
}

impl BufferPolicy {
    pub fn initial_capacity(&self, input_len: usize) -> usize {
        input_len
            .saturating_mul(self.multiplier.max(1))
            .saturating_add(1)
    }

    pub fn ceiling(&self, input_len: usize) -> usize {
        let factor = self.max_multiplier.max(self.multiplier).max(1);
        input_len.saturating_mul(factor).saturating_add(1)
    }

    /// Next capacity to retry with, or `None` once the ceiling has been reached.
    pub fn grow(&self, current: usize, input_len: usize) -> Option<usize> {
        let ceiling = self.ceiling(input_len);
        if current >= ceiling {
            return None;
        }
        Some(current.saturating_mul(2).min(ceiling))
    }
}
