//! Scroll interpolation: exponential decay with a linear stabilization term.

use crate::config::DampingConfig;

/// Advance `current` toward `target` over `dt_ms` elapsed milliseconds.
///
/// The exponential part moves a fixed *fraction* of the remaining distance
/// per millisecond (`decay_per_ms ^ dt_ms` of it is retained), which keeps
/// the feel identical across frame rates. The linear term moves an
/// additional `linear_px_per_ms * dt_ms` and snaps to `target` once the
/// remaining distance is smaller than that step. The snap is the only way
/// the value ever reaches the target exactly, after which the
/// `current == target` fast path holds it there without floating drift.
pub fn exp_approach(
    current: f32,
    target: f32,
    decay_per_ms: f32,
    dt_ms: f32,
    linear_px_per_ms: f32,
) -> f32 {
    if current == target {
        return current;
    }
    let blend = decay_per_ms.powf(dt_ms);
    let mut next = target * (1.0 - blend) + current * blend;

    if linear_px_per_ms > 0.0 {
        let step = linear_px_per_ms * dt_ms;
        let diff = target - next;
        if diff.abs() < step {
            next = target;
        } else {
            next += diff.signum() * step;
        }
    }

    next
}

impl DampingConfig {
    /// [`exp_approach`] with this config's rates.
    pub fn advance(&self, current: f32, target: f32, dt_ms: f32) -> f32 {
        exp_approach(
            current,
            target,
            self.decay_per_ms,
            dt_ms,
            self.linear_px_per_ms,
        )
    }
}
