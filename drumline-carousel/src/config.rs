//! Tuning for the carousel's scroll physics and arc layout.
//!
//! The constants here encode a deliberate physical feel (damping ratio,
//! stabilization rate, bow shape). They are surfaced as configuration so
//! embedders and tests can override them deterministically instead of
//! patching literals.

/// Damping parameters for one interpolated scroll scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampingConfig {
    /// Exponential retention factor per millisecond. 0.99 keeps 99% of the
    /// remaining distance for each elapsed millisecond; elapsed time is
    /// applied as the exponent, so the motion is frame rate independent.
    pub decay_per_ms: f32,
    /// Linear stabilization rate in pixels per millisecond. Once the
    /// remaining distance drops below one step the value snaps exactly to
    /// the target; pure exponential decay alone never arrives.
    pub linear_px_per_ms: f32,
}

/// Static configuration for a map carousel instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselConfig {
    /// Height of one card row in pixels.
    pub item_height: f32,
    /// Vertical distance from the viewport center at which the horizontal
    /// bow saturates.
    pub arc_radius_y: f32,
    /// Maximum horizontal push applied at full bow saturation.
    pub arc_depth_x: f32,
    /// Damping for the target offset following the selection. Suspended
    /// while a drag gesture is active.
    pub follow: DampingConfig,
    /// Damping for the rendered offset chasing the target. Always active,
    /// and quicker than `follow` so the visible motion stays tight.
    pub chase: DampingConfig,
}

impl CarouselConfig {
    /// Production tuning for the song-select screen.
    pub const fn select_defaults(item_height: f32) -> Self {
        Self {
            item_height,
            arc_radius_y: 800.0,
            arc_depth_x: 350.0,
            follow: DampingConfig {
                decay_per_ms: 0.99,
                linear_px_per_ms: 0.01,
            },
            chase: DampingConfig {
                decay_per_ms: 0.99,
                linear_px_per_ms: 0.02,
            },
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::select_defaults(100.0)
    }
}
