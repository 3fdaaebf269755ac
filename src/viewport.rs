use serde::{Deserialize, Serialize};

/// Duration of an animated reset.
pub const RESET_DURATION_MS: f64 = 750.0;

/// Affine zoom/pan state, consumable by any rendering surface as a single
/// `translate(tx, ty) scale(s)` transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl ViewportTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportLimits {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Overscroll margin: how much of the viewport may show past the
    /// content edge before panning is stopped.
    pub padding: f32,
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 5.0,
            padding: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Transitioning {
        from: ViewportTransform,
        to: ViewportTransform,
        started_ms: f64,
    },
}

/// Mutable zoom/pan state for one open tree view. Independent of the layout
/// engine: it never recomputes geometry, only composes over it.
///
/// Time never comes from a clock here; every operation that can interact
/// with the reset animation takes the current timestamp in milliseconds, so
/// behavior is deterministic under test.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    transform: ViewportTransform,
    limits: ViewportLimits,
    content_width: f32,
    content_height: f32,
    state: State,
}

impl Viewport {
    pub fn new(content_width: f32, content_height: f32, limits: ViewportLimits) -> Self {
        Self {
            transform: ViewportTransform::IDENTITY,
            limits,
            content_width,
            content_height,
            state: State::Idle,
        }
    }

    /// Current transform. During a reset animation this is the last value
    /// committed by [`Viewport::tick`].
    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, State::Transitioning { .. })
    }

    /// Multiplies the scale by `factor` (wheel delta mapped by the caller),
    /// clamped to the configured range. Translation is re-clamped against
    /// the new scale. Cancels a reset in flight.
    pub fn apply_zoom(&mut self, factor: f32, now_ms: f64) {
        self.cancel_transition(now_ms);
        let scale = (self.transform.scale * factor)
            .clamp(self.limits.min_scale, self.limits.max_scale);
        self.transform.scale = scale;
        self.clamp_translation();
    }

    /// Moves the content by `(dx, dy)` screen units, clamped so the content
    /// never leaves the visible margin entirely. Cancels a reset in flight.
    pub fn pan(&mut self, dx: f32, dy: f32, now_ms: f64) {
        self.cancel_transition(now_ms);
        self.transform.translate_x += dx;
        self.transform.translate_y += dy;
        self.clamp_translation();
    }

    /// Starts an animated return to the identity transform.
    pub fn reset(&mut self, now_ms: f64) {
        self.state = State::Transitioning {
            from: self.transform,
            to: ViewportTransform::IDENTITY,
            started_ms: now_ms,
        };
    }

    /// Immediate, non-animated reset.
    pub fn reset_now(&mut self) {
        self.state = State::Idle;
        self.transform = ViewportTransform::IDENTITY;
    }

    /// Advances the reset animation. Returns true while still animating.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let State::Transitioning {
            from,
            to,
            started_ms,
        } = self.state
        else {
            return false;
        };
        let t = ((now_ms - started_ms) / RESET_DURATION_MS).clamp(0.0, 1.0) as f32;
        self.transform = lerp(from, to, t);
        if t >= 1.0 {
            self.state = State::Idle;
            return false;
        }
        true
    }

    pub fn to_screen(&self, point: (f32, f32)) -> (f32, f32) {
        let t = &self.transform;
        (
            point.0 * t.scale + t.translate_x,
            point.1 * t.scale + t.translate_y,
        )
    }

    pub fn to_content(&self, point: (f32, f32)) -> (f32, f32) {
        let t = &self.transform;
        (
            (point.0 - t.translate_x) / t.scale,
            (point.1 - t.translate_y) / t.scale,
        )
    }

    /// A new gesture during a reset freezes the transform at its current
    /// interpolated value and returns to `Idle`.
    fn cancel_transition(&mut self, now_ms: f64) {
        if self.is_transitioning() {
            self.tick(now_ms);
            self.state = State::Idle;
        }
    }

    fn clamp_translation(&mut self) {
        let pad = self.limits.padding;
        let scale = self.transform.scale;
        let min_x = -(self.content_width * scale - pad);
        let min_y = -(self.content_height * scale - pad);
        self.transform.translate_x = self.transform.translate_x.clamp(min_x.min(pad), pad);
        self.transform.translate_y = self.transform.translate_y.clamp(min_y.min(pad), pad);
    }
}

fn lerp(from: ViewportTransform, to: ViewportTransform, t: f32) -> ViewportTransform {
    ViewportTransform {
        scale: from.scale + (to.scale - from.scale) * t,
        translate_x: from.translate_x + (to.translate_x - from.translate_x) * t,
        translate_y: from.translate_y + (to.translate_y - from.translate_y) * t,
    }
}
