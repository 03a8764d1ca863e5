use std::time::Duration;

use crate::animation::ease::Ease;
use crate::foundation::core::{FlashColor, Timestamp};
use crate::foundation::error::{FlashError, FlashResult};
use crate::foundation::math::scale_u8;

/// Fade-in / hold / fade-out envelope shared by every flash, plus the tick interval.
///
/// Immutable once built. Swapping timing while animations are in flight is not supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    fade_in: Duration,
    hold: Duration,
    fade_out: Duration,
    frame_interval: Duration,
    fade_in_ease: Ease,
    fade_out_ease: Ease,
}

impl TimingConfig {
    /// Build a validated envelope with default easing (OutQuad in, InOutCubic out).
    pub fn new(
        fade_in: Duration,
        hold: Duration,
        fade_out: Duration,
        frame_interval: Duration,
    ) -> FlashResult<Self> {
        if frame_interval.is_zero() {
            return Err(FlashError::validation("frame interval must be > 0"));
        }
        Ok(Self {
            fade_in,
            hold,
            fade_out,
            frame_interval,
            fade_in_ease: Ease::OutQuad,
            fade_out_ease: Ease::InOutCubic,
        })
    }

    /// 200 ms fade-in, 50 ms hold, 600 ms fade-out, ticking at 60 Hz.
    pub fn standard() -> Self {
        Self {
            fade_in: Duration::from_millis(200),
            hold: Duration::from_millis(50),
            fade_out: Duration::from_millis(600),
            frame_interval: Duration::from_millis(17),
            fade_in_ease: Ease::OutQuad,
            fade_out_ease: Ease::InOutCubic,
        }
    }

    /// Replace the easing used for each ramp.
    pub fn with_easing(self, fade_in_ease: Ease, fade_out_ease: Ease) -> Self {
        Self {
            fade_in_ease,
            fade_out_ease,
            ..self
        }
    }

    /// Fade-in duration.
    pub fn fade_in(&self) -> Duration {
        self.fade_in
    }

    /// Hold duration at full alpha.
    pub fn hold(&self) -> Duration {
        self.hold
    }

    /// Fade-out duration.
    pub fn fade_out(&self) -> Duration {
        self.fade_out
    }

    /// Interval between coordinator ticks.
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// `fade_in + hold + fade_out`.
    pub fn total_duration(&self) -> Duration {
        self.fade_in + self.hold + self.fade_out
    }

    /// Classify `now` relative to an animation that started at `start`.
    pub fn phase_between(&self, start: Timestamp, now: Timestamp) -> FlashPhase {
        match now.checked_since(start) {
            Some(elapsed) => self.phase_at(elapsed),
            None => FlashPhase::NotStarted,
        }
    }

    /// Classify an elapsed time since the animation started.
    pub fn phase_at(&self, elapsed: Duration) -> FlashPhase {
        if elapsed >= self.total_duration() {
            return FlashPhase::Expired;
        }
        if elapsed < self.fade_in {
            return FlashPhase::FadeIn {
                progress: ratio(elapsed, self.fade_in),
            };
        }
        let hold_end = self.fade_in + self.hold;
        if elapsed < hold_end {
            return FlashPhase::Hold;
        }
        FlashPhase::FadeOut {
            progress: ratio(elapsed - hold_end, self.fade_out),
        }
    }

    /// Eased intensity in `[0, 1]` for a phase, or `None` when nothing should be drawn.
    pub fn intensity(&self, phase: FlashPhase) -> Option<f64> {
        match phase {
            FlashPhase::NotStarted | FlashPhase::Expired => None,
            FlashPhase::FadeIn { progress } => Some(self.fade_in_ease.apply(progress)),
            FlashPhase::Hold => Some(1.0),
            FlashPhase::FadeOut { progress } => Some(1.0 - self.fade_out_ease.apply(progress)),
        }
    }
}

fn ratio(part: Duration, whole: Duration) -> f64 {
    if whole.is_zero() {
        return 1.0;
    }
    part.as_secs_f64() / whole.as_secs_f64()
}

/// Where an animation sits on its envelope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlashPhase {
    /// `now` precedes the start timestamp.
    NotStarted,
    /// Ramping up; `progress` is normalized time within the fade-in.
    FadeIn {
        /// Normalized time in `[0, 1)`.
        progress: f64,
    },
    /// Pinned at full alpha.
    Hold,
    /// Ramping down; `progress` is normalized time within the fade-out.
    FadeOut {
        /// Normalized time in `[0, 1)`.
        progress: f64,
    },
    /// Past the end of the envelope; the caller drops the animation.
    Expired,
}

/// Color of a flash that started at `start`, sampled at `now`.
///
/// `base` supplies RGB; alpha is `full_alpha` scaled by the eased envelope. Returns `None` when
/// the animation has not started or has expired. Pure, so the coordinator calls it once per key
/// per tick and paint callbacks only read the result.
pub fn flash_color_at(
    start: Timestamp,
    now: Timestamp,
    timing: &TimingConfig,
    base: FlashColor,
    full_alpha: u8,
) -> Option<FlashColor> {
    let intensity = timing.intensity(timing.phase_between(start, now))?;
    Some(base.with_alpha(scale_u8(full_alpha, intensity)))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timing.rs"]
mod tests;
