//! Host-facing flash settings and their resolution into runtime configuration.
//!
//! [`FlashSettings`] is the serializable form read at startup (every field has a default, so an
//! empty JSON object is valid). [`FlashSettings::resolve`] turns it into an immutable
//! [`FlashConfig`], detecting the display refresh rate when no explicit frame rate is set.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::animation::ease::Ease;
use crate::animation::timing::TimingConfig;
use crate::foundation::core::FlashColor;
use crate::foundation::error::{FlashError, FlashResult};

/// Refresh rate used when detection fails or reports something implausible.
pub const FALLBACK_REFRESH_HZ: u32 = 60;

const PLAUSIBLE_REFRESH_HZ: std::ops::RangeInclusive<f64> = 30.0..=500.0;

/// Source of the display's native refresh rate.
///
/// Queried once while resolving settings, never from the tick loop.
pub trait DisplayInfo {
    /// Native refresh rate of the primary display in Hz, if known.
    fn refresh_rate_hz(&self) -> Option<f64>;
}

/// Display with a fixed, known refresh rate.
#[derive(Clone, Copy, Debug)]
pub struct FixedDisplay(pub f64);

impl DisplayInfo for FixedDisplay {
    fn refresh_rate_hz(&self) -> Option<f64> {
        Some(self.0)
    }
}

/// Display whose refresh rate cannot be queried.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnknownDisplay;

impl DisplayInfo for UnknownDisplay {
    fn refresh_rate_hz(&self) -> Option<f64> {
        None
    }
}

/// Parameters for the fallback palette.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PaletteSettings {
    /// Background the flash colors are drawn against, as RGB.
    pub background: [u8; 3],
    /// Minimum WCAG contrast ratio every palette color must reach against `background`.
    pub min_contrast: f64,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            min_contrast: 4.5,
        }
    }
}

/// Serializable flash tuning knobs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FlashSettings {
    /// Fade-in duration in milliseconds.
    pub fade_in_ms: u64,
    /// Hold duration in milliseconds.
    pub hold_ms: u64,
    /// Fade-out duration in milliseconds.
    pub fade_out_ms: u64,
    /// Alpha at full intensity.
    pub flash_alpha: u8,
    /// Explicit tick interval; overrides every FPS setting when present.
    pub frame_ms: Option<u64>,
    /// Target frame rate; `None` detects it from the display.
    pub target_fps: Option<u32>,
    /// Upper bound on the effective frame rate.
    pub max_fps: Option<u32>,
    /// Color for keys without a scope (and the neutral fallback), as RGB.
    pub base_color: [u8; 3],
    /// Easing of the fade-in ramp.
    pub fade_in_ease: Ease,
    /// Easing of the fade-out ramp.
    pub fade_out_ease: Ease,
    /// Fallback palette parameters.
    pub palette: PaletteSettings,
    /// Hash only the parent scope of a key so siblings share a palette color.
    pub palette_by_parent_scope: bool,
}

impl Default for FlashSettings {
    fn default() -> Self {
        Self {
            fade_in_ms: 200,
            hold_ms: 50,
            fade_out_ms: 600,
            flash_alpha: 255,
            frame_ms: None,
            target_fps: None,
            max_fps: Some(60),
            base_color: [180, 180, 180],
            fade_in_ease: Ease::OutQuad,
            fade_out_ease: Ease::InOutCubic,
            palette: PaletteSettings::default(),
            palette_by_parent_scope: true,
        }
    }
}

impl FlashSettings {
    /// Parse settings from JSON text.
    pub fn from_json_str(json: &str) -> FlashResult<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| FlashError::config(format!("parse flash settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file.
    pub fn from_path(path: &Path) -> FlashResult<Self> {
        let f = File::open(path).map_err(|e| {
            FlashError::config(format!("open flash settings '{}': {e}", path.display()))
        })?;
        let settings: Self = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            FlashError::config(format!("parse flash settings '{}': {e}", path.display()))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> FlashResult<()> {
        if self.frame_ms == Some(0) {
            return Err(FlashError::validation("frame_ms must be > 0"));
        }
        if self.target_fps == Some(0) {
            return Err(FlashError::validation("target_fps must be > 0"));
        }
        if self.max_fps == Some(0) {
            return Err(FlashError::validation("max_fps must be > 0"));
        }
        if !self.palette.min_contrast.is_finite() || self.palette.min_contrast < 1.0 {
            return Err(FlashError::validation(
                "palette.min_contrast must be a finite ratio >= 1",
            ));
        }
        Ok(())
    }

    /// Effective frames per second after detection and capping.
    pub fn effective_fps(&self, display: &dyn DisplayInfo) -> u32 {
        let fps = match self.target_fps {
            Some(fps) => fps,
            None => detect_refresh_rate(display),
        };
        match self.max_fps {
            Some(cap) if fps > cap => {
                tracing::debug!(fps, cap, "capping flash frame rate");
                cap
            }
            _ => fps,
        }
    }

    /// Resolve into the immutable runtime configuration.
    pub fn resolve(&self, display: &dyn DisplayInfo) -> FlashResult<FlashConfig> {
        self.validate()?;
        let frame_interval = match self.frame_ms {
            Some(ms) => Duration::from_millis(ms),
            None => {
                let fps = self.effective_fps(display);
                let ms = (1000.0 / f64::from(fps)).round().max(1.0) as u64;
                tracing::info!(fps, frame_ms = ms, "flash animation frame rate");
                Duration::from_millis(ms)
            }
        };
        let timing = TimingConfig::new(
            Duration::from_millis(self.fade_in_ms),
            Duration::from_millis(self.hold_ms),
            Duration::from_millis(self.fade_out_ms),
            frame_interval,
        )?
        .with_easing(self.fade_in_ease, self.fade_out_ease);

        Ok(FlashConfig {
            timing,
            flash_alpha: self.flash_alpha,
            neutral_color: FlashColor::from(self.base_color),
            palette: self.palette,
            palette_by_parent_scope: self.palette_by_parent_scope,
        })
    }
}

fn detect_refresh_rate(display: &dyn DisplayInfo) -> u32 {
    match display.refresh_rate_hz() {
        Some(hz) if PLAUSIBLE_REFRESH_HZ.contains(&hz) => {
            tracing::info!(hz, "detected display refresh rate");
            hz.round() as u32
        }
        Some(hz) => {
            tracing::warn!(
                hz,
                fallback = FALLBACK_REFRESH_HZ,
                "unusual refresh rate detected"
            );
            FALLBACK_REFRESH_HZ
        }
        None => {
            tracing::warn!(
                fallback = FALLBACK_REFRESH_HZ,
                "refresh rate unavailable"
            );
            FALLBACK_REFRESH_HZ
        }
    }
}

/// Immutable runtime configuration read by the coordinator.
#[derive(Clone, Debug, PartialEq)]
pub struct FlashConfig {
    /// Flash envelope and tick interval.
    pub timing: TimingConfig,
    /// Alpha at full intensity.
    pub flash_alpha: u8,
    /// Color for unscoped keys.
    pub neutral_color: FlashColor,
    /// Fallback palette parameters.
    pub palette: PaletteSettings,
    /// Hash only the parent scope of a key when picking a palette color.
    pub palette_by_parent_scope: bool,
}

impl FlashConfig {
    /// Default settings at 60 Hz, without display detection.
    pub fn standard() -> Self {
        let settings = FlashSettings::default();
        Self {
            timing: TimingConfig::standard(),
            flash_alpha: settings.flash_alpha,
            neutral_color: FlashColor::from(settings.base_color),
            palette: settings.palette,
            palette_by_parent_scope: settings.palette_by_parent_scope,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
