//! Configuration for every module on the page.
//!
//! Defaults reproduce the live site exactly. All structs deserialize with
//! `#[serde(default)]`, so a config file only needs the values it changes:
//!
//! ```ignore
//! let config = SiteConfig::from_json(r#"{ "field": { "max_link_distance": 160.0 } }"#)?;
//! assert_eq!(config.field.wide_count, 80);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::color::Rgba;
use crate::error::ConfigError;

/// Particle field tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Particle count at or above `narrow_below`.
    pub wide_count: usize,
    /// Particle count for viewports narrower than `narrow_below`.
    pub narrow_count: usize,
    /// Viewport width (CSS px) under which the narrow count is used.
    pub narrow_below: f32,
    /// Pairs closer than this are linked.
    pub max_link_distance: f32,
    /// Link alpha at zero distance.
    pub link_dimming: f32,
    pub link_color: Rgba,
    pub link_width: f32,
    /// Each velocity component is drawn from `(-max_axis_speed, max_axis_speed)`.
    pub max_axis_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_alpha: f32,
    pub max_alpha: f32,
    pub palette: Vec<Rgba>,
    /// Quiet period before a resize rebuilds the field.
    pub resize_quiet_ms: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            wide_count: 80,
            narrow_count: 40,
            narrow_below: 600.0,
            max_link_distance: 130.0,
            link_dimming: 0.12,
            link_color: Rgba::rgb(0, 245, 255),
            link_width: 0.6,
            max_axis_speed: 0.2,
            min_radius: 0.4,
            max_radius: 2.2,
            min_alpha: 0.1,
            max_alpha: 0.6,
            palette: vec![
                Rgba::rgb(0, 245, 255),
                Rgba::rgb(0, 255, 136),
                Rgba::rgb(61, 155, 255),
            ],
            resize_quiet_ms: 200,
        }
    }
}

impl FieldConfig {
    /// Particle count for a viewport of the given CSS width.
    pub fn count_for_width(&self, viewport_width: f32) -> usize {
        if viewport_width < self.narrow_below {
            self.narrow_count
        } else {
            self.wide_count
        }
    }

    pub fn resize_quiet(&self) -> Duration {
        Duration::from_millis(self.resize_quiet_ms)
    }

    /// Largest distance a particle can travel in one frame.
    pub fn max_step(&self) -> f32 {
        self.max_axis_speed * std::f32::consts::SQRT_2
    }
}

/// Cursor glow tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Fraction of the remaining gap closed every frame.
    pub responsiveness: f32,
    /// Stretch per pixel of per-frame velocity.
    pub stretch_factor: f32,
    pub max_stretch: f32,
    pub press_scale: f32,
    pub press_transition_ms: u64,
    pub release_transition_ms: u64,
    pub hover_scale: f32,
    pub default_color: Rgba,
    pub accent_color: Rgba,
    /// Rendered size of the glow element in CSS px (used by the preview host).
    pub diameter: f32,
    /// Elements whose hover switches the glow to the accent colour.
    pub interactive_selector: String,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            responsiveness: 0.15,
            stretch_factor: 0.3,
            max_stretch: 0.35,
            press_scale: 0.7,
            press_transition_ms: 150,
            release_transition_ms: 250,
            hover_scale: 1.8,
            default_color: Rgba::rgb(0, 240, 255),
            accent_color: Rgba::rgb(255, 77, 109),
            diameter: 36.0,
            interactive_selector: "a, button, .magnetic".into(),
        }
    }
}

/// Typed headline tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub phrases: Vec<String>,
    pub start_delay_ms: u64,
    pub type_delay_ms: u64,
    pub delete_delay_ms: u64,
    /// Pause with the full phrase shown.
    pub hold_delay_ms: u64,
    /// Pause with the empty line before the next phrase.
    pub next_phrase_delay_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            phrases: vec![
                "Capture The Flag | Cybersecurity".into(),
                "Reverse Engineering | Binary Exploitation".into(),
                "Cryptography | Forensics | Web Hacking".into(),
                "OSINT | Network Analysis | Scripting".into(),
            ],
            start_delay_ms: 1000,
            type_delay_ms: 80,
            delete_delay_ms: 40,
            hold_delay_ms: 2200,
            next_phrase_delay_ms: 500,
        }
    }
}

/// Scroll thresholds for the navbar and back-to-top button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Scroll offset past which the navbar gets `scrolled`.
    pub scrolled_after: f64,
    /// A section becomes current this many px before its top reaches the viewport top.
    pub section_offset: f64,
    /// Scroll offset past which the back-to-top button is shown.
    pub back_to_top_after: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scrolled_after: 40.0,
            section_offset: 90.0,
            back_to_top_after: 300.0,
        }
    }
}

/// Scroll reveal targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selectors: Vec<String>,
    /// Highest `reveal-delay-N` class handed out.
    pub max_stagger: usize,
    pub threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selectors: [
                ".about-text",
                ".about-skills",
                ".member-card",
                ".table-wrap",
                ".contact-blurb",
                ".contact-card",
                ".filter-bar",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_stagger: 3,
            threshold: 0.12,
        }
    }
}

/// Stat counter animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Number of increments to reach the target.
    pub steps: u32,
    pub interval_ms: u64,
    pub threshold: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            steps: 40,
            interval_ms: 35,
            threshold: 0.6,
        }
    }
}

/// Everything the site needs, in one deserializable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub field: FieldConfig,
    pub cursor: CursorConfig,
    pub typing: TypingConfig,
    pub nav: NavConfig,
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
}

impl SiteConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject values the modules cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.field.validate()?;
        self.cursor.validate()?;
        self.counter.validate()
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("field.palette must not be empty".into()));
        }
        if self.max_link_distance <= 0.0 {
            return Err(ConfigError::Invalid("field.max_link_distance must be positive".into()));
        }
        if self.max_axis_speed < 0.0 {
            return Err(ConfigError::Invalid("field.max_axis_speed must not be negative".into()));
        }
        if self.min_radius > self.max_radius || self.min_alpha > self.max_alpha {
            return Err(ConfigError::Invalid("field ranges must have min <= max".into()));
        }
        Ok(())
    }
}

impl CursorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.responsiveness) || self.responsiveness == 0.0 {
            return Err(ConfigError::Invalid("cursor.responsiveness must be in (0, 1]".into()));
        }
        Ok(())
    }
}

impl CounterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::Invalid("counter.steps must be at least 1".into()));
        }
        Ok(())
    }
}
