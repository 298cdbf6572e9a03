//! Engine configuration (parsed from TOML)
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! seed = 42
//!
//! [population]
//! low = 30
//! medium = 75
//! high = 150
//!
//! [style.palette]
//! primary = "#00ffff"
//!
//! [spark]
//! chance = 0.3
//! ```

use crate::rand::ParticleRng;
use crate::tier::Tier;
use neon_core::{Color, NeonError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One value per performance tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierTable<T> {
    pub low: T,
    pub medium: T,
    pub high: T,
}

impl<T: Copy> TierTable<T> {
    pub fn get(&self, tier: Tier) -> T {
        match tier {
            Tier::Low => self.low,
            Tier::Medium => self.medium,
            Tier::High => self.high,
        }
    }
}

/// The four theme colors particles are painted with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub accent: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Color::from_hex(0x00ffff),
            secondary: Color::from_hex(0xff00ff),
            tertiary: Color::from_hex(0x39ff14),
            accent: Color::from_hex(0x0099ff),
        }
    }
}

impl Palette {
    /// Uniformly pick one of the four colors
    pub fn random(&self, rng: &mut ParticleRng) -> Color {
        let colors = [self.primary, self.secondary, self.tertiary, self.accent];
        rng.pick(&colors).copied().unwrap_or(self.primary)
    }
}

/// Look of spawned particles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleStyle {
    pub palette: Palette,
    /// Default magnetic pull of Energy particles
    pub energy_magnetic_strength: f32,
}

impl Default for ParticleStyle {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            energy_magnetic_strength: 0.1,
        }
    }
}

/// Share of the tier target seeded per ambient kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixConfig {
    pub float: f32,
    pub energy: f32,
    pub circuit: f32,
    pub data: f32,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            float: 0.6,
            energy: 0.2,
            circuit: 0.1,
            data: 0.1,
        }
    }
}

/// Sparks spawned by fast pointer motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkConfig {
    /// Distance between consecutive pointer samples that counts as fast
    pub speed_threshold: f32,
    /// Probability that a fast sample spawns a burst
    pub chance: f32,
    /// Sparks per burst
    pub burst: usize,
    /// Bursts are refused once the population reaches `ceiling_factor * target`
    pub ceiling_factor: f32,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            speed_threshold: 50.0,
            chance: 0.3,
            burst: 3,
            ceiling_factor: 1.5,
        }
    }
}

/// Radial Energy burst spawned by a click
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickConfig {
    pub speed_min: f32,
    pub speed_max: f32,
    pub max_life: f32,
    pub size_min: f32,
    pub size_max: f32,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            speed_min: 2.0,
            speed_max: 5.0,
            max_life: 2.0,
            size_min: 2.0,
            size_max: 6.0,
        }
    }
}

/// Float population top-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Most Float particles added in one tick
    pub max_per_tick: usize,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self { max_per_tick: 5 }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Target live population per tier
    pub population: TierTable<usize>,
    /// Energy particles per click per tier
    pub click_burst: TierTable<usize>,
    pub mix: MixConfig,
    pub style: ParticleStyle,
    pub spark: SparkConfig,
    pub click: ClickConfig,
    pub maintenance: MaintenanceConfig,
    /// PRNG seed; a fixed default is used when absent
    pub seed: Option<u32>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            population: TierTable {
                low: 30,
                medium: 75,
                high: 150,
            },
            click_burst: TierTable {
                low: 5,
                medium: 10,
                high: 15,
            },
            mix: MixConfig::default(),
            style: ParticleStyle::default(),
            spark: SparkConfig::default(),
            click: ClickConfig::default(),
            maintenance: MaintenanceConfig::default(),
            seed: None,
        }
    }
}

impl ParticleConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: ParticleConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Reject values the engine cannot use
    pub fn validate(&self) -> Result<()> {
        let shares = [
            ("mix.float", self.mix.float),
            ("mix.energy", self.mix.energy),
            ("mix.circuit", self.mix.circuit),
            ("mix.data", self.mix.data),
            ("spark.speed_threshold", self.spark.speed_threshold),
            ("spark.ceiling_factor", self.spark.ceiling_factor),
            ("style.energy_magnetic_strength", self.style.energy_magnetic_strength),
        ];
        for (field, value) in shares {
            if !value.is_finite() || value < 0.0 {
                return Err(NeonError::ValidationError(format!(
                    "{field} must be a finite non-negative number, got {value}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.spark.chance) {
            return Err(NeonError::ValidationError(format!(
                "spark.chance must be between 0 and 1, got {}",
                self.spark.chance
            )));
        }

        let ranges = [
            ("click.speed", self.click.speed_min, self.click.speed_max),
            ("click.size", self.click.size_min, self.click.size_max),
        ];
        for (field, min, max) in ranges {
            if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
                return Err(NeonError::ValidationError(format!(
                    "{field} range is invalid: [{min}, {max}]"
                )));
            }
        }

        if !(self.click.max_life.is_finite() && self.click.max_life > 0.0) {
            return Err(NeonError::ValidationError(format!(
                "click.max_life must be positive, got {}",
                self.click.max_life
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let config = ParticleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population.get(Tier::High), 150);
        assert_eq!(config.click_burst.get(Tier::Low), 5);
        let mix = config.mix;
        assert!((mix.float + mix.energy + mix.circuit + mix.data - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config = ParticleConfig::from_toml_str("").unwrap();
        assert_eq!(config, ParticleConfig::default());
    }

    #[test]
    fn parse_partial_overrides() {
        let toml_str = r##"
seed = 7

[population]
low = 10
medium = 20
high = 40

[style.palette]
accent = "#ff8800"

[spark]
chance = 1.0
"##;
        let config = ParticleConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.population.get(Tier::Medium), 20);
        assert_eq!(config.spark.chance, 1.0);
        assert_eq!(config.spark.burst, 3);
        assert_eq!(config.style.palette.accent, Color::from_hex(0xff8800));
        assert_eq!(config.style.palette.primary, Palette::default().primary);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ParticleConfig::from_toml_str("[spark]\nchance = 1.5").is_err());
        assert!(ParticleConfig::from_toml_str("[mix]\nfloat = -0.1").is_err());
        assert!(ParticleConfig::from_toml_str("[click]\nspeed_min = 9.0\nspeed_max = 1.0").is_err());
        assert!(ParticleConfig::from_toml_str("[style.palette]\nprimary = \"teal\"").is_err());
    }

    #[test]
    fn palette_random_is_from_palette() {
        let palette = Palette::default();
        let mut rng = ParticleRng::new(31);
        for _ in 0..50 {
            let c = palette.random(&mut rng);
            assert!([palette.primary, palette.secondary, palette.tertiary, palette.accent].contains(&c));
        }
    }
}
