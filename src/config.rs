//! Configuration of the Cosmos spawn facade.

use crate::cosmos::{
    ParticleEffectPrototype, PoolTextPrototype, ProjectilePrototype, RockPrototype, MAX_SEGMENTS,
};
use crate::GrowthPolicy;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.ron` or `.toml` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => {
                let contents = std::fs::read_to_string(path)?;
                ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            Some("toml") => {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Two prototypes of the same category share a name
    #[error("Duplicate {kind} prototype: {name}")]
    DuplicatePrototype {
        /// Category of the prototype
        kind: &'static str,
        /// Name used twice
        name: String,
    },

    /// A prototype holds values no entity can be built from
    #[error("Invalid {kind} prototype: {reason}")]
    InvalidPrototype {
        /// Category of the prototype
        kind: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Pools built by [`CosmosPools::from_config`](crate::cosmos::CosmosPools::from_config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmosPoolsConfig {
    /// Inactive entities created up front in every pool.
    pub initial_count: usize,
    /// Growth policy shared by every pool.
    pub growth: GrowthPolicy,
    /// Seed of the generator used for rock outlines.
    pub seed: u64,
    /// Projectile prototype used by default projectile requests.
    pub default_projectile: Option<String>,
    /// Projectile prototypes, one pool each.
    pub projectiles: Vec<ProjectilePrototype>,
    /// Particle effect prototypes, one pool each.
    pub particle_effects: Vec<ParticleEffectPrototype>,
    /// Rock prototype; no rock pool without it.
    pub rock: Option<RockPrototype>,
    /// Floating text prototype; no text pool without it.
    pub pool_text: Option<PoolTextPrototype>,
}

impl Default for CosmosPoolsConfig {
    fn default() -> Self {
        CosmosPoolsConfig {
            initial_count: 1,
            growth: GrowthPolicy::Unbounded,
            seed: 0,
            default_projectile: None,
            projectiles: Vec::new(),
            particle_effects: Vec::new(),
            rock: None,
            pool_text: None,
        }
    }
}

impl Config for CosmosPoolsConfig {}

impl CosmosPoolsConfig {
    /// Loads and validates a `.ron` or `.toml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects prototype names used twice within a category, and rock
    /// prototypes with unusable radius or segment bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        unique_names("projectile", self.projectiles.iter().map(|p| p.name.as_str()))?;
        unique_names(
            "particle effect",
            self.particle_effects.iter().map(|p| p.name.as_str()),
        )?;
        match &self.rock {
            Some(rock) => validate_rock(rock),
            None => Ok(()),
        }
    }
}

fn validate_rock(rock: &RockPrototype) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidPrototype { kind: "rock", reason };
    let radius = rock.radius;
    if !radius.min.is_finite() || !radius.max.is_finite() {
        return Err(invalid(format!("radius bounds must be finite, got {radius:?}")));
    }
    if radius.min < 0.0 || radius.min > radius.max {
        return Err(invalid(format!("radius bounds must satisfy 0 <= min <= max, got {radius:?}")));
    }
    if rock.segments.max > MAX_SEGMENTS {
        return Err(invalid(format!(
            "at most {MAX_SEGMENTS} segments, got {}",
            rock.segments.max
        )));
    }
    Ok(())
}

fn unique_names<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ConfigError::DuplicatePrototype {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
