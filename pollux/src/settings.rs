use std::{fs::File, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use crate::{
    error::{Error, Result},
    integrators::IntegratorType,
    materials::bsdfs::MicrofacetDistributionType,
    scene::SceneLoadSettings,
};

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Number of samples accumulated per pixel
    pub iterations: u32,
    /// Bounce budget of camera rays
    pub max_depth: u32,
    /// Antialiasing jitter in pixels, 0 samples pixel centers and 1 the whole pixel
    pub aa_jitter: f32,
    pub integrator: IntegratorType,
    /// Used by materials that don't pick a distribution themselves
    pub default_distribution: MicrofacetDistributionType,
    pub russian_roulette_depth: u32,
    pub seed: u64,
    /// Compact the ray pool after each bounce instead of skipping dead rays
    pub compact_rays: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            iterations: 256,
            max_depth: 8,
            aa_jitter: 1.0,
            integrator: IntegratorType::Mis,
            default_distribution: MicrofacetDistributionType::TrowbridgeReitz,
            russian_roulette_depth: 3,
            seed: 0,
            compact_rays: true,
        }
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    Display,
    EnumString,
    EnumVariantNames,
)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Everything the headless binary needs, loaded from YAML
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InitialSettings {
    pub scene: SceneLoadSettings,
    pub render: RenderSettings,
    /// Timestamped file in the working directory if not set
    pub output: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl InitialSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_reader(file)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
