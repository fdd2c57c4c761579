//! Pipeline configuration.
//!
//! The upload page shipped in a few near-identical flavours: a 200px
//! thumbnail without names, and a fixed 600×400 resample with CSS names.
//! Both are presets of [`PaletteConfig`].
//!
//! ```no_run
//! use dominant_colors_wasm::PaletteConfig;
//! use std::path::Path;
//!
//! let config = PaletteConfig::from_json_file(Path::new("palette.json"))?;
//! let named = PaletteConfig::named();
//! # Ok::<(), dominant_colors_wasm::PaletteError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PaletteError, Result};
use crate::extract::{
    ClusterParams, DEFAULT_CONVERGENCE, DEFAULT_MAX_ITERATIONS, DEFAULT_PALETTE_SIZE, DEFAULT_SEED,
};
use crate::preprocess::{ResizeFilter, ResizeTarget};

/// Every knob of one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Number of clusters in the palette
    pub palette_size: usize,

    /// Preprocessing target dimensions
    pub resize: ResizeTarget,

    /// Resampling filter used when resizing
    pub filter: ResizeFilter,

    /// Seed for k-means initialisation
    pub seed: u64,

    /// Annotate each swatch with its nearest CSS color name
    pub enable_naming: bool,

    /// Upper bound on k-means iterations
    pub max_iterations: usize,

    /// k-means stops once its score drops below this
    pub convergence: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self::thumbnail()
    }
}

impl PaletteConfig {
    /// 200px thumbnail, hex and RGB only.
    pub fn thumbnail() -> Self {
        Self {
            palette_size: DEFAULT_PALETTE_SIZE,
            resize: ResizeTarget::Thumbnail { max_dimension: 200 },
            filter: ResizeFilter::Nearest,
            seed: DEFAULT_SEED,
            enable_naming: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence: DEFAULT_CONVERGENCE,
        }
    }

    /// Fixed 600×400 resample with color names.
    pub fn named() -> Self {
        Self {
            resize: ResizeTarget::Exact {
                width: 600,
                height: 400,
            },
            enable_naming: true,
            ..Self::thumbnail()
        }
    }

    pub fn cluster_params(&self) -> ClusterParams {
        ClusterParams {
            k: self.palette_size,
            seed: self.seed,
            max_iterations: self.max_iterations,
            convergence: self.convergence,
        }
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PaletteError::config(format!("cannot read {}", path.display()), e))?;
        serde_json::from_str(&content)
            .map_err(|e| PaletteError::config(format!("cannot parse {}", path.display()), e))
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PaletteError::config("cannot serialize configuration", e))?;
        std::fs::write(path, json)
            .map_err(|e| PaletteError::config(format!("cannot write {}", path.display()), e))
    }
}
