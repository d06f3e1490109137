//! Run configuration loaded from JSON
//!
//! ```json
//! {
//!   "qaoa": { "depth": 1, "shots": 1024, "n_ancilla": 1, "seed": 7 },
//!   "optimizer": { "epsilon": 0.1, "learning_rate": 0.1, "max_iter": 200 }
//! }
//! ```
//!
//! Missing fields take their defaults.

use std::path::Path;

use qclique_core::{QaoaConfig, QcliqueError, Result};
use serde::{Deserialize, Serialize};

use crate::optimizer::OptimizerConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub qaoa: QaoaConfig,
    pub optimizer: OptimizerConfig,
}

impl RunConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| QcliqueError::InvalidConfig(format!("malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            QcliqueError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.qaoa.validate()?;
        self.optimizer.validate()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| QcliqueError::InvalidConfig(format!("config serialization failed: {}", e)))
    }
}
