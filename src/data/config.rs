use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::data::table::TableLayout;
use crate::error::Result;
use crate::milp::DietRules;
use crate::planner::Tolerances;

/// Everything a run can be configured with, loadable from JSON.
///
/// Missing fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub rules: DietRules,
    pub tolerances: Tolerances,
    pub layout: TableLayout,
    pub solve_timeout_secs: Option<u64>,
}

impl OptimizerConfig {
    pub fn solve_timeout(&self) -> Option<Duration> {
        self.solve_timeout_secs.map(Duration::from_secs)
    }
}

/// Load configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<OptimizerConfig> {
    let content = fs::read_to_string(path)?;
    let config: OptimizerConfig = serde_json::from_str(&content)?;
    config.rules.validate()?;
    Ok(config)
}

/// Save configuration as pretty JSON.
pub fn save_config<P: AsRef<Path>>(path: P, config: &OptimizerConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}
