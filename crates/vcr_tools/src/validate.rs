//! Scenario validation utilities.

use std::path::{Path, PathBuf};

use vcr_core::battle::Battle;
use vcr_core::types::Playability;

use crate::batch::scenario_files;
use crate::scenario::{Scenario, ScenarioError};

/// Load a scenario and classify its battle without playing it.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the record is rejected.
pub fn validate_scenario(path: &Path) -> Result<Playability, ScenarioError> {
    let scenario = Scenario::load(path)?;
    let battle = scenario.build()?;
    Ok(battle.playability(&scenario.context()))
}

/// Validate one scenario file, or every scenario file in a directory.
///
/// # Errors
///
/// Returns an error if `path` is a directory that cannot be listed.
pub fn validate_path(
    path: &Path,
) -> std::io::Result<Vec<(PathBuf, Result<Playability, ScenarioError>)>> {
    let files = if path.is_dir() {
        scenario_files(path)?
    } else {
        vec![path.to_path_buf()]
    };
    Ok(files
        .into_iter()
        .map(|file| {
            let result = validate_scenario(&file);
            (file, result)
        })
        .collect())
}
