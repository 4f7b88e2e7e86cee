use crate::error::{DlaError, Result};
use crate::simulation::MIN_LATTICE_LENGTH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to grow: the run's name and the lattice size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Names the output directory and files (non-empty, no whitespace)
    pub run_name: String,
    /// Lattice side length L (> 10)
    pub length: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::new("dla", 201)
    }
}

impl RunSettings {
    pub fn new(run_name: impl Into<String>, length: usize) -> Self {
        Self {
            run_name: run_name.into(),
            length,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.run_name.is_empty() || self.run_name.chars().any(char::is_whitespace) {
            return Err(DlaError::InvalidRunName {
                name: self.run_name.clone(),
            });
        }
        if self.length <= MIN_LATTICE_LENGTH {
            return Err(DlaError::LatticeTooSmall {
                length: self.length,
                min: MIN_LATTICE_LENGTH,
            });
        }
        Ok(())
    }

    /// Number of lattice points (L squared)
    pub fn lattice_points(&self) -> usize {
        self.length * self.length
    }
}

/// Where and what to write once the cluster is grown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Parent of the per-run directory
    pub base_dir: PathBuf,
    /// Write the colormap PNG
    pub write_image: bool,
    /// Write the growth GIF
    pub write_animation: bool,
    /// Remove an existing run directory of the same name instead of failing
    pub replace_existing: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            write_image: true,
            write_animation: false,
            replace_existing: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(RunSettings::default().validate().is_ok());
    }

    #[test]
    fn test_run_name_validation() {
        for name in ["", "my run", "tab\tname", " lead", "trail\n"] {
            let settings = RunSettings::new(name, 50);
            assert_eq!(
                settings.validate(),
                Err(DlaError::InvalidRunName {
                    name: name.to_string()
                })
            );
        }
        assert!(RunSettings::new("run-01_final", 50).validate().is_ok());
    }

    #[test]
    fn test_length_validation() {
        assert_eq!(
            RunSettings::new("run", 10).validate(),
            Err(DlaError::LatticeTooSmall { length: 10, min: 10 })
        );
        assert!(RunSettings::new("run", 11).validate().is_ok());
    }

    #[test]
    fn test_lattice_points() {
        assert_eq!(RunSettings::new("run", 11).lattice_points(), 121);
    }
}
