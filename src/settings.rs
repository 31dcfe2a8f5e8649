use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::binning::interval::MAX_NUMBER_OF_BINS;
use crate::error::{BinningError, Result};

/// Default number of bins.
pub const DEFAULT_NUMBER_OF_BINS: i64 = 10;

/// User-facing configuration of the binner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinnerSettings {
    #[serde(default = "default_number_of_bins")]
    pub number_of_bins: i64,
    /// Numeric column to bin.
    #[serde(default)]
    pub column_name: String,
}

fn default_number_of_bins() -> i64 {
    DEFAULT_NUMBER_OF_BINS
}

impl Default for BinnerSettings {
    fn default() -> Self {
        Self {
            number_of_bins: DEFAULT_NUMBER_OF_BINS,
            column_name: String::new(),
        }
    }
}

impl BinnerSettings {
    pub fn new(column_name: impl Into<String>, number_of_bins: i64) -> Self {
        Self {
            number_of_bins,
            column_name: column_name.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_NUMBER_OF_BINS).contains(&self.number_of_bins) {
            return Err(BinningError::InvalidBinCount(self.number_of_bins));
        }
        Ok(())
    }

    /// Bin count as an index type. Only meaningful after [`validate`](Self::validate).
    pub fn bin_count(&self) -> usize {
        self.number_of_bins.max(1) as usize
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Load and validate settings; invalid content is reported as corrupt.
    pub fn load_from(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let settings: BinnerSettings = serde_json::from_reader(reader)
            .map_err(|e| BinningError::SettingsCorrupt(format!("{}: {e}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_ten_bins() {
        let settings = BinnerSettings::default();
        assert_eq!(settings.number_of_bins, 10);
        assert!(settings.column_name.is_empty());

        let parsed: BinnerSettings = serde_json::from_str(r#"{"columnName": "age"}"#).unwrap();
        assert_eq!(parsed, BinnerSettings::new("age", 10));
    }

    #[test]
    fn rejects_non_positive_bin_count() {
        assert!(BinnerSettings::new("x", 1).validate().is_ok());
        assert!(matches!(
            BinnerSettings::new("x", 0).validate(),
            Err(BinningError::InvalidBinCount(0))
        ));
    }

    #[test]
    fn rejects_bin_count_above_i32_max() {
        assert!(BinnerSettings::new("x", i32::MAX as i64).validate().is_ok());
        assert!(matches!(
            BinnerSettings::new("x", i32::MAX as i64 + 1).validate(),
            Err(BinningError::InvalidBinCount(_))
        ));
        assert!(matches!(
            BinnerSettings::new("x", i64::MAX).validate(),
            Err(BinningError::InvalidBinCount(i64::MAX))
        ));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = BinnerSettings::new("temperature", 7);
        settings.save_to(&path).unwrap();
        assert_eq!(BinnerSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn load_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"numberOfBins": -3, "columnName": "t"}"#).unwrap();
        assert!(matches!(
            BinnerSettings::load_from(&path),
            Err(BinningError::InvalidBinCount(-3))
        ));

        std::fs::write(&path, r#"{"numberOfBins": "many"}"#).unwrap();
        assert!(matches!(
            BinnerSettings::load_from(&path),
            Err(BinningError::SettingsCorrupt(_))
        ));
    }
}
