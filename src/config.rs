use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Everything the loader, the aggregators and the chart layout need.
/// Passed explicitly; nothing here is process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnNames,
    pub analysis: AnalysisConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Config {
    /// Read a JSON config file. Missing keys fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Header names of the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Optional; rows get an empty title when the column is absent.
    pub title: String,
    pub gross: String,
    pub score: String,
    pub year: String,
    pub director: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            title: "title".into(),
            gross: "gross".into(),
            score: "score".into(),
            year: "year".into(),
            director: "director".into(),
        }
    }
}

/// Parameters of the two aggregation pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// First year (inclusive) of the revenue window.
    pub min_year: i32,
    /// How many directors the score ranking keeps.
    pub top_directors: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_year: 2010,
            top_directors: 6,
        }
    }
}

/// Pixel margins around the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 30.0,
            bottom: 60.0,
            left: 80.0,
        }
    }
}

/// Size and styling of a single chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    /// Fraction of each band left empty on both sides of a bar.
    pub band_padding: f64,
    /// Approximate number of ticks on numeric axes.
    pub tick_count: usize,
    /// `#rrggbb` colour of the revenue line.
    pub line_color: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            margin: Margin::default(),
            band_padding: 0.2,
            tick_count: 6,
            line_color: "#4682b4".into(),
        }
    }
}

impl LayoutConfig {
    /// Left edge, right edge, top edge and bottom edge of the plotting area.
    pub fn inner_bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.margin.left,
            (self.width - self.margin.right).max(self.margin.left),
            self.margin.top,
            (self.height - self.margin.bottom).max(self.margin.top),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "analysis": {{ "min_year": 2000 }}, "columns": {{ "gross": "Worldwide Gross" }} }}"#
        )
        .unwrap();

        let cfg = Config::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.analysis.min_year, 2000);
        assert_eq!(cfg.analysis.top_directors, 6);
        assert_eq!(cfg.columns.gross, "Worldwide Gross");
        assert_eq!(cfg.columns.director, "director");
        assert_eq!(cfg.layout, LayoutConfig::default());
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = Config::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn inner_bounds_never_invert() {
        let layout = LayoutConfig {
            width: 50.0,
            height: 40.0,
            ..LayoutConfig::default()
        };
        let (left, right, top, bottom) = layout.inner_bounds();
        assert!(right >= left);
        assert!(bottom >= top);
    }
}
