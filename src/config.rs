//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.calclab.toml` files.

use crate::cli::{Args, Command, OutputFormat};
use anyhow::{Context, Result};
use calclab::report::ChartStyle;
use calclab::simulation::MAX_TRIALS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = ".calclab.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Calculator settings.
    #[serde(default)]
    pub calculator: CalculatorConfig,

    /// Simulation settings.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Calculator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Digits after the decimal point; unset prints the shortest exact form.
    #[serde(default)]
    pub precision: Option<usize>,
}

/// Trial simulation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Trials run when `--trials` is not given.
    #[serde(default = "default_trials")]
    pub default_trials: usize,

    /// Upper bound for the trial count (never above 100000).
    #[serde(default = "default_max_trials")]
    pub max_trials: usize,

    /// Fixed seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_trials: default_trials(),
            max_trials: default_max_trials(),
            seed: None,
        }
    }
}

fn default_trials() -> usize {
    100
}

fn default_max_trials() -> usize {
    MAX_TRIALS
}

/// Bar chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Columns used by the longest bar.
    #[serde(default = "default_chart_width")]
    pub width: usize,

    /// Character the bars are drawn with.
    #[serde(default = "default_fill")]
    pub fill: char,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            fill: default_fill(),
        }
    }
}

fn default_chart_width() -> usize {
    40
}

fn default_fill() -> char {
    '#'
}

impl From<&ChartConfig> for ChartStyle {
    fn from(config: &ChartConfig) -> Self {
        Self {
            width: config.width.max(1),
            fill: config.fill,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the current directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.calclab.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }
        if let Some(precision) = args.precision {
            self.calculator.precision = Some(precision);
        }
        if let Some(width) = args.chart_width {
            self.chart.width = width;
        }

        if let Command::Simulate { seed: Some(seed), .. } = args.command {
            self.simulation.seed = Some(seed);
        }

        self.simulation.max_trials = self.simulation.max_trials.clamp(1, MAX_TRIALS);
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calclab::models::ExperimentKind;

    fn simulate_args(seed: Option<u64>) -> Args {
        Args {
            command: Command::Simulate {
                experiment: ExperimentKind::Coin,
                trials: None,
                seed,
            },
            config: None,
            verbose: false,
            quiet: false,
            format: None,
            output: None,
            precision: None,
            chart_width: None,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.format, OutputFormat::Text);
        assert_eq!(config.simulation.default_trials, 100);
        assert_eq!(config.simulation.max_trials, 100_000);
        assert_eq!(config.chart.width, 40);
        assert_eq!(config.chart.fill, '#');
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true
format = "markdown"

[calculator]
precision = 3

[simulation]
default_trials = 500
seed = 42

[chart]
fill = "="
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.general.format, OutputFormat::Markdown);
        assert_eq!(config.calculator.precision, Some(3));
        assert_eq!(config.simulation.default_trials, 500);
        assert_eq!(config.simulation.max_trials, 100_000);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.chart.width, 40);
        assert_eq!(config.chart.fill, '=');
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.simulation.seed = Some(1);
        config.simulation.max_trials = 5_000_000;

        let mut args = simulate_args(Some(9));
        args.format = Some(OutputFormat::Json);
        args.chart_width = Some(10);
        config.merge_with_args(&args);

        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.simulation.seed, Some(9));
        assert_eq!(config.simulation.max_trials, MAX_TRIALS);
        assert_eq!(config.chart.width, 10);
    }

    #[test]
    fn test_merge_keeps_config_seed() {
        let mut config = Config::default();
        config.simulation.seed = Some(1);
        config.merge_with_args(&simulate_args(None));
        assert_eq!(config.simulation.seed, Some(1));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(CONFIG_FILE), "[chart]\nwidth = 12\n").unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.chart.width, 12);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[chart\nwidth = ").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_chart_style_from_config() {
        let style = ChartStyle::from(&ChartConfig { width: 0, fill: '*' });
        assert_eq!(style.width, 1);
        assert_eq!(style.fill, '*');
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[simulation]"));
        assert!(toml_str.contains("[chart]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.simulation.default_trials, 100);
    }
}
