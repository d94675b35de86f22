use scorematch_extract::{ExtractionConfig, PatternDef};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_DIR_NAME: &str = "scorematch";
pub const CONFIG_FILE_NAME: &str = "config.json";

const CONFIG_TEMPLATE: &str = r#"{
  "extraction": {
    "max_tries_per_pattern": 100,
    "max_repeat": 5,
    "parallel": false,
    "regex_size_limit": 67108864,
    "normalizer": {
      "remove_false_positives": true,
      "convert_roman_numerals": false
    }
  },
  "patterns_file": null
}
"#;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// JSON list of pattern rules replacing the built-in table. Relative
    /// paths are taken from the directory holding the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns_file: Option<PathBuf>,

    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Config {
    /// `~/scorematch`
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR_NAME))
    }

    /// Load `~/scorematch/config.json`.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'scorematch init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read config {}: {e}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Extraction settings with the external pattern table, if any, in
    /// place of the configured one.
    pub fn extraction_config(&self) -> anyhow::Result<ExtractionConfig> {
        let mut extraction = self.extraction.clone();
        if let Some(path) = self.resolved_patterns_file() {
            extraction.patterns = load_patterns(&path)?;
        }
        Ok(extraction)
    }

    #[must_use]
    pub fn resolved_patterns_file(&self) -> Option<PathBuf> {
        let path = self.patterns_file.as_ref()?;
        match &self.base_dir {
            Some(base) if path.is_relative() => Some(base.join(path)),
            _ => Some(path.clone()),
        }
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = Self::write_template(&config_dir)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Adjust the extraction settings if needed");
        println!("   2. Optionally point patterns_file at your own rule table");
        println!("      (start from the output of 'scorematch patterns')");
        println!("   3. Run 'scorematch extract --input texts.json'");
        println!();
        println!("🔧 Configuration options:");
        println!("   - max_tries_per_pattern: matches allowed per rule and text");
        println!("   - max_repeat: interleaved statements recognised when grouping");
        println!("   - parallel: process texts on all cores");
        println!("   - normalizer.convert_roman_numerals: read ' IV ' as ' 4 '");
        println!();
        Ok(())
    }

    /// Write the template into `config_dir`. Never overwrites.
    pub fn write_template(config_dir: &Path) -> anyhow::Result<PathBuf> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;
        Ok(config_path)
    }
}

fn load_patterns(path: &Path) -> anyhow::Result<Vec<PatternDef>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read pattern table {}: {e}", path.display()))?;
    let patterns: Vec<PatternDef> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid pattern table {}: {e}", path.display()))?;
    if patterns.is_empty() {
        anyhow::bail!("Pattern table {} is empty", path.display());
    }

    info!(
        "Loaded {} pattern rules from {}",
        patterns.len(),
        path.display()
    );
    Ok(patterns)
}
