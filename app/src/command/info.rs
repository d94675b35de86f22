use scorematch_config::Config;
use scorematch_extract::ScoreExtractor;
use tracing::info;

/// Strategy for displaying the effective configuration.
///
/// Prints the extraction settings, where the pattern table comes from and
/// whether it compiles.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::config_dir()?.join(scorematch_config::CONFIG_FILE_NAME);
        let config = if config_path.exists() {
            Config::load_from(&config_path)?
        } else {
            Config::default()
        };

        println!("=== scorematch Configuration ===\n");

        println!("Config File:");
        if config_path.exists() {
            println!("  Path: {}", config_path.display());
        } else {
            println!("  Path: (none, built-in defaults)");
        }
        println!();

        let extraction = config.extraction_config()?;
        println!("Extraction:");
        println!("  Max Tries Per Pattern: {}", extraction.max_tries_per_pattern);
        println!("  Max Repeat: {}", extraction.max_repeat);
        println!("  Parallel: {}", extraction.parallel);
        println!("  Regex Size Limit: {} bytes", extraction.regex_size_limit);
        println!();

        println!("Normalizer:");
        println!(
            "  Remove False Positives: {}",
            extraction.normalizer.remove_false_positives
        );
        println!(
            "  Convert Roman Numerals: {}",
            extraction.normalizer.convert_roman_numerals
        );
        println!();

        println!("Patterns:");
        match config.resolved_patterns_file() {
            Some(path) => println!("  Source: {}", path.display()),
            None => println!("  Source: built-in table"),
        }
        println!("  Rules: {}", extraction.patterns.len());

        info!("Compiling pattern table");
        match ScoreExtractor::new(extraction) {
            Ok(_) => println!("  Status: OK"),
            Err(e) => {
                println!("  Status: Invalid");
                println!("  Error: {e}");
            }
        }

        Ok(())
    }
}
