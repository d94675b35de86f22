use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct PatternsInput {
    pub config: Option<PathBuf>,
}

/// Strategy for printing the active pattern table.
///
/// The output is valid input for `patterns_file`.
#[derive(Debug, Clone, Copy)]
pub struct PatternsStrategy;

impl super::CommandStrategy for PatternsStrategy {
    type Input = PatternsInput;

    fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::resolve_extraction_config(input.config.as_deref())?;
        println!("{}", serde_json::to_string_pretty(&config.patterns)?);
        Ok(())
    }
}
