use scorematch_core::TextObservation;
use scorematch_extract::ScoreExtractor;
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Input for [`ExtractStrategy`].
#[derive(Debug, Clone, Default)]
pub struct ExtractInput {
    pub input: Option<PathBuf>,
    pub text: Option<String>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// One record of the input file.
#[derive(Debug, Deserialize)]
struct TextRecord {
    text_id: i64,
    #[serde(default)]
    text: Option<String>,
}

/// Strategy for extracting score rows from a text file or a single text.
///
/// Rows are written as a JSON array ordered by `(text_id, observation_id)`.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::resolve_extraction_config(input.config.as_deref())?;
        let extractor = ScoreExtractor::new(config)?;

        let rows = match (&input.input, &input.text) {
            (Some(path), _) => {
                let records = read_records(path)?;
                let texts: Vec<Option<String>> =
                    records.iter().map(|record| record.text.clone()).collect();
                let ids: Vec<i64> = records.iter().map(|record| record.text_id).collect();
                info!("Extracting from {} texts", texts.len());
                extractor.extract_scores(&texts, &ids)?
            }
            (None, Some(text)) => extractor.extract_text(text)?,
            (None, None) => anyhow::bail!("Either --input or --text is required"),
        };

        write_rows(&rows, input.output.as_deref())
    }
}

fn read_records(path: &Path) -> anyhow::Result<Vec<TextRecord>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid input {}: {e}", path.display()))
}

fn write_rows(rows: &[TextObservation], output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(rows)?;
    if let Some(path) = output {
        std::fs::write(path, json)?;
        info!("Wrote {} rows to {}", rows.len(), path.display());
    } else {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}")?;
    }
    Ok(())
}
