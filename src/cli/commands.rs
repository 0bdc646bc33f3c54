//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, Write};
use std::path::Path;

use crate::generate::{GenerationReport, Generator, GeneratorConfig};

use super::{CliError, CliResult, ExitCode, ListFormat};

/// Regenerate `output` from the test files in `test_dir`.
pub fn generate_fragment(
    test_dir: &Path,
    output: &Path,
    config: GeneratorConfig,
    list: Option<ListFormat>,
) -> CliResult<ExitCode> {
    let generator = Generator::new(config)?;
    let report = generator.generate_file(test_dir, output)?;

    if let Some(format) = list {
        print_listing(&report, format)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Exit with failure if `output` is not exactly what a regeneration would write. Never writes `output`.
pub fn check_fragment(
    test_dir: &Path,
    output: &Path,
    config: GeneratorConfig,
    list: Option<ListFormat>,
) -> CliResult<ExitCode> {
    let generator = Generator::new(config)?;
    let outcome = generator.check_file(test_dir, output)?;

    if let Some(format) = list {
        print_listing(&outcome.report, format)?;
    }

    if outcome.up_to_date {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::failure(format!(
            "{} is out of date ({} test(s) discovered); rerun without --check to regenerate",
            output.display(),
            outcome.report.test_count()
        )))
    }
}

/// Render the discovered tests in the requested format.
pub fn render_listing(report: &GenerationReport, format: ListFormat) -> CliResult<String> {
    match format {
        ListFormat::Text => Ok(report.to_text()),
        ListFormat::Json => serde_json::to_string_pretty(&report.to_json())
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| CliError::failure(format!("Error serializing test list: {}", e))),
    }
}

fn print_listing(report: &GenerationReport, format: ListFormat) -> CliResult<()> {
    let listing = render_listing(report, format)?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(listing.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| CliError::failure(format!("Error writing test list: {}", e)))
}
