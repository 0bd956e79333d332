use std::path::{Path, PathBuf};

use colored::Colorize;
use outline_core::{file_stem, OutlineDocument, OutlineExtractor};

use crate::prelude::{eprintln, println, *};

/// Outcome of one input file: the JSON path written, or why there is none.
#[derive(Debug)]
pub struct DocumentReport {
    pub input: PathBuf,
    pub result: std::result::Result<PathBuf, ProcessingError>,
}

/// Regular files in `dir` with a `.pdf` extension (any case), sorted by path.
pub fn list_inputs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            inputs.push(path);
        }
    }

    inputs.sort();
    Ok(inputs)
}

/// Read, decode and analyze one PDF.
pub fn outline_for(
    extractor: &OutlineExtractor,
    path: &Path,
) -> std::result::Result<OutlineDocument, ProcessingError> {
    let bytes = std::fs::read(path).map_err(|source| ProcessingError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let pages = pdf::decode(&bytes)?;
    log::debug!("{}: {} page(s)", path.display(), pages.len());

    Ok(extractor.extract(&pages, &file_stem(path))?)
}

/// Write `<output_dir>/<stem>.json` for one input.
///
/// The JSON is fully serialized before the file is created, so a failure
/// never leaves a partial output behind.
pub fn process_file(
    extractor: &OutlineExtractor,
    path: &Path,
    output_dir: &Path,
) -> std::result::Result<PathBuf, ProcessingError> {
    let document = outline_for(extractor, path)?;
    let json = serde_json::to_string_pretty(&document)?;

    let output = output_dir.join(f!("{}.json", file_stem(path)));
    std::fs::write(&output, json).map_err(|source| ProcessingError::Write {
        path: output.clone(),
        source,
    })?;

    Ok(output)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Process every PDF in `input_dir`, one at a time.
///
/// A failing document is reported and skipped. A missing or empty input
/// directory is not an error.
pub fn run_batch(
    extractor: &OutlineExtractor,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<DocumentReport>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| f!("Failed to create output directory {}", output_dir.display()))?;

    let inputs = match list_inputs(input_dir) {
        Ok(inputs) => inputs,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            println!(
                "{} Input directory '{}' not found.",
                "Error:".red().bold(),
                input_dir.display()
            );
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e).with_context(|| f!("Failed to list {}", input_dir.display()));
        }
    };

    if inputs.is_empty() {
        println!("No PDF files found in '{}'.", input_dir.display());
        return Ok(Vec::new());
    }

    println!(
        "Found {} PDF file(s) in '{}'",
        inputs.len(),
        input_dir.display()
    );

    let mut reports = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = display_name(&input);
        println!("--- Processing file: {} ---", name.bold());

        let result = process_file(extractor, &input, output_dir);
        match &result {
            Ok(output) => println!("Output written to: {}", output.display().to_string().green()),
            Err(e) => println!("{} '{}': {}", "Error processing file".red(), name, e),
        }
        println!("{}", "-".repeat(name.chars().count() + 25));

        reports.push(DocumentReport { input, result });
    }

    Ok(reports)
}

fn summarize(reports: &[DocumentReport]) {
    let failed: Vec<&DocumentReport> = reports.iter().filter(|r| r.result.is_err()).collect();
    let succeeded = reports.len() - failed.len();

    println!();
    println!(
        "All PDF files processed: {} succeeded, {} failed.",
        succeeded.to_string().green(),
        if failed.is_empty() {
            failed.len().to_string().normal()
        } else {
            failed.len().to_string().red()
        }
    );

    for report in failed {
        eprintln!("  {}", report.input.display().to_string().red());
    }
}

pub fn run(global: &crate::Global) -> Result<()> {
    let config = crate::config::load(global.config.as_deref())?;
    if global.verbose {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    let extractor = OutlineExtractor::new(config);
    let reports = run_batch(&extractor, &global.input_dir, &global.output_dir)?;

    if !reports.is_empty() {
        summarize(&reports);
    }

    Ok(())
}

/// `extract <file>`: print one document's outline as JSON.
pub fn extract_one(path: &Path, global: &crate::Global) -> Result<()> {
    let config = crate::config::load(global.config.as_deref())?;
    let extractor = OutlineExtractor::new(config);

    let document = outline_for(&extractor, path).map_err(|e| eyre!(e))?;
    println!("{}", serde_json::to_string_pretty(&document)?);

    if global.verbose {
        eprintln!(
            "{} {} heading(s)",
            document.title.bold(),
            document.outline.len()
        );
    }

    Ok(())
}
