//! stencil's main application entry point and orchestration logic.
//! Handles command-line argument parsing and coordinates the generation
//! run: load template, evaluate settings, enumerate, resolve, write.

use std::io::Read;
use std::path::{Path, PathBuf};

use stencil::{
    cli::{get_args, Args},
    config::get_settings,
    error::{default_error_handler, Error, Result},
    ignore::parse_stencilignore_file,
    loader::load_template,
    parser::Parser,
    processor::Processor,
    prompt::DialoguerPrompter,
    strategy::UuidGenerator,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Ensures the output directory is safe to write to.
///
/// # Errors
/// * Returns `Error::OutputDirectoryExistsError` if the directory exists
///   and force is false
pub fn get_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

/// Reads preloaded answers as JSON from stdin when requested.
fn load_preloaded_answers(from_stdin: bool) -> Result<serde_json::Value> {
    if !from_stdin {
        return Ok(serde_json::Value::Null);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(serde_json::from_str(buffer.trim()).unwrap_or(serde_json::Value::Null))
}

/// Main application logic execution.
///
/// # Flow
/// 1. Validates the output directory and loads the template source
/// 2. Loads and evaluates the descriptor into normalized settings
/// 3. Enumerates glob specs into virtual entries
/// 4. Resolves paths, loads content, resolves contents
/// 5. Reports unused-key warnings and leftover-token advisories
/// 6. Writes the output tree and sweeps empty directories
fn run(args: Args) -> Result<()> {
    let prompt = DialoguerPrompter::new();

    let output_root = get_output_dir(args.output_dir, args.force)?;
    let template_root = load_template(&prompt, args.template, args.skip_overwrite_check)?;

    let preloaded = load_preloaded_answers(args.stdin)?;
    let settings = get_settings(&template_root, &prompt, &preloaded)?;

    let ignored = parse_stencilignore_file(&template_root)?;
    let processor = Processor::new(&settings, &template_root, &output_root, &ignored);
    let mut parser = Parser::new(&settings, Box::new(UuidGenerator));

    let entries = processor.enumerate()?;

    // Metadata-phase counting pass, before content exists.
    parser.count_occurrences(&entries);

    let entries = parser.resolve_paths(entries)?;
    let entries = processor.load_contents(entries)?;

    // Content-phase counting pass; zero-tally keys are warned about now,
    // before resolution consumes their directives.
    parser.count_occurrences(&entries);
    parser.warn_unused();

    let entries = parser.resolve_contents(entries)?;

    let leftovers = parser.unaccounted(&entries);
    parser.warn_unaccounted(&leftovers);

    processor.write(&entries)?;
    processor.remove_empty_dirs()?;

    for (provider, ids) in &settings.plugins {
        log::info!("Plugins declared for '{}': {}.", provider, ids.join(", "));
    }

    println!("Template generation completed successfully in {}.", output_root.display());
    Ok(())
}
