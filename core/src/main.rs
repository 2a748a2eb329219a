use clap::Parser;
use clinifind_core::cli::{Cli, Mode, OutputFormat};
use clinifind_core::{ImagingOrchestrator, LabExtractor, Result, TextReport};
use log::{error, info};
use std::io::Read;
use std::path::Path;
use std::{fs, io, process};

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let text = match read_input(cli.file.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read input: {}", e);
            eprintln!("Error: Failed to read input: {}", e);
            process::exit(1);
        }
    };

    match run(&cli, &text) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn read_input(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(path) => {
            info!("Reading note from {}", path.display());
            fs::read_to_string(path)
        }
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Runs the selected mode and renders its output
fn run(cli: &Cli, text: &str) -> Result<String> {
    if cli.mode == Mode::Labs {
        let labs = LabExtractor::new().extract(text);
        return render(&labs, TextReport::labs(&labs), cli.format);
    }

    let orchestrator = ImagingOrchestrator::from_config(&cli.config()?)?;
    info!(
        "Enabled modalities: {}",
        orchestrator
            .available_modalities()
            .iter()
            .map(|m| m.code())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if let Some(name) = &cli.modality {
        let studies = orchestrator.extract_modality(text, name)?;
        return render(&studies, TextReport::studies(&studies), cli.format);
    }

    match cli.mode {
        Mode::Detect => {
            let detected = orchestrator.detect_modalities(text);
            render(&detected, TextReport::detected(&detected), cli.format)
        }
        Mode::Combined | Mode::Flat => {
            let combined = orchestrator.extract_combined(text, cli.mode == Mode::Combined);
            render(&combined, TextReport::combined(&combined), cli.format)
        }
        Mode::Imaging | Mode::Labs => {
            let report = orchestrator.extract_all(text);
            render(&report, TextReport::imaging(&report), cli.format)
        }
    }
}

fn render<T: serde::Serialize>(value: &T, report: TextReport<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
    }
}
