//! Render an operating license from a JSON record.
//!
//! Usage:
//!   render_license --record record.json
//!   render_license --record record.json --out license.pdf --resolution 482 --certificate 5531 --year 2025
//!   render_license --record record.json --config config.json --assets ./assets --logo logo.png --seal seal.png
//!
//! Set `RUST_LOG=debug` (or pass `--verbose`) for per-stage progress.

use license_press::license::{FileAssetLoader, FixedNumbers, NumberSource, RandomNumbers, RenderAssets};
use license_press::notify::{LogNotifier, NotificationEvent, Notifier};
use license_press::{Error, LicenseRecord, LicenseRenderer, RenderConfig, Result};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Default)]
struct CliOptions {
    record: Option<PathBuf>,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    resolution: Option<u32>,
    certificate: Option<u32>,
    year: Option<i32>,
    logo: Option<String>,
    seal: Option<String>,
    assets: Option<PathBuf>,
    webhook: Option<String>,
    verbose: bool,
}

impl CliOptions {
    fn from_args() -> std::result::Result<Self, String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut options = Self::default();

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            let mut value = || {
                i += 1;
                args.get(i).cloned().ok_or_else(|| format!("{} needs a value", flag))
            };
            match flag {
                "--record" => options.record = Some(PathBuf::from(value()?)),
                "--config" => options.config = Some(PathBuf::from(value()?)),
                "--out" | "-o" => options.out = Some(PathBuf::from(value()?)),
                "--resolution" => options.resolution = Some(parse_number(flag, &value()?)?),
                "--certificate" => options.certificate = Some(parse_number(flag, &value()?)?),
                "--year" => options.year = Some(parse_number(flag, &value()?)?),
                "--logo" => options.logo = Some(value()?),
                "--seal" => options.seal = Some(value()?),
                "--assets" => options.assets = Some(PathBuf::from(value()?)),
                "--webhook" => options.webhook = Some(value()?),
                "--verbose" | "-v" => options.verbose = true,
                "--help" | "-h" => return Err(usage()),
                other => return Err(format!("unknown argument '{}'\n\n{}", other, usage())),
            }
            i += 1;
        }

        if options.record.is_none() {
            return Err(usage());
        }
        Ok(options)
    }

    /// Injected numbers when all of them are given, random otherwise.
    fn number_source(&self) -> std::result::Result<Box<dyn NumberSource>, String> {
        match (self.resolution, self.certificate, self.year) {
            (Some(resolution), Some(certificate), Some(year)) => {
                Ok(Box::new(FixedNumbers::new(resolution, certificate, year)))
            },
            (None, None, None) => Ok(Box::new(RandomNumbers)),
            _ => Err("--resolution, --certificate and --year must be given together".to_string()),
        }
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> std::result::Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, value))
}

fn usage() -> String {
    "Usage: render_license --record <record.json> [--config <config.json>] [--out <file.pdf>]\n\
     \x20      [--resolution N --certificate N --year Y] [--assets DIR] [--logo REF] [--seal REF]\n\
     \x20      [--webhook URL] [--verbose]"
        .to_string()
}

fn notifier(webhook: Option<&str>) -> Box<dyn Notifier> {
    match webhook {
        #[cfg(feature = "webhook")]
        Some(url) => Box::new(license_press::notify::WebhookNotifier::new(url)),
        #[cfg(not(feature = "webhook"))]
        Some(url) => {
            log::warn!("Built without the 'webhook' feature; logging events instead of posting to {}", url);
            Box::new(LogNotifier)
        },
        None => Box::new(LogNotifier),
    }
}

fn run(options: &CliOptions, numbers: Box<dyn NumberSource>) -> Result<()> {
    let record_path = options
        .record
        .as_ref()
        .ok_or_else(|| Error::Rendering("no record given".to_string()))?;
    let record: LicenseRecord = serde_json::from_str(&std::fs::read_to_string(record_path)?)?;

    let config = match &options.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };

    let assets = RenderAssets {
        logo: options.logo.clone(),
        seal: options.seal.clone(),
    };
    let base_dir = options.assets.clone().unwrap_or_else(|| PathBuf::from("."));

    let renderer = LicenseRenderer::new(config)
        .with_numbers(numbers)
        .with_assets(assets, FileAssetLoader::new(base_dir));
    let document = renderer.render(&record)?;

    let out = options
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(document.file_name()));
    document.save(&out)?;
    println!("Wrote {} ({} bytes)", out.display(), document.len());

    let notifier = notifier(options.webhook.as_deref());
    notifier.notify(NotificationEvent::license_rendered(
        &record.file_number,
        document.file_name(),
        document.len(),
    ));
    notifier.flush();
    Ok(())
}

fn main() -> ExitCode {
    let options = match CliOptions::from_args() {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        },
    };

    let mut logger = env_logger::Builder::from_default_env();
    if options.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let numbers = match options.number_source() {
        Ok(numbers) => numbers,
        Err(message) => {
            eprintln!("Error: {}", message);
            return ExitCode::FAILURE;
        },
    };

    match run(&options, numbers) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
