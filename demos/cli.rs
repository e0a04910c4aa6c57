//! Command-line interface for palette_picker
//!
//! Extracts a palette from an image file and prints it as JSON

use palette_picker::{Config, ExtractorOptions, ImageSource, PaletteExtractor};
use std::{env, path::Path, process};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config = Config::default();
    let mut options_path = None;
    let mut image_path_arg = None;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--fallback" => {
                config.fallback = option_value(&args, &mut i);
            }
            "--text-fallback" => {
                config.fallback_text_color = option_value(&args, &mut i);
            }
            "--options" => {
                options_path = Some(option_value(&args, &mut i));
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if image_path_arg.is_none() {
                    image_path_arg = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let image_path_str = match image_path_arg {
        Some(path) => path,
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };

    let options = match options_path {
        Some(path) => match ExtractorOptions::from_json_file(Path::new(&path)) {
            Ok(options) => options,
            Err(error) => {
                eprintln!("Error: Failed to load options from '{}': {}", path, error);
                process::exit(1);
            }
        },
        None => ExtractorOptions::default(),
    };

    let bytes = match std::fs::read(&image_path_str) {
        Ok(bytes) => bytes,
        Err(error) => {
            eprintln!("Error: Cannot read '{}': {}", image_path_str, error);
            process::exit(1);
        }
    };

    let extractor = match PaletteExtractor::new(options) {
        Ok(extractor) => extractor,
        Err(error) => {
            eprintln!("Error: {}", error.user_message());
            process::exit(1);
        }
    };

    match extractor.extract(ImageSource::Encoded(bytes), config).await {
        Ok(palette) => match serde_json::to_string_pretty(&palette) {
            Ok(json) => println!("{}", json),
            Err(error) => {
                eprintln!("Error: Failed to serialize palette: {}", error);
                process::exit(1);
            }
        },
        Err(error) => {
            eprintln!("Extraction failed: {}", error);
            eprintln!("{}", error.user_message());
            process::exit(1);
        }
    }
}

/// Consume the value following an option flag
fn option_value(args: &[String], i: &mut usize) -> String {
    if *i + 1 >= args.len() {
        eprintln!("Error: {} requires a value", args[*i]);
        process::exit(1);
    }
    *i += 1;
    args[*i].clone()
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_path>", program_name);
    eprintln!();
    eprintln!("Extract a color palette from an image file.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --fallback <HEX>        Color for fields that cannot be derived (default: #000000)");
    eprintln!("  --text-fallback <HEX>   Text color when no legible choice exists (default: #ffffff)");
    eprintln!("  --options <FILE>        Load extractor options from a JSON file");
    eprintln!("  --help, -h              Show this help message");
    eprintln!();
    eprintln!("Set RUST_LOG=palette_picker=debug for extraction details.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} cover.jpg", program_name);
    eprintln!("  {} --fallback '#222222' --text-fallback '#eeeeee' cover.png", program_name);
}
