//! Tag a single song from the iTunes store.
//!
//! Usage:
//!     tag_song [--write] [--clean] [--country CC] FILE

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use log::warn;

use albumtag::cli::{self, file_label, init_logging, read_line, run_search};
use albumtag::field_extractor::{basic_track_data, file_name_guess, guess_and_info};
use albumtag::matcher::MatchSession;
use albumtag::tag_adapter;
use albumtag::tag_writer::{write_song, FileOutcome};
use albumtag::{Config, Error, ItunesCatalog, SearchMode, WriteOptions};

fn print_usage() {
    println!("Tag a single song with metadata from the iTunes store");
    println!();
    println!("Usage: tag_song [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  -w, --write              Save changes (default: dry run, report only)");
    println!("  -c, --clean              Remove existing tags before writing");
    println!("  --country <CC>           Two-letter store code (default: us)");
    println!("  --no-artwork             Do not embed a cover");
    println!("  -v, --verbose            Debug logging");
    println!("  -h, --help               Show this help message");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut cmdline_config = Config::new();
    let mut write = false;
    let mut verbose = false;
    let mut artwork = true;
    let mut files: Vec<PathBuf> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--write" | "-w" => write = true,
            "--clean" | "-c" => cmdline_config.clean = Some(true),
            "--no-artwork" => artwork = false,
            "--verbose" | "-v" => verbose = true,
            "--country" => {
                if i + 1 < args.len() {
                    cmdline_config.country = Some(args[i + 1].to_lowercase());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            arg if !arg.starts_with('-') => files.push(PathBuf::from(arg)),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if files.len() != 1 {
        eprintln!("Error: expected exactly one file");
        print_usage();
        process::exit(1);
    }

    init_logging(verbose);

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring saved defaults: {}", e);
        Config::new()
    });
    config.merge(&cmdline_config);

    if let Err(e) = run(&files[0], &config, write, artwork) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(path: &Path, config: &Config, write: bool, with_artwork: bool) -> albumtag::Result<()> {
    let options = WriteOptions {
        write,
        clean: config.clean.unwrap_or(false),
    };

    let tags = tag_adapter::read(path)?;
    let (summary, guess) = guess_and_info(&tags, SearchMode::Song, 1);
    let guess = if guess.trim().is_empty() {
        file_name_guess(path, SearchMode::Song)
    } else {
        guess
    };

    println!(" * {}", file_label(path));

    let catalog = ItunesCatalog::new(config.artwork_size());
    let mut session = MatchSession::new(&catalog, SearchMode::Song, basic_track_data(&tags))
        .with_locale(&config.country());

    if !run_search(&mut session, &guess, &summary)? {
        println!("Canceled.");
        return Ok(());
    }

    let song = match session.selected_song() {
        Some(song) => song.clone(),
        None => return Err(Error::InvalidState(session.state().to_string())),
    };

    println!();
    println!("File:   {}", if summary.is_empty() { file_label(path) } else { summary });
    println!(
        "iTunes: ({:02}/{:02}) {} - {} ({})",
        song.track, song.total_tracks, song.artist, song.name, song.album
    );

    if write {
        let answer = read_line("Accept [Enter] or [q] to exit: ")?;
        if !answer.is_empty() {
            println!("Canceled.");
            return Ok(());
        }
    }

    let artwork = if with_artwork && write {
        match session.fetch_artwork() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("No cover: {}", e);
                None
            }
        }
    } else {
        None
    };

    let outcome = write_song(path, &song, artwork.as_deref(), options);
    match &outcome {
        FileOutcome::Written(report) => {
            cli::print_file_report(report);
            if let Some(name) = &report.rename {
                println!();
                println!("Suggested name: {}", name);
            }
        }
        FileOutcome::Failed { error, .. } => {
            println!(" * {} - Failed: {}", file_label(path), error);
        }
    }
    if !write {
        println!();
        println!("Dry run, nothing saved. Use --write to save.");
    }
    Ok(())
}
