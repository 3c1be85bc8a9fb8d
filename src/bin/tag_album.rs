//! Tag a folder of album tracks from the iTunes store.
//!
//! Reads the first readable file's tags to build a search guess, lets the user pick
//! an album, aligns the files with the album's track listing in argument
//! order and writes the metadata and cover to every file.
//!
//! Usage:
//!     tag_album [--write] [--clean] [--country CC] FILE...

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use log::warn;

use albumtag::cli::{self, file_label, init_logging, read_line, run_search};
use albumtag::field_extractor::{basic_track_data, file_name_guess, guess_and_info, track_summary};
use albumtag::matcher::{align, MatchSession};
use albumtag::tag_adapter;
use albumtag::{cover_cache, write_album, Config, Error, ItunesCatalog, SearchMode, WriteOptions};

fn print_usage() {
    println!("Tag album tracks with metadata from the iTunes store");
    println!();
    println!("Usage: tag_album [OPTIONS] FILE...");
    println!();
    println!("Arguments:");
    println!("  FILE                     MP3 or M4A files, in track order");
    println!();
    println!("Options:");
    println!("  -w, --write              Save changes (default: dry run, report only)");
    println!("  -c, --clean              Remove existing tags before writing");
    println!("  --country <CC>           Two-letter store code (default: us)");
    println!("  --artwork-size <PX>      Cover size to request (default: 600)");
    println!("  --refresh-cover          Download the cover even if folder.jpg exists");
    println!("  --show-saved-defaults    Show saved default configuration and exit");
    println!("  --save-defaults          Save current command-line options as defaults");
    println!("  -v, --verbose            Debug logging");
    println!("  -h, --help               Show this help message");
    println!();
    println!("Configuration:");
    println!("  Defaults can be saved to ~/.state/albumtag/defaults.toml using --save-defaults.");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut cmdline_config = Config::new();
    let mut write = false;
    let mut verbose = false;
    let mut save_defaults = false;
    let mut files: Vec<PathBuf> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--write" | "-w" => write = true,
            "--clean" | "-c" => cmdline_config.clean = Some(true),
            "--refresh-cover" => cmdline_config.refresh_cover = Some(true),
            "--verbose" | "-v" => verbose = true,
            "--save-defaults" => save_defaults = true,
            "--country" => {
                if i + 1 < args.len() {
                    cmdline_config.country = Some(args[i + 1].to_lowercase());
                    i += 1;
                }
            }
            "--artwork-size" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse::<u32>() {
                        Ok(size) if size > 0 => cmdline_config.artwork_size = Some(size),
                        _ => {
                            eprintln!("Error: Invalid artwork size: {}", args[i + 1]);
                            process::exit(1);
                        }
                    }
                    i += 1;
                }
            }
            "--show-saved-defaults" => {
                match Config::load() {
                    Ok(config) => config.print("Saved configuration"),
                    Err(e) => eprintln!("Error loading defaults: {}", e),
                }
                process::exit(0);
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

    init_logging(verbose);

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring saved defaults: {}", e);
        Config::new()
    });
    config.merge(&cmdline_config);

    if save_defaults {
        match config.save() {
            Ok(()) => {
                if let Ok(path) = Config::get_config_path() {
                    println!("Defaults saved to {:?}", path);
                }
                config.print("Saved configuration");
                process::exit(0);
            }
            Err(e) => {
                eprintln!("Error saving defaults: {}", e);
                process::exit(1);
            }
        }
    }

    if files.is_empty() {
        print_usage();
        process::exit(1);
    }

    match run(&files, &config, write) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(files: &[PathBuf], config: &Config, write: bool) -> albumtag::Result<()> {
    let options = WriteOptions {
        write,
        clean: config.clean.unwrap_or(false),
    };

    // ── Local metadata ───────────────────────────────────────────────────
    println!("{} file(s):", files.len());
    for file in files {
        println!(" * {}", file_label(file));
    }
    println!();

    let first = &files[0];
    let (guess_index, first_tags) = tag_adapter::read_first_or_empty(files);
    let (summary, guess) = guess_and_info(&first_tags, SearchMode::Album, files.len());
    let guess = if guess.trim().is_empty() {
        file_name_guess(&files[guess_index], SearchMode::Album)
    } else {
        guess
    };

    // ── Search and select ────────────────────────────────────────────────
    let catalog = ItunesCatalog::new(config.artwork_size());
    let fallbacks = config.fallback_countries();
    let mut session = MatchSession::new(&catalog, SearchMode::Album, basic_track_data(&first_tags))
        .with_locale(&config.country())
        .with_fallback_locales(&fallbacks);

    if !run_search(&mut session, &guess, &summary)? {
        println!("Canceled.");
        return Ok(());
    }

    let album = match session.selected_album() {
        Some(album) => album.clone(),
        None => return Err(Error::InvalidState(session.state().to_string())),
    };
    let listing = session.resolve_tracks()?;
    if listing.fell_back {
        println!("Using track listing from the [{}] store", listing.locale);
    } else if !listing.complete {
        println!(
            "!!! Store lists {} of {} tracks",
            listing.tracks.len(),
            album.total_tracks
        );
    }

    // ── Compare ──────────────────────────────────────────────────────────
    let alignment = align(files.len(), &listing.tracks);
    println!();
    println!("{} - {} ({})", album.artist, album.name, album.release_date);
    if alignment.is_mismatch() {
        println!(
            "!!! Found {} files and {} tracks. Files and tracks are paired in order.",
            alignment.file_count, alignment.track_count
        );
    }
    for &(file_index, track_index) in &alignment.pairs {
        let track = &listing.tracks[track_index];
        println!("File:   {}", local_label(&files[file_index]));
        println!("{}", cli::remote_track_line(track, album.total_tracks));
    }
    for file_index in alignment.unmatched_files() {
        println!("File:   {} (no track)", local_label(&files[file_index]));
    }
    for track_index in alignment.unused_tracks() {
        let track = &listing.tracks[track_index];
        println!("iTunes: ({:02}) {} (no file)", track.track_number, track.name);
    }
    println!();

    if write {
        let answer = read_line("Accept [Enter] or [q] to exit: ")?;
        if !answer.is_empty() {
            println!("Canceled.");
            return Ok(());
        }
    }

    // ── Cover and write ──────────────────────────────────────────────────
    let dir = match first.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let cover_file = config.cover_file();
    let artwork = if write {
        let refresh = config.refresh_cover.unwrap_or(false);
        match cover_cache::load_or_fetch(dir, &cover_file, refresh, || session.fetch_artwork()) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("No cover: {}", e);
                None
            }
        }
    } else {
        cover_cache::load(dir, &cover_file)
    };

    let report = write_album(files, &album, &listing.tracks, artwork.as_deref(), options);
    cli::print_write_report(&report);

    let failures = report.failures().count();
    if !write {
        println!();
        println!("Dry run, nothing saved. Use --write to save.");
    }
    if failures > 0 {
        println!("{} file(s) failed", failures);
    }
    Ok(())
}

fn local_label(path: &Path) -> String {
    let summary = tag_adapter::read(path)
        .map(|tags| track_summary(&tags))
        .unwrap_or_default();
    if summary.is_empty() {
        file_label(path)
    } else {
        summary
    }
}
