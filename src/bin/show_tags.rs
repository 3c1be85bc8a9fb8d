//! Print the tags of MP3 and M4A files.
//!
//! Usage:
//!     show_tags FILE...

use std::env;
use std::process;

use albumtag::cli::file_label;
use albumtag::field_extractor::{basic_track_data, track_summary};
use albumtag::tag_adapter::{self, truncate_for_report};

fn main() {
    let files: Vec<String> = env::args().skip(1).collect();
    if files.is_empty() || files.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: show_tags FILE...");
        process::exit(if files.is_empty() { 1 } else { 0 });
    }

    let mut failed = false;
    for file in &files {
        let path = std::path::Path::new(file);
        let tags = match tag_adapter::read(path) {
            Ok(tags) => tags,
            Err(e) => {
                eprintln!("{}: {}", file, e);
                failed = true;
                continue;
            }
        };

        println!("{} [{}]", file_label(path), tags.format().name());
        let summary = track_summary(&tags);
        if !summary.is_empty() {
            println!("  {}", summary);
        }
        if tags.is_empty() {
            println!("  (no tags)");
        }
        for (key, value) in tags.entries() {
            println!("  ${}$\t{}", key, truncate_for_report(&value));
        }

        let data = basic_track_data(&tags);
        if let Some(track) = data.track {
            match data.total_tracks {
                Some(total) => println!("  track {} of {}", track, total),
                None => println!("  track {}", track),
            }
        }
        println!();
    }

    if failed {
        process::exit(1);
    }
}
