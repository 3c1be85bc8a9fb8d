//! Terminal glue shared by the binaries: prompts, the search loop and
//! report printing.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::catalog::{Catalog, RemoteTrack};
use crate::error::{Error, Result};
use crate::matcher::{AnnotatedCandidate, Candidate, MatchSession, SessionState};
use crate::tag_writer::{FileOutcome, FileReport, WriteReport};

/// Initialise `colog`; `verbose` enables debug output.
pub fn init_logging(verbose: bool) {
    let mut clog = colog::default_builder();
    clog.filter(
        None,
        if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        },
    );
    clog.init();
}

/// Print `prompt` and read one trimmed line.  End of input reads as `q`.
pub fn read_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        println!();
        return Ok("q".to_string());
    }
    Ok(line.trim().to_string())
}

fn is_locale_command(input: &str) -> bool {
    input.eq_ignore_ascii_case("l")
}

fn prompt_locale<C: Catalog + ?Sized>(session: &mut MatchSession<'_, C>) -> Result<()> {
    let code = read_line("Type two-letter code: (e.g. US) ")?;
    match session.change_locale(&code) {
        Ok(()) => println!("Country changed. Search again:"),
        Err(Error::AmbiguousInput(msg)) => println!("{}", msg),
        Err(e) => return Err(e),
    }
    Ok(())
}

fn mark(value: &str, matched: bool) -> String {
    if matched {
        format!("{}*", value)
    } else {
        value.to_string()
    }
}

fn print_candidate(c: &AnnotatedCandidate<'_>) {
    let h = c.highlights;
    match c.candidate {
        Candidate::Album(album) => println!(
            "  {:02}\t{} - {} ({} tracks)",
            c.number,
            mark(&album.artist, h.artist),
            mark(&album.name, h.name),
            mark(&album.total_tracks.to_string(), h.total_tracks),
        ),
        Candidate::Song(song) => {
            println!(
                "  {:02}\t{} - {}",
                c.number,
                mark(&song.artist, h.artist),
                mark(&song.name, h.name)
            );
            let album_artist = song
                .album_artist
                .as_deref()
                .map(|a| format!("{} - ", mark(a, h.album_artist)))
                .unwrap_or_default();
            println!(
                "    \t({}{}) ({}/{})",
                album_artist,
                mark(&song.album, h.album),
                mark(&song.track.to_string(), h.track),
                mark(&song.total_tracks.to_string(), h.total_tracks),
            );
        }
    }
}

/// Drive a session until it is resolved (`true`) or aborted (`false`).
///
/// An empty query line searches for `guess`; `L` changes the store.
pub fn run_search<C: Catalog + ?Sized>(
    session: &mut MatchSession<'_, C>,
    guess: &str,
    summary: &str,
) -> Result<bool> {
    println!("[q] to exit, [L] to change country ({})", session.locale());
    loop {
        match session.state() {
            SessionState::AwaitingQuery => {
                let input = read_line(&format!("['{}']=", guess))?;
                if is_locale_command(&input) {
                    prompt_locale(session)?;
                    continue;
                }
                let query = if input.is_empty() { guess } else { input.as_str() };
                match session.submit_query(query) {
                    Ok(SessionState::Aborted) if query.trim().is_empty() => {
                        println!("No search string provided")
                    }
                    Ok(_) => {}
                    Err(e @ Error::NoMatch { .. }) => {
                        println!("{}, try again or quit with [q]", e)
                    }
                    Err(e @ Error::RemoteUnavailable(_)) => eprintln!("Error: {}", e),
                    Err(e) => return Err(e),
                }
            }
            SessionState::PresentingCandidates | SessionState::AwaitingSelection => {
                println!();
                println!("[q] to exit, [L] to change country ({})", session.locale());
                println!("Current metadata:\t{}", summary);
                println!("Search results:");
                for candidate in session.present()? {
                    print_candidate(&candidate);
                }
                println!("  (* = matches current metadata)");

                loop {
                    let input = read_line("Select: ")?;
                    if is_locale_command(&input) {
                        prompt_locale(session)?;
                        break;
                    }
                    match session.select(&input) {
                        Ok(_) => break,
                        Err(Error::AmbiguousInput(msg)) => println!("Sorry, {}", msg),
                        Err(e) => return Err(e),
                    }
                }
            }
            SessionState::Resolved => return Ok(true),
            SessionState::Aborted => return Ok(false),
            SessionState::Searching => {
                return Err(Error::InvalidState(session.state().to_string()))
            }
        }
    }
}

/// Compare line for a catalog track; `total` is the album's advertised count.
pub fn remote_track_line(track: &RemoteTrack, total: u32) -> String {
    format!(
        "iTunes: ({:02}/{:02}) {} - {}",
        track.track_number, total, track.artist, track.name
    )
}

pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn print_file_report(report: &FileReport) {
    println!(" * {}{}", file_label(&report.path), if report.saved { " - Done." } else { "" });
    for (key, value) in &report.entries {
        println!("   ${}$\t{}", key, value);
    }
}

/// Per-file results, failures, then the suggested rename lines.
pub fn print_write_report(report: &WriteReport) {
    println!();
    println!("++++Report++++");
    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Written(r) => print_file_report(r),
            FileOutcome::Failed { path, error } => {
                println!(" * {} - Failed: {}", file_label(path), error)
            }
        }
    }

    let renames: Vec<_> = report
        .written()
        .filter_map(|r| r.rename.as_ref().map(|name| (r, name)))
        .collect();
    if !renames.is_empty() {
        println!();
        println!("++++Suggested names++++");
        for (r, name) in renames {
            let ext = r
                .path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                .unwrap_or_default();
            println!("  {} -> {}{}", file_label(&r.path), name, ext);
        }
    }
}
