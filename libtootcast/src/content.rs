//! Content gathering
//!
//! Content arrives from one of three sources, in precedence order: piped
//! stdin, an interactive read terminated by EOF, or positional arguments.
//! A positional naming a readable `.txt` or extensionless file contributes
//! that file's contents as one segment; media files belong to the media
//! resolver and are skipped here; anything else is a literal segment.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TootcastError};
use crate::media;

/// Gather the content segments for one invocation.
///
/// Fails with `"No content"` when no source yields anything, or when a
/// supplied segment trims to nothing — the threader is never handed empty
/// input.
pub fn gather(positionals: &[String], interactive: bool) -> Result<Vec<String>> {
    if let Some(piped) = read_piped()? {
        return validate(vec![piped]);
    }
    if interactive {
        return validate(vec![read_interactive()?]);
    }
    validate(from_args(positionals)?)
}

/// Read piped stdin. An interactive terminal, or a pipe that carries only
/// whitespace, yields `None` so the positional arguments get their turn.
fn read_piped() -> Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut piped = String::new();
    std::io::stdin().read_to_string(&mut piped)?;
    if piped.trim().is_empty() {
        debug!("stdin is a pipe but carried no content");
        return Ok(None);
    }
    Ok(Some(piped))
}

fn read_interactive() -> Result<String> {
    eprintln!("Type your toot. End with ^D.");
    let mut content = String::new();
    std::io::stdin().read_to_string(&mut content)?;
    Ok(content)
}

/// Expand positional arguments into content segments.
fn from_args(positionals: &[String]) -> Result<Vec<String>> {
    let mut segments = Vec::new();
    for arg in positionals {
        let path = Path::new(arg);
        if media::is_media_path(path) {
            continue;
        }
        if path.is_file() {
            match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("txt") => {
                    debug!("reading content file {}", path.display());
                    segments.push(std::fs::read_to_string(path)?);
                }
                None => {
                    debug!("reading content file {}", path.display());
                    segments.push(std::fs::read_to_string(path)?);
                }
                Some(_) => debug!("skipping {}: not a text file", path.display()),
            }
        } else {
            segments.push(arg.clone());
        }
    }
    Ok(segments)
}

fn validate(segments: Vec<String>) -> Result<Vec<String>> {
    let trimmed: Vec<String> = segments.iter().map(|s| s.trim().to_string()).collect();
    if trimmed.is_empty() || trimmed.iter().any(String::is_empty) {
        return Err(TootcastError::InvalidInput("No content".to_string()));
    }
    Ok(trimmed)
}
