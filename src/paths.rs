//! Remote destination path resolution.
//!
//! The remote service addresses folders with absolute, forward-slash paths.
//! Callers may hand us roots recorded on other platforms (backslashes, drive
//! prefixes), so resolution normalizes every component before joining.

use crate::error::{Error, Result};

/// Resolve the absolute remote destination path `root[/category]/download_path`.
///
/// `root` is the explicit override when set, otherwise the service's default
/// destination fetched during initialization; resolution fails with a
/// configuration error when neither produced a usable root. The result always
/// begins with `/` and never contains backslashes; duplicate separators are
/// collapsed and drive prefixes (`C:`) are dropped.
pub fn resolve_remote_path(
    root: Option<&str>,
    category: Option<&str>,
    download_path: &str,
) -> Result<String> {
    let root = match root {
        Some(r) if !r.trim().is_empty() => r,
        _ => {
            return Err(Error::Config {
                message: "no destination root configured and none reported by the service"
                    .to_string(),
                key: Some("destination.root".to_string()),
            });
        }
    };

    let mut segments: Vec<String> = Vec::new();
    for part in [Some(root), category, Some(download_path)].into_iter().flatten() {
        push_segments(&mut segments, part);
    }

    Ok(format!("/{}", segments.join("/")))
}

/// Split `part` on separators and append its usable segments.
fn push_segments(segments: &mut Vec<String>, part: &str) {
    let normalized = part.replace('\\', "/");
    for segment in normalized.split('/') {
        if segment.is_empty() || is_drive_prefix(segment) {
            continue;
        }
        segments.push(segment.to_string());
    }
}

/// Windows drive prefixes ("C:") carry no meaning on the remote service.
fn is_drive_prefix(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some(':'), None) if c.is_ascii_alphabetic()
    )
}
