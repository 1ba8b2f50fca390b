//! Repository archive extraction.

use crate::{Error, Result};
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

/// Most bytes a single archive may expand to.
pub const MAX_EXTRACTED_SIZE: u64 = 200 * 1024 * 1024;

/// Extract a GitHub-style zip into `dest`, dropping the single top-level
/// directory every entry lives under.
///
/// When `subdir` is set, only entries below that directory are kept and the
/// subdirectory prefix is stripped as well. Entries whose names would escape
/// `dest` are skipped. Returns the number of files written.
///
/// Extraction stops with [`Error::MalformedArchive`] once the written files
/// add up to more than [`MAX_EXTRACTED_SIZE`].
pub fn extract_repository(data: &[u8], dest: &Path, subdir: Option<&str>) -> Result<usize> {
    extract_with_limit(data, dest, subdir, MAX_EXTRACTED_SIZE)
}

fn extract_with_limit(
    data: &[u8],
    dest: &Path,
    subdir: Option<&str>,
    limit: u64,
) -> Result<usize> {
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(malformed)?;
    let subdir: Option<PathBuf> = subdir
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;
    let mut written = 0;
    let mut remaining = limit;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(malformed)?;

        let Some(enclosed) = file.enclosed_name() else {
            tracing::warn!(name = file.name(), "skipping archive entry outside the root");
            continue;
        };

        let Some(relative) = strip_root(&enclosed, subdir.as_deref()) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let out = dest.join(&relative);
        if file.is_dir() {
            fs::create_dir_all(&out).map_err(|e| Error::io(&out, e))?;
            continue;
        }
        if file.size() > remaining {
            return Err(too_large(limit));
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let mut outfile = fs::File::create(&out).map_err(|e| Error::io(&out, e))?;
        // The declared size can lie; cap the actual stream too.
        let copied = std::io::copy(&mut (&mut file).take(remaining + 1), &mut outfile)
            .map_err(|e| Error::io(&out, e))?;
        if copied > remaining {
            return Err(too_large(limit));
        }
        remaining -= copied;
        written += 1;
    }

    if written == 0 {
        return Err(Error::MalformedArchive {
            message: match subdir {
                Some(sub) => format!("no files under '{}'", sub.display()),
                None => "archive contains no files".into(),
            },
        });
    }
    tracing::debug!(files = written, dest = %dest.display(), "extracted archive");
    Ok(written)
}

/// Drop the archive's top-level directory, then the optional subdirectory.
fn strip_root(path: &Path, subdir: Option<&Path>) -> Option<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(_)) => {}
        _ => return None,
    }
    let rest = components.as_path();
    match subdir {
        Some(sub) => rest.strip_prefix(sub).ok().map(Path::to_path_buf),
        None => Some(rest.to_path_buf()),
    }
}

fn too_large(limit: u64) -> Error {
    tracing::warn!(limit, "archive exceeds extraction limit");
    Error::MalformedArchive {
        message: format!("archive expands past the {limit} byte limit"),
    }
}

fn malformed(err: zip::result::ZipError) -> Error {
    Error::MalformedArchive {
        message: err.to_string(),
    }
}
