//! Copies mod files into a profile's mods directory and removes them again.
//!
//! Single stylesheets land at `<mods>/<name>.css`. Folders land at
//! `<mods>/<name>/` with their entry stylesheet installed as `mod.css`, and
//! only CSS, image and font assets are copied.

use crate::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use uc_fs::{join_relative, normalize_relative, validate_path_identifier};

/// Largest file that is copied, in bytes.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// File extensions copied from mod folders.
pub const ASSET_EXTENSIONS: &[&str] = &[
    "css", "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "ttf", "otf", "woff", "woff2", "eot",
];

const ENTRY_NAME: &str = "mod.css";
const ROOT_STYLESHEET: &str = "userChrome.css";

/// What to do when the install target already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Overwrite the existing file or folder.
    Replace,
    /// Pick a fresh name with a `_N` suffix.
    #[default]
    Rename,
}

/// Keep alphanumerics and `.-_ `; drop leading dots and surrounding spaces.
///
/// # Example
/// ```
/// use uc_core::install::sanitize_filename;
///
/// assert_eq!(sanitize_filename("my<theme>:v2.css"), "mythemev2.css");
/// assert_eq!(sanitize_filename("..hidden"), "hidden");
/// assert_eq!(sanitize_filename("???"), "mod");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
        .collect();
    let cleaned = kept.trim().trim_start_matches('.').trim().to_string();
    if cleaned.is_empty() {
        "mod".to_string()
    } else {
        cleaned
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn invalid(path: &Path, reason: &str) -> Error {
    Error::InvalidSource {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn check_size(path: &Path, size: u64) -> Result<()> {
    if size > MAX_FILE_SIZE {
        return Err(Error::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

/// Copy one stylesheet into `mods_dir`.
///
/// Returns the installed file name, relative to `mods_dir`.
pub fn install_file(src: &Path, mods_dir: &Path, policy: ConflictPolicy) -> Result<String> {
    let meta = fs::metadata(src).map_err(|_| invalid(src, "file does not exist"))?;
    if !meta.is_file() {
        return Err(invalid(src, "not a file"));
    }
    if !has_extension(src, &["css"]) {
        return Err(invalid(src, "not a .css file"));
    }
    check_size(src, meta.len())?;

    let original = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = sanitize_filename(&original);
    if name.eq_ignore_ascii_case(ROOT_STYLESHEET) {
        name = ENTRY_NAME.to_string();
    }
    if !name.to_ascii_lowercase().ends_with(".css") {
        name.push_str(".css");
    }

    let name = match policy {
        ConflictPolicy::Replace => name,
        ConflictPolicy::Rename => free_name(mods_dir, &name),
    };
    copy_file(src, &mods_dir.join(&name))?;
    tracing::info!(src = %src.display(), name = %name, "installed stylesheet");
    Ok(name)
}

/// Overwrite `dest` with the contents of `src`.
pub fn replace_file(src: &Path, dest: &Path) -> Result<()> {
    let meta = fs::metadata(src).map_err(|_| invalid(src, "file does not exist"))?;
    check_size(src, meta.len())?;
    copy_file(src, dest)
}

fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    let bytes = fs::read(src).map_err(|e| uc_fs::Error::io(src, e))?;
    uc_fs::io::write_atomic(dest, &bytes)?;
    Ok(())
}

/// First of `name`, `stem_1.ext`, `stem_2.ext`, ... not present in `dir`.
fn free_name(dir: &Path, name: &str) -> String {
    if !dir.join(name).exists() {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1..)
        .map(|n| match ext {
            Some(ext) => format!("{stem}_{n}.{ext}"),
            None => format!("{stem}_{n}"),
        })
        .find(|candidate| !dir.join(candidate).exists())
        .unwrap_or_else(|| name.to_string())
}

/// Files to copy out of a mod folder and the entry stylesheet among them.
#[derive(Debug)]
struct FolderPlan {
    files: Vec<(PathBuf, String)>,
    entry: String,
}

fn plan_folder(src: &Path) -> Result<FolderPlan> {
    let mut files = Vec::new();
    collect_assets(src, "", &mut files)?;

    let root_css: Vec<String> = files
        .iter()
        .map(|(_, rel)| rel)
        .filter(|rel| !rel.contains('/') && rel.to_ascii_lowercase().ends_with(".css"))
        .cloned()
        .collect();

    let find = |wanted: &str| {
        root_css
            .iter()
            .find(|rel| rel.eq_ignore_ascii_case(wanted))
            .cloned()
    };

    let entry = if let Some(root) = find(ROOT_STYLESHEET) {
        // userChrome.css becomes mod.css, shadowing any mod.css next to it.
        if let Some(shadowed) = find(ENTRY_NAME) {
            tracing::warn!(file = %shadowed, "ignoring mod.css next to userChrome.css");
            files.retain(|(_, rel)| *rel != shadowed);
        }
        for (_, rel) in files.iter_mut() {
            if *rel == root {
                *rel = ENTRY_NAME.to_string();
            }
        }
        ENTRY_NAME.to_string()
    } else if let Some(entry) = find(ENTRY_NAME) {
        entry
    } else if let [only] = root_css.as_slice() {
        only.clone()
    } else {
        return Err(Error::NoEntryStylesheet {
            path: src.to_path_buf(),
        });
    };

    Ok(FolderPlan { files, entry })
}

fn collect_assets(dir: &Path, prefix: &str, out: &mut Vec<(PathBuf, String)>) -> Result<()> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)
        .map_err(|e| uc_fs::Error::io(dir, e))?
        .collect::<std::io::Result<_>>()
        .map_err(|e| uc_fs::Error::io(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let meta = fs::symlink_metadata(&path).map_err(|e| uc_fs::Error::io(&path, e))?;
        let rel = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };

        if meta.file_type().is_symlink() {
            tracing::warn!(path = %path.display(), "skipping symlink");
        } else if meta.is_dir() {
            if name.starts_with('.') {
                continue;
            }
            collect_assets(&path, &rel, out)?;
        } else if has_extension(&path, ASSET_EXTENSIONS) {
            if meta.len() > MAX_FILE_SIZE {
                tracing::warn!(path = %path.display(), size = meta.len(), "skipping oversized file");
                continue;
            }
            out.push((path, rel));
        }
    }
    Ok(())
}

/// Copy a mod folder into `<mods_dir>/<name>/`.
///
/// Returns the entry stylesheet's path relative to `mods_dir`, e.g.
/// `nord/mod.css`. The copy is assembled next to the target and moved into
/// place at the end, so a failure never leaves a half-copied folder.
pub fn install_folder(
    src: &Path,
    mods_dir: &Path,
    name: &str,
    policy: ConflictPolicy,
) -> Result<String> {
    if !src.is_dir() {
        return Err(invalid(src, "not a directory"));
    }
    let name = sanitize_filename(name);
    validate_path_identifier(&name, "Mod name").map_err(|msg| invalid(src, &msg))?;

    let plan = plan_folder(src)?;

    fs::create_dir_all(mods_dir).map_err(|e| uc_fs::Error::write(mods_dir, e))?;
    let folder = match policy {
        ConflictPolicy::Replace => name,
        ConflictPolicy::Rename => free_name(mods_dir, &name),
    };
    let dest = mods_dir.join(&folder);
    let partial = mods_dir.join(format!(".{folder}.partial"));
    if partial.exists() {
        fs::remove_dir_all(&partial).map_err(|e| uc_fs::Error::write(&partial, e))?;
    }

    let copied = copy_plan(&plan, &partial);
    if let Err(err) = copied {
        let _ = fs::remove_dir_all(&partial);
        return Err(err);
    }

    if dest.exists() {
        fs::remove_dir_all(&dest).map_err(|e| uc_fs::Error::write(&dest, e))?;
    }
    fs::rename(&partial, &dest).map_err(|e| uc_fs::Error::write(&dest, e))?;

    tracing::info!(
        src = %src.display(),
        folder = %folder,
        files = plan.files.len(),
        "installed mod folder"
    );
    Ok(format!("{folder}/{}", plan.entry))
}

fn copy_plan(plan: &FolderPlan, dest: &Path) -> Result<()> {
    for (src, rel) in &plan.files {
        let target = join_relative(dest, rel);
        copy_file(src, &target)?;
    }
    Ok(())
}

/// Delete the installed files of the import at `relative_path`.
///
/// A stylesheet directly under the mods directory is deleted on its own. A
/// stylesheet inside a mod folder takes the whole top-level folder with it,
/// unless one of `remaining` (chrome-relative paths of the imports that stay)
/// lives in the same folder, in which case only the file goes. Empty
/// directories left under the mods directory are pruned; the mods directory
/// itself is kept. Missing files are not an error.
pub fn remove_artifacts(
    chrome_dir: &Path,
    mods_dir: &str,
    relative_path: &str,
    remaining: &[&str],
) -> Result<Vec<PathBuf>> {
    let traversal = || Error::PathTraversal {
        path: relative_path.to_string(),
    };
    let normalized = normalize_relative(relative_path).ok_or_else(traversal)?;
    let prefix = format!("{}/", mods_dir.trim_matches('/'));
    let rest = normalized.strip_prefix(&prefix).ok_or_else(traversal)?;

    let resolve = |rel: &str| join_relative(chrome_dir, rel);
    let mods_root = resolve(mods_dir);

    let shares_folder = |top: &str| {
        let folder = format!("{prefix}{top}/");
        remaining
            .iter()
            .filter_map(|other| normalize_relative(other))
            .any(|other| other.starts_with(&folder))
    };

    let mut removed = Vec::new();
    let target = match rest.split_once('/') {
        Some((top, _)) if !shares_folder(top) => mods_root.join(top),
        _ => resolve(&normalized),
    };

    let result = if target.is_dir() {
        fs::remove_dir_all(&target)
    } else {
        fs::remove_file(&target)
    };
    match result {
        Ok(()) => {
            tracing::info!(path = %target.display(), "removed mod files");
            removed.push(target);
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %target.display(), "mod files already gone");
        }
        Err(source) => return Err(Error::ArtifactRemoval { path: target, source }),
    }

    prune_empty_dirs(&mods_root)?;
    Ok(removed)
}

/// Follow the local `@import`s of the stylesheet at `entry` and fail with
/// [`Error::CircularImport`] if any chain leads back to the profile's
/// `userChrome.css` or to a stylesheet already on that chain.
///
/// Targets with a scheme (`chrome://`, `https:`, `data:`) and absolute paths
/// are not followed. A missing file ends its chain.
pub fn check_import_cycles(chrome_dir: &Path, entry: &Path) -> Result<()> {
    let root = lexical(&chrome_dir.join(ROOT_STYLESHEET));
    let mut chain = Vec::new();
    let mut cleared = HashSet::new();
    follow_imports(&lexical(entry), &root, &mut chain, &mut cleared)
}

fn follow_imports(
    sheet: &Path,
    root: &Path,
    chain: &mut Vec<PathBuf>,
    cleared: &mut HashSet<PathBuf>,
) -> Result<()> {
    if cleared.contains(sheet) {
        return Ok(());
    }
    let Ok(bytes) = fs::read(sheet) else {
        return Ok(());
    };
    chain.push(sheet.to_path_buf());

    let base = sheet.parent().unwrap_or(Path::new(""));
    for import in uc_blocks::grammar::import_targets(&String::from_utf8_lossy(&bytes)) {
        if import.contains(':') || import.starts_with('/') {
            continue;
        }
        let resolved = lexical(&base.join(&import));
        if resolved == root || chain.contains(&resolved) {
            tracing::warn!(path = %sheet.display(), import = %import, "circular import");
            return Err(Error::CircularImport {
                path: sheet.to_path_buf(),
                import,
            });
        }
        follow_imports(&resolved, root, chain, cleared)?;
    }

    chain.pop();
    cleared.insert(sheet.to_path_buf());
    Ok(())
}

/// Resolve `.` and `..` without touching the filesystem.
fn lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Remove empty directories below `root`, deepest first. `root` stays.
pub fn prune_empty_dirs(root: &Path) -> Result<usize> {
    fn prune(dir: &Path) -> Result<(usize, bool)> {
        let mut pruned = 0;
        let mut empty = true;
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((0, false)),
            Err(e) => return Err(uc_fs::Error::io(dir, e).into()),
        };
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                let (count, child_empty) = prune(&path)?;
                pruned += count;
                if child_empty {
                    fs::remove_dir(&path)
                        .map_err(|source| Error::ArtifactRemoval { path: path.clone(), source })?;
                    pruned += 1;
                    continue;
                }
            }
            empty = false;
        }
        Ok((pruned, empty))
    }

    let (pruned, _) = prune(root)?;
    if pruned > 0 {
        tracing::debug!(root = %root.display(), pruned, "pruned empty directories");
    }
    Ok(pruned)
}
