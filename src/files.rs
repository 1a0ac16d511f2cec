//! Locating backups on disk and handing results to the desktop.
//!
//! | Helper | Purpose |
//! |--------|---------|
//! | [`default_download_dir`] | where phones usually drop backups |
//! | [`find_sms_backups`] | candidate backup files, newest first |
//! | [`validate_backup_path`] | cheap checks before a pass starts |
//! | [`reveal_in_file_manager`] | show an exported file to the user |

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use glob::Pattern;
use tracing::debug;

use crate::error::{Result, SmsSlicerError};

/// File name patterns that identify SMS backups.
pub const BACKUP_PATTERNS: [&str; 3] = ["sms-*.xml", "SMS*.xml", "*backup*.xml"];

/// The user's download directory, falling back to `~/Downloads`.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Lists backup candidates in `dir` (default: [`default_download_dir`]).
///
/// A file is a candidate if its name matches any of [`BACKUP_PATTERNS`].
/// Results are deduplicated and sorted by modification time, newest
/// first. A missing or unreadable directory yields an empty list.
pub fn find_sms_backups(dir: Option<&Path>) -> Vec<PathBuf> {
    let dir = dir.map_or_else(default_download_dir, Path::to_path_buf);
    let patterns: Vec<Pattern> = BACKUP_PATTERNS
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot list backup directory");
            return Vec::new();
        }
    };

    let mut found: Vec<(SystemTime, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            patterns.iter().any(|p| p.matches(&name))
        })
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path())
        })
        .collect();

    found.sort_by(|(a_time, a_path), (b_time, b_path)| b_time.cmp(a_time).then_with(|| a_path.cmp(b_path)));
    found.into_iter().map(|(_, path)| path).collect()
}

/// Checks that `path` names an existing `.xml` file.
///
/// # Errors
///
/// - [`InvalidFormat`](SmsSlicerError::InvalidFormat) for an empty path
///   or a non-`.xml` extension
/// - [`FileAccess`](SmsSlicerError::FileAccess) if nothing exists there
///
/// ```no_run
/// use smsslicer::files::validate_backup_path;
///
/// let path = validate_backup_path("sms-20240101.xml")?;
/// # Ok::<(), smsslicer::SmsSlicerError>(())
/// ```
pub fn validate_backup_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(SmsSlicerError::invalid_format("backup path", "No file selected"));
    }

    if !path.exists() {
        return Err(SmsSlicerError::file_access(
            path,
            io::Error::new(io::ErrorKind::NotFound, "file does not exist"),
        ));
    }

    let is_xml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
    if !is_xml {
        return Err(SmsSlicerError::invalid_format(
            "backup path",
            format!("{} is not an XML file", path.display()),
        ));
    }

    Ok(path.to_path_buf())
}

/// Opens the platform file manager at `path`.
///
/// On macOS and Windows the file itself is selected; elsewhere the
/// containing directory is opened with `xdg-open`.
///
/// # Errors
///
/// Returns [`FileAccess`](SmsSlicerError::FileAccess) if the file manager
/// cannot be launched.
pub fn reveal_in_file_manager(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut command = reveal_command(path);
    debug!(?command, "revealing in file manager");

    command
        .spawn()
        .map(drop)
        .map_err(|e| SmsSlicerError::file_access(path, e))
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg("-R").arg(path);
    command
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path) -> Command {
    let mut select = std::ffi::OsString::from("/select,");
    select.push(path.as_os_str());

    let mut command = Command::new("explorer");
    command.arg(select);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn reveal_command(path: &Path) -> Command {
    let target = if path.is_dir() {
        path
    } else {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };

    let mut command = Command::new("xdg-open");
    command.arg(target);
    command
}
