//! Session logger — mirrors editor activity to a single file in the OS data
//! directory.
//!
//! The file is truncated at each launch, so it only ever holds the
//! most-recent session. Call [`init`] once at startup, then use the
//! `log_info!` / `log_warn!` / `log_err!` macros anywhere in the crate.
//!
//! Log location:
//!   Windows:  `%APPDATA%\TeleSticker\telesticker.log`
//!   Linux:    `~/.local/share/TeleSticker/telesticker.log`
//!   macOS:    `~/Library/Application Support/TeleSticker/telesticker.log`

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Returns the path to the current session log file, if one was opened.
pub fn log_path() -> Option<&'static PathBuf> {
    LOG_PATH.get()
}

/// Write a raw line to the session log. Silently ignores I/O errors so that
/// logging never takes the editor down.
pub fn write_line(line: &str) {
    if let Some(mutex) = LOG_FILE.get()
        && let Ok(mut file) = mutex.lock()
    {
        let _ = writeln!(file, "{}", line);
    }
}

/// Write a timestamped, level-tagged line to the session log.
pub fn write(level: &str, msg: &str) {
    write_line(&format!("[{}] [{}] {}", timestamp(), level, msg));
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::write("INFO", &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::write("WARN", &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_err {
    ($($arg:tt)*) => {
        $crate::logger::write("ERROR", &format!($($arg)*));
    };
}

/// Initialise the session logger.
///
/// * Creates (or truncates) the log file.
/// * Installs a panic hook that writes the panic message to the log before
///   propagating to the default handler.
pub fn init() {
    let path = data_dir().join("TeleSticker").join("telesticker.log");

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path);

    match file {
        Ok(f) => {
            let _ = LOG_PATH.set(path.clone());
            let _ = LOG_FILE.set(Mutex::new(f));
        }
        Err(e) => {
            // Can't open log file — not fatal, just skip
            eprintln!("[logger] Failed to open log file {:?}: {}", path, e);
            return;
        }
    }

    let session_start = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => format!("(unix {})", d.as_secs()),
        Err(_) => "(unknown time)".to_string(),
    };
    write_line(&format!("=== TeleSticker session started {} ===", session_start));
    write_line(&format!("Log file: {}", path.display()));
    write_line("");

    // Mirror panic info to the log, then run the default handler.
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        write_line(&format!("[{}] [PANIC] {}", timestamp(), info));
        prev(info);
    }));
}

/// Platform data directory (without the app sub-folder).
fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata);
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support");
        }
    }
    // Linux / fallback
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    PathBuf::from(".")
}

/// HH:MM:SS within the current day — good enough for a session log.
fn timestamp() -> String {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => {
            let secs = d.as_secs();
            let h = (secs % 86400) / 3600;
            let m = (secs % 3600) / 60;
            let s = secs % 60;
            format!("{:02}:{:02}:{:02}", h, m, s)
        }
        Err(_) => "??:??:??".to_string(),
    }
}
