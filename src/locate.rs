//! Profile discovery for supported browsers.
//!
//! Firefox profiles are resolved through `profiles.ini` first, then by a
//! recursive search for `places.sqlite`. Chrome profiles are found by a
//! recursive search for a file named `History`. The first match under any
//! configured root wins.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::cli::Browser;
use crate::config::Config;

pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

pub fn locate_history_db(browser: Browser, cfg: &Config, home: &Path) -> Result<Option<PathBuf>> {
    match browser {
        Browser::Firefox => find_firefox_places(cfg, home),
        Browser::Chrome => Ok(find_chrome_history(cfg, home)),
    }
}

fn find_firefox_places(cfg: &Config, home: &Path) -> Result<Option<PathBuf>> {
    for root in &cfg.firefox_roots {
        let base = home.join(root);
        if !base.is_dir() {
            continue;
        }
        debug!("searching firefox root {}", base.display());
        if let Some(db) = places_from_profiles_ini(&base)? {
            return Ok(Some(db));
        }
        if let Some(db) = find_named_file(&base, "places.sqlite") {
            return Ok(Some(db));
        }
    }
    Ok(None)
}

// profiles.ini keys are treated case-insensitively; Path entries are
// relative to the directory holding the ini file.
fn places_from_profiles_ini(base: &Path) -> Result<Option<PathBuf>> {
    let ini = base.join("profiles.ini");
    if !ini.is_file() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&ini)?;
    for line in contents.lines() {
        let line = line.trim();
        if let Some((key, value)) = line.split_once('=') {
            if key.trim().eq_ignore_ascii_case("path") {
                let db = base.join(value.trim()).join("places.sqlite");
                if db.is_file() {
                    return Ok(Some(db));
                }
            }
        }
    }
    Ok(None)
}

fn find_chrome_history(cfg: &Config, home: &Path) -> Option<PathBuf> {
    for root in &cfg.chrome_roots {
        let base = home.join(root);
        if !base.is_dir() {
            continue;
        }
        debug!("searching chrome root {}", base.display());
        if let Some(db) = find_named_file(&base, "History") {
            return Some(db);
        }
    }
    None
}

fn find_named_file(base: &Path, name: &str) -> Option<PathBuf> {
    for entry in WalkDir::new(base).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() && entry.file_name() == name {
            return Some(entry.into_path());
        }
    }
    None
}
