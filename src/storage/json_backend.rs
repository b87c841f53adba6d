use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use uuid::Uuid;

use crate::{
    errors::TripError,
    trip::{Trip, CURRENT_SCHEMA_VERSION},
};

use super::{Result, TripStore};

const HOME_ENV: &str = "TRIP_CORE_HOME";
const DEFAULT_DIR_NAME: &str = ".trip_core";
const TRIPS_FILE: &str = "trips.json";
const STATE_FILE: &str = "state.json";
const BACKUP_DIR: &str = "backups";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// File-backed trip storage: a pretty-printed `trips.json` collection, a
/// `state.json` carrying the selected trip id, and timestamped backups with
/// retention pruning. Writes stage through a temp file and rename.
#[derive(Clone)]
pub struct JsonStore {
    root: PathBuf,
    trips_file: PathBuf,
    state_file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        let backups_dir = root.join(BACKUP_DIR);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            trips_file: root.join(TRIPS_FILE),
            state_file: root.join(STATE_FILE),
            backups_dir,
            root,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn trips_path(&self) -> &Path {
        &self.trips_file
    }

    pub fn backup_path(&self, backup_name: &str) -> PathBuf {
        self.backups_dir.join(backup_name)
    }

    fn read_state(&self) -> Result<StoreState> {
        if self.state_file.exists() {
            let data = fs::read_to_string(&self.state_file)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(StoreState::default())
        }
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for name in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backup_path(name));
        }
        Ok(())
    }
}

impl TripStore for JsonStore {
    fn load_trips(&self) -> Result<Vec<Trip>> {
        if !self.trips_file.exists() {
            return Ok(Vec::new());
        }
        load_trips_from_path(&self.trips_file)
    }

    fn save_trips(&self, trips: &[Trip]) -> Result<()> {
        let json = serde_json::to_string_pretty(trips)?;
        let tmp = tmp_path(&self.trips_file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.trips_file)?;
        tracing::debug!(count = trips.len(), "trips saved");
        Ok(())
    }

    fn selected_trip_id(&self) -> Result<Option<Uuid>> {
        Ok(self.read_state()?.selected_trip_id)
    }

    fn set_selected_trip_id(&self, id: Option<Uuid>) -> Result<()> {
        let mut state = self.read_state()?;
        state.selected_trip_id = id;
        let json = serde_json::to_string_pretty(&state)?;
        write_atomic(&self.state_file, &json)?;
        Ok(())
    }

    fn backup(&self, note: Option<&str>) -> Result<PathBuf> {
        if !self.trips_file.exists() {
            return Err(TripError::Storage("no trips saved yet".into()));
        }
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("trips_{timestamp}");
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        let path = self.backups_dir.join(format!("{file_stem}.{BACKUP_EXTENSION}"));
        fs::copy(&self.trips_file, &path)?;
        self.prune_backups()?;
        tracing::info!(backup = %path.display(), "trips backup created");
        Ok(path)
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let file_name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            entries.push(file_name);
        }
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    fn restore(&self, backup_name: &str) -> Result<Vec<Trip>> {
        let backup_path = self.backup_path(backup_name);
        if !backup_path.exists() {
            return Err(TripError::Storage(format!(
                "backup `{backup_name}` not found"
            )));
        }
        let trips = load_trips_from_path(&backup_path)?;
        fs::copy(&backup_path, &self.trips_file)?;
        tracing::info!(backup = backup_name, "trips restored from backup");
        Ok(trips)
    }
}

/// The application data directory: `$TRIP_CORE_HOME` when set, otherwise
/// `~/.trip_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn load_trips_from_path(path: &Path) -> Result<Vec<Trip>> {
    let data = fs::read_to_string(path)?;
    let trips: Vec<Trip> = serde_json::from_str(&data)?;
    for trip in &trips {
        if trip.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(TripError::Storage(format!(
                "trip `{}` uses schema v{}, newer than supported v{}",
                trip.name, trip.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
    }
    Ok(trips)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    selected_trip_id: Option<Uuid>,
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || matches!(ch, '-' | '.') {
            if !sanitized.is_empty() && !last_dash {
                sanitized.push('-');
                last_dash = true;
            }
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    let date_part = parts.get(1)?;
    let time_part = parts.get(2)?;
    if !is_digits(date_part, 8) {
        return None;
    }
    let time_digits = time_part.strip_suffix(".json").unwrap_or(time_part);
    if !is_digits(time_digits, 4) {
        return None;
    }
    let raw = format!("{date_part}{time_digits}");
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
