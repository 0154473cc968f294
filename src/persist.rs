use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Transfer, transfers_from_value};
use crate::summary::{Summary, summarize};

/// The exchange document written to disk and accepted back by the loader:
/// `{ metadata, summary, transfers }`. The summary is recomputed on write so
/// a snapshot is always internally consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub summary: Summary,
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotMetadata {
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub total_records: usize,
}

pub fn write_snapshot(
    path: &Path,
    league: &str,
    season: &str,
    transfers: &[Transfer],
) -> Result<()> {
    let snapshot = Snapshot {
        metadata: SnapshotMetadata {
            generated_at: Utc::now().to_rfc3339(),
            league: league.to_string(),
            season: season.to_string(),
            total_records: transfers.len(),
        },
        summary: summarize(transfers),
        transfers: transfers.to_vec(),
    };

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed creating {}", dir.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write snapshot {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap snapshot {}", path.display()))?;
    Ok(())
}

/// Read a snapshot back. Transfers run through the normalizer, so a document
/// written by an older exporter (or a bare array) loads the same way.
pub fn read_snapshot(path: &Path) -> Result<(SnapshotMetadata, Vec<Transfer>)> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    let root: Value = serde_json::from_str(&raw).context("invalid snapshot json")?;
    let metadata = root
        .get("metadata")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    let transfers = transfers_from_value(&root)?;
    Ok((metadata, transfers))
}
