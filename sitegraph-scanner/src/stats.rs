use crate::asset::AssetKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-kind tally of loaded assets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindStats {
    pub count: usize,
    pub total_bytes: u64,
}

/// Summary of a completed scan. Kinds are kept in first-seen order so the
/// printed table is stable for a given site layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    entries: Vec<(AssetKind, KindStats)>,
    pub total_count: usize,
    pub total_bytes: u64,
    pub external: usize,
    pub unresolved: usize,
    pub elapsed: Duration,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: AssetKind, size: u64) {
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, stats)) => {
                stats.count += 1;
                stats.total_bytes += size;
            }
            None => {
                self.entries.push((
                    kind,
                    KindStats {
                        count: 1,
                        total_bytes: size,
                    },
                ));
            }
        }
        self.total_count += 1;
        self.total_bytes += size;
    }

    pub fn kinds(&self) -> impl Iterator<Item = &(AssetKind, KindStats)> {
        self.entries.iter()
    }

    /// One line per asset kind, columns aligned.
    pub fn kind_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(kind, stats)| {
                format!(
                    "{:>5}  {:<12} {:>10}",
                    stats.count,
                    kind.as_str(),
                    human_size(stats.total_bytes)
                )
            })
            .collect()
    }

    /// The per-kind lines followed by a sum line.
    pub fn stats_lines(&self) -> Vec<String> {
        let mut lines = self.kind_lines();
        lines.push(format!(
            "{:>5}  {:<12} {:>10}",
            self.total_count,
            "sum",
            human_size(self.total_bytes)
        ));
        lines
    }
}

/// Format a byte count the way humans read it.
pub fn human_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let bytes = bytes as f64;
    if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{} B", bytes as u64)
    }
}
