use crate::decision::Action;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    pub battle_tag: String,
    pub turn: u32,
    pub active_species: String,
    pub opponent_species: String,
    pub state: String,
    #[serde(default)]
    pub thought: Option<String>,
    pub action: Action,
    pub fallback: bool,
}

/// Append-only JSON Lines log of past turns.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Journal { path: path.into() }
    }

    pub fn append(&self, record: &TurnRecord) -> anyhow::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open journal at {}", self.path.display()))?;
        let mut line = serde_json::to_string(record)?;
        // a torn previous write must not swallow this record
        if file.metadata()?.len() > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                line.insert(0, '\n');
            }
        }
        writeln!(file, "{line}")
            .with_context(|| format!("Failed to write journal at {}", self.path.display()))?;
        Ok(())
    }

    /// All records in write order; a missing file is an empty journal and unreadable lines
    /// are skipped.
    pub fn load(&self) -> anyhow::Result<Vec<TurnRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to read journal at {}", self.path.display()))?;
        let mut records = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<TurnRecord>(&line) {
                Ok(record) => records.push(record),
                Err(err) => tracing::warn!(
                    path = %self.path.display(),
                    line = line_no + 1,
                    %err,
                    "skipping unreadable journal line"
                ),
            }
        }
        Ok(records)
    }

    /// Most recent model-decided turns from the same species matchup, newest first.
    pub fn recall(
        &self,
        active_species: &str,
        opponent_species: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<TurnRecord>> {
        let records = self.load()?;
        Ok(records
            .into_iter()
            .rev()
            .filter(|r| {
                !r.fallback
                    && r.active_species.eq_ignore_ascii_case(active_species)
                    && r.opponent_species.eq_ignore_ascii_case(opponent_species)
            })
            .take(limit)
            .collect())
    }
}
