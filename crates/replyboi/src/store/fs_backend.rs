use super::{decode_record, encode_record, StateStore, StoreLock, STORAGE_KEY};
use crate::error::{ReplyError, Result};
use crate::model::CounterState;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self) -> PathBuf {
        self.root.join(format!("{}.json", STORAGE_KEY))
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(format!("{}.lock", STORAGE_KEY))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(ReplyError::Io)?;
        }
        Ok(())
    }
}

impl StateStore for FsStore {
    fn load(&self) -> Result<Option<CounterState>> {
        let path = self.record_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).map_err(ReplyError::Io)?;
        decode_record(&raw).map(Some)
    }

    fn save(&self, state: &CounterState) -> Result<()> {
        self.ensure_dir()?;
        let content = encode_record(state)?;

        // Atomic write
        let tmp_path = self
            .root
            .join(format!(".{}-{}.tmp", STORAGE_KEY, Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(ReplyError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, self.record_path()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ReplyError::Io(e));
        }

        debug!(today = state.today_count, goal = state.goal, "saved counter record");
        Ok(())
    }

    fn lock(&self) -> Result<StoreLock> {
        self.ensure_dir()?;
        StoreLock::acquire(&self.lock_path())
    }
}
