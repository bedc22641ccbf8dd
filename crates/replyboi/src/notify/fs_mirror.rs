//! A dependent context kept on disk.
//!
//! ```text
//! mirrors/
//! └── <name>/
//!     ├── count    # the dependent's local mirror of today's count
//!     └── inbox    # JSON lines from the owner; present only while loaded
//! ```
//!
//! The owner side uses the [`MirrorTarget`] impl. The dependent side uses
//! [`FsMirror::attach`], [`FsMirror::detach`], [`FsMirror::drain_inbox`] and
//! [`FsMirror::record_local_reply`].

use super::{DeliveryError, MirrorTarget};
use crate::protocol::DependentMessage;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FsMirror {
    name: String,
    dir: PathBuf,
}

impl FsMirror {
    pub fn new(mirrors_dir: &Path, name: &str) -> Result<Self, DeliveryError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DeliveryError::InvalidName(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            dir: mirrors_dir.join(name),
        })
    }

    /// Every dependent directory under `mirrors_dir`, sorted by name.
    pub fn discover(mirrors_dir: &Path) -> Result<Vec<FsMirror>, DeliveryError> {
        if !mirrors_dir.exists() {
            return Ok(Vec::new());
        }
        let mut mirrors = Vec::new();
        for entry in fs::read_dir(mirrors_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                match FsMirror::new(mirrors_dir, name) {
                    Ok(mirror) => mirrors.push(mirror),
                    Err(err) => warn!(error = %err, "skipping mirror directory"),
                }
            }
        }
        mirrors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(mirrors)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn count_path(&self) -> PathBuf {
        self.dir.join("count")
    }

    fn inbox_path(&self) -> PathBuf {
        self.dir.join("inbox")
    }

    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// A loaded dependent can receive messages.
    pub fn is_loaded(&self) -> bool {
        self.inbox_path().exists()
    }

    /// Create the dependent if needed and mark it loaded.
    pub fn attach(&self) -> Result<(), DeliveryError> {
        fs::create_dir_all(&self.dir)?;
        if !self.count_path().exists() {
            self.write_count(0)?;
        }
        if !self.is_loaded() {
            fs::write(self.inbox_path(), "")?;
        }
        Ok(())
    }

    /// Mark the dependent unloaded. Its mirror stays on disk.
    pub fn detach(&self) -> Result<(), DeliveryError> {
        let inbox = self.inbox_path();
        if inbox.exists() {
            fs::remove_file(inbox)?;
        }
        Ok(())
    }

    /// The mirrored count. Missing or unreadable values count as zero.
    pub fn count(&self) -> Result<u32, DeliveryError> {
        let path = self.count_path();
        if !path.exists() {
            return Ok(0);
        }
        let raw = fs::read_to_string(path)?;
        Ok(raw.trim().parse().unwrap_or(0))
    }

    fn write_count(&self, count: u32) -> Result<(), DeliveryError> {
        let tmp = self.dir.join(format!(".count-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, count.to_string())?;
        fs::rename(&tmp, self.count_path())?;
        Ok(())
    }

    /// Open the inbox with an exclusive lock held. Readers and writers of the
    /// inbox both go through here, so nothing is appended between a drain's
    /// read and its truncate.
    fn locked_inbox(&self, options: &mut OpenOptions) -> Result<File, DeliveryError> {
        let inbox = options.open(self.inbox_path())?;
        inbox.lock_exclusive()?;
        Ok(inbox)
    }

    /// Apply and clear pending messages from the owner.
    pub fn drain_inbox(&self) -> Result<Vec<DependentMessage>, DeliveryError> {
        if !self.is_loaded() {
            return Ok(Vec::new());
        }
        let mut inbox = self.locked_inbox(OpenOptions::new().read(true).write(true))?;
        let mut raw = String::new();
        inbox.read_to_string(&mut raw)?;
        let mut applied = Vec::new();
        for line in raw.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str::<DependentMessage>(line) {
                Ok(message) => {
                    match message {
                        DependentMessage::ResetLocal => self.write_count(0)?,
                    }
                    applied.push(message);
                }
                Err(err) => warn!(dependent = %self.name, error = %err, "ignoring bad inbox line"),
            }
        }
        inbox.set_len(0)?;
        FileExt::unlock(&inbox)?;
        Ok(applied)
    }

    /// Count one reply locally, after catching up on pending messages.
    pub fn record_local_reply(&self) -> Result<u32, DeliveryError> {
        if !self.exists() {
            return Err(DeliveryError::Missing(self.name.clone()));
        }
        self.drain_inbox()?;
        let next = self.count()?.saturating_add(1);
        self.write_count(next)?;
        Ok(next)
    }
}

impl MirrorTarget for FsMirror {
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver(&self, message: &DependentMessage) -> Result<(), DeliveryError> {
        if !self.exists() {
            return Err(DeliveryError::Missing(self.name.clone()));
        }
        if !self.is_loaded() {
            return Err(DeliveryError::NotLoaded(self.name.clone()));
        }
        let mut line = serde_json::to_string(message)?;
        line.push('\n');
        let mut inbox = self.locked_inbox(OpenOptions::new().append(true))?;
        inbox.write_all(line.as_bytes())?;
        FileExt::unlock(&inbox)?;
        Ok(())
    }

    fn zero_mirror(&self) -> Result<(), DeliveryError> {
        if !self.exists() {
            return Err(DeliveryError::Missing(self.name.clone()));
        }
        self.write_count(0)
    }
}
