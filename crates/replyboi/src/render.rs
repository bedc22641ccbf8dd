//! # Badge Rendering
//!
//! After any change to the count or goal, the API hands the new `(count, goal)`
//! pair to a [`Renderer`]. Rendering is a pure projection of state: renderers
//! keep no counter state of their own and may be called any number of times.
//!
//! A failed render never fails the operation that triggered it. The record is
//! already saved by then, and the next render will catch up.

use crate::error::{ReplyError, Result};
use serde::Serialize;
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub count: u32,
    pub goal: u32,
}

impl Badge {
    pub fn new(count: u32, goal: u32) -> Self {
        Self { count, goal }
    }

    pub fn goal_met(&self) -> bool {
        self.count >= self.goal
    }

    /// Progress toward the goal, clamped to `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.goal == 0 {
            return 1.0;
        }
        (f64::from(self.count) / f64::from(self.goal)).min(1.0)
    }

    /// Compact label, e.g. `7/20`.
    pub fn text(&self) -> String {
        format!("{}/{}", self.count, self.goal)
    }
}

pub trait Renderer {
    fn render(&self, badge: Badge) -> Result<()>;
}

/// Discards every badge.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, _badge: Badge) -> Result<()> {
        Ok(())
    }
}

/// Writes the badge label to a file, for status bars and shell prompts.
pub struct BadgeFile {
    path: PathBuf,
}

impl BadgeFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Renderer for BadgeFile {
    fn render(&self, badge: Badge) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| ReplyError::Store("Badge path has no parent".to_string()))?;
        fs::create_dir_all(dir).map_err(ReplyError::Io)?;
        let tmp = dir.join(format!(".badge-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, format!("{}\n", badge.text())).map_err(ReplyError::Io)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(ReplyError::Io(e));
        }
        Ok(())
    }
}

/// Keeps every badge it is given. Useful in tests.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    badges: RefCell<Vec<Badge>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn badges(&self) -> Vec<Badge> {
        self.badges.borrow().clone()
    }

    pub fn last(&self) -> Option<Badge> {
        self.badges.borrow().last().copied()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, badge: Badge) -> Result<()> {
        self.badges.borrow_mut().push(badge);
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for std::rc::Rc<R> {
    fn render(&self, badge: Badge) -> Result<()> {
        (**self).render(badge)
    }
}
