use anyhow::{anyhow, Result};
use std::path::PathBuf;

use crate::store::{check_name, DirStore};

pub const DEFAULT_ROOT: &str = "render.glsl";
pub const DEFAULT_MERGED: &str = "main.glsl";

/// Names of the files an invocation works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding every source file, including the merged one.
    pub dir: PathBuf,
    /// File expansion starts from, and the one `uncat` writes back.
    pub root: String,
    /// The flattened file.
    pub merged: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            root: DEFAULT_ROOT.to_owned(),
            merged: DEFAULT_MERGED.to_owned(),
        }
    }
}

impl Config {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_merged(mut self, merged: impl Into<String>) -> Self {
        self.merged = merged.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_name(&self.root)?;
        check_name(&self.merged)?;

        if self.root == self.merged {
            return Err(anyhow!(
                "Root and merged file are both {name}, cat would overwrite its own input",
                name = self.root
            ));
        }

        Ok(())
    }

    pub fn store(&self) -> DirStore {
        DirStore::new(&self.dir)
    }
}
