use anyhow::{anyhow, Context, Result};
use std::{collections::BTreeMap, fs, io, path::PathBuf};

/// Where shader sources are read from and written to.
///
/// Names live in a flat namespace: a store never resolves directories.
pub trait SourceStore {
    /// Reads a whole file, each line keeping its own terminator.
    fn read_lines(&self, name: &str) -> Result<Vec<String>>;

    fn write_lines(&mut self, name: &str, lines: &[String]) -> Result<()>;

    fn exists(&self, name: &str) -> bool;
}

/// Rejects names that would escape the flat namespace.
pub fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        Err(anyhow!("Empty file name"))
    } else if name.contains(['/', '\\']) || name == "." || name == ".." {
        Err(anyhow!("File name {name} must not contain a directory"))
    } else if name.contains(char::is_whitespace) {
        // Marker lines end their name at the first whitespace.
        Err(anyhow!("File name \"{name}\" must not contain whitespace"))
    } else {
        Ok(())
    }
}

pub(crate) fn split_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(str::to_owned).collect()
}

/// Sources stored as files of a single directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, name: &str) -> Result<PathBuf> {
        check_name(name)?;
        Ok(self.dir.join(name))
    }
}

impl SourceStore for DirStore {
    fn read_lines(&self, name: &str) -> Result<Vec<String>> {
        let path = self.path(name)?;
        let content =
            fs::read_to_string(&path).with_context(|| format!("Couldn't read {name}"))?;

        Ok(split_lines(&content))
    }

    fn write_lines(&mut self, name: &str, lines: &[String]) -> Result<()> {
        let path = self.path(name)?;
        fs::write(&path, lines.concat()).with_context(|| format!("Couldn't write {name}"))?;

        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.path(name).map(|path| path.is_file()).unwrap_or(false)
    }
}

/// Sources kept in memory, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    files: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.insert(name.into(), content.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }
}

impl SourceStore for MemoryStore {
    fn read_lines(&self, name: &str) -> Result<Vec<String>> {
        check_name(name)?;
        let content = self
            .files
            .get(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{name} not found")))
            .with_context(|| format!("Couldn't read {name}"))?;

        Ok(split_lines(content))
    }

    fn write_lines(&mut self, name: &str, lines: &[String]) -> Result<()> {
        check_name(name)?;
        self.files.insert(name.to_owned(), lines.concat());

        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name() {
        assert!(check_name("render.glsl").is_ok());
        assert!(check_name("..hidden").is_ok());
        assert!(check_name("").is_err());
        assert!(check_name("..").is_err());
        assert!(check_name("shaders/render.glsl").is_err());
        assert!(check_name("shaders\\render.glsl").is_err());
        assert!(check_name("my math.glsl").is_err());
        assert!(check_name("math.glsl\t").is_err());
    }

    #[test]
    fn test_split_lines_keeps_terminators() {
        assert_eq!(
            split_lines("a\r\nb\nc"),
            vec!["a\r\n".to_owned(), "b\n".to_owned(), "c".to_owned()]
        );
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_memory_store_missing_file() {
        let store = MemoryStore::new();

        let error = store.read_lines("math.glsl").unwrap_err();

        assert_eq!(
            error.downcast_ref::<io::Error>().map(io::Error::kind),
            Some(io::ErrorKind::NotFound)
        );
    }

    #[test]
    fn test_memory_store_write_then_read() {
        let mut store = MemoryStore::new();

        store
            .write_lines("a.glsl", &["x\n".to_owned(), "y".to_owned()])
            .unwrap();

        assert!(store.exists("a.glsl"));
        assert_eq!(store.get("a.glsl"), Some("x\ny"));
        assert_eq!(
            store.read_lines("a.glsl").unwrap(),
            vec!["x\n".to_owned(), "y".to_owned()]
        );
    }
}
