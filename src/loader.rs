use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use log::debug;

use crate::error::{DocsError, DocsResult};

/// Reference to markdown or a code sample on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    pub path: String,
    pub is_absolute: bool,
}

/// Reads external documentation content relative to a base directory
#[derive(Debug, Clone)]
pub struct ContentLoader {
    base_dir: PathBuf,
    cache: Option<Arc<Mutex<HashMap<PathBuf, String>>>>,
}

impl Default for ContentLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ContentLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            cache: None,
        }
    }

    /// Keep every file read for the lifetime of the loader
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(Arc::new(Mutex::new(HashMap::new())));
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve(&self, content: &ContentRef) -> PathBuf {
        if content.is_absolute {
            PathBuf::from(&content.path)
        } else {
            // A leading separator on a relative reference would make `join` discard the base
            self.base_dir.join(content.path.trim_start_matches(|c: char| c == '/' || c == '\\'))
        }
    }

    pub fn load(&self, content: &ContentRef) -> DocsResult<String> {
        let path = self.resolve(content);

        if let Some(cache) = &self.cache {
            if let Some(text) = cache.lock().ok().and_then(|c| c.get(&path).cloned()) {
                return Ok(text);
            }
        }

        if !path.is_file() {
            return Err(DocsError::ContentNotFound { path });
        }
        debug!("Loading documentation content from {:?}", path);
        let text = fs::read_to_string(&path)?;

        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.insert(path, text.clone());
            }
        }
        Ok(text)
    }
}
