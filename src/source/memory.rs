use std::collections::BTreeMap;

use crate::{
    foundation::error::{RadarError, RadarResult},
    source::{AssetSource, dir::normalize_rel_path},
};

/// Map-backed asset source for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    dirs: BTreeMap<String, Vec<(String, Vec<u8>)>>,
    fetches: Vec<String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file. Listing order is insertion order.
    ///
    /// `dir` is normalized the same way lookups are, so a token that could never be listed
    /// (absolute escape, `..`) is rejected here.
    pub fn insert(
        &mut self,
        dir: &str,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> RadarResult<()> {
        let dir = normalize_rel_path(dir)?;
        let name = name.into();
        let files = self.dirs.entry(dir).or_default();
        match files.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = bytes,
            None => files.push((name, bytes)),
        }
        Ok(())
    }

    /// Names fetched so far, in fetch order.
    pub fn fetches(&self) -> &[String] {
        &self.fetches
    }
}

impl AssetSource for InMemorySource {
    fn list_names(&mut self, dir: &str) -> RadarResult<Vec<String>> {
        let key = normalize_rel_path(dir)?;
        let files = self
            .dirs
            .get(&key)
            .ok_or_else(|| RadarError::retrieval(format!("no such directory '{dir}'")))?;
        Ok(files.iter().map(|(n, _)| n.clone()).collect())
    }

    fn fetch_bytes(&mut self, dir: &str, name: &str) -> RadarResult<Vec<u8>> {
        let key = normalize_rel_path(dir)?;
        let bytes = self
            .dirs
            .get(&key)
            .and_then(|files| files.iter().find(|(n, _)| n == name))
            .map(|(_, b)| b.clone())
            .ok_or_else(|| RadarError::retrieval(format!("no such file '{name}' in '{dir}'")))?;
        self.fetches.push(name.to_string());
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/memory.rs"]
mod tests;
