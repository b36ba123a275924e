use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{RadarError, RadarResult},
    source::AssetSource,
};

/// Serves assets from a local mirror of the remote directory tree.
///
/// Directory tokens such as `anon/gen/radar` are resolved relative to `root`.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_dir(&self, dir: &str) -> RadarResult<PathBuf> {
        let rel = normalize_rel_path(dir)?;
        Ok(if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel)
        })
    }
}

impl AssetSource for DirSource {
    fn list_names(&mut self, dir: &str) -> RadarResult<Vec<String>> {
        let path = self.resolve_dir(dir)?;
        let entries = std::fs::read_dir(&path).map_err(|e| {
            RadarError::retrieval(format!("list directory '{}': {e}", path.display()))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                RadarError::retrieval(format!("read entry in '{}': {e}", path.display()))
            })?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        // read_dir order is platform-dependent
        names.sort();
        Ok(names)
    }

    fn fetch_bytes(&mut self, dir: &str, name: &str) -> RadarResult<Vec<u8>> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(RadarError::validation(format!(
                "asset name '{name}' must be a plain file name"
            )));
        }
        let path = self.resolve_dir(dir)?.join(name);
        std::fs::read(&path)
            .map_err(|e| RadarError::retrieval(format!("read '{}': {e}", path.display())))
    }
}

/// Normalize a directory token into a relative path.
///
/// The result uses `/` separators and drops empty and `.` segments. Leading `/` is stripped
/// (remote tokens are written as absolute paths); `..` is rejected. An empty result means the
/// mirror root.
pub fn normalize_rel_path(source: &str) -> RadarResult<String> {
    let s = source.replace('\\', "/");

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(RadarError::validation(format!(
                "directory '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/source/dir.rs"]
mod tests;
