// src/resolve/runfiles.rs

//! Runfiles lookup.
//!
//! Bazel lays out a binary's data dependencies either as a manifest file
//! (`logical/path /real/path` per line) or as a symlink tree directory.
//! [`RunfilesConfig`] decides which one applies; [`Runfiles`] answers
//! lookups against it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{MultirunError, Result};
use crate::fs::FileSystem;

pub const MANIFEST_ENV: &str = "RUNFILES_MANIFEST_FILE";
pub const DIR_ENV: &str = "RUNFILES_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunfilesSource {
    Manifest(PathBuf),
    Directory(PathBuf),
}

/// Where runfiles live for this invocation.
///
/// `inherited` is true when the location came from the environment, in which
/// case children already see it and nothing needs to be exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunfilesConfig {
    pub source: RunfilesSource,
    pub inherited: bool,
}

impl RunfilesConfig {
    /// Pick the runfiles location.
    ///
    /// Priority:
    /// 1. `RUNFILES_MANIFEST_FILE`
    /// 2. `RUNFILES_DIR`
    /// 3. `<exe>.runfiles_manifest`
    /// 4. `<exe>.runfiles/MANIFEST`
    /// 5. `<exe>.runfiles/`
    pub fn discover(
        manifest_env: Option<PathBuf>,
        dir_env: Option<PathBuf>,
        exe: &Path,
        fs: &dyn FileSystem,
    ) -> Result<Self> {
        if let Some(manifest) = manifest_env.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(Self::inherited(RunfilesSource::Manifest(manifest)));
        }
        if let Some(dir) = dir_env.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(Self::inherited(RunfilesSource::Directory(dir)));
        }

        let exe = exe.as_os_str().to_string_lossy();
        let manifest = PathBuf::from(format!("{exe}.runfiles_manifest"));
        if fs.is_file(&manifest) {
            return Ok(Self::adjacent(RunfilesSource::Manifest(manifest)));
        }

        let dir = PathBuf::from(format!("{exe}.runfiles"));
        let dir_manifest = dir.join("MANIFEST");
        if fs.is_file(&dir_manifest) {
            return Ok(Self::adjacent(RunfilesSource::Manifest(dir_manifest)));
        }
        if fs.is_dir(&dir) {
            return Ok(Self::adjacent(RunfilesSource::Directory(dir)));
        }

        Err(MultirunError::RunfilesNotFound(format!(
            "neither {MANIFEST_ENV} nor {DIR_ENV} is set and no runfiles exist next to {exe}"
        )))
    }

    fn inherited(source: RunfilesSource) -> Self {
        Self { source, inherited: true }
    }

    fn adjacent(source: RunfilesSource) -> Self {
        Self { source, inherited: false }
    }

    /// Variable children need in order to find the same runfiles, if they
    /// would not inherit it already.
    pub fn exported_env(&self) -> Option<(String, String)> {
        if self.inherited {
            return None;
        }
        Some(match &self.source {
            RunfilesSource::Manifest(p) => (MANIFEST_ENV.to_string(), p.display().to_string()),
            RunfilesSource::Directory(p) => (DIR_ENV.to_string(), p.display().to_string()),
        })
    }
}

#[derive(Debug, Clone)]
enum Lookup {
    Manifest(HashMap<String, String>),
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Runfiles {
    lookup: Lookup,
}

impl Runfiles {
    pub fn open(config: &RunfilesConfig, fs: &dyn FileSystem) -> Result<Self> {
        match &config.source {
            RunfilesSource::Manifest(path) => {
                let contents = fs.read_to_string(path).map_err(|e| {
                    MultirunError::RunfilesNotFound(format!("cannot read manifest {:?}: {e:#}", path))
                })?;
                Ok(Self::from_manifest_str(&contents))
            }
            RunfilesSource::Directory(dir) => Ok(Self {
                lookup: Lookup::Directory(dir.clone()),
            }),
        }
    }

    pub fn from_manifest_str(contents: &str) -> Self {
        let mut entries = HashMap::new();
        for line in contents.lines() {
            if let Some((key, value)) = parse_manifest_line(line) {
                entries.insert(key, value);
            }
        }
        debug!(entries = entries.len(), "parsed runfiles manifest");
        Self {
            lookup: Lookup::Manifest(entries),
        }
    }

    /// Real location of a runfiles-relative path, if it is known.
    pub fn rlocation(&self, path: &str, fs: &dyn FileSystem) -> Option<PathBuf> {
        match &self.lookup {
            Lookup::Manifest(entries) => manifest_lookup(entries, path),
            Lookup::Directory(dir) => {
                let candidate = dir.join(path);
                fs.exists(&candidate).then_some(candidate)
            }
        }
    }
}

fn manifest_lookup(entries: &HashMap<String, String>, path: &str) -> Option<PathBuf> {
    if let Some(real) = entries.get(path) {
        return non_empty(real).map(PathBuf::from);
    }

    // Directory entries: `a/b` maps `a/b/c/d` to `<real>/c/d`.
    let mut prefix = path;
    while let Some(idx) = prefix.rfind('/') {
        prefix = &prefix[..idx];
        if let Some(real) = entries.get(prefix).and_then(|r| non_empty(r)) {
            return Some(Path::new(real).join(&path[idx + 1..]));
        }
    }
    None
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// Split one manifest line into `(logical, real)`.
///
/// A leading space marks the escaped form, where `\s`, `\n` and `\b` stand
/// for space, newline and backslash.
fn parse_manifest_line(line: &str) -> Option<(String, String)> {
    if line.is_empty() {
        return None;
    }
    match line.strip_prefix(' ') {
        Some(escaped) => {
            let (key, value) = escaped.split_once(' ')?;
            Some((unescape(key), unescape(value)))
        }
        None => match line.split_once(' ') {
            Some((key, value)) => Some((key.to_string(), value.to_string())),
            None => Some((line.to_string(), String::new())),
        },
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('b') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
