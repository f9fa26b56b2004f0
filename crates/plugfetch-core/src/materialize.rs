//! Turn a staged download into the installed plugin jar.
//!
//! A zip-packaged release with a configured inner entry is unpacked (one entry
//! only); anything else is renamed into place.

use regex::Regex;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::config::PluginSpec;

/// Which entry of a zip release holds the jar.
#[derive(Debug, Clone)]
pub enum ArchiveEntry {
    Exact(String),
    Pattern(Regex),
}

impl ArchiveEntry {
    pub fn from_spec(spec: &PluginSpec) -> Result<Option<Self>, regex::Error> {
        if let Some(path) = &spec.zip_path {
            return Ok(Some(ArchiveEntry::Exact(path.clone())));
        }
        spec.zip_pattern
            .as_deref()
            .map(|p| Regex::new(p).map(ArchiveEntry::Pattern))
            .transpose()
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            ArchiveEntry::Exact(path) => name == path,
            // Anchored at the start of the entry name, not at its end.
            ArchiveEntry::Pattern(re) => re.find(name).is_some_and(|m| m.start() == 0),
        }
    }

    fn describe(&self) -> String {
        match self {
            ArchiveEntry::Exact(path) => format!("'{path}'"),
            ArchiveEntry::Pattern(re) => format!("pattern /{}/", re.as_str()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error("no entry {selector} in {}", .archive.display())]
    EntryNotFound { archive: PathBuf, selector: String },
    #[error("invalid zip_pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("read archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_err(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> MaterializeError {
    let path = path.to_path_buf();
    move |source| MaterializeError::Io {
        action,
        path,
        source,
    }
}

/// How the artifact was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// The named entry was extracted from a zip release.
    Extracted { entry: String },
    /// The staged file was renamed into place.
    Moved,
}

/// An installed artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub method: Method,
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Path used while an extracted entry is written, renamed onto `dest` when complete.
fn part_path(dest: &Path) -> PathBuf {
    let mut o = dest.as_os_str().to_owned();
    o.push(".part");
    PathBuf::from(o)
}

/// Produce `<plugins_dir>/<spec.jar>` from `staged`. The staged file is gone
/// afterwards on success, either consumed by the rename or deleted after extraction.
pub fn materialize(
    staged: &Path,
    spec: &PluginSpec,
    plugins_dir: &Path,
) -> Result<Artifact, MaterializeError> {
    fs::create_dir_all(plugins_dir).map_err(io_err("create", plugins_dir))?;
    let dest = plugins_dir.join(&spec.jar);

    match ArchiveEntry::from_spec(spec)? {
        Some(entry) if is_zip(staged) => {
            let name = extract_entry(staged, &entry, &dest)?;
            fs::remove_file(staged).map_err(io_err("remove", staged))?;
            Ok(Artifact {
                path: dest,
                method: Method::Extracted { entry: name },
            })
        }
        _ => {
            fs::rename(staged, &dest).map_err(io_err("move", staged))?;
            Ok(Artifact {
                path: dest,
                method: Method::Moved,
            })
        }
    }
}

/// Write the first entry matching `entry` to `dest`; returns the entry's name.
fn extract_entry(
    archive_path: &Path,
    entry: &ArchiveEntry,
    dest: &Path,
) -> Result<String, MaterializeError> {
    let archive_err = |source| MaterializeError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };
    let file = File::open(archive_path).map_err(io_err("open", archive_path))?;
    let mut archive = zip::ZipArchive::new(file).map_err(archive_err)?;

    for i in 0..archive.len() {
        let mut zipped = archive.by_index(i).map_err(archive_err)?;
        if zipped.is_dir() || !entry.matches(zipped.name()) {
            continue;
        }
        let name = zipped.name().to_string();
        let part = part_path(dest);
        let written = File::create(&part)
            .and_then(|mut out| io::copy(&mut zipped, &mut out).and_then(|_| out.sync_all()));
        if let Err(e) = written {
            let _ = fs::remove_file(&part);
            return Err(io_err("write", &part)(e));
        }
        fs::rename(&part, dest).map_err(io_err("move", &part))?;
        tracing::debug!(entry = %name, dest = %dest.display(), "extracted archive entry");
        return Ok(name);
    }

    Err(MaterializeError::EntryNotFound {
        archive: archive_path.to_path_buf(),
        selector: entry.describe(),
    })
}
