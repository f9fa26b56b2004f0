//! Types used by the plugin state database.

/// Persisted record for one tracked plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginState {
    pub name: String,
    /// Newest version seen by an update check, if any.
    pub latest: Option<String>,
    /// Version an operator approved for installation.
    pub approved: Option<String>,
    /// Version last downloaded successfully.
    pub downloaded: Option<String>,
    pub updated_at: i64,
}

impl PluginState {
    /// The approved version when it differs from what is on disk, else None.
    pub fn pending_version(&self) -> Option<&str> {
        match &self.approved {
            Some(approved) if self.downloaded.as_deref() != Some(approved.as_str()) => {
                Some(approved.as_str())
            }
            _ => None,
        }
    }

    pub fn needs_download(&self) -> bool {
        self.pending_version().is_some()
    }
}
