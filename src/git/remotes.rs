//! Remote alias registry
//!
//! Maps repository URLs to local remote aliases. The registry keeps no state of
//! its own: every lookup re-reads the remotes configured in git, so aliases
//! created by earlier runs are found again.

use super::Vcs;
use crate::error::Result;
use std::collections::HashMap;
use tracing::debug;

/// Alias prefix used when no name suggestion is available
pub const DEFAULT_REMOTE_PREFIX: &str = "experimental";

/// Remote aliases backed by git's remote configuration
pub struct RemoteRegistry<'a> {
    vcs: &'a dyn Vcs,
}

/// Both directions of the alias/URL mapping
struct RemoteMap {
    by_name: HashMap<String, String>,
    by_url: HashMap<String, String>,
}

impl<'a> RemoteRegistry<'a> {
    /// Create a registry over the given repository
    pub fn new(vcs: &'a dyn Vcs) -> Self {
        Self { vcs }
    }

    fn load(&self) -> Result<RemoteMap> {
        let mut map = RemoteMap {
            by_name: HashMap::new(),
            by_url: HashMap::new(),
        };
        for remote in self.vcs.remotes()? {
            map.by_url.insert(remote.url.clone(), remote.name.clone());
            map.by_name.insert(remote.name, remote.url);
        }
        Ok(map)
    }

    /// Alias already registered for `url`
    pub fn get_remote(&self, url: &str) -> Result<Option<String>> {
        Ok(self.load()?.by_url.remove(url))
    }

    /// Return the alias for `url`, registering a new remote when needed.
    ///
    /// New aliases are `suggestion`, `suggestion-1`, `suggestion-2`, ... (first
    /// unused wins); an empty suggestion uses [`DEFAULT_REMOTE_PREFIX`].
    pub fn create_remote(&self, url: &str, suggestion: &str) -> Result<String> {
        let mut map = self.load()?;

        if let Some(existing) = map.by_url.remove(url) {
            debug!(url, remote = %existing, "remote already registered");
            return Ok(existing);
        }

        let prefix = if suggestion.is_empty() {
            DEFAULT_REMOTE_PREFIX
        } else {
            suggestion
        };

        let name = (0u32..)
            .map(|i| {
                if i == 0 {
                    prefix.to_string()
                } else {
                    format!("{prefix}-{i}")
                }
            })
            .find(|candidate| !map.by_name.contains_key(candidate))
            .unwrap_or_else(|| prefix.to_string());

        debug!(url, remote = %name, "adding remote");
        self.vcs.add_remote(&name, url)?;
        Ok(name)
    }
}
