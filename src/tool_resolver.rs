//! # Tool Path Resolver
//!
//! Trova il binario del tool di compressione esterno:
//! - Path esplicito configurato dall'utente
//! - Tool installato nel `PATH` di sistema
//! - Nomi alternativi per piattaforma (gswin64c/gswin32c su Windows)

use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tool path resolver for the external compression binary
pub struct ToolPathResolver {
    search_path: Option<std::ffi::OsString>,
}

impl ToolPathResolver {
    /// Create a resolver over the current `PATH`
    pub fn new() -> Self {
        Self {
            search_path: env::var_os("PATH"),
        }
    }

    /// Create a resolver over an explicit search path
    pub fn with_search_path(search_path: impl Into<std::ffi::OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    /// Resolve the path to a specific tool.
    ///
    /// A name containing a path separator is taken as a path and only checked
    /// for existence.
    pub fn resolve_tool(&self, tool_name: &str) -> Option<PathBuf> {
        debug!("Resolving tool: {}", tool_name);

        let candidate = Path::new(tool_name);
        if candidate.components().count() > 1 {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }

        Self::candidate_names(tool_name)
            .into_iter()
            .find_map(|name| self.find_in_system_path(&name))
    }

    /// Names tried for a tool on this platform
    fn candidate_names(tool_name: &str) -> Vec<String> {
        if cfg!(windows) {
            let mut names = vec![format!("{}.exe", tool_name)];
            if tool_name == "gs" {
                names.push("gswin64c.exe".to_string());
                names.push("gswin32c.exe".to_string());
            }
            names
        } else {
            vec![tool_name.to_string()]
        }
    }

    /// Find tool in system PATH
    fn find_in_system_path(&self, file_name: &str) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        env::split_paths(search_path)
            .map(|dir| dir.join(file_name))
            .find(|path| path.is_file())
    }

    /// Check if a specific tool is available
    pub fn is_tool_available(&self, tool_name: &str) -> bool {
        self.resolve_tool(tool_name).is_some()
    }

    /// Installation hint shown when a tool is missing
    pub fn install_instructions(tool_name: &str) -> String {
        let package = match tool_name {
            "gs" | "gswin64c" | "gswin32c" => "ghostscript",
            other => other,
        };

        if cfg!(target_os = "linux") {
            format!("sudo apt-get install {}", package)
        } else if cfg!(target_os = "macos") {
            format!("brew install {}", package)
        } else {
            format!("install {} and make sure it is on PATH", package)
        }
    }

    /// Resolve a tool or explain how to install it
    pub fn check_tool_with_instructions(&self, tool_name: &str) -> Result<PathBuf, String> {
        self.resolve_tool(tool_name).ok_or_else(|| {
            format!(
                "Tool '{}' not found in system PATH. To install, run: {}",
                tool_name,
                Self::install_instructions(tool_name)
            )
        })
    }
}

impl Default for ToolPathResolver {
    fn default() -> Self {
        Self::new()
    }
}
