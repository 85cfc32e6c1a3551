use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use pomgraph_util::errors::{GraphError, GraphResult};

use crate::dependency::Scope;

/// User configuration loaded from `~/.pomgraph/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub scopes: ScopePolicy,

    #[serde(default)]
    pub exclusions: ExclusionPolicy,

    #[serde(default)]
    pub repository: RepositoryConfig,
}

/// Which declared dependencies become edges, from `[scopes]`.
///
/// `compile` and `runtime` dependencies are always kept. The switches below
/// only ever admit direct dependencies of the root, except `optional`.
/// Test dependencies below the root are never kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopePolicy {
    /// Keep `provided` and `system` dependencies of the root.
    #[serde(default)]
    pub provided: bool,
    /// Keep `test` dependencies of the root. On by default.
    #[serde(default = "default_true")]
    pub test: bool,
    /// Keep optional dependencies of non-root artifacts.
    #[serde(default)]
    pub optional: bool,
}

impl Default for ScopePolicy {
    fn default() -> Self {
        Self {
            provided: false,
            test: true,
            optional: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl ScopePolicy {
    /// Whether a dependency declared at `depth` (0 = declared by the root)
    /// becomes an edge.
    pub fn admits(&self, scope: Scope, depth: usize, optional: bool) -> bool {
        if optional && depth > 0 && !self.optional {
            return false;
        }
        match scope {
            Scope::Compile | Scope::Runtime => true,
            Scope::Provided | Scope::System => self.provided && depth == 0,
            Scope::Test => self.test && depth == 0,
            Scope::Import => false,
        }
    }
}

/// How far exclusions reach, from `[exclusions]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionPropagation {
    /// An exclusion applies to the whole subtree below the dependency that
    /// declares it.
    #[default]
    Transitive,
    /// An exclusion only filters the direct dependencies of the dependency
    /// that declares it.
    Direct,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionPolicy {
    #[serde(default)]
    pub propagation: ExclusionPropagation,
}

/// Local repository settings from `[repository]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default = "default_local_repository")]
    pub local: String,
    #[serde(default = "default_relocation_limit", rename = "relocation-limit")]
    pub relocation_limit: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            local: default_local_repository(),
            relocation_limit: default_relocation_limit(),
        }
    }
}

fn default_local_repository() -> String {
    "~/.m2/repository".to_string()
}

fn default_relocation_limit() -> usize {
    8
}

impl RepositoryConfig {
    /// The local repository root with `~` expanded.
    pub fn local_path(&self) -> PathBuf {
        pomgraph_util::fs::expand_home(&self.local)
    }
}

impl GraphConfig {
    /// Load `~/.pomgraph/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> GraphResult<Self> {
        let path = Self::default_path();
        if path.is_file() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> GraphResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GraphError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> GraphResult<Self> {
        toml::from_str(content).map_err(|e| {
            GraphError::Config {
                message: format!("Failed to parse config: {e}"),
            }
            .into()
        })
    }

    /// Returns the default path to the config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the pomgraph data directory (`~/.pomgraph/`).
pub fn dirs_path() -> PathBuf {
    pomgraph_util::fs::home_dir().join(".pomgraph")
}
