//! Local Maven repository layout: `<root>/<group path>/<name>/<version>/`.

use std::fs;
use std::path::{Path, PathBuf};

use pomgraph_core::identity::ArtifactId;
use pomgraph_util::errors::{GraphError, GraphResult};

use crate::pom::{self, Pom};

/// A directory laid out like `~/.m2/repository`.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of this repository.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every version of `group:name`.
    pub fn versions_dir(&self, group: &str, name: &str) -> PathBuf {
        self.root.join(group.replace('.', "/")).join(name)
    }

    /// Directory for one coordinate.
    pub fn artifact_dir(&self, id: &ArtifactId) -> PathBuf {
        self.versions_dir(&id.group, &id.name).join(&id.version)
    }

    pub fn pom_path(&self, id: &ArtifactId) -> PathBuf {
        self.artifact_dir(id)
            .join(format!("{}-{}.pom", id.name, id.version))
    }

    /// Path of the artifact binary, e.g. `lib-1.0-sources.jar`.
    pub fn artifact_path(
        &self,
        id: &ArtifactId,
        classifier: Option<&str>,
        extension: &str,
    ) -> PathBuf {
        let filename = match classifier {
            Some(c) => format!("{}-{}-{c}.{extension}", id.name, id.version),
            None => format!("{}-{}.{extension}", id.name, id.version),
        };
        self.artifact_dir(id).join(filename)
    }

    /// Read and parse the POM for a coordinate. `Ok(None)` if there is none.
    pub fn read_pom(&self, id: &ArtifactId) -> GraphResult<Option<Pom>> {
        let path = self.pom_path(id);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(GraphError::Io)?;
        pom::parse_pom(&content)
            .map(Some)
            .map_err(|e| e.wrap_err(format!("in {}", path.display())))
    }

    /// Size in bytes of the artifact binary, if present.
    pub fn artifact_size(
        &self,
        id: &ArtifactId,
        classifier: Option<&str>,
        extension: &str,
    ) -> Option<u64> {
        pomgraph_util::fs::file_size(&self.artifact_path(id, classifier, extension))
    }

    /// Versions of `group:name` that have a directory in this repository.
    pub fn available_versions(&self, group: &str, name: &str) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.versions_dir(group, name)) else {
            return Vec::new();
        };
        let mut versions: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        versions.sort();
        versions
    }

    /// Store a file under a coordinate, creating directories as needed.
    pub fn put(&self, id: &ArtifactId, filename: &str, data: &[u8]) -> GraphResult<PathBuf> {
        let dir = self.artifact_dir(id);
        pomgraph_util::fs::ensure_dir(&dir).map_err(GraphError::Io)?;
        let path = dir.join(filename);
        fs::write(&path, data).map_err(GraphError::Io)?;
        Ok(path)
    }

    pub fn put_pom(&self, id: &ArtifactId, pom_xml: &str) -> GraphResult<PathBuf> {
        let filename = format!("{}-{}.pom", id.name, id.version);
        self.put(id, &filename, pom_xml.as_bytes())
    }

    pub fn put_jar(
        &self,
        id: &ArtifactId,
        classifier: Option<&str>,
        data: &[u8],
    ) -> GraphResult<PathBuf> {
        let path = self.artifact_path(id, classifier, "jar");
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default();
        self.put(id, &filename, data)
    }
}

/// File extension of the main artifact for a POM packaging.
pub fn extension_for(packaging: Option<&str>) -> &'static str {
    match packaging.unwrap_or("jar") {
        "pom" => "pom",
        "war" => "war",
        "ear" => "ear",
        "rar" => "rar",
        "aar" => "aar",
        _ => "jar",
    }
}
