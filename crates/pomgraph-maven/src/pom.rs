//! POM file parsing: dependency declarations, parent inheritance, property
//! interpolation, BOM imports and relocation records.

use std::collections::BTreeMap;

use pomgraph_core::dependency::{DependencyManagement, ExclusionSet, ManagedDependency};
use pomgraph_core::identity::{ArtifactId, ArtifactKey};
use pomgraph_util::errors::{GraphError, GraphResult};
use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed POM (Project Object Model) file.
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
    pub relocation: Option<Relocation>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone, Default)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ParentRef {
    pub fn identity(&self) -> ArtifactId {
        ArtifactId::new(&self.group_id, &self.artifact_id, &self.version)
    }
}

/// A dependency declared in a POM file.
#[derive(Debug, Clone, Default)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub classifier: Option<String>,
    pub type_: Option<String>,
    pub exclusions: Vec<PomExclusion>,
}

impl PomDependency {
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(&self.group_id, &self.artifact_id)
    }

    /// Exclusions as a set; a missing `artifactId` excludes the whole group.
    pub fn exclusion_set(&self) -> ExclusionSet {
        let mut set = ExclusionSet::new();
        for excl in &self.exclusions {
            match excl.artifact_id.as_deref() {
                Some(name) => set.insert(ArtifactKey::new(&excl.group_id, name)),
                None => set.insert_group(&excl.group_id),
            };
        }
        set
    }

    fn is_bom_import(&self) -> bool {
        self.scope.as_deref() == Some("import") && self.type_.as_deref() == Some("pom")
    }
}

/// An exclusion within a dependency declaration.
#[derive(Debug, Clone, Default)]
pub struct PomExclusion {
    pub group_id: String,
    pub artifact_id: Option<String>,
}

/// `<distributionManagement><relocation>`: every field is optional and
/// defaults to the relocated POM's own coordinate.
#[derive(Debug, Clone, Default)]
pub struct Relocation {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub message: Option<String>,
}

impl Relocation {
    /// The coordinate this relocation points to, starting from `current`.
    pub fn target(&self, current: &ArtifactId) -> ArtifactId {
        ArtifactId::new(
            self.group_id.as_deref().unwrap_or(&current.group),
            self.artifact_id.as_deref().unwrap_or(&current.name),
            self.version.as_deref().unwrap_or(&current.version),
        )
    }
}

impl Pom {
    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Resolve `${property}` references using POM properties and built-in
    /// project variables. Unknown properties are left in place.
    pub fn interpolate(&self, input: &str) -> String {
        let mut result = input.to_string();
        for _ in 0..20 {
            if !result.contains("${") {
                break;
            }
            let mut out = String::with_capacity(result.len());
            let mut rest = result.as_str();
            while let Some(start) = rest.find("${") {
                let Some(len) = rest[start..].find('}') else {
                    break;
                };
                out.push_str(&rest[..start]);
                let key = &rest[start + 2..start + len];
                match self.resolve_property(key) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&rest[start..=start + len]),
                }
                rest = &rest[start + len + 1..];
            }
            out.push_str(rest);
            if out == result {
                break;
            }
            result = out;
        }
        result
    }

    fn resolve_property(&self, key: &str) -> Option<String> {
        match key {
            "project.groupId" | "pom.groupId" => self.effective_group_id().map(str::to_string),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.clone(),
            "project.version" | "pom.version" => self.effective_version().map(str::to_string),
            "project.parent.groupId" => self.parent.as_ref().map(|p| p.group_id.clone()),
            "project.parent.version" => self.parent.as_ref().map(|p| p.version.clone()),
            _ => self.properties.get(key).cloned(),
        }
    }

    /// Interpolate all property references in dependencies, dependency
    /// management and the relocation record.
    pub fn resolve_properties(&mut self) {
        let snapshot = self.clone();
        let all = self
            .dependencies
            .iter_mut()
            .chain(self.dependency_management.iter_mut());
        for dep in all {
            dep.group_id = snapshot.interpolate(&dep.group_id);
            dep.artifact_id = snapshot.interpolate(&dep.artifact_id);
            for field in [&mut dep.version, &mut dep.scope, &mut dep.classifier] {
                if let Some(v) = field.as_mut() {
                    *v = snapshot.interpolate(v);
                }
            }
        }
        if let Some(reloc) = self.relocation.as_mut() {
            for field in [&mut reloc.group_id, &mut reloc.artifact_id, &mut reloc.version] {
                if let Some(v) = field.as_mut() {
                    *v = snapshot.interpolate(v);
                }
            }
        }
    }

    /// Merge a parent POM's properties and dependency management into this POM.
    pub fn apply_parent(&mut self, parent: &Pom) {
        for (k, v) in &parent.properties {
            self.properties
                .entry(k.clone())
                .or_insert_with(|| v.clone());
        }
        if self.group_id.is_none() {
            self.group_id = parent.effective_group_id().map(str::to_string);
        }
        if self.version.is_none() {
            self.version = parent.effective_version().map(str::to_string);
        }
        self.merge_management(&parent.dependency_management);
    }

    /// Add managed entries whose `group:artifact` this POM doesn't manage yet.
    pub fn merge_management(&mut self, entries: &[PomDependency]) {
        for dm in entries {
            let managed = self
                .dependency_management
                .iter()
                .any(|d| d.group_id == dm.group_id && d.artifact_id == dm.artifact_id);
            if !managed {
                self.dependency_management.push(dm.clone());
            }
        }
    }

    /// Look up a version from dependency management for a given group:artifact.
    pub fn managed_version(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        self.managed(group_id, artifact_id)
            .and_then(|d| d.version.as_deref())
    }

    /// Look up a scope from dependency management for a given group:artifact.
    pub fn managed_scope(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        self.managed(group_id, artifact_id)
            .and_then(|d| d.scope.as_deref())
    }

    fn managed(&self, group_id: &str, artifact_id: &str) -> Option<&PomDependency> {
        self.dependency_management
            .iter()
            .filter(|d| !d.is_bom_import())
            .find(|d| d.group_id == group_id && d.artifact_id == artifact_id)
    }

    /// BOM imports from dependency management
    /// (entries with `scope = "import"` and `type = "pom"`).
    pub fn bom_imports(&self) -> Vec<&PomDependency> {
        self.dependency_management
            .iter()
            .filter(|d| d.is_bom_import())
            .collect()
    }

    /// The dependency-management section as a context for descendants.
    pub fn management(&self) -> DependencyManagement {
        self.dependency_management
            .iter()
            .filter(|d| !d.is_bom_import())
            .map(|d| {
                (
                    d.key(),
                    ManagedDependency {
                        version: d.version.clone(),
                        scope: d.scope.clone(),
                    },
                )
            })
            .collect()
    }
}

/// Parse a POM XML string into a `Pom` struct.
pub fn parse_pom(xml: &str) -> GraphResult<Pom> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();

    let mut current_dep: Option<PomDependency> = None;
    let mut current_exclusion: Option<PomExclusion> = None;
    let mut current_parent: Option<ParentRef> = None;
    let mut current_relocation: Option<Relocation> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
                text.clear();

                match path.join(">").as_str() {
                    DEPENDENCY | MANAGED_DEPENDENCY => current_dep = Some(PomDependency::default()),
                    ctx if ctx.ends_with(">exclusions>exclusion") && current_dep.is_some() => {
                        current_exclusion = Some(PomExclusion::default());
                    }
                    "project>parent" => current_parent = Some(ParentRef::default()),
                    RELOCATION => current_relocation = Some(Relocation::default()),
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                text = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path.join(">");
                let leaf = path.last().map(String::as_str).unwrap_or_default();
                let value = text.trim().to_string();

                if path.len() == 3 && path[1] == "properties" {
                    pom.properties.insert(leaf.to_string(), value.clone());
                }

                if let Some(dep) = current_dep.as_mut() {
                    if let Some(excl) = current_exclusion.as_mut() {
                        match leaf {
                            "groupId" => excl.group_id = value.clone(),
                            "artifactId" if value != "*" => excl.artifact_id = Some(value.clone()),
                            _ => {}
                        }
                        if ctx.ends_with(">exclusions>exclusion") {
                            if let Some(excl) = current_exclusion.take() {
                                dep.exclusions.push(excl);
                            }
                        }
                    } else if ctx.ends_with(">dependency>groupId") {
                        dep.group_id = value.clone();
                    } else if ctx.ends_with(">dependency>artifactId") {
                        dep.artifact_id = value.clone();
                    } else if ctx.ends_with(">dependency>version") {
                        dep.version = Some(value.clone());
                    } else if ctx.ends_with(">dependency>scope") {
                        dep.scope = Some(value.clone());
                    } else if ctx.ends_with(">dependency>optional") {
                        dep.optional = value == "true";
                    } else if ctx.ends_with(">dependency>classifier") {
                        dep.classifier = Some(value.clone());
                    } else if ctx.ends_with(">dependency>type") {
                        dep.type_ = Some(value.clone());
                    }

                    if ctx == DEPENDENCY || ctx == MANAGED_DEPENDENCY {
                        if let Some(dep) = current_dep.take() {
                            if ctx == MANAGED_DEPENDENCY {
                                pom.dependency_management.push(dep);
                            } else {
                                pom.dependencies.push(dep);
                            }
                        }
                    }
                }

                if let Some(parent) = current_parent.as_mut() {
                    match ctx.as_str() {
                        "project>parent>groupId" => parent.group_id = value.clone(),
                        "project>parent>artifactId" => parent.artifact_id = value.clone(),
                        "project>parent>version" => parent.version = value.clone(),
                        _ => {}
                    }
                    if ctx == "project>parent" {
                        pom.parent = current_parent.take();
                    }
                }

                if let Some(reloc) = current_relocation.as_mut() {
                    match leaf {
                        "groupId" => reloc.group_id = Some(value.clone()),
                        "artifactId" => reloc.artifact_id = Some(value.clone()),
                        "version" => reloc.version = Some(value.clone()),
                        "message" => reloc.message = Some(value.clone()),
                        _ => {}
                    }
                    if ctx == RELOCATION {
                        pom.relocation = current_relocation.take();
                    }
                }

                if path.len() == 2 {
                    match leaf {
                        "groupId" => pom.group_id = Some(value),
                        "artifactId" => pom.artifact_id = Some(value),
                        "version" => pom.version = Some(value),
                        "packaging" => pom.packaging = Some(value),
                        _ => {}
                    }
                }

                path.pop();
                text.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(GraphError::Pom {
                    message: format!("Failed to parse POM XML: {e}"),
                }
                .into());
            }
            _ => {}
        }
    }

    Ok(pom)
}

const DEPENDENCY: &str = "project>dependencies>dependency";
const MANAGED_DEPENDENCY: &str = "project>dependencyManagement>dependencies>dependency";
const RELOCATION: &str = "project>distributionManagement>relocation";
