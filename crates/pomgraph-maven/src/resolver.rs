//! [`ArtifactResolver`] backed by a local Maven repository.

use std::cell::RefCell;
use std::collections::HashMap;

use pomgraph_core::config::RepositoryConfig;
use pomgraph_core::dependency::{DependencyDescriptor, Scope};
use pomgraph_core::identity::ArtifactId;
use pomgraph_core::resolve::{
    ArtifactResolver, Resolution, ResolveRequest, ResolvedArtifact, ResolvedDependency,
};
use pomgraph_core::version::VersionRange;
use pomgraph_util::errors::{GraphError, GraphResult};

use crate::pom::Pom;
use crate::repository::{extension_for, LocalRepository};

const MAX_PARENT_DEPTH: usize = 16;
const MAX_IMPORT_DEPTH: usize = 4;

/// Resolves artifacts from POMs and binaries in a [`LocalRepository`].
///
/// Raw POMs are cached per resolver, so reusing one resolver across several
/// graph builds avoids re-reading shared parents.
pub struct LocalRepositoryResolver {
    repository: LocalRepository,
    relocation_limit: usize,
    poms: RefCell<HashMap<ArtifactId, Option<Pom>>>,
}

impl LocalRepositoryResolver {
    pub fn new(repository: LocalRepository) -> Self {
        Self {
            repository,
            relocation_limit: RepositoryConfig::default().relocation_limit,
            poms: RefCell::new(HashMap::new()),
        }
    }

    /// Build a resolver for the `[repository]` section of the configuration.
    pub fn from_config(config: &RepositoryConfig) -> Self {
        Self::new(LocalRepository::new(config.local_path()))
            .with_relocation_limit(config.relocation_limit)
    }

    pub fn with_relocation_limit(mut self, limit: usize) -> Self {
        self.relocation_limit = limit;
        self
    }

    pub fn repository(&self) -> &LocalRepository {
        &self.repository
    }

    /// Raw POM for a coordinate, read through the cache.
    ///
    /// A POM that fails to parse is cached as absent after the first warning.
    fn raw_pom(&self, id: &ArtifactId) -> Option<Pom> {
        if let Some(cached) = self.poms.borrow().get(id) {
            return cached.clone();
        }
        let pom = match self.repository.read_pom(id) {
            Ok(pom) => pom,
            Err(e) => {
                tracing::warn!("Ignoring unreadable POM for {id}: {e}");
                None
            }
        };
        self.poms.borrow_mut().insert(id.clone(), pom.clone());
        pom
    }

    /// Replace a version range with the highest locally available match.
    fn pin_version(&self, id: &ArtifactId) -> GraphResult<ArtifactId> {
        let Some(range) = VersionRange::parse(&id.version) else {
            return Ok(id.clone());
        };
        let available = self.repository.available_versions(&id.group, &id.name);
        match range.select_highest(available.iter().map(String::as_str)) {
            Some(version) => {
                tracing::debug!("Range {id} pinned to {version}");
                Ok(id.with_version(version))
            }
            None => Err(GraphError::NotFound {
                coordinate: id.to_string(),
            }
            .into()),
        }
    }

    /// Follow relocation records from `id`. Returns the final coordinate and
    /// its POM, if one exists.
    fn follow_relocations(&self, id: &ArtifactId) -> GraphResult<(ArtifactId, Option<Pom>)> {
        let mut current = id.clone();
        for _ in 0..=self.relocation_limit {
            let pom = self.raw_pom(&current);
            let Some(target) = pom
                .as_ref()
                .and_then(|p| p.relocation.as_ref())
                .map(|r| r.target(&current))
            else {
                return Ok((current, pom));
            };
            if target == current {
                return Ok((current, pom));
            }
            tracing::debug!("{current} relocated to {target}");
            current = target;
        }
        Err(GraphError::Relocation {
            message: format!(
                "{id} exceeds {} relocation hops",
                self.relocation_limit
            ),
        }
        .into())
    }

    /// Merge parents and BOM imports into `pom`, then interpolate properties.
    fn effective_pom(&self, pom: Pom) -> Pom {
        self.effective_pom_at(pom, 0)
    }

    fn effective_pom_at(&self, mut pom: Pom, import_depth: usize) -> Pom {
        let mut next_parent = pom.parent.clone();
        let mut depth = 0;
        while let Some(parent_ref) = next_parent.take() {
            depth += 1;
            let parent_id = parent_ref.identity();
            if depth > MAX_PARENT_DEPTH {
                tracing::warn!("Parent chain too deep at {parent_id}");
                break;
            }
            match self.raw_pom(&parent_id) {
                Some(parent) => {
                    pom.apply_parent(&parent);
                    next_parent = parent.parent;
                }
                None => tracing::warn!("Parent POM {parent_id} not found"),
            }
        }
        pom.resolve_properties();

        if import_depth >= MAX_IMPORT_DEPTH {
            return pom;
        }
        let imports: Vec<ArtifactId> = pom
            .bom_imports()
            .iter()
            .filter_map(|bom| {
                let version = bom.version.as_deref()?;
                Some(ArtifactId::new(&bom.group_id, &bom.artifact_id, version))
            })
            .collect();
        for bom_id in imports {
            match self.raw_pom(&bom_id) {
                Some(bom) => {
                    let bom = self.effective_pom_at(bom, import_depth + 1);
                    pom.merge_management(&bom.dependency_management);
                }
                None => tracing::warn!("BOM {bom_id} not found"),
            }
        }
        pom
    }
}

impl ArtifactResolver for LocalRepositoryResolver {
    fn resolve(&self, request: &ResolveRequest<'_>) -> GraphResult<Resolution> {
        let requested = request.identity;
        let pinned = self.pin_version(requested)?;
        let (actual, pom) = self.follow_relocations(&pinned)?;

        let pom = pom.map(|p| self.effective_pom(p));
        let extension = extension_for(pom.as_ref().and_then(|p| p.packaging.as_deref()));
        let size = self
            .repository
            .artifact_size(&actual, request.classifier, extension);

        let Some(pom) = pom else {
            if size.is_none() {
                return Err(GraphError::NotFound {
                    coordinate: actual.to_string(),
                }
                .into());
            }
            tracing::debug!("No POM for {actual}, assuming no dependencies");
            return Ok(Resolution {
                artifact: ResolvedArtifact::new(actual, size),
                ..Resolution::unresolved(requested.clone())
            });
        };

        let mut dependencies = Vec::with_capacity(pom.dependencies.len());
        for dep in &pom.dependencies {
            let version = dep.version.clone().or_else(|| {
                pom.managed_version(&dep.group_id, &dep.artifact_id)
                    .map(str::to_string)
            });
            let Some(version) = version.filter(|v| !v.is_empty()) else {
                tracing::warn!(
                    "{actual}: no version for {}:{}, skipping",
                    dep.group_id,
                    dep.artifact_id
                );
                continue;
            };
            let scope = dep
                .scope
                .clone()
                .or_else(|| {
                    pom.managed_scope(&dep.group_id, &dep.artifact_id)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| Scope::Compile.as_str().to_string());

            let descriptor = DependencyDescriptor::new(
                requested.clone(),
                ArtifactId::new(&dep.group_id, &dep.artifact_id, version),
                scope,
            );
            let mut resolved =
                ResolvedDependency::new(descriptor).with_exclusions(dep.exclusion_set());
            if let Some(managed) = request.management.get(&dep.key()) {
                resolved = resolved.with_managed(managed.clone());
            }
            if dep.optional {
                resolved = resolved.optional();
            }
            if let Some(classifier) = &dep.classifier {
                resolved = resolved.with_classifier(classifier);
            }
            dependencies.push(resolved);
        }

        Ok(Resolution {
            artifact: ResolvedArtifact::new(actual, size),
            dependencies,
            management: pom.management(),
        })
    }
}
