//! End-to-end graphs over a local Maven repository laid out in a temp dir.

use pomgraph_core::config::GraphConfig;
use pomgraph_core::identity::{ArtifactId, ArtifactKey};
use pomgraph_graph::builder::GraphBuilder;
use pomgraph_graph::graph::Graph;
use pomgraph_maven::repository::LocalRepository;
use pomgraph_maven::resolver::LocalRepositoryResolver;

const GROUP: &str = "a";

fn id(name: &str, version: &str) -> ArtifactId {
    ArtifactId::new(GROUP, name, version)
}

fn dep(name: &str, version: &str, extra: &str) -> String {
    format!(
        "<dependency><groupId>{GROUP}</groupId><artifactId>{name}</artifactId><version>{version}</version>{extra}</dependency>"
    )
}

fn pom(name: &str, version: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>{GROUP}</groupId>
    <artifactId>{name}</artifactId>
    <version>{version}</version>
    {body}
</project>"#
    )
}

fn deps(items: &[String]) -> String {
    format!("<dependencies>{}</dependencies>", items.concat())
}

/// The fixture repository:
///
/// - `a:1.0`, `a:1.1` (with a `jdk5` classifier jar) are leaves
/// - `b:1.0` depends on `a:1.0`
/// - `c:1.0` depends on `b:1.0`; `d:1.0` depends on `a:1.1`
/// - `e:1.0` depends on `c:1.0` and `d:1.0`
/// - `old:1.0` is relocated to `b:1.0`
/// - the `b:1.0-with*` and `c:1.0-with*` variants each exercise one rule
fn fixture() -> (tempfile::TempDir, LocalRepository) {
    let tmp = tempfile::tempdir().unwrap();
    let repo = LocalRepository::new(tmp.path());

    repo.put_pom(&id("a", "1.0"), &pom("a", "1.0", "")).unwrap();
    repo.put_jar(&id("a", "1.0"), None, &[0u8; 1024]).unwrap();
    repo.put_pom(&id("a", "1.1"), &pom("a", "1.1", "")).unwrap();
    repo.put_jar(&id("a", "1.1"), None, &[0u8; 2048]).unwrap();
    repo.put_jar(&id("a", "1.1"), Some("jdk5"), &[0u8; 512]).unwrap();

    let b = id("b", "1.0");
    repo.put_pom(&b, &pom("b", "1.0", &deps(&[dep("a", "1.0", "")])))
        .unwrap();
    repo.put_jar(&b, None, &[0u8; 100]).unwrap();

    let c = id("c", "1.0");
    repo.put_pom(&c, &pom("c", "1.0", &deps(&[dep("b", "1.0", "")])))
        .unwrap();
    let d = id("d", "1.0");
    repo.put_pom(&d, &pom("d", "1.0", &deps(&[dep("a", "1.1", "")])))
        .unwrap();
    let e = id("e", "1.0");
    repo.put_pom(
        &e,
        &pom("e", "1.0", &deps(&[dep("c", "1.0", ""), dep("d", "1.0", "")])),
    )
    .unwrap();

    let old = id("old", "1.0");
    repo.put_pom(
        &old,
        &pom(
            "old",
            "1.0",
            "<distributionManagement><relocation><artifactId>b</artifactId></relocation></distributionManagement>",
        ),
    )
    .unwrap();

    let variant = |name: &str, version: &str, body: String| {
        repo.put_pom(&id(name, version), &pom(name, version, &body))
            .unwrap();
    };
    variant(
        "b",
        "1.0-withprovideda",
        deps(&[dep("a", "1.0", "<scope>provided</scope>")]),
    );
    variant("b", "1.0-withunknowna", deps(&[dep("a", "unknown", "")]));
    variant(
        "b",
        "1.0-withclassifier",
        deps(&[dep("a", "1.1", "<classifier>jdk5</classifier>")]),
    );
    variant(
        "c",
        "1.0-withexcludeda",
        deps(&[dep(
            "b",
            "1.0",
            "<exclusions><exclusion><groupId>a</groupId><artifactId>a</artifactId></exclusion></exclusions>",
        )]),
    );
    let managed_a = |extra: &str| {
        format!(
            "<dependencyManagement><dependencies>{}</dependencies></dependencyManagement>",
            dep("a", "1.1", extra)
        )
    };
    variant(
        "c",
        "1.0-withexplicitaversion",
        format!("{}{}", managed_a(""), deps(&[dep("b", "1.0", "")])),
    );
    variant(
        "c",
        "1.0-withtestscopeda",
        format!(
            "{}{}",
            managed_a("<scope>test</scope>"),
            deps(&[dep("b", "1.0", "")])
        ),
    );
    variant(
        "c",
        "1.0-withexplicitaversionasdep",
        deps(&[dep("b", "1.0", ""), dep("a", "1.1", "")]),
    );

    (tmp, repo)
}

fn build(repo: &LocalRepository, root: &ArtifactId) -> Graph {
    let resolver = LocalRepositoryResolver::new(repo.clone());
    GraphBuilder::new(resolver).build_graph(root).unwrap()
}

/// `from -> to (declared version)` for every edge, in insertion order.
fn edges(graph: &Graph) -> Vec<String> {
    graph
        .edges()
        .map(|e| {
            format!(
                "{} -> {} ({})",
                e.from().identity(),
                e.to().identity(),
                e.descriptor().declared_version()
            )
        })
        .collect()
}

#[test]
fn leaf_has_a_size() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("a", "1.0"));
    assert_eq!(graph.vertex_count(), 1);
    assert_eq!(graph.root().resolved_artifact().size, Some(1024));
}

#[test]
fn relocated_root_takes_the_target_size() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("old", "1.0"));
    let root = graph.root();
    assert_eq!(root.identity(), &id("old", "1.0"));
    assert_eq!(root.resolved_artifact().identity, id("b", "1.0"));
    assert_eq!(root.resolved_artifact().size, Some(100));
    assert_eq!(edges(&graph), vec!["a:old:1.0 -> a:a:1.0 (1.0)"]);
}

#[test]
fn missing_binary_has_no_size() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("b", "1.0-withunknowna"));
    assert_eq!(graph.root().resolved_artifact().size, None);

    let a = graph.find(&ArtifactKey::new(GROUP, "a")).unwrap();
    assert_eq!(a.identity().version, "unknown");
    assert_eq!(a.resolved_artifact().size, None);
    assert!(a.outgoing_edges().is_empty());
}

#[test]
fn classifier_selects_the_binary() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("b", "1.0-withclassifier"));
    let edge = &graph.root().outgoing_edges()[0];
    assert_eq!(edge.to().identity(), &id("a", "1.1"));
    assert_eq!(edge.to().resolved_artifact().size, Some(512));
}

#[test]
fn one_dependency() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("b", "1.0"));
    assert_eq!(edges(&graph), vec!["a:b:1.0 -> a:a:1.0 (1.0)"]);
    assert_eq!(graph.root().outgoing_edges()[0].descriptor().scope, "compile");
    assert_eq!(graph.total_size(), 1124);
}

#[test]
fn provided_dependency_is_dropped() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("b", "1.0-withprovideda"));
    assert_eq!(graph.vertex_count(), 1);
}

#[test]
fn provided_dependency_kept_when_configured() {
    let (_tmp, repo) = fixture();
    let config = GraphConfig::from_toml_str("[scopes]\nprovided = true\n").unwrap();
    let resolver = LocalRepositoryResolver::new(repo.clone());
    let graph = GraphBuilder::with_config(resolver, &config)
        .build_graph(&id("b", "1.0-withprovideda"))
        .unwrap();
    assert_eq!(graph.root().outgoing_edges()[0].descriptor().scope, "provided");
}

#[test]
fn transitive_compile_dependency() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("c", "1.0"));
    assert_eq!(
        edges(&graph),
        vec!["a:c:1.0 -> a:b:1.0 (1.0)", "a:b:1.0 -> a:a:1.0 (1.0)"]
    );
}

#[test]
fn excluded_transitive_dependency() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("c", "1.0-withexcludeda"));
    assert_eq!(edges(&graph), vec!["a:c:1.0-withexcludeda -> a:b:1.0 (1.0)"]);
}

#[test]
fn managed_version_overrides_transitive_dependency() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("c", "1.0-withexplicitaversion"));
    assert_eq!(
        edges(&graph),
        vec![
            "a:c:1.0-withexplicitaversion -> a:b:1.0 (1.0)",
            "a:b:1.0 -> a:a:1.1 (1.0)"
        ]
    );
    assert_eq!(graph.conflicts().len(), 1);
}

#[test]
fn managed_test_scope_removes_transitive_dependency() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("c", "1.0-withtestscopeda"));
    assert_eq!(edges(&graph), vec!["a:c:1.0-withtestscopeda -> a:b:1.0 (1.0)"]);
}

#[test]
fn nearer_declaration_overrides_transitive_dependency() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("c", "1.0-withexplicitaversionasdep"));
    assert_eq!(
        edges(&graph),
        vec![
            "a:c:1.0-withexplicitaversionasdep -> a:b:1.0 (1.0)",
            "a:c:1.0-withexplicitaversionasdep -> a:a:1.1 (1.1)",
            "a:b:1.0 -> a:a:1.1 (1.0)"
        ]
    );
}

#[test]
fn nearest_dependency_in_another_branch_wins() {
    let (_tmp, repo) = fixture();
    let graph = build(&repo, &id("e", "1.0"));
    assert_eq!(
        edges(&graph),
        vec![
            "a:e:1.0 -> a:c:1.0 (1.0)",
            "a:e:1.0 -> a:d:1.0 (1.0)",
            "a:c:1.0 -> a:b:1.0 (1.0)",
            "a:d:1.0 -> a:a:1.1 (1.1)",
            "a:b:1.0 -> a:a:1.1 (1.0)"
        ]
    );
    let downgrades = graph.conflicts().downgrades();
    assert!(downgrades.is_empty());
    assert_eq!(graph.conflicts().len(), 1);
}
