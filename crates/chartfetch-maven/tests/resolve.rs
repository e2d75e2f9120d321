//! End-to-end resolution through the filesystem engine.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chartfetch_maven::integrity::sidecar_path;
use chartfetch_maven::local::artifact_path;
use chartfetch_maven::{
    Artifact, ChartResolver, ChartResolverError, ChecksumPolicy, ContentHash, FileRepositorySystem, LocalRepository,
    Mirror, MirrorSelector, RemoteRepository, RepositorySession, RepositorySystem, ResolutionError,
};
use flate2::write::GzEncoder;
use flate2::Compression;

fn chart_yaml(name: &str, version: &str) -> String {
    format!("apiVersion: v2\nname: {name}\nversion: {version}\ndescription: test chart\n")
}

fn tgz_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, *data).expect("append");
    }
    builder.into_inner().expect("tar").finish().expect("gzip")
}

fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (path, data) in entries {
        writer
            .start_file(*path, zip::write::SimpleFileOptions::default())
            .expect("start file");
        writer.write_all(data).expect("write");
    }
    writer.finish().expect("zip").into_inner()
}

fn publish(repo: &Path, artifact: &Artifact, bytes: &[u8]) {
    let path = repo.join(artifact_path(artifact));
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, bytes).expect("write artifact");
}

fn publish_mychart(repo: &Path, version: &str) {
    let yaml = chart_yaml("mychart", version);
    let bytes = tgz_bytes(&[
        ("mychart/Chart.yaml", yaml.as_bytes()),
        ("mychart/values.yaml", b"replicas: 1\n"),
        ("mychart/templates/deployment.yaml", b"kind: Deployment\n"),
    ]);
    publish(repo, &Artifact::new("org.example", "mychart", "tgz", None, version), &bytes);
}

fn file_remote(id: &str, root: &Path) -> RemoteRepository {
    RemoteRepository::new(id, &format!("file://{}", root.display()))
}

fn session(local: &Path) -> RepositorySession {
    let system = FileRepositorySystem::new();
    let mut session = RepositorySession::new();
    let manager = system
        .new_local_repository_manager(&session, &LocalRepository::new(local))
        .expect("local repository");
    session.set_local_repository_manager(manager);
    session
}

fn resolver(session: RepositorySession, remotes: Vec<RemoteRepository>) -> ChartResolver {
    ChartResolver::new(Arc::new(FileRepositorySystem::new()), Arc::new(session), remotes)
}

#[test]
fn resolves_pinned_tgz_from_remote() {
    let dir = tempfile::tempdir().expect("tempdir");
    let remote = dir.path().join("remote");
    publish_mychart(&remote, "1.2.0");

    let resolver = resolver(session(&dir.path().join("local")), vec![file_remote("central", &remote)]);
    let chart = resolver
        .resolve_coordinates("org.example:mychart:tgz", Some("1.2.0"))
        .expect("resolve");

    assert_eq!(chart.name(), "mychart");
    assert_eq!(chart.version(), "1.2.0");
    assert_eq!(chart.values.as_deref(), Some("replicas: 1\n"));
    assert!(chart.template("templates/deployment.yaml").is_some());

    // The artifact is now cached locally with a sidecar.
    let cached = dir
        .path()
        .join("local")
        .join("org/example/mychart/1.2.0/mychart-1.2.0.tgz");
    assert!(cached.is_file());
    assert!(sidecar_path(&cached).is_file());
}

#[test]
fn versionless_coordinates_resolve_latest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let remote = dir.path().join("remote");
    for version in ["1.0.0", "1.10.0", "1.9.0"] {
        publish_mychart(&remote, version);
    }

    let resolver = resolver(session(&dir.path().join("local")), vec![file_remote("central", &remote)]);
    let chart = resolver
        .resolve_coordinates("org.example:mychart", None)
        .expect("resolve");
    assert_eq!(chart.version(), "1.10.0");
}

#[test]
fn zip_packaged_chart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let remote = dir.path().join("remote");
    let yaml = chart_yaml("ingress", "4.0.208");
    let bytes = zip_bytes(&[
        ("ingress/Chart.yaml", yaml.as_bytes()),
        ("ingress/templates/ingress.yaml", b"kind: Ingress\n"),
    ]);
    publish(
        &remote,
        &Artifact::new("io.example.charts", "ingress", "zip", Some("helm"), "4.0.208"),
        &bytes,
    );

    let resolver = resolver(session(&dir.path().join("local")), vec![file_remote("charts", &remote)]);
    let chart = resolver
        .resolve_coordinates("io.example.charts:ingress:zip:helm", Some("4.0.208"))
        .expect("resolve");
    assert_eq!(chart.name(), "ingress");
    assert!(chart.template("templates/ingress.yaml").is_some());
}

#[test]
fn every_remote_failure_is_reported_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let remotes = vec![
        file_remote("first", &dir.path().join("empty-a")),
        RemoteRepository::new("central", "https://repo1.maven.org/maven2"),
        file_remote("third", &dir.path().join("empty-b")),
    ];

    let err = resolver(session(&dir.path().join("local")), remotes)
        .resolve_coordinates("org.example:mychart", Some("1.0.0"))
        .expect_err("nothing published");

    assert!(matches!(
        err.primary_cause(),
        Some(ResolutionError::ArtifactNotFound { repository, .. }) if repository == "first"
    ));
    let suppressed = err.suppressed();
    assert_eq!(suppressed.len(), 2);
    assert!(matches!(&suppressed[0], ResolutionError::UnsupportedTransport { repository, .. } if repository == "central"));
    assert!(matches!(&suppressed[1], ResolutionError::ArtifactNotFound { repository, .. } if repository == "third"));
}

#[test]
fn checksum_failure_under_fail_policy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let remote = dir.path().join("remote");
    publish_mychart(&remote, "1.0.0");
    let published = remote.join("org/example/mychart/1.0.0/mychart-1.0.0.tgz");
    std::fs::write(sidecar_path(&published), ContentHash::compute(b"something else").as_str()).expect("sidecar");

    let mut session = session(&dir.path().join("local"));
    session.set_checksum_policy(ChecksumPolicy::Fail);
    let err = resolver(session, vec![file_remote("central", &remote)])
        .resolve_coordinates("org.example:mychart", Some("1.0.0"))
        .expect_err("checksum mismatch");
    assert!(matches!(err.primary_cause(), Some(ResolutionError::ChecksumFailure { .. })));
}

#[test]
fn mirror_stands_in_for_unreachable_remote() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mirror_root = dir.path().join("mirror");
    publish_mychart(&mirror_root, "2.0.0");

    let mut session = session(&dir.path().join("local"));
    let mut selector = MirrorSelector::new();
    selector.add(Mirror::new(
        "corp",
        &format!("file://{}", mirror_root.display()),
        "external:*",
    ));
    session.set_mirror_selector(selector);

    let configured = vec![RemoteRepository::new("central", "https://repo1.maven.org/maven2")];
    let remotes = FileRepositorySystem::new().new_resolution_repositories(&session, &configured);
    assert_eq!(remotes[0].id(), "corp");

    let chart = resolver(session, remotes)
        .resolve_coordinates("org.example:mychart", Some("2.0.0"))
        .expect("resolve via mirror");
    assert_eq!(chart.version(), "2.0.0");
}

#[test]
fn corrupt_archive_surfaces_load_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let remote = dir.path().join("remote");
    publish(
        &remote,
        &Artifact::new("org.example", "broken", "tgz", None, "1.0.0"),
        b"not a gzip stream",
    );

    let err = resolver(session(&dir.path().join("local")), vec![file_remote("central", &remote)])
        .resolve_coordinates("org.example:broken", Some("1.0.0"))
        .expect_err("corrupt archive");
    match err {
        ChartResolverError::Load { file, .. } => assert!(file.ends_with("broken-1.0.0.tgz")),
        other => panic!("expected Load error, got {other:?}"),
    }
}

#[test]
fn traversal_coordinates_never_touch_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let remote = dir.path().join("work/remote");
    publish_mychart(&remote, "1.0.0");
    let local = dir.path().join("work/local");

    let resolver = resolver(session(&local), vec![file_remote("central", &remote)]);
    for coordinates in ["g:../../../escape", "org/../..:mychart", "org.example:mychart:tgz:../x"] {
        let err = resolver
            .resolve_coordinates(coordinates, Some("1.0.0"))
            .expect_err("path components must be rejected");
        assert!(matches!(err, ChartResolverError::MalformedCoordinates(_)), "{coordinates}: {err}");
    }
    let err = resolver
        .resolve_coordinates("org.example:mychart", Some("../../1.0.0"))
        .expect_err("version must stay a single directory");
    assert!(matches!(err, ChartResolverError::MalformedCoordinates(_)));

    assert!(!local.exists());
    assert!(!dir.path().join("escape-1.0.0.tgz").exists());
}
