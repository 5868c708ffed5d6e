// tests/release_test.rs
//
// Tag decision engine behavior against an in-memory repository.

use std::io::Write;

use tag_release::config::{ReleaseOptions, TaskConfig, TaskOptions, VersionFn, VersionSource};
use tag_release::git::MockRepository;
use tag_release::release::{release, CommitAction, CommitOutcome, ReleaseEngine};
use tag_release::resolver::{self, ResolvedRelease};
use tag_release::TagReleaseError;
use tempfile::NamedTempFile;

fn resolved(version: &str, prefix: &str, commit: bool) -> ResolvedRelease {
    let mut options = ReleaseOptions::new(VersionSource::Literal(version.to_string()));
    options.prefix = prefix.to_string();
    options.commit = commit;
    resolver::resolve(&options).unwrap()
}

fn literal(version: &str) -> TaskConfig {
    TaskConfig::Options(TaskOptions {
        version: Some(version.to_string()),
        commit: Some(false),
        ..Default::default()
    })
}

#[test]
fn test_metadata_file_with_prefix_creates_tag() {
    let mut meta = NamedTempFile::new().unwrap();
    meta.write_all(br#"{"name": "demo", "version": "1.2.3"}"#)
        .unwrap();
    meta.flush().unwrap();

    let repo = MockRepository::new();
    let config = TaskConfig::Options(TaskOptions {
        file: Some(meta.path().to_path_buf()),
        prefix: Some("v".to_string()),
        commit: Some(false),
        ..Default::default()
    });

    let outcome = release(config, &repo).unwrap();
    assert_eq!(outcome.tag, "v1.2.3");
    assert_eq!(outcome.previous, None);
    assert_eq!(outcome.commit, CommitOutcome::Disabled);
    assert_eq!(repo.created_tags()[0].name, "v1.2.3");
    assert!(!repo.created_tags()[0].annotated);
}

#[test]
fn test_equal_version_is_rejected() {
    let repo = MockRepository::new().with_tags(["v1.2.3"]);

    let err = release(literal("1.2.3"), &repo).unwrap_err();
    assert!(matches!(err, TagReleaseError::Version(_)));
    assert!(err.to_string().contains("not higher than current highest tag"));
    assert!(repo.created_tags().is_empty());
}

#[test]
fn test_lower_version_is_rejected() {
    let repo = MockRepository::new().with_tags(["2.0.0", "1.0.0"]);

    let err = release(literal("1.5.0"), &repo).unwrap_err();
    assert!(matches!(err, TagReleaseError::Version(_)));
}

#[test]
fn test_higher_version_ignores_unrelated_tags() {
    let repo = MockRepository::new().with_tags(["nightly", "v1.0.0", "deploy-2024", "1.0"]);

    let outcome = release(literal("1.0.1"), &repo).unwrap();
    assert_eq!(outcome.tag, "1.0.1");
    assert_eq!(outcome.previous.unwrap().to_string(), "1.0.0");
}

#[test]
fn test_only_invalid_tags_accepts_any_version() {
    let repo = MockRepository::new().with_tags(["latest", "stable"]);

    let outcome = release(literal("0.0.0"), &repo).unwrap();
    assert_eq!(outcome.tag, "0.0.0");
    assert_eq!(outcome.previous, None);
}

#[test]
fn test_prerelease_ordering() {
    let repo = MockRepository::new().with_tags(["1.0.0-rc.1"]);
    assert!(release(literal("1.0.0"), &repo).is_ok());

    let repo = MockRepository::new().with_tags(["1.0.0"]);
    let err = release(literal("1.0.0-rc.2"), &repo).unwrap_err();
    assert!(matches!(err, TagReleaseError::Version(_)));
}

#[test]
fn test_build_metadata_allows_same_version() {
    let repo = MockRepository::new().with_tags(["1.0.0"]);

    let outcome = release(literal("1.0.0+build.2"), &repo).unwrap();
    assert_eq!(outcome.tag, "1.0.0+build.2");
    assert!(repo.tags().contains(&"1.0.0+build.2".to_string()));
}

#[test]
fn test_build_metadata_duplicate_is_rejected() {
    let repo = MockRepository::new().with_tags(["1.0.0", "1.0.0+build.1"]);

    let err = release(literal("1.0.0+build.1"), &repo).unwrap_err();
    assert!(matches!(err, TagReleaseError::Version(_)));
    assert!(err.to_string().contains("duplicate tag"));
    assert!(!repo.calls().contains(&"create_tag".to_string()));
}

#[test]
fn test_build_metadata_lower_version_is_rejected() {
    let repo = MockRepository::new().with_tags(["1.1.0"]);

    let err = release(literal("1.0.0+build.5"), &repo).unwrap_err();
    assert!(matches!(err, TagReleaseError::Version(_)));
    assert!(err.to_string().contains("lower than current highest tag"));
}

#[test]
fn test_build_metadata_duplicate_uses_prefixed_name() {
    let repo = MockRepository::new().with_tags(["v1.0.0+build.1"]);
    let config = TaskConfig::Options(TaskOptions {
        version: Some("1.0.0+build.1".to_string()),
        prefix: Some("v".to_string()),
        commit: Some(false),
        ..Default::default()
    });

    let err = release(config, &repo).unwrap_err();
    assert!(err.to_string().contains("\"v1.0.0+build.1\""));
}

#[test]
fn test_second_run_fails_on_version() {
    let repo = MockRepository::new();

    release(literal("1.2.3"), &repo).unwrap();
    let err = release(literal("1.2.3"), &repo).unwrap_err();

    assert!(err.to_string().contains("not higher than current highest tag"));
    assert_eq!(repo.created_tags().len(), 1);
}

#[test]
fn test_second_run_with_build_metadata_fails_on_duplicate() {
    let repo = MockRepository::new();

    release(literal("1.2.3+ci.9"), &repo).unwrap();
    let err = release(literal("1.2.3+ci.9"), &repo).unwrap_err();

    assert!(matches!(err, TagReleaseError::Version(_)));
    assert!(err.to_string().contains("duplicate tag"));
}

#[test]
fn test_invalid_version_never_touches_repository() {
    for candidate in ["1.2", "v01.2.3", "banana", "1.2.3+"] {
        let repo = MockRepository::new();
        let err = release(literal(candidate), &repo).unwrap_err();

        assert!(matches!(err, TagReleaseError::Validation(_)), "{}", candidate);
        assert!(repo.calls().is_empty(), "{} touched the repository", candidate);
    }
}

#[test]
fn test_missing_repository_fails_first() {
    let repo = MockRepository::missing().with_tags(["9.9.9"]).dirty();

    let err = release(literal("1.0.0"), &repo).unwrap_err();
    assert!(matches!(err, TagReleaseError::Environment(_)));
    assert_eq!(err.exit_code(), 4);
    assert_eq!(repo.calls(), vec!["exists"]);
}

#[test]
fn test_list_tags_failure_is_fatal() {
    let repo = MockRepository::new().fail_list_tags("fatal: not a git repository");

    let err = release(literal("1.0.0"), &repo).unwrap_err();
    assert!(matches!(err, TagReleaseError::Environment(_)));
    assert!(err.to_string().contains("list repository tags"));
    assert_eq!(repo.calls(), vec!["exists", "list_tags"]);
}

#[test]
fn test_list_tags_failure_reports_category_once() {
    let repo = MockRepository::new().fail_list_tags("boom");

    let err = release(literal("1.0.0"), &repo).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Environment error: Couldn't list repository tags: boom"
    );
}

#[test]
fn test_tag_lookup_failure_is_fatal() {
    let repo = MockRepository::new()
        .with_tags(["1.0.0"])
        .fail_tag_exists("boom");
    let engine = ReleaseEngine::new(&repo);

    let err = engine.run(&resolved("1.0.0+build.1", "", true)).unwrap_err();

    assert!(matches!(err, TagReleaseError::Environment(_)));
    assert_eq!(
        err.to_string(),
        "Environment error: Couldn't look up tag \"1.0.0+build.1\": boom"
    );
    assert_eq!(repo.calls(), vec!["exists", "list_tags", "tag_exists"]);
    assert!(repo.commits().is_empty());
    assert!(repo.created_tags().is_empty());
}

#[test]
fn test_working_tree_failure_is_fatal() {
    let repo = MockRepository::new().dirty().fail_is_clean("boom");
    let engine = ReleaseEngine::new(&repo);

    let err = engine.run(&resolved("2.0.0", "", true)).unwrap_err();

    assert!(matches!(err, TagReleaseError::Environment(_)));
    assert_eq!(
        err.to_string(),
        "Environment error: Couldn't inspect working tree: boom"
    );
    assert_eq!(repo.calls(), vec!["exists", "list_tags", "is_clean"]);
    assert!(repo.commits().is_empty());
    assert!(repo.created_tags().is_empty());
}

#[test]
fn test_working_tree_failure_after_tag_lookup() {
    let repo = MockRepository::new().fail_is_clean("boom");
    let engine = ReleaseEngine::new(&repo);

    let err = engine.run(&resolved("1.0.0+build.1", "v", true)).unwrap_err();

    assert!(err.to_string().contains("inspect working tree"));
    assert_eq!(
        repo.calls(),
        vec!["exists", "list_tags", "tag_exists", "is_clean"]
    );
    assert!(repo.created_tags().is_empty());
}

#[test]
fn test_dirty_tree_committed_before_tag() {
    let repo = MockRepository::new().dirty();
    let engine = ReleaseEngine::new(&repo);

    let outcome = engine.run(&resolved("2.0.0", "v", true)).unwrap();

    assert_eq!(outcome.commit, CommitOutcome::Committed);
    assert_eq!(repo.commits(), vec!["Release 2.0.0"]);
    assert_eq!(
        repo.calls(),
        vec!["exists", "list_tags", "is_clean", "commit_all", "create_tag"]
    );
}

#[test]
fn test_clean_tree_skips_commit() {
    let repo = MockRepository::new();
    let engine = ReleaseEngine::new(&repo);

    let outcome = engine.run(&resolved("2.0.0", "", true)).unwrap();
    assert_eq!(outcome.commit, CommitOutcome::Clean);
    assert!(repo.commits().is_empty());
}

#[test]
fn test_commit_disabled_leaves_dirty_tree() {
    let repo = MockRepository::new().dirty();
    let engine = ReleaseEngine::new(&repo);

    let outcome = engine.run(&resolved("2.0.0", "", false)).unwrap();
    assert_eq!(outcome.commit, CommitOutcome::Disabled);
    assert!(!repo.calls().contains(&"is_clean".to_string()));
    assert!(!repo.calls().contains(&"commit_all".to_string()));
}

#[test]
fn test_commit_failure_still_tags() {
    let repo = MockRepository::new()
        .dirty()
        .fail_commit("nothing added to commit");
    let engine = ReleaseEngine::new(&repo);

    let outcome = engine.run(&resolved("3.0.0", "", true)).unwrap();

    assert!(outcome.commit.is_failed());
    assert_eq!(
        outcome.commit,
        CommitOutcome::Failed("nothing added to commit".to_string())
    );
    assert_eq!(outcome.tag, "3.0.0");
    assert_eq!(repo.created_tags().len(), 1);
}

#[test]
fn test_tag_failure_is_fatal_and_surfaces_diagnostic() {
    let repo = MockRepository::new().fail_create_tag("fatal: Failed to resolve 'HEAD'");

    let err = release(literal("1.0.0"), &repo).unwrap_err();
    assert!(matches!(err, TagReleaseError::Environment(_)));
    assert_eq!(
        err.to_string(),
        "Environment error: Couldn't tag the last commit as \"1.0.0\": fatal: Failed to resolve 'HEAD'"
    );
}

#[test]
fn test_annotated_tag_carries_message() {
    let repo = MockRepository::new();
    let config = TaskConfig::Options(TaskOptions {
        version: Some("1.4.0".to_string()),
        annotate: Some(true),
        message: Some("Version %version% is out".to_string()),
        commit: Some(false),
        ..Default::default()
    });

    let outcome = release(config, &repo).unwrap();
    assert!(outcome.annotated);

    let created = &repo.created_tags()[0];
    assert!(created.annotated);
    assert_eq!(created.message, "Version 1.4.0 is out");
}

#[test]
fn test_callback_version() {
    let repo = MockRepository::new().with_tags(["0.9.0"]);
    let config = TaskConfig::Callback(VersionFn::new(|| "v1.0.0".to_string()));

    let outcome = release(config, &repo).unwrap();
    assert_eq!(outcome.tag, "1.0.0");
}

#[test]
fn test_plan_performs_no_mutation() {
    let repo = MockRepository::new().with_tags(["0.1.0"]).dirty();
    let engine = ReleaseEngine::new(&repo);

    let plan = engine.plan(&resolved("0.2.0", "", true)).unwrap();

    assert_eq!(plan.tag(), "0.2.0");
    assert_eq!(plan.commit, CommitAction::Commit);
    assert_eq!(plan.highest.as_ref().unwrap().to_string(), "0.1.0");
    assert!(repo.commits().is_empty());
    assert!(repo.created_tags().is_empty());
}

#[test]
fn test_custom_prefix_tags_count_toward_highest() {
    let repo = MockRepository::new().with_tags(["release-2.0.0"]);
    let engine = ReleaseEngine::new(&repo);

    let err = engine.run(&resolved("1.9.0", "release-", false)).unwrap_err();
    assert!(matches!(err, TagReleaseError::Version(_)));
}
