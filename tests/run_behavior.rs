//! Tests for batch orchestration behavior that does not need a browser.
//!
//! Everything here exercises the fail-fast and short-circuit paths of
//! `run_capture`; nothing launches Chromium.

use domain_snap::{run_capture, run_from_file, Config};

#[tokio::test]
async fn test_empty_url_list_reports_zero_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let summary = run_capture(Vec::new(), config).await.expect("empty run ok");
    assert_eq!(summary.success, 0);
    assert_eq!(summary.failed, 0);
    assert!(summary.results.is_empty());
}

#[tokio::test]
async fn test_invalid_quality_fails_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: dir.path().join("never-created"),
        quality: 200,
        ..Default::default()
    };

    let err = run_capture(vec!["https://example.com".to_string()], config)
        .await
        .expect_err("invalid config must fail fast");
    assert!(format!("{err:#}").contains("quality"));
    // Fail-fast means no partial work: the output directory was never made
    assert!(!dir.path().join("never-created").exists());
}

#[tokio::test]
async fn test_zero_viewport_fails_fast() {
    let config = Config {
        width: 0,
        ..Default::default()
    };
    let err = run_capture(vec!["https://example.com".to_string()], config)
        .await
        .expect_err("zero viewport must fail fast");
    assert!(format!("{err:#}").contains("viewport"));
}

#[tokio::test]
async fn test_run_from_file_missing_file_is_hard_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let err = run_from_file("./no-such-url-list.txt", config)
        .await
        .expect_err("missing URL list must be a hard error");
    assert!(format!("{err:#}").contains("no-such-url-list.txt"));
}

#[tokio::test]
async fn test_run_from_file_comments_only_reports_zero() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("urls.txt");
    tokio::fs::write(&list, "# nothing here\n\n# still nothing\n")
        .await
        .unwrap();

    let config = Config {
        output_dir: dir.path().join("shots"),
        ..Default::default()
    };
    let summary = run_from_file(&list, config).await.expect("empty run ok");
    assert_eq!(summary.success + summary.failed, 0);
}
