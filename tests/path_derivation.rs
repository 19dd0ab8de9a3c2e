//! Tests for output path derivation and sanitization.

use std::path::{Path, PathBuf};

use domain_snap::paths::{derive_capture_path, sanitize_hostname, sanitize_path_segment};
use domain_snap::{FileFormat, PathLayout};

const RUN_ID: &str = "2024-01-01_00-00-00";

#[test]
fn test_canonical_run_folder_path() {
    let path = derive_capture_path(
        Path::new("./out"),
        RUN_ID,
        "https://example.com/a/b",
        FileFormat::Png,
        PathLayout::RunFolder,
    )
    .expect("valid URL derives a path");
    assert_eq!(
        path,
        PathBuf::from("./out/example.com/2024-01-01_00-00-00/a-b.png")
    );
}

#[test]
fn test_every_component_is_filesystem_safe() {
    let path = derive_capture_path(
        Path::new("out"),
        RUN_ID,
        "https://shop.example.com/caf\u{e9}/b%20c?x=1#frag",
        FileFormat::Jpeg,
        PathLayout::RunFolder,
    )
    .unwrap();
    for component in path.strip_prefix("out").unwrap().components() {
        let s = component.as_os_str().to_string_lossy();
        assert!(
            s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')),
            "unsafe component: {s}"
        );
    }
}

#[test]
fn test_root_path_uses_root_token() {
    let path = derive_capture_path(
        Path::new("out"),
        RUN_ID,
        "https://example.com",
        FileFormat::Png,
        PathLayout::RunFolder,
    )
    .unwrap();
    assert_eq!(
        path,
        PathBuf::from("out/example.com/2024-01-01_00-00-00/root.png")
    );
}

#[test]
fn test_inline_timestamp_layout_keeps_run_id_in_filename() {
    let path = derive_capture_path(
        Path::new("out"),
        RUN_ID,
        "https://example.com/docs",
        FileFormat::Pdf,
        PathLayout::InlineTimestamp,
    )
    .unwrap();
    assert_eq!(
        path,
        PathBuf::from("out/example.com/docs_2024-01-01_00-00-00.pdf")
    );
}

#[test]
fn test_extension_follows_format() {
    for (format, ext) in [
        (FileFormat::Png, "png"),
        (FileFormat::Jpeg, "jpeg"),
        (FileFormat::Pdf, "pdf"),
    ] {
        let path = derive_capture_path(
            Path::new("out"),
            RUN_ID,
            "https://example.com/page",
            format,
            PathLayout::RunFolder,
        )
        .unwrap();
        assert_eq!(path.extension().unwrap().to_str().unwrap(), ext);
    }
}

#[test]
fn test_long_paths_are_capped() {
    let url = format!("https://example.com/{}", "segment/".repeat(50));
    let path = derive_capture_path(
        Path::new("out"),
        RUN_ID,
        &url,
        FileFormat::Png,
        PathLayout::RunFolder,
    )
    .unwrap();
    let stem = path.file_stem().unwrap().to_string_lossy();
    assert!(stem.len() <= 100, "stem too long: {} chars", stem.len());
}

#[test]
fn test_sanitizers_directly() {
    assert_eq!(sanitize_hostname("bücher.example"), "b_cher.example");
    assert_eq!(sanitize_path_segment("/a/b/c"), "a-b-c");
    assert_eq!(sanitize_path_segment("/"), "root");
}

#[test]
fn test_distinct_urls_distinct_paths_within_run() {
    let a = derive_capture_path(
        Path::new("out"),
        RUN_ID,
        "https://example.com/a",
        FileFormat::Png,
        PathLayout::RunFolder,
    )
    .unwrap();
    let b = derive_capture_path(
        Path::new("out"),
        RUN_ID,
        "https://example.com/b",
        FileFormat::Png,
        PathLayout::RunFolder,
    )
    .unwrap();
    let other_host = derive_capture_path(
        Path::new("out"),
        RUN_ID,
        "https://example.org/a",
        FileFormat::Png,
        PathLayout::RunFolder,
    )
    .unwrap();
    assert_ne!(a, b);
    assert_ne!(a, other_host);
}
