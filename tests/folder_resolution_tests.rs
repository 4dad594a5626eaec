//! Recordings folder resolution against a real filesystem

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use onlyr::application::find_folder_to_show;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
}

fn daily(root: &Path) -> std::path::PathBuf {
    root.join("2024-03").join("2024-03-07")
}

#[test]
fn result_always_exists() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("missing-root");
    let fallback = dir.path().join("fallback");

    for identifier in [None, Some("hall")] {
        let folder = find_folder_to_show(today(), identifier, &root, &fallback);
        assert!(folder.is_dir(), "{} should exist", folder.display());
    }
}

#[test]
fn todays_folder_wins_without_creating_anything_else() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    let fallback = dir.path().join("fallback");
    fs::create_dir_all(daily(&root)).unwrap();

    let folder = find_folder_to_show(today(), None, &root, &fallback);

    assert_eq!(folder, daily(&root));
    assert!(!fallback.exists());
    assert_eq!(fs::read_dir(&root).unwrap().count(), 1);
}

#[test]
fn identifier_scoped_folders_are_preferred() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    let fallback = dir.path().join("fallback");
    fs::create_dir_all(daily(&root.join("hall"))).unwrap();
    fs::create_dir_all(daily(&root)).unwrap();

    let folder = find_folder_to_show(today(), Some("hall"), &root, &fallback);

    assert_eq!(folder, daily(&root.join("hall")));
}

#[test]
fn monthly_folder_when_today_has_none() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    let fallback = dir.path().join("fallback");
    fs::create_dir_all(root.join("2024-03")).unwrap();

    let folder = find_folder_to_show(today(), None, &root, &fallback);

    assert_eq!(folder, root.join("2024-03"));
    assert!(!daily(&root).exists());
}

#[test]
fn scoped_root_without_creating_fallback() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    let fallback = dir.path().join("fallback");
    fs::create_dir_all(root.join("hall")).unwrap();

    let folder = find_folder_to_show(today(), Some("hall"), &root, &fallback);

    assert_eq!(folder, root.join("hall"));
    assert!(!fallback.exists());
}

#[test]
fn identifier_falls_back_to_unscoped_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    let fallback = dir.path().join("fallback");

    let folder = find_folder_to_show(today(), Some("hall"), &root, &fallback);

    assert_eq!(folder, root);
    assert!(root.is_dir());
    assert!(!root.join("hall").exists());
    assert!(!fallback.exists());
}

#[test]
fn nothing_exists_creates_fallback() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    let fallback = dir.path().join("fallback");

    let folder = find_folder_to_show(today(), None, &root, &fallback);

    assert_eq!(folder, fallback);
    assert!(fallback.is_dir());
    assert!(!root.exists());
}

#[test]
fn root_that_is_a_file_falls_back() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    let fallback = dir.path().join("fallback");
    fs::write(&root, b"not a folder").unwrap();

    let folder = find_folder_to_show(today(), Some("hall"), &root, &fallback);

    assert_eq!(folder, fallback);
    assert!(fallback.is_dir());
}
