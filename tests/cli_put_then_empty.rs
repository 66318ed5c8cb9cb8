//! End-to-end through the binary: trash a file, see it in a dry-run, then
//! empty for real. TRASHCAN_CONFIG points at a missing file so the run uses
//! defaults without writing a template anywhere shared.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn trashcan(base: &Path) -> Command {
    let me = assert_cmd::cargo::cargo_bin!("trashcan");
    let mut cmd = Command::new(me);
    cmd.env("HOME", base)
        .env("XDG_DATA_HOME", base.join("data"))
        .env("TRASHCAN_CONFIG", base.join("no-such-config.xml"));
    cmd
}

#[test]
fn put_then_dry_run_then_empty() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let src = base.join("old-draft.txt");
    fs::write(&src, "scrap").unwrap();

    let out = trashcan(&base)
        .args(["put"])
        .arg(&src)
        .output()
        .expect("spawn binary");
    eprintln!("=== STDERR ===\n{}", String::from_utf8_lossy(&out.stderr));
    assert!(out.status.success(), "put should succeed");
    assert!(!src.exists(), "source should be gone after put");

    let trash = base.join("data/Trash");
    assert!(trash.join("files/old-draft.txt").exists());
    assert!(trash.join("info/old-draft.txt.trashinfo").exists());

    // Dry run names the original path and removes nothing.
    let out = trashcan(&base)
        .args(["empty", "--dry-run", "--trash-dir"])
        .arg(&trash)
        .output()
        .expect("spawn binary");
    assert!(out.status.success(), "dry-run empty should succeed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("would remove") && stdout.contains("old-draft.txt"),
        "expected dry-run listing; got: {stdout}"
    );
    assert!(trash.join("files/old-draft.txt").exists());

    let out = trashcan(&base)
        .args(["empty", "--trash-dir"])
        .arg(&trash)
        .output()
        .expect("spawn binary");
    assert!(out.status.success(), "empty should succeed");
    assert!(!trash.join("files/old-draft.txt").exists());
    assert!(!trash.join("info/old-draft.txt.trashinfo").exists());
}

#[test]
fn empty_days_keeps_young_entries() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let trash = base.join("data/Trash");
    fs::create_dir_all(trash.join("files")).unwrap();
    fs::create_dir_all(trash.join("info")).unwrap();
    fs::write(trash.join("files/young.txt"), "y").unwrap();
    let ten_days_ago = chrono::Local::now().naive_local() - chrono::Duration::days(10);
    fs::write(
        trash.join("info/young.txt.trashinfo"),
        format!(
            "[Trash Info]\nPath=/tmp/young.txt\nDeletionDate={}\n",
            ten_days_ago.format("%Y-%m-%dT%H:%M:%S")
        ),
    )
    .unwrap();
    fs::write(trash.join("files/ancient.txt"), "a").unwrap();
    fs::write(
        trash.join("info/ancient.txt.trashinfo"),
        "[Trash Info]\nPath=/tmp/ancient.txt\nDeletionDate=1999-01-01T00:00:00\n",
    )
    .unwrap();

    // A threshold between the two ages: older than the 10-day entry, younger
    // than the 1999 one.
    let out = trashcan(&base)
        .args(["empty", "--days", "30", "--trash-dir"])
        .arg(&trash)
        .output()
        .expect("spawn binary");
    assert!(out.status.success());
    assert!(trash.join("files/young.txt").exists(), "young entry retained");
    assert!(!trash.join("files/ancient.txt").exists(), "ancient entry removed");
}

#[test]
fn put_missing_path_sets_exit_status() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();

    let out = trashcan(&base)
        .args(["put"])
        .arg(base.join("never-existed.txt"))
        .output()
        .expect("spawn binary");
    assert!(!out.status.success(), "missing path should fail");

    // --force downgrades the same situation to a silent skip.
    let out = trashcan(&base)
        .args(["put", "--force"])
        .arg(base.join("never-existed.txt"))
        .output()
        .expect("spawn binary");
    assert!(out.status.success(), "--force should skip quietly");
}
