use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use tempfile::tempdir;

use trashcan::put::{PutMode, Trasher};
use trashcan::{Clock, Environ, RealVolumes, SystemClock, TrashInfo};

struct At(NaiveDateTime);
impl Clock for At {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

struct NoPrompt;
impl trashcan::UserInput for NoPrompt {
    fn read_reply(&mut self, _prompt: &str) -> std::io::Result<String> {
        panic!("no prompt expected in standard mode");
    }
}

fn environ(data_home: &std::path::Path) -> Environ {
    let mut env = Environ::new();
    env.insert("XDG_DATA_HOME".to_string(), data_home.display().to_string());
    env
}

#[test]
fn file_lands_in_home_trash_with_record() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let data_home = base.join("data");
    let src = base.join("report.txt");
    fs::write(&src, "quarterly numbers").unwrap();

    let volumes = RealVolumes;
    let clk = At(NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap());
    let trasher = Trasher::new(&volumes, &clk);
    let result = trasher.trash(
        &src,
        PutMode::Standard,
        None,
        None,
        None,
        &environ(&data_home),
        1000,
        &mut NoPrompt,
        &mut trashcan::put::RandomSuffixes,
    );
    assert!(
        matches!(result, trashcan::put::TrashResult::Trashed { .. }),
        "expected success, got {result:?}"
    );

    assert!(!src.exists(), "source should be gone");
    let trash = data_home.join("Trash");
    let content = trash.join("files/report.txt");
    assert_eq!(fs::read_to_string(&content).unwrap(), "quarterly numbers");

    let record_path = trash.join("info/report.txt.trashinfo");
    let record = fs::read_to_string(&record_path).unwrap();
    let info = TrashInfo::parse(&record, &record_path).unwrap();
    assert_eq!(info.original_path, src);
    assert!(record.contains("DeletionDate=2024-05-01T09:30:00"));
}

#[test]
fn trashed_directory_keeps_its_tree() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let data_home = base.join("data");
    let dir = base.join("project");
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(dir.join("src/lib.rs"), "pub fn hi() {}").unwrap();

    let volumes = RealVolumes;
    let clk = SystemClock;
    let trasher = Trasher::new(&volumes, &clk);
    let result = trasher.trash(
        &dir,
        PutMode::Standard,
        None,
        None,
        None,
        &environ(&data_home),
        1000,
        &mut NoPrompt,
        &mut trashcan::put::RandomSuffixes,
    );
    assert!(matches!(result, trashcan::put::TrashResult::Trashed { .. }));

    assert!(!dir.exists());
    let moved = data_home.join("Trash/files/project/src/lib.rs");
    assert_eq!(fs::read_to_string(moved).unwrap(), "pub fn hi() {}");
}
