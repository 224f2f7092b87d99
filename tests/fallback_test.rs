use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

fn inputs() -> (tempfile::NamedTempFile, tempfile::NamedTempFile) {
    let mut folios = tempfile::NamedTempFile::new().unwrap();
    writeln!(folios, "folio, customer, amount, opened_on").unwrap();
    writeln!(folios, "1, , 100.0, 2024-03-09").unwrap();

    let mut events = tempfile::NamedTempFile::new().unwrap();
    writeln!(events, "action, folio, provider, transaction").unwrap();
    writeln!(events, "initiate, 1, vnpay,").unwrap();
    (folios, events)
}

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let (folios, events) = inputs();

    let mut cmd = Command::new(cargo_bin!("folio-settle"));
    cmd.arg(events.path())
        .arg("--folios")
        .arg(folios.path())
        .arg("--db-path")
        .arg("some_db");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let (folios, events) = inputs();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("folio-settle"));
    cmd.arg(events.path())
        .arg("--folios")
        .arg(folios.path())
        .arg("--db-path")
        .arg(&db_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING").not());
}
