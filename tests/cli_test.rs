use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn folios_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "folio, customer, amount, opened_on").unwrap();
    writeln!(file, "1, 7, 60000, 2024-03-09").unwrap();
    writeln!(file, "2, , 150.5, 2024-03-09").unwrap();
    writeln!(file, "3, 7, 100000, 2024-03-10").unwrap();
    file
}

fn run(events: &NamedTempFile, folios: &NamedTempFile) -> assert_cmd::assert::Assert {
    let mut cmd = Command::new(cargo_bin!("folio-settle"));
    cmd.arg(events.path()).arg("--folios").arg(folios.path());
    cmd.assert()
}

#[test]
fn test_cli_end_to_end() {
    let folios = folios_csv();
    let mut events = NamedTempFile::new().unwrap();
    writeln!(events, "action, folio, provider, transaction").unwrap();
    writeln!(events, "initiate, 1, vnpay,").unwrap();
    writeln!(events, "verify, 1, vnpay,").unwrap(); // not paid yet
    writeln!(events, "pay, 1, vnpay,").unwrap();
    writeln!(events, "verify_txn, , vnpay, vnpay-1").unwrap();
    writeln!(events, "verify, 1, vnpay,").unwrap(); // idempotent
    writeln!(events, "initiate, 2, zalopay,").unwrap();

    run(&events, &folios)
        .success()
        .stdout(predicate::str::contains("folio,customer,amount,status"))
        .stdout(predicate::str::contains("1,7,60000,PAID"))
        .stdout(predicate::str::contains("2,,150.5,PENDING"))
        .stdout(predicate::str::contains("3,7,100000,PENDING"))
        .stdout(predicate::str::contains("customer,points,tier"))
        .stdout(predicate::str::contains("7,600,Gold"));
}

#[test]
fn test_cli_reports_rejected_events() {
    let folios = folios_csv();
    let mut events = NamedTempFile::new().unwrap();
    writeln!(events, "action, folio, provider, transaction").unwrap();
    writeln!(events, "pay, 1, zalopay,").unwrap();
    writeln!(events, "verify, 1, zalopay,").unwrap();
    writeln!(events, "initiate, 1, zalopay,").unwrap(); // already paid
    writeln!(events, "initiate, 3, stripe,").unwrap(); // unsupported
    writeln!(events, "initiate, 99, vnpay,").unwrap(); // unknown folio
    writeln!(events, "refund, 3, vnpay,").unwrap(); // malformed
    writeln!(events, "verify_txn, , vnpay, does-not-exist").unwrap();

    run(&events, &folios)
        .success()
        .stderr(predicate::str::contains(
            "Error processing event: folio 1 is already paid",
        ))
        .stderr(predicate::str::contains(
            "Error processing event: unsupported provider: stripe",
        ))
        .stderr(predicate::str::contains(
            "Error processing event: folio not found: 99",
        ))
        .stderr(predicate::str::contains("Error reading event"))
        .stdout(predicate::str::contains("1,7,60000,PAID"))
        .stdout(predicate::str::contains("7,600,Gold"));
}

#[test]
fn test_cli_outage_defers_settlement() {
    let folios = folios_csv();
    let mut events = NamedTempFile::new().unwrap();
    writeln!(events, "action, folio, provider, transaction").unwrap();
    writeln!(events, "initiate, 3, zalopay,").unwrap();
    writeln!(events, "pay, 3, zalopay,").unwrap();
    writeln!(events, "outage, , zalopay,").unwrap();
    writeln!(events, "verify, 3, zalopay,").unwrap();

    run(&events, &folios)
        .success()
        .stdout(predicate::str::contains("3,7,100000,PENDING"))
        .stdout(predicate::str::contains("7,0,Silver"));
}

#[test]
fn test_cli_with_config_file() {
    let folios = folios_csv();
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[zalopay]\nenabled = false\n").unwrap();
    writeln!(config, "[[loyalty.tiers]]\nname = \"Member\"\nmin_points = 0\n").unwrap();
    writeln!(config, "[[loyalty.tiers]]\nname = \"Elite\"\nmin_points = 1000\n").unwrap();

    let mut events = NamedTempFile::new().unwrap();
    writeln!(events, "action, folio, provider, transaction").unwrap();
    writeln!(events, "initiate, 3, zalopay,").unwrap();
    writeln!(events, "pay, 3, vnpay,").unwrap();
    writeln!(events, "verify, 3, vnpay,").unwrap();

    let mut cmd = Command::new(cargo_bin!("folio-settle"));
    cmd.arg(events.path())
        .arg("--folios")
        .arg(folios.path())
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("unsupported provider: zalopay"))
        .stdout(predicate::str::contains("7,1000,Elite"));
}
