use std::io::Write;
use std::process::Command;

use anyhow::{Result, anyhow};
use tempfile::NamedTempFile;

fn write_fixture(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

fn run_binary(accounts: &NamedTempFile, transfers: &NamedTempFile) -> Result<String> {
    let binary_path = env!("CARGO_BIN_EXE_transfer-ledger");

    let output = Command::new(binary_path)
        .arg(accounts.path())
        .arg(transfers.path())
        .output()?;

    assert!(output.status.success());

    Ok(String::from_utf8(output.stdout)?)
}

fn find_line<'a>(stdout: &'a str, prefix: &str) -> Result<&'a str> {
    stdout.lines()
        .find(|line| line.starts_with(prefix))
        .ok_or_else(|| anyhow!("no output line starting with [{prefix}]"))
}

#[test]
fn test_completed_transfer_updates_both_balances() -> Result<()> {
    let accounts = write_fixture(
        "account_number,owner_name,balance\n\
         ACC-001,Alice,1000.00\n\
         ACC-002,Bob,2500.50\n"
    )?;
    let transfers = write_fixture(
        "source,destination,amount,description\n\
         ACC-001,ACC-002,150.00,rent\n"
    )?;

    let stdout = run_binary(&accounts, &transfers)?;

    assert_eq!(find_line(&stdout, "ACC-001,")?, "ACC-001,Alice,850.00");
    assert_eq!(find_line(&stdout, "ACC-002,")?, "ACC-002,Bob,2650.50");
    assert_eq!(find_line(&stdout, "1,")?, "1,1,2,150.00,COMPLETED,rent");

    Ok(())
}

#[test]
fn test_rejected_transfer_leaves_balances_and_prints_audit_row() -> Result<()> {
    let accounts = write_fixture(
        "account_number,owner_name,balance\n\
         ACC-001,Alice,500.00\n\
         ACC-002,Bob,2500.50\n"
    )?;
    let transfers = write_fixture(
        "source,destination,amount,description\n\
         ACC-001,ACC-002,600.00,x\n"
    )?;

    let stdout = run_binary(&accounts, &transfers)?;

    assert_eq!(find_line(&stdout, "ACC-001,")?, "ACC-001,Alice,500.00");
    assert_eq!(find_line(&stdout, "ACC-002,")?, "ACC-002,Bob,2500.50");

    let audit_line = find_line(&stdout, "1,")?;
    assert!(audit_line.contains(",600.00,FAILED,"));
    assert!(audit_line.contains("x - FAILED: Insufficient funds"));

    Ok(())
}

#[test]
fn test_mixed_batch_keeps_every_attempt_in_the_ledger() -> Result<()> {
    let accounts = write_fixture(
        "account_number,owner_name,balance\n\
         ACC-001,Alice,1000.00\n\
         ACC-002,Bob,0.00\n"
    )?;
    let transfers = write_fixture(
        "source,destination,amount,description\n\
         ACC-001,ACC-002,400.00,first\n\
         ACC-001,ACC-404,100.00,ghost\n\
         ACC-002,ACC-001,50.00,second\n"
    )?;

    let stdout = run_binary(&accounts, &transfers)?;

    assert_eq!(find_line(&stdout, "ACC-001,")?, "ACC-001,Alice,650.00");
    assert_eq!(find_line(&stdout, "ACC-002,")?, "ACC-002,Bob,350.00");

    assert_eq!(find_line(&stdout, "1,")?, "1,1,2,400.00,COMPLETED,first");
    assert!(find_line(&stdout, "2,")?.contains("FAILED"));
    assert_eq!(find_line(&stdout, "3,")?, "3,2,1,50.00,COMPLETED,second");

    Ok(())
}
