//! `n8n-security-check`: look for hard-coded credentials in a source tree.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Parser;
use console::style;
use n8nctl_util::{
    ENV_FILE_NAME, GitignoreStatus, SECURE_ENV_FILE_MODE, ScanResults, SecretScanner, check_env_file_security, total_findings,
};

use crate::output;

/// Characters of a match shown in the report.
const PREVIEW_CHARS: usize = 50;

/// Scan a directory tree for hard-coded secrets.
#[derive(Debug, Parser)]
#[command(name = "n8n-security-check", version, about, long_about = None)]
pub struct SecurityCli {
    /// Directory to scan.
    #[arg(default_value = ".")]
    pub root: PathBuf,
}

pub async fn run(cli: SecurityCli) -> Result<()> {
    output::heading("Repository security check");
    println!("Scanning {}...", cli.root.display());

    let results = SecretScanner::new().scan_directory(&cli.root);
    print_report(&results);
    print_env_file_status(&cli.root)?;

    let total = total_findings(&results);
    if total > 0 {
        bail!("{total} potential secrets found in {} files", results.len());
    }
    println!();
    output::success("Security check complete, no problems found");
    Ok(())
}

fn print_report(results: &ScanResults) {
    if results.is_empty() {
        output::success("No hard-coded secrets found");
        return;
    }

    println!("{}", style("Potential secrets found").red().bold());
    println!(
        "{} potential issues in {} files:\n",
        total_findings(results),
        results.len()
    );

    for (path, findings) in results {
        println!("File: {path}");
        println!("{}", "-".repeat(40));
        for finding in findings {
            println!("  Line {} [{}]", finding.line, finding.category);
            println!("     Pattern: {}", finding.pattern);
            println!("     Content: {}", finding.preview(PREVIEW_CHARS));
            println!();
        }
    }

    println!("Suggested fixes:");
    println!("1. Move secrets into the {ENV_FILE_NAME} file");
    println!("2. Read them from environment variables in code");
    println!("3. Make sure {ENV_FILE_NAME} is listed in .gitignore");
    println!("4. Check the git history for leaked secrets");
}

fn print_env_file_status(root: &Path) -> Result<()> {
    println!("\nChecking {ENV_FILE_NAME} file security...");
    let report = check_env_file_security(root)?;

    if !report.exists {
        output::failure(format!("{ENV_FILE_NAME} file does not exist"));
        return Ok(());
    }

    match (report.mode, report.permissions_ok()) {
        (Some(_), Some(true)) => output::success(format!("{ENV_FILE_NAME} permissions are correct ({SECURE_ENV_FILE_MODE:o})")),
        (Some(mode), _) => {
            output::warning(format!("{ENV_FILE_NAME} permissions are too open: {mode:o}"));
            println!("   Run: chmod {SECURE_ENV_FILE_MODE:o} {ENV_FILE_NAME}");
        }
        (None, _) => {}
    }

    match report.gitignore {
        GitignoreStatus::Listed => output::success(format!("{ENV_FILE_NAME} is listed in .gitignore")),
        GitignoreStatus::NotListed => output::failure(format!("{ENV_FILE_NAME} is not listed in .gitignore")),
        GitignoreStatus::Missing => output::failure(".gitignore does not exist"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn findings_fail_the_check() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("config.py"), "password = \"S3cr3t!ActualValue\"\n").expect("write");

        let result = run(SecurityCli {
            root: dir.path().to_path_buf(),
        })
        .await;

        let message = result.expect_err("finding present").to_string();
        assert!(message.starts_with("1 potential secrets"));
    }

    #[tokio::test]
    async fn placeholders_pass_the_check() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("config.py"), "password = \"your_password_here\"\n").expect("write");
        fs::write(dir.path().join(".gitignore"), ".env\n").expect("write");

        let result = run(SecurityCli {
            root: dir.path().to_path_buf(),
        })
        .await;

        assert!(result.is_ok());
    }

    #[test]
    fn root_defaults_to_current_directory() {
        let cli = SecurityCli::try_parse_from(["n8n-security-check"]).expect("parses");
        assert_eq!(cli.root, PathBuf::from("."));
    }
}
