//! Regex based scan for hard-coded credentials.
//!
//! The pattern table is deliberately broad (for example any 32 character hex
//! string) and relies on the exclusion list to drop placeholders such as
//! `your_api_key_here` or `{api_key}`. Expect both false positives and false
//! negatives; this is a heuristic pre-commit check, not a proof.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use indexmap::IndexMap;
use n8nctl_types::{Finding, SecretCategory};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directory names never descended into.
pub const EXCLUDED_DIRS: &[&str] = &[".git", "__pycache__", "node_modules", ".vscode", ".idea", "target"];

/// File names never scanned. `secret_scan.rs` holds the pattern table itself.
pub const EXCLUDED_FILES: &[&str] = &[".env.example", ".gitignore", "SECURITY.md", "secret_scan.rs"];

/// Extensions treated as text. Files whose name starts with `.env` are scanned too.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "json", "md", "txt", "yml", "yaml", "env", "sh", "bash", "zsh", "fish", "ps1", "bat", "html",
    "css", "xml", "sql", "conf", "ini", "cfg", "rs", "toml",
];

const PATTERN_TABLE: &[(SecretCategory, &[&str])] = &[
    (
        SecretCategory::ApiKeys,
        &[
            r"eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+",
            r"sk-[A-Za-z0-9]{48}",
            r"pk_[A-Za-z0-9]{24}",
            r"rk_[A-Za-z0-9]{24}",
            r"AKIA[0-9A-Z]{16}",
        ],
    ),
    (
        SecretCategory::Tokens,
        &[
            r"ghp_[A-Za-z0-9]{36}",
            r"gho_[A-Za-z0-9]{36}",
            r"ghu_[A-Za-z0-9]{36}",
            r"ghs_[A-Za-z0-9]{36}",
            r"ghr_[A-Za-z0-9]{36}",
        ],
    ),
    (
        SecretCategory::BotCredentials,
        &[r"[A-Za-z0-9+/]{86}=", r"[a-f0-9]{32}", r"U[a-f0-9]{32}", r"@[a-z0-9]{8}"],
    ),
    (SecretCategory::CredentialUrls, &[r"https?://[^:]+:[^@]+@[^/]+"]),
    (
        SecretCategory::GenericSecrets,
        &[
            r#"password\s*=\s*["'][^"']+["']"#,
            r#"secret\s*=\s*["'][^"']+["']"#,
            r#"token\s*=\s*["'][^"']+["']"#,
            r#"key\s*=\s*["'][^"']+["']"#,
        ],
    ),
];

const EXCLUSION_PATTERNS: &[&str] = &[
    r"your_.*_here",
    r"your_actual_.*_here",
    r"example_.*",
    r"placeholder_.*",
    r"dummy_.*",
    r"test_.*",
    r"fake_.*",
    r"\{.*\}",
    r#"f["'].*\{.*\}.*["']"#,
];

/// A compiled entry of the pattern table.
#[derive(Debug)]
pub struct SecretPattern {
    pub category: SecretCategory,
    pub source: &'static str,
    pub regex: Regex,
}

fn compile(source: &str) -> Regex {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .expect("secret scan pattern should compile")
}

static SECRET_PATTERNS: Lazy<Vec<SecretPattern>> = Lazy::new(|| {
    PATTERN_TABLE
        .iter()
        .flat_map(|(category, sources)| {
            sources.iter().map(move |source| SecretPattern {
                category: *category,
                source: *source,
                regex: compile(source),
            })
        })
        .collect()
});

static EXCLUSIONS: Lazy<Vec<Regex>> = Lazy::new(|| EXCLUSION_PATTERNS.iter().map(|source| compile(source)).collect());

/// The compiled pattern table in category order.
pub fn secret_patterns() -> &'static [SecretPattern] {
    &SECRET_PATTERNS
}

/// True when a matched substring looks like a placeholder, template or sample value.
pub fn is_excluded_content(content: &str) -> bool {
    EXCLUSIONS.iter().any(|exclusion| exclusion.is_match(content))
}

/// Findings grouped by file path relative to the scan root, in walk order.
pub type ScanResults = IndexMap<String, Vec<Finding>>;

/// Scanner configuration: which directories and file names to skip.
#[derive(Debug, Clone)]
pub struct SecretScanner {
    excluded_dirs: HashSet<String>,
    excluded_files: HashSet<String>,
}

impl Default for SecretScanner {
    fn default() -> Self {
        Self {
            excluded_dirs: EXCLUDED_DIRS.iter().map(|name| name.to_string()).collect(),
            excluded_files: EXCLUDED_FILES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl SecretScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip an additional file name during directory scans.
    pub fn exclude_file(mut self, name: impl Into<String>) -> Self {
        self.excluded_files.insert(name.into());
        self
    }

    /// Skip an additional directory name during directory scans.
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.excluded_dirs.insert(name.into());
        self
    }

    /// Scan text line by line. Blank lines and `#` comment lines are ignored.
    pub fn scan_text(&self, content: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for pattern in secret_patterns() {
                for found in pattern.regex.find_iter(line) {
                    let matched = found.as_str();
                    if is_excluded_content(matched) {
                        continue;
                    }
                    findings.push(Finding {
                        category: pattern.category,
                        pattern: pattern.source.to_string(),
                        line: index + 1,
                        matched: matched.to_string(),
                    });
                }
            }
        }

        findings
    }

    /// Scan one file. Invalid UTF-8 is replaced rather than rejected.
    pub fn scan_file(&self, path: &Path) -> io::Result<Vec<Finding>> {
        let bytes = fs::read(path)?;
        Ok(self.scan_text(&String::from_utf8_lossy(&bytes)))
    }

    /// Recursively scan `root`, returning only files with at least one finding.
    ///
    /// Unreadable files and directories are logged and skipped.
    pub fn scan_directory(&self, root: &Path) -> ScanResults {
        let mut results = ScanResults::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(entry.depth() > 0 && entry.file_type().is_dir() && self.is_excluded_dir(entry)));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(error = %error, "skipping unreadable path during secret scan");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if self.excluded_files.contains(file_name.as_ref()) || !is_text_file(entry.path()) {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .display()
                .to_string();

            match self.scan_file(entry.path()) {
                Ok(findings) if findings.is_empty() => {}
                Ok(findings) => {
                    debug!(path = %relative_path, count = findings.len(), "secret scan findings");
                    results.insert(relative_path, findings);
                }
                Err(error) => warn!(path = %relative_path, error = %error, "could not read file during secret scan"),
            }
        }

        results
    }

    fn is_excluded_dir(&self, entry: &walkdir::DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .map(|name| self.excluded_dirs.contains(name))
            .unwrap_or(false)
    }
}

/// True when the extension is on the text allowlist or the name starts with `.env`.
pub fn is_text_file(path: &Path) -> bool {
    let starts_with_env = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with(".env"))
        .unwrap_or(false);
    if starts_with_env {
        return true;
    }

    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            let lowered = extension.to_ascii_lowercase();
            TEXT_EXTENSIONS.contains(&lowered.as_str())
        })
        .unwrap_or(false)
}

/// Total number of findings across all files.
pub fn total_findings(results: &ScanResults) -> usize {
    results.values().map(Vec::len).sum()
}
