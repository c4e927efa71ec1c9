//! Findings produced by the secret scanner.

use std::fmt;

use serde::Serialize;

/// Grouping used when reporting secret-like matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SecretCategory {
    ApiKeys,
    Tokens,
    BotCredentials,
    CredentialUrls,
    GenericSecrets,
}

impl SecretCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ApiKeys => "API Keys",
            Self::Tokens => "Tokens",
            Self::BotCredentials => "Bot credentials",
            Self::CredentialUrls => "URLs with credentials",
            Self::GenericSecrets => "Generic secrets",
        }
    }
}

impl fmt::Display for SecretCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One secret-like match in a scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub category: SecretCategory,
    /// Source of the regex that matched.
    pub pattern: String,
    /// 1-based line number.
    pub line: usize,
    pub matched: String,
}

impl Finding {
    /// Matched text shortened to `max_chars`, with `...` appended when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        if self.matched.chars().count() <= max_chars {
            return self.matched.clone();
        }
        let mut shortened: String = self.matched.chars().take(max_chars).collect();
        shortened.push_str("...");
        shortened
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_matches() {
        let finding = Finding {
            category: SecretCategory::Tokens,
            pattern: "ghp_[A-Za-z0-9]{36}".into(),
            line: 3,
            matched: "a".repeat(60),
        };

        assert_eq!(finding.preview(50), format!("{}...", "a".repeat(50)));
        assert_eq!(finding.preview(60), "a".repeat(60));
    }
}
