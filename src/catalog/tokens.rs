use regex::Regex;
use std::sync::OnceLock;

/// Structured prefixes that project folder names may carry, each followed by
/// the literal separator `" - "`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Four ASCII digits, e.g. `1234 - Harbor Bridge Survey`.
    ProjectId,
    /// An ISO-shaped date, e.g. `2024-01-01 - Harbor Bridge Survey`.
    ProjectDate,
}

static PROJECT_ID_PATTERN: OnceLock<Regex> = OnceLock::new();
static PROJECT_DATE_PATTERN: OnceLock<Regex> = OnceLock::new();

impl TokenKind {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::ProjectId => PROJECT_ID_PATTERN.get_or_init(|| {
                Regex::new(r"^([0-9]{4}) - (.+)\n?$").expect("project id pattern compiles")
            }),
            Self::ProjectDate => PROJECT_DATE_PATTERN.get_or_init(|| {
                Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2}) - (.+)\n?$")
                    .expect("project date pattern compiles")
            }),
        }
    }
}

/// Split a leading `kind` token off `raw`.
///
/// Returns `(token, remainder)` on a match. When `raw` does not start with the
/// token and its separator, returns `("", raw)` unchanged. The remainder must
/// be non-empty for the prefix to count as a match; one trailing newline is
/// tolerated and dropped from it.
pub fn extract_leading_token(raw: &str, kind: TokenKind) -> (String, String) {
    match kind.pattern().captures(raw) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (String::new(), raw.to_string()),
    }
}

/// A project folder name split into its structured parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFolderName {
    pub id: String,
    pub date: String,
    pub name: String,
}

/// Strip the id prefix, then the date prefix from what remains.
pub fn parse_folder_name(folder: &str) -> ParsedFolderName {
    let (id, rest) = extract_leading_token(folder, TokenKind::ProjectId);
    let (date, name) = extract_leading_token(&rest, TokenKind::ProjectDate);
    ParsedFolderName { id, date, name }
}
