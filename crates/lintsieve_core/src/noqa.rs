//! `# noqa` comments.

use std::sync::LazyLock;

use lintsieve_plugin::Finding;
use regex::Regex;

static NOQA_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#\s*noqa(?::\s?(?P<codes>[a-z]+[0-9]+(?:[,\s]+[a-z]+[0-9]+)*))?")
        .expect("Invalid noqa regex")
});

static NOQA_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#\s*flake8[:=]\s*noqa").expect("Invalid noqa regex"));

static CODE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("Invalid separator regex"));

/// Codes listed by a `# noqa: ...` comment on `line`.
///
/// Returns `Some(vec![])` for a bare `# noqa` and `None` without a comment.
pub fn noqa_codes(line: &str) -> Option<Vec<String>> {
    let captures = NOQA_INLINE.captures(line)?;
    let codes = match captures.name("codes") {
        Some(codes) => CODE_SEPARATOR
            .split(codes.as_str())
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };
    Some(codes)
}

/// Whether the source line of `finding` suppresses it.
///
/// A bare `# noqa` suppresses everything on the line; a listed code
/// suppresses every code it prefixes.
pub fn is_inline_ignored(finding: &Finding) -> bool {
    let Some(line) = finding.physical_line.as_deref() else {
        return false;
    };
    let Some(codes) = noqa_codes(line) else {
        return false;
    };
    if codes.is_empty() {
        return true;
    }
    let code = finding.code.to_ascii_uppercase();
    codes
        .iter()
        .any(|listed| code.starts_with(&listed.to_ascii_uppercase()))
}

/// Whether the file opts out of checking with `# flake8: noqa`.
pub fn is_file_ignored<S: AsRef<str>>(lines: &[S]) -> bool {
    lines
        .iter()
        .any(|line| NOQA_FILE.is_match(line.as_ref().trim_start()))
}
