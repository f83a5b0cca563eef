/// Number of `.`-separated segments a session token must carry.
pub const TOKEN_SEGMENTS: usize = 3;

/// Strip surrounding quote characters and whitespace from a raw token.
///
/// The auth service sometimes answers with a JSON-quoted string, and values
/// copied by hand tend to pick up stray whitespace. Stripping runs until
/// neither remains at either end, so `normalize(normalize(t)) == normalize(t)`.
pub fn normalize(raw: &str) -> &str {
    raw.trim_matches(|ch: char| ch == '"' || ch.is_whitespace())
}

/// Structural check only: exactly three non-empty segments after
/// normalization. Signatures are never verified here.
pub fn is_valid(raw: &str) -> bool {
    let token = normalize(raw);
    if token.is_empty() {
        return false;
    }

    let mut segments = 0_usize;
    for segment in token.split('.') {
        if segment.is_empty() {
            return false;
        }
        segments += 1;
    }

    segments == TOKEN_SEGMENTS
}

/// Log-safe rendering of a token: a short prefix of the header segment and
/// the segment count. The payload and signature never leave the process.
pub fn redact(raw: &str) -> String {
    let token = normalize(raw);
    let segments = token.split('.').count();
    let prefix: String = token.chars().take(6).collect();

    format!("{prefix}… ({segments} segments)")
}
