//! Transaction signature extraction from mint tool output

/// Marker printed by the mint script right before the signature
pub const SIGNATURE_MARKER: &str = "Transaction signature:";

/// Explorer link printed by the mint script, used as a fallback
pub const EXPLORER_MARKER: &str = "explorer.solana.com/tx/";

/// Recover the transaction signature from the mint tool's stdout.
///
/// The first line carrying [`SIGNATURE_MARKER`] wins. Only when that yields
/// nothing is the first explorer link consulted, taking the path segment
/// after `/tx/` up to any query string.
pub fn extract_signature(output: &str) -> Option<String> {
    from_marker(output).or_else(|| from_explorer_url(output))
}

fn from_marker(output: &str) -> Option<String> {
    let line = output.lines().find(|l| l.contains(SIGNATURE_MARKER))?;
    let (_, rest) = line.split_once(SIGNATURE_MARKER)?;
    non_empty(rest.trim())
}

fn from_explorer_url(output: &str) -> Option<String> {
    let line = output.lines().find(|l| l.contains(EXPLORER_MARKER))?;
    let (_, rest) = line.split_once("/tx/")?;
    let segment = rest
        .split(|c: char| c == '?' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    non_empty(segment)
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
