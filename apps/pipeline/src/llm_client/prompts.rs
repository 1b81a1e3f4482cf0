// Prompt constants and output-cleanup helpers for quote generation.

/// The fixed prompt sent for every photo. The service is asked to wrap the
/// quote in quote marks so `strip_quote_marks` can peel them off reliably.
pub const QUOTE_PROMPT: &str = "Generate a unique and inspirational motivational quote. \
    Please format the output as follows: 'quote'";

/// Strips one symmetric pair of surrounding quote marks (`'…'` or `"…"`)
/// and trims whitespace. Models do not always honor the requested format,
/// so unquoted output passes through unchanged.
pub fn strip_quote_marks(text: &str) -> &str {
    let text = text.trim();
    for mark in ['\'', '"'] {
        if let Some(inner) = text
            .strip_prefix(mark)
            .and_then(|t| t.strip_suffix(mark))
        {
            return inner.trim();
        }
    }
    text
}
