//! Word-count line wrapping for generated quotes.
//!
//! Pure and deterministic, no font metrics here. Pixel-accurate wrapping
//! against the text box happens later in `layout_block`; this pass only
//! keeps any single line from running past `WORDS_PER_LINE` words.

/// Maximum words per wrapped line.
const WORDS_PER_LINE: usize = 15;

/// Re-flows `text` so a line break starts before every word whose zero-based
/// index is a non-zero multiple of 15. Inputs of 15 words or fewer come back
/// trimmed but otherwise untouched. Joining the output lines and splitting
/// on whitespace always recovers the original word sequence.
pub fn wrap(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= WORDS_PER_LINE {
        return text.trim().to_string();
    }

    let mut out = String::with_capacity(text.len() + words.len() / WORDS_PER_LINE);
    for (index, word) in words.iter().enumerate() {
        if index != 0 && index % WORDS_PER_LINE == 0 {
            out.push('\n');
        }
        out.push_str(word);
        out.push(' ');
    }
    out.trim_end().to_string()
}
