pub const DEFAULT_MAX_CHARS: usize = 2500;

/// Split `text` into consecutive pieces of exactly `max_chars` characters
/// (the last piece may be shorter). Slicing is by character so multi-byte
/// input never splits a code point. Concatenating the result reproduces
/// `text` exactly.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    assert!(max_chars > 0, "chunk size must be positive");

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut len = 0;
    for c in text.chars() {
        current.push(c);
        len += 1;
        if len == max_chars {
            chunks.push(std::mem::take(&mut current));
            len = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
