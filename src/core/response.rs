//! Discord payload size limits and text fitting helpers
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Autocomplete choice limits
//! - 1.0.0: Message chunking and truncation

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;
/// Maximum number of choices in one autocomplete response
pub const AUTOCOMPLETE_LIMIT: usize = 25;
/// Maximum length of an autocomplete choice name or value
pub const CHOICE_LIMIT: usize = 100;

/// Split text into message-sized pieces, preferring line boundaries
///
/// Never splits inside a UTF-8 character.
pub fn chunk_for_message(text: &str) -> Vec<String> {
    chunk_text(text, MESSAGE_LIMIT)
}

pub fn chunk_text(text: &str, max_size: usize) -> Vec<String> {
    if text.len() <= max_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if !current.is_empty() && current.len() + line.len() + 1 > max_size {
            chunks.push(std::mem::take(&mut current));
        }
        if line.len() > max_size {
            let mut pieces = split_at_boundaries(line, max_size);
            if let Some(last) = pieces.pop() {
                chunks.extend(pieces);
                current = last;
            }
            continue;
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_at_boundaries(line: &str, max_size: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for ch in line.chars() {
        if current.len() + ch.len_utf8() > max_size && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Truncate text to fit the message limit, adding an ellipsis if cut
pub fn truncate_for_message(text: &str) -> String {
    truncate_bytes(text, MESSAGE_LIMIT)
}

/// Truncate to at most `max_chars` characters (autocomplete limits count characters)
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn truncate_bytes(text: &str, max_size: usize) -> String {
    if text.len() <= max_size {
        return text.to_string();
    }
    let mut end = max_size.saturating_sub(3);
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
