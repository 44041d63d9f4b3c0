//! String utility functions

/// Trims trailing null characters from a byte buffer
pub fn trim_trailing_nulls(buffer: &mut Vec<u8>) {
    while buffer.last() == Some(&0) {
        buffer.pop();
    }
}

/// Shortens `text` to at most `max_chars` characters for log and console output
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_trailing_nulls() {
        let mut buffer = b"ImageJ\0\0".to_vec();
        trim_trailing_nulls(&mut buffer);
        assert_eq!(buffer, b"ImageJ".to_vec());
    }

    #[test]
    fn test_truncate_for_display() {
        assert_eq!(truncate_for_display("abcdef", 3), "abc...");
        assert_eq!(truncate_for_display("abc", 3), "abc");
    }
}
