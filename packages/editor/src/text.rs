//! Plain text helpers for the editing surface

use std::ops::RangeInclusive;

/// What a tab key press inserts
pub const TAB: &str = "  ";

/// Clamp a byte cursor into `content`, backing off to a char boundary
pub fn clamp_cursor(content: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(content.len());
    while !content.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

/// Insert [`TAB`] at `cursor`, returning the cursor just after it
pub fn insert_tab(content: &mut String, cursor: usize) -> usize {
    let at = clamp_cursor(content, cursor);
    content.insert_str(at, TAB);
    at + TAB.len()
}

/// Number of lines as shown in the gutter. An empty buffer has one line.
pub fn line_count(content: &str) -> usize {
    content.split('\n').count()
}

pub fn line_numbers(content: &str) -> RangeInclusive<usize> {
    1..=line_count(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_tab() {
        let mut content = "ab".to_string();
        assert_eq!(insert_tab(&mut content, 1), 3);
        assert_eq!(content, "a  b");
    }

    #[test]
    fn test_insert_tab_clamps_past_end() {
        let mut content = "ab".to_string();
        assert_eq!(insert_tab(&mut content, 99), 4);
        assert_eq!(content, "ab  ");
    }

    #[test]
    fn test_insert_tab_respects_char_boundary() {
        // 'é' is two bytes, cursor 2 falls inside it
        let mut content = "aé".to_string();
        assert_eq!(insert_tab(&mut content, 2), 3);
        assert_eq!(content, "a  é");
    }

    #[test]
    fn test_line_numbers() {
        assert_eq!(line_numbers(""), 1..=1);
        assert_eq!(line_numbers("one"), 1..=1);
        assert_eq!(line_numbers("one\ntwo\n"), 1..=3);
    }
}
