//! Statement splitting for SQL files.
//!
//! Line-oriented: comment and blank lines are skipped, other lines
//! accumulate until a trailing `;` closes the statement. An unterminated
//! buffer at end-of-file is still emitted as a candidate.

use super::types::{Fragment, LineSpan};
use super::contains_sql_keyword;

pub fn extract(source: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut buffer = String::new();
    let mut start_line = 0u32;
    let mut last_line = 0u32;

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx as u32 + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with("--") || trimmed.starts_with("/*") {
            continue;
        }

        if buffer.is_empty() {
            start_line = line_no;
        } else {
            buffer.push('\n');
        }
        buffer.push_str(trimmed);
        last_line = line_no;

        if trimmed.ends_with(';') {
            flush(&mut buffer, start_line, line_no, &mut fragments);
        }
    }

    // Trailing unterminated statement.
    flush(&mut buffer, start_line, last_line, &mut fragments);

    fragments
}

fn flush(buffer: &mut String, start_line: u32, end_line: u32, fragments: &mut Vec<Fragment>) {
    if !buffer.is_empty() && contains_sql_keyword(buffer) {
        fragments.push(Fragment::sql(
            buffer.clone(),
            LineSpan::range(start_line, end_line),
        ));
    }
    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_semicolon_terminated_statements() {
        let source = "\
-- schema bootstrap
CREATE TABLE users (id INT);

UPDATE users
SET active = false
WHERE id = 1;
";
        let fragments = extract(source);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text(), "CREATE TABLE users (id INT);");
        assert_eq!(fragments[0].span(), LineSpan::range(2, 2));
        assert_eq!(fragments[1].span(), LineSpan::range(4, 6));
        assert!(fragments[1].text().contains("WHERE id = 1;"));
    }

    #[test]
    fn emits_trailing_unterminated_statement() {
        let fragments = extract("SELECT *\nFROM users");
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].span(), LineSpan::range(1, 2));
    }

    #[test]
    fn skips_comments_and_keywordless_lines() {
        let source = "-- DELETE FROM users;\n/* block comment */\nfoo bar baz;\n";
        assert!(extract(source).is_empty());
    }
}
