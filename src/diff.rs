/// Character-level diff rendering.
///
/// Insertions get a green background, deletions red, unchanged spans are
/// dimmed. A newline inside an inserted/deleted span would otherwise be an
/// invisible colored character, so it renders as a marked single space
/// followed by a real newline, keeping the diff readable line-by-line.
use colored::Colorize;
use similar::{ChangeTag, TextDiff};

pub fn render_char_diff(first: &str, second: &str) -> String {
    let diff = TextDiff::from_chars(first, second);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let value = change.value();
        match change.tag() {
            ChangeTag::Equal => {
                if value == "\n" {
                    out.push('\n');
                } else {
                    out.push_str(&value.dimmed().to_string());
                }
            }
            ChangeTag::Insert => {
                if value == "\n" {
                    out.push_str(&" ".on_green().to_string());
                    out.push('\n');
                } else {
                    out.push_str(&value.on_green().to_string());
                }
            }
            ChangeTag::Delete => {
                if value == "\n" {
                    out.push_str(&" ".on_red().to_string());
                    out.push('\n');
                } else {
                    out.push_str(&value.on_red().to_string());
                }
            }
        }
    }
    out
}
