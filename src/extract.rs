//! Record extraction: turns one eligible Markdown file into a [`BlogPost`].
//!
//! Title inference is an ordered fallback chain and lives in
//! [`infer_title`], a pure function with no filesystem or git access:
//!
//! 1. First `# `, `## ` or `### ` heading within the first
//!    [`HEADING_SCAN_LINES`] non-blank lines. A code fence ends the scan.
//! 2. A short first line, cut at its first `.` or `,`.
//! 3. The file name, `.md` stripped, `_` → space, words capitalized.
//!
//! Dates resolve through last commit → file mtime → today.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::Path;

use crate::models::BlogPost;
use crate::walker::Document;

/// Category for files at the repository root.
pub const GENERAL_CATEGORY: &str = "general";

/// `YYYY-MM-DD`, the only date shape a [`BlogPost`] carries.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Non-blank lines searched for a heading.
pub const HEADING_SCAN_LINES: usize = 10;

const FIRST_LINE_MIN_CHARS: usize = 10;
const FIRST_LINE_MAX_CHARS: usize = 100;
const FIRST_LINE_CUT_CHARS: usize = 60;

const CODE_FENCE: &str = "```";
const HEADING_MARKERS: [&str; 3] = ["# ", "## ", "### "];

/// Source of per-file authorship dates.
pub trait DateSource {
    /// Date of the most recent commit touching `relative_path`, formatted
    /// with [`DATE_FORMAT`].
    fn last_commit_date(&self, relative_path: &str) -> Option<String>;
}

/// A [`DateSource`] with no history; every date falls through to mtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl DateSource for NoHistory {
    fn last_commit_date(&self, _relative_path: &str) -> Option<String> {
        None
    }
}

pub fn infer_title(content: &str, file_name: &str) -> String {
    heading_title(content)
        .or_else(|| first_line_title(content))
        .unwrap_or_else(|| title_from_file_name(file_name))
}

fn heading_title(content: &str) -> Option<String> {
    let lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(HEADING_SCAN_LINES);

    for line in lines {
        if line.starts_with(CODE_FENCE) {
            return None;
        }
        for marker in HEADING_MARKERS {
            if let Some(rest) = line.strip_prefix(marker) {
                return Some(rest.trim().to_string());
            }
        }
    }
    None
}

fn first_line_title(content: &str) -> Option<String> {
    let line = content.lines().map(str::trim).find(|l| !l.is_empty())?;

    if line.starts_with('#') || line.starts_with("//") || line.starts_with(CODE_FENCE) {
        return None;
    }

    let len = line.chars().count();
    if len <= FIRST_LINE_MIN_CHARS || len >= FIRST_LINE_MAX_CHARS {
        return None;
    }

    if let Some(idx) = line.chars().position(|c| c == '.' || c == ',') {
        if idx > 0 && idx < FIRST_LINE_CUT_CHARS {
            let cut: String = line.chars().take(idx).collect();
            return Some(cut.trim_end().to_string());
        }
    }

    if len < FIRST_LINE_CUT_CHARS {
        Some(line.to_string())
    } else {
        None
    }
}

fn title_from_file_name(file_name: &str) -> String {
    let stem = strip_md_extension(file_name).replace('_', " ");

    let title = stem
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if title.trim().is_empty() {
        file_name.to_string()
    } else {
        title.trim().to_string()
    }
}

fn strip_md_extension(file_name: &str) -> &str {
    let split = file_name.len().saturating_sub(3);
    match file_name.get(split..) {
        Some(ext) if ext.eq_ignore_ascii_case(".md") => &file_name[..split],
        _ => file_name,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parent directory of a `/`-separated relative path, or
/// [`GENERAL_CATEGORY`] at the root.
pub fn category_for(relative_path: &str) -> String {
    match relative_path.rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => parent.to_string(),
        _ => GENERAL_CATEGORY.to_string(),
    }
}

pub fn resolve_date(dates: &dyn DateSource, relative_path: &str, absolute_path: &Path) -> String {
    dates
        .last_commit_date(relative_path)
        .or_else(|| modified_date(absolute_path))
        .unwrap_or_else(|| Local::now().format(DATE_FORMAT).to_string())
}

fn modified_date(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.format(DATE_FORMAT).to_string())
}

/// Read and describe one document. Fails only when the file cannot be read;
/// callers skip the file and keep walking. Invalid UTF-8 is replaced with
/// U+FFFD rather than dropping the post.
pub fn extract_post(dates: &dyn DateSource, doc: &Document) -> Result<BlogPost> {
    let bytes = std::fs::read(&doc.path)
        .with_context(|| format!("Failed to read {}", doc.path.display()))?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    let file_name = doc
        .relative
        .rsplit('/')
        .next()
        .unwrap_or(doc.relative.as_str());

    Ok(BlogPost {
        title: infer_title(&content, file_name),
        date: resolve_date(dates, &doc.relative, &doc.path),
        category: category_for(&doc.relative),
        path: doc.relative.clone(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    struct FixedHistory(HashMap<&'static str, &'static str>);

    impl DateSource for FixedHistory {
        fn last_commit_date(&self, relative_path: &str) -> Option<String> {
            self.0.get(relative_path).map(|d| d.to_string())
        }
    }

    fn is_date(s: &str) -> bool {
        chrono::NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok() && s.len() == 10
    }

    #[test]
    fn test_h1_heading() {
        assert_eq!(infer_title("# Hello World\n\nbody", "x.md"), "Hello World");
    }

    #[test]
    fn test_h2_and_h3_headings() {
        assert_eq!(infer_title("intro\n## Second level\n", "x.md"), "Second level");
        assert_eq!(infer_title("### Third   \n", "x.md"), "Third");
    }

    #[test]
    fn test_deeper_heading_is_not_a_title() {
        // `####` is not one of the recognized markers; short first line, filename wins.
        assert_eq!(infer_title("#### Deep\n", "deep_dive.md"), "Deep Dive");
    }

    #[test]
    fn test_heading_after_blank_lines() {
        let content = "\n\n   \n# Late Title\n";
        assert_eq!(infer_title(content, "x.md"), "Late Title");
    }

    #[test]
    fn test_heading_beyond_scan_window_is_ignored() {
        let mut content = (0..HEADING_SCAN_LINES)
            .map(|i| format!("line{}", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        content.push_str("\n# Too Late\n");
        assert_eq!(infer_title(&content, "window_test.md"), "Window Test");
    }

    #[test]
    fn test_code_fence_stops_heading_scan() {
        let content = "```rust\n# not a heading\n```\n";
        assert_eq!(infer_title(content, "code_only.md"), "Code Only");
    }

    #[test]
    fn test_first_line_cut_at_period() {
        let content = "This is a short note about testing.\nMore text";
        assert_eq!(
            infer_title(content, "x.md"),
            "This is a short note about testing"
        );
    }

    #[test]
    fn test_first_line_cut_at_comma() {
        assert_eq!(
            infer_title("Rust lifetimes, explained simply", "x.md"),
            "Rust lifetimes"
        );
    }

    #[test]
    fn test_first_line_without_punctuation() {
        assert_eq!(
            infer_title("Borrow checker tricks I keep forgetting", "x.md"),
            "Borrow checker tricks I keep forgetting"
        );
    }

    #[test]
    fn test_first_line_too_short_or_too_long() {
        assert_eq!(infer_title("Too short", "short_one.md"), "Short One");

        let long = "word ".repeat(25);
        assert_eq!(infer_title(&long, "long_one.md"), "Long One");
    }

    #[test]
    fn test_first_line_period_past_column_60() {
        let line = format!("{} end.", "a".repeat(64));
        assert_eq!(infer_title(&line, "late_period.md"), "Late Period");
    }

    #[test]
    fn test_comment_line_is_not_a_title() {
        assert_eq!(
            infer_title("// generated file, do not edit", "gen_notes.md"),
            "Gen Notes"
        );
    }

    #[test]
    fn test_first_line_counts_characters_not_bytes() {
        // 12 characters, 24 bytes in UTF-8.
        let line = "ééééé ééééé.";
        assert_eq!(infer_title(line, "x.md"), "ééééé ééééé");
    }

    #[test]
    fn test_filename_fallback() {
        assert_eq!(infer_title("", "my_notes.md"), "My Notes");
        assert_eq!(infer_title("", "Upper.MD"), "Upper");
        assert_eq!(infer_title("", "already-dashed.md"), "Already-dashed");
    }

    #[test]
    fn test_filename_fallback_never_empty() {
        assert_eq!(infer_title("", "_.md"), "_.md");
    }

    #[test]
    fn test_category() {
        assert_eq!(category_for("go/slices.md"), "go");
        assert_eq!(category_for("rust/async/pin.md"), "rust/async");
        assert_eq!(category_for("notes.md"), GENERAL_CATEGORY);
    }

    #[test]
    fn test_date_prefers_history() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.md");
        fs::write(&file, "x").unwrap();

        let history = FixedHistory(HashMap::from([("a.md", "2021-03-04")]));
        assert_eq!(resolve_date(&history, "a.md", &file), "2021-03-04");
    }

    #[test]
    fn test_date_falls_back_to_mtime() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.md");
        fs::write(&file, "x").unwrap();

        let date = resolve_date(&NoHistory, "a.md", &file);
        assert_eq!(date, Local::now().format(DATE_FORMAT).to_string());
    }

    #[test]
    fn test_date_falls_back_to_today() {
        let date = resolve_date(&NoHistory, "gone.md", Path::new("/nonexistent/gone.md"));
        assert!(is_date(&date));
    }

    #[test]
    fn test_extract_post() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("go")).unwrap();
        let file = tmp.path().join("go/slices.md");
        fs::write(&file, "# Slices\n\nappend may reallocate").unwrap();

        let doc = Document {
            path: file,
            relative: "go/slices.md".to_string(),
        };
        let history = FixedHistory(HashMap::from([("go/slices.md", "2024-01-02")]));
        let post = extract_post(&history, &doc).unwrap();

        assert_eq!(post.title, "Slices");
        assert_eq!(post.category, "go");
        assert_eq!(post.path, "go/slices.md");
        assert_eq!(post.date, "2024-01-02");
        assert_eq!(post.content, "# Slices\n\nappend may reallocate");
    }

    #[test]
    fn test_extract_post_keeps_latin1_note() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("cafe.md");
        fs::write(&file, b"# Caf\xe9 cr\xe8me\n\nbody").unwrap();

        let doc = Document {
            path: file,
            relative: "cafe.md".to_string(),
        };
        let post = extract_post(&NoHistory, &doc).unwrap();
        assert_eq!(post.title, "Caf\u{FFFD} cr\u{FFFD}me");
        assert_eq!(post.content, "# Caf\u{FFFD} cr\u{FFFD}me\n\nbody");
    }

    #[test]
    fn test_extract_post_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let doc = Document {
            path: tmp.path().join("vanished.md"),
            relative: "vanished.md".to_string(),
        };
        assert!(extract_post(&NoHistory, &doc).is_err());
    }
}
