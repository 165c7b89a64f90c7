//! HTML to markdown conversion
//!
//! Best-effort single-pass converter: ATX headings, fenced code blocks,
//! dash lists. Malformed HTML never fails, it just converts what it can.

use std::iter::Peekable;
use std::str::Chars;

/// Elements whose content never reaches the output
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "iframe", "svg", "head"];

/// Rough check that a fetched body is an HTML document
pub fn looks_like_html(body: &str) -> bool {
    let trimmed = body.trim_start();
    trimmed.starts_with("<!DOCTYPE")
        || trimmed.starts_with("<!doctype")
        || trimmed.starts_with("<html")
}

/// Convert an HTML document to markdown
pub fn html_to_markdown(html: &str) -> String {
    let mut writer = MarkdownWriter::default();
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '<' {
            let tag = read_tag(&mut chars);
            writer.handle_tag(&tag);
        } else {
            writer.push_text(c, &mut chars);
        }
    }

    tidy(&writer.out)
}

/// Accumulates markdown output while walking the tag stream
#[derive(Default)]
struct MarkdownWriter {
    out: String,
    skip_depth: usize,
    list_depth: usize,
    in_pre: bool,
    in_blockquote: bool,
    pending_link: Option<String>,
}

impl MarkdownWriter {
    fn handle_tag(&mut self, tag: &str) {
        let (closing, name) = tag_name(tag);

        if SKIPPED_ELEMENTS.contains(&name.as_str()) {
            if closing {
                self.skip_depth = self.skip_depth.saturating_sub(1);
            } else if !tag.ends_with('/') {
                self.skip_depth += 1;
            }
            return;
        }

        if self.skip_depth > 0 {
            return;
        }

        match name.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if closing {
                    self.out.push_str("\n\n");
                } else {
                    let level = name[1..].parse::<usize>().unwrap_or(1);
                    self.out.push('\n');
                    self.out.push_str(&"#".repeat(level));
                    self.out.push(' ');
                }
            }
            "p" | "div" | "section" | "article" | "main" | "header" | "footer" => {
                if closing {
                    self.out.push_str("\n\n");
                }
            }
            "br" => self.out.push('\n'),
            "hr" => self.out.push_str("\n---\n"),
            "ul" | "ol" => {
                if closing {
                    self.list_depth = self.list_depth.saturating_sub(1);
                    if self.list_depth == 0 {
                        self.out.push('\n');
                    }
                } else {
                    self.list_depth += 1;
                }
            }
            "li" => {
                if !closing {
                    self.out.push('\n');
                    self.out
                        .push_str(&"  ".repeat(self.list_depth.saturating_sub(1)));
                    self.out.push_str("- ");
                }
            }
            "strong" | "b" => self.out.push_str("**"),
            "em" | "i" => self.out.push('*'),
            "pre" => {
                self.out.push_str("\n```\n");
                self.in_pre = !closing;
            }
            "code" => {
                if !self.in_pre {
                    self.out.push('`');
                }
            }
            "blockquote" => {
                if closing {
                    self.in_blockquote = false;
                    self.out.push('\n');
                } else {
                    self.in_blockquote = true;
                    self.out.push_str("\n> ");
                }
            }
            "a" => {
                if closing {
                    if let Some(href) = self.pending_link.take() {
                        self.out.push_str("](");
                        self.out.push_str(&href);
                        self.out.push(')');
                    }
                } else if let Some(href) = attr_value(tag, "href") {
                    self.pending_link = Some(href);
                    self.out.push('[');
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, c: char, chars: &mut Peekable<Chars>) {
        if self.skip_depth > 0 {
            return;
        }
        if c == '&' {
            let decoded = decode_entity(chars);
            self.out.push_str(&decoded);
        } else if c == '\n' && self.in_blockquote {
            self.out.push_str("\n> ");
        } else {
            self.out.push(c);
        }
    }
}

/// Consume chars up to and including the closing `>`
fn read_tag(chars: &mut Peekable<Chars>) -> String {
    let mut tag = String::new();
    for c in chars.by_ref() {
        if c == '>' {
            break;
        }
        tag.push(c);
    }
    tag
}

/// Split a raw tag into (is_closing, lowercase element name)
fn tag_name(tag: &str) -> (bool, String) {
    let closing = tag.starts_with('/');
    let body = tag.trim_start_matches('/');
    let name: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    (closing, name)
}

/// Extract an attribute value from a raw tag, handling both quote styles
fn attr_value(tag: &str, attr: &str) -> Option<String> {
    let lower = tag.to_ascii_lowercase();
    let key = format!("{}=", attr);
    let at = lower.find(&key)?;
    let rest = tag[at + key.len()..].trim_start();

    let mut chars = rest.chars();
    match chars.next()? {
        q @ ('"' | '\'') => {
            let inner = &rest[1..];
            let end = inner.find(q)?;
            Some(inner[..end].to_string())
        }
        _ => {
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '>')
                .unwrap_or(rest.len());
            Some(rest[..end].to_string())
        }
    }
}

/// Decode an HTML entity after the `&` has been consumed
///
/// Unknown or unterminated entities come back verbatim.
fn decode_entity(chars: &mut Peekable<Chars>) -> String {
    let mut name = String::new();
    loop {
        match chars.peek() {
            Some(&';') => {
                chars.next();
                break;
            }
            Some(&c) if c.is_ascii_alphanumeric() || c == '#' => {
                name.push(c);
                chars.next();
                if name.len() > 12 {
                    return format!("&{}", name);
                }
            }
            _ => return format!("&{}", name),
        }
    }
    resolve_entity(&name).unwrap_or_else(|| format!("&{};", name))
}

fn resolve_entity(name: &str) -> Option<String> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" | "#39" => '\'',
        "nbsp" => ' ',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                digits.parse::<u32>().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some(c.to_string())
}

/// Normalize whitespace: collapse runs inside lines, cap blank lines at one,
/// trim the edges. Fenced code lines are left as written.
fn tidy(s: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut blanks = 0usize;
    let mut in_fence = false;

    for raw in s.lines() {
        let line = if in_fence {
            raw.trim_end().to_string()
        } else {
            collapse_spaces(raw)
        };

        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }

        if line.is_empty() && !in_fence {
            blanks += 1;
            if blanks == 1 && !lines.is_empty() {
                lines.push(String::new());
            }
        } else {
            blanks = 0;
            lines.push(line);
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Collapse interior space/tab runs to a single space, preserving leading
/// indentation for nested list items
fn collapse_spaces(line: &str) -> String {
    let trimmed = line.trim_end();
    let indent_len = trimmed.len() - trimmed.trim_start_matches(' ').len();
    let (indent, rest) = trimmed.split_at(indent_len);

    let mut out = String::with_capacity(trimmed.len());
    out.push_str(indent);
    let mut prev_space = false;
    for c in rest.chars() {
        if c == ' ' || c == '\t' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            prev_space = false;
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<!DOCTYPE html><html>"));
        assert!(looks_like_html("  <html lang=\"en\">"));
        assert!(looks_like_html("<!doctype html>"));
        assert!(!looks_like_html("# Already markdown"));
        assert!(!looks_like_html("{\"json\": true}"));
    }

    #[test]
    fn test_atx_headings() {
        let md = html_to_markdown("<h1>Title</h1><h2>Sub</h2><h3>Deep</h3>");
        assert!(md.contains("# Title"));
        assert!(md.contains("## Sub"));
        assert!(md.contains("### Deep"));
    }

    #[test]
    fn test_paragraphs_separated() {
        let md = html_to_markdown("<p>First</p><p>Second</p>");
        assert!(md.contains("First"));
        assert!(md.contains("Second"));
        assert!(md.contains("First\n\nSecond"));
    }

    #[test]
    fn test_lists() {
        let md = html_to_markdown("<ul><li>One</li><li>Two</li></ul>");
        assert!(md.contains("- One"));
        assert!(md.contains("- Two"));
    }

    #[test]
    fn test_emphasis() {
        let md = html_to_markdown("<p><strong>bold</strong> and <em>italic</em></p>");
        assert!(md.contains("**bold**"));
        assert!(md.contains("*italic*"));
    }

    #[test]
    fn test_fenced_code_blocks() {
        let md = html_to_markdown("<pre>let x = 1;</pre>");
        assert!(md.contains("```"));
        assert!(md.contains("let x = 1;"));
    }

    #[test]
    fn test_inline_code() {
        let md = html_to_markdown("<p>Use <code>cargo build</code> here</p>");
        assert!(md.contains("`cargo build`"));
    }

    #[test]
    fn test_links() {
        let md = html_to_markdown("<a href=\"https://example.com\">docs</a>");
        assert_eq!(md, "[docs](https://example.com)");
    }

    #[test]
    fn test_script_and_style_dropped() {
        let md = html_to_markdown(
            "<p>Before</p><script>alert('x');</script><style>p{}</style><p>After</p>",
        );
        assert!(md.contains("Before"));
        assert!(md.contains("After"));
        assert!(!md.contains("alert"));
        assert!(!md.contains("p{}"));
    }

    #[test]
    fn test_entities_decoded() {
        let md = html_to_markdown("<p>Tom &amp; Jerry &lt;3 &quot;quoted&quot; &#65;</p>");
        assert!(md.contains("Tom & Jerry"));
        assert!(md.contains("<3"));
        assert!(md.contains("\"quoted\""));
        assert!(md.contains('A'));
    }

    #[test]
    fn test_unknown_entity_kept() {
        let md = html_to_markdown("<p>&bogus; text</p>");
        assert!(md.contains("&bogus;"));
    }

    #[test]
    fn test_blank_lines_capped() {
        let md = html_to_markdown("<p>a</p><p></p><p></p><p>b</p>");
        assert!(!md.contains("\n\n\n"));
    }

    #[test]
    fn test_malformed_html_does_not_panic() {
        let md = html_to_markdown("<h1>Unclosed <b>mess <p>still converts");
        assert!(md.contains("Unclosed"));
        assert!(md.contains("still converts"));
    }

    #[test]
    fn test_collapse_spaces_keeps_indent() {
        assert_eq!(collapse_spaces("  - item   one  "), "  - item one");
        assert_eq!(collapse_spaces("plain\ttext"), "plain text");
    }

    #[test]
    fn test_tidy_trims_and_caps() {
        assert_eq!(tidy("\n\nhello   world\n\n\n\ntest\n\n"), "hello world\n\ntest");
    }
}
