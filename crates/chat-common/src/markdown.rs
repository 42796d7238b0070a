/// Renderer for the narrow markdown subset the assistant is prompted to use.
///
/// Supported per line:
/// - `**Heading**`: a full-line bold heading, optionally `**"Quoted"**`
/// - `* item`: a bullet item
/// - anything else: a paragraph
///
/// Inside bullets and paragraphs, `**bold**` spans are recognised. Double quotes wrapping
/// a bold span are kept outside the emphasis. An unterminated `**` is left as literal text.
/// Parsing is single-pass and non-recursive; it never fails.

const MARKER: &str = "**";
const BULLET: &str = "* ";

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";

/// Atomic unit produced by the inline bold parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSegment {
    Plain(String),
    /// `quoted` means the source wrapped the span in double quotes; they are
    /// rendered around the emphasis, not inside it.
    Bold { text: String, quoted: bool },
}

/// One displayable line of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedLine {
    Heading { text: String, quoted: bool },
    BulletItem(Vec<InlineSegment>),
    Paragraph(Vec<InlineSegment>),
}

/// Classify each non-blank line of `text`.
pub fn render(text: &str) -> Vec<RenderedLine> {
    text.lines().filter_map(render_line).collect()
}

fn render_line(line: &str) -> Option<RenderedLine> {
    if line.trim().is_empty() {
        return None;
    }

    if line.starts_with(MARKER) && line.ends_with(MARKER) {
        let inner = line.replace(MARKER, "");
        let (text, quoted) = unquote(inner.trim());
        return Some(RenderedLine::Heading {
            text: text.to_string(),
            quoted,
        });
    }

    if let Some(rest) = line.strip_prefix(BULLET) {
        return Some(RenderedLine::BulletItem(parse_inline_bold(rest)));
    }

    Some(RenderedLine::Paragraph(parse_inline_bold(line)))
}

/// Split a single line into plain and bold segments.
pub fn parse_inline_bold(text: &str) -> Vec<InlineSegment> {
    let mut segments = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        let Some(open) = remaining.find(MARKER) else {
            segments.push(InlineSegment::Plain(remaining.to_string()));
            break;
        };

        let after_open = &remaining[open + MARKER.len()..];
        let Some(close) = after_open.find(MARKER) else {
            // Unterminated emphasis: keep the rest verbatim, marker included.
            segments.push(InlineSegment::Plain(remaining.to_string()));
            break;
        };

        if open > 0 {
            segments.push(InlineSegment::Plain(remaining[..open].to_string()));
        }

        let (content, quoted) = unquote(&after_open[..close]);
        segments.push(InlineSegment::Bold {
            text: content.to_string(),
            quoted,
        });

        remaining = &after_open[close + MARKER.len()..];
    }

    segments
}

/// Strip one pair of wrapping double quotes, if present.
fn unquote(text: &str) -> (&str, bool) {
    if text.len() > 1 && text.starts_with('"') && text.ends_with('"') {
        (&text[1..text.len() - 1], true)
    } else {
        (text, false)
    }
}

/// Render lines for a terminal, one output line per rendered line.
pub fn to_ansi(lines: &[RenderedLine]) -> String {
    lines
        .iter()
        .map(|line| match line {
            RenderedLine::Heading { text, quoted } => ansi_emphasis(text, *quoted),
            RenderedLine::BulletItem(segments) => format!("  • {}", ansi_segments(segments)),
            RenderedLine::Paragraph(segments) => ansi_segments(segments),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn ansi_segments(segments: &[InlineSegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            InlineSegment::Plain(text) => text.clone(),
            InlineSegment::Bold { text, quoted } => ansi_emphasis(text, *quoted),
        })
        .collect()
}

fn ansi_emphasis(text: &str, quoted: bool) -> String {
    let quote = if quoted { "\"" } else { "" };
    format!("{quote}{ANSI_BOLD}{text}{ANSI_RESET}{quote}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> InlineSegment {
        InlineSegment::Plain(text.to_string())
    }

    fn bold(text: &str, quoted: bool) -> InlineSegment {
        InlineSegment::Bold {
            text: text.to_string(),
            quoted,
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(render("").is_empty());
        assert!(render("\n  \n\t\n").is_empty());
    }

    #[test]
    fn test_quoted_heading() {
        let lines = render("**\"Hello\"**");
        assert_eq!(
            lines,
            vec![RenderedLine::Heading {
                text: "Hello".to_string(),
                quoted: true
            }]
        );
    }

    #[test]
    fn test_plain_heading_is_trimmed() {
        let lines = render("**  Popular courses  **");
        assert_eq!(
            lines,
            vec![RenderedLine::Heading {
                text: "Popular courses".to_string(),
                quoted: false
            }]
        );
    }

    #[test]
    fn test_heading_strips_inner_markers() {
        let lines = render("**Price:** from **₹499**");
        assert_eq!(
            lines,
            vec![RenderedLine::Heading {
                text: "Price: from ₹499".to_string(),
                quoted: false
            }]
        );
    }

    #[test]
    fn test_bullet_item() {
        let lines = render("* item one");
        assert_eq!(lines, vec![RenderedLine::BulletItem(vec![plain("item one")])]);
    }

    #[test]
    fn test_bullet_with_bold() {
        let lines = render("* **Catalog:** browse by category");
        assert_eq!(
            lines,
            vec![RenderedLine::BulletItem(vec![
                bold("Catalog:", false),
                plain(" browse by category"),
            ])]
        );
    }

    #[test]
    fn test_double_marker_line_is_not_a_bullet() {
        let lines = render("**bold** start");
        assert_eq!(
            lines,
            vec![RenderedLine::Paragraph(vec![
                bold("bold", false),
                plain(" start")
            ])]
        );
    }

    #[test]
    fn test_inline_bold_segments() {
        assert_eq!(
            parse_inline_bold("plain **bold** plain"),
            vec![plain("plain "), bold("bold", false), plain(" plain")]
        );
    }

    #[test]
    fn test_inline_quoted_bold() {
        assert_eq!(
            parse_inline_bold("Try **\"Rust Basics\"** today"),
            vec![plain("Try "), bold("Rust Basics", true), plain(" today")]
        );
        assert_eq!(parse_inline_bold("**\"**"), vec![bold("\"", false)]);
    }

    #[test]
    fn test_unterminated_emphasis_kept_verbatim() {
        let lines = render("a **bold text");
        assert_eq!(
            lines,
            vec![RenderedLine::Paragraph(vec![plain("a **bold text")])]
        );
    }

    #[test]
    fn test_orphan_marker_after_closed_span() {
        assert_eq!(
            parse_inline_bold("x **a** y **z"),
            vec![plain("x "), bold("a", false), plain(" y **z")]
        );
    }

    #[test]
    fn test_mixed_reply() {
        let reply = "**Courses**\r\n\r\nWe offer:\n* **Rust** (₹499)\n* Go\nThanks!";
        let lines = render(reply);
        assert_eq!(lines.len(), 5);
        assert!(matches!(lines[0], RenderedLine::Heading { .. }));
        assert!(matches!(lines[1], RenderedLine::Paragraph(_)));
        assert!(matches!(lines[2], RenderedLine::BulletItem(_)));
        assert!(matches!(lines[3], RenderedLine::BulletItem(_)));
        assert!(matches!(lines[4], RenderedLine::Paragraph(_)));
    }

    #[test]
    fn test_to_ansi() {
        let out = to_ansi(&render("**Title**\n* one **two**"));
        assert_eq!(
            out,
            "\x1b[1mTitle\x1b[0m\n  • one \x1b[1mtwo\x1b[0m"
        );
    }
}
