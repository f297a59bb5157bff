//! Minimal PDF writer for report export.
//!
//! Emits a complete single-font document without any external PDF
//! dependency. Output is fully deterministic: no timestamps, no document
//! IDs, no environment-dependent metadata, so the same report always
//! produces byte-identical bytes.

pub const PDF_FILENAME: &str = "relatorio_analise_golpe.pdf";

const LINES_PER_PAGE: usize = 48;
const MAX_LINE_CHARS: usize = 95;

/// Renders a title and a Markdown body into PDF bytes. Markdown markers
/// are stripped and the text is reduced to Latin-1; characters outside it
/// become `?`.
pub fn render(title: &str, body: &str) -> Vec<u8> {
    let title = to_latin1(title);
    let text = to_latin1(&strip_markdown(body));

    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(wrap_line(line.trim_end(), MAX_LINE_CHARS));
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    let pages: Vec<&[String]> = lines.chunks(LINES_PER_PAGE).collect();
    let page_count = pages.len();

    // Object layout: 1 catalog, 2 page tree, 3 font, then one page object
    // and one content stream per page.
    let mut streams: Vec<Vec<u8>> = Vec::with_capacity(page_count);
    for (index, page_lines) in pages.iter().enumerate() {
        streams.push(content_stream(&title, page_lines, index == 0));
    }

    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();

    out.extend_from_slice(b"%PDF-1.4\n");

    offsets.push(out.len());
    out.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();
    offsets.push(out.len());
    out.extend_from_slice(
        format!(
            "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
            kids.join(" "),
            page_count
        )
        .as_bytes(),
    );

    offsets.push(out.len());
    out.extend_from_slice(
        b"3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
          /Encoding /WinAnsiEncoding >>\nendobj\n",
    );

    for (i, stream) in streams.iter().enumerate() {
        let page_obj = 4 + 2 * i;
        let stream_obj = page_obj + 1;

        offsets.push(out.len());
        out.extend_from_slice(
            format!(
                "{page_obj} 0 obj\n<< /Type /Page /Parent 2 0 R \
                 /MediaBox [0 0 595 842] \
                 /Resources << /Font << /F1 3 0 R >> >> \
                 /Contents {stream_obj} 0 R >>\nendobj\n"
            )
            .as_bytes(),
        );

        offsets.push(out.len());
        out.extend_from_slice(
            format!("{stream_obj} 0 obj\n<< /Length {} >>\nstream\n", stream.len()).as_bytes(),
        );
        out.extend_from_slice(stream);
        out.extend_from_slice(b"\nendstream\nendobj\n");
    }

    let xref_offset = out.len();
    let object_count = offsets.len() + 1;
    out.extend_from_slice(format!("xref\n0 {object_count}\n").as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {object_count} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        )
        .as_bytes(),
    );

    out
}

fn content_stream(title: &str, lines: &[String], first_page: bool) -> Vec<u8> {
    let mut stream: Vec<u8> = Vec::new();

    let body_start_y = if first_page {
        stream.extend_from_slice(b"BT\n/F1 16 Tf\n50 790 Td\n(");
        stream.extend_from_slice(&escape_text(title));
        stream.extend_from_slice(b") Tj\nET\n");
        760
    } else {
        800
    };

    stream.extend_from_slice(
        format!("BT\n/F1 11 Tf\n14 TL\n50 {body_start_y} Td\n").as_bytes(),
    );
    for line in lines {
        stream.extend_from_slice(b"(");
        stream.extend_from_slice(&escape_text(line));
        stream.extend_from_slice(b") Tj\nT*\n");
    }
    stream.extend_from_slice(b"ET");

    stream
}

/// Text is already Latin-1 by this point; each char maps to one byte with
/// the PDF string delimiters escaped.
fn escape_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => bytes.extend_from_slice(b"\\\\"),
            '(' => bytes.extend_from_slice(b"\\("),
            ')' => bytes.extend_from_slice(b"\\)"),
            c if (c as u32) < 256 => bytes.push(c as u8),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}

fn strip_markdown(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    for line in markdown.lines() {
        let trimmed = line.trim_start();
        let without_heading = trimmed.trim_start_matches('#').trim_start();

        if without_heading.chars().all(|c| c == '-' || c == '*')
            && without_heading.chars().count() >= 3
        {
            // horizontal rule
            out.push('\n');
            continue;
        }

        let bulleted = without_heading
            .strip_prefix("* ")
            .map(|rest| format!("- {rest}"))
            .unwrap_or_else(|| without_heading.to_string());

        let cleaned = bulleted
            .replace("**", "")
            .replace("__", "")
            .replace('`', "")
            .replace('*', "");

        out.push_str(&cleaned);
        out.push('\n');
    }
    out
}

/// Folds common typographic punctuation into ASCII, keeps Latin-1 and
/// replaces everything else with `?`. Lossy for emoji and non-Latin
/// scripts.
fn to_latin1(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2012}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' => out.push('-'),
            '\u{00A0}' => out.push(' '),
            c if (c as u32) < 256 => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in line.split(' ') {
        let word_len = word.chars().count();
        if word_len == 0 {
            continue;
        }
        if current_len > 0 && current_len + 1 + word_len > max_chars {
            wrapped.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if word_len > max_chars {
            // hard-split words longer than a full line
            let mut chunk = String::new();
            for c in word.chars() {
                chunk.push(c);
                if chunk.chars().count() == max_chars {
                    wrapped.push(std::mem::take(&mut chunk));
                }
            }
            if !chunk.is_empty() {
                current_len = chunk.chars().count();
                current = chunk;
            }
            continue;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    if wrapped.is_empty() {
        wrapped.push(String::new());
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_render_is_byte_identical_across_calls() {
        let body = "### Detailed Analysis\nThe link is a classic phishing pattern.\n";
        let first = render("Relatório de Análise", body);
        let second = render("Relatório de Análise", body);
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_structure() {
        let bytes = render("Title", "Some body text.");
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(contains(&bytes, b"startxref"));
        assert!(contains(&bytes, b"/BaseFont /Helvetica"));
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_markdown_markers_are_stripped() {
        let bytes = render("T", "### Heading\n**bold** and `code`\n");
        assert!(contains(&bytes, b"(Heading) Tj"));
        assert!(!contains(&bytes, b"###"));
        assert!(!contains(&bytes, b"**"));
        assert!(!contains(&bytes, b"`"));
    }

    #[test]
    fn test_latin1_preserved_and_emoji_replaced() {
        let bytes = render("T", "an\u{e1}lise de risco \u{1F6A8}");
        assert!(contains(&bytes, b"an\xe1lise de risco ?"));
    }

    #[test]
    fn test_parentheses_escaped() {
        let bytes = render("T", "valor (R$ 500,00) perdido");
        assert!(contains(&bytes, b"\\(R$ 500,00\\)"));
    }

    #[test]
    fn test_long_body_paginates() {
        let body = "linha de texto repetida\n".repeat(120);
        let bytes = render("T", &body);
        let pages = bytes
            .windows(b"/Contents".len())
            .filter(|w| *w == b"/Contents")
            .count();
        assert!(pages >= 2, "expected multiple pages, got {pages}");
    }

    #[test]
    fn test_wrap_line_respects_limit() {
        let wrapped = wrap_line(&"palavra ".repeat(40), 30);
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 30));
    }

    #[test]
    fn test_wrap_line_hard_splits_oversized_word() {
        let word = "x".repeat(250);
        let wrapped = wrap_line(&word, 95);
        assert_eq!(wrapped.len(), 3);
        assert_eq!(wrapped[0].len(), 95);
    }

    #[test]
    fn test_horizontal_rule_removed() {
        let stripped = strip_markdown("before\n---\nafter\n");
        assert!(!stripped.contains("---"));
        assert!(stripped.contains("before"));
        assert!(stripped.contains("after"));
    }
}
