pub const HEADING_DETAILED_ANALYSIS: &str = "Detailed Analysis";
pub const HEADING_RECOMMENDATIONS: &str = "Security Recommendations";
pub const HEADING_SOURCES: &str = "Sources Consulted";

/// Ordered heading → body mapping extracted from the Validator's Markdown.
/// The model is untrusted: headings may be missing, renamed or duplicated.
/// Absent headings yield nothing; unrecognized ones are kept in the map but
/// ignored by the typed accessors.
#[derive(Debug, Clone, Default)]
pub struct ReportSections {
    sections: Vec<(String, String)>,
}

impl ReportSections {
    pub fn parse(markdown: &str) -> Self {
        let mut sections: Vec<(String, String)> = Vec::new();
        let mut current: Option<(String, String)> = None;

        for line in markdown.lines() {
            if let Some(heading) = heading_text(line) {
                if let Some((name, body)) = current.take() {
                    sections.push((name, body.trim().to_string()));
                }
                current = Some((heading.to_string(), String::new()));
            } else if let Some((_, body)) = current.as_mut() {
                body.push_str(line);
                body.push('\n');
            }
        }
        if let Some((name, body)) = current.take() {
            sections.push((name, body.trim().to_string()));
        }

        Self { sections }
    }

    pub fn get(&self, heading: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(name, _)| heading_matches(name, heading))
            .map(|(_, body)| body.as_str())
            .filter(|body| !body.is_empty())
    }

    pub fn detailed_analysis(&self) -> Option<&str> {
        self.get(HEADING_DETAILED_ANALYSIS)
    }

    /// Recommendation items with leading ordinal and bullet markers
    /// stripped.
    pub fn security_recommendations(&self) -> Vec<String> {
        self.get(HEADING_RECOMMENDATIONS)
            .map(|body| {
                body.lines()
                    .map(strip_list_marker)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn sources_consulted(&self) -> Vec<String> {
        self.get(HEADING_SOURCES)
            .map(|body| {
                body.lines()
                    .map(strip_list_marker)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let rest = trimmed
        .strip_prefix("### ")
        .or_else(|| trimmed.strip_prefix("## "))?;
    let text = rest.trim().trim_end_matches(':').trim_end_matches('*');
    let text = text.trim_start_matches('*').trim();
    if text.is_empty() { None } else { Some(text) }
}

fn heading_matches(found: &str, expected: &str) -> bool {
    found.trim().eq_ignore_ascii_case(expected)
}

/// Strips "1. ", "2) ", "- " and "* " style markers from a list line.
fn strip_list_marker(line: &str) -> &str {
    let trimmed = line.trim();
    let without_digits = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() < trimmed.len()
        && let Some(rest) = without_digits
            .strip_prefix('.')
            .or_else(|| without_digits.strip_prefix(')'))
    {
        return rest.trim();
    }
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .map(str::trim)
        .unwrap_or(trimmed)
}
