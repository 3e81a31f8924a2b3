//! Full-text search over documents.
//!
//! The request and result types are the store's wire format. [`find_matches`]
//! implements the matching rules the store applies, and is what
//! [`crate::app::store::MemoryStore`] uses to answer searches.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Literal substring
    #[default]
    Plain,
    /// Regular expression
    Regex,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Plain => write!(f, "Plain Text"),
            SearchMode::Regex => write!(f, "Regular Expression"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub search_mode: SearchMode,
    pub case_sensitive: bool,
    pub search_folder: String,
}

/// One occurrence inside a line. Offsets are character positions, end exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub line_number: usize,
    pub line_text: String,
    #[serde(rename = "startPos")]
    pub match_start: usize,
    #[serde(rename = "endPos")]
    pub match_end: usize,
}

impl SearchMatch {
    /// Split the line into (before, matched, after) for highlighting.
    pub fn segments(&self) -> (String, String, String) {
        let chars: Vec<char> = self.line_text.chars().collect();
        let start = self.match_start.min(chars.len());
        let end = self.match_end.clamp(start, chars.len());
        (
            chars[..start].iter().collect(),
            chars[start..end].iter().collect(),
            chars[end..].iter().collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub file_path: String,
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
}

/// Total number of matches across all files.
pub fn total_matches(results: &[SearchResult]) -> usize {
    results.iter().map(|r| r.matches.len()).sum()
}

/// "Found 3 matches in 1 file"
pub fn summary(results: &[SearchResult]) -> String {
    let matches = total_matches(results);
    let files = results.len();
    format!(
        "Found {} match{} in {} file{}",
        matches,
        if matches == 1 { "" } else { "es" },
        files,
        if files == 1 { "" } else { "s" }
    )
}

impl SearchRequest {
    /// Reject requests the store would refuse, before sending them.
    pub fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("Please enter a search query".to_string());
        }
        if self.search_folder.split('/').any(|segment| segment == "..") {
            return Err("Search folder cannot be higher than root directory".to_string());
        }
        self.compile().map(|_| ())
    }

    /// Build the matcher for this request. Plain queries are escaped so they
    /// match literally.
    pub fn compile(&self) -> Result<Regex, String> {
        let pattern = match self.search_mode {
            SearchMode::Plain => regex::escape(&self.query),
            SearchMode::Regex => self.query.clone(),
        };
        RegexBuilder::new(&pattern)
            .case_insensitive(!self.case_sensitive)
            .build()
            .map_err(|e| format!("Invalid regular expression: {}", e))
    }
}

/// Find every match of `request` in `content`, line by line.
///
/// Plain mode reports overlapping occurrences (searching `aa` in `aaa` yields
/// two matches); regex mode reports the non-overlapping, non-empty matches the
/// engine finds.
pub fn find_matches(content: &str, request: &SearchRequest) -> Result<Vec<SearchMatch>, String> {
    let matcher = request.compile()?;
    let mut matches = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let spans: Vec<(usize, usize)> = match request.search_mode {
            SearchMode::Plain => overlapping_spans(&matcher, line),
            SearchMode::Regex => matcher
                .find_iter(line)
                .filter(|m| m.start() != m.end())
                .map(|m| (m.start(), m.end()))
                .collect(),
        };

        for (start, end) in spans {
            matches.push(SearchMatch {
                line_number: index + 1,
                line_text: line.to_string(),
                match_start: line[..start].chars().count(),
                match_end: line[..end].chars().count(),
            });
        }
    }

    Ok(matches)
}

fn overlapping_spans(matcher: &Regex, line: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut from = 0;
    while from <= line.len() {
        let Some(found) = matcher.find_at(line, from) else {
            break;
        };
        if found.start() == found.end() {
            break;
        }
        spans.push((found.start(), found.end()));
        // Resume one character past the start of this match
        let step = line[found.start()..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(1);
        from = found.start() + step;
    }
    spans
}
