//! Outline extraction from freeform model output.
//!
//! The model is asked to answer with a heading-structured markdown outline,
//! but replies may carry extra prose around it. [`OutlineExtractor`] scans the
//! reply line by line and isolates the outline region, falling back to the
//! raw text when no valid region is found. Nothing is ever synthesized.

use crate::config::{DEFAULT_CANONICAL_HEADING, OutlineConfig};
use serde::{Deserialize, Serialize};

/// Marker character that opens a heading line.
const HEADING_MARKER: char = '#';

/// Where an [`Outline`]'s text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineSource {
    /// A captured region carrying the canonical heading.
    Derived,
    /// No valid region; the outline is the raw input unchanged.
    RawFallback,
}

/// Heading-structured text consumed by the diagram renderer.
///
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    text: String,
    source: OutlineSource,
}

impl Outline {
    /// Wraps text that is already known to be an outline (e.g. a stored `.md`).
    pub fn from_markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: OutlineSource::Derived,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn source(&self) -> OutlineSource {
        self.source
    }

    pub fn is_derived(&self) -> bool {
        self.source == OutlineSource::Derived
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl std::fmt::Display for Outline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    Capturing,
}

/// Line-scanning state machine that isolates the outline region of a reply.
///
/// - a heading line moves to `Capturing` and is kept; the canonical heading
///   additionally marks the result as a valid derived outline
/// - while capturing, non-blank lines accumulate
/// - a blank line ends extraction once more than `min_region_lines` lines are
///   held; a shorter region is dropped as noise and scanning resumes
///
/// A legitimate outline of `min_region_lines` lines or fewer that is followed
/// by a blank line is therefore discarded. This is kept as-is.
#[derive(Debug, Clone)]
pub struct OutlineExtractor {
    canonical_heading: String,
    min_region_lines: usize,
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self {
            canonical_heading: DEFAULT_CANONICAL_HEADING.to_string(),
            min_region_lines: 5,
        }
    }
}

impl From<&OutlineConfig> for OutlineExtractor {
    fn from(config: &OutlineConfig) -> Self {
        Self {
            canonical_heading: config.canonical_heading.trim().to_string(),
            min_region_lines: config.min_region_lines,
        }
    }
}

impl OutlineExtractor {
    pub fn new(canonical_heading: impl Into<String>, min_region_lines: usize) -> Self {
        Self {
            canonical_heading: canonical_heading.into(),
            min_region_lines,
        }
    }

    pub fn extract(&self, raw: &str) -> Outline {
        let mut state = ScanState::Scanning;
        let mut region: Vec<&str> = Vec::new();
        let mut canonical_seen = false;

        for line in raw.split('\n') {
            let blank = line.trim().is_empty();

            if line.starts_with(HEADING_MARKER) {
                state = ScanState::Capturing;
                region.push(line);
                if line.trim() == self.canonical_heading {
                    canonical_seen = true;
                }
                continue;
            }

            match (state, blank) {
                (ScanState::Capturing, false) => region.push(line),
                (ScanState::Capturing, true) => {
                    if region.len() > self.min_region_lines {
                        break;
                    }
                    state = ScanState::Scanning;
                    region.clear();
                }
                (ScanState::Scanning, _) => {}
            }
        }

        if canonical_seen && !region.is_empty() {
            Outline {
                text: region.join("\n"),
                source: OutlineSource::Derived,
            }
        } else {
            Outline {
                text: raw.to_string(),
                source: OutlineSource::RawFallback,
            }
        }
    }
}

/// Extracts an outline with the default canonical heading and length guard.
pub fn extract_outline(raw: &str) -> Outline {
    OutlineExtractor::default().extract(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_region_before_blank_line() {
        let raw = "# 对话分析\nfoo\nbar\nbaz\nqux\nquux\n\nnext";
        let outline = extract_outline(raw);

        assert!(outline.is_derived());
        assert_eq!(outline.as_str(), "# 对话分析\nfoo\nbar\nbaz\nqux\nquux");
    }

    #[test]
    fn test_canonical_outline_surrounded_by_prose() {
        let raw = "Sure, here is the analysis.\n\
                   \n\
                   # 对话分析\n\
                   ## 背景\n\
                   ### 起因\n\
                   ## 结论\n\
                   ### 要点一\n\
                   ### 要点二\n\
                   \n\
                   Hope this helps!";
        let outline = extract_outline(raw);

        assert_eq!(
            outline.as_str(),
            "# 对话分析\n## 背景\n### 起因\n## 结论\n### 要点一\n### 要点二"
        );
    }

    #[test]
    fn test_no_headings_returns_input_unchanged() {
        let raw = "just a plain answer\n\nwith two paragraphs\n";
        let outline = extract_outline(raw);

        assert_eq!(outline.source(), OutlineSource::RawFallback);
        assert_eq!(outline.as_str(), raw);
    }

    #[test]
    fn test_short_region_followed_by_blank_is_discarded() {
        let raw = "# 对话分析\n## a\n## b\n\ntrailing prose";
        let outline = extract_outline(raw);

        assert_eq!(outline.source(), OutlineSource::RawFallback);
        assert_eq!(outline.as_str(), raw);
    }

    #[test]
    fn test_exactly_min_lines_is_still_discarded() {
        let raw = "# 对话分析\na\nb\nc\nd\n\nafter";
        assert_eq!(extract_outline(raw).as_str(), raw);
    }

    #[test]
    fn test_headings_without_canonical_title_fall_back() {
        let raw = "# 主题\n## a\n## b\n## c\n## d\n## e\n\nmore";
        let outline = extract_outline(raw);

        assert!(!outline.is_derived());
        assert_eq!(outline.as_str(), raw);
    }

    #[test]
    fn test_region_running_to_end_of_input_is_kept() {
        let raw = "intro\n# 对话分析\n## only child";
        let outline = extract_outline(raw);

        assert!(outline.is_derived());
        assert_eq!(outline.as_str(), "# 对话分析\n## only child");
    }

    #[test]
    fn test_noise_region_then_real_outline() {
        let raw = "# note\nshort\n\n# 对话分析\n## a\n### a1\n## b\n### b1\n### b2\n\nbye";
        let outline = extract_outline(raw);

        assert_eq!(
            outline.as_str(),
            "# 对话分析\n## a\n### a1\n## b\n### b1\n### b2"
        );
    }

    #[test]
    fn test_custom_heading_and_guard() {
        let extractor = OutlineExtractor::new("# Analysis", 1);
        let outline = extractor.extract("# Analysis\n## point\n\ntail");

        assert_eq!(outline.as_str(), "# Analysis\n## point");
    }
}
