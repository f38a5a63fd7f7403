//! Heuristic markdown parser for decision record documents.
//!
//! Decision documents are free text with loose conventions, so this parser
//! is lenient by contract: the only hard failure is a filename without a
//! sequence number. Every other absent field degrades to a documented
//! default. Section-to-field mapping is an ordered rule table so the
//! heuristics stay unit-testable in isolation.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::decision::{
    Complexity, Consequences, DecisionRecord, DecisionStatus, EvidenceItem, Impact,
    ImplementationStatus, RecordMetadata,
};
use crate::domain::foundation::{DecisionId, EngineError};
use crate::ports::{DecisionParser, RawDocument};

/// Confidence assigned to evidence parsed out of a document.
const PARSED_EVIDENCE_CONFIDENCE: u8 = 80;

/// Keywords that mark a decision as critical impact. Checked before the
/// high-impact set and short-circuits.
static CRITICAL_KEYWORDS: &[&str] = &["breaking", "migration", "legacy", "deprecated"];

/// Keywords that mark a decision as high impact.
static HIGH_IMPACT_KEYWORDS: &[&str] = &[
    "architecture",
    "security",
    "performance",
    "database",
    "framework",
];

/// Record field a named section can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionField {
    Problem,
    Decision,
    Rationale,
    Consequences,
    Alternatives,
}

/// Ordered section-name rules: the first rule with a matching substring
/// wins. Matching is case-insensitive over the normalized section name.
pub static SECTION_RULES: &[(&[&str], SectionField)] = &[
    (&["problem", "context"], SectionField::Problem),
    (&["decision"], SectionField::Decision),
    (&["rationale", "reason"], SectionField::Rationale),
    (&["consequence", "impact"], SectionField::Consequences),
    (&["alternative", "option"], SectionField::Alternatives),
];

/// Applies the ordered rule table to a normalized section name.
pub fn match_section(name: &str) -> Option<SectionField> {
    let lowered = name.to_lowercase();
    SECTION_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, field)| *field)
}

static REFERENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z]+-\d{4})\b").expect("valid reference pattern"));

/// A named `##` section with its body.
#[derive(Debug, Clone, PartialEq)]
struct Section {
    name: String,
    body: String,
}

/// Regex-driven implementation of `DecisionParser`.
#[derive(Debug, Clone)]
pub struct MarkdownDecisionParser {
    filename_regex: Regex,
    status_regex: Regex,
    date_regex: Regex,
    author_regex: Regex,
    component_regex: Regex,
    tags_regex: Regex,
    implementation_regex: Regex,
    review_date_regex: Regex,
    supersedes_regex: Regex,
    superseded_by_regex: Regex,
    evidence_line_regex: Regex,
}

impl Default for MarkdownDecisionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownDecisionParser {
    /// Creates a parser with precompiled regexes.
    pub fn new() -> Self {
        Self {
            // Matches "ADR-0001-use-postgres.md" and similar.
            filename_regex: Regex::new(r"^([A-Za-z]+)-(\d{4})-([^.]+)")
                .expect("valid filename pattern"),
            // The `\*{0,2}` on both sides of the colon accepts the plain
            // `Key: value` form as well as markdown-bold `**Key:** value`.
            status_regex: Regex::new(r"(?im)^\s*\*{0,2}Status\s*:\s*\*{0,2}\s*(.+)$")
                .expect("valid status pattern"),
            date_regex: Regex::new(r"(?im)^\s*\*{0,2}Date\s*:\s*\*{0,2}\s*(\d{4}-\d{2}-\d{2})")
                .expect("valid date pattern"),
            author_regex: Regex::new(r"(?im)^\s*\*{0,2}Author\s*:\s*\*{0,2}\s*(.+)$")
                .expect("valid author pattern"),
            component_regex: Regex::new(r"(?im)^\s*\*{0,2}Component\s*:\s*\*{0,2}\s*(.+)$")
                .expect("valid component pattern"),
            tags_regex: Regex::new(r"(?im)^\s*\*{0,2}Tags\s*:\s*\*{0,2}\s*(.+)$")
                .expect("valid tags pattern"),
            implementation_regex: Regex::new(
                r"(?im)^\s*\*{0,2}Implementation\s*:\s*\*{0,2}\s*(.+)$",
            )
            .expect("valid implementation pattern"),
            review_date_regex: Regex::new(
                r"(?im)^\s*\*{0,2}Review\s*Date\s*:\s*\*{0,2}\s*(\d{4}-\d{2}-\d{2})",
            )
            .expect("valid review date pattern"),
            supersedes_regex: Regex::new(r"(?im)^\s*\*{0,2}Supersedes\s*:\s*\*{0,2}\s*(.+)$")
                .expect("valid supersedes pattern"),
            superseded_by_regex: Regex::new(
                r"(?im)^\s*\*{0,2}Superseded[\s-]by\s*:\s*\*{0,2}\s*(.+)$",
            )
            .expect("valid superseded-by pattern"),
            // Matches "- <description>: <value> (<source>)".
            evidence_line_regex: Regex::new(
                r"^-\s*(.+?):\s*(-?\d+(?:\.\d+)?)\s*\(([^)]+)\)\s*$",
            )
            .expect("valid evidence line pattern"),
        }
    }

    /// Extracts (prefix, number, slug) from a `PREFIX-NNNN-slug` filename.
    fn parse_filename(&self, file_name: &str) -> Option<(String, u32, String)> {
        let caps = self.filename_regex.captures(file_name)?;
        let prefix = caps.get(1)?.as_str().to_string();
        let number = caps.get(2)?.as_str().parse().ok()?;
        let slug = caps.get(3)?.as_str().to_string();
        Some((prefix, number, slug))
    }

    /// Splits content into the title and the named `##` sections. `###`
    /// headings stay inside their parent section body.
    fn split_sections(&self, content: &str) -> (Option<String>, Vec<Section>) {
        let mut title = None;
        let mut sections: Vec<Section> = Vec::new();
        let mut current: Option<(String, Vec<String>)> = None;

        for line in content.lines() {
            let trimmed = line.trim_end();
            if trimmed.starts_with("## ") {
                if let Some((name, body)) = current.take() {
                    sections.push(Section {
                        name,
                        body: body.join("\n"),
                    });
                }
                let name = trimmed[3..]
                    .trim()
                    .to_lowercase()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join("_");
                current = Some((name, Vec::new()));
            } else if trimmed.starts_with("# ") && !trimmed.starts_with("## ") {
                if let Some((name, body)) = current.take() {
                    sections.push(Section {
                        name,
                        body: body.join("\n"),
                    });
                }
                if title.is_none() {
                    title = Some(trimmed[2..].trim().to_string());
                }
            } else if let Some((_, body)) = current.as_mut() {
                body.push(line.to_string());
            }
        }
        if let Some((name, body)) = current.take() {
            sections.push(Section {
                name,
                body: body.join("\n"),
            });
        }

        (title, sections)
    }

    /// Extracts a `###` sub-section body matched by heading substring,
    /// case-insensitive, running to the next `###` or end of document.
    fn subsection<'a>(&self, content: &'a str, heading_contains: &str) -> Option<String> {
        let needle = heading_contains.to_lowercase();
        let mut collecting = false;
        let mut body = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim_end();
            if trimmed.starts_with("### ") {
                if collecting {
                    break;
                }
                collecting = trimmed[4..].trim().to_lowercase().contains(&needle);
                continue;
            }
            if collecting {
                body.push(line);
            }
        }

        if body.is_empty() && !collecting {
            None
        } else {
            Some(body.join("\n"))
        }
    }

    /// List items: lines beginning with `-`.
    fn list_items(body: &str) -> Vec<String> {
        body.lines()
            .map(str::trim)
            .filter(|l| l.starts_with('-'))
            .map(|l| l.trim_start_matches('-').trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// First capture of a single-line regex, trimmed.
    fn capture_scalar(&self, regex: &Regex, content: &str) -> Option<String> {
        regex
            .captures(content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn parse_date(&self, regex: &Regex, content: &str) -> Option<DateTime<Utc>> {
        let raw = self.capture_scalar(regex, content)?;
        let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok()?;
        Some(DateTime::from_naive_utc_and_offset(
            date.and_hms_opt(0, 0, 0)?,
            Utc,
        ))
    }

    /// Evidence lines in the `- <description>: <value> (<source>)` shape.
    fn parse_evidence(&self, body: &str) -> Vec<EvidenceItem> {
        body.lines()
            .filter_map(|line| {
                let caps = self.evidence_line_regex.captures(line.trim())?;
                let description = caps.get(1)?.as_str().trim().to_string();
                let value: f64 = caps.get(2)?.as_str().parse().ok()?;
                let source = caps.get(3)?.as_str().trim().to_string();
                Some(EvidenceItem::metric(
                    description,
                    value,
                    source,
                    PARSED_EVIDENCE_CONFIDENCE,
                ))
            })
            .collect()
    }

    /// Every decision id mentioned anywhere in the text, deduplicated,
    /// excluding the record's own id.
    fn extract_references(content: &str, own_id: &DecisionId) -> Vec<DecisionId> {
        let mut seen = Vec::new();
        for caps in REFERENCE_PATTERN.captures_iter(content) {
            let raw = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            if raw == own_id.as_str() {
                continue;
            }
            if let Ok(id) = raw.parse::<DecisionId>() {
                if !seen.contains(&id) {
                    seen.push(id);
                }
            }
        }
        seen
    }

    /// References listed on one scalar line (Supersedes / Superseded by).
    fn extract_reference_list(&self, regex: &Regex, content: &str) -> Vec<DecisionId> {
        self.capture_scalar(regex, content)
            .map(|line| {
                REFERENCE_PATTERN
                    .captures_iter(&line)
                    .filter_map(|c| c.get(1)?.as_str().parse().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Word count > 1000 or section count > 8 is high; > 500 / > 5 medium.
    fn derive_complexity(content: &str, section_count: usize) -> Complexity {
        let word_count = content.split_whitespace().count();
        if word_count > 1000 || section_count > 8 {
            Complexity::High
        } else if word_count > 500 || section_count > 5 {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }

    /// Keyword heuristic over the whole text. The critical set is checked
    /// first and short-circuits. `Low` is intentionally unreachable here:
    /// a decision worth writing down is assumed at least medium impact.
    fn derive_impact(content: &str) -> Impact {
        let lowered = content.to_lowercase();
        if CRITICAL_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            Impact::Critical
        } else if HIGH_IMPACT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            Impact::High
        } else {
            Impact::Medium
        }
    }

    /// Humanizes a filename slug into a fallback title.
    fn title_from_slug(slug: &str) -> String {
        slug.replace(['-', '_'], " ").trim().to_string()
    }
}

impl DecisionParser for MarkdownDecisionParser {
    fn parse(&self, document: &RawDocument) -> Result<DecisionRecord, EngineError> {
        let content = &document.content;

        let (prefix, number, slug) =
            self.parse_filename(&document.file_name)
                .ok_or_else(|| EngineError::ParseFailure {
                    file: document.file_name.clone(),
                    reason: "filename does not match PREFIX-NNNN-slug".into(),
                })?;
        let id = DecisionId::from_parts(&prefix, number);

        let (title, sections) = self.split_sections(content);
        let title = title.unwrap_or_else(|| Self::title_from_slug(&slug));

        let mut problem = String::new();
        let mut decision = String::new();
        let mut rationale = String::new();
        let mut alternatives: Vec<String> = Vec::new();

        for section in &sections {
            match match_section(&section.name) {
                Some(SectionField::Problem) => problem = section.body.trim().to_string(),
                Some(SectionField::Decision) => decision = section.body.trim().to_string(),
                Some(SectionField::Rationale) => rationale = section.body.trim().to_string(),
                Some(SectionField::Alternatives) => {
                    for line in section.body.lines() {
                        let item = line.trim().trim_start_matches('-').trim();
                        if !item.is_empty() && !item.starts_with("###") {
                            alternatives.push(item.to_string());
                        }
                    }
                }
                // Structured consequences come from the ### sub-sections.
                Some(SectionField::Consequences) | None => {}
            }
        }

        let consequences = Consequences {
            positive: self
                .subsection(content, "positive consequence")
                .map(|b| Self::list_items(&b))
                .unwrap_or_default(),
            negative: self
                .subsection(content, "negative consequence")
                .map(|b| Self::list_items(&b))
                .unwrap_or_default(),
            risks: self
                .subsection(content, "risk")
                .map(|b| Self::list_items(&b))
                .unwrap_or_default(),
        };

        if let Some(body) = self.subsection(content, "alternatives considered") {
            for item in Self::list_items(&body) {
                if !alternatives.contains(&item) {
                    alternatives.push(item);
                }
            }
        }

        let evidence = self
            .subsection(content, "evidence")
            .map(|b| self.parse_evidence(&b))
            .unwrap_or_default();

        let status = self
            .capture_scalar(&self.status_regex, content)
            .and_then(|s| s.parse().ok())
            .unwrap_or(DecisionStatus::Proposed);
        let implementation_status = self
            .capture_scalar(&self.implementation_regex, content)
            .and_then(|s| s.parse().ok())
            .unwrap_or(ImplementationStatus::Planned);
        let date = self
            .parse_date(&self.date_regex, content)
            .unwrap_or_else(Utc::now);
        let author = self
            .capture_scalar(&self.author_regex, content)
            .unwrap_or_else(|| "Unknown".to_string());
        let component = self
            .capture_scalar(&self.component_regex, content)
            .unwrap_or_else(|| "General".to_string());
        let tags = self
            .capture_scalar(&self.tags_regex, content)
            .map(|line| {
                line.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let linked_decisions = Self::extract_references(content, &id);
        let supersedes = self.extract_reference_list(&self.supersedes_regex, content);
        let superseded_by = self
            .extract_reference_list(&self.superseded_by_regex, content)
            .into_iter()
            .next();

        let metadata = RecordMetadata {
            file_path: document.file_name.clone(),
            last_modified: document.last_modified,
            size: content.len(),
            complexity: Self::derive_complexity(content, sections.len()),
            impact: Self::derive_impact(content),
        };

        Ok(DecisionRecord {
            id,
            number,
            title,
            status,
            date,
            author,
            component,
            problem,
            decision,
            rationale,
            consequences,
            alternatives,
            evidence,
            linked_decisions,
            supersedes,
            superseded_by,
            tags,
            review_date: self.parse_date(&self.review_date_regex, content),
            implementation_status,
            metadata,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════
