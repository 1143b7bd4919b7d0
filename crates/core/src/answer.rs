//! Parsing of WolframAlpha LLM API answers.
//!
//! The LLM API returns one free-text answer where paragraphs are separated by
//! a blank line. Each paragraph is either the `Query:` echo, an `Assumption:`
//! note, the `Wolfram|Alpha website result` link, or a titled section
//! (`<Title>: <content>` with optional continuation lines). The backend has
//! been observed to duplicate the whole remainder of an answer starting at a
//! repeated `Assumption:` paragraph; [`ParsedAnswer::parse`] suppresses that
//! duplication before extracting sections.

use serde::{Deserialize, Serialize};

const QUERY_PREFIX: &str = "Query:";
const ASSUMPTION_PREFIX: &str = "Assumption:";
const WEBSITE_RESULT_PREFIX: &str = "Wolfram|Alpha website result";

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// One titled unit of a parsed answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSection {
    pub title: String,
    pub content: String,
}

/// A structured WolframAlpha answer.
///
/// Immutable value data, built fresh per [`parse`](ParsedAnswer::parse) call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAnswer {
    /// The query echoed back by the backend.
    pub query: String,
    /// The deduplicated answer body, paragraphs rejoined with blank lines.
    pub principal_text: String,
    /// Titled sections in first-appearance order, duplicate titles dropped.
    pub sections: Vec<AnswerSection>,
    /// Link to the full result page, when the answer carried one.
    pub url: Option<String>,
}

/// Errors raised while parsing an answer. Both are terminal for the call:
/// the parser has no I/O and no retryable failure mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input lacks a recoverable `Query:` paragraph.
    #[error("invalid response format: missing query")]
    MissingQuery,

    /// Parsing produced no usable answer text.
    #[error("could not extract result from response")]
    EmptyResult,
}

impl ParsedAnswer {
    /// Parse one raw LLM API answer.
    ///
    /// The query echo is decoded from the unique `Query:` paragraph. The rest
    /// of the answer is run through the duplicate-tail guard, rejoined into
    /// [`principal_text`](Self::principal_text), and folded into titled
    /// sections. The first occurrence of a section title wins; later
    /// paragraphs with the same title are dropped, not merged.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let paragraphs: Vec<&str> = raw.split(PARAGRAPH_SEPARATOR).collect();

        let query = paragraphs
            .iter()
            .find(|p| p.starts_with(QUERY_PREFIX))
            .and_then(|p| decode_query_echo(&p[QUERY_PREFIX.len()..]))
            .ok_or(ParseError::MissingQuery)?;

        let candidates: Vec<&str> = paragraphs
            .iter()
            .filter(|p| !p.starts_with(QUERY_PREFIX))
            .copied()
            .collect();

        let surviving = drop_duplicated_tail(&candidates);

        let principal_text = surviving.join(PARAGRAPH_SEPARATOR).trim().to_string();
        if principal_text.is_empty() {
            return Err(ParseError::EmptyResult);
        }

        let (sections, url) = collect_sections(&surviving);

        Ok(Self {
            query,
            principal_text,
            sections,
            url,
        })
    }

    /// Look up a section by its exact title.
    pub fn section(&self, title: &str) -> Option<&AnswerSection> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// The `Query:` remainder is a JSON-encoded string literal.
fn decode_query_echo(rest: &str) -> Option<String> {
    serde_json::from_str(rest.trim()).ok()
}

/// Duplicate-content guard: the backend sometimes repeats the whole remaining
/// answer starting at a second `Assumption:` paragraph. When two or more such
/// paragraphs exist, everything from the second one on is dropped. The
/// URL-bearing paragraph is re-appended if the cut removed it. A single
/// `Assumption:` paragraph is left untouched.
fn drop_duplicated_tail<'a>(candidates: &[&'a str]) -> Vec<&'a str> {
    let mut assumptions = candidates
        .iter()
        .enumerate()
        .filter(|(_, p)| p.starts_with(ASSUMPTION_PREFIX));

    if assumptions.next().is_none() {
        return candidates.to_vec();
    }
    let Some((second_index, _)) = assumptions.next() else {
        return candidates.to_vec();
    };

    let mut kept: Vec<&str> = candidates[..second_index].to_vec();

    if let Some(url_paragraph) = candidates
        .iter()
        .copied()
        .find(|p| p.starts_with(WEBSITE_RESULT_PREFIX))
    {
        if !kept.contains(&url_paragraph) {
            kept.push(url_paragraph);
        }
    }

    tracing::debug!(
        cut_at = second_index,
        dropped = candidates.len() - second_index,
        "dropped duplicated answer tail after repeated assumption paragraph"
    );

    kept
}

/// Fold the surviving paragraphs into sections and the result-page URL.
fn collect_sections(paragraphs: &[&str]) -> (Vec<AnswerSection>, Option<String>) {
    let mut accumulator = SectionAccumulator::default();
    let mut url = None;

    for &paragraph in paragraphs {
        if paragraph.starts_with(WEBSITE_RESULT_PREFIX) {
            if url.is_none() {
                url = find_url_token(paragraph);
            }
        } else if !paragraph.trim().is_empty() {
            accumulator.push_paragraph(paragraph);
        }
    }

    (accumulator.finish(), url)
}

/// Loop-carried state of the section fold: the sections emitted so far plus
/// at most one pending section still accumulating content. The emitted list
/// itself is the dedup authority; there is no separate title set.
#[derive(Default)]
struct SectionAccumulator {
    sections: Vec<AnswerSection>,
    pending: Option<PendingSection>,
}

struct PendingSection {
    title: String,
    lines: Vec<String>,
}

impl SectionAccumulator {
    fn push_paragraph(&mut self, paragraph: &str) {
        let mut lines = paragraph.split('\n');
        // split always yields at least one item
        let first_line = lines.next().unwrap_or_default();

        match first_line.split_once(':') {
            Some((title, rest_of_line)) => {
                // Only the first colon splits; later colons stay in content
                self.flush_pending();

                let mut content_lines = vec![rest_of_line.trim().to_string()];
                content_lines.extend(lines.map(str::to_string));

                self.pending = Some(PendingSection {
                    title: title.trim().to_string(),
                    lines: content_lines,
                });
            }
            None => {
                // Continuation of the pending section; with no pending
                // section the paragraph carries no section content
                if let Some(pending) = &mut self.pending {
                    pending.lines.push(first_line.to_string());
                    pending.lines.extend(lines.map(str::to_string));
                }
            }
        }
    }

    fn flush_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if pending.title.is_empty() {
            return;
        }
        if self.sections.iter().any(|s| s.title == pending.title) {
            return;
        }
        self.sections.push(AnswerSection {
            title: pending.title,
            content: pending.lines.join("\n").trim().to_string(),
        });
    }

    fn finish(mut self) -> Vec<AnswerSection> {
        self.flush_pending();
        self.sections
    }
}

/// First HTTP(S) URL token in the paragraph, delimited by whitespace or end
/// of string.
fn find_url_token(paragraph: &str) -> Option<String> {
    let start = match (paragraph.find("https://"), paragraph.find("http://")) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };

    let token = &paragraph[start..];
    let end = token
        .find(char::is_whitespace)
        .unwrap_or(token.len());

    Some(token[..end].to_string())
}
