//! Problem page parsing. Pure functions over HTML text, no network.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::model::TestCase;

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#problem_title").unwrap());
static DESCRIPTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#problem_description").unwrap());
static INPUT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#problem_input").unwrap());
static OUTPUT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#problem_output").unwrap());
static INFO_ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#problem-info tr").unwrap());
static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static SAMPLE_INPUT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#".sampledata[id^="sample-input-"]"#).unwrap());
static SAMPLE_OUTPUT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#".sampledata[id^="sample-output-"]"#).unwrap());

static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n+").unwrap());
static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+\.?[0-9]*)").unwrap());
static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)").unwrap());

/// Everything a problem page yields on its own, before rating enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    pub title: String,
    pub description: String,
    pub input_description: String,
    pub output_description: String,
    pub time_limit: Option<f64>,
    pub memory_limit: Option<u64>,
    pub test_cases: Vec<TestCase>,
}

/// Parse a problem page. `None` when the page has no title, which is the
/// only required field.
pub fn parse_problem_page(html: &str) -> Option<ParsedPage> {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&TITLE_SEL)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())?;

    let description = section_text(&doc, &DESCRIPTION_SEL);
    let input_description = section_text(&doc, &INPUT_SEL);
    let output_description = section_text(&doc, &OUTPUT_SEL);

    let (time_limit, memory_limit) = parse_limits(&doc);
    let test_cases = parse_samples(&doc);

    Some(ParsedPage {
        title,
        description,
        input_description,
        output_description,
        time_limit,
        memory_limit,
        test_cases,
    })
}

fn section_text(doc: &Html, sel: &Selector) -> String {
    doc.select(sel)
        .next()
        .map(extract_text_with_math)
        .unwrap_or_default()
}

/// Join every text node with newlines, leaving `$…$` math exactly as it
/// appears in the page source, then squeeze blank runs.
pub fn extract_text_with_math(el: ElementRef) -> String {
    let joined = el.text().collect::<Vec<_>>().join("\n");
    collapse_blank_runs(&joined)
}

/// Collapse 3+ consecutive newlines (whitespace-only lines included) to a
/// single blank line and trim the block.
pub fn collapse_blank_runs(text: &str) -> String {
    BLANK_RUN_RE.replace_all(text, "\n\n").trim().to_string()
}

/// Seconds from a label such as `"2 초 "` or `"0.5 초 (추가 시간 없음)"`.
pub fn parse_time_limit(label: &str) -> Option<f64> {
    let caps = DECIMAL_RE.captures(label)?;
    caps[1].parse().ok()
}

/// Kilobytes from a megabyte label such as `"128 MB"`.
pub fn parse_memory_limit(label: &str) -> Option<u64> {
    let caps = INTEGER_RE.captures(label)?;
    let mb: u64 = caps[1].parse().ok()?;
    mb.checked_mul(1024)
}

fn parse_limits(doc: &Html) -> (Option<f64>, Option<u64>) {
    for row in doc.select(&INFO_ROW_SEL) {
        let cells: Vec<String> = row
            .select(&CELL_SEL)
            .map(|c| c.text().collect::<String>())
            .collect();
        if cells.len() >= 2 {
            return (parse_time_limit(&cells[0]), parse_memory_limit(&cells[1]));
        }
    }
    (None, None)
}

fn parse_samples(doc: &Html) -> Vec<TestCase> {
    let inputs = doc.select(&SAMPLE_INPUT_SEL).map(|el| el.text().collect::<String>());
    let outputs = doc.select(&SAMPLE_OUTPUT_SEL).map(|el| el.text().collect::<String>());
    inputs
        .zip(outputs)
        .zip(1u32..)
        .map(|((input, output), idx)| TestCase::from_samples(&input, &output, idx))
        .collect()
}

// ── Tests ──
