//! NUnit 3 result file parsing.
//!
//! Only `test-case` elements matter here: each carries a `fullname`
//! identifier and a `result` outcome. Anything whose outcome is not exactly
//! `Passed` (failed, skipped, inconclusive, ...) is non-passing.

use std::collections::HashSet;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{SoftRunError, SoftRunResult};

const TEST_CASE: &[u8] = b"test-case";
const PASSED: &str = "Passed";

/// A `test-case` element of a result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub fullname: String,
    pub result: String,
}

impl TestCase {
    /// Case-sensitive comparison against `Passed`.
    pub fn passed(&self) -> bool {
        self.result == PASSED
    }
}

/// Every test case in the report at `path`, in document order.
pub fn parse_report(path: &Path) -> SoftRunResult<Vec<TestCase>> {
    let content =
        std::fs::read_to_string(path).map_err(|e| SoftRunError::report(path, e))?;
    parse_cases(&content).map_err(|message| SoftRunError::report(path, message))
}

/// Distinct `fullname`s of non-passing test cases across `paths`, in
/// order of first occurrence. Files are parsed one after another.
pub fn non_passing_tests<P: AsRef<Path>>(paths: &[P]) -> SoftRunResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    let mut total = 0usize;

    for path in paths {
        for case in parse_report(path.as_ref())? {
            if case.passed() {
                continue;
            }
            total += 1;
            if seen.insert(case.fullname.clone()) {
                names.push(case.fullname);
            }
        }
    }

    debug!(total, distinct = names.len(), "count of not passed tests");
    Ok(names)
}

fn parse_cases(xml: &str) -> Result<Vec<TestCase>, String> {
    let mut reader = Reader::from_str(xml);
    let mut cases = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                enter_element(depth, &mut saw_root)?;
                depth += 1;
                if e.name().as_ref() == TEST_CASE {
                    cases.push(test_case(&e)?);
                }
            }
            Ok(Event::Empty(e)) => {
                enter_element(depth, &mut saw_root)?;
                if e.name().as_ref() == TEST_CASE {
                    cases.push(test_case(&e)?);
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Text(t)) if depth == 0 => {
                if !t.iter().all(u8::is_ascii_whitespace) {
                    return Err("text content outside the root element".to_string());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "malformed XML at byte {}: {e}",
                    reader.error_position()
                ))
            }
        }
    }

    if !saw_root {
        return Err("document has no root element".to_string());
    }
    if depth != 0 {
        return Err(format!(
            "unexpected end of document with {depth} unclosed element(s)"
        ));
    }
    Ok(cases)
}

fn enter_element(depth: usize, saw_root: &mut bool) -> Result<(), String> {
    if depth == 0 {
        if *saw_root {
            return Err("document has more than one root element".to_string());
        }
        *saw_root = true;
    }
    Ok(())
}

fn test_case(element: &BytesStart<'_>) -> Result<TestCase, String> {
    Ok(TestCase {
        fullname: required_attribute(element, "fullname")?,
        result: required_attribute(element, "result")?,
    })
}

fn required_attribute(element: &BytesStart<'_>, name: &str) -> Result<String, String> {
    let attr = element
        .try_get_attribute(name)
        .map_err(|e| format!("invalid attributes on test-case: {e}"))?
        .ok_or_else(|| format!("test-case element is missing the '{name}' attribute"))?;
    let value = attr
        .unescape_value()
        .map_err(|e| format!("invalid '{name}' attribute on test-case: {e}"))?;
    Ok(value.into_owned())
}
