//! Applying automatic fixes to source text.
//!
//! A fix is the full list of [`Replacement`]s of one violation. Fixes are
//! applied in order of their first edit; a fix whose covering range overlaps
//! or touches an already applied fix is skipped and left for a later pass.
//! A fix that would not change the text is dropped.

use crate::types::{Replacement, Violation};

/// Outcome of one fix pass over a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutput {
    /// The rewritten source.
    pub output: String,
    /// Number of fixes applied.
    pub applied: usize,
    /// Number of fixes skipped because they overlapped an applied fix.
    pub skipped: usize,
}

fn changes_text(source: &str, edits: &[Replacement]) -> bool {
    edits
        .iter()
        .any(|r| source.get(r.start..r.end) != Some(r.new_text.as_str()))
}

fn covering_range(edits: &[Replacement]) -> Option<(usize, usize)> {
    let start = edits.iter().map(|r| r.start).min()?;
    let end = edits.iter().map(|r| r.end).max()?;
    Some((start, end))
}

/// Applies the automatic fixes of `violations` to `source` in one pass.
#[must_use]
pub fn apply_fixes(source: &str, violations: &[Violation]) -> FixOutput {
    let mut fixes: Vec<(usize, usize, &[Replacement])> = violations
        .iter()
        .filter_map(Violation::fix)
        .filter(|edits| changes_text(source, edits))
        .filter_map(|edits| covering_range(edits).map(|(start, end)| (start, end, edits)))
        .collect();
    fixes.sort_by_key(|&(start, end, _)| (start, end));

    let mut edits: Vec<&Replacement> = Vec::new();
    let mut last_end: Option<usize> = None;
    let mut applied = 0;
    let mut skipped = 0;

    for (start, end, fix) in fixes {
        if last_end.is_some_and(|last| start <= last) || end > source.len() {
            skipped += 1;
            continue;
        }
        edits.extend(fix);
        last_end = Some(end);
        applied += 1;
    }

    edits.sort_by_key(|r| (r.start, r.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        output.push_str(source.get(cursor..edit.start).unwrap_or(""));
        output.push_str(&edit.new_text);
        cursor = edit.end;
    }
    output.push_str(source.get(cursor..).unwrap_or(""));

    FixOutput {
        output,
        applied,
        skipped,
    }
}
