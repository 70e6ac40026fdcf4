//! Plain-text rendering of a resolution result.

use std::fmt::Write;

use crate::types::{ResolutionResult, ResolvedReference};

/// Labels used when rendering items and their references
#[derive(Debug, Clone)]
pub struct ReportLabels {
    pub item: String,
    pub reference: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            item: "Starship".to_string(),
            reference: "Pilot".to_string(),
        }
    }
}

/// Renders one block per item, each starting with a blank line.
///
/// ```text
///
/// Starship: X-wing
///   Pilot: Luke Skywalker
///   Error fetching pilot: HTTP 404 Not Found
/// ```
pub fn render(result: &ResolutionResult, labels: &ReportLabels) -> String {
    let reference_lower = labels.reference.to_lowercase();
    let mut out = String::new();

    for resolved in &result.items {
        let _ = writeln!(out, "\n{}: {}", labels.item, resolved.item.name().unwrap_or("None"));

        if resolved.references.is_empty() {
            let _ = writeln!(out, "  No {}s listed.", reference_lower);
            continue;
        }

        for reference in &resolved.references {
            match reference {
                ResolvedReference::Resolved(_) => {
                    let _ = writeln!(out, "  {}: {}", labels.reference, reference.name().unwrap_or("None"));
                }
                ResolvedReference::Failed(err) => {
                    let _ = writeln!(out, "  Error fetching {}: {}", reference_lower, err.reason);
                }
            }
        }
    }

    out
}
