//! Format the forest, search results, and transfer reports as text.

use crate::resource::{ResourceRecord, SearchHit};
use crate::transfer::TransferReport;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline. Respects NO_COLOR and TTY.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Format the forest as an indented tree, one root per section.
pub fn format_forest_text(forest: &[ResourceRecord]) -> String {
    let mut out = String::new();
    if forest.is_empty() {
        out.push_str("No resources found.\n");
        return out;
    }

    for root in forest {
        out.push_str(&format!("{}\n", format_section_heading(&root.name)));
        let mut stack: Vec<(&ResourceRecord, usize)> =
            root.children.iter().rev().map(|c| (c, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            let kind = if node.kind.is_empty() {
                String::new()
            } else {
                format!("  [{}]", node.kind)
            };
            out.push_str(&format!(
                "{}{} ({}){}\n",
                "  ".repeat(depth + 1),
                node.name,
                node.id,
                kind
            ));
            for child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out.push('\n');
    }
    out
}

/// Format search hits as a table.
pub fn format_search_results_text(hits: &[SearchHit]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Search results")));
    if hits.is_empty() {
        out.push_str("No matching resources.\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Id", "Type"]);
    for hit in hits {
        table.add_row(vec![hit.name.clone(), hit.id.clone(), hit.kind.clone()]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {} resources.\n", hits.len()));
    out
}

/// Format a transfer report as human-readable text.
pub fn format_transfer_report_text(report: &TransferReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading("Ownership transfer")
    ));
    out.push_str(&format!("  New owner: {}\n", report.new_owner));
    out.push_str(&format!("  Transferred: {}\n", report.transferred.len()));
    out.push_str(&format!("  Skipped (not owned): {}\n", report.skipped.len()));
    out.push_str(&format!("  Failed: {}\n\n", report.failed.len()));

    if !report.failed.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Id", "Reason"]);
        for item in &report.failed {
            table.add_row(vec![item.id.clone(), item.reason.clone()]);
        }
        out.push_str(&format!("{}\n\n", table));
    }

    if report.failed.is_empty() && report.transferred.is_empty() && report.skipped.is_empty() {
        out.push_str("Nothing to transfer.\n");
    } else if report.failed.is_empty() {
        out.push_str("Successfully transferred ownership.\n");
    } else {
        out.push_str("Transferred with per-item failures; see above.\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_forest;
    use crate::transfer::{FailedItem, TransferredItem};
    use chrono::Utc;

    fn record(id: &str, parents: Vec<&str>) -> ResourceRecord {
        ResourceRecord::new(
            format!("name-{id}"),
            id,
            parents.into_iter().map(String::from).collect(),
            "file",
        )
    }

    #[test]
    fn forest_text_indents_children_under_roots() {
        let forest = build_forest(vec![
            record("top", vec![]),
            record("leaf", vec!["top"]),
        ]);

        let text = format_forest_text(&forest);
        assert!(text.contains("name-top (top)"));
        assert!(text.contains("    name-leaf (leaf)"));
    }

    #[test]
    fn empty_forest_has_a_message() {
        assert!(format_forest_text(&[]).contains("No resources found."));
    }

    #[test]
    fn search_results_include_total() {
        let hits = vec![SearchHit {
            name: "report.txt".to_string(),
            id: "f9".to_string(),
            kind: "text/plain".to_string(),
        }];
        let text = format_search_results_text(&hits);
        assert!(text.contains("report.txt"));
        assert!(text.contains("Total: 1 resources."));
    }

    #[test]
    fn report_text_lists_failures() {
        let report = TransferReport {
            new_owner: "new@example.com".to_string(),
            transferred: vec![TransferredItem {
                id: "a".to_string(),
                permission_id: "perm-a".to_string(),
            }],
            skipped: vec!["b".to_string()],
            failed: vec![FailedItem {
                id: "c".to_string(),
                reason: "insufficient permissions".to_string(),
            }],
            completed_at: Utc::now(),
        };

        let text = format_transfer_report_text(&report);
        assert!(text.contains("Transferred: 1"));
        assert!(text.contains("Skipped (not owned): 1"));
        assert!(text.contains("insufficient permissions"));
        assert!(text.contains("per-item failures"));
    }
}
