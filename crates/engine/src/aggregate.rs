//! Grouped composite output for the downstream alert evaluator.
//!
//! Rendered bodies are pre-formatted YAML fragments, so the composite
//! document is assembled textually: each group indents its members under
//! a shared `groups:` header. Group order is first-encounter order.

use indexmap::IndexMap;

/// Rendered rule bodies grouped by template name, in record order.
pub type RenderedGroups = IndexMap<String, Vec<String>>;

/// Assemble the composite document from grouped bodies.
pub fn write_grouped_document(groups: &RenderedGroups) -> String {
    let mut out = String::from("groups:\n");

    for (group_name, bodies) in groups {
        out.push_str(&format!("  - name: {group_name}\n"));
        out.push_str("    rules:\n");
        for body in bodies {
            for line in body.lines() {
                if !line.trim().is_empty() {
                    out.push_str("      ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_render_in_first_encounter_order() {
        let mut groups = RenderedGroups::new();
        groups
            .entry("k8s".to_string())
            .or_default()
            .push("- alert: A\n  expr: up == 0\n".to_string());
        groups
            .entry("host".to_string())
            .or_default()
            .push("- alert: B\n  expr: up == 1\n".to_string());
        groups
            .entry("k8s".to_string())
            .or_default()
            .push("- alert: C\n  expr: up == 2\n".to_string());

        let doc = write_grouped_document(&groups);
        let expected = concat!(
            "groups:\n",
            "  - name: k8s\n",
            "    rules:\n",
            "      - alert: A\n",
            "        expr: up == 0\n",
            "      - alert: C\n",
            "        expr: up == 2\n",
            "  - name: host\n",
            "    rules:\n",
            "      - alert: B\n",
            "        expr: up == 1\n",
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn blank_lines_in_bodies_are_dropped() {
        let mut groups = RenderedGroups::new();
        groups
            .entry("k8s".to_string())
            .or_default()
            .push("- alert: A\n\n  expr: up\n".to_string());

        let doc = write_grouped_document(&groups);
        assert!(!doc.contains("\n\n"));
    }

    #[test]
    fn empty_input_yields_bare_header() {
        assert_eq!(write_grouped_document(&RenderedGroups::new()), "groups:\n");
    }
}
