//! Report rendering: spec.md §6.3, a fixed 80-column two-column table.
//!
//! Grounded on `iepathos-debtmap`'s terminal report writers in spirit
//! (fixed-width column formatting, one row per analyzed item), trimmed to
//! the single table spec.md specifies — no color, no alternate formats.

use crate::lattice::PurityLevel;
use crate::lookup_table::LookupTable;
use crate::method_identity::MethodIdentity;

const WIDTH: usize = 80;
const METHOD_COLUMN_WIDTH: usize = 62;

/// Render the fixed two-column report. Rows are sorted by display form so
/// output is deterministic regardless of the table's internal hash order.
pub fn render(table: &LookupTable) -> String {
    let mut rows: Vec<(&MethodIdentity, PurityLevel)> = table.iter().collect();
    rows.sort_by(|(a, _), (b, _)| a.display_form().cmp(b.display_form()));

    let mut out = String::new();
    out.push_str(&format_row("METHOD", "PURITY LEVEL"));
    out.push('\n');
    out.push_str(&"-".repeat(WIDTH));
    out.push('\n');
    for (method, purity) in rows {
        out.push_str(&format_row(method.display_form(), purity.name()));
        out.push('\n');
    }
    out
}

fn format_row(method: &str, purity: &str) -> String {
    if method.len() >= METHOD_COLUMN_WIDTH {
        format!("{method} {purity}")
    } else {
        format!("{method:<METHOD_COLUMN_WIDTH$}{purity}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(name: &str) -> MethodIdentity {
        MethodIdentity::External {
            identifier: name.to_string(),
        }
    }

    #[test]
    fn renders_header_and_separator() {
        let table = LookupTable::new();
        let rendered = render(&table);
        let mut lines = rendered.lines();
        assert!(lines.next().unwrap().starts_with("METHOD"));
        assert_eq!(lines.next().unwrap(), "-".repeat(WIDTH));
    }

    #[test]
    fn renders_one_row_per_method_sorted_by_display_form() {
        let mut table = LookupTable::new();
        table.add_method(ext("b"));
        table.add_method(ext("a"));
        let rendered = render(&table);
        let a_pos = rendered.find("a ").unwrap();
        let b_pos = rendered.find("b ").unwrap();
        assert!(a_pos < b_pos);
    }
}
