// src/layouts/render/ordering.rs
// Ordering rules of the render pipeline: field placement rank and the
// choice of one value among several stored candidates.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::layouts::slots::{SlotRank, SubsheetSlot};
use crate::layouts::source::{FieldTemplateRow, FieldValueCandidate};

/// Placement rank of every placed field, keyed by (subsheet, template).
pub fn rank_map(slots: &[SubsheetSlot]) -> HashMap<(i64, i64), SlotRank> {
    slots
        .iter()
        .map(|slot| ((slot.subsheet_id, slot.info_template_id), slot.rank()))
        .collect()
}

/// Best candidate first: higher revision, then non-empty over empty, then
/// the greater value string. Missing revisions sort below any revision.
pub fn compare_candidates(a: &FieldValueCandidate, b: &FieldValueCandidate) -> Ordering {
    b.revision
        .cmp(&a.revision)
        .then_with(|| b.has_value().cmp(&a.has_value()))
        .then_with(|| b.value.cmp(&a.value))
}

/// One value per template id, picked with `compare_candidates`.
pub fn select_latest_values(
    candidates: Vec<FieldValueCandidate>,
) -> HashMap<i64, FieldValueCandidate> {
    let mut latest: HashMap<i64, FieldValueCandidate> = HashMap::new();
    for candidate in candidates {
        match latest.get(&candidate.info_template_id) {
            Some(current) if compare_candidates(current, &candidate) != Ordering::Greater => {}
            _ => {
                latest.insert(candidate.info_template_id, candidate);
            }
        }
    }
    latest
}

/// Placed fields of one subsheet in drawing order. Templates without a
/// placement are left out.
pub fn placed_fields<'t>(
    templates: &'t [FieldTemplateRow],
    subsheet_id: i64,
    ranks: &HashMap<(i64, i64), SlotRank>,
) -> Vec<(&'t FieldTemplateRow, SlotRank)> {
    let mut placed: Vec<(&FieldTemplateRow, SlotRank)> = templates
        .iter()
        .filter(|t| t.subsheet_id == subsheet_id)
        .filter_map(|t| ranks.get(&(subsheet_id, t.info_template_id)).map(|rank| (t, *rank)))
        .collect();
    placed.sort_by_key(|(template, rank)| (*rank, rank.column, template.cell_index.unwrap_or(0)));
    placed
}

/// Display name of a subsheet. Missing, blank and purely numeric stored
/// names are placeholders and render as "Subsheet {id}".
pub fn resolve_subsheet_name(subsheet_id: i64, stored: Option<&String>) -> String {
    match stored.map(|name| name.trim()) {
        Some(name) if !name.is_empty() && !name.chars().all(|c| c.is_ascii_digit()) => name.to_string(),
        _ => format!("Subsheet {}", subsheet_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(value: Option<&str>, revision: Option<i64>) -> FieldValueCandidate {
        FieldValueCandidate {
            info_template_id: 1,
            value: value.map(str::to_string),
            uom: None,
            revision,
        }
    }

    fn pick(candidates: Vec<FieldValueCandidate>) -> Option<String> {
        select_latest_values(candidates).remove(&1).and_then(|c| c.value)
    }

    #[test]
    fn test_higher_revision_wins() {
        assert_eq!(
            pick(vec![candidate(Some("old"), Some(1)), candidate(Some("new"), Some(2))]),
            Some("new".into())
        );
        assert_eq!(
            pick(vec![candidate(Some("dated"), Some(1)), candidate(Some("undated"), None)]),
            Some("dated".into())
        );
    }

    #[test]
    fn test_newer_empty_value_still_wins_over_older_value() {
        assert_eq!(
            pick(vec![candidate(Some("10"), Some(1)), candidate(Some(""), Some(2))]),
            Some("".into())
        );
    }

    #[test]
    fn test_non_empty_wins_within_revision() {
        assert_eq!(
            pick(vec![candidate(Some("  "), Some(3)), candidate(Some("5"), Some(3)), candidate(None, Some(3))]),
            Some("5".into())
        );
    }

    #[test]
    fn test_greater_value_breaks_remaining_ties() {
        // Byte-wise string order, the same as SQLite's BINARY collation
        assert_eq!(
            pick(vec![candidate(Some("100"), Some(2)), candidate(Some("99"), Some(2))]),
            Some("99".into())
        );
        assert_eq!(
            pick(vec![candidate(Some("B"), Some(2)), candidate(Some("a"), Some(2))]),
            Some("a".into())
        );
    }

    #[test]
    fn test_selection_ignores_input_order() {
        let forward = vec![candidate(Some("x"), Some(1)), candidate(Some("y"), Some(1))];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(pick(forward), pick(backward));
    }

    #[test]
    fn test_placed_fields_sorted_and_unplaced_dropped() {
        let template = |id, cell_index| FieldTemplateRow {
            info_template_id: id,
            subsheet_id: 5,
            label: format!("F{}", id),
            uom: None,
            group_key: None,
            cell_index,
            cell_caption: None,
        };
        let templates = vec![template(1, None), template(2, Some(1)), template(3, None), template(4, None)];
        let slot = |id, slot_index, column_number, row_number| SubsheetSlot {
            layout_id: 1,
            subsheet_id: 5,
            info_template_id: id,
            slot_index,
            column_number,
            row_number,
        };
        let ranks = rank_map(&[slot(1, 2, 2, 1), slot(2, 1, 1, 2), slot(3, 0, 1, 1)]);

        let order: Vec<i64> = placed_fields(&templates, 5, &ranks)
            .iter()
            .map(|(t, _)| t.info_template_id)
            .collect();
        assert_eq!(order, vec![3, 2, 1]);
        assert!(placed_fields(&templates, 6, &ranks).is_empty());
    }

    #[test]
    fn test_subsheet_name_fallbacks() {
        assert_eq!(resolve_subsheet_name(5, Some(&"Process Data".to_string())), "Process Data");
        assert_eq!(resolve_subsheet_name(5, Some(&"  Nozzles ".to_string())), "Nozzles");
        assert_eq!(resolve_subsheet_name(5, Some(&"12".to_string())), "Subsheet 5");
        assert_eq!(resolve_subsheet_name(5, Some(&"   ".to_string())), "Subsheet 5");
        assert_eq!(resolve_subsheet_name(5, None), "Subsheet 5");
        assert_eq!(resolve_subsheet_name(5, Some(&"Stage 2".to_string())), "Stage 2");
    }
}
