//! Display ordering for the notes grid.

use crate::model::note::Note;
use std::cmp::Ordering;

/// Pinned notes first, then `id` descending by plain string comparison.
///
/// Store-issued ids are fixed width, so this reads as newest first. Ids of
/// other widths still compare lexicographically (`"note-50" > "note-200"`).
pub fn display_order(a: &Note, b: &Note) -> Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| b.id.as_str().cmp(a.id.as_str()))
}

/// Returns a copy of `notes` in display order. The input is left untouched.
pub fn sorted_for_display(notes: &[Note]) -> Vec<Note> {
    let mut sorted = notes.to_vec();
    sorted.sort_by(display_order);
    sorted
}

#[cfg(test)]
mod tests {
    use super::sorted_for_display;
    use crate::model::note::{Note, NoteId};

    fn note(id: &str, is_pinned: bool) -> Note {
        Note {
            id: NoteId::new(id),
            title: id.to_string(),
            content: String::new(),
            is_pinned,
            owner_id: "current-user".to_string(),
        }
    }

    fn ids(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|note| note.id.as_str()).collect()
    }

    #[test]
    fn pinned_first_then_descending_id() {
        let notes = vec![
            note("note-100", false),
            note("note-50", true),
            note("note-200", true),
        ];

        assert_eq!(
            ids(&sorted_for_display(&notes)),
            vec!["note-50", "note-200", "note-100"]
        );
    }

    #[test]
    fn ids_compare_as_strings_not_numbers() {
        let notes = vec![note("note-200", false), note("note-50", false)];
        assert_eq!(ids(&sorted_for_display(&notes)), vec!["note-50", "note-200"]);
    }

    #[test]
    fn fixed_width_ids_sort_newest_first() {
        let notes = vec![
            Note {
                id: NoteId::from_millis(1_000),
                ..note("", false)
            },
            Note {
                id: NoteId::from_millis(20_000),
                ..note("", false)
            },
        ];
        assert_eq!(
            ids(&sorted_for_display(&notes)),
            vec!["note-0000000020000", "note-0000000001000"]
        );
    }
}
