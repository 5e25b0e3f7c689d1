use super::{NoteTree, TreeAction};
use crate::note::{NoteRecord, WELCOME_TEXT};

fn record(id: u64, name: &str, content: Option<&str>) -> NoteRecord {
    NoteRecord {
        id,
        name: name.to_string(),
        content: content.map(str::to_string),
    }
}

fn sample_tree() -> NoteTree {
    NoteTree::new(vec![
        record(1, "Welcome", None),
        record(2, "Ideas", Some("# Ideas")),
        record(3, "Todo", Some("- milk")),
    ])
}

fn selected_count(tree: &NoteTree) -> usize {
    tree.nodes().iter().filter(|n| n.selected).count()
}

#[test]
fn test_new_tree_has_no_selection_or_dirt() {
    let tree = sample_tree();

    assert_eq!(tree.len(), 3);
    assert!(tree.selected().is_none());
    assert!(!tree.has_unsaved_changes());
}

#[test]
fn test_select_is_exclusive() {
    let mut tree = sample_tree();

    assert!(tree.dispatch(TreeAction::Select(1)));
    assert!(tree.dispatch(TreeAction::Select(2)));

    assert_eq!(tree.selected_id(), Some(2));
    assert!(!tree.get(1).unwrap().selected);
    assert_eq!(selected_count(&tree), 1);
}

#[test]
fn test_select_same_node_reports_no_change() {
    let mut tree = sample_tree();

    tree.dispatch(TreeAction::Select(3));
    assert!(!tree.dispatch(TreeAction::Select(3)));
}

#[test]
fn test_select_unknown_is_noop() {
    let mut tree = sample_tree();
    tree.dispatch(TreeAction::Select(2));

    assert!(!tree.dispatch(TreeAction::Select(42)));
    assert_eq!(tree.selected_id(), Some(2));
}

#[test]
fn test_add_is_clean_and_unselected() {
    let mut tree = sample_tree();

    assert!(tree.dispatch(TreeAction::Add(record(4, "New", Some("")))));
    let node = tree.get(4).unwrap();

    assert!(!node.dirty);
    assert!(!node.selected);
    assert!(!tree.dispatch(TreeAction::Add(record(4, "Dup", None))));
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_edit_marks_dirty_and_save_clears() {
    let mut tree = sample_tree();

    assert!(tree.dispatch(TreeAction::Edit {
        id: 2,
        content: "# Ideas\nmore".to_string(),
    }));
    assert!(tree.get(2).unwrap().dirty);
    assert_eq!(tree.dirty_ids(), vec![2]);

    tree.dispatch(TreeAction::Saved(record(2, "Ideas", Some("# Ideas\nmore"))));

    assert!(!tree.get(2).unwrap().dirty);
    assert!(!tree.has_unsaved_changes());
}

#[test]
fn test_edit_with_same_content_stays_clean() {
    let mut tree = sample_tree();

    assert!(!tree.dispatch(TreeAction::Edit {
        id: 2,
        content: "# Ideas".to_string(),
    }));
    assert!(!tree.get(2).unwrap().dirty);
}

#[test]
fn test_editing_welcome_note_gives_it_content() {
    let mut tree = sample_tree();

    assert_eq!(tree.get(1).unwrap().display_text(), WELCOME_TEXT);
    tree.dispatch(TreeAction::Edit {
        id: 1,
        content: "mine now".to_string(),
    });

    assert_eq!(tree.get(1).unwrap().content.as_deref(), Some("mine now"));
    assert_eq!(tree.get(1).unwrap().display_text(), "mine now");
}

#[test]
fn test_remove_selected_clears_selection() {
    let mut tree = sample_tree();
    tree.dispatch(TreeAction::Select(2));

    assert!(tree.dispatch(TreeAction::Remove(2)));

    assert!(tree.get(2).is_none());
    assert!(tree.selected().is_none());
    assert!(!tree.dispatch(TreeAction::Remove(2)));
}

#[test]
fn test_rename() {
    let mut tree = sample_tree();

    assert!(tree.dispatch(TreeAction::Rename {
        id: 3,
        name: "Groceries".to_string(),
    }));
    assert_eq!(tree.get(3).unwrap().name, "Groceries");
    assert!(!tree.get(3).unwrap().dirty);
}

#[test]
fn test_load_keeps_existing_selection() {
    let mut tree = sample_tree();
    tree.dispatch(TreeAction::Select(3));
    tree.dispatch(TreeAction::Edit {
        id: 3,
        content: "changed".to_string(),
    });

    tree.dispatch(TreeAction::Load(vec![
        record(3, "Todo", Some("- milk")),
        record(5, "Other", None),
    ]));

    assert_eq!(tree.selected_id(), Some(3));
    assert!(!tree.has_unsaved_changes());
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_neighbours() {
    let tree = sample_tree();

    assert_eq!(tree.next_id(1), Some(2));
    assert_eq!(tree.next_id(3), None);
    assert_eq!(tree.prev_id(1), None);
    assert_eq!(tree.prev_id(3), Some(2));
    assert_eq!(tree.next_id(9), None);
}
