//! # Items Module
//!
//! Edits applied to a line's item list by the configuration editor. Every
//! operation takes the current list and returns a new one; out-of-range
//! indices and edits that do not apply to the item return the list unchanged.

use rand::Rng;

use crate::colors::POWERLINE_PALETTE;
use crate::models::{ItemKind, Settings, WidgetItem, SEPARATOR};
use crate::widgets::widget_for;

/// Glyphs a manual separator cycles through
pub const SEPARATOR_CHARS: [&str; 4] = ["|", "-", ",", " "];

pub fn insert_item(items: &[WidgetItem], index: usize, item: WidgetItem) -> Vec<WidgetItem> {
    let mut out = items.to_vec();
    out.insert(index.min(out.len()), item);
    out
}

pub fn remove_item(items: &[WidgetItem], index: usize) -> Vec<WidgetItem> {
    let mut out = items.to_vec();
    if index < out.len() {
        out.remove(index);
    }
    out
}

pub fn move_item_up(items: &[WidgetItem], index: usize) -> Vec<WidgetItem> {
    let mut out = items.to_vec();
    if index > 0 && index < out.len() {
        out.swap(index, index - 1);
    }
    out
}

pub fn move_item_down(items: &[WidgetItem], index: usize) -> Vec<WidgetItem> {
    let mut out = items.to_vec();
    if index + 1 < out.len() {
        out.swap(index, index + 1);
    }
    out
}

pub fn replace_item(items: &[WidgetItem], index: usize, item: WidgetItem) -> Vec<WidgetItem> {
    let mut out = items.to_vec();
    if let Some(slot) = out.get_mut(index) {
        *slot = item;
    }
    out
}

fn update_item(
    items: &[WidgetItem],
    index: usize,
    f: impl FnOnce(&WidgetItem) -> Option<WidgetItem>,
) -> Vec<WidgetItem> {
    match items.get(index).and_then(f) {
        Some(updated) => replace_item(items, index, updated),
        None => items.to_vec(),
    }
}

/// Swap the item's type, keeping its id and styling
pub fn change_item_type(items: &[WidgetItem], index: usize, kind: &str) -> Vec<WidgetItem> {
    update_item(items, index, |item| {
        Some(WidgetItem {
            kind: kind.to_string(),
            ..item.clone()
        })
    })
}

/// Next glyph for a manual separator; other item types are left alone
pub fn cycle_separator_character(items: &[WidgetItem], index: usize) -> Vec<WidgetItem> {
    update_item(items, index, |item| {
        if item.kind != SEPARATOR {
            return None;
        }
        let current = item.separator_char();
        let next = SEPARATOR_CHARS
            .iter()
            .position(|c| *c == current)
            .map_or(0, |i| (i + 1) % SEPARATOR_CHARS.len());
        Some(WidgetItem {
            character: Some(SEPARATOR_CHARS[next].to_string()),
            ..item.clone()
        })
    })
}

pub fn toggle_raw_value(items: &[WidgetItem], index: usize) -> Vec<WidgetItem> {
    update_item(items, index, |item| match item.item_kind() {
        ItemKind::Widget(kind) if widget_for(kind).supports_raw_value() => Some(WidgetItem {
            raw_value: Some(!item.is_raw()),
            ..item.clone()
        }),
        _ => None,
    })
}

/// none -> merge -> no-padding -> none. Not allowed on the last item or on layout items.
pub fn cycle_merge(items: &[WidgetItem], index: usize) -> Vec<WidgetItem> {
    if index + 1 >= items.len() {
        return items.to_vec();
    }
    update_item(items, index, |item| {
        if item.item_kind().is_layout() {
            return None;
        }
        Some(WidgetItem {
            merge: item.merge.next(),
            ..item.clone()
        })
    })
}

/// Run the widget action bound to `key`. `None` when no keybind matches or the
/// widget wants a richer editor for it.
pub fn apply_keybind(items: &[WidgetItem], index: usize, key: &str) -> Option<Vec<WidgetItem>> {
    let item = items.get(index)?;
    let ItemKind::Widget(kind) = item.item_kind() else {
        return None;
    };
    let widget = widget_for(kind);
    let keybind = widget.custom_keybinds().iter().find(|kb| kb.key == key)?;
    let updated = widget.handle_editor_action(keybind.action, item)?;
    Some(replace_item(items, index, updated))
}

/// Powerline background for an item inserted at `insert_index`.
///
/// `None` unless powerline is on with a non-custom theme. Otherwise a random
/// palette color different from both neighbors, falling back to any color
/// different from the left neighbor, then to the first palette color.
pub fn pick_background_color<R: Rng + ?Sized>(
    items: &[WidgetItem],
    insert_index: usize,
    settings: &Settings,
    rng: &mut R,
) -> Option<String> {
    if !settings.powerline.auto_backgrounds() {
        return None;
    }
    let prev_bg = insert_index
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .and_then(|item| item.background_color.as_deref());
    let next_bg = items
        .get(insert_index)
        .and_then(|item| item.background_color.as_deref());

    let available: Vec<&str> = POWERLINE_PALETTE
        .iter()
        .copied()
        .filter(|c| Some(*c) != prev_bg && Some(*c) != next_bg)
        .collect();
    if !available.is_empty() {
        return Some(available[rng.random_range(0..available.len())].to_string());
    }
    let fallback = POWERLINE_PALETTE
        .iter()
        .copied()
        .find(|c| Some(*c) != prev_bg)
        .unwrap_or(POWERLINE_PALETTE[0]);
    Some(fallback.to_string())
}

/// Random 8-4-4-4-12 hex identifier
pub fn generate_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let hex = format!("{:032x}", rng.random::<u128>());
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Build a fresh item of `kind` for insertion at `insert_index`
pub fn new_item(
    kind: &str,
    insert_index: usize,
    items: &[WidgetItem],
    settings: &Settings,
) -> WidgetItem {
    let mut rng = rand::rng();
    WidgetItem {
        background_color: pick_background_color(items, insert_index, settings, &mut rng),
        ..WidgetItem::new(generate_id(&mut rng), kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MergeMode;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn line() -> Vec<WidgetItem> {
        vec![
            WidgetItem::new("a", "model"),
            WidgetItem::new("b", "separator"),
            WidgetItem::new("c", "git-branch"),
        ]
    }

    fn ids(items: &[WidgetItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_insert_remove_move() {
        let items = line();
        let inserted = insert_item(&items, 1, WidgetItem::new("x", "version"));
        assert_eq!(ids(&inserted), ["a", "x", "b", "c"]);
        assert_eq!(ids(&items), ["a", "b", "c"]);

        assert_eq!(ids(&remove_item(&items, 1)), ["a", "c"]);
        assert_eq!(ids(&remove_item(&items, 9)), ["a", "b", "c"]);
        assert_eq!(ids(&move_item_up(&items, 2)), ["a", "c", "b"]);
        assert_eq!(ids(&move_item_up(&items, 0)), ["a", "b", "c"]);
        assert_eq!(ids(&move_item_down(&items, 0)), ["b", "a", "c"]);
        assert_eq!(ids(&move_item_down(&items, 2)), ["a", "b", "c"]);
    }

    #[test]
    fn test_cycle_separator_character() {
        let mut items = line();
        let expected = ["-", ",", " ", "|"];
        for want in expected {
            items = cycle_separator_character(&items, 1);
            assert_eq!(items[1].character.as_deref(), Some(want));
        }
        // not a separator
        assert_eq!(cycle_separator_character(&items, 0), items);
    }

    #[test]
    fn test_toggle_raw_value_respects_support() {
        let items = vec![
            WidgetItem::new("a", "git-branch"),
            WidgetItem::new("b", "git-changes"),
        ];
        let toggled = toggle_raw_value(&items, 0);
        assert!(toggled[0].is_raw());
        let untouched = toggle_raw_value(&items, 1);
        assert_eq!(untouched[1].raw_value, None);
    }

    #[test]
    fn test_cycle_merge() {
        let items = line();
        let once = cycle_merge(&items, 0);
        assert_eq!(once[0].merge, MergeMode::Merge);
        let twice = cycle_merge(&once, 0);
        assert_eq!(twice[0].merge, MergeMode::NoPadding);
        assert_eq!(cycle_merge(&twice, 0)[0].merge, MergeMode::None);
        // last item and separators are excluded
        assert_eq!(cycle_merge(&items, 2), items);
        assert_eq!(cycle_merge(&items, 1), items);
    }

    #[test]
    fn test_change_item_type_keeps_id() {
        let items = change_item_type(&line(), 2, "git-worktree");
        assert_eq!(items[2].id, "c");
        assert_eq!(items[2].kind, "git-worktree");
    }

    #[test]
    fn test_apply_keybind() {
        let items = line();
        let updated = apply_keybind(&items, 2, "h").unwrap();
        assert!(updated[2].meta_flag("hideNoGit"));
        assert!(apply_keybind(&items, 2, "z").is_none());
        assert!(apply_keybind(&items, 1, "h").is_none());
    }

    #[test]
    fn test_pick_background_avoids_neighbors() {
        let mut settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_background_color(&[], 0, &settings, &mut rng), None);

        settings.powerline.enabled = true;
        settings.powerline.theme = "nord".into();
        let items = vec![
            WidgetItem {
                background_color: Some("red".into()),
                ..WidgetItem::new("a", "model")
            },
            WidgetItem {
                background_color: Some("blue".into()),
                ..WidgetItem::new("b", "version")
            },
        ];
        for _ in 0..50 {
            let bg = pick_background_color(&items, 1, &settings, &mut rng).unwrap();
            assert_ne!(bg, "red");
            assert_ne!(bg, "blue");
            assert!(POWERLINE_PALETTE.contains(&bg.as_str()));
        }
    }

    #[test]
    fn test_new_item_id() {
        let item = new_item("version", 0, &[], &Settings::default());
        assert_eq!(item.kind, "version");
        assert_eq!(item.id.len(), 36);
        assert_eq!(item.background_color, None);
    }
}
