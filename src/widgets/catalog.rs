//! Searchable catalog of the widget types that can be added to a line.

use std::cmp::Ordering;

use super::{get_all_widget_types, get_widget};
use crate::models::{Settings, FLEX_SEPARATOR, SEPARATOR};

/// Category sentinel that disables category filtering
pub const ALL_CATEGORIES: &str = "All";

/// Score given to every entry when the query is blank
const BLANK_QUERY_SCORE: u8 = 99;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetCatalogEntry {
    pub kind: String,
    pub display_name: String,
    pub description: String,
    pub category: String,
    /// Lowercased `display_name description kind`
    pub search_text: String,
}

impl WidgetCatalogEntry {
    pub fn new(kind: &str, display_name: &str, description: &str, category: &str) -> Self {
        Self {
            kind: kind.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            search_text: format!("{display_name} {description} {kind}").to_lowercase(),
        }
    }
}

fn layout_entry(kind: &str) -> Option<WidgetCatalogEntry> {
    match kind {
        SEPARATOR => Some(WidgetCatalogEntry::new(
            kind,
            "Separator",
            "A separator character between status line widgets",
            "Layout",
        )),
        FLEX_SEPARATOR => Some(WidgetCatalogEntry::new(
            kind,
            "Flex Separator",
            "Expands to fill available terminal width",
            "Layout",
        )),
        _ => None,
    }
}

pub fn get_widget_catalog(settings: &Settings) -> Vec<WidgetCatalogEntry> {
    get_all_widget_types(settings)
        .into_iter()
        .map(|kind| {
            layout_entry(kind).unwrap_or_else(|| match get_widget(kind) {
                Some(widget) => WidgetCatalogEntry::new(
                    kind,
                    widget.display_name(),
                    widget.description(),
                    widget.category(),
                ),
                None => WidgetCatalogEntry::new(
                    kind,
                    kind,
                    &format!("Unknown widget: {kind}"),
                    "Other",
                ),
            })
        })
        .collect()
}

/// Unique categories in first-seen order
pub fn get_widget_catalog_categories(catalog: &[WidgetCatalogEntry]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for entry in catalog {
        if !categories.contains(&entry.category) {
            categories.push(entry.category.clone());
        }
    }
    categories
}

/// Lower is better; `None` excludes the entry
fn match_score(entry: &WidgetCatalogEntry, query: &str) -> Option<u8> {
    if query.is_empty() {
        return Some(BLANK_QUERY_SCORE);
    }
    let name = entry.display_name.to_lowercase();
    if name.starts_with(query) {
        Some(0)
    } else if name.contains(query) {
        Some(1)
    } else if entry.kind.to_lowercase().contains(query) {
        Some(2)
    } else if entry.description.to_lowercase().contains(query) {
        Some(3)
    } else if entry.search_text.contains(query) {
        Some(4)
    } else {
        None
    }
}

/// Case-insensitive first, so `alpha` sorts next to `Alpha`
fn natural_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter by category (`"All"` for any) and rank by query match
pub fn filter_widget_catalog(
    catalog: &[WidgetCatalogEntry],
    category: &str,
    query: &str,
) -> Vec<WidgetCatalogEntry> {
    let query = query.trim().to_lowercase();
    let mut scored: Vec<(u8, &WidgetCatalogEntry)> = catalog
        .iter()
        .filter(|entry| category == ALL_CATEGORIES || entry.category == category)
        .filter_map(|entry| match_score(entry, &query).map(|score| (score, entry)))
        .collect();

    scored.sort_by(|(sa, a), (sb, b)| {
        sa.cmp(sb)
            .then_with(|| natural_cmp(&a.display_name, &b.display_name))
            .then_with(|| natural_cmp(&a.kind, &b.kind))
    });
    scored.into_iter().map(|(_, entry)| entry.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_scores() {
        let entry = WidgetCatalogEntry::new(
            "git-branch",
            "Git Branch",
            "Shows the current git branch name",
            "Git",
        );
        assert_eq!(match_score(&entry, "git"), Some(0));
        assert_eq!(match_score(&entry, "branch"), Some(1));
        assert_eq!(match_score(&entry, "t-br"), Some(2));
        assert_eq!(match_score(&entry, "current"), Some(3));
        assert_eq!(match_score(&entry, "name git-branch"), Some(4));
        assert_eq!(match_score(&entry, "tokens"), None);
        assert_eq!(match_score(&entry, ""), Some(BLANK_QUERY_SCORE));
    }

    #[test]
    fn test_blank_query_keeps_everything() {
        let catalog = get_widget_catalog(&Settings::default());
        let results = filter_widget_catalog(&catalog, ALL_CATEGORIES, "   ");
        assert_eq!(results.len(), catalog.len());
        assert_eq!(results[0].display_name, "Block Timer");
    }

    #[test]
    fn test_catalog_entries_all_categorized() {
        let catalog = get_widget_catalog(&Settings::default());
        assert!(catalog.iter().all(|e| e.category != "Other"));
    }
}
