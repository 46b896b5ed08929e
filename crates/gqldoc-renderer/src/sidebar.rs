//! Navigation manifest assembly.
//!
//! Folds the flat list of rendered [`DocPage`]s into the ordered manifest
//! consumed by the documentation host: one homepage `doc` entry followed by
//! one `category` entry per label that produced at least one page. The
//! first page of a category creates its entry; item lists stay sorted and
//! duplicate-free, and categories are ordered alphabetically.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::renderer::DocPage;

/// Page id of the homepage inside the output directory.
pub const HOMEPAGE_ID: &str = "schema";

/// One navigation manifest entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarEntry {
    /// A single document link.
    Doc { id: String },
    /// A category holding an alphabetically-sorted list of page slugs.
    Category { label: String, items: Vec<String> },
}

/// Fold rendered pages into the navigation manifest.
#[must_use]
pub fn generate_sidebar(base_url: &str, pages: &[DocPage]) -> Vec<SidebarEntry> {
    let mut categories: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
    for page in pages {
        categories
            .entry(&page.category)
            .or_default()
            .insert(join_slug(base_url, &page.slug));
    }

    let mut sidebar = vec![SidebarEntry::Doc {
        id: join_slug(base_url, HOMEPAGE_ID),
    }];
    sidebar.extend(
        categories
            .into_iter()
            .map(|(label, items)| SidebarEntry::Category {
                label: label.to_owned(),
                items: items.into_iter().collect(),
            }),
    );
    sidebar
}

fn join_slug(base_url: &str, slug: &str) -> String {
    if base_url.is_empty() {
        slug.to_owned()
    } else {
        format!("{}/{slug}", base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(category: &str, slug: &str) -> DocPage {
        DocPage {
            category: category.to_owned(),
            slug: slug.to_owned(),
        }
    }

    #[test]
    fn test_homepage_entry_always_first() {
        let sidebar = generate_sidebar("schema", &[]);
        assert_eq!(
            sidebar,
            vec![SidebarEntry::Doc {
                id: "schema/schema".to_owned()
            }]
        );
    }

    #[test]
    fn test_first_page_creates_its_category() {
        let sidebar = generate_sidebar("schema", &[page("Queries", "queries/user")]);
        assert_eq!(
            sidebar[1],
            SidebarEntry::Category {
                label: "Queries".to_owned(),
                items: vec!["schema/queries/user".to_owned()],
            }
        );
    }

    #[test]
    fn test_items_sorted_within_category() {
        let sidebar = generate_sidebar(
            "schema",
            &[
                page("Objects", "objects/zebra"),
                page("Objects", "objects/aardvark"),
                page("Objects", "objects/mid"),
            ],
        );
        assert_eq!(
            sidebar[1],
            SidebarEntry::Category {
                label: "Objects".to_owned(),
                items: vec![
                    "schema/objects/aardvark".to_owned(),
                    "schema/objects/mid".to_owned(),
                    "schema/objects/zebra".to_owned(),
                ],
            }
        );
    }

    #[test]
    fn test_categories_ordered_alphabetically() {
        let sidebar = generate_sidebar(
            "schema",
            &[
                page("Queries", "queries/user"),
                page("Enums", "enums/sort"),
                page("Objects", "objects/user"),
            ],
        );
        let labels: Vec<&str> = sidebar
            .iter()
            .filter_map(|entry| match entry {
                SidebarEntry::Category { label, .. } => Some(label.as_str()),
                SidebarEntry::Doc { .. } => None,
            })
            .collect();
        assert_eq!(labels, vec!["Enums", "Objects", "Queries"]);
    }

    #[test]
    fn test_fold_is_idempotent_and_duplicate_free() {
        let pages = [
            page("Objects", "objects/user"),
            page("Objects", "objects/post"),
        ];
        let doubled: Vec<DocPage> = pages.iter().chain(pages.iter()).cloned().collect();

        let once = generate_sidebar("schema", &pages);
        let twice = generate_sidebar("schema", &doubled);
        assert_eq!(once, twice);

        let SidebarEntry::Category { items, .. } = &once[1] else {
            panic!("expected a category entry");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_empty_base_url_keeps_bare_slugs() {
        let sidebar = generate_sidebar("", &[page("Objects", "objects/user")]);
        assert_eq!(
            sidebar[0],
            SidebarEntry::Doc {
                id: "schema".to_owned()
            }
        );
        assert_eq!(
            sidebar[1],
            SidebarEntry::Category {
                label: "Objects".to_owned(),
                items: vec!["objects/user".to_owned()],
            }
        );
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let sidebar = generate_sidebar("schema", &[page("Queries", "queries/user")]);
        let json = serde_json::to_value(&sidebar).unwrap();

        assert_eq!(json[0]["type"], "doc");
        assert_eq!(json[0]["id"], "schema/schema");
        assert_eq!(json[1]["type"], "category");
        assert_eq!(json[1]["label"], "Queries");
        assert_eq!(json[1]["items"][0], "schema/queries/user");
    }
}
