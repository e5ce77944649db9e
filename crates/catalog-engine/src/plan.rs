//! Pagination planning
//!
//! The plan is computed once, before anything is drawn, so the index page can
//! print each category's start page. The renderer must then produce pages in
//! exactly the planned order and count.

use crate::types::*;
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the planner orders items inside the ungrouped catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ItemOrder {
    /// Keep the caller's order
    #[default]
    AsGiven,
    /// Case-insensitive alphabetical order by item name (stable)
    ByName,
}

/// Inputs of the planner besides the items themselves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanConfig {
    pub group_by_category: bool,
    /// Grid capacity of one content page
    pub items_per_page: usize,
    /// Order of items in the ungrouped catalog
    pub order: ItemOrder,
    /// Index rows that fit on one index page
    pub index_entries_per_page: usize,
}

/// One group of items rendered together
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPlan {
    pub name: String,
    /// First page of the group: its intro page when grouped, its first
    /// content page otherwise (1-based)
    pub start_page: usize,
    pub item_count: usize,
    /// Pages consumed by the group, intro page included
    pub page_count: usize,
    pub items: Vec<CatalogItem>,
}

impl GroupPlan {
    /// Number of content pages of the group
    pub fn content_pages(&self, items_per_page: usize) -> usize {
        self.item_count.div_ceil(items_per_page)
    }
}

/// The complete page plan of one catalog
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub grouped: bool,
    pub items_per_page: usize,
    /// Cover page plus index pages
    pub front_matter: usize,
    pub index_pages: usize,
    pub groups: Vec<GroupPlan>,
    pub total_pages: usize,
    pub item_count: usize,
}

impl PagePlan {
    /// Items in rendering order
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.groups.iter().flat_map(|group| group.items.iter())
    }
}

/// Case-insensitive comparison used for category and name ordering.
///
/// Falls back to the exact strings so the order is total and stable within
/// one run.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Plan the pages of a catalog.
///
/// Rejects an empty item list with [`CatalogError::EmptySelection`].
pub fn plan_pages(items: &[CatalogItem], config: &PlanConfig) -> Result<PagePlan> {
    if items.is_empty() {
        return Err(CatalogError::EmptySelection);
    }
    if config.items_per_page == 0 {
        return Err(CatalogError::InvalidGeometry(
            "a content page must hold at least one item".to_string(),
        ));
    }
    if config.index_entries_per_page == 0 {
        return Err(CatalogError::InvalidGeometry(
            "the index page must hold at least one entry".to_string(),
        ));
    }

    if config.group_by_category {
        Ok(plan_grouped(items, config))
    } else {
        Ok(plan_ungrouped(items, config))
    }
}

fn plan_ungrouped(items: &[CatalogItem], config: &PlanConfig) -> PagePlan {
    let mut ordered = items.to_vec();
    if config.order == ItemOrder::ByName {
        ordered.sort_by(|a, b| compare_names(&a.name, &b.name));
    }

    let front_matter = 1;
    let content_pages = ordered.len().div_ceil(config.items_per_page);

    let group = GroupPlan {
        name: String::new(),
        start_page: front_matter + 1,
        item_count: ordered.len(),
        page_count: content_pages,
        items: ordered,
    };

    PagePlan {
        grouped: false,
        items_per_page: config.items_per_page,
        front_matter,
        index_pages: 0,
        total_pages: front_matter + content_pages,
        item_count: items.len(),
        groups: vec![group],
    }
}

fn plan_grouped(items: &[CatalogItem], config: &PlanConfig) -> PagePlan {
    // Partition by category, keeping item order inside each group
    let mut partitions: Vec<(String, Vec<CatalogItem>)> = Vec::new();
    for item in items {
        let category = item.category_name();
        match partitions.iter_mut().find(|(name, _)| name.as_str() == category) {
            Some((_, members)) => members.push(item.clone()),
            None => partitions.push((category.to_string(), vec![item.clone()])),
        }
    }
    partitions.sort_by(|(a, _), (b, _)| compare_names(a, b));

    let index_pages = partitions.len().div_ceil(config.index_entries_per_page);
    let front_matter = 1 + index_pages;

    let mut page_counter = front_matter + 1;
    let mut groups = Vec::with_capacity(partitions.len());

    for (name, members) in partitions {
        let content_pages = members.len().div_ceil(config.items_per_page);
        let page_count = 1 + content_pages;

        log::debug!(
            "Group '{}': {} items, pages {}..{}",
            name,
            members.len(),
            page_counter,
            page_counter + page_count - 1
        );

        groups.push(GroupPlan {
            name,
            start_page: page_counter,
            item_count: members.len(),
            page_count,
            items: members,
        });
        page_counter += page_count;
    }

    PagePlan {
        grouped: true,
        items_per_page: config.items_per_page,
        front_matter,
        index_pages,
        total_pages: page_counter - 1,
        item_count: items.len(),
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(grouped: bool) -> PlanConfig {
        PlanConfig {
            group_by_category: grouped,
            items_per_page: 12,
            order: ItemOrder::AsGiven,
            index_entries_per_page: 24,
        }
    }

    fn items_in(category: &str, count: usize) -> Vec<CatalogItem> {
        (0..count)
            .map(|i| {
                CatalogItem::new(format!("{}-{}", category, i), format!("Item {}", i))
                    .with_category(category)
            })
            .collect()
    }

    #[test]
    fn test_ungrouped_fourteen_items() {
        let items = items_in("X", 14);
        let plan = plan_pages(&items, &config(false)).unwrap();

        assert_eq!(plan.front_matter, 1);
        assert_eq!(plan.groups.len(), 1);
        assert_eq!(plan.groups[0].start_page, 2);
        assert_eq!(plan.groups[0].content_pages(12), 2);
        assert_eq!(plan.total_pages, 3);
    }

    #[test]
    fn test_grouped_two_categories() {
        let mut items = items_in("B", 1);
        items.extend(items_in("A", 13));
        let plan = plan_pages(&items, &config(true)).unwrap();

        let names: Vec<&str> = plan.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(plan.front_matter, 2);
        assert_eq!(plan.groups[0].start_page, 3);
        assert_eq!(plan.groups[0].page_count, 3);
        assert_eq!(plan.groups[1].start_page, 6);
        assert_eq!(plan.groups[1].page_count, 2);
        assert_eq!(plan.total_pages, 7);
    }

    #[test]
    fn test_blank_categories_grouped_as_uncategorized() {
        let items = vec![
            CatalogItem::new("1", "a").with_category(""),
            CatalogItem::new("2", "b").with_category("Tools"),
            CatalogItem::new("3", "c").with_category("  "),
        ];
        let plan = plan_pages(&items, &config(true)).unwrap();

        let uncategorized = plan
            .groups
            .iter()
            .find(|g| g.name == UNCATEGORIZED)
            .unwrap();
        assert_eq!(uncategorized.item_count, 2);
        assert_eq!(plan.groups.len(), 2);
    }

    #[test]
    fn test_groups_sorted_case_insensitively() {
        let mut items = items_in("bells", 1);
        items.extend(items_in("Axles", 1));
        items.extend(items_in("chains", 1));
        items.extend(items_in("Brakes", 1));
        let plan = plan_pages(&items, &config(true)).unwrap();

        let names: Vec<&str> = plan.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Axles", "bells", "Brakes", "chains"]);
    }

    #[test]
    fn test_grouped_keeps_item_order_within_group() {
        let items = vec![
            CatalogItem::new("3", "zeta").with_category("A"),
            CatalogItem::new("1", "alpha").with_category("A"),
        ];
        let plan = plan_pages(&items, &config(true)).unwrap();
        let codes: Vec<&str> = plan.items().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["3", "1"]);
    }

    #[test]
    fn test_ungrouped_sort_by_name() {
        let items = vec![
            CatalogItem::new("1", "selim"),
            CatalogItem::new("2", "Aro"),
            CatalogItem::new("3", "corrente"),
            CatalogItem::new("4", "Bomba"),
        ];

        let as_given = plan_pages(&items, &config(false)).unwrap();
        let codes: Vec<&str> = as_given.items().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["1", "2", "3", "4"]);

        let by_name = plan_pages(
            &items,
            &PlanConfig {
                order: ItemOrder::ByName,
                ..config(false)
            },
        )
        .unwrap();
        let names: Vec<&str> = by_name.items().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Aro", "Bomba", "corrente", "selim"]);
    }

    #[test]
    fn test_page_count_consistency() {
        for sizes in [vec![1], vec![12], vec![13, 1], vec![5, 24, 25, 7], vec![36; 30]] {
            let mut items = Vec::new();
            for (i, size) in sizes.iter().enumerate() {
                items.extend(items_in(&format!("cat{:02}", i), *size));
            }
            let plan = plan_pages(&items, &config(true)).unwrap();

            let group_pages: usize = plan
                .groups
                .iter()
                .map(|g| 1 + g.item_count.div_ceil(12))
                .sum();
            assert_eq!(plan.front_matter + group_pages, plan.total_pages);

            let mut expected_start = plan.front_matter + 1;
            for group in &plan.groups {
                assert_eq!(group.start_page, expected_start);
                expected_start += group.page_count;
            }
        }
    }

    #[test]
    fn test_many_groups_spill_index_onto_more_pages() {
        let mut items = Vec::new();
        for i in 0..30 {
            items.extend(items_in(&format!("cat{:02}", i), 1));
        }
        let plan = plan_pages(&items, &config(true)).unwrap();

        assert_eq!(plan.index_pages, 2);
        assert_eq!(plan.front_matter, 3);
        assert_eq!(plan.groups[0].start_page, 4);
    }

    #[test]
    fn test_empty_selection_rejected() {
        assert!(matches!(
            plan_pages(&[], &config(true)),
            Err(CatalogError::EmptySelection)
        ));
    }
}
