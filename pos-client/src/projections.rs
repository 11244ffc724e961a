//! Derived view projections
//!
//! Pure, side-effect-free functions over store contents, recomputed on every
//! read. Nothing here touches a store or the network.

use serde::Serialize;
use shared::models::{MenuCategory, MenuItem};
use std::cmp::Ordering;

/// Tax rate applied at payment time
pub const TAX_RATE: f64 = 0.10;
/// Service charge rate applied at payment time
pub const SERVICE_RATE: f64 = 0.05;

// ============================================================================
// Filter
// ============================================================================

/// Conjunctive menu filter: every populated field must match.
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    /// Case-insensitive substring match against name or description
    pub search: Option<String>,
    pub category: Option<MenuCategory>,
    pub available: Option<bool>,
}

impl MenuFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.category.is_none() && self.available.is_none()
    }

    fn matches(&self, item: &MenuItem) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_name = item.name.to_lowercase().contains(&needle);
            let in_description = item
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !in_name && !in_description {
                return false;
            }
        }
        if let Some(category) = self.category {
            if item.category != category {
                return false;
            }
        }
        if let Some(available) = self.available {
            if item.is_available != available {
                return false;
            }
        }
        true
    }
}

/// Filter menu items, preserving input order.
pub fn filter_menu(items: &[MenuItem], filter: &MenuFilter) -> Vec<MenuItem> {
    if filter.is_empty() {
        return items.to_vec();
    }
    items.iter().filter(|i| filter.matches(i)).cloned().collect()
}

// ============================================================================
// Sort
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sortable menu fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSortKey {
    Name,
    Description,
    Price,
    Stock,
}

/// Stable sort over the chosen field. String fields compare
/// case-insensitively; missing values sort last regardless of direction.
pub fn sort_menu(items: &[MenuItem], key: MenuSortKey, direction: SortDirection) -> Vec<MenuItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match key {
            MenuSortKey::Name => cmp_str(&a.name, &b.name),
            MenuSortKey::Description => {
                // Nulls last, direction applied only between present values
                return match (a.description.as_deref(), b.description.as_deref()) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(x), Some(y)) => apply_direction(cmp_str(x, y), direction),
                };
            }
            MenuSortKey::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            MenuSortKey::Stock => a.stock.cmp(&b.stock),
        };
        apply_direction(ordering, direction)
    });
    sorted
}

fn cmp_str(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// One page of a projected list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Slice `[(page-1)*size, page*size)` of the input, 1-indexed. Page numbers
/// beyond range yield an empty slice, not an error.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    };

    let slice = match page.checked_sub(1) {
        Some(offset) if page_size > 0 => {
            let start = offset.saturating_mul(page_size).min(total_items);
            let end = start.saturating_add(page_size).min(total_items);
            items[start..end].to_vec()
        }
        _ => Vec::new(),
    };

    Page {
        items: slice,
        total_items,
        total_pages,
    }
}

// ============================================================================
// Payment calculation
// ============================================================================

/// Computed payment breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaymentDetails {
    pub subtotal: f64,
    pub tax: f64,
    pub service: f64,
    pub total: f64,
}

/// Fixed-rate tax and service on top of the order subtotal.
pub fn calculate_payment_details(subtotal: f64) -> PaymentDetails {
    let tax = subtotal * TAX_RATE;
    let service = subtotal * SERVICE_RATE;
    PaymentDetails {
        subtotal,
        tax,
        service,
        total: subtotal + tax + service,
    }
}
