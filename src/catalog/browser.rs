// Product browser - UI-local filter inputs plus a memoized filtered view
//
// The filtered list only changes when the criteria change (the catalog is
// immutable), so the matching indices are cached per criteria value and
// rebuilt lazily on the next read.

use super::{filter, Catalog, FilterCriteria, Product};

#[derive(Debug, Default)]
pub struct ProductBrowser {
    criteria: FilterCriteria,
    /// Criteria the cached indices were computed for
    cache: Option<(FilterCriteria, Vec<usize>)>,
    /// Highlighted row within the filtered list
    selected: usize,
}

impl ProductBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn push_search_char(&mut self, c: char) {
        self.criteria.search_term.push(c);
        self.selected = 0;
    }

    pub fn pop_search_char(&mut self) {
        if self.criteria.search_term.pop().is_some() {
            self.selected = 0;
        }
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.criteria.selected_category = category.into();
        self.selected = 0;
    }

    /// Step through the catalog's category list, wrapping at either end
    pub fn cycle_category(&mut self, catalog: &Catalog, forward: bool) {
        let categories = catalog.categories();
        let current = categories
            .iter()
            .position(|c| *c == self.criteria.selected_category)
            .unwrap_or(0);
        let len = categories.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.set_category(categories[next]);
    }

    /// Filtered products for the current criteria
    pub fn visible<'a>(&mut self, catalog: &'a Catalog) -> Vec<&'a Product> {
        let stale = self
            .cache
            .as_ref()
            .map_or(true, |(criteria, _)| *criteria != self.criteria);

        if stale {
            let products = catalog.products();
            let indices = filter(products, &self.criteria)
                .into_iter()
                .filter_map(|hit| products.iter().position(|p| std::ptr::eq(p, hit)))
                .collect();
            self.cache = Some((self.criteria.clone(), indices));
        }

        let products = catalog.products();
        self.cache
            .as_ref()
            .map(|(_, indices)| indices.iter().filter_map(|&i| products.get(i)).collect())
            .unwrap_or_default()
    }

    pub fn select_next(&mut self, catalog: &Catalog) {
        let count = self.visible(catalog).len();
        if count > 0 && self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The highlighted product, if the filtered list is non-empty
    pub fn selected_product<'a>(&mut self, catalog: &'a Catalog) -> Option<&'a Product> {
        let selected = self.selected;
        self.visible(catalog).get(selected).copied()
    }

    /// Whether the next `visible` call will recompute
    #[cfg(test)]
    fn is_cached(&self) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|(criteria, _)| *criteria == self.criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ALL_CATEGORIES;

    #[test]
    fn test_visible_is_memoized_per_criteria() {
        let catalog = Catalog::bundled().unwrap();
        let mut browser = ProductBrowser::new();

        assert!(!browser.is_cached());
        let all = browser.visible(&catalog).len();
        assert_eq!(all, catalog.products().len());
        assert!(browser.is_cached());

        browser.push_search_char('x');
        assert!(!browser.is_cached());
        let narrowed = browser.visible(&catalog).len();
        assert!(narrowed < all);
        assert!(browser.is_cached());
    }

    #[test]
    fn test_cycle_category_wraps() {
        let catalog = Catalog::bundled().unwrap();
        let mut browser = ProductBrowser::new();

        browser.cycle_category(&catalog, false);
        assert_eq!(browser.criteria().selected_category, "Rumah Tangga");
        browser.cycle_category(&catalog, true);
        assert_eq!(browser.criteria().selected_category, ALL_CATEGORIES);
        browser.cycle_category(&catalog, true);
        assert_eq!(browser.criteria().selected_category, "Elektronik");
    }

    #[test]
    fn test_selection_resets_on_new_criteria() {
        let catalog = Catalog::bundled().unwrap();
        let mut browser = ProductBrowser::new();

        browser.select_next(&catalog);
        browser.select_next(&catalog);
        assert_eq!(browser.selected_product(&catalog).unwrap().id, 3);

        browser.set_category("Fashion");
        assert_eq!(browser.selected(), 0);
        assert_eq!(browser.selected_product(&catalog).unwrap().id, 3);

        for c in "zzz".chars() {
            browser.push_search_char(c);
        }
        assert_eq!(browser.selected_product(&catalog), None);
        browser.select_next(&catalog);
        assert_eq!(browser.selected(), 0);
    }
}
