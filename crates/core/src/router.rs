//! Category-driven provider ordering.
//!
//! The routing table is plain data: each [`Category`] maps to a primary and a
//! fallback tier of provider names. [`ProviderRouter`] turns that into the
//! attempt sequence for one call.

use std::collections::HashMap;

use serde::Serialize;

use crate::imagery::Category;
use crate::providers::names;

/// Upper bound on strict-phase attempts.
pub const MAX_ATTEMPTS_CAP: usize = 6;

/// Ordered provider tiers for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub primary: Vec<String>,
    pub fallback: Vec<String>,
}

impl Route {
    pub fn new(primary: &[&str], fallback: &[&str]) -> Self {
        Self {
            primary: primary.iter().map(|s| s.to_string()).collect(),
            fallback: fallback.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// `primary ++ fallback`.
    pub fn sequence(&self) -> impl Iterator<Item = &str> {
        self.primary
            .iter()
            .chain(self.fallback.iter())
            .map(String::as_str)
    }
}

/// Category to [`Route`] mapping.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    routes: HashMap<Category, Route>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    pub fn with_route(mut self, category: Category, route: Route) -> Self {
        self.routes.insert(category, route);
        self
    }

    /// Route for a category. Unmapped categories use the `general` route.
    pub fn route(&self, category: Category) -> Option<&Route> {
        self.routes
            .get(&category)
            .or_else(|| self.routes.get(&Category::General))
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        let general = Route::new(
            &[names::UNSPLASH, names::PEXELS, names::PIXABAY],
            &[names::OPENVERSE, names::WIKIMEDIA, names::PLACEHOLDER],
        );
        let famous_person = Route::new(
            &[names::WIKIMEDIA],
            &[
                names::UNSPLASH,
                names::PEXELS,
                names::PIXABAY,
                names::OPENVERSE,
                names::PLACEHOLDER,
            ],
        );

        Self::new()
            .with_route(Category::FamousPerson, famous_person)
            .with_route(Category::StockImage, general.clone())
            .with_route(Category::General, general)
    }
}

/// Attempt sequence for one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePlan {
    pub sequence: Vec<String>,
    pub max_attempts: usize,
}

impl RoutePlan {
    /// Provider for 1-indexed attempt `k`.
    ///
    /// Wraps around the sequence, so a short sequence with a larger attempt
    /// count revisits providers. `None` only when the sequence is empty or
    /// `k` is zero.
    pub fn provider_for_attempt(&self, k: usize) -> Option<&str> {
        if self.sequence.is_empty() || k == 0 {
            return None;
        }
        Some(self.sequence[(k - 1) % self.sequence.len()].as_str())
    }

    /// Providers in attempt order, `max_attempts` long.
    pub fn attempts(&self) -> impl Iterator<Item = (usize, &str)> {
        (1..=self.max_attempts).filter_map(move |k| self.provider_for_attempt(k).map(|p| (k, p)))
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Builds [`RoutePlan`]s from a routing table.
#[derive(Debug, Clone)]
pub struct ProviderRouter {
    table: RoutingTable,
    attempt_cap: usize,
}

impl ProviderRouter {
    pub fn new(table: RoutingTable, attempt_cap: usize) -> Self {
        Self {
            table,
            attempt_cap: attempt_cap.clamp(1, MAX_ATTEMPTS_CAP),
        }
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Plan attempts for `category`, keeping only names `is_registered` accepts.
    pub fn plan<F>(&self, category: Category, is_registered: F) -> RoutePlan
    where
        F: Fn(&str) -> bool,
    {
        let sequence: Vec<String> = self
            .table
            .route(category)
            .map(|route| {
                route
                    .sequence()
                    .filter(|name| is_registered(name))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let max_attempts = sequence.len().min(self.attempt_cap);
        RoutePlan {
            sequence,
            max_attempts,
        }
    }
}

impl Default for ProviderRouter {
    fn default() -> Self {
        Self::new(RoutingTable::default(), MAX_ATTEMPTS_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(_: &str) -> bool {
        true
    }

    #[test]
    fn test_famous_person_primary_is_archive_only() {
        let table = RoutingTable::default();
        let route = table.route(Category::FamousPerson).unwrap();
        assert_eq!(route.primary, vec![names::WIKIMEDIA.to_string()]);
        assert_eq!(route.fallback.len(), 5);
    }

    #[test]
    fn test_placeholder_is_last_in_every_route() {
        let table = RoutingTable::default();
        for category in [Category::FamousPerson, Category::StockImage, Category::General] {
            let route = table.route(category).unwrap();
            assert_eq!(route.sequence().last(), Some(names::PLACEHOLDER));
        }
    }

    #[test]
    fn test_general_plan() {
        let plan = ProviderRouter::default().plan(Category::General, all);
        assert_eq!(
            plan.sequence,
            vec!["unsplash", "pexels", "pixabay", "openverse", "wikimedia", "placeholder"]
        );
        assert_eq!(plan.max_attempts, 6);
        assert_eq!(plan.provider_for_attempt(1), Some("unsplash"));
        assert_eq!(plan.provider_for_attempt(6), Some("placeholder"));
    }

    #[test]
    fn test_unregistered_names_are_dropped() {
        let plan = ProviderRouter::default().plan(Category::FamousPerson, |name| {
            name == names::WIKIMEDIA || name == names::PLACEHOLDER
        });
        assert_eq!(plan.sequence, vec!["wikimedia", "placeholder"]);
        assert_eq!(plan.max_attempts, 2);
    }

    #[test]
    fn test_attempt_cap() {
        let router = ProviderRouter::new(RoutingTable::default(), 2);
        let plan = router.plan(Category::StockImage, all);
        let attempts: Vec<_> = plan.attempts().collect();
        assert_eq!(attempts, vec![(1, "unsplash"), (2, "pexels")]);
    }

    #[test]
    fn test_attempt_index_wraps() {
        let plan = RoutePlan {
            sequence: vec!["a".to_string(), "b".to_string()],
            max_attempts: 5,
        };
        let visited: Vec<_> = plan.attempts().map(|(_, p)| p).collect();
        assert_eq!(visited, vec!["a", "b", "a", "b", "a"]);
        assert_eq!(plan.provider_for_attempt(0), None);
    }

    #[test]
    fn test_empty_registry_yields_empty_plan() {
        let plan = ProviderRouter::default().plan(Category::General, |_| false);
        assert!(plan.is_empty());
        assert_eq!(plan.max_attempts, 0);
        assert_eq!(plan.attempts().count(), 0);
    }

    #[test]
    fn test_unmapped_category_uses_general() {
        let table = RoutingTable::new().with_route(
            Category::General,
            Route::new(&["x"], &["y"]),
        );
        let route = table.route(Category::StockImage).unwrap();
        assert_eq!(route.primary, vec!["x".to_string()]);
    }
}
