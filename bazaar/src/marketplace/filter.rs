//! Client-side filtering of the listings mirror.

use std::collections::BTreeSet;

use super::listing::Listing;

/// Three independent, case-insensitive substring filters.
///
/// An empty filter string matches every listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Matched against name, description and service type
    pub search: String,
    /// Matched against service type
    pub category: String,
    /// Matched against location
    pub location: String,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.category.is_empty() && self.location.is_empty()
    }

    /// Listings satisfying all three predicates, in mirror order.
    pub fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        let search = self.search.to_lowercase();
        let category = self.category.to_lowercase();
        let location = self.location.to_lowercase();
        listings
            .iter()
            .filter(|l| matches_lowered(l, &search, &category, &location))
            .collect()
    }
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    lowered_needle.is_empty() || haystack.to_lowercase().contains(lowered_needle)
}

fn matches_lowered(listing: &Listing, search: &str, category: &str, location: &str) -> bool {
    let search_hit = search.is_empty()
        || contains_ci(&listing.name, search)
        || contains_ci(&listing.description, search)
        || contains_ci(&listing.service_type, search);

    search_hit
        && contains_ci(&listing.service_type, category)
        && contains_ci(&listing.location, location)
}

/// Distinct non-empty values of one field, in ascending lexical order.
pub fn distinct_values<'a, F>(listings: &'a [Listing], field: F) -> Vec<String>
where
    F: Fn(&'a Listing) -> &'a str,
{
    listings
        .iter()
        .map(field)
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Options of the category filter.
pub fn category_options(listings: &[Listing]) -> Vec<String> {
    distinct_values(listings, |l| l.service_type.as_str())
}

/// Options of the location filter.
pub fn location_options(listings: &[Listing]) -> Vec<String> {
    distinct_values(listings, |l| l.location.as_str())
}
