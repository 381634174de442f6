pub mod filter;
pub mod listing;

pub use filter::{category_options, location_options, ListingFilter};
pub use listing::{FormField, Listing, ListingForm};
