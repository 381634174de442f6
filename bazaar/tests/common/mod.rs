pub mod harness;

pub use harness::{listing_doc, BoardHarness};
