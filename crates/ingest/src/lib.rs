//! CSV ingestion for the three campaign source tables. The analytics
//! core only ever sees the typed tables produced here.

pub mod csv;

pub use csv::{load_brand_lift, load_creative, load_historic};
