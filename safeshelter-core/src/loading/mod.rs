//! This module is responsible for fetching the facility tables, turning
//! their rows into [`Facility`](crate::Facility) values and keeping them in
//! the [`MarkerStore`].

mod de;
pub mod geom;
mod raw_types;
mod records;
mod source;
mod store;

pub use geom::{SourceCrs, extract_point};
pub use records::{ParseReport, parse_facilities, rows_from_payload};
pub use source::{FacilitySource, SupabaseConfig, SupabaseSource};
pub use store::{LoadSummary, LoadedFacilities, MarkerStore, fetch_all};
