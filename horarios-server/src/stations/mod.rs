//! Station landing-page lookup.
//!
//! Maps bare ADIF station codes to the slugged landing-page path the
//! portal links to (`13200` → `13200-bilbao-abando`). The table is built at
//! start-up and never changes while serving.

mod error;
mod slugs;

pub use error::SlugTableError;
pub use slugs::{StationPage, StationSlugs, UnmappedPolicy};
