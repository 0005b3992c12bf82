//! Query Planner front half
//!
//! Binding turns a parsed SELECT into a statement whose every table and field
//! reference has been checked against the catalog:
//!
//! 1. **Tables**: FROM names are looked up in the catalog
//! 2. **Fields**: projected attributes are validated and expanded
//! 3. **Filter**: WHERE conditions are bound by a `PredicateBinder`

pub mod aggregation;
pub mod binder;
pub mod filter;
pub mod select_stmt;


pub use aggregation::*;
pub use binder::*;
pub use filter::*;
pub use select_stmt::*;
