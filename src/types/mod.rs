//! Data types shared by the ordering engine and its callers.

mod cell;
mod config;
mod group;
mod row_ref;

pub use cell::*;
pub use config::*;
pub use group::*;
pub use row_ref::*;

pub(crate) use cell::CellKey;
