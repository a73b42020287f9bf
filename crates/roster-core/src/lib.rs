#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]

pub mod fixtures;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod models;
pub mod store;

pub use crate::fixtures::*;
pub use crate::models::*;
pub use crate::store::*;
