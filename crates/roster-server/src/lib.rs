#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod domains;
pub mod http;
pub mod infra;
pub mod runtime;
pub mod settings;
