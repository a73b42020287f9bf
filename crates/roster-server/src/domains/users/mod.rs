pub mod http;
pub mod seed;
pub mod service;
