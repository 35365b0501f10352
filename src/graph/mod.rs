pub mod demo;
pub mod filter;
pub mod forest;
pub mod model;
