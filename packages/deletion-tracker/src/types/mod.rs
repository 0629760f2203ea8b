pub mod audit;
pub mod config;
pub mod page;
pub mod post;
