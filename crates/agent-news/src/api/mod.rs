//! HTTP clients for the search providers

pub mod gnews;
pub mod serper;

pub use gnews::{Article, GNewsClient};
pub use serper::{OrganicResult, SerperClient};
