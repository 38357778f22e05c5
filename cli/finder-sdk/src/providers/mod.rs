pub mod catalog;
pub mod crawl;
pub mod query;
