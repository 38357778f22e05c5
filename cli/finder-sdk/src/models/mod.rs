pub mod estimate;
pub mod filter;
pub mod pagination;
pub mod session;
