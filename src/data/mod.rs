pub mod datetime;
pub mod header;
pub mod loader;
pub mod normalize;
pub mod units;
