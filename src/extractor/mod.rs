pub mod classifier;
pub mod row;

pub use classifier::classify_table;
pub use row::extract;
