pub mod activity;
pub mod amount;
pub mod audit;
pub mod expense;
pub mod group;
pub mod rows;
pub mod settlement;
pub mod summary;
