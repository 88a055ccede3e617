pub mod category_repository;
pub mod connection;
pub mod repository;
pub mod store;

pub use store::FinanceStore;
