pub mod add;
pub mod budget;
pub mod clear;
pub mod import;
pub mod remove;
pub mod report;
pub mod search_by_category;
pub mod seed;
