pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod model;
pub mod repository;
pub mod storage;
pub mod task_api;
pub mod view;

pub use task_api::TaskBook;
