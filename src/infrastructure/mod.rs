pub mod log_client;
pub mod models;
pub mod order_repo;
