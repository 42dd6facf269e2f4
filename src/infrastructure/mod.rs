pub mod models;
pub mod session_store;
pub mod upstream;
