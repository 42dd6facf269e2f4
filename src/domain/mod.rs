pub mod errors;
pub mod lenient;
pub mod order;
pub mod pagination;
pub mod ports;
pub mod reconcile;
pub mod session;
pub mod stats;
