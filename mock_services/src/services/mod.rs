pub mod generator;
pub mod query;
pub mod store;

pub use generator::spawn_action_log_generator;
pub use query::ActionLogQuery;
pub use store::MockStore;

#[derive(Debug)]
pub enum ServiceError {
    InvalidInput(String),
    Unauthorized,
}
