pub mod app;
pub mod buckets;
pub mod client;
pub mod config;
pub mod errors;
pub mod form;
pub mod handlers;
pub mod model;
pub mod selection;
pub mod session;
pub mod state;
pub mod store;
pub mod ui;
pub mod view;

pub use app::router;
pub use client::{HttpTodoApi, TodoApi};
pub use config::Config;
pub use session::{Intent, Outcome, Session};
pub use state::AppState;
