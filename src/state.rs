use crate::client::HttpTodoApi;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The session lock is held across each call to the todo service, so intents
/// apply one at a time in the order they arrive.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session<HttpTodoApi>>>,
}

impl AppState {
    pub fn new(session: Session<HttpTodoApi>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}
