use infrastructure::TodoStore;
use shared::JwtValidator;
use std::sync::Arc;

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub tokens: Arc<JwtValidator>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, tokens: JwtValidator) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
        }
    }
}
