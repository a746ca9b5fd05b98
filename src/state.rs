use actix_web::web;
use chrono::Duration;
use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenKeys};
use crate::config::Config;
use crate::routes;
use crate::services::{AccountService, TaskService};
use crate::store::{TaskStore, UserStore};

/// Everything the handlers and the auth middleware read, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub tokens: web::Data<TokenKeys>,
    pub accounts: web::Data<AccountService>,
    pub tasks: web::Data<TaskService>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        hasher: PasswordHasher,
        tokens: TokenKeys,
    ) -> Self {
        let tokens = web::Data::new(tokens);
        Self {
            accounts: web::Data::new(AccountService::new(users, hasher, tokens.clone().into_inner())),
            tasks: web::Data::new(TaskService::new(tasks)),
            tokens,
        }
    }

    pub fn from_config(
        config: &Config,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Self {
        Self::new(
            users,
            tasks,
            PasswordHasher::new(config.bcrypt_cost),
            TokenKeys::new(
                config.jwt_secret.as_bytes(),
                Duration::seconds(config.token_ttl_secs),
            ),
        )
    }

    /// Registers the shared data and extractor settings on an app or scope.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.tokens.clone())
            .app_data(self.accounts.clone())
            .app_data(self.tasks.clone())
            .app_data(routes::json_config())
            .app_data(routes::path_config())
            .app_data(routes::query_config());
    }
}
