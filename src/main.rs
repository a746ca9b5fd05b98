use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use std::io;
use std::sync::Arc;

use tasknest::config::{Config, StorageBackend};
use tasknest::routes;
use tasknest::store::{self, MemoryTaskStore, MemoryUserStore, PgTaskStore, PgUserStore};
use tasknest::AppState;

fn startup_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(startup_error)?;
    log::debug!("loaded {:?}", config);

    let state = match &config.storage {
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = store::postgres::connect(database_url, *max_connections)
                .await
                .map_err(startup_error)?;
            AppState::from_config(
                &config,
                Arc::new(PgUserStore::new(pool.clone())),
                Arc::new(PgTaskStore::new(pool)),
            )
        }
        StorageBackend::Memory => {
            log::warn!("using in-memory storage; data is lost on restart");
            AppState::from_config(
                &config,
                Arc::new(MemoryUserStore::new()),
                Arc::new(MemoryTaskStore::new()),
            )
        }
    };

    log::info!(
        "Starting server at {} ({} storage)",
        config.server_url(),
        config.storage_name()
    );
    HttpServer::new(move || {
        App::new()
            .configure(|cfg| state.configure(cfg))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.clone(), config.server_port))?
    .run()
    .await
}
