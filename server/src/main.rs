mod config;
mod handlers;
mod response;
mod store;

use std::{path::PathBuf, sync::Arc};

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use config::{
    read_env, read_env_usize, AppState, DEFAULT_BIND_ADDR, DEFAULT_DATA_DIR,
    DEFAULT_LEADERBOARD_LIMIT,
};
use store::ScoreStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let bind_addr = read_env("BIND_ADDR", DEFAULT_BIND_ADDR);
    let data_dir = PathBuf::from(read_env("DATA_DIR", DEFAULT_DATA_DIR));
    let leaderboard_limit = read_env_usize("LEADERBOARD_LIMIT", DEFAULT_LEADERBOARD_LIMIT);

    let store = ScoreStore::open(&data_dir).map_err(std::io::Error::other)?;

    tracing::info!(
        "starting road dodge api: bind_addr={} data_dir={} leaderboard_limit={}",
        bind_addr,
        data_dir.display(),
        leaderboard_limit
    );

    let state = AppState {
        store: Arc::new(store),
        leaderboard_limit,
    };

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(handlers::health))
            .route("/highscore", web::get().to(handlers::get_highscore))
            .route("/highscore", web::post().to(handlers::submit_score))
            .route("/leaderboard", web::get().to(handlers::get_leaderboard))
    })
    .bind(bind_addr)?
    .run()
    .await
}
