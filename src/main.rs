use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use rollcall::{config::Config, routes, store::PgUserStore, AppContext};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let options = match config.connect_options() {
        Ok(options) => options,
        Err(e) => {
            log::error!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = match PgUserStore::connect(options, config.max_connections).await {
        Ok(store) => store,
        Err(e) => {
            log::error!("failed to connect to the database: {}", e);
            std::process::exit(1);
        }
    };

    let context = web::Data::new(AppContext::new(Arc::new(store)));

    log::info!("starting Rollcall server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(context.clone())
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header().max_age(3600))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
