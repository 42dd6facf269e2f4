use dotenvy::dotenv;
use order_gateway::config::Config;
use order_gateway::{build_server, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;

    log::info!(
        "Starting server at http://{}:{} (upstream origin {})",
        config.host,
        config.port,
        config.upstream_origin
    );

    build_server(state, &config.host, config.port)?.await
}
