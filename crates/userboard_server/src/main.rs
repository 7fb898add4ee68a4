//! Server entry point: resolves config, opens the store, serves HTTP until
//! shutdown, then closes the store.

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{error, info};
use userboard_core::{core_version, init_logging};
use userboard_server::http::configure;
use userboard_server::{ServerConfig, UserStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::from_env().map_err(|err| {
        eprintln!("userboard: {err}");
        std::io::Error::other(err.to_string())
    })?;

    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        // The server stays usable without file logs.
        eprintln!("userboard: logging disabled: {err}");
    }

    let store = match UserStore::open(&config.db_path) {
        Ok(store) => store,
        Err(err) => {
            error!(
                "event=server_start module=main status=error error_code=store_unavailable path={} error={}",
                config.db_path.display(),
                err
            );
            eprintln!("userboard: failed to open database: {err}");
            return Err(std::io::Error::other(err.to_string()));
        }
    };

    match store.with_users(|service| service.count_users()) {
        Ok(count) => info!("event=db_ready module=main status=ok user_count={count}"),
        Err(err) => error!("event=db_ready module=main status=error error={err}"),
    }

    let server_store = store.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(server_store.clone()))
            .wrap(Logger::new(
                "event=http_request module=http request=\"%r\" status=%s duration_ms=%D",
            ))
            .configure(configure)
    })
    .bind(config.bind_addr)?;

    info!(
        "event=server_start module=main status=ok version={} bind={} db_path={}",
        core_version(),
        config.bind_addr,
        config.db_path.display()
    );

    let outcome = server.run().await;
    info!("event=server_stop module=main status=ok");

    if let Err(err) = store.close() {
        error!("event=db_close module=main status=error error={err}");
    }

    outcome
}
