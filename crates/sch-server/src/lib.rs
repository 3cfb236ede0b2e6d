//! School Directory Server
//!
//! Assembles the school routes, static upload serving, CORS, and request
//! logging into a single actix-web server.
//!
//! ## Routes
//!
//! - `POST /api/schools` — create, with optional `image` upload
//! - `GET  /api/schools` — list, newest first
//! - `GET  /api/schools/{id}` — fetch one
//! - `GET  /api/health` — storage round trip
//! - `GET  /uploads/{file}` — stored images
use actix_cors::Cors;
use actix_files::Files;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use sch_core::Config;
use sch_core::UPLOADS_PATH;
use sch_pg::Postgres;
use sch_schools::*;
use std::sync::Arc;

/// Registers storage, upload policy, and every route on an app.
pub fn configure(
    repo: web::Data<dyn SchoolRepository>,
    uploads: web::Data<Uploads>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let files = Files::new(UPLOADS_PATH, uploads.dir());
        cfg.app_data(repo)
            .app_data(uploads)
            .service(files)
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/schools", web::post().to(handlers::create))
                    .route("/schools", web::get().to(handlers::list))
                    .route("/schools/{id}", web::get().to(handlers::fetch)),
            )
            .default_service(web::to(handlers::missing));
    }
}

/// Picks the storage backend. A failed connection still yields a handle:
/// the server starts and storage-backed requests fail until restart.
async fn storage(config: &Config) -> Arc<dyn SchoolRepository> {
    if config.memory {
        log::warn!("serving from memory, records are lost on exit");
        return Arc::new(Memory::new());
    }
    let db = Postgres::connect(&config.db_url(), config.timeout()).await;
    if config.migrate {
        match db.install::<School>().await {
            Ok(()) => log::info!("schema installed"),
            Err(e) => log::error!("schema installation failed: {}", e),
        }
    }
    Arc::new(db)
}

#[rustfmt::skip]
pub async fn run(config: Config) -> Result<(), std::io::Error> {
    let uploads = Uploads::new(&config.uploads);
    uploads.prepare()?;
    let uploads = web::Data::new(uploads);
    let repo = web::Data::from(storage(&config).await);
    log::info!("server running on {}", config.bind());
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .configure(configure(repo.clone(), uploads.clone()))
    })
    .workers(config.workers)
    .bind(config.bind())?
    .run()
    .await?;
    log::info!("server stopped, releasing storage");
    Ok(())
}
