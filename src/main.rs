use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use marketplace_backend::auth::jwks::JwksCache;
use marketplace_backend::auth::jwt::TokenVerifier;
use marketplace_backend::cache::{ClientCache, RedisCache};
use marketplace_backend::services::{BidService, ClientService, ProjectService};
use marketplace_backend::{Config, create_pool, handlers};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::from_env().map_err(io::Error::other)?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(io::Error::other)?;
    tracing::info!("Connected to database");

    Migrator::up(&db, None).await.map_err(io::Error::other)?;
    tracing::info!("Migrations applied");

    let redis_cache = RedisCache::new(&config.redis_url)
        .await
        .map_err(io::Error::other)?;
    tracing::info!("Connected to Redis");

    let verifier = match &config.jwt_secret {
        Some(secret) => {
            tracing::info!("Verifying tokens with the HS256 project secret");
            TokenVerifier::Secret(secret.clone())
        }
        None => TokenVerifier::Jwks(JwksCache::from_config(&config)),
    };

    let db_data = web::Data::new(db.clone());
    let verifier_data = web::Data::new(Arc::new(verifier));
    let client_cache = web::Data::new(ClientCache::new(redis_cache, config.cache.clone()));
    let bid_service = web::Data::new(BidService::new(db.clone()));
    let client_service = web::Data::new(ClientService::new(db.clone()));
    let project_service = web::Data::new(ProjectService::new(db));

    let bind_addr = config.bind_addr();
    let cors_max_age = config.cors_max_age;
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(cors_max_age);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(verifier_data.clone())
            .app_data(client_cache.clone())
            .app_data(bid_service.clone())
            .app_data(client_service.clone())
            .app_data(project_service.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
