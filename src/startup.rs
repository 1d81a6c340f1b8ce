use std::{net::TcpListener, sync::Arc};

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    http::header,
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};
use anyhow::Context;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::{
    authentication::{JwtMiddleware, TokenKeys},
    configuration::{ApplicationSettings, DatabaseSettings, Settings},
    routes::{
        create_class, delete_account, delete_attendance, delete_class, end_class,
        export_attendance_sheet, get_class, get_class_attendance, get_classes, get_profile,
        json_error_handler, login, not_found, path_error_handler, register, register_attendance,
        update_profile,
    },
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        sqlx::migrate!("./migrations")
            .run(&connection_pool)
            .await
            .context("Failed to run database migrations.")?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind {}", address))?;
        let port = listener.local_addr()?.port();
        let keys = TokenKeys::from_settings(&configuration.jwt);
        let server = run(listener, connection_pool, keys, configuration.application).await?;

        tracing::info!(port, "Application listening");
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> SqlitePool {
    SqlitePoolOptions::new().connect_lazy_with(configuration.connect_options())
}

pub async fn run(
    listener: TcpListener,
    db_pool: SqlitePool,
    keys: TokenKeys,
    settings: ApplicationSettings,
) -> Result<Server, anyhow::Error> {
    let db_pool = Data::new(db_pool);
    let auth_keys = Arc::new(keys.clone());
    let keys = Data::new(keys);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&settings.allowed_origins))
            .app_data(
                web::JsonConfig::default()
                    .limit(settings.max_payload_bytes)
                    .error_handler(json_error_handler),
            )
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(register))
                            .route("/login", web::post().to(login)),
                    )
                    .service(
                        web::scope("/classes")
                            .wrap(JwtMiddleware::new(auth_keys.clone()))
                            .route("", web::post().to(create_class))
                            .route("", web::get().to(get_classes))
                            .route("/{id}", web::get().to(get_class))
                            .route("/{id}", web::delete().to(delete_class))
                            .route("/{id}/end", web::patch().to(end_class))
                            .route(
                                "/{id}/attendance-sheet",
                                web::get().to(export_attendance_sheet),
                            ),
                    )
                    .service(
                        web::scope("/attendance")
                            .route("", web::post().to(register_attendance))
                            .route("/class/{class_id}", web::get().to(get_class_attendance))
                            .service(
                                web::resource("/{id}")
                                    .wrap(JwtMiddleware::new(auth_keys.clone()))
                                    .route(web::delete().to(delete_attendance)),
                            ),
                    )
                    .service(
                        web::scope("/user")
                            .wrap(JwtMiddleware::new(auth_keys.clone()))
                            .route("/profile", web::get().to(get_profile))
                            .route("/profile", web::put().to(update_profile))
                            .route("/account", web::delete().to(delete_account)),
                    ),
            )
            .default_service(web::to(not_found))
            .app_data(db_pool.clone())
            .app_data(keys.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

/// The dashboard and check-in pages are served from their own origin.
fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600);
    if allowed_origins.is_empty() {
        return cors.allow_any_origin();
    }
    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
