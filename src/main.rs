use std::{process, sync::Arc};

use prenota::{
    application::{
        catalog::CatalogService,
        error::AppError,
        images::ImageService,
        repos::{ImagesRepo, ProductsRepo, ReservationsRepo},
        reservations::ReservationService,
    },
    config,
    infra::{
        db::PostgresRepositories,
        directory::HttpProductDirectory,
        error::InfraError,
        http::{HttpState, build_router},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let repositories = init_repositories(&settings).await?;
    let state = build_http_state(repositories, &settings)?;

    serve_http(&settings, state).await
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_http_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<HttpState, AppError> {
    let reservations_repo: Arc<dyn ReservationsRepo> = repositories.clone();
    let images_repo: Arc<dyn ImagesRepo> = repositories.clone();
    let products_repo: Arc<dyn ProductsRepo> = repositories.clone();

    let directory = Arc::new(HttpProductDirectory::new(&settings.directory)?);

    Ok(HttpState {
        reservations: ReservationService::new(
            reservations_repo,
            directory,
            settings.directory.lookup_concurrency.get() as usize,
        ),
        images: ImageService::new(images_repo),
        catalog: CatalogService::new(products_repo, settings.catalog.page_size),
        db: repositories,
    })
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(addr = %settings.server.addr, "listening");

    let shutdown_grace = settings.server.graceful_shutdown;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(error = %err, "failed to listen for shutdown signal");
                return;
            }
            info!(grace_seconds = shutdown_grace.as_secs(), "shutting down");
        })
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
