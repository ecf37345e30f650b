use std::{process, sync::Arc};

use tokio::signal;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;
use vetrina::{
    application::{
        blog::BlogService, error::AppError, og::OgImageService, pages::PageService,
        render::MarkdownRenderService, sitemap::SitemapService, syndication::SyndicationService,
    },
    config,
    infra::{content, http, telemetry},
};

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
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let source = content::build(&settings.content.backend);
    let markdown = Arc::new(MarkdownRenderService::new());

    let state = http::HttpState {
        blog: Arc::new(BlogService::new(source.clone(), markdown)),
        pages: Arc::new(PageService::new(
            source.clone(),
            settings.site.default_locale,
        )),
        sitemap: Arc::new(SitemapService::new(source.clone(), settings.site.clone())),
        syndication: Arc::new(SyndicationService::new(source, settings.site.clone())),
        og: Arc::new(OgImageService::new(settings.site.clone())),
        site: settings.site.clone(),
    };

    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::unexpected(format!("failed to bind listener: {err}")))?;

    info!(
        addr = %settings.server.public_addr,
        site_url = %settings.site.public_site_url,
        "serving"
    );

    let graceful = settings.server.graceful_shutdown;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal(graceful))
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

async fn shutdown_signal(graceful: std::time::Duration) {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!(timeout_secs = graceful.as_secs(), "shutdown signal received");
}
