use color_eyre::eyre::Result;
use tokio::net::TcpListener;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use warden::{
    ExposeSecret, HashMapUserDirectory, SecurityService, SecurityServiceSettings,
    TracingAuditLogger, UserDirectory, bootstrap, configure_postgresql,
};

/// Standalone security service: PostgreSQL when `database.url` is set,
/// otherwise an in-memory directory.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    // Load configuration
    let settings = SecurityServiceSettings::load()?;

    let listener = TcpListener::bind(settings.server.address.as_str()).await?;

    match &settings.database.url {
        Some(url) => {
            let directory = configure_postgresql(url.expose_secret()).await?;
            serve(directory, &settings, listener).await
        }
        None => {
            tracing::warn!("No database configured, users are kept in memory");
            serve(HashMapUserDirectory::new(), &settings, listener).await
        }
    }
}

async fn serve<D>(
    directory: D,
    settings: &SecurityServiceSettings,
    listener: TcpListener,
) -> Result<()>
where
    D: UserDirectory + Clone + 'static,
{
    bootstrap(
        &directory,
        &settings.default_role()?,
        settings.bootstrap_admin.as_ref(),
    )
    .await?;

    let service = SecurityService::new(directory, TracingAuditLogger::new(), settings)?;

    tracing::info!("Starting security service...");
    service
        .run_standalone(listener, settings.allowed_origins.clone())
        .await?;

    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
