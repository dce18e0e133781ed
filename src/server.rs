//! Server runtime
//!
//! [`ServerHandle`] owns the whole process lifecycle: metrics recorder,
//! database and migrations, booking services, REST API, the optional
//! completion sweeper and graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::{start_completion_sweeper, BookingServices};
use crate::auth::JwtConfig;
use crate::config::AppConfig;
use crate::domain::{RepositoryProvider, SystemClock};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::database::{init_database, DatabaseConfig};
use crate::interfaces::http::create_api_router;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

/// Handle to a running booking service.
///
/// ```rust,no_run
/// use chargeslot::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().notified().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub services: BookingServices,
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Port actually bound (differs from the config when it asked for 0)
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
    sweeper_task: Option<JoinHandle<()>>,
}

/// The global recorder can only be installed once per process; a restart
/// within the same process reuses it.
fn prometheus_handle() -> Result<PrometheusHandle, BuildError> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting ChargeSlot booking service...");

        let prometheus_handle = prometheus_handle()?;

        if app_cfg.uses_default_secret() {
            warn!("security.jwt_secret is the built-in default; set a real secret before exposing the API");
        }
        let jwt_config = JwtConfig::from(&app_cfg.security);

        // ── Database ───────────────────────────────────────────
        let db = init_database(&DatabaseConfig::from(&app_cfg.database)).await?;
        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Repositories & services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let services = BookingServices::new(repos.clone(), &app_cfg.booking, Arc::new(SystemClock))?;
        info!(
            slot_minutes = app_cfg.booking.slot_minutes,
            admission_days = app_cfg.booking.admission_days,
            auto_confirm = app_cfg.booking.auto_confirm,
            "Booking services ready"
        );

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── Background tasks ───────────────────────────────────
        let sweeper_task = (app_cfg.booking.completion_sweep_secs > 0).then(|| {
            start_completion_sweeper(
                services.lifecycle.clone(),
                services.clock.clone(),
                shutdown_signal.clone(),
                app_cfg.booking.completion_sweep_secs,
            )
        });

        // ── REST API ───────────────────────────────────────────
        let api_router = create_api_router(
            services.clone(),
            db.clone(),
            jwt_config,
            prometheus_handle,
        );

        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.notified().wait().await;
            info!("REST API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            services,
            repos,
            config: app_cfg,
            api_port: local_addr.port(),
            db,
            shutdown,
            api_task,
            sweeper_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install SIGTERM / Ctrl+C listeners that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for shutdown to be triggered, drain tasks within the configured
    /// timeout, then close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            sweeper_task,
            ..
        } = self;

        let drained = shutdown
            .shutdown_with_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!("REST API task panicked: {}", e);
                }
                if let Some(task) = sweeper_task {
                    if let Err(e) = task.await {
                        error!("Completion sweeper panicked: {}", e);
                    }
                }
            })
            .await;
        if !drained {
            warn!("Closing the database with tasks still running");
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }
        info!("ChargeSlot shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing from the config. `RUST_LOG` overrides
/// `logging.level`. Call once, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
