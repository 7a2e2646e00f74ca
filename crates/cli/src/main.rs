use clap::Parser;
use ferrous_zones_api::{AppState, MasterUseCases};
use ferrous_zones_domain::{CliOverrides, Config, NodeRole};
use ferrous_zones_jobs::{JobRunner, SlaveSyncJob, StaleSlaveJob};
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "ferrous-zones")]
#[command(version)]
#[command(about = "Ferrous Zones - authoritative DNS with master/slave zone replication")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Web server port
    #[arg(short = 'w', long)]
    web_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Database path
    #[arg(long)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Replication role (standalone, master, slave)
    #[arg(long)]
    role: Option<NodeRole>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        web_port: cli.web_port,
        bind_address: cli.bind,
        database_path: cli.database,
        log_level: cli.log_level,
        role: cli.role,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        role = %config.sync.role,
        "Starting Ferrous Zones"
    );

    let pool = bootstrap::init_database(&config.database).await?;
    let repos = di::Repositories::new(pool);
    let sync_token = bootstrap::seed_sync_token(&config, &repos).await?;

    let dns = di::DnsServices::new(&config, &repos)?;
    let use_cases = di::UseCases::new(&config, &repos, &dns, sync_token.as_deref())?;

    bootstrap::load_zones(&config, &use_cases, &dns.index).await;

    let shutdown = CancellationToken::new();
    start_jobs(&config, &use_cases, shutdown.clone()).await;

    let dns_addr = server::socket_addr(&config.server.bind_address, config.server.dns_port)?;
    let dns_handler = dns.handler.clone();
    let dns_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = server::start_dns_server(dns_addr, dns_handler, dns_shutdown).await {
            error!(error = %e, "DNS server error");
        }
    });

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        info!("Shutdown signal received");
        signal_token.cancel();
    });

    let app_state = AppState {
        role: config.sync.role,
        validate_token: use_cases.validate_token.clone(),
        master: MasterUseCases {
            register: use_cases.register_slave.clone(),
            heartbeat: use_cases.heartbeat.clone(),
            export: use_cases.export_zones.clone(),
        },
        slave_sync: use_cases.slave_sync.clone(),
    };

    let web_addr = server::socket_addr(&config.server.bind_address, config.server.web_port)?;
    let result = server::start_web_server(web_addr, app_state, shutdown.clone()).await;
    shutdown.cancel();

    info!("Server shutdown complete");
    result
}

async fn start_jobs(config: &Config, use_cases: &di::UseCases, shutdown: CancellationToken) {
    let sync = &config.sync;
    let mut runner = JobRunner::new().with_shutdown_token(shutdown);

    match sync.role {
        NodeRole::Slave => {
            if let Some(service) = &use_cases.slave_sync {
                runner = runner.with_slave_sync(
                    SlaveSyncJob::new(service.clone())
                        .with_interval(sync.sync_interval_secs)
                        .with_max_backoff(sync.max_backoff_secs)
                        .with_resync_policy(sync.resync_delay_ms, sync.max_forced_resyncs),
                );
            }
        }
        NodeRole::Master => {
            runner = runner.with_stale_slaves(
                StaleSlaveJob::new(use_cases.mark_stale.clone())
                    .with_interval(sync.stale_check_interval_secs),
            );
        }
        NodeRole::Standalone => {}
    }

    runner.start().await;
}
