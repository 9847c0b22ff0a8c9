use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use wlan_clientmode::config::{self, CliArgs, Config};
use wlan_clientmode::wifi::notifier::NotificationReceiver;
use wlan_clientmode::wifi::sim::{self, SimulatedDriver, Step};
use wlan_clientmode::wifi::{ClientModeController, ClientModeManager};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = CliArgs::parse();

    if cli.print_default_config {
        print!("{}", config::default_config_toml());
        return Ok(());
    }

    let config = config::load(&cli)?;
    let _guard = init_logging(&config)?;

    info!("wlan-clientmode starting");

    let (driver, radio) = SimulatedDriver::new(config.simulation.clone());
    let mut controller = ClientModeController::new(
        Box::new(driver),
        sim::tracing_collaborators(),
        config.features.clone(),
    );
    let mut notifications = controller.subscribe();
    let manager = controller.manager();
    let task = controller.spawn();

    for step in &cli.steps {
        sim::apply_step(*step, &manager, &radio)
            .wrap_err_with(|| format!("Step {:?} failed", step))?;

        // Wait for the step to settle so output follows step order
        let status = manager.query_status().await?;
        print_notifications(&mut notifications, cli.json)?;
        if *step == Step::Status {
            print_status(&manager, cli.json).await?;
        } else {
            info!("After {:?}: {}", step, status.state);
        }
    }

    print_status(&manager, cli.json).await?;

    manager.shutdown()?;
    task.await.wrap_err("Controller task panicked")?;
    print_notifications(&mut notifications, cli.json)?;

    info!("wlan-clientmode exiting");
    Ok(())
}

fn print_notifications(notifications: &mut NotificationReceiver, json: bool) -> Result<()> {
    while let Ok(notification) = notifications.try_recv() {
        if json {
            println!("{}", serde_json::to_string(&notification)?);
        } else {
            println!("{}", notification);
        }
    }
    Ok(())
}

async fn print_status(manager: &ClientModeManager, json: bool) -> Result<()> {
    let status = manager.query_status().await?;
    if json {
        println!("{}", serde_json::to_string(&status)?);
    } else {
        println!("{}", status);
    }
    Ok(())
}

/// Initialize tracing to stderr or the configured log file
fn init_logging(config: &Config) -> Result<WorkerGuard> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let (writer, guard) = match config.log_file() {
        Some(path) => {
            let file = std::fs::File::create(path)
                .wrap_err_with(|| format!("Failed to create log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(config.log_file().is_none())
        .init();

    Ok(guard)
}
