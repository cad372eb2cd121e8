use color_eyre::Result;
use padbridge::controller::{GilrsSource, InputManager, InputSource, WpadChannel};
use padbridge::{BridgeConfig, Platform};
use std::path::PathBuf;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup()?;

    // Config loading logs through a temporary subscriber until the
    // configured level is known
    let config = tracing::subscriber::with_default(startup_subscriber(), load_config)?;
    setup_logging_env(config.log_level()?);
    info!("Starting padbridge with config: {:?}", config);

    let platform = Platform::boot(config)?.prepare()?;
    platform.enter_app_dir()?;

    for archive in &platform.config().required_archives {
        let path = platform.verify_archive(archive)?;
        info!("Found archive {}", path.display());
    }

    let source = GilrsSource::new()?;
    let mut manager = platform.input_manager(source)?;

    let shutdown = CancellationToken::new();
    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping frame loop");
                ctrl_c_token.cancel();
            }
            Err(e) => error!("Unable to listen for Ctrl-C: {}", e),
        }
    });

    let mut frames = tokio::time::interval(platform.config().frame_interval());
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(
        "Running frame loop at {} Hz",
        platform.config().frame_rate_hz
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = frames.tick() => {
                manager.update();
                log_edges(&manager);
            }
        }
    }

    info!("Frame loop stopped after {} frames", manager.frame());
    platform.exit();
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    Ok(())
}

// Optional path to a config file, otherwise the per-user default
fn load_config() -> Result<BridgeConfig> {
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => BridgeConfig::load_from(path)?,
        None => BridgeConfig::load()?,
    };
    config.validate()?;
    Ok(config)
}

fn startup_subscriber() -> FmtSubscriber {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish()
}

fn setup_logging_env(level: Level) {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

// Report this frame's presses and releases
fn log_edges<S: InputSource>(manager: &InputManager<S>) {
    if let Ok(status) = manager.vpad_status() {
        let buttons = &status.buttons;
        if !buttons.trigger.is_empty() {
            info!("Gamepad pressed: {:?}", buttons.trigger);
        }
        if !buttons.release.is_empty() {
            info!("Gamepad released: {:?}", buttons.release);
        }
        if status.tp_normal.touched {
            debug!(
                "Gamepad touch at ({}, {})",
                status.tp_normal.x, status.tp_normal.y
            );
        }
    }

    for channel in WpadChannel::ALL {
        if let Ok(status) = manager.kpad_status(channel) {
            if !status.pro.trigger.is_empty() {
                info!("Pro controller on {} pressed: {:?}", channel, status.pro.trigger);
            }
            if !status.pro.release.is_empty() {
                info!("Pro controller on {} released: {:?}", channel, status.pro.release);
            }
        }
    }
}
