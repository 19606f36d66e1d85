//! Camera Overlay CLI
//!
//! Runs one capture session against the mock camera and orientation
//! services with a headless host screen. Useful for exercising the
//! session lifecycle and failure policies without a device.

use camera_overlay::{
    geometry::{Orientation, Platform},
    hardware::{MockCamera, MockOrientation},
    metrics::MetricsSnapshot,
    overlay::{
        ElementKind, HostScreen, OverlayAction, OverlayManager, SharedStyle, SharedSurface,
        OVERFLOW_Y,
    },
    session::{FileConfig, SessionController, SessionError},
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tokio::sync::{mpsc::UnboundedSender, watch};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlatformArg {
    Android,
    Ios,
    Other,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Android => Platform::Android,
            PlatformArg::Ios => Platform::Ios,
            PlatformArg::Other => Platform::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

/// What the simulated user does once the overlay is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UserAction {
    /// Press the shutter (again after each failed capture).
    Shutter,
    /// Press the back button.
    Cancel,
    /// Do nothing; Ctrl-C presses back.
    Wait,
}

/// Run a simulated camera capture session.
#[derive(Debug, Parser)]
#[command(name = "camera-overlay", version, about)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Platform family (defaults to the config, then the build target).
    #[arg(long, value_enum)]
    platform: Option<PlatformArg>,

    /// Orientation the device is held in.
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Simulated user action.
    #[arg(long, value_enum, default_value_t = UserAction::Shutter)]
    action: UserAction,

    /// Make the camera refuse to start.
    #[arg(long)]
    fail_start: bool,

    /// Number of captures that fail before one succeeds.
    #[arg(long, default_value_t = 0)]
    fail_captures: u32,

    /// Make the orientation lock fail.
    #[arg(long)]
    fail_lock: bool,

    /// Metrics server port (overrides the config; 0 disables).
    #[arg(long)]
    metrics_port: Option<u16>,
}

/// Routes Ctrl-C to the overlay's back button.
fn install_interrupt_handler(cancel: UnboundedSender<OverlayAction>) -> watch::Receiver<bool> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = cancel.send(OverlayAction::Cancel);
        let _ = shutdown_tx.send(true);
    }) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }
    shutdown_rx
}

#[cfg(feature = "metrics")]
fn spawn_metrics_server(
    port: u16,
) -> Option<std::sync::Arc<tokio::sync::RwLock<camera_overlay::metrics::MetricsState>>> {
    use camera_overlay::metrics::{MetricsRegistry, MetricsServer, MetricsServerConfig};

    if port == 0 {
        return None;
    }
    let registry = match MetricsRegistry::new() {
        Ok(registry) => registry,
        Err(e) => {
            warn!("Failed to create metrics registry: {}", e);
            return None;
        }
    };
    let server = MetricsServer::new(MetricsServerConfig::with_port(port), registry);
    let state = server.state();
    tokio::spawn(async move {
        if let Err(e) = server.run().await {
            warn!("Metrics server stopped: {}", e);
        }
    });
    Some(state)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Camera Overlay v{}", camera_overlay::VERSION);
    info!("This is a demonstration using mock camera input");

    let mut config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    if let Some(platform) = args.platform {
        config.device.platform = Some(platform.into());
    }
    if let Some(orientation) = args.orientation {
        config.device.portrait = orientation == OrientationArg::Portrait;
    }
    let metrics_port = args.metrics_port.unwrap_or(config.metrics.port);

    // Initialize components
    let mut camera = MockCamera::new().fail_captures(args.fail_captures);
    if args.fail_start {
        camera = camera.fail_start("camera permission denied");
    }
    let mut orientation = MockOrientation::new(config.device.initial_orientation());
    if args.fail_lock {
        orientation = orientation.fail_lock("orientation lock not supported");
    }

    let surface = SharedSurface::new();
    let root = SharedStyle::new();
    let scroll = SharedStyle::with(OVERFLOW_Y, "scroll");
    let overlay = OverlayManager::new(surface.clone(), HostScreen::new(root, scroll));

    let mut controller = SessionController::new(
        camera,
        orientation,
        overlay,
        config.device.profile(),
        config.session.clone(),
    );

    let shutdown = install_interrupt_handler(controller.action_sender());

    #[cfg(feature = "metrics")]
    let metrics_state = spawn_metrics_server(metrics_port);
    #[cfg(not(feature = "metrics"))]
    if metrics_port != 0 {
        warn!("Built without the `metrics` feature; ignoring metrics port {}", metrics_port);
    }

    let channel = controller.start().await;

    if controller.is_running() {
        info!(
            orientation = %controller.session_orientation().unwrap_or(Orientation::Portrait),
            elements = ?surface.classes(),
            "Overlay mounted"
        );
        match args.action {
            UserAction::Shutter => {
                for _ in 0..=args.fail_captures {
                    surface.activate(ElementKind::Shutter);
                }
            }
            UserAction::Cancel => {
                surface.activate(ElementKind::Back);
            }
            UserAction::Wait => info!("Press Ctrl-C to dismiss the overlay"),
        }
        controller.run_until_idle().await;
    }

    let snapshot = MetricsSnapshot::from_controller(&controller);
    info!(
        captures = snapshot.captures,
        capture_failures = snapshot.capture_failures,
        lock_failures = snapshot.lock_failures,
        "Session finished in state {}",
        controller.state()
    );

    let outcome = channel.recv().await;

    #[cfg(feature = "metrics")]
    if let Some(state) = metrics_state {
        state.write().await.update(snapshot);
        info!("Serving metrics on port {}; press Ctrl-C to exit", metrics_port);
        let mut shutdown = shutdown;
        while !*shutdown.borrow() {
            if shutdown.changed().await.is_err() {
                break;
            }
        }
    }
    #[cfg(not(feature = "metrics"))]
    drop(shutdown);

    match outcome {
        Ok(image) => {
            info!(
                bytes = image.len(),
                captured_at = %image.captured_at(),
                "Picture received"
            );
            println!("{}", image.data_url("image/png"));
        }
        Err(SessionError::Cancelled) => {
            info!("Session cancelled, no picture taken");
        }
        Err(e) => {
            eprintln!("Camera session failed: {}", e);
            std::process::exit(1);
        }
    }
}
