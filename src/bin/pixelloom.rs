use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use pixelloom::NotificationSink as _;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer as _, filter::LevelFilter, layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

#[derive(Parser, Debug)]
#[command(
    name = "pixelloom",
    version,
    about = "Reproduce a raster image on a shared remote canvas, one cooldown-paced placement at a time."
)]
struct Cli {
    /// World x coordinate to start drawing the image from.
    x: i64,

    /// World y coordinate to start drawing the image from.
    y: i64,

    /// Image to draw.
    image: PathBuf,

    /// Skip the first N entries of the planned sequence (resume point;
    /// specific to each direction and method).
    #[arg(long, default_value_t = 0)]
    step: usize,

    /// Drawing direction.
    #[arg(long, value_enum, default_value_t = DirectionChoice::Horizontal)]
    direction: DirectionChoice,

    /// Drawing method.
    #[arg(long, value_enum, default_value_t = MethodChoice::Default)]
    method: MethodChoice,

    /// Canvas driver backend.
    #[arg(long, value_enum, default_value_t = DriverChoice::Sim)]
    driver: DriverChoice,

    /// Seconds of navigation overhead deducted from each reported cooldown.
    #[arg(long, default_value_t = 53)]
    cooldown_slack: u64,

    /// Reload the remote session after an interception is confirmed solved.
    #[arg(long)]
    refresh_on_resume: bool,

    /// Write the planned command sequence to this path as JSON.
    #[arg(long)]
    dump_plan: Option<PathBuf>,

    /// Also write debug-level logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionChoice {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodChoice {
    Default,
    Chessboard,
    Random,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DriverChoice {
    Sim,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let tuning = pixelloom::Tuning {
        latency_budget: Duration::from_secs(cli.cooldown_slack),
        refresh_on_resume: cli.refresh_on_resume,
        ..pixelloom::Tuning::default()
    };

    let image = pixelloom::RasterImage::open(&cli.image)?;
    let origin = pixelloom::WorldPos::new(cli.x, cli.y);
    let axis = match cli.direction {
        DirectionChoice::Horizontal => pixelloom::Axis::Horizontal,
        DirectionChoice::Vertical => pixelloom::Axis::Vertical,
    };
    let method = match cli.method {
        MethodChoice::Default => pixelloom::Method::Default,
        MethodChoice::Chessboard => pixelloom::Method::Chessboard,
        MethodChoice::Random => pixelloom::Method::Random,
    };

    let plan = pixelloom::planner::plan(&image, origin, axis, method, cli.step, &tuning);
    info!(commands = plan.len(), "plan ready");

    if let Some(path) = &cli.dump_plan {
        let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
        serde_json::to_writer_pretty(f, &plan).context("serialize plan")?;
        info!(path = %path.display(), "plan written");
    }

    let mut driver = make_driver(cli.driver, origin);
    let mut notifier = pixelloom::ConsoleNotifier;
    let mut gate = pixelloom::StdinGate;
    let summary = pixelloom::Scheduler::new(
        driver.as_mut(),
        &mut notifier,
        &mut gate,
        tuning,
        origin,
    )
    .run(&plan)?;

    info!(
        placed = summary.placed,
        skipped = summary.skipped,
        replayed = summary.replayed,
        interceptions = summary.interceptions,
        "run complete"
    );
    notifier.notify("work has done");
    Ok(())
}

fn make_driver(
    choice: DriverChoice,
    origin: pixelloom::WorldPos,
) -> Box<dyn pixelloom::CanvasDriver> {
    match choice {
        DriverChoice::Sim => Box::new(pixelloom::SimCanvas::new(origin)),
    }
}

fn init_tracing(log_file: Option<&std::path::Path>) -> anyhow::Result<()> {
    let console = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create log file '{}'", path.display()))?;
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::DEBUG);
            tracing_subscriber::registry()
                .with(console)
                .with(file_layer)
                .init();
        }
        None => tracing_subscriber::registry().with(console).init(),
    }
    Ok(())
}
