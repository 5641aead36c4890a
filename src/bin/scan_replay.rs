use clap::Parser;
use rust_qr_live::ConfirmMode;
use rust_qr_live::config::ScanConfig;
use rust_qr_live::decoder::{DecoderChain, RqrrDecoder, SoftwareStrategy};
use rust_qr_live::replay::ReplayScript;
use rust_qr_live::scan::{
    FeedbackCue, FeedbackSink, FrameTicker, LoggingDispatcher, RenderDirective, ScanEvent,
    ScanLoop, drive,
};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "scan_replay", version, about = "Replay a scripted camera session through the scan loop")]
struct Cli {
    /// Replay script (TOML)
    #[arg(long)]
    script: PathBuf,
    /// Scanner configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Pace ticks at the configured refresh rate instead of as fast as possible
    #[arg(long)]
    realtime: bool,
    /// Accept manual confirmations automatically
    #[arg(long)]
    auto_accept: bool,
    /// Decode image frames with rqrr when the script names no payload
    #[arg(long)]
    decode_images: bool,
}

/// Prints feedback cues instead of vibrating
struct ConsoleFeedback;

impl FeedbackSink for ConsoleFeedback {
    fn emit(&mut self, cue: &FeedbackCue) {
        println!("  * feedback: haptic={}ms tone={:?}", cue.haptic_ms, cue.tone);
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match ScanConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config from {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => ScanConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.parse().unwrap_or_default()),
        )
        .init();

    let script = match ReplayScript::load(&cli.script) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to load replay script");
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to start runtime");
            std::process::exit(1);
        }
    };

    let code = runtime.block_on(replay(cli, config, script));
    std::process::exit(code);
}

async fn replay(cli: Cli, config: ScanConfig, script: ReplayScript) -> i32 {
    let total = script.frame_count();
    let fps = script.fps;
    let timestamps: Vec<u64> = (0..total).map(|i| script.timestamp_ms(i)).collect();

    let (source, decoder) = match script.into_parts() {
        Ok(parts) => parts,
        Err(e) => {
            error!(error = %e, "invalid replay script");
            return 1;
        }
    };

    let mut decoders = DecoderChain::new().with_strategy(decoder);
    if cli.decode_images {
        decoders = decoders.with_strategy(SoftwareStrategy::new(RqrrDecoder::new()));
    }

    let ticker = Rc::new(FrameTicker::new());
    let mut scan = ScanLoop::new(source, decoders, ticker.clone())
        .with_config(&config)
        .with_dispatcher(LoggingDispatcher::new())
        .with_feedback(ConsoleFeedback);

    info!(
        script = %cli.script.display(),
        frames = total,
        fps,
        mode = ?config.scan.mode,
        "starting replay"
    );

    if let Err(e) = scan.activate() {
        println!("Scanner error: {e}");
        return 2;
    }

    let period = if cli.realtime {
        config.tick_period()
    } else {
        Duration::from_micros(1)
    };

    let index = Rc::new(Cell::new(0usize));
    let clock_index = index.clone();
    let clock = move || {
        let i = clock_index.get();
        timestamps.get(i).copied().unwrap_or_else(|| timestamps.last().copied().unwrap_or(0))
    };

    let auto_accept = cli.auto_accept;
    let summary = drive(&mut scan, &ticker, period, clock, |scan, report| {
        let i = index.get();
        match report.render {
            RenderDirective::DrawTrackedCorners(c) => println!(
                "tick {i:>4}: track ({:.1},{:.1}) ({:.1},{:.1}) ({:.1},{:.1}) ({:.1},{:.1})",
                c[0].x, c[0].y, c[1].x, c[1].y, c[2].x, c[2].y, c[3].x, c[3].y
            ),
            RenderDirective::DrawIdleIndicator => println!("tick {i:>4}: idle"),
        }
        match &report.event {
            Some(ScanEvent::Dispatched { payload, kind }) => {
                println!("  -> dispatched {kind}: {payload}")
            }
            Some(ScanEvent::AwaitingConfirmation(c)) => {
                println!("  ?? confirm {}: {}", c.kind, c.payload);
                if auto_accept && scan.mode() == ConfirmMode::Manual {
                    if let Ok(accepted) = scan.accept() {
                        println!("  -> accepted {}", accepted.kind);
                    }
                }
            }
            None => {}
        }

        index.set(i + 1);
        if i + 1 >= total {
            scan.deactivate();
        }
    })
    .await;

    println!(
        "Replayed {} ticks: {} tracked, {} dispatched, {} confirmations",
        summary.ticks, summary.tracked_ticks, summary.dispatches, summary.confirmations
    );
    0
}
