//! Scripted sessions driven at a paused refresh clock

use rust_qr_live::replay::ReplayScript;
use rust_qr_live::scan::{FrameTicker, RenderDirective, ScanError, ScanLoop, SourceError, drive};
use rust_qr_live::{ConfirmMode, DecoderChain, ScanConfig, ScanState};
use std::cell::Cell;
use std::rc::Rc;

const SESSION: &str = r#"
    fps = 30

    [[tick]]
    payload = "https://example.com"
    repeat = 3

    [[tick]]
    repeat = 2

    [[tick]]
    payload = "tel:+15550100"
    corners = [[300.0, 220.0], [340.0, 220.0], [340.0, 260.0], [300.0, 260.0]]
    repeat = 2
"#;

fn build(script: ReplayScript, config: &ScanConfig) -> (ScanLoop, Rc<FrameTicker>) {
    let (source, decoder) = script.into_parts().unwrap();
    let ticker = Rc::new(FrameTicker::new());
    let scan = ScanLoop::new(source, DecoderChain::new().with_strategy(decoder), ticker.clone())
        .with_config(config);
    (scan, ticker)
}

#[tokio::test(start_paused = true)]
async fn test_replay_auto_mode() {
    let script = ReplayScript::from_toml(SESSION).unwrap();
    let total = script.frame_count();
    let config = ScanConfig::default();
    let (mut scan, ticker) = build(script.clone(), &config);
    scan.activate().unwrap();

    let index = Rc::new(Cell::new(0usize));
    let clock_index = index.clone();
    let mut renders = Vec::new();
    let summary = drive(
        &mut scan,
        &ticker,
        config.tick_period(),
        || script.timestamp_ms(clock_index.get()),
        |scan, report| {
            renders.push(report.render);
            index.set(index.get() + 1);
            if index.get() == total {
                scan.deactivate();
            }
        },
    )
    .await;

    assert_eq!(summary.ticks, 7);
    assert_eq!(summary.tracked_ticks, 5);
    assert_eq!(summary.dispatches, 2);
    assert_eq!(summary.confirmations, 0);
    assert_eq!(summary.discarded, 0);
    assert!(matches!(renders[3], RenderDirective::DrawIdleIndicator));
    assert_eq!(*scan.state(), ScanState::Inactive);
}

#[tokio::test(start_paused = true)]
async fn test_replay_manual_mode_with_accept() {
    let script = ReplayScript::from_toml(SESSION).unwrap();
    let total = script.frame_count();
    let config = ScanConfig::from_toml("[scan]\nmode = \"manual\"").unwrap();
    let (mut scan, ticker) = build(script, &config);
    assert_eq!(scan.mode(), ConfirmMode::Manual);
    scan.activate().unwrap();

    let mut seen = 0;
    let mut accepted = Vec::new();
    let mut locked_ticks = 0;
    let mut now = 0;
    let summary = drive(
        &mut scan,
        &ticker,
        config.tick_period(),
        || {
            now += 33;
            now
        },
        |scan, report| {
            seen += 1;
            if report.confirmation.is_some() {
                locked_ticks += 1;
            }
            // Hold the first lock for one extra tick, then accept
            if seen == 2 {
                accepted.push(scan.accept().unwrap().payload);
            }
            if seen == total {
                scan.deactivate();
            }
        },
    )
    .await;

    // Tick 0 locks, tick 2 locks again after the accept reset dedup; the
    // second lock is never resolved so the tel: code raises nothing new.
    assert_eq!(summary.confirmations, 2);
    assert_eq!(summary.dispatches, 0);
    assert_eq!(summary.tracked_ticks, 5);
    assert_eq!(locked_ticks, 7);
    assert_eq!(accepted, vec!["https://example.com"]);
    assert_eq!(*scan.state(), ScanState::Inactive);
}

#[tokio::test]
async fn test_replay_source_refuses_to_open() {
    let script = ReplayScript::from_toml("fail_open = \"permission_denied\"").unwrap();
    let (mut scan, ticker) = build(script, &ScanConfig::default());

    assert_eq!(
        scan.activate(),
        Err(ScanError::Source(SourceError::PermissionDenied))
    );
    assert!(matches!(scan.state(), ScanState::Errored(_)));
    assert!(!ticker.has_pending());
}

#[tokio::test(start_paused = true)]
async fn test_replay_with_image_frames() {
    let dir = std::env::temp_dir().join(format!("rust_qr_live_replay_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    image::GrayImage::from_pixel(640, 480, image::Luma([200u8]))
        .save(dir.join("frame.png"))
        .unwrap();
    let script_path = dir.join("session.toml");
    std::fs::write(
        &script_path,
        "[[tick]]\npayload = \"hello\"\nimage = \"frame.png\"\nrepeat = 2\n",
    )
    .unwrap();

    let script = ReplayScript::load(&script_path).unwrap();
    let config = ScanConfig::default();
    let (mut scan, ticker) = build(script, &config);
    scan.activate().unwrap();

    let mut ticks = 0;
    let summary = drive(&mut scan, &ticker, config.tick_period(), || 0, |scan, _| {
        ticks += 1;
        if ticks == 2 {
            scan.deactivate();
        }
    })
    .await;

    assert_eq!(summary.tracked_ticks, 2);
    assert_eq!(summary.dispatches, 1);
    std::fs::remove_dir_all(&dir).ok();
}
