use anyhow::Context;
use replay_demo::ReplayLauncher;

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let report = ReplayLauncher::new()
        .with_settle_frames(2)
        .with_demo_gestures()
        .run()
        .context("demo replay did not finish")?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => log::info!(
                "{} completed on frame {}",
                outcome.label,
                outcome.completed_frame
            ),
            Err(error) => log::warn!("{} failed: {}", outcome.label, error),
        }
    }
    log::info!(
        "{} frames ({}ms simulated, {}ms wall): scroll {:?}, zoom {:.3}, taps {}",
        report.frames,
        report.simulated_nanos / 1_000_000,
        report.wall_millis,
        report.viewport.scroll,
        report.viewport.zoom,
        report.viewport.taps
    );

    if let Some(failed) = report.failures().next() {
        anyhow::bail!("gesture '{}' failed", failed.label);
    }
    Ok(())
}
