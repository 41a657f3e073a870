//! The tick loop that stands in for a windowed host.

use crate::render::render_frame;
use anyhow::Result;
use lifegrid_core::HostConfig;
use lifegrid_world::{InputFrame, Model};
use std::io::Write;
use tracing::{debug, info, instrument};

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub frames: u64,
    pub paused_ticks: u64,
    pub status: String,
}

/// Drive `model` for `config.ticks` frames: feed input, tick, and render
/// every `config.render_every` ticks into `out`.
///
/// The pause button is held for exactly the frames listed in
/// `config.pause_at`, so consecutive entries count as one press.
#[instrument(skip_all, fields(model = %model.kind(), ticks = config.ticks))]
pub fn run<W: Write>(model: &mut dyn Model, config: &HostConfig, out: &mut W) -> Result<RunSummary> {
    let mut summary = RunSummary {
        ticks: 0,
        frames: 0,
        paused_ticks: 0,
        status: String::new(),
    };

    let (width, height) = model.dimensions();
    info!(width, height, "Starting run for {} ticks", config.ticks);

    for tick in 0..config.ticks {
        let input = InputFrame {
            pause_pressed: config.pause_at.contains(&tick),
            ..Default::default()
        };
        model.handle_input(&input);

        if model.is_paused() {
            summary.paused_ticks += 1;
        }
        model.tick();
        summary.ticks += 1;

        if config.render_every > 0 && (tick + 1) % config.render_every == 0 {
            writeln!(out, "-- tick {} --", tick + 1)?;
            out.write_all(render_frame(model).as_bytes())?;
            summary.frames += 1;
        }

        if tick % 100 == 0 {
            debug!(tick, status = %model.status(), "Progress");
        }
    }
    out.flush()?;

    summary.status = model.status();
    info!(
        event = "run_complete",
        ticks = summary.ticks,
        frames = summary.frames,
        paused_ticks = summary.paused_ticks,
        status = %summary.status,
        "Run complete"
    );

    Ok(summary)
}
