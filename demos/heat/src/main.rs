use heat2d::d2::{Config, Simulation};
use serde::Serialize;
use std::fs::{create_dir_all, File};

#[derive(Serialize)]
struct RunInfo {
    dx: f64,
    dy: f64,
    diffusivity: f64,
    dt: f64,
    timesteps: usize,
}

fn main() -> anyhow::Result<()> {
    const DX: f64 = 0.005;
    const A: f64 = 0.5;
    const TIMESTEPS: usize = 256;

    let mut sim = Simulation::new(Config::new(DX, DX, A, TIMESTEPS))?;

    create_dir_all("out")?;
    serde_json::to_writer_pretty(
        File::create("out/config.json")?,
        &RunInfo {
            dx: DX,
            dy: DX,
            diffusivity: A,
            dt: sim.dt(),
            timesteps: TIMESTEPS,
        },
    )?;

    for m in 1..=TIMESTEPS {
        image_util::save_heatmap("heat", m, sim.field(), 1.0)?;
        sim.advance();

        eprint!("\r {} / {}", m, TIMESTEPS);
    }
    eprintln!();

    // One more frame for the finished field; the in-run frames show the
    // state each step started from.
    image_util::save_heatmap("heat", TIMESTEPS + 1, sim.field(), 1.0)?;

    Ok(())
}
