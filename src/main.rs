use atmoterra::{Engine, Raster};
use std::path::PathBuf;
use std::time::Duration;
use terragen::{EngineConfig, GeoBounds};

const CONFIG_PATH: &str = "atmoterra.toml";
const FRAME_WIDTH: usize = 960;
const FRAME_HEIGHT: usize = 640;
const TICK: Duration = Duration::from_millis(33);
const FRAMES: u32 = 120;
/// Every Nth frame is written out as a PNG.
const SNAPSHOT_EVERY: u32 = 30;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match EngineConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => config,
        Err(err) => {
            log::info!("using default config ({CONFIG_PATH}: {err})");
            EngineConfig::default()
        }
    };

    // Central Europe demo box.
    let bounds = GeoBounds::new(47.0, 55.0, 6.0, 15.0)?;
    let mut engine = Engine::new(config, bounds)?;
    let mut raster = Raster::new(FRAME_WIDTH, FRAME_HEIGHT);

    let out_dir = PathBuf::from("frames");
    std::fs::create_dir_all(&out_dir)?;

    engine.start(Duration::ZERO);
    let mut now = Duration::ZERO;
    for frame in 0..FRAMES {
        engine.tick(now);
        engine.render_frame(&mut raster, now)?;
        if frame % SNAPSHOT_EVERY == 0 {
            let path = out_dir.join(format!("frame_{frame:04}.png"));
            raster.save_png(&path)?;
            log::info!("wrote {}", path.display());
        }
        now += TICK;
    }

    engine.dispose();
    log::info!(
        "rendered {FRAMES} frames, {} mutations, {} samples in working set",
        engine.mutation_count(),
        engine.samples().len()
    );
    Ok(())
}
