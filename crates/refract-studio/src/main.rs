mod demo;
mod studio;

use refract_engine::device::GpuInit;
use refract_engine::logging::{LoggingConfig, init_logging};
use refract_engine::window::{Runtime, RuntimeConfig};
use refract_post::{ControlsConfig, PostConfig};

use crate::studio::Studio;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let post = PostConfig::default();
    let gpu_init = GpuInit {
        start_locked: post.lock_fps,
        ..GpuInit::default()
    };
    let config = RuntimeConfig {
        title: "refract".to_string(),
        ..RuntimeConfig::default()
    };

    log::info!("F1-F4 placement, 1-9/Y/U add effect, Backspace remove, 0 reset, P frame lock, L light orbit");

    let studio = Studio::new(post, ControlsConfig::default());
    if let Err(err) = Runtime::run(config, gpu_init, studio) {
        log::error!("{err:#}");
        return Err(err);
    }
    Ok(())
}
