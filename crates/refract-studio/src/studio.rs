use refract_engine::camera::Camera;
use refract_engine::core::{App, AppControl, FrameCtx};
use refract_engine::input::Key;
use refract_engine::scene::Scene;
use refract_engine::time::FpsCounter;
use refract_post::{
    ChainControls, ControlsConfig, FrameConductor, FrameInputs, PostConfig, PostRenderer, WgpuPostDevice,
};

use crate::demo::{self, LightOrbit};

const FPS_WINDOW: f32 = 0.5;

pub struct Studio {
    scene: Scene,
    camera: Camera,
    markers: Vec<usize>,
    orbit: LightOrbit,

    config: PostConfig,
    conductor: FrameConductor,
    controls: ChainControls,
    /// Created on the first frame, once a device exists.
    post: Option<PostRenderer>,

    fps: FpsCounter,
}

impl Studio {
    pub fn new(config: PostConfig, controls: ControlsConfig) -> Self {
        let world = demo::build();
        Self {
            scene: world.scene,
            camera: world.camera,
            markers: world.markers,
            orbit: LightOrbit::default(),
            conductor: FrameConductor::new(config.clone()),
            config,
            controls: ChainControls::new(controls),
            post: None,
            fps: FpsCounter::new(FPS_WINDOW),
        }
    }

    fn update_lights(&mut self, dt: f32) {
        let position = self.orbit.advance(dt);
        if let Some(light) = self.scene.lights.first_mut() {
            light.position = position;
        }
        if let Some(model) = self.markers.first().and_then(|&i| self.scene.models.get_mut(i)) {
            model.position = position;
        }
    }

    fn title(&self, suffix: &str) -> String {
        format!(
            "refract - {} mode, {} effects - {}",
            self.conductor.selected_mode(),
            self.conductor.chain().len(),
            suffix
        )
    }
}

impl App for Studio {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> anyhow::Result<AppControl> {
        let dt = ctx.time.dt;

        if ctx.input_frame.key_hit(Key::Escape) {
            return Ok(AppControl::Exit);
        }

        for command in self.controls.commands(ctx.input_frame) {
            self.conductor.apply(command);
        }
        if ctx.input_frame.key_hit(Key::L) {
            self.orbit.running = !self.orbit.running;
        }

        let viewport = ctx.window.viewport();
        self.camera.set_viewport(viewport);
        self.conductor.set_viewport(viewport);

        self.update_lights(dt);
        self.camera.control(dt, ctx.input);
        self.conductor.update(dt);

        if let Some(report) = self.fps.record(dt) {
            ctx.window.set_title(&self.title(&report.title_suffix()));
        }

        ctx.gpu.set_frame_locked(self.conductor.lock_fps());

        let inputs = FrameInputs {
            area_anchor: self.scene.lights.first().map_or(demo::CAMERA_POSITION, |l| l.position),
            area_size: self.config.area_size,
            polygon: None,
        };

        let Self {
            scene,
            camera,
            config,
            conductor,
            post,
            ..
        } = self;

        ctx.render(|rctx, target| {
            if post.is_none() {
                *post = Some(PostRenderer::new(rctx, config)?);
            }
            let Some(renderer) = post.as_mut() else { return Ok(()) };

            let mut device = WgpuPostDevice::new();
            let stats = conductor.render(&mut device, &*camera, &inputs);
            log::trace!("{stats:?}");

            renderer.encode(rctx, target, &device, scene, camera)
        })
    }
}
