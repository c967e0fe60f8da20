//! The demo world: ground, a cube, a crate, a wall with three window
//! openings, a backdrop seen through them, and two lights with markers.

use glam::Vec3;

use refract_engine::camera::Camera;
use refract_engine::paint::Color;
use refract_engine::scene::{Light, MeshData, Model, Scene};

pub const CAMERA_POSITION: Vec3 = Vec3::new(25.0, 18.0, -45.0);

/// Radius and angular speed (rad/s) of the first light's orbit.
const ORBIT_RADIUS: f32 = 20.0;
const ORBIT_SPEED: f32 = 0.7;
const ORBIT_CENTRE: Vec3 = Vec3::new(20.0, 10.0, 20.0);

pub struct DemoWorld {
    pub scene: Scene,
    pub camera: Camera,
    /// Model index of each light's marker, parallel to `scene.lights`.
    pub markers: Vec<usize>,
}

pub fn build() -> DemoWorld {
    let mut scene = Scene::new();
    let cube = scene.add_mesh(MeshData::cube());
    let plane = scene.add_mesh(MeshData::plane(400.0));

    scene.add_model(Model::new(plane).coloured(Color::rgb(0.45, 0.5, 0.4)));

    scene.add_model(
        Model::new(cube)
            .at(Vec3::new(42.0, 5.0, -10.0))
            .rotated(Vec3::new(0.0, (-110f32).to_radians(), 0.0))
            .scaled(Vec3::splat(10.0 * 1.5))
            .coloured(Color::rgb(0.8, 0.8, 0.85)),
    );
    scene.add_model(
        Model::new(cube)
            .at(Vec3::new(-10.0, 6.0, 90.0))
            .rotated(Vec3::new(0.0, 40f32.to_radians(), 0.0))
            .scaled(Vec3::splat(2.0 * 6.0))
            .coloured(Color::rgb(0.6, 0.45, 0.25)),
    );

    let brick = Color::rgb(0.6, 0.3, 0.25);
    for (centre, size) in wall_pieces() {
        scene.add_model(Model::new(cube).at(centre).scaled(size).coloured(brick));
    }

    scene.add_model(
        Model::new(cube)
            .at(Vec3::new(75.0, 25.0, -150.0))
            .scaled(Vec3::new(150.0, 50.0, 2.0))
            .coloured(Color::rgb(0.3, 0.5, 0.7)),
    );

    let lights = [
        Light::new(Vec3::new(30.0, 10.0, 0.0), Color::rgb(0.8, 0.8, 1.0), 10.0),
        Light::new(Vec3::new(-70.0, 30.0, 100.0), Color::rgb(1.0, 0.8, 0.2), 40.0),
    ];
    let mut markers = Vec::with_capacity(lights.len());
    for light in lights {
        let marker = Model::new(cube)
            .at(light.position)
            .scaled(Vec3::splat(light.strength * 0.2))
            .coloured(light.colour)
            .emissive();
        markers.push(scene.add_model(marker));
        scene.add_light(light);
    }

    let camera = Camera::new(
        CAMERA_POSITION,
        Vec3::new(10f32.to_radians(), 7f32.to_radians(), 0.0),
    );

    DemoWorld { scene, camera, markers }
}

/// Boxes (centre, size) forming a wall with openings x 22..33, 36..49 and
/// 50..63, y 5..25, front face on z = -50.
fn wall_pieces() -> Vec<(Vec3, Vec3)> {
    let depth = 2.0;
    let z = -50.0 - depth * 0.5;
    let piece = |x0: f32, x1: f32, y0: f32, y1: f32| {
        (
            Vec3::new((x0 + x1) * 0.5, (y0 + y1) * 0.5, z),
            Vec3::new(x1 - x0, y1 - y0, depth),
        )
    };

    vec![
        piece(15.0, 70.0, 0.0, 5.0),
        piece(15.0, 70.0, 25.0, 35.0),
        piece(15.0, 22.0, 5.0, 25.0),
        piece(33.0, 36.0, 5.0, 25.0),
        piece(49.0, 50.0, 5.0, 25.0),
        piece(63.0, 70.0, 5.0, 25.0),
    ]
}

/// Circles the first light around `ORBIT_CENTRE` while running.
#[derive(Debug, Clone)]
pub struct LightOrbit {
    angle: f32,
    pub running: bool,
}

impl Default for LightOrbit {
    fn default() -> Self {
        Self {
            angle: 0.0,
            running: true,
        }
    }
}

impl LightOrbit {
    /// Position for the current angle, then steps the angle if running.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        let position = ORBIT_CENTRE
            + Vec3::new(self.angle.cos() * ORBIT_RADIUS, 0.0, self.angle.sin() * ORBIT_RADIUS);
        if self.running {
            self.angle -= ORBIT_SPEED * dt;
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_has_lights_and_markers() {
        let world = build();
        assert_eq!(world.scene.lights.len(), 2);
        assert_eq!(world.markers.len(), 2);
        for (light, &m) in world.scene.lights.iter().zip(&world.markers) {
            assert!(world.scene.models[m].emissive);
            assert_eq!(world.scene.models[m].position, light.position);
        }
    }

    #[test]
    fn wall_leaves_the_openings_clear() {
        let inside = [Vec3::new(27.5, 15.0, -50.5), Vec3::new(42.5, 15.0, -50.5), Vec3::new(56.5, 15.0, -50.5)];
        for (centre, size) in wall_pieces() {
            let min = centre - size * 0.5;
            let max = centre + size * 0.5;
            for p in inside {
                let hit = p.cmpgt(min).all() && p.cmplt(max).all();
                assert!(!hit, "{p} inside wall piece at {centre}");
            }
        }
    }

    #[test]
    fn orbit_starts_on_the_circle_and_pauses() {
        let mut orbit = LightOrbit::default();
        assert_eq!(orbit.advance(1.0), Vec3::new(40.0, 10.0, 20.0));

        orbit.running = false;
        let a = orbit.advance(1.0);
        let b = orbit.advance(1.0);
        assert_eq!(a, b);
        assert!(((a - ORBIT_CENTRE).length() - ORBIT_RADIUS).abs() < 1e-4);
    }
}
