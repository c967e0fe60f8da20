//! Screen-space placement of effect draws.

use glam::{Mat4, Vec2, Vec3, Vec4};
use thiserror::Error;

use refract_engine::camera::CameraView;
use refract_engine::coords::{Rect, Viewport};

use crate::device::Geometry;
use crate::effect::PlacementMode;
use crate::settings::PostSettings;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlacementError {
    #[error("window opening {index} out of range ({count} openings)")]
    WindowOutOfRange { index: usize, count: usize },

    #[error("viewport {width}x{height} cannot be placed into")]
    InvalidViewport { width: f32, height: f32 },
}

/// Four-corner openings in the wall, in world space.
///
/// Corners are ordered top-left, bottom-left, top-right, bottom-right so
/// they form a triangle strip.
#[derive(Debug, Clone)]
pub struct WindowOpenings {
    openings: Vec<[Vec3; 4]>,
}

impl Default for WindowOpenings {
    fn default() -> Self {
        let opening = |left: f32, right: f32| {
            [
                Vec3::new(left, 25.0, -50.0),
                Vec3::new(left, 5.0, -50.0),
                Vec3::new(right, 25.0, -50.0),
                Vec3::new(right, 5.0, -50.0),
            ]
        };
        Self::new(vec![opening(22.0, 33.0), opening(36.0, 49.0), opening(50.0, 63.0)])
    }
}

impl WindowOpenings {
    pub fn new(openings: Vec<[Vec3; 4]>) -> Self {
        Self { openings }
    }

    pub fn get(&self, index: usize) -> Result<&[Vec3; 4], PlacementError> {
        self.openings.get(index).ok_or(PlacementError::WindowOutOfRange {
            index,
            count: self.openings.len(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.openings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.openings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Vec3; 4]> {
        self.openings.iter()
    }
}

/// What to place; one per effect invocation.
#[derive(Debug, Copy, Clone)]
pub enum PlacementRequest<'a> {
    Fullscreen,
    Area { anchor: Vec3, size: Vec2 },
    Polygon { points: &'a [Vec3; 4], world: Mat4 },
    WindowPolygon { index: usize },
}

impl PlacementRequest<'_> {
    pub fn mode(&self) -> PlacementMode {
        match self {
            PlacementRequest::Fullscreen => PlacementMode::Fullscreen,
            PlacementRequest::Area { .. } => PlacementMode::Area,
            PlacementRequest::Polygon { .. } => PlacementMode::Polygon,
            PlacementRequest::WindowPolygon { .. } => PlacementMode::WindowPolygon,
        }
    }
}

/// Resolved placement of one draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PlacementGeometry {
    /// Normalized `[0, 1]` rectangle at a single depth.
    Quad { rect: Rect, depth: f32 },
    /// Clip-space corners (not divided by w).
    Polygon { points: [Vec4; 4] },
}

impl PlacementGeometry {
    pub fn geometry(&self) -> Geometry {
        match self {
            PlacementGeometry::Quad { .. } => Geometry::Quad,
            PlacementGeometry::Polygon { .. } => Geometry::Polygon,
        }
    }

    /// Overwrites the whole placement block of `settings`.
    pub fn write(&self, settings: &mut PostSettings) {
        match *self {
            PlacementGeometry::Quad { rect, depth } => settings.set_quad(rect, depth),
            PlacementGeometry::Polygon { points } => settings.set_polygon(points),
        }
    }
}

/// Turns placement requests into screen-space geometry and writes it into
/// the settings payload.
#[derive(Debug, Clone)]
pub struct PlacementResolver {
    openings: WindowOpenings,
    viewport: Viewport,
}

impl PlacementResolver {
    pub fn new(openings: WindowOpenings) -> Self {
        Self {
            openings,
            viewport: Viewport::new(1.0, 1.0),
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn openings(&self) -> &WindowOpenings {
        &self.openings
    }

    /// Resolves `request` and writes the result into `settings`.
    ///
    /// `Ok(None)` means the draw is culled (area anchor not in front of the
    /// near plane); `settings` is left untouched in that case.
    pub fn resolve(
        &self,
        request: PlacementRequest<'_>,
        camera: &dyn CameraView,
        settings: &mut PostSettings,
    ) -> Result<Option<PlacementGeometry>, PlacementError> {
        let geometry = match request {
            PlacementRequest::Fullscreen => Some(PlacementGeometry::Quad {
                rect: Rect::UNIT,
                depth: 0.0,
            }),
            PlacementRequest::Area { anchor, size } => self.resolve_area(anchor, size, camera)?,
            PlacementRequest::Polygon { points, world } => {
                Some(project_polygon(points, world, camera))
            }
            PlacementRequest::WindowPolygon { index } => {
                let points = self.openings.get(index)?;
                Some(project_polygon(points, Mat4::IDENTITY, camera))
            }
        };

        if let Some(g) = &geometry {
            g.write(settings);
            settings.set_edge_fade(request.mode() == PlacementMode::Area);
        }
        Ok(geometry)
    }

    fn resolve_area(
        &self,
        anchor: Vec3,
        size: Vec2,
        camera: &dyn CameraView,
    ) -> Result<Option<PlacementGeometry>, PlacementError> {
        let viewport = self.viewport;
        if !viewport.is_valid() {
            return Err(PlacementError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let projected = camera.project_to_screen(anchor, viewport);
        let distance = projected.z;

        let near = camera.near_clip();
        let far = camera.far_clip();
        if distance <= near {
            return Ok(None);
        }

        let centre = viewport.normalize(projected.truncate());
        let per_pixel = camera.world_units_per_pixel(distance, viewport);
        let extent = viewport.normalize(size / per_pixel);

        let depth = far * (distance - near) / (far - near) / distance;

        Ok(Some(PlacementGeometry::Quad {
            rect: Rect::from_centre_size(centre, extent),
            depth,
        }))
    }
}

fn project_polygon(points: &[Vec3; 4], world: Mat4, camera: &dyn CameraView) -> PlacementGeometry {
    let view_proj = camera.view_projection() * world;
    let corners = *points;
    PlacementGeometry::Polygon {
        points: corners.map(|p| view_proj * p.extend(1.0)),
    }
}

#[cfg(test)]
mod tests {
    use refract_engine::camera::Camera;

    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    fn setup() -> (PlacementResolver, Camera) {
        let viewport = Viewport::new(800.0, 600.0);
        let mut resolver = PlacementResolver::new(WindowOpenings::default());
        resolver.set_viewport(viewport);
        let mut camera = Camera::default();
        camera.set_viewport(viewport);
        (resolver, camera)
    }

    // ── fullscreen ────────────────────────────────────────────────────────

    #[test]
    fn fullscreen_is_unit_rect_at_depth_zero() {
        let (resolver, camera) = setup();
        let mut s = PostSettings::default();
        let g = resolver.resolve(PlacementRequest::Fullscreen, &camera, &mut s).unwrap();
        assert_eq!(g, Some(PlacementGeometry::Quad { rect: Rect::UNIT, depth: 0.0 }));
        assert_eq!(s.area_top_left, [0.0, 0.0]);
        assert_eq!(s.area_size, [1.0, 1.0]);
        assert_eq!(s.area_depth, 0.0);
    }

    // ── area ──────────────────────────────────────────────────────────────

    #[test]
    fn area_at_near_plane_is_culled() {
        let (resolver, camera) = setup();
        let mut s = PostSettings::default();
        s.area_depth = 0.5;
        let req = PlacementRequest::Area {
            anchor: Vec3::new(0.0, 0.0, camera.near_clip),
            size: Vec2::splat(10.0),
        };
        assert_eq!(resolver.resolve(req, &camera, &mut s).unwrap(), None);
        // Culled draws leave the payload alone.
        assert_eq!(s.area_depth, 0.5);
    }

    #[test]
    fn area_behind_camera_is_culled() {
        let (resolver, camera) = setup();
        let mut s = PostSettings::default();
        let req = PlacementRequest::Area { anchor: Vec3::new(0.0, 0.0, -5.0), size: Vec2::ONE };
        assert_eq!(resolver.resolve(req, &camera, &mut s).unwrap(), None);
    }

    #[test]
    fn area_ahead_gives_centred_rect() {
        let (resolver, camera) = setup();
        let mut s = PostSettings::default();
        let req = PlacementRequest::Area { anchor: Vec3::new(0.0, 0.0, 10.0), size: Vec2::splat(10.0) };
        let Some(PlacementGeometry::Quad { rect, depth }) =
            resolver.resolve(req, &camera, &mut s).unwrap()
        else {
            panic!("expected a quad");
        };

        // 10 units at distance 10 with a 60 degree horizontal fov.
        let frustum_width = 2.0 * 10.0 * (camera.fov_x * 0.5).tan();
        let w = 10.0 / frustum_width;
        let h = w * 800.0 / 600.0;
        assert!(close(rect.size.x, w));
        assert!(close(rect.size.y, h));
        assert!(close(rect.centre().x, 0.5));
        assert!(close(rect.centre().y, 0.5));
        assert!(close(rect.origin.x, 0.5 - w / 2.0));

        let expected_depth = 10_000.0 * (10.0 - 0.1) / (10_000.0 - 0.1) / 10.0;
        assert!(close(depth, expected_depth));
        assert!((0.0..=1.0).contains(&depth));
        assert_eq!(s.area_depth, depth);
    }

    #[test]
    fn area_depth_matches_scene_depth_buffer() {
        let (resolver, camera) = setup();
        let anchor = Vec3::new(3.0, -2.0, 37.0);
        let mut s = PostSettings::default();
        let req = PlacementRequest::Area { anchor, size: Vec2::ONE };
        let Some(PlacementGeometry::Quad { depth, .. }) =
            resolver.resolve(req, &camera, &mut s).unwrap()
        else {
            panic!("expected a quad");
        };

        let clip = camera.view_projection() * anchor.extend(1.0);
        assert!(close(depth, clip.z / clip.w));
    }

    #[test]
    fn area_shrinks_with_distance() {
        let (resolver, camera) = setup();
        let mut s = PostSettings::default();
        let size_at = |z: f32, s: &mut PostSettings| {
            let req = PlacementRequest::Area { anchor: Vec3::new(0.0, 0.0, z), size: Vec2::splat(4.0) };
            match resolver.resolve(req, &camera, s).unwrap() {
                Some(PlacementGeometry::Quad { rect, .. }) => rect.size.x,
                other => panic!("unexpected {other:?}"),
            }
        };
        let near = size_at(10.0, &mut s);
        let far = size_at(20.0, &mut s);
        assert!(close(near, 2.0 * far));
    }

    #[test]
    fn area_needs_a_real_viewport() {
        let (mut resolver, camera) = setup();
        resolver.set_viewport(Viewport::new(0.0, 600.0));
        let mut s = PostSettings::default();
        let req = PlacementRequest::Area { anchor: Vec3::new(0.0, 0.0, 10.0), size: Vec2::ONE };
        assert!(matches!(
            resolver.resolve(req, &camera, &mut s),
            Err(PlacementError::InvalidViewport { .. })
        ));
    }

    // ── polygon ───────────────────────────────────────────────────────────

    #[test]
    fn polygon_points_are_unnormalized_clip_space() {
        let (resolver, camera) = setup();
        let points = [
            Vec3::new(-3.0, 5.0, 0.0),
            Vec3::new(-5.0, -5.0, 0.0),
            Vec3::new(3.0, 5.0, 0.0),
            Vec3::new(5.0, -5.0, 0.0),
        ];
        let world = Mat4::from_translation(Vec3::new(0.0, 0.0, 30.0));
        let mut s = PostSettings::default();
        let g = resolver
            .resolve(PlacementRequest::Polygon { points: &points, world }, &camera, &mut s)
            .unwrap();

        let Some(PlacementGeometry::Polygon { points: clip }) = g else {
            panic!("expected a polygon");
        };
        for (p, c) in points.iter().zip(clip) {
            let expected = camera.view_projection() * (*p + Vec3::new(0.0, 0.0, 30.0)).extend(1.0);
            assert!((c - expected).length() < EPS);
            // w carries the view distance; nothing was divided out.
            assert!(close(c.w, 30.0));
        }
        assert_eq!(s.polygon_points[0], clip[0].to_array());
        assert_eq!(s.area_size, [1.0, 1.0]);
    }

    /// Fixed view-projection; only polygon placement reads it.
    struct FixedCamera(Mat4);

    impl CameraView for FixedCamera {
        fn project_to_screen(&self, _: Vec3, _: Viewport) -> Vec3 {
            Vec3::ZERO
        }

        fn world_units_per_pixel(&self, _: f32, _: Viewport) -> Vec2 {
            Vec2::ONE
        }

        fn near_clip(&self) -> f32 {
            0.1
        }

        fn far_clip(&self) -> f32 {
            100.0
        }

        fn view_projection(&self) -> Mat4 {
            self.0
        }
    }

    #[test]
    fn polygon_corners_are_view_projection_times_point() {
        let (resolver, _) = setup();
        let camera = FixedCamera(Mat4::from_cols_array(&[
            2.0, 0.0, 0.0, 0.0, //
            0.0, 3.0, 0.0, 0.0, //
            0.0, 0.0, 0.5, 1.0, //
            1.0, -1.0, 0.25, 0.0,
        ]));
        let points = [
            Vec3::new(1.0, 2.0, 4.0),
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(0.0, 1.0, 8.0),
            Vec3::new(2.0, -2.0, 1.0),
        ];
        let mut s = PostSettings::default();
        resolver
            .resolve(
                PlacementRequest::Polygon { points: &points, world: Mat4::IDENTITY },
                &camera,
                &mut s,
            )
            .unwrap();

        assert_eq!(
            s.polygon_points,
            [
                [3.0, 5.0, 2.25, 4.0],
                [-1.0, -1.0, 1.25, 2.0],
                [1.0, 2.0, 4.25, 8.0],
                [5.0, -7.0, 0.75, 1.0],
            ]
        );
    }

    #[test]
    fn window_polygon_is_repeatable() {
        let (resolver, camera) = setup();
        for index in 0..3 {
            let mut first = PostSettings::default();
            let mut second = PostSettings::default();
            let a = resolver
                .resolve(PlacementRequest::WindowPolygon { index }, &camera, &mut first)
                .unwrap();
            let b = resolver
                .resolve(PlacementRequest::WindowPolygon { index }, &camera, &mut second)
                .unwrap();
            assert_eq!(a, b);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn only_area_placement_fades_edges() {
        let (resolver, camera) = setup();
        let mut s = PostSettings::default();
        let area = PlacementRequest::Area { anchor: Vec3::new(0.0, 0.0, 10.0), size: Vec2::ONE };
        resolver.resolve(area, &camera, &mut s).unwrap();
        assert_eq!(s.edge_fade, 1.0);
        resolver
            .resolve(PlacementRequest::WindowPolygon { index: 0 }, &camera, &mut s)
            .unwrap();
        assert_eq!(s.edge_fade, 0.0);
    }

    #[test]
    fn window_polygon_uses_opening_table() {
        let (resolver, camera) = setup();
        let mut s = PostSettings::default();
        let g = resolver
            .resolve(PlacementRequest::WindowPolygon { index: 1 }, &camera, &mut s)
            .unwrap();

        let opening = resolver.openings().get(1).unwrap();
        let Some(PlacementGeometry::Polygon { points }) = g else {
            panic!("expected a polygon");
        };
        assert_eq!(points[0], camera.view_projection() * opening[0].extend(1.0));
    }

    #[test]
    fn window_index_out_of_range_is_an_error() {
        let (resolver, camera) = setup();
        let mut s = PostSettings::default();
        let err = resolver
            .resolve(PlacementRequest::WindowPolygon { index: 3 }, &camera, &mut s)
            .unwrap_err();
        assert_eq!(err, PlacementError::WindowOutOfRange { index: 3, count: 3 });
        assert_eq!(err.to_string(), "window opening 3 out of range (3 openings)");
    }

    #[test]
    fn openings_are_strip_ordered() {
        for o in WindowOpenings::default().iter() {
            // top-left, bottom-left, top-right, bottom-right
            assert!(o[0].y > o[1].y && o[0].x == o[1].x);
            assert!(o[2].y > o[3].y && o[2].x == o[3].x);
            assert!(o[2].x > o[0].x);
        }
    }

    // ── stale state ───────────────────────────────────────────────────────

    #[test]
    fn quad_after_polygon_has_no_polygon_points() {
        let (resolver, camera) = setup();
        let mut s = PostSettings::default();
        resolver
            .resolve(PlacementRequest::WindowPolygon { index: 0 }, &camera, &mut s)
            .unwrap();
        assert_ne!(s.polygon_points, [[0.0; 4]; 4]);
        resolver.resolve(PlacementRequest::Fullscreen, &camera, &mut s).unwrap();
        assert_eq!(s.polygon_points, [[0.0; 4]; 4]);
    }
}
