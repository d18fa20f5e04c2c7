//! The orbiting-body scene.
//!
//! A fixed table of bodies (one row each) and the pure transform composition
//! that animates them. Every world matrix is a function of the animation
//! time `t` and the table constants alone — no state carries over between
//! frames, so the same `t` always yields the same matrices.

use glam::{EulerRot, Mat4, Vec3};

use orrery_engine::device::AdapterTier;
use orrery_engine::render::RasterMode;

/// Wall-clock seconds → animation time.
pub const WALL_TIME_SCALE: f32 = 0.1;

/// Per-frame animation-time step when a software adapter drives rendering.
///
/// Software rasterizers present too slowly for wall-clock animation to be
/// watchable; a fixed step keeps the orbit speeds usable.
pub const SYNTHETIC_STEP: f32 = std::f32::consts::PI * 0.0125;

/// Which primitive a body is drawn with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MeshKind {
    Cube,
    Pyramid,
    Plane,
}

/// Orbit a moon rides in addition to its own: the parent body's placement.
#[derive(Debug, Copy, Clone)]
pub struct ParentOrbit {
    /// Offset from the system origin to the parent.
    pub offset: Vec3,
    /// Parent orbit rotation rates (pitch/yaw/roll per unit time).
    pub orbit: Vec3,
}

/// One row of the scene table: everything needed to place and draw a body.
#[derive(Debug, Copy, Clone)]
pub struct Body {
    pub name: &'static str,
    pub mesh: MeshKind,
    pub raster: RasterMode,
    /// Uniform local scale.
    pub scale: f32,
    /// Self-rotation rates (pitch/yaw/roll per unit time), applied at the
    /// body's own origin.
    pub spin: Vec3,
    /// Offset from the orbit center to the body.
    pub offset: Vec3,
    /// Orbit rotation rates around the orbit center.
    pub orbit: Vec3,
    /// For moons: the parent's placement, composed outermost.
    pub parent: Option<ParentOrbit>,
}

pub const BODY_COUNT: usize = 6;

/// The scene, in draw order. The ground plane comes last.
pub static BODIES: [Body; BODY_COUNT] = [
    Body {
        name: "sun",
        mesh: MeshKind::Cube,
        raster: RasterMode::Wireframe,
        scale: 3.0,
        spin: Vec3::ZERO,
        offset: Vec3::ZERO,
        orbit: Vec3::new(10.0, 10.0, 10.0),
        parent: None,
    },
    Body {
        name: "mars",
        mesh: MeshKind::Cube,
        raster: RasterMode::Wireframe,
        scale: 0.6,
        spin: Vec3::new(4.0, 0.0, 0.0),
        offset: Vec3::new(6.0, 0.0, 0.0),
        orbit: Vec3::new(0.0, 5.0, 0.0),
        parent: None,
    },
    Body {
        name: "earth",
        mesh: MeshKind::Pyramid,
        raster: RasterMode::Solid,
        scale: 0.8,
        spin: Vec3::new(0.0, 0.0, 6.0),
        offset: Vec3::new(9.0, 0.0, 0.0),
        orbit: Vec3::new(0.0, 3.5, 0.0),
        parent: None,
    },
    Body {
        name: "earth-moon",
        mesh: MeshKind::Pyramid,
        raster: RasterMode::Solid,
        scale: 0.125,
        spin: Vec3::ZERO,
        offset: Vec3::new(3.0, 0.0, 0.0),
        orbit: Vec3::new(0.0, 2.0, 3.0),
        parent: Some(ParentOrbit {
            offset: Vec3::new(9.0, 0.0, 0.0),
            orbit: Vec3::new(0.0, 3.5, 0.0),
        }),
    },
    Body {
        name: "mars-moon",
        mesh: MeshKind::Pyramid,
        raster: RasterMode::Solid,
        scale: 0.1,
        spin: Vec3::ZERO,
        offset: Vec3::new(3.0, 0.0, 0.0),
        orbit: Vec3::new(0.0, 2.0, 4.0),
        parent: Some(ParentOrbit {
            offset: Vec3::new(6.0, 0.0, 0.0),
            orbit: Vec3::new(0.0, 5.0, 0.0),
        }),
    },
    Body {
        name: "ground",
        mesh: MeshKind::Plane,
        raster: RasterMode::Wireframe,
        scale: 10.0,
        spin: Vec3::ZERO,
        offset: Vec3::new(0.0, -5.0, 0.0),
        orbit: Vec3::ZERO,
        parent: None,
    },
];

/// Rotation from per-axis pitch/yaw/roll rates at time `t`.
///
/// Roll (Z) applies first, then pitch (X), then yaw (Y).
fn rotation(rates: Vec3, t: f32) -> Mat4 {
    Mat4::from_euler(EulerRot::YXZ, rates.y * t, rates.x * t, rates.z * t)
}

impl Body {
    /// World matrix at animation time `t`.
    ///
    /// Composition runs local-to-world: scale, self-rotation, translation to
    /// the orbit offset, orbit rotation, then for moons the parent's offset
    /// and orbit. The stage order is load-bearing; swapping any two stages
    /// changes the scene.
    pub fn world_matrix(&self, t: f32) -> Mat4 {
        let mut world = rotation(self.orbit, t)
            * Mat4::from_translation(self.offset)
            * Mat4::from_scale(Vec3::splat(self.scale))
            * rotation(self.spin, t);

        if let Some(parent) = self.parent {
            world = rotation(parent.orbit, t) * Mat4::from_translation(parent.offset) * world;
        }

        world
    }
}

/// Animation-time source.
///
/// `Wall` derives `t` from elapsed real time; `Synthetic` advances by a
/// fixed step per frame. The mode is chosen once from the granted adapter
/// tier and never changes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TimeMode {
    Wall,
    Synthetic,
}

#[derive(Debug, Clone)]
pub struct SimTime {
    mode: TimeMode,
    t: f32,
}

impl SimTime {
    pub fn new(mode: TimeMode) -> Self {
        Self { mode, t: 0.0 }
    }

    pub fn for_tier(tier: AdapterTier) -> Self {
        Self::new(match tier {
            AdapterTier::Hardware => TimeMode::Wall,
            AdapterTier::SoftwareFallback => TimeMode::Synthetic,
        })
    }

    /// Returns the animation time for this frame.
    pub fn advance(&mut self, wall_elapsed: f32) -> f32 {
        match self.mode {
            TimeMode::Wall => self.t = wall_elapsed * WALL_TIME_SCALE,
            TimeMode::Synthetic => self.t += SYNTHETIC_STEP,
        }
        self.t
    }
}

/// World matrices for every body, in table order.
pub struct SceneState {
    pub worlds: [Mat4; BODY_COUNT],
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            worlds: [Mat4::IDENTITY; BODY_COUNT],
        }
    }

    /// Recomputes every world matrix from `t` alone.
    pub fn update(&mut self, t: f32) {
        for (world, body) in self.worlds.iter_mut().zip(BODIES.iter()) {
            *world = body.world_matrix(t);
        }
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(name: &str) -> &'static Body {
        BODIES.iter().find(|b| b.name == name).expect("unknown body")
    }

    // ── purity & determinism ──────────────────────────────────────────────

    #[test]
    fn world_matrices_are_pure_in_t() {
        for b in &BODIES {
            for t in [0.0, 0.37, 12.5, 10_000.0] {
                assert_eq!(
                    b.world_matrix(t).to_cols_array(),
                    b.world_matrix(t).to_cols_array(),
                    "{} not bit-identical at t={t}",
                    b.name
                );
            }
        }
    }

    #[test]
    fn update_is_idempotent_for_same_t() {
        let mut a = SceneState::new();
        let mut b = SceneState::new();
        a.update(3.25);
        b.update(100.0);
        b.update(3.25);
        for (ma, mb) in a.worlds.iter().zip(b.worlds.iter()) {
            assert_eq!(ma.to_cols_array(), mb.to_cols_array());
        }
    }

    // ── composition at t = 0 ──────────────────────────────────────────────

    #[test]
    fn earth_moon_at_t0_is_scaled_translation() {
        let m = body("earth-moon").world_matrix(0.0);
        let expected =
            Mat4::from_translation(Vec3::new(12.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(0.125));
        assert!(m.abs_diff_eq(expected, 1e-6));
        // Rotation sub-block reduces to the scaled identity.
        assert!(m.x_axis.truncate().abs_diff_eq(Vec3::X * 0.125, 1e-6));
        assert!(m.y_axis.truncate().abs_diff_eq(Vec3::Y * 0.125, 1e-6));
        assert!(m.z_axis.truncate().abs_diff_eq(Vec3::Z * 0.125, 1e-6));
        assert!(m.w_axis.truncate().abs_diff_eq(Vec3::new(12.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn rotations_vanish_at_t0_for_every_body() {
        for b in &BODIES {
            let m = b.world_matrix(0.0);
            let s = b.scale;
            assert!(
                m.x_axis.truncate().abs_diff_eq(Vec3::X * s, 1e-6)
                    && m.y_axis.truncate().abs_diff_eq(Vec3::Y * s, 1e-6)
                    && m.z_axis.truncate().abs_diff_eq(Vec3::Z * s, 1e-6),
                "{} has rotation terms at t=0",
                b.name
            );
        }
    }

    // ── orbit geometry ────────────────────────────────────────────────────

    #[test]
    fn yaw_orbit_preserves_radius() {
        for t in [0.1, 1.0, 7.3] {
            let m = body("earth").world_matrix(t);
            let radius = m.w_axis.truncate().length();
            assert!((radius - 9.0).abs() < 1e-4, "radius {radius} at t={t}");
        }
    }

    #[test]
    fn earth_position_follows_its_orbit_angle() {
        let t = 0.25;
        let angle = 3.5 * t;
        let m = body("earth").world_matrix(t);
        let expected = Vec3::new(9.0 * angle.cos(), 0.0, -9.0 * angle.sin());
        assert!(m.w_axis.truncate().abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn moon_stays_near_its_parent() {
        for t in [0.0, 0.5, 2.0] {
            let moon = body("earth-moon").world_matrix(t).w_axis.truncate();
            let earth = body("earth").world_matrix(t).w_axis.truncate();
            let distance = (moon - earth).length();
            assert!((distance - 3.0).abs() < 1e-4, "distance {distance} at t={t}");
        }
    }

    #[test]
    fn composition_order_is_load_bearing() {
        let b = body("earth");
        let t = 1.0;
        let reversed = Mat4::from_translation(b.offset) * rotation(b.orbit, t);
        let correct = rotation(b.orbit, t) * Mat4::from_translation(b.offset);
        assert!(!reversed.abs_diff_eq(correct, 1e-6));
    }

    // ── draw order & table shape ──────────────────────────────────────────

    #[test]
    fn one_draw_per_body_with_ground_last() {
        assert_eq!(BODIES.len(), 6);
        let ground = BODIES.last().unwrap();
        assert_eq!(ground.mesh, MeshKind::Plane);
        assert_eq!(ground.raster, RasterMode::Wireframe);
        assert_eq!(
            BODIES.iter().filter(|b| b.mesh == MeshKind::Plane).count(),
            1
        );
    }

    #[test]
    fn raster_mode_follows_mesh_kind() {
        for b in &BODIES {
            let expected = match b.mesh {
                MeshKind::Cube | MeshKind::Plane => RasterMode::Wireframe,
                MeshKind::Pyramid => RasterMode::Solid,
            };
            assert_eq!(b.raster, expected, "{}", b.name);
        }
    }

    // ── animation time ────────────────────────────────────────────────────

    #[test]
    fn wall_time_scales_elapsed_seconds() {
        let mut sim = SimTime::new(TimeMode::Wall);
        assert!((sim.advance(12.0) - 1.2).abs() < 1e-6);
        // Wall mode tracks elapsed time, it does not accumulate.
        assert!((sim.advance(12.0) - 1.2).abs() < 1e-6);
    }

    #[test]
    fn synthetic_time_accumulates_fixed_steps() {
        let mut sim = SimTime::new(TimeMode::Synthetic);
        sim.advance(999.0);
        sim.advance(0.0);
        let t = sim.advance(5.0);
        assert!((t - 3.0 * SYNTHETIC_STEP).abs() < 1e-6);
    }
}
