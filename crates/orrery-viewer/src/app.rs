//! Viewer application: owns the scene state, the animation clock, and the
//! GPU-side view resources, and drives one update + draw pass per frame.

use anyhow::{Context, Result};
use glam::Vec3;

use orrery_engine::core::{App, AppControl, FrameCtx};
use orrery_engine::device::Gpu;
use orrery_engine::render::{
    Camera, DrawList, GpuMesh, Lighting, MeshData, SceneRenderer,
};

use crate::scene::{self, MeshKind, SceneState, SimTime, TimeMode};

/// Background color behind the scene.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.125,
    b: 0.3,
    a: 1.0,
};

/// Ground grid resolution, vertices per side.
const GRID_VERTS: u32 = 11;

/// Ground grid extent in local units, before the body's world scale.
const GRID_EXTENT: f32 = 2.0;

/// The three primitives every body draws from.
struct MeshSet {
    cube: GpuMesh,
    pyramid: GpuMesh,
    plane: GpuMesh,
}

impl MeshSet {
    /// Uploads all primitives. Any failure aborts startup as a unit; the
    /// already-uploaded buffers drop with the attempt.
    fn create(device: &wgpu::Device) -> Result<Self> {
        Ok(Self {
            cube: GpuMesh::upload(device, "cube", &MeshData::cube())?,
            pyramid: GpuMesh::upload(device, "pyramid", &MeshData::pyramid())?,
            plane: GpuMesh::upload(
                device,
                "ground plane",
                &MeshData::grid_plane(GRID_VERTS, GRID_VERTS, GRID_EXTENT, GRID_EXTENT),
            )?,
        })
    }

    fn get(&self, kind: MeshKind) -> &GpuMesh {
        match kind {
            MeshKind::Cube => &self.cube,
            MeshKind::Pyramid => &self.pyramid,
            MeshKind::Plane => &self.plane,
        }
    }
}

/// GPU-side state, built once the device exists.
struct ViewState {
    renderer: SceneRenderer,
    meshes: MeshSet,
    camera: Camera,
}

pub struct OrreryApp {
    scene: SceneState,
    sim: SimTime,
    view: Option<ViewState>,
}

impl OrreryApp {
    pub fn new() -> Self {
        Self {
            scene: SceneState::new(),
            sim: SimTime::new(TimeMode::Wall),
            view: None,
        }
    }
}

impl App for OrreryApp {
    fn on_ready(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let size = gpu.size();
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let camera = Camera::new(Vec3::new(0.0, 0.0, -15.0), Vec3::ZERO, aspect);

        let meshes = MeshSet::create(gpu.device()).context("mesh upload failed")?;
        let renderer = SceneRenderer::new(
            gpu.device(),
            gpu.surface_format(),
            gpu.depth_format(),
            Lighting::default(),
        )
        .context("scene renderer setup failed")?;

        self.sim = SimTime::for_tier(gpu.tier());
        self.view = Some(ViewState {
            renderer,
            meshes,
            camera,
        });

        log::info!("scene ready: {} bodies", scene::BODY_COUNT);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let t = self.sim.advance(ctx.time.elapsed);
        self.scene.update(t);

        let Self { scene, view, .. } = self;
        let Some(view) = view.as_mut() else {
            // on_ready runs before the first frame; a missing view is a bug.
            log::error!("frame requested before startup completed");
            return AppControl::Exit;
        };

        ctx.render(CLEAR_COLOR, |rctx, target| {
            let mut list = DrawList::new();
            for (body, world) in scene::BODIES.iter().zip(scene.worlds.iter()) {
                list.push(view.meshes.get(body.mesh), *world, body.raster);
            }
            view.renderer.render(rctx, target, &view.camera, &list);
        })
    }
}
