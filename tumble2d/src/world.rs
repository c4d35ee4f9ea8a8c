use glam::Vec2;
use rapier2d::prelude::*;

use crate::{FigureLayout, SegmentId, SegmentShape};

/// Downward acceleration, in CSS pixels per second squared, that a
/// normalized gravity of 1.0 maps to.
pub const GRAVITY_PX: f32 = 900.0;

/// Thickness of the four off-screen boundary walls.
const WALL_THICKNESS: f32 = 50.0;

/// Handles of one spawned figure: ten segment bodies and nine joints.
#[derive(Clone, Debug, Default)]
pub struct FigureHandles {
    segments: Vec<(SegmentId, RigidBodyHandle)>,
    joints: Vec<ImpulseJointHandle>,
}

impl FigureHandles {
    pub fn segment(&self, id: SegmentId) -> Option<RigidBodyHandle> {
        self.segments
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, h)| *h)
    }

    pub fn segments(&self) -> impl Iterator<Item = (SegmentId, RigidBodyHandle)> + '_ {
        self.segments.iter().copied()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
}

/// Thin wrapper around the rapier world: body/collider/joint sets, the
/// stepping pipeline, gravity, and the viewport boundary walls.
///
/// Coordinates are CSS pixels, y growing downward, matching the DOM.
pub struct World {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    ccd: CCDSolver,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    gravity: Vector<Real>,
    walls: [RigidBodyHandle; 4],
}

impl World {
    /// Creates an empty world with boundary walls hugging the viewport
    /// and default downward gravity.
    pub fn new(viewport: Vec2) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        let t = WALL_THICKNESS;
        let (w, h) = (viewport.x, viewport.y);
        let wall_specs = [
            // top, bottom, left, right
            (Vec2::new(w * 0.5, -t * 0.5), w, t),
            (Vec2::new(w * 0.5, h + t * 0.5), w, t),
            (Vec2::new(-t * 0.5, h * 0.5), t, h),
            (Vec2::new(w + t * 0.5, h * 0.5), t, h),
        ];
        let walls = wall_specs.map(|(center, width, height)| {
            let body = RigidBodyBuilder::fixed()
                .translation(vector![center.x, center.y])
                .build();
            let handle = bodies.insert(body);
            let collider = ColliderBuilder::cuboid(width * 0.5, height * 0.5).build();
            colliders.insert_with_parent(collider, handle, &mut bodies);
            handle
        });

        Self {
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd: CCDSolver::new(),
            pipeline: PhysicsPipeline::new(),
            params: IntegrationParameters::default(),
            gravity: vector![0.0, GRAVITY_PX],
            walls,
        }
    }

    /// Sets gravity in normalized units (1.0 = standard downward pull).
    pub fn set_gravity(&mut self, x: f32, y: f32) {
        self.gravity = vector![x * GRAVITY_PX, y * GRAVITY_PX];
    }

    /// Repositions the boundary walls after a viewport resize.
    pub fn resize(&mut self, viewport: Vec2) {
        let half = WALL_THICKNESS * 0.5;
        let (w, h) = (viewport.x, viewport.y);
        let centers = [
            Vec2::new(w * 0.5, -half),
            Vec2::new(w * 0.5, h + half),
            Vec2::new(-half, h * 0.5),
            Vec2::new(w + half, h * 0.5),
        ];
        for (handle, center) in self.walls.iter().zip(centers) {
            if let Some(body) = self.bodies.get_mut(*handle) {
                body.set_translation(vector![center.x, center.y], true);
            }
        }
    }

    pub fn walls(&self) -> [RigidBodyHandle; 4] {
        self.walls
    }

    /// Advances the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }

    /// Inserts a static rectangle (anchors, nav items).
    pub fn insert_static_rect(&mut self, center: Vec2, width: f32, height: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(width * 0.5, height * 0.5).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Inserts a dynamic rectangle (microtexts and other tumbling blocks).
    pub fn insert_dynamic_rect(
        &mut self,
        center: Vec2,
        width: f32,
        height: f32,
        restitution: f32,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![center.x, center.y])
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(width * 0.5, height * 0.5)
            .restitution(restitution)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Spawns a laid-out figure as one group: all ten bodies and all nine
    /// joints are registered before this returns, and no simulation step
    /// can interleave, so the figure is never observable partially wired.
    pub fn spawn_figure(&mut self, layout: &FigureLayout) -> FigureHandles {
        // All joints share one compliance; it maps onto the world's joint
        // error-correction coefficient (1.0 = rigid).
        self.params.joint_erp = layout.tuning.compliance.clamp(0.0, 1.0);

        let mut handles = FigureHandles::default();
        for placement in &layout.placements {
            let body = RigidBodyBuilder::dynamic()
                .translation(vector![placement.center.x, placement.center.y])
                .build();
            let handle = self.bodies.insert(body);
            let collider = match placement.shape {
                SegmentShape::Circle { radius } => ColliderBuilder::ball(radius),
                SegmentShape::Rect { width, height } => {
                    ColliderBuilder::cuboid(width * 0.5, height * 0.5)
                }
            }
            .build();
            self.colliders
                .insert_with_parent(collider, handle, &mut self.bodies);
            handles.segments.push((placement.id, handle));
        }

        for spec in &layout.joints {
            let (Some(parent), Some(child)) =
                (handles.segment(spec.parent), handles.segment(spec.child))
            else {
                continue;
            };
            // Free rotation about the pin; adjacent segments overlap at
            // the anchor, so contacts between them are disabled.
            let joint = RevoluteJointBuilder::new()
                .local_anchor1(point![spec.parent_anchor.x, spec.parent_anchor.y])
                .local_anchor2(point![spec.child_anchor.x, spec.child_anchor.y])
                .contacts_enabled(false)
                .build();
            handles
                .joints
                .push(self.impulse_joints.insert(parent, child, joint, true));
        }

        handles
    }

    /// Removes a figure's joints and bodies. Tolerant of bodies that were
    /// already removed individually.
    pub fn despawn_figure(&mut self, handles: &FigureHandles) {
        for joint in &handles.joints {
            self.impulse_joints.remove(*joint, true);
        }
        for (_, handle) in &handles.segments {
            self.remove_body(*handle);
        }
    }

    /// Removes one body and everything attached to it. A handle that is
    /// no longer present is a no-op.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Current center position and rotation of a body, if it still exists.
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<(Vec2, f32)> {
        let body = self.bodies.get(handle)?;
        let t = body.translation();
        Some((Vec2::new(t.x, t.y), body.rotation().angle()))
    }

    pub fn is_dynamic(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.get(handle).is_some_and(|b| b.is_dynamic())
    }

    pub fn set_body_position(&mut self, handle: RigidBodyHandle, center: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(vector![center.x, center.y], true);
        }
    }

    /// Overrides a body's linear velocity; used to steer a dragged body
    /// toward the pointer.
    pub fn set_body_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }
}
