use glam::Vec2;

use crate::{Error, FigureSprites, SegmentId, SegmentPlacement, SegmentShape, SpriteSize};

/// Tuning shared by every joint of a figure.
///
/// `compliance` follows the usual 0..=1 convention where 1.0 solves the
/// pin rigidly. The default of 0.6 gives the slightly loose look the
/// figure is meant to have; it is a visual tunable, not an invariant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JointTuning {
    pub compliance: f32,
}

impl Default for JointTuning {
    fn default() -> Self {
        Self { compliance: 0.6 }
    }
}

/// One pin joint: the child's `child_anchor` point is constrained onto the
/// parent's `parent_anchor` point, both offsets relative to the segment
/// centers.
#[derive(Copy, Clone, Debug)]
pub struct JointSpec {
    pub parent: SegmentId,
    pub child: SegmentId,
    pub parent_anchor: Vec2,
    pub child_anchor: Vec2,
}

/// Row of the attachment table: where `child` hangs off `parent`.
///
/// `socket` is the attachment point on the parent, `anchor` the matching
/// point on the child, both as offsets from the respective segment center
/// computed from the scaled sprite sizes.
struct Attachment {
    child: SegmentId,
    parent: SegmentId,
    socket: fn(&FigureSprites) -> Vec2,
    anchor: fn(&FigureSprites) -> Vec2,
}

fn top_center(size: SpriteSize) -> Vec2 {
    Vec2::new(0.0, -size.height * 0.5)
}

fn bottom_center(size: SpriteSize) -> Vec2 {
    Vec2::new(0.0, size.height * 0.5)
}

/// The fixed skeleton topology: neck, shoulders, elbows, hips, knees.
/// Parents appear before their children so one pass places every segment.
const ATTACHMENTS: [Attachment; 9] = [
    Attachment {
        child: SegmentId::Head,
        parent: SegmentId::Torso,
        socket: |s| top_center(s.torso),
        anchor: |s| bottom_center(s.head),
    },
    Attachment {
        child: SegmentId::LeftUpperArm,
        parent: SegmentId::Torso,
        socket: |s| Vec2::new(-s.torso.width * 0.5, -s.torso.height * 0.25),
        anchor: |s| top_center(s.left_upper_arm),
    },
    Attachment {
        child: SegmentId::LeftLowerArm,
        parent: SegmentId::LeftUpperArm,
        socket: |s| bottom_center(s.left_upper_arm),
        anchor: |s| top_center(s.left_lower_arm),
    },
    Attachment {
        child: SegmentId::RightUpperArm,
        parent: SegmentId::Torso,
        socket: |s| Vec2::new(s.torso.width * 0.5, -s.torso.height * 0.25),
        anchor: |s| top_center(s.right_upper_arm),
    },
    Attachment {
        child: SegmentId::RightLowerArm,
        parent: SegmentId::RightUpperArm,
        socket: |s| bottom_center(s.right_upper_arm),
        anchor: |s| top_center(s.right_lower_arm),
    },
    Attachment {
        child: SegmentId::LeftUpperLeg,
        parent: SegmentId::Torso,
        socket: |s| Vec2::new(-s.torso.width * 0.25, s.torso.height * 0.5),
        anchor: |s| top_center(s.left_upper_leg),
    },
    Attachment {
        child: SegmentId::LeftLowerLeg,
        parent: SegmentId::LeftUpperLeg,
        socket: |s| bottom_center(s.left_upper_leg),
        anchor: |s| top_center(s.left_lower_leg),
    },
    Attachment {
        child: SegmentId::RightUpperLeg,
        parent: SegmentId::Torso,
        socket: |s| Vec2::new(s.torso.width * 0.25, s.torso.height * 0.5),
        anchor: |s| top_center(s.right_upper_leg),
    },
    Attachment {
        child: SegmentId::RightLowerLeg,
        parent: SegmentId::RightUpperLeg,
        socket: |s| bottom_center(s.right_upper_leg),
        anchor: |s| top_center(s.right_lower_leg),
    },
];

/// A fully placed figure: ten segment placements and nine joint specs,
/// ready to be spawned into a [`World`](crate::World).
///
/// Every joint's two endpoints coincide in world space at construction
/// time; the figure settles without snapping on the first step.
#[derive(Clone, Debug)]
pub struct FigureLayout {
    pub placements: Vec<SegmentPlacement>,
    pub joints: Vec<JointSpec>,
    pub tuning: JointTuning,
}

impl FigureLayout {
    /// Places all ten segments relative to `anchor` (the torso center)
    /// using the measured sprite sizes and the figure scale.
    pub fn build(anchor: Vec2, scale: f32, sprites: &FigureSprites) -> Result<Self, Error> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidScale { value: scale });
        }
        for id in SegmentId::ALL {
            let size = sprites.size_of(id);
            if !(size.width > 0.0 && size.height > 0.0) {
                return Err(Error::InvalidSpriteSize {
                    segment: id.label(),
                    width: size.width,
                    height: size.height,
                });
            }
        }

        let sprites = sprites.scaled(scale);

        let mut placements = Vec::with_capacity(SegmentId::ALL.len());
        placements.push(SegmentPlacement {
            id: SegmentId::Torso,
            shape: shape_for(SegmentId::Torso, &sprites),
            center: anchor,
        });

        let mut joints = Vec::with_capacity(ATTACHMENTS.len());
        for row in &ATTACHMENTS {
            let socket = (row.socket)(&sprites);
            let own = (row.anchor)(&sprites);
            let parent_center = placements
                .iter()
                .find(|p| p.id == row.parent)
                .map(|p| p.center)
                .expect("attachment table lists parents before children");

            // Centering the child so its own anchor lands exactly on the
            // parent's socket gives the joint zero rest separation.
            placements.push(SegmentPlacement {
                id: row.child,
                shape: shape_for(row.child, &sprites),
                center: parent_center + socket - own,
            });
            joints.push(JointSpec {
                parent: row.parent,
                child: row.child,
                parent_anchor: socket,
                child_anchor: own,
            });
        }

        Ok(Self {
            placements,
            joints,
            tuning: JointTuning::default(),
        })
    }

    pub fn with_tuning(mut self, tuning: JointTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn placement(&self, id: SegmentId) -> Option<&SegmentPlacement> {
        self.placements.iter().find(|p| p.id == id)
    }

    /// World-space endpoints of one joint at construction time (segments
    /// have not rotated yet, so a local offset is a plain translation).
    pub fn joint_endpoints(&self, joint: &JointSpec) -> Option<(Vec2, Vec2)> {
        let parent = self.placement(joint.parent)?;
        let child = self.placement(joint.child)?;
        Some((
            parent.center + joint.parent_anchor,
            child.center + joint.child_anchor,
        ))
    }
}

fn shape_for(id: SegmentId, sprites: &FigureSprites) -> SegmentShape {
    let size = sprites.size_of(id);
    match id {
        SegmentId::Head => SegmentShape::Circle {
            radius: size.width * 0.5,
        },
        _ => SegmentShape::Rect {
            width: size.width,
            height: size.height,
        },
    }
}
