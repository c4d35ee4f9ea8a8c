use glam::Vec2;

/// Identity of one rigid segment of the figure.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SegmentId {
    Head,
    Torso,
    LeftUpperArm,
    LeftLowerArm,
    RightUpperArm,
    RightLowerArm,
    LeftUpperLeg,
    LeftLowerLeg,
    RightUpperLeg,
    RightLowerLeg,
}

impl SegmentId {
    pub const ALL: [SegmentId; 10] = [
        SegmentId::Torso,
        SegmentId::Head,
        SegmentId::LeftUpperArm,
        SegmentId::LeftLowerArm,
        SegmentId::RightUpperArm,
        SegmentId::RightLowerArm,
        SegmentId::LeftUpperLeg,
        SegmentId::LeftLowerLeg,
        SegmentId::RightUpperLeg,
        SegmentId::RightLowerLeg,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SegmentId::Head => "head",
            SegmentId::Torso => "torso",
            SegmentId::LeftUpperArm => "leftUpperArm",
            SegmentId::LeftLowerArm => "leftLowerArm",
            SegmentId::RightUpperArm => "rightUpperArm",
            SegmentId::RightLowerArm => "rightLowerArm",
            SegmentId::LeftUpperLeg => "leftUpperLeg",
            SegmentId::LeftLowerLeg => "leftLowerLeg",
            SegmentId::RightUpperLeg => "rightUpperLeg",
            SegmentId::RightLowerLeg => "rightLowerLeg",
        }
    }
}

/// Measured pixel size of one loaded sprite, before figure scaling.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteSize {
    pub width: f32,
    pub height: f32,
}

impl SpriteSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, scale: f32) -> Self {
        Self {
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

/// Measured sizes for all ten sprites of one figure.
#[derive(Copy, Clone, Debug)]
pub struct FigureSprites {
    pub head: SpriteSize,
    pub torso: SpriteSize,
    pub left_upper_arm: SpriteSize,
    pub left_lower_arm: SpriteSize,
    pub right_upper_arm: SpriteSize,
    pub right_lower_arm: SpriteSize,
    pub left_upper_leg: SpriteSize,
    pub left_lower_leg: SpriteSize,
    pub right_upper_leg: SpriteSize,
    pub right_lower_leg: SpriteSize,
}

impl FigureSprites {
    pub fn size_of(&self, id: SegmentId) -> SpriteSize {
        match id {
            SegmentId::Head => self.head,
            SegmentId::Torso => self.torso,
            SegmentId::LeftUpperArm => self.left_upper_arm,
            SegmentId::LeftLowerArm => self.left_lower_arm,
            SegmentId::RightUpperArm => self.right_upper_arm,
            SegmentId::RightLowerArm => self.right_lower_arm,
            SegmentId::LeftUpperLeg => self.left_upper_leg,
            SegmentId::LeftLowerLeg => self.left_lower_leg,
            SegmentId::RightUpperLeg => self.right_upper_leg,
            SegmentId::RightLowerLeg => self.right_lower_leg,
        }
    }

    pub(crate) fn scaled(&self, scale: f32) -> Self {
        Self {
            head: self.head.scaled(scale),
            torso: self.torso.scaled(scale),
            left_upper_arm: self.left_upper_arm.scaled(scale),
            left_lower_arm: self.left_lower_arm.scaled(scale),
            right_upper_arm: self.right_upper_arm.scaled(scale),
            right_lower_arm: self.right_lower_arm.scaled(scale),
            left_upper_leg: self.left_upper_leg.scaled(scale),
            left_lower_leg: self.left_lower_leg.scaled(scale),
            right_upper_leg: self.right_upper_leg.scaled(scale),
            right_lower_leg: self.right_lower_leg.scaled(scale),
        }
    }
}

/// Collision shape of a segment. The head is a circle, everything else a
/// rectangle matching its sprite's bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SegmentShape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

impl SegmentShape {
    /// Whether `point` lies inside this shape placed at `center` with the
    /// given rotation. Used for pointer hit-testing.
    pub fn contains(&self, center: Vec2, rotation: f32, point: Vec2) -> bool {
        match *self {
            SegmentShape::Circle { radius } => point.distance(center) <= radius,
            SegmentShape::Rect { width, height } => {
                let local = Vec2::from_angle(-rotation).rotate(point - center);
                local.x.abs() <= width * 0.5 && local.y.abs() <= height * 0.5
            }
        }
    }
}

/// Where one segment's body goes: shape and world-space center.
#[derive(Copy, Clone, Debug)]
pub struct SegmentPlacement {
    pub id: SegmentId,
    pub shape: SegmentShape,
    pub center: Vec2,
}
