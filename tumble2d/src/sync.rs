use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;

/// One {simulated body, visual element} pair kept in sync every frame.
#[derive(Clone, Debug)]
pub struct Binding<E> {
    pub body: RigidBodyHandle,
    pub element: E,
}

/// Ordered collection of bindings. Grows as figures, anchors and nav
/// items are created; drained in full at teardown.
///
/// No ordering between pairs is promised; each is updated independently.
#[derive(Clone, Debug)]
pub struct Bindings<E> {
    pairs: Vec<Binding<E>>,
}

impl<E> Default for Bindings<E> {
    fn default() -> Self {
        Self { pairs: Vec::new() }
    }
}

impl<E> Bindings<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, body: RigidBodyHandle, element: E) {
        self.pairs.push(Binding { body, element });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding<E>> {
        self.pairs.iter()
    }

    /// Empties the collection, handing every pair to the caller for
    /// removal from world and document.
    pub fn drain(&mut self) -> Vec<Binding<E>> {
        std::mem::take(&mut self.pairs)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Visual transform that centers a sprite on its body and applies the
/// body's rotation. A pure function of the body pose and sprite size, so
/// re-running it with unchanged state yields the same result.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteTransform {
    pub translate: Vec2,
    pub rotation: f32,
}

impl SpriteTransform {
    pub fn for_sprite(center: Vec2, rotation: f32, sprite_size: Vec2) -> Self {
        Self {
            translate: center - sprite_size * 0.5,
            rotation,
        }
    }

    /// CSS `transform` value: translate to align centers, then rotate.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) rotate({}rad)",
            self.translate.x, self.translate.y, self.rotation
        )
    }
}
