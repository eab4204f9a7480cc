use crate::object::{Body, BodyHandle};

/// A set of bodies stored contiguously.
///
/// Bodies are never removed during a simulation, so a handle is simply the index of its body.
#[derive(Clone, Debug, Default)]
pub struct BodySet {
    bodies: Vec<Body>,
}

impl BodySet {
    /// An empty body set.
    pub fn new() -> Self {
        Self { bodies: Vec::new() }
    }

    /// The number of bodies.
    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Is this set empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The handle the next inserted body will get.
    #[inline]
    pub(crate) fn next_handle(&self) -> BodyHandle {
        BodyHandle(self.bodies.len())
    }

    #[inline]
    pub(crate) fn insert(&mut self, body: Body) -> BodyHandle {
        let handle = self.next_handle();
        self.bodies.push(body);
        handle
    }

    /// The body with the given handle.
    #[inline]
    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0)
    }

    /// The body with the given handle.
    #[inline]
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0)
    }

    /// Iterates through all the bodies and their handles.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (BodyHandle(i), b))
    }

    /// The bodies, ordered by handle.
    #[inline]
    pub fn as_slice(&self) -> &[Body] {
        &self.bodies[..]
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Body] {
        &mut self.bodies[..]
    }
}

impl std::ops::Index<BodyHandle> for BodySet {
    type Output = Body;

    #[inline]
    fn index(&self, i: BodyHandle) -> &Body {
        &self.bodies[i.0]
    }
}

impl AsRef<[Body]> for BodySet {
    #[inline]
    fn as_ref(&self) -> &[Body] {
        &self.bodies
    }
}
