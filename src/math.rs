//! Types, aliases and helper operations for doing math with `ultraviolet`.
pub use ultraviolet as uv;

pub type Vec2 = uv::DVec2;

/// A wrapper type to indicate a vector should always be normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unit<T>(T);

impl Unit<Vec2> {
    pub fn new_normalize(v: Vec2) -> Self {
        Unit(v.normalized())
    }

    /// Normalize a vector, or return `None` if it has no direction.
    #[inline]
    pub fn try_new(v: Vec2) -> Option<Self> {
        let mag = v.mag();
        if mag > 0.0 && mag.is_finite() {
            Some(Unit(v / mag))
        } else {
            None
        }
    }

    pub const fn new_unchecked(v: Vec2) -> Self {
        Unit(v)
    }

    pub fn unit_x() -> Self {
        Unit(Vec2::unit_x())
    }

    pub fn unit_y() -> Self {
        Unit(Vec2::unit_y())
    }

    #[inline]
    pub fn into_inner(self) -> Vec2 {
        self.0
    }
}

impl<T> std::ops::Deref for Unit<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::Neg for Unit<T>
where
    T: std::ops::Neg,
{
    type Output = Unit<<T as std::ops::Neg>::Output>;

    fn neg(self) -> Self::Output {
        Unit(-self.0)
    }
}

// Vec2 utils

/// Reflect the part of `v` that points against `normal`,
/// scaling the reflected part by `restitution`.
///
/// A `v` that already points away from the normal's plane is returned unchanged.
#[inline]
pub fn reflect_against(v: Vec2, normal: Unit<Vec2>, restitution: f64) -> Vec2 {
    let normal_vel = v.dot(*normal);
    if normal_vel >= 0.0 {
        return v;
    }
    v - (1.0 + restitution) * normal_vel * *normal
}
