use crate::foundation::core::{Point, Rgba8, Vec2};

/// Componentwise interpolation between two snapshots.
///
/// Implementations must return exactly `a` at `t == 0` and exactly `b` at `t == 1`; the
/// resolver's boundary guarantees depend on it. `t` outside `[0, 1]` extrapolates.
pub trait Lerp: Sized {
    /// Value between `a` and `b` at progress `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

/// Two-sided form: exact at both endpoints, unlike `a + (b - a) * t`.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Step function used for values that are swapped rather than tweened.
///
/// Before the half-way point the element shows `a`, at and after it `b`.
#[inline]
pub fn swap<'a, T>(a: &'a T, b: &'a T, t: f64) -> &'a T {
    if t < 0.5 { a } else { b }
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp_f64(*a, *b, t)
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp_f64(f64::from(*a), f64::from(*b), t) as f32
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(lerp_f64(a.x, b.x, t), lerp_f64(a.y, b.y, t))
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(lerp_f64(a.x, b.x, t), lerp_f64(a.y, b.y, t))
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            lerp_f64(f64::from(a), f64::from(b), t)
                .round()
                .clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// Raw text is never tweened.
impl Lerp for String {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        swap(a, b, t).clone()
    }
}

/// Present on both sides: interpolate. Otherwise swap at the half-way point.
impl<T: Lerp + Clone> Lerp for Option<T> {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Some(a), Some(b)) => Some(T::lerp(a, b, t)),
            _ => swap(a, b, t).clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/lerp.rs"]
mod tests;
