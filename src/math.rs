//! Fixed-point vector math
//!
//! `Vec2`, `Vec3` and `Vec4` are independent value types. Widening and
//! narrowing between them is explicit: `Vec3::from(Vec2)` pads z with zero,
//! `Vec4::from(Vec3)` pads w with one, `xy()`/`xyz()` drop components.
//!
//! Components are addressable by index (0=x, 1=y, 2=z, 3=w) so the clipper
//! can walk axes generically.

use crate::fixed::Fixed32;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

/// Operators shared by every vector arity: componentwise `+`/`-`, negation,
/// scalar `*` and `/` (scalar on either side for `*`), `dot`, `length`,
/// `checked_div`, `lerp` and indexed access.
macro_rules! impl_vector {
    ($name:ident { $($field:ident => $idx:literal),+ }) => {
        impl $name {
            /// Sum of pairwise products of matching components.
            #[inline]
            pub fn dot(&self, other: &Self) -> Fixed32 {
                let mut sum = Fixed32::ZERO;
                $(sum += self.$field * other.$field;)+
                sum
            }

            /// Euclidean length, `sqrt(dot(v, v))`. Precision is limited by
            /// [`Fixed32::sqrt`], which goes through `f32`.
            #[inline]
            pub fn length(&self) -> Fixed32 {
                self.dot(self).sqrt()
            }

            /// Divide every component by `scalar`, or `None` if it is zero.
            #[inline]
            pub fn checked_div(self, scalar: Fixed32) -> Option<Self> {
                Some(Self {
                    $($field: self.$field.checked_div(scalar)?,)+
                })
            }

            /// `self + (other - self) * t`. `t` is not clamped.
            #[inline]
            pub fn lerp(self, other: Self, t: Fixed32) -> Self {
                self + (other - self) * t
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, other: Self) -> Self {
                Self { $($field: self.$field + other.$field,)+ }
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, other: Self) -> Self {
                Self { $($field: self.$field - other.$field,)+ }
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self { $($field: -self.$field,)+ }
            }
        }

        impl Mul<Fixed32> for $name {
            type Output = Self;
            #[inline]
            fn mul(self, scalar: Fixed32) -> Self {
                Self { $($field: self.$field * scalar,)+ }
            }
        }

        impl Mul<$name> for Fixed32 {
            type Output = $name;
            #[inline]
            fn mul(self, v: $name) -> $name {
                v * self
            }
        }

        impl Div<Fixed32> for $name {
            type Output = Self;

            /// # Panics
            /// Panics if `scalar` is zero, like [`Fixed32`] division.
            #[inline]
            fn div(self, scalar: Fixed32) -> Self {
                Self { $($field: self.$field / scalar,)+ }
            }
        }

        impl Index<usize> for $name {
            type Output = Fixed32;
            #[inline]
            fn index(&self, i: usize) -> &Fixed32 {
                match i {
                    $($idx => &self.$field,)+
                    _ => panic!("{} index out of range: {}", stringify!($name), i),
                }
            }
        }

        impl IndexMut<usize> for $name {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut Fixed32 {
                match i {
                    $($idx => &mut self.$field,)+
                    _ => panic!("{} index out of range: {}", stringify!($name), i),
                }
            }
        }
    };
}

/// 2D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vec2 {
    pub x: Fixed32,
    pub y: Fixed32,
}

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vec3 {
    pub x: Fixed32,
    pub y: Fixed32,
    pub z: Fixed32,
}

/// Homogeneous 4D vector (clip-space position)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vec4 {
    pub x: Fixed32,
    pub y: Fixed32,
    pub z: Fixed32,
    pub w: Fixed32,
}

impl_vector!(Vec2 { x => 0, y => 1 });
impl_vector!(Vec3 { x => 0, y => 1, z => 2 });
impl_vector!(Vec4 { x => 0, y => 1, z => 2, w => 3 });

impl Vec2 {
    pub const ZERO: Self = Self::new(Fixed32::ZERO, Fixed32::ZERO);

    #[inline]
    pub const fn new(x: Fixed32, y: Fixed32) -> Self {
        Self { x, y }
    }
}

impl Vec3 {
    pub const ZERO: Self = Self::new(Fixed32::ZERO, Fixed32::ZERO, Fixed32::ZERO);

    #[inline]
    pub const fn new(x: Fixed32, y: Fixed32, z: Fixed32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Vec4 {
    pub const ZERO: Self = Self::new(Fixed32::ZERO, Fixed32::ZERO, Fixed32::ZERO, Fixed32::ZERO);

    #[inline]
    pub const fn new(x: Fixed32, y: Fixed32, z: Fixed32, w: Fixed32) -> Self {
        Self { x, y, z, w }
    }

    /// Point at (x, y, z) with w = 1.
    #[inline]
    pub const fn point(x: Fixed32, y: Fixed32, z: Fixed32) -> Self {
        Self::new(x, y, z, Fixed32::ONE)
    }

    /// Convenience constructor from floats (truncated to 16.16).
    pub fn from_f32(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self::new(
            Fixed32::from_f32(x),
            Fixed32::from_f32(y),
            Fixed32::from_f32(z),
            Fixed32::from_f32(w),
        )
    }

    #[inline]
    pub const fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub const fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Vec3 {
    #[inline]
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y, Fixed32::ZERO)
    }
}

impl From<Vec3> for Vec4 {
    #[inline]
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, Fixed32::ONE)
    }
}

impl From<Vec2> for Vec4 {
    #[inline]
    fn from(v: Vec2) -> Self {
        Vec3::from(v).into()
    }
}

// ============================================================================
// Mat4
// ============================================================================

/// 4x4 fixed-point matrix, row-major: `m[row][col]`.
///
/// `Mat4 * Vec4` treats the vector as a column, so `a * b * v` applies `b`
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mat4 {
    pub m: [[Fixed32; 4]; 4],
}

impl Mat4 {
    pub const ZERO: Self = Self {
        m: [[Fixed32::ZERO; 4]; 4],
    };

    pub const IDENTITY: Self = Self {
        m: [
            [Fixed32::ONE, Fixed32::ZERO, Fixed32::ZERO, Fixed32::ZERO],
            [Fixed32::ZERO, Fixed32::ONE, Fixed32::ZERO, Fixed32::ZERO],
            [Fixed32::ZERO, Fixed32::ZERO, Fixed32::ONE, Fixed32::ZERO],
            [Fixed32::ZERO, Fixed32::ZERO, Fixed32::ZERO, Fixed32::ONE],
        ],
    };

    pub fn translation(x: Fixed32, y: Fixed32, z: Fixed32) -> Self {
        let mut r = Self::IDENTITY;
        r.m[0][3] = x;
        r.m[1][3] = y;
        r.m[2][3] = z;
        r
    }

    pub fn scale(x: Fixed32, y: Fixed32, z: Fixed32) -> Self {
        let mut r = Self::IDENTITY;
        r.m[0][0] = x;
        r.m[1][1] = y;
        r.m[2][2] = z;
        r
    }

    /// Rotate around X axis (radians)
    pub fn rotation_x(angle: Fixed32) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let mut r = Self::IDENTITY;
        r.m[1][1] = c;
        r.m[1][2] = -s;
        r.m[2][1] = s;
        r.m[2][2] = c;
        r
    }

    /// Rotate around Y axis (radians)
    pub fn rotation_y(angle: Fixed32) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let mut r = Self::IDENTITY;
        r.m[0][0] = c;
        r.m[0][2] = s;
        r.m[2][0] = -s;
        r.m[2][2] = c;
        r
    }

    /// Rotate around Z axis (radians)
    pub fn rotation_z(angle: Fixed32) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let mut r = Self::IDENTITY;
        r.m[0][0] = c;
        r.m[0][1] = -s;
        r.m[1][0] = s;
        r.m[1][1] = c;
        r
    }

    /// OpenGL-style perspective projection into clip space.
    ///
    /// Entries are computed in `f32` and truncated to 16.16. The camera looks
    /// down -z; a point at `-near` lands on z = -w, at `-far` on z = w.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let mut r = Self::ZERO;
        r.m[0][0] = Fixed32::from_f32(f / aspect);
        r.m[1][1] = Fixed32::from_f32(f);
        r.m[2][2] = Fixed32::from_f32((far + near) / (near - far));
        r.m[2][3] = Fixed32::from_f32((2.0 * far * near) / (near - far));
        r.m[3][2] = -Fixed32::ONE;
        r
    }

    /// Matrix-vector product.
    pub fn transform(&self, v: Vec4) -> Vec4 {
        let row = |r: usize| {
            self.m[r][0] * v.x + self.m[r][1] * v.y + self.m[r][2] * v.z + self.m[r][3] * v.w
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Add for Mat4 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let mut n = Self::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                n.m[r][c] = self.m[r][c] + other.m[r][c];
            }
        }
        n
    }
}

impl Mul for Mat4 {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        let mut n = Self::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                let mut sum = Fixed32::ZERO;
                for k in 0..4 {
                    sum += self.m[r][k] * other.m[k][c];
                }
                n.m[r][c] = sum;
            }
        }
        n
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, v: Vec4) -> Vec4 {
        self.transform(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(v: f32) -> Fixed32 {
        Fixed32::from_f32(v)
    }

    #[test]
    fn test_componentwise_ops() {
        let a = Vec3::new(fx(1.0), fx(2.0), fx(3.0));
        let b = Vec3::new(fx(0.5), fx(-1.0), fx(4.0));
        assert_eq!(a + b, Vec3::new(fx(1.5), fx(1.0), fx(7.0)));
        assert_eq!(a - b, Vec3::new(fx(0.5), fx(3.0), fx(-1.0)));
        assert_eq!(-a, Vec3::new(fx(-1.0), fx(-2.0), fx(-3.0)));
    }

    #[test]
    fn test_vec4_add_uses_matching_components() {
        let a = Vec4::from_f32(1.0, 2.0, 3.0, 4.0);
        let b = Vec4::from_f32(10.0, 20.0, 30.0, 40.0);
        assert_eq!(a + b, Vec4::from_f32(11.0, 22.0, 33.0, 44.0));
        assert_eq!(b - a, Vec4::from_f32(9.0, 18.0, 27.0, 36.0));
    }

    #[test]
    fn test_scalar_mul_div() {
        let v = Vec2::new(fx(3.0), fx(-4.0));
        assert_eq!(v * fx(2.0), Vec2::new(fx(6.0), fx(-8.0)));
        assert_eq!(fx(2.0) * v, v * fx(2.0));
        assert_eq!(v / fx(2.0), Vec2::new(fx(1.5), fx(-2.0)));
        assert_eq!(v.checked_div(Fixed32::ZERO), None);
    }

    #[test]
    fn test_dot_and_length() {
        let v = Vec2::new(fx(3.0), fx(4.0));
        assert_eq!(v.dot(&v), fx(25.0));
        assert_eq!(v.length(), fx(5.0));

        let a = Vec4::from_f32(1.0, 2.0, 3.0, 4.0);
        assert_eq!(a.dot(&a), fx(30.0));

        let u = Vec3::new(fx(2.0), fx(3.0), fx(6.0));
        assert_eq!(u.length(), fx(7.0));
    }

    #[test]
    fn test_indexing() {
        let mut v = Vec4::from_f32(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v[0], fx(1.0));
        assert_eq!(v[1], fx(2.0));
        assert_eq!(v[2], fx(3.0));
        assert_eq!(v[3], fx(4.0));
        v[2] = fx(9.0);
        assert_eq!(v.z, fx(9.0));
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn test_index_out_of_range() {
        let v = Vec3::ZERO;
        let _ = v[3].raw();
    }

    #[test]
    fn test_widen_narrow() {
        let v2 = Vec2::new(fx(1.0), fx(2.0));
        assert_eq!(Vec3::from(v2), Vec3::new(fx(1.0), fx(2.0), Fixed32::ZERO));
        assert_eq!(Vec4::from(v2), Vec4::from_f32(1.0, 2.0, 0.0, 1.0));
        let v4 = Vec4::from_f32(5.0, 6.0, 7.0, 8.0);
        assert_eq!(v4.xyz(), Vec3::new(fx(5.0), fx(6.0), fx(7.0)));
        assert_eq!(v4.xy(), Vec2::new(fx(5.0), fx(6.0)));
    }

    #[test]
    fn test_lerp() {
        let a = Vec4::from_f32(0.0, 0.0, 0.0, 1.0);
        let b = Vec4::from_f32(2.0, -4.0, 0.0, 1.0);
        assert_eq!(a.lerp(b, Fixed32::HALF), Vec4::from_f32(1.0, -2.0, 0.0, 1.0));
    }

    #[test]
    fn test_mat4_identity_and_translation() {
        let p = Vec4::from_f32(1.0, 2.0, 3.0, 1.0);
        assert_eq!(Mat4::IDENTITY * p, p);
        let t = Mat4::translation(fx(1.0), fx(-1.0), fx(0.5));
        assert_eq!(t * p, Vec4::from_f32(2.0, 1.0, 3.5, 1.0));
        // Directions (w = 0) ignore translation
        let d = Vec4::from_f32(1.0, 0.0, 0.0, 0.0);
        assert_eq!(t * d, d);
    }

    #[test]
    fn test_mat4_compose() {
        let s = Mat4::scale(fx(2.0), fx(2.0), fx(2.0));
        let t = Mat4::translation(fx(1.0), Fixed32::ZERO, Fixed32::ZERO);
        let p = Vec4::from_f32(1.0, 1.0, 1.0, 1.0);
        // Scale first, then translate
        assert_eq!((t * s) * p, Vec4::from_f32(3.0, 2.0, 2.0, 1.0));
        assert_eq!(Mat4::IDENTITY * t, t);
        assert_eq!(
            (Mat4::IDENTITY + Mat4::IDENTITY) * p,
            Vec4::from_f32(2.0, 2.0, 2.0, 2.0)
        );
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let half_pi = Fixed32::PI / fx(2.0);
        let r = Mat4::rotation_z(half_pi) * Vec4::from_f32(1.0, 0.0, 0.0, 1.0);
        let tolerance = Fixed32::from_raw(16);
        assert!(r.x.abs() < tolerance);
        assert!((r.y - Fixed32::ONE).abs() < tolerance);
    }

    #[test]
    fn test_perspective_maps_near_and_far_planes() {
        let p = Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 10.0);
        let tolerance = Fixed32::from_raw(64);

        let near = p * Vec4::from_f32(0.0, 0.0, -1.0, 1.0);
        assert!((near.z + near.w).abs() < tolerance, "near {:?}", near);

        let far = p * Vec4::from_f32(0.0, 0.0, -10.0, 1.0);
        assert!((far.z - far.w).abs() < tolerance, "far {:?}", far);
        assert_eq!(far.w, fx(10.0));
    }
}
