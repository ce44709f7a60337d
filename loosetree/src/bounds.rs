// Copyright 2026 the Loosetree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction and the bounding-box primitive.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Numeric scalar abstraction for box coordinates.
///
/// Provides the minimal arithmetic the tree needs: ordering, addition,
/// subtraction, and truncating halving (the split law relies on `half`
/// truncating for integer scalars). Integer impls saturate on `add`/`sub`;
/// float impls assume no NaNs (debug builds may assert).
pub trait Coord: Copy + PartialOrd + Debug {
    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// One value for the scalar type (smallest useful extent).
    fn one() -> Self;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Halve a value, truncating toward zero for integers.
    fn half(v: Self) -> Self;

    /// Double a value.
    #[inline]
    fn dbl(v: Self) -> Self {
        Self::add(v, v)
    }
}

macro_rules! impl_coord_int {
    ($($t:ty),*) => {
        $(impl Coord for $t {
            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn add(a: Self, b: Self) -> Self {
                a.saturating_add(b)
            }

            #[inline]
            fn sub(a: Self, b: Self) -> Self {
                a.saturating_sub(b)
            }

            #[inline]
            fn half(v: Self) -> Self {
                v / 2
            }
        })*
    };
}

impl_coord_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl Coord for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn half(v: Self) -> Self {
        0.5 * v
    }
}

impl Coord for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn half(v: Self) -> Self {
        0.5 * v
    }
}

/// Axis-aligned bounding box over the half-open region
/// `[left, left+width) × [top, top+height)`.
///
/// `width` and `height` must be non-negative; the structure never validates
/// or corrects malformed boxes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundingBox<T> {
    /// Minimum x.
    pub left: T,
    /// Minimum y.
    pub top: T,
    /// Horizontal extent.
    pub width: T,
    /// Vertical extent.
    pub height: T,
}

impl<T> BoundingBox<T> {
    /// Create a box from its origin and size.
    pub const fn new(left: T, top: T, width: T, height: T) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

impl<T: Coord> BoundingBox<T> {
    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> T {
        T::add(self.left, self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> T {
        T::add(self.top, self.height)
    }

    /// Whether this box fully contains `other`.
    ///
    /// A box contains itself, and a box whose far edge exactly touches this
    /// box's far edge is still contained.
    pub fn contains(&self, other: &Self) -> bool {
        le(self.left, other.left)
            && le(self.top, other.top)
            && le(other.right(), self.right())
            && le(other.bottom(), self.bottom())
    }

    /// Whether this box contains the point `(x, y)` under half-open
    /// semantics: the left/top edges are inside, the right/bottom are not.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.left, x) && le(self.top, y) && lt(x, self.right()) && lt(y, self.bottom())
    }

    /// Whether the interiors of the two boxes overlap on both axes.
    ///
    /// Boxes that merely touch edge-to-edge do **not** intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        lt(self.left, other.right())
            && lt(other.left, self.right())
            && lt(self.top, other.bottom())
            && lt(other.top, self.bottom())
    }

    /// The loose expansion of this region: grown by half its width on each
    /// horizontal side and half its height on each vertical side, so the
    /// result is conceptually double the extent, centered on the tight cell.
    ///
    /// Saturates at the scalar's range ends for integer types.
    pub(crate) fn loose(&self) -> Self {
        let half_w = T::half(self.width);
        let half_h = T::half(self.height);
        let left = T::sub(self.left, half_w);
        let top = T::sub(self.top, half_h);
        Self {
            left,
            top,
            width: T::sub(T::add(self.right(), half_w), left),
            height: T::sub(T::add(self.bottom(), half_h), top),
        }
    }
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}
