//! Ordering capabilities shared by the skip lists and the priority queue.
//!
//! Structures take their comparator as a type parameter, so the ordering is
//! fixed at construction time instead of being re-derived on every call.
//!
//! ```rust
//! use std::cmp::Ordering;
//! use strata::compare::{Comparator, NaturalOrder, Reverse, TotalOrder};
//!
//! assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
//! assert_eq!(NaturalOrder.compare(&"b", &"a"), Ordering::Greater);
//! assert_eq!(TotalOrder.compare(&0.5_f32, &f32::NAN), Ordering::Less);
//! assert_eq!(Reverse(NaturalOrder).compare(&1, &2), Ordering::Greater);
//!
//! let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
//! assert_eq!(by_len.compare(&"abc", &"z"), Ordering::Greater);
//! ```

use std::cmp::Ordering;

/// A total order over `T`.
pub trait Comparator<T: ?Sized> {
    /// Compare `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// `true` when `a` sorts strictly before `b`.
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// The type's own `Ord` implementation: numeric for integers, lexicographic for strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// IEEE 754 total ordering for floats (NaN-safe, `-0.0 < +0.0`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalOrder;

impl Comparator<f32> for TotalOrder {
    #[inline]
    fn compare(&self, a: &f32, b: &f32) -> Ordering {
        a.total_cmp(b)
    }
}

impl Comparator<f64> for TotalOrder {
    #[inline]
    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }
}

/// Inverts the wrapped comparator. `PriorityQueue<T, Reverse<NaturalOrder>>` is a max-heap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
