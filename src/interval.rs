//! Integer intervals with the four combinations of open and closed ends.
//!
//! All kinds convert to the half-open [`CO`] form, and the shared operations in
//! [`Interval`] are written once against it.

use num_traits::{PrimInt, Signed};
use std::cmp::{max, min};
use std::fmt;
use std::ops::{Range, RangeInclusive};

pub trait Bound: PrimInt + Signed + fmt::Debug {}

impl<T: PrimInt + Signed + fmt::Debug> Bound for T {}

pub trait Interval<T: Bound>: Copy + Sized {
    fn to_co(self) -> CO<T>;

    fn from_co(co: CO<T>) -> Self;

    fn is_empty(self) -> bool {
        let co = self.to_co();
        co.min == co.max
    }

    /// Number of integers inside.
    fn len(self) -> T {
        let co = self.to_co();
        co.max - co.min
    }

    fn contains(self, v: T) -> bool {
        let co = self.to_co();
        co.min <= v && v < co.max
    }

    /// The common part; empty if the intervals are disjoint.
    fn intersect(self, other: Self) -> Self {
        let (a, b) = (self.to_co(), other.to_co());
        let lo = max(a.min, b.min);
        let hi = max(lo, min(a.max, b.max));
        Self::from_co(CO { min: lo, max: hi })
    }

    fn intersects(self, other: Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// The union, if it is a single contiguous interval.
    fn union(self, other: Self) -> Option<Self> {
        let (a, b) = (self.to_co(), other.to_co());
        if a.is_empty() {
            return Some(other);
        }
        if b.is_empty() {
            return Some(self);
        }
        (a.min <= b.max && b.min <= a.max).then(|| {
            Self::from_co(CO {
                min: min(a.min, b.min),
                max: max(a.max, b.max),
            })
        })
    }

    /// The integers inside, ascending.
    fn iter(self) -> Points<T> {
        let co = self.to_co();
        Points {
            next: co.min,
            end: co.max,
        }
    }
}

/// Iterator over the integers of an interval.
pub struct Points<T> {
    next: T,
    end: T,
}

impl<T: Bound> Iterator for Points<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        (self.next < self.end).then(|| {
            let v = self.next;
            self.next = v + T::one();
            v
        })
    }
}

impl<T: Bound> DoubleEndedIterator for Points<T> {
    fn next_back(&mut self) -> Option<T> {
        (self.next < self.end).then(|| {
            self.end = self.end - T::one();
            self.end
        })
    }
}

macro_rules! interval_kind {
    ($(#[$doc:meta])* $name:ident, $open:literal, $close:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name<T> {
            pub min: T,
            pub max: T,
        }

        impl<T: Bound> $name<T> {
            /// # Panics
            ///
            /// Panics if the bounds do not describe a (possibly empty) interval.
            pub fn new(min: T, max: T) -> Self {
                let i = Self { min, max };
                assert!(
                    i.is_valid(),
                    concat!("malformed interval ", $open, "{:?}, {:?}", $close),
                    min,
                    max
                );
                i
            }
        }

        impl<T: fmt::Debug> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($open, "{:?}, {:?}", $close), self.min, self.max)
            }
        }
    };
}

interval_kind!(
    /// `[min, max)`.
    CO, "[", ")"
);
interval_kind!(
    /// `(min, max]`.
    OC, "(", "]"
);
interval_kind!(
    /// `(min, max)`.
    OO, "(", ")"
);
interval_kind!(
    /// `[min, max]`.
    CC, "[", "]"
);

impl<T: Bound> CO<T> {
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// The empty interval positioned at `at`.
    pub fn empty(at: T) -> Self {
        Self { min: at, max: at }
    }
}

impl<T: Bound> OC<T> {
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

impl<T: Bound> OO<T> {
    pub fn is_valid(&self) -> bool {
        self.min < self.max
    }
}

impl<T: Bound> CC<T> {
    pub fn is_valid(&self) -> bool {
        self.min <= self.max + T::one()
    }
}

impl<T: Bound> Interval<T> for CO<T> {
    fn to_co(self) -> CO<T> {
        self
    }

    fn from_co(co: CO<T>) -> Self {
        co
    }
}

impl<T: Bound> Interval<T> for OC<T> {
    fn to_co(self) -> CO<T> {
        CO {
            min: self.min + T::one(),
            max: self.max + T::one(),
        }
    }

    fn from_co(co: CO<T>) -> Self {
        Self {
            min: co.min - T::one(),
            max: co.max - T::one(),
        }
    }
}

impl<T: Bound> Interval<T> for OO<T> {
    fn to_co(self) -> CO<T> {
        CO {
            min: self.min + T::one(),
            max: self.max,
        }
    }

    fn from_co(co: CO<T>) -> Self {
        Self {
            min: co.min - T::one(),
            max: co.max,
        }
    }
}

impl<T: Bound> Interval<T> for CC<T> {
    fn to_co(self) -> CO<T> {
        CO {
            min: self.min,
            max: self.max + T::one(),
        }
    }

    fn from_co(co: CO<T>) -> Self {
        Self {
            min: co.min,
            max: co.max - T::one(),
        }
    }
}

impl<T: Bound> From<Range<T>> for CO<T> {
    fn from(r: Range<T>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl<T: Bound> From<RangeInclusive<T>> for CC<T> {
    fn from(r: RangeInclusive<T>) -> Self {
        let (min, max) = r.into_inner();
        Self::new(min, max)
    }
}
