pub mod divrem;
pub mod monomial;
pub mod packing;
pub mod polynomial;

use std::cmp::Ordering::{self, Equal};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add, Sub};

use smartstring::{LazyCompact, SmartString};

pub trait Exponent:
    Hash
    + Debug
    + Display
    + Ord
    + Sub<Output = Self>
    + Add<Output = Self>
    + Clone
    + Copy
    + PartialEq
    + Eq
    + Send
    + Sync
    + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    /// Convert the exponent to `u32`. This is always possible, as `u32` is the largest supported exponent type.
    fn to_u32(&self) -> u32;
    /// Convert from `u32`. This function may panic if the exponent is too large.
    fn from_u32(n: u32) -> Self;
    /// Convert from `u64`, yielding `None` if the value does not fit.
    fn try_from_u64(n: u64) -> Option<Self>;
    fn is_zero(&self) -> bool;
    fn checked_add(&self, other: &Self) -> Option<Self>;
}

macro_rules! impl_exponent {
    ($t: ty) => {
        impl Exponent for $t {
            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn to_u32(&self) -> u32 {
                *self as u32
            }

            #[inline]
            fn from_u32(n: u32) -> Self {
                if n <= <$t>::MAX as u32 {
                    n as $t
                } else {
                    panic!("Exponent {} too large for {}", n, stringify!($t));
                }
            }

            #[inline]
            fn try_from_u64(n: u64) -> Option<Self> {
                <$t>::try_from(n).ok()
            }

            #[inline]
            fn is_zero(&self) -> bool {
                *self == 0
            }

            #[inline]
            fn checked_add(&self, other: &Self) -> Option<Self> {
                <$t>::checked_add(*self, *other)
            }
        }
    };
}

impl_exponent!(u8);
impl_exponent!(u16);
impl_exponent!(u32);

/// A well-order of monomials.
///
/// Besides the comparison itself, an order describes its shape, so that
/// packed monomials can be compared with plain word comparisons:
/// a graded order compares the total degree first, and a reversed order breaks
/// ties on the last variable, where the smaller exponent ranks higher.
pub trait MonomialOrder: Clone + Copy + Debug + PartialEq + Eq + Hash + Send + Sync + 'static {
    const GRADED: bool;
    const REVERSE: bool;

    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering;
}

#[inline]
fn total_degree<E: Exponent>(a: &[E]) -> u64 {
    a.iter().map(|e| e.to_u32() as u64).sum()
}

/// Graded reverse lexicographic ordering of monomials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GrevLexOrder {}

impl MonomialOrder for GrevLexOrder {
    const GRADED: bool = true;
    const REVERSE: bool = true;

    #[inline]
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
        match total_degree(a).cmp(&total_degree(b)) {
            Equal => {}
            x => {
                return x;
            }
        }

        for (a1, a2) in a.iter().rev().zip(b.iter().rev()) {
            match a1.cmp(a2) {
                Equal => {}
                x => {
                    return x.reverse();
                }
            }
        }

        Equal
    }
}

/// Graded lexicographic ordering of monomials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DegLexOrder {}

impl MonomialOrder for DegLexOrder {
    const GRADED: bool = true;
    const REVERSE: bool = false;

    #[inline]
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
        total_degree(a)
            .cmp(&total_degree(b))
            .then_with(|| a.cmp(b))
    }
}

/// Lexicographic ordering of monomials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LexOrder {}

impl MonomialOrder for LexOrder {
    const GRADED: bool = false;
    const REVERSE: bool = false;

    #[inline]
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
        a.cmp(b)
    }
}

/// A named polynomial variable.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Variable(SmartString<LazyCompact>);

impl From<&str> for Variable {
    fn from(name: &str) -> Variable {
        Variable(name.into())
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use super::{DegLexOrder, Exponent, GrevLexOrder, LexOrder, MonomialOrder};

    #[test]
    fn orders() {
        // x*y^2 vs x^2*z with x > y > z
        let a: [u16; 3] = [1, 2, 0];
        let b: [u16; 3] = [2, 0, 1];

        assert_eq!(LexOrder::cmp(&a, &b), Ordering::Less);
        assert_eq!(DegLexOrder::cmp(&a, &b), Ordering::Less);
        assert_eq!(GrevLexOrder::cmp(&a, &b), Ordering::Greater);

        let c: [u16; 3] = [0, 0, 4];
        assert_eq!(LexOrder::cmp(&a, &c), Ordering::Greater);
        assert_eq!(DegLexOrder::cmp(&a, &c), Ordering::Less);
        assert_eq!(GrevLexOrder::cmp(&a, &c), Ordering::Less);
    }

    #[test]
    fn exponent_conversion() {
        assert_eq!(u8::try_from_u64(255), Some(255));
        assert_eq!(u8::try_from_u64(256), None);
        assert_eq!(u32::try_from_u64(1 << 32), None);
        assert_eq!(Exponent::checked_add(&200u8, &100), None);
        assert_eq!(u16::from_u32(7), 7);
    }
}
