use std::{
    borrow::Cow,
    cmp::Ordering,
    fmt::{Display, Error, Formatter},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use rand::Rng;
use rug::{ops::Pow, Complete, Integer as MultiPrecisionInteger};

use super::Ring;

/// The integer ring.
pub type Z = IntegerRing;
/// The integer ring.
pub const Z: IntegerRing = IntegerRing::new();

/// The integer ring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IntegerRing;

impl Default for IntegerRing {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegerRing {
    pub const fn new() -> IntegerRing {
        IntegerRing
    }
}

/// An arbitrary-precision integer. The value is always stored in
/// the smallest variant that can hold it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Integer {
    Natural(i64),
    Double(i128),
    Large(MultiPrecisionInteger),
}

macro_rules! from_with_cast {
    ($base: ty) => {
        impl From<$base> for Integer {
            #[inline]
            fn from(value: $base) -> Self {
                Integer::Natural(value as i64)
            }
        }

        impl PartialEq<$base> for Integer {
            #[inline]
            fn eq(&self, other: &$base) -> bool {
                match self {
                    Integer::Natural(n) => *n == *other as i64,
                    _ => false,
                }
            }
        }

        impl PartialEq<Integer> for $base {
            #[inline]
            fn eq(&self, other: &Integer) -> bool {
                other == self
            }
        }
    };
}

from_with_cast!(i8);
from_with_cast!(i16);
from_with_cast!(i32);
from_with_cast!(i64);
from_with_cast!(u8);
from_with_cast!(u16);
from_with_cast!(u32);

impl From<i128> for Integer {
    #[inline]
    fn from(value: i128) -> Self {
        Integer::from_double(value)
    }
}

impl From<u64> for Integer {
    #[inline]
    fn from(value: u64) -> Self {
        if value <= i64::MAX as u64 {
            Integer::Natural(value as i64)
        } else {
            Integer::Double(value as i128)
        }
    }
}

impl From<MultiPrecisionInteger> for Integer {
    /// Convert from a multi-precision integer to an Integer, potentially
    /// downcasting the number.
    #[inline]
    fn from(n: MultiPrecisionInteger) -> Self {
        if let Some(n) = n.to_i64() {
            Integer::Natural(n)
        } else if let Some(n) = n.to_i128() {
            Integer::Double(n)
        } else {
            Integer::Large(n)
        }
    }
}

impl std::fmt::Debug for Integer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Integer {
    #[inline]
    pub fn zero() -> Integer {
        Integer::Natural(0)
    }

    #[inline]
    pub fn one() -> Integer {
        Integer::Natural(1)
    }

    /// Create an integer from an `i128`, using the smallest variant that fits.
    #[inline]
    pub fn from_double(n: i128) -> Integer {
        match i64::try_from(n) {
            Ok(n) => Integer::Natural(n),
            Err(_) => Integer::Double(n),
        }
    }

    /// Restore the smallest representation after an in-place update of a large integer.
    #[inline]
    fn simplify(&mut self) {
        if let Integer::Large(l) = self {
            if let Some(n) = l.to_i128() {
                *self = Integer::from_double(n);
            }
        }
    }

    /// Borrow a large integer, or convert a small one.
    pub fn as_multi_prec(&self) -> Cow<'_, MultiPrecisionInteger> {
        match self {
            Integer::Natural(n) => Cow::Owned((*n).into()),
            Integer::Double(n) => Cow::Owned((*n).into()),
            Integer::Large(l) => Cow::Borrowed(l),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Integer::Natural(0)
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        *self == Integer::Natural(1)
    }

    #[inline]
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Integer::Natural(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn to_i128(&self) -> Option<i128> {
        match self {
            Integer::Natural(n) => Some(*n as i128),
            Integer::Double(n) => Some(*n),
            Integer::Large(_) => None,
        }
    }

    /// The number of bits needed to store the absolute value.
    #[inline]
    pub fn bits(&self) -> u32 {
        match self {
            Integer::Natural(n) => u64::BITS - n.unsigned_abs().leading_zeros(),
            Integer::Double(n) => u128::BITS - n.unsigned_abs().leading_zeros(),
            Integer::Large(r) => r.significant_bits(),
        }
    }

    /// Compare the absolute values.
    pub fn abs_cmp(&self, other: &Self) -> Ordering {
        match (self.to_i128(), other.to_i128()) {
            (Some(a), Some(b)) => a.unsigned_abs().cmp(&b.unsigned_abs()),
            _ => self.as_multi_prec().cmp_abs(&other.as_multi_prec()),
        }
    }

    pub fn pow(&self, e: u32) -> Integer {
        if let Some(n) = self.to_i128().and_then(|n| n.checked_pow(e)) {
            Integer::from_double(n)
        } else {
            Integer::from(self.as_multi_prec().into_owned().pow(e))
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Integer::Natural(n) => n.fmt(f),
            Integer::Double(n) => n.fmt(f),
            Integer::Large(r) => r.fmt(f),
        }
    }
}

impl Display for IntegerRing {
    fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (Integer::Large(n1), Integer::Large(n2)) => n1.cmp(n2),
            (Integer::Large(n1), _) => n1.cmp0(),
            (_, Integer::Large(n2)) => n2.cmp0().reverse(),
            _ => self.to_i128().cmp(&other.to_i128()),
        }
    }
}

impl Ring for IntegerRing {
    type Element = Integer;

    #[inline]
    fn add(&self, a: &Integer, b: &Integer) -> Integer {
        a + b
    }

    #[inline]
    fn sub(&self, a: &Integer, b: &Integer) -> Integer {
        a - b
    }

    #[inline]
    fn mul(&self, a: &Integer, b: &Integer) -> Integer {
        a * b
    }

    #[inline]
    fn add_assign(&self, a: &mut Integer, b: &Integer) {
        *a += b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Integer, b: &Integer) {
        *a *= b;
    }

    #[inline]
    fn neg(&self, a: &Integer) -> Integer {
        -a
    }

    #[inline]
    fn zero(&self) -> Integer {
        Integer::zero()
    }

    #[inline]
    fn one(&self) -> Integer {
        Integer::one()
    }

    #[inline]
    fn is_zero(a: &Integer) -> bool {
        a.is_zero()
    }

    #[inline]
    fn is_one(&self, a: &Integer) -> bool {
        a.is_one()
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Integer {
        Integer::Natural(rng.gen_range(range.0..range.1))
    }

    fn fmt_display(
        &self,
        element: &Integer,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        element.fmt(f)
    }
}

/// Implement a binary operator that first tries native arithmetic
/// and falls back to GMP on overflow.
macro_rules! impl_binary_op {
    ($op: ident, $method: ident, $checked: ident) => {
        impl<'a, 'b> $op<&'b Integer> for &'a Integer {
            type Output = Integer;

            #[inline(always)]
            fn $method(self, rhs: &'b Integer) -> Integer {
                if let (Integer::Natural(a), Integer::Natural(b)) = (self, rhs) {
                    if let Some(r) = a.$checked(*b) {
                        return Integer::Natural(r);
                    }
                }

                if let (Some(a), Some(b)) = (self.to_i128(), rhs.to_i128()) {
                    if let Some(r) = a.$checked(b) {
                        return Integer::from_double(r);
                    }
                }

                Integer::from((&*self.as_multi_prec()).$method(&*rhs.as_multi_prec()).complete())
            }
        }

        impl<'a> $op<&'a Integer> for Integer {
            type Output = Integer;

            #[inline(always)]
            fn $method(self, rhs: &'a Integer) -> Integer {
                (&self).$method(rhs)
            }
        }

        impl $op<Integer> for Integer {
            type Output = Integer;

            #[inline(always)]
            fn $method(self, rhs: Integer) -> Integer {
                (&self).$method(&rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, checked_add);
impl_binary_op!(Sub, sub, checked_sub);
impl_binary_op!(Mul, mul, checked_mul);

/// Implement a compound assignment that updates large integers in place.
macro_rules! impl_assign_op {
    ($op: ident, $method: ident, $binary: ident) => {
        impl<'a> $op<&'a Integer> for Integer {
            #[inline(always)]
            fn $method(&mut self, rhs: &'a Integer) {
                if let Integer::Large(l) = self {
                    match rhs {
                        Integer::Natural(r) => l.$method(*r),
                        Integer::Double(r) => l.$method(*r),
                        Integer::Large(r) => l.$method(r),
                    }
                    self.simplify();
                } else {
                    *self = (&*self).$binary(rhs);
                }
            }
        }

        impl $op<Integer> for Integer {
            #[inline(always)]
            fn $method(&mut self, rhs: Integer) {
                self.$method(&rhs);
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, add);
impl_assign_op!(SubAssign, sub_assign, sub);
impl_assign_op!(MulAssign, mul_assign, mul);

impl Neg for Integer {
    type Output = Integer;

    #[inline]
    fn neg(self) -> Integer {
        match self {
            Integer::Large(r) => Integer::from(-r),
            n => -&n,
        }
    }
}

impl<'a> Neg for &'a Integer {
    type Output = Integer;

    #[inline]
    fn neg(self) -> Integer {
        match self.to_i128().and_then(|n| n.checked_neg()) {
            Some(n) => Integer::from_double(n),
            None => Integer::from(-self.as_multi_prec().into_owned()),
        }
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use super::Integer;

    #[test]
    fn binary_ops() {
        let a = Integer::from(5);
        let b: Integer = 7.into();

        assert_eq!(&a + &b, 12);
        assert_eq!(&a - &b, -2);
        assert_eq!(&a * &b, 35);

        let c = Integer::from(i64::MAX);
        let d = &c + &c;
        assert_eq!(d, Integer::Double(2 * i64::MAX as i128));
        assert_eq!(&d - &c, c);

        let e = Integer::from(5123123132i64).pow(5);
        assert!(matches!(e, Integer::Large(_)));
        let f = &(&e * &e) - &(&e * &e);
        assert_eq!(f, Integer::Natural(0));

        let mut g = e.clone();
        g -= &e;
        g += Integer::from(3);
        assert_eq!(g, Integer::Natural(3));
        g *= &e;
        assert_eq!(g, &e + &(&e + &e));
    }

    #[test]
    fn negation() {
        assert_eq!(-Integer::from(i64::MIN), Integer::Double(1 << 63));
        assert_eq!(-Integer::Double(1 << 63), Integer::Natural(i64::MIN));

        let min = Integer::from(i128::MIN);
        assert!(matches!(-&min, Integer::Large(_)));
        assert_eq!(-(-&min), min);
    }

    #[test]
    fn bits() {
        assert_eq!(Integer::zero().bits(), 0);
        assert_eq!(Integer::from(-1).bits(), 1);
        assert_eq!(Integer::from(255).bits(), 8);
        assert_eq!(Integer::from(i64::MIN).bits(), 64);
        assert_eq!(Integer::from(2).pow(100).bits(), 101);
        assert_eq!((-Integer::from(2).pow(200)).bits(), 201);
    }

    #[test]
    fn ordering() {
        let big = Integer::from(2).pow(200);
        assert!(Integer::from(-3) < Integer::from(2));
        assert!(-&big < Integer::from(i128::MIN));
        assert!(big > Integer::from(i128::MAX));

        assert_eq!(Integer::from(-9).abs_cmp(&Integer::from(4)), Ordering::Greater);
        assert_eq!((-&big).abs_cmp(&big), Ordering::Equal);
        assert_eq!(Integer::from(i128::MIN).abs_cmp(&big), Ordering::Less);
    }
}
