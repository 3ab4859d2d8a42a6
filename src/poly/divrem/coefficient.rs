use std::mem;

use rug::{integer::Order, Integer as MultiPrecisionInteger};
use tracing::trace;

use crate::domains::integer::Integer;

/// A signed 192-bit integer in two's complement, stored as three
/// words with the least significant word first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedAccumulator([u64; 3]);

impl FixedAccumulator {
    #[inline]
    pub fn from_i128(v: i128) -> Self {
        FixedAccumulator([v as u64, (v >> 64) as u64, if v < 0 { u64::MAX } else { 0 }])
    }

    #[inline]
    pub fn add_i128(&mut self, v: i128) {
        let w = Self::from_i128(v).0;
        let (s0, c0) = self.0[0].overflowing_add(w[0]);
        let (s1, c1) = self.0[1].overflowing_add(w[1]);
        let (s1, c2) = s1.overflowing_add(c0 as u64);
        let s2 = self.0[2]
            .wrapping_add(w[2])
            .wrapping_add((c1 | c2) as u64);
        self.0 = [s0, s1, s2];
    }

    /// Subtract `a * b`.
    #[inline]
    pub fn sub_mul(&mut self, a: i64, b: i64) {
        // |a * b| <= 2^126
        self.add_i128(-(a as i128 * b as i128));
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == [0, 0, 0]
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        (self.0[2] as i64) < 0
    }

    /// Convert to `i128`, if the value fits.
    #[inline]
    pub fn to_i128(&self) -> Option<i128> {
        let sign = if (self.0[1] as i64) < 0 { u64::MAX } else { 0 };
        if self.0[2] == sign {
            Some(((self.0[1] as u128) << 64 | self.0[0] as u128) as i128)
        } else {
            None
        }
    }

    pub fn to_multi_prec(&self) -> MultiPrecisionInteger {
        if !self.is_negative() {
            return MultiPrecisionInteger::from_digits(&self.0, Order::Lsf);
        }

        // the magnitude is the two's complement of the words
        let mut m = [!self.0[0], !self.0[1], !self.0[2]];
        let mut carry = true;
        for w in &mut m {
            if carry {
                let (s, c) = w.overflowing_add(1);
                *w = s;
                carry = c;
            }
        }

        -MultiPrecisionInteger::from_digits(&m, Order::Lsf)
    }

    pub fn to_integer(&self) -> Integer {
        if let Some(n) = self.to_i128() {
            Integer::from_double(n)
        } else {
            Integer::from(self.to_multi_prec())
        }
    }
}

/// The value of an accumulator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Coefficient {
    Fixed(FixedAccumulator),
    Big(MultiPrecisionInteger),
}

/// Sums the contributions to the coefficient of a single monomial.
///
/// The accumulator starts in fixed-width mode when the caller can bound all
/// intermediate values, and moves to arbitrary precision as soon as an operand
/// or a result does not fit. The move is permanent: [CoefficientAccumulator::reset]
/// keeps the mode.
#[derive(Clone, Debug)]
pub struct CoefficientAccumulator {
    value: Coefficient,
}

impl CoefficientAccumulator {
    pub fn new(fixed: bool) -> Self {
        CoefficientAccumulator {
            value: if fixed {
                Coefficient::Fixed(FixedAccumulator::default())
            } else {
                Coefficient::Big(MultiPrecisionInteger::new())
            },
        }
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self.value, Coefficient::Fixed(_))
    }

    #[inline]
    pub fn value(&self) -> &Coefficient {
        &self.value
    }

    /// Set the value to zero.
    #[inline]
    pub fn reset(&mut self) {
        match &mut self.value {
            Coefficient::Fixed(f) => *f = FixedAccumulator::default(),
            Coefficient::Big(b) => *b = MultiPrecisionInteger::new(),
        }
    }

    /// Switch to arbitrary precision.
    pub fn promote(&mut self) {
        if let Coefficient::Fixed(f) = &self.value {
            trace!("Promoting coefficient accumulator to arbitrary precision");
            self.value = Coefficient::Big(f.to_multi_prec());
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        match &self.value {
            Coefficient::Fixed(f) => f.is_zero(),
            Coefficient::Big(b) => *b == 0,
        }
    }

    /// Add a coefficient of the dividend.
    pub fn add(&mut self, c: &Integer) {
        if let Coefficient::Fixed(f) = &mut self.value {
            if let Some(n) = c.to_i128() {
                f.add_i128(n);
                return;
            }
            self.promote();
        }

        if let Coefficient::Big(b) = &mut self.value {
            match c {
                Integer::Natural(n) => *b += *n,
                Integer::Double(n) => *b += *n,
                Integer::Large(n) => *b += n,
            }
        }
    }

    /// Subtract the product of a generator coefficient and a quotient coefficient.
    pub fn sub_mul(&mut self, a: &Integer, b: &Integer) {
        if let Coefficient::Fixed(f) = &mut self.value {
            if let (Some(a), Some(b)) = (a.to_i64(), b.to_i64()) {
                f.sub_mul(a, b);
                return;
            }
            self.promote();
        }

        if let Coefficient::Big(v) = &mut self.value {
            match a * b {
                Integer::Natural(n) => *v -= n,
                Integer::Double(n) => *v -= n,
                Integer::Large(n) => *v -= n,
            }
        }
    }

    /// Divide the value by `lc`, rounding towards zero. The value is replaced
    /// by the remainder and the quotient is returned.
    ///
    /// In fixed-width mode a quotient must fit in 62 bits, so that products with
    /// other quotient coefficients stay bounded. A larger quotient promotes
    /// the accumulator.
    pub fn divide_trunc(&mut self, lc: &Integer) -> Integer {
        debug_assert!(!lc.is_zero());

        let fixed = match &self.value {
            Coefficient::Fixed(f) => f.to_i128(),
            Coefficient::Big(_) => None,
        };

        if let (Some(c), Some(l)) = (fixed, lc.to_i64()) {
            if let Some(q) = c.checked_div(l as i128) {
                if q.unsigned_abs() < 1 << 62 {
                    let r = c - q * l as i128;
                    self.value = Coefficient::Fixed(FixedAccumulator::from_i128(r));
                    return Integer::from_double(q);
                }
            }
        }

        self.promote();

        match &mut self.value {
            Coefficient::Big(b) => {
                let (q, r) = mem::take(b).div_rem(lc.as_multi_prec().into_owned());
                *b = r;
                Integer::from(q)
            }
            Coefficient::Fixed(_) => unreachable!("Accumulator was promoted"),
        }
    }

    pub fn to_integer(&self) -> Integer {
        match &self.value {
            Coefficient::Fixed(f) => f.to_integer(),
            Coefficient::Big(b) => Integer::from(b.clone()),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::domains::integer::Integer;

    use super::{CoefficientAccumulator, FixedAccumulator};

    #[test]
    fn fixed_width() {
        let mut f = FixedAccumulator::default();
        f.sub_mul(i64::MIN, i64::MIN);
        f.sub_mul(i64::MIN, i64::MIN);
        assert_eq!(f.to_i128(), Some(i128::MIN));

        f.sub_mul(i64::MIN, i64::MIN);
        assert_eq!(f.to_i128(), None);
        assert_eq!(
            f.to_integer(),
            -(&Integer::from(3) * &Integer::from(2).pow(126))
        );

        f.add_i128(i128::MAX);
        f.add_i128(i128::MAX);
        f.add_i128(3 << 125);
        f.add_i128(3 << 125);
        assert_eq!(f.to_integer(), &Integer::from(2).pow(128) - &Integer::from(2));

        let mut g = FixedAccumulator::from_i128(-5);
        g.add_i128(5);
        assert!(g.is_zero());
    }

    #[test]
    fn modes_agree() {
        let coeffs = [
            Integer::from(i64::MAX),
            Integer::from(-7),
            Integer::from(i64::MIN),
            Integer::from(123456789),
        ];

        let mut fixed = CoefficientAccumulator::new(true);
        let mut big = CoefficientAccumulator::new(false);
        for acc in [&mut fixed, &mut big] {
            acc.add(&Integer::from(i128::MAX));
            for a in &coeffs {
                for b in &coeffs {
                    acc.sub_mul(a, b);
                }
            }
        }

        assert!(fixed.is_fixed());
        assert!(!big.is_fixed());
        assert_eq!(fixed.to_integer(), big.to_integer());

        let lc = Integer::from(-1000);
        assert_eq!(fixed.divide_trunc(&lc), big.divide_trunc(&lc));
        assert_eq!(fixed.to_integer(), big.to_integer());
        assert!(!fixed.is_fixed());
    }

    #[test]
    fn truncating_quotient() {
        let mut acc = CoefficientAccumulator::new(true);
        acc.add(&Integer::from(-7));
        assert_eq!(acc.divide_trunc(&Integer::from(2)), -3);
        assert_eq!(acc.to_integer(), -1);
        assert!(acc.is_fixed());

        acc.reset();
        assert!(acc.is_zero());

        // quotients of 62 bits or more leave fixed-width mode
        acc.add(&Integer::from(1i64 << 62));
        assert_eq!(acc.divide_trunc(&Integer::from(1)), Integer::from(1i64 << 62));
        assert!(acc.is_zero());
        assert!(!acc.is_fixed());

        acc.reset();
        assert!(!acc.is_fixed());
        acc.add(&Integer::from(9));
        acc.sub_mul(&Integer::from(2), &Integer::from(3));
        assert_eq!(acc.divide_trunc(&Integer::from(-2)), -1);
        assert_eq!(acc.to_integer(), 1);
    }
}
