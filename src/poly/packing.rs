//! Packed monomials.
//!
//! An exponent vector is stored as a short sequence of `u64` words, in which
//! every exponent occupies a field of a fixed number of bits. The top bit of
//! every field is a guard bit that is always zero for a valid monomial, so that
//! addition and subtraction of whole words can detect overflow and
//! non-divisibility by looking at the guard bits only.

use std::cmp::Ordering;
use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::domains::Ring;

use super::polynomial::MultivariatePolynomial;
use super::{Exponent, MonomialOrder};

/// The smallest field width in bits.
pub const MIN_BITS: u32 = 8;
/// The largest field width in bits.
pub const MAX_BITS: u32 = 64;

/// A packed monomial. Most monomials fit in two words.
pub type PackedKey = SmallVec<[u64; 2]>;

/// Bit length of `n`.
#[inline]
pub fn bit_count(n: u64) -> u32 {
    u64::BITS - n.leading_zeros()
}

/// Packs exponent vectors of a fixed number of variables at a fixed width,
/// using the layout of the monomial order `O`.
///
/// Fields are numbered from the most significant one. A graded order stores the total
/// degree in field 0. A reversed order stores the variables from last to first and
/// flips their bits for comparison, so that packed monomials compare with
/// the same result as `O::cmp`.
#[derive(Clone, Debug)]
pub struct MonomialPacker<O: MonomialOrder> {
    nvars: usize,
    bits: u32,
    fields_per_word: usize,
    words: usize,
    guard_mask: PackedKey,
    cmp_mask: PackedKey,
    _phantom: PhantomData<O>,
}

impl<O: MonomialOrder> MonomialPacker<O> {
    /// Create a packer for `nvars` variables with `bits` bits per field.
    pub fn new(nvars: usize, bits: u32) -> Self {
        assert!(
            (MIN_BITS..=MAX_BITS).contains(&bits),
            "Unsupported field width {}",
            bits
        );

        let fields_per_word = (u64::BITS / bits) as usize;
        let nfields = Self::nfields(nvars);
        let words = nfields.div_ceil(fields_per_word);

        let mut packer = MonomialPacker {
            nvars,
            bits,
            fields_per_word,
            words,
            guard_mask: SmallVec::from_elem(0, words),
            cmp_mask: SmallVec::from_elem(0, words),
            _phantom: PhantomData,
        };

        let field_mask = packer.field_mask();
        for f in 0..nfields {
            let (w, shift) = packer.position(f);
            packer.guard_mask[w] |= 1 << (shift + bits - 1);

            let is_variable = !O::GRADED || f > 0;
            if O::REVERSE && is_variable {
                packer.cmp_mask[w] |= field_mask << shift;
            }
        }

        packer
    }

    /// The number of fields needed for `nvars` variables.
    #[inline]
    pub fn nfields(nvars: usize) -> usize {
        nvars + O::GRADED as usize
    }

    /// Round a field width up to the largest width that uses the same
    /// number of words. The result is at least [MIN_BITS]. A result
    /// larger than [MAX_BITS] means that the width is unsupported.
    pub fn optimize_bits(bits: u32, nvars: usize) -> u32 {
        let bits = bits.max(MIN_BITS);
        let nfields = Self::nfields(nvars);
        if bits > MAX_BITS || nfields == 0 {
            return bits;
        }

        let fields_per_word = (u64::BITS / bits) as usize;
        let words = nfields.div_ceil(fields_per_word);
        let fields_per_word = nfields.div_ceil(words);
        u64::BITS / fields_per_word as u32
    }

    /// The width needed to store all monomials of `poly`, including the guard bit.
    pub fn max_bits_required<F: Ring, E: Exponent>(poly: &MultivariatePolynomial<F, E, O>) -> u32 {
        let mut max = 0;
        for e in poly.exponents_iter() {
            for x in e {
                max = max.max(x.to_u32() as u64);
            }

            if O::GRADED {
                max = max.max(e.iter().map(|x| x.to_u32() as u64).sum());
            }
        }

        bit_count(max) + 1
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub fn words(&self) -> usize {
        self.words
    }

    #[inline]
    fn field_mask(&self) -> u64 {
        if self.bits == u64::BITS {
            u64::MAX
        } else {
            (1 << self.bits) - 1
        }
    }

    #[inline]
    fn position(&self, field: usize) -> (usize, u32) {
        let w = field / self.fields_per_word;
        let shift = (self.fields_per_word - 1 - field % self.fields_per_word) as u32 * self.bits;
        (w, shift)
    }

    /// The field that stores variable `var`.
    #[inline]
    fn variable_field(&self, var: usize) -> usize {
        let f = if O::REVERSE {
            self.nvars - 1 - var
        } else {
            var
        };
        f + O::GRADED as usize
    }

    /// Pack an exponent vector. Yields `None` if an exponent, or the
    /// total degree for graded orders, does not fit in a field.
    pub fn pack<E: Exponent>(&self, exponents: &[E]) -> Option<PackedKey> {
        debug_assert_eq!(exponents.len(), self.nvars);

        let limit = 1u64 << (self.bits - 1);
        let mut packed: PackedKey = SmallVec::from_elem(0, self.words);

        let mut write = |field: usize, value: u64| {
            if value >= limit {
                return false;
            }
            let (w, shift) = self.position(field);
            packed[w] |= value << shift;
            true
        };

        if O::GRADED {
            let degree = exponents.iter().map(|x| x.to_u32() as u64).sum();
            if !write(0, degree) {
                return None;
            }
        }

        for (var, e) in exponents.iter().enumerate() {
            if !write(self.variable_field(var), e.to_u32() as u64) {
                return None;
            }
        }

        Some(packed)
    }

    /// Unpack the exponents of every variable.
    pub fn unpack(&self, packed: &[u64]) -> Vec<u64> {
        let field_mask = self.field_mask();
        (0..self.nvars)
            .map(|var| {
                let (w, shift) = self.position(self.variable_field(var));
                (packed[w] >> shift) & field_mask
            })
            .collect()
    }

    /// Convert a packed monomial into a key that sorts like the monomial order.
    #[inline]
    pub fn key(&self, packed: &[u64]) -> PackedKey {
        packed
            .iter()
            .zip(&self.cmp_mask)
            .map(|(p, m)| p ^ m)
            .collect()
    }

    /// Recover the packed monomial from a key.
    #[inline]
    pub fn from_key(&self, key: &[u64]) -> PackedKey {
        self.key(key)
    }

    /// Compare two packed monomials under the monomial order.
    #[inline]
    pub fn cmp(&self, a: &[u64], b: &[u64]) -> Ordering {
        for ((x, y), m) in a.iter().zip(b).zip(&self.cmp_mask) {
            match (x ^ m).cmp(&(y ^ m)) {
                Ordering::Equal => {}
                o => return o,
            }
        }
        Ordering::Equal
    }

    /// Multiply two packed monomials. Yields `None` when a field overflows.
    #[inline]
    pub fn add(&self, a: &[u64], b: &[u64]) -> Option<PackedKey> {
        let mut res: PackedKey = SmallVec::with_capacity(self.words);
        for ((x, y), g) in a.iter().zip(b).zip(&self.guard_mask) {
            let s = x.wrapping_add(*y);
            if s & g != 0 {
                return None;
            }
            res.push(s);
        }
        Some(res)
    }

    /// Divide the packed monomial `a` by `b`, if `b` divides `a`.
    #[inline]
    pub fn divides(&self, a: &[u64], b: &[u64]) -> Option<PackedKey> {
        let mut res: PackedKey = SmallVec::with_capacity(self.words);
        for ((x, y), g) in a.iter().zip(b).zip(&self.guard_mask) {
            let d = x.wrapping_sub(*y);
            if d & g != 0 {
                return None;
            }
            res.push(d);
        }
        Some(res)
    }
}
