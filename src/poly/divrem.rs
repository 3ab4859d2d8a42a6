//! Division of a polynomial by an ordered list of polynomials.
//!
//! The division merges all products of generator terms and quotient terms
//! lazily in a heap, so that the full products are never expanded.
//! Reference: "Sparse polynomial division using a heap" by Monagan, Pearce (2011).
//!
//! Monomials are packed into words at a width derived from the input. When a product of
//! two monomials does not fit, the division restarts at a larger width.
//! Coefficients are accumulated in a 192-bit integer while the input is small
//! enough, and in an arbitrary-precision integer otherwise.

pub mod coefficient;
pub mod heap;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::domains::integer::{Integer, IntegerRing};

use self::coefficient::CoefficientAccumulator;
use self::heap::{Candidate, CandidateQueue};

use super::packing::{bit_count, MonomialPacker, MAX_BITS};
use super::polynomial::MultivariatePolynomial;
use super::{Exponent, MonomialOrder};

/// An error that occurs while dividing by a list of polynomials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DivisionError {
    /// Generator `index` is zero.
    DivideByZero { index: usize },
    /// An exponent does not fit at the largest supported width, or does not
    /// fit in the exponent type of the polynomial.
    ExponentOverflow { bits: u32 },
    /// Generator `index` is defined over different variables than the dividend.
    VariableMismatch { index: usize },
}

impl std::fmt::Display for DivisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DivisionError::DivideByZero { index } => {
                write!(f, "Generator {} is zero", index)
            }
            DivisionError::ExponentOverflow { bits } => {
                write!(f, "Exponent overflow at {} bits per exponent", bits)
            }
            DivisionError::VariableMismatch { index } => {
                write!(
                    f,
                    "Generator {} has different variables than the dividend",
                    index
                )
            }
        }
    }
}

impl std::error::Error for DivisionError {}

/// Settings for [MultivariatePolynomial::divrem_ideal_with_settings].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DivisionSettings {
    /// Start packing monomials at this many bits per exponent. The width
    /// is raised if the input needs more.
    pub initial_bits: Option<u32>,
}

/// A packed monomial could not be represented at the current width.
#[derive(Debug)]
struct PackingOverflow;

/// A polynomial from the input with its monomials packed.
struct PackedInput<'a, E: Exponent, O: MonomialOrder> {
    poly: &'a MultivariatePolynomial<IntegerRing, E, O>,
    exponents: Vec<u64>,
    words: usize,
}

impl<'a, E: Exponent, O: MonomialOrder> PackedInput<'a, E, O> {
    fn new(
        poly: &'a MultivariatePolynomial<IntegerRing, E, O>,
        packer: &MonomialPacker<O>,
    ) -> Result<Self, PackingOverflow> {
        let mut exponents = Vec::with_capacity(poly.nterms() * packer.words());
        for i in 0..poly.nterms() {
            exponents.extend_from_slice(&packer.pack(poly.exponents(i)).ok_or(PackingOverflow)?);
        }

        Ok(PackedInput {
            poly,
            exponents,
            words: packer.words(),
        })
    }

    #[inline]
    fn nterms(&self) -> usize {
        self.poly.nterms()
    }

    #[inline]
    fn coefficient(&self, index: usize) -> &Integer {
        &self.poly.coefficients[index]
    }

    #[inline]
    fn exponents(&self, index: usize) -> &[u64] {
        &self.exponents[index * self.words..(index + 1) * self.words]
    }
}

/// A polynomial under construction, with packed monomials.
struct PackedPolynomial {
    coefficients: Vec<Integer>,
    exponents: Vec<u64>,
    words: usize,
}

impl PackedPolynomial {
    fn new(words: usize) -> Self {
        PackedPolynomial {
            coefficients: vec![],
            exponents: vec![],
            words,
        }
    }

    #[inline]
    fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    #[inline]
    fn exponents(&self, index: usize) -> &[u64] {
        &self.exponents[index * self.words..(index + 1) * self.words]
    }

    /// Append a term that is smaller than all terms so far.
    #[inline]
    fn push(&mut self, coefficient: Integer, exponents: &[u64]) {
        debug_assert!(!coefficient.is_zero());
        self.coefficients.push(coefficient);
        self.exponents.extend_from_slice(exponents);
    }

    fn unpack<E: Exponent, O: MonomialOrder>(
        self,
        packer: &MonomialPacker<O>,
        template: &MultivariatePolynomial<IntegerRing, E, O>,
    ) -> Result<MultivariatePolynomial<IntegerRing, E, O>, DivisionError> {
        let mut res = template.zero_with_capacity(self.nterms());

        for (i, c) in self.coefficients.into_iter().enumerate() {
            let words = &self.exponents[i * self.words..(i + 1) * self.words];
            for e in packer.unpack(words) {
                res.exponents
                    .push(E::try_from_u64(e).ok_or(DivisionError::ExponentOverflow {
                        bits: packer.bits(),
                    })?);
            }
            res.coefficients.push(c);
        }

        Ok(res)
    }
}

/// The quotients and remainder of a successful attempt.
struct PackedOutput<O: MonomialOrder> {
    packer: MonomialPacker<O>,
    quotients: Vec<PackedPolynomial>,
    remainder: PackedPolynomial,
}

/// The state of a single division attempt at a fixed width.
struct DivisionState<'a, 'q, E: Exponent, O: MonomialOrder> {
    packer: MonomialPacker<O>,
    dividend: PackedInput<'a, E, O>,
    generators: Vec<PackedInput<'a, E, O>>,
    quotients: Vec<PackedPolynomial>,
    remainder: PackedPolynomial,
    /// `parked[w] - 1` non-leading terms of generator `w`, starting from the
    /// second term, wait for the next quotient term of `w`.
    parked: Vec<usize>,
    accumulator: CoefficientAccumulator,
    queue: &'q mut CandidateQueue,
}

impl<'a, 'q, E: Exponent, O: MonomialOrder> DivisionState<'a, 'q, E, O> {
    fn new(
        dividend: &'a MultivariatePolynomial<IntegerRing, E, O>,
        generators: &'a [MultivariatePolynomial<IntegerRing, E, O>],
        packer: MonomialPacker<O>,
        fixed: bool,
        queue: &'q mut CandidateQueue,
    ) -> Result<Self, PackingOverflow> {
        let words = packer.words();

        Ok(DivisionState {
            dividend: PackedInput::new(dividend, &packer)?,
            generators: generators
                .iter()
                .map(|g| PackedInput::new(g, &packer))
                .collect::<Result<_, _>>()?,
            quotients: generators
                .iter()
                .map(|_| PackedPolynomial::new(words))
                .collect(),
            remainder: PackedPolynomial::new(words),
            parked: generators.iter().map(|g| g.nterms()).collect(),
            accumulator: CoefficientAccumulator::new(fixed),
            packer,
            queue,
        })
    }

    fn run(&mut self) -> Result<(), PackingOverflow> {
        let node = self.queue.alloc(Candidate::Dividend { term: 0 });
        let key = self.packer.key(self.dividend.exponents(0));
        self.queue.insert(key, node);

        let mut group = vec![];
        while let Some(key) = self.queue.pop_group(&mut group) {
            let monomial = self.packer.from_key(&key);

            self.accumulator.reset();
            for node in group.drain(..) {
                self.merge(node)?;
            }

            if self.accumulator.is_zero() {
                continue;
            }

            let mut reduced = false;
            for w in 0..self.generators.len() {
                let Some(quotient_monomial) = self
                    .packer
                    .divides(&monomial, self.generators[w].exponents(0))
                else {
                    continue;
                };

                let q = self
                    .accumulator
                    .divide_trunc(self.generators[w].coefficient(0));

                if !q.is_zero() {
                    self.quotients[w].push(q, &quotient_monomial);
                    self.seed_parked(w)?;
                }

                if self.accumulator.is_zero() {
                    reduced = true;
                    break;
                }
            }

            if !reduced {
                self.remainder
                    .push(self.accumulator.to_integer(), &monomial);
            }
        }

        Ok(())
    }

    /// Add the contribution of a candidate to the accumulator and enqueue its successor.
    #[inline]
    fn merge(&mut self, node: u32) -> Result<(), PackingOverflow> {
        match self.queue.get(node) {
            Candidate::Dividend { term } => {
                self.accumulator.add(self.dividend.coefficient(term));

                if term + 1 < self.dividend.nterms() {
                    self.queue.set(node, Candidate::Dividend { term: term + 1 });
                    let key = self.packer.key(self.dividend.exponents(term + 1));
                    self.queue.insert(key, node);
                } else {
                    self.queue.release(node);
                }
            }
            Candidate::Product {
                generator,
                term,
                quotient_term,
            } => {
                let g = &self.generators[generator];
                let q = &self.quotients[generator];
                self.accumulator
                    .sub_mul(g.coefficient(term), &q.coefficients[quotient_term]);

                if quotient_term + 1 < q.nterms() {
                    let m = self
                        .packer
                        .add(g.exponents(term), q.exponents(quotient_term + 1))
                        .ok_or(PackingOverflow)?;

                    self.queue.set(
                        node,
                        Candidate::Product {
                            generator,
                            term,
                            quotient_term: quotient_term + 1,
                        },
                    );
                    self.queue.insert(self.packer.key(&m), node);
                } else {
                    self.parked[generator] += 1;
                    self.queue.release(node);
                }
            }
        }

        Ok(())
    }

    /// Pair the parked terms of generator `w` with its newest quotient term.
    fn seed_parked(&mut self, w: usize) -> Result<(), PackingOverflow> {
        let quotient_term = self.quotients[w].nterms() - 1;

        for term in 1..self.parked[w] {
            let m = self
                .packer
                .add(
                    self.generators[w].exponents(term),
                    self.quotients[w].exponents(quotient_term),
                )
                .ok_or(PackingOverflow)?;

            let node = self.queue.alloc(Candidate::Product {
                generator: w,
                term,
                quotient_term,
            });
            self.queue.insert(self.packer.key(&m), node);
        }

        self.parked[w] = 1;
        Ok(())
    }

    fn into_output(self) -> PackedOutput<O> {
        PackedOutput {
            packer: self.packer,
            quotients: self.quotients,
            remainder: self.remainder,
        }
    }
}

impl<E: Exponent, O: MonomialOrder> MultivariatePolynomial<IntegerRing, E, O> {
    /// Divide `self` by the ordered list `generators`, yielding one quotient per generator
    /// and a remainder such that `self = sum_i quotients[i] * generators[i] + remainder`.
    ///
    /// A term is reduced by the first generator whose leading monomial divides it and
    /// whose leading coefficient yields a non-zero truncated quotient. What is left of the
    /// coefficient is reduced by later generators, or moves to the remainder.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use multidiv::domains::integer::{Integer, Z};
    /// use multidiv::poly::{polynomial::MultivariatePolynomial, LexOrder};
    ///
    /// let vars = Arc::new(vec!["x".into(), "y".into()]);
    /// let p = MultivariatePolynomial::<_, u16, LexOrder>::from_terms(
    ///     &Z,
    ///     vars,
    ///     [(Integer::from(1), vec![2, 1]), (Integer::from(1), vec![0, 2])],
    /// );
    /// let g = p.monomial(Integer::from(1), vec![1, 0]) - p.monomial(Integer::from(1), vec![0, 1]);
    ///
    /// let (q, r) = p.divrem_ideal(&[g.clone()]).unwrap();
    /// assert_eq!(&q[0] * &g + r.clone(), p);
    /// assert_eq!(r.to_string(), "y^3+y^2");
    /// ```
    pub fn divrem_ideal(&self, generators: &[Self]) -> Result<(Vec<Self>, Self), DivisionError> {
        self.divrem_ideal_with_settings(generators, &DivisionSettings::default())
    }

    /// Divide `self` by the ordered list `generators`, using custom settings.
    pub fn divrem_ideal_with_settings(
        &self,
        generators: &[Self],
        settings: &DivisionSettings,
    ) -> Result<(Vec<Self>, Self), DivisionError> {
        for (index, g) in generators.iter().enumerate() {
            if g.is_zero() {
                return Err(DivisionError::DivideByZero { index });
            }

            if !Arc::ptr_eq(&g.variables, &self.variables) && g.variables != self.variables {
                return Err(DivisionError::VariableMismatch { index });
            }
        }

        if self.is_zero() {
            return Ok((generators.iter().map(|_| self.zero()).collect(), self.zero()));
        }

        if generators
            .iter()
            .all(|g| O::cmp(g.max_exp(), self.max_exp()).is_gt())
        {
            debug!("All leading monomials exceed the dividend: nothing to reduce");
            return Ok((generators.iter().map(|_| self.zero()).collect(), self.clone()));
        }

        let nvars = self.nvars();
        let mut bits = generators
            .iter()
            .map(MonomialPacker::<O>::max_bits_required)
            .fold(MonomialPacker::max_bits_required(self), u32::max);
        if let Some(b) = settings.initial_bits {
            bits = bits.max(b.min(MAX_BITS));
        }
        let mut bits = MonomialPacker::<O>::optimize_bits(bits, nvars);

        let total_terms: usize = generators.iter().map(|g| g.nterms()).sum();
        let dividend_bits = self.coefficients.iter().map(|c| c.bits()).max().unwrap_or(0);
        let generator_bits = generators
            .iter()
            .flat_map(|g| g.coefficients.iter().map(|c| c.bits()))
            .max()
            .unwrap_or(0);

        // all products of coefficients fit in 126 bits and their sum in 192 bits
        let fixed = generator_bits <= 62
            && dividend_bits <= 127
            && dividend_bits <= generator_bits + bit_count(total_terms as u64) + 62;

        debug!(
            "Dividing {} terms by {} generators with {} terms, {} coefficient arithmetic",
            self.nterms(),
            generators.len(),
            total_terms,
            if fixed { "fixed-width" } else { "arbitrary-precision" }
        );

        let mut queue = CandidateQueue::with_capacity(total_terms + 1);

        loop {
            if bits > MAX_BITS {
                debug!("No supported width left for the exponents");
                return Err(DivisionError::ExponentOverflow { bits: MAX_BITS });
            }

            debug!("Packing monomials at {} bits per exponent", bits);
            let packer = MonomialPacker::<O>::new(nvars, bits);

            let attempt =
                DivisionState::new(self, generators, packer, fixed, &mut queue).and_then(|mut s| {
                    s.run()?;
                    Ok(s.into_output())
                });

            match attempt {
                Ok(output) => {
                    trace!(
                        "Division finished with {} nodes and {} remainder terms",
                        queue.pool_size(),
                        output.remainder.nterms()
                    );

                    let PackedOutput {
                        packer,
                        quotients,
                        remainder,
                    } = output;

                    let quotients = quotients
                        .into_iter()
                        .map(|q| q.unpack(&packer, self))
                        .collect::<Result<Vec<_>, _>>()?;
                    let remainder = remainder.unpack(&packer, self)?;
                    return Ok((quotients, remainder));
                }
                Err(PackingOverflow) => {
                    queue.reset();
                    let new_bits = MonomialPacker::<O>::optimize_bits(bits + 1, nvars);
                    debug!(
                        "Exponent overflow at {} bits: restarting at {} bits",
                        bits, new_bits
                    );
                    bits = new_bits;
                }
            }
        }
    }

    /// Divide `self` by `generators` and replace `self` by the remainder.
    /// On failure, `self` is unchanged.
    pub fn divrem_ideal_assign(&mut self, generators: &[Self]) -> Result<Vec<Self>, DivisionError> {
        let (quotients, mut remainder) = self.divrem_ideal(generators)?;
        std::mem::swap(self, &mut remainder);
        Ok(quotients)
    }

    /// Compute the remainder of `self` with respect to `generators`.
    pub fn rem_ideal(&self, generators: &[Self]) -> Result<Self, DivisionError> {
        self.divrem_ideal(generators).map(|(_, r)| r)
    }

    /// Check if `self` reduces to zero with respect to `generators`. If the generators
    /// form a Gröbner basis, this is the ideal membership test.
    pub fn reduces_to_zero(&self, generators: &[Self]) -> Result<bool, DivisionError> {
        self.rem_ideal(generators).map(|r| r.is_zero())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::integer::{Integer, IntegerRing, Z};
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::{Exponent, GrevLexOrder, LexOrder, MonomialOrder, Variable};

    use super::{DivisionError, DivisionSettings};

    fn poly<E: Exponent, O: MonomialOrder>(
        nvars: usize,
        terms: &[(i64, &[u32])],
    ) -> MultivariatePolynomial<IntegerRing, E, O> {
        let vars: Vec<Variable> = ["x", "y", "z", "w"][..nvars]
            .iter()
            .map(|v| Variable::from(*v))
            .collect();

        MultivariatePolynomial::from_terms(
            &Z,
            Arc::new(vars),
            terms.iter().map(|(c, e)| {
                (
                    Integer::from(*c),
                    e.iter().map(|x| E::from_u32(*x)).collect(),
                )
            }),
        )
    }

    fn check_identity<E: Exponent, O: MonomialOrder>(
        p: &MultivariatePolynomial<IntegerRing, E, O>,
        gens: &[MultivariatePolynomial<IntegerRing, E, O>],
        q: &[MultivariatePolynomial<IntegerRing, E, O>],
        r: &MultivariatePolynomial<IntegerRing, E, O>,
    ) {
        let mut sum = r.clone();
        for (qi, gi) in q.iter().zip(gens) {
            qi.check_consistency();
            sum = sum + qi * gi;
        }
        r.check_consistency();
        assert_eq!(&sum, p);
    }

    #[test]
    fn constant_generator() {
        let p = poly::<u16, LexOrder>(1, &[(6, &[1]), (9, &[0])]);
        let g = p.constant(Integer::from(3));

        let (q, r) = p.divrem_ideal(&[g]).unwrap();
        assert_eq!(q[0], poly::<u16, LexOrder>(1, &[(2, &[1]), (3, &[0])]));
        assert!(r.is_zero());
    }

    #[test]
    fn zero_dividend() {
        let x = poly::<u16, LexOrder>(2, &[(1, &[1, 0])]);
        let y = poly::<u16, LexOrder>(2, &[(1, &[0, 1])]);

        let (q, r) = x.zero().divrem_ideal(&[x.clone(), y]).unwrap();
        assert_eq!(q.len(), 2);
        assert!(q.iter().all(|q| q.is_zero()));
        assert!(r.is_zero());
    }

    #[test]
    fn invalid_generators() {
        let x = poly::<u16, LexOrder>(2, &[(1, &[1, 0])]);
        let p = poly::<u16, LexOrder>(2, &[(1, &[2, 0]), (1, &[0, 1])]);

        assert_eq!(
            p.divrem_ideal(&[x.zero(), x.clone()]),
            Err(DivisionError::DivideByZero { index: 0 })
        );

        let other = MultivariatePolynomial::<_, u16, LexOrder>::from_terms(
            &Z,
            Arc::new(vec![Variable::from("a"), Variable::from("b")]),
            [(Integer::one(), vec![1, 0])],
        );
        assert_eq!(
            p.divrem_ideal(&[x, other]),
            Err(DivisionError::VariableMismatch { index: 1 })
        );
    }

    #[test]
    fn first_match() {
        let x = poly::<u16, LexOrder>(1, &[(1, &[1])]);
        let x1 = poly::<u16, LexOrder>(1, &[(1, &[1]), (1, &[0])]);
        let p = poly::<u16, LexOrder>(1, &[(1, &[2])]);

        let (q, r) = p.divrem_ideal(&[x.clone(), x1.clone()]).unwrap();
        assert_eq!(q[0], x);
        assert!(q[1].is_zero());
        assert!(r.is_zero());

        let (q, r) = p.divrem_ideal(&[x1.clone(), x.clone()]).unwrap();
        assert_eq!(q[0], poly::<u16, LexOrder>(1, &[(1, &[1]), (-1, &[0])]));
        assert!(q[1].is_zero());
        assert_eq!(r, p.constant(Integer::one()));
        check_identity(&p, &[x1, x], &q, &r);
    }

    #[test]
    fn leftover_moves_on() {
        // 5*x*y: 2*x takes 2*y and leaves x*y to y
        let p = poly::<u16, LexOrder>(2, &[(5, &[1, 1])]);
        let g1 = poly::<u16, LexOrder>(2, &[(2, &[1, 0]), (1, &[0, 0])]);
        let g2 = poly::<u16, LexOrder>(2, &[(1, &[0, 1])]);

        let (q, r) = p.divrem_ideal(&[g1.clone(), g2.clone()]).unwrap();
        assert_eq!(q[0], poly::<u16, LexOrder>(2, &[(2, &[0, 1])]));
        assert_eq!(q[1], poly::<u16, LexOrder>(2, &[(1, &[1, 0]), (-2, &[0, 0])]));
        assert!(r.is_zero());
        check_identity(&p, &[g1.clone(), g2.clone()], &q, &r);

        // with leading coefficient 3 nothing is left for y
        let g3 = poly::<u16, LexOrder>(2, &[(3, &[0, 1])]);
        let (q, r) = p.divrem_ideal(&[g1.clone(), g3.clone()]).unwrap();
        assert!(q[1].is_zero());
        assert_eq!(r, poly::<u16, LexOrder>(2, &[(1, &[1, 1]), (-2, &[0, 1])]));
        check_identity(&p, &[g1, g3], &q, &r);
    }

    #[test]
    fn fast_path() {
        let p = poly::<u16, GrevLexOrder>(2, &[(1, &[1, 1]), (4, &[0, 0])]);
        let g = poly::<u16, GrevLexOrder>(2, &[(1, &[3, 0]), (1, &[0, 1])]);

        let (q, r) = p.divrem_ideal(&[g]).unwrap();
        assert!(q[0].is_zero());
        assert_eq!(r, p);

        let (q, r) = p.divrem_ideal(&[]).unwrap();
        assert!(q.is_empty());
        assert_eq!(r, p);
    }

    #[test]
    fn cancellation() {
        // (x^2 - y^2) / [x - y, x + y]
        let p = poly::<u16, LexOrder>(2, &[(1, &[2, 0]), (-1, &[0, 2])]);
        let g1 = poly::<u16, LexOrder>(2, &[(1, &[1, 0]), (-1, &[0, 1])]);
        let g2 = poly::<u16, LexOrder>(2, &[(1, &[1, 0]), (1, &[0, 1])]);

        let (q, r) = p.divrem_ideal(&[g1.clone(), g2.clone()]).unwrap();
        assert_eq!(q[0], g2);
        assert!(q[1].is_zero());
        assert!(r.is_zero());
        assert!(p.reduces_to_zero(&[g1, g2]).unwrap());
    }

    #[test]
    fn width_escalation() {
        // the remainder y^(2^20) needs more bits than any input
        let p = poly::<u32, LexOrder>(3, &[(1, &[2, 0, 0])]);
        let g = poly::<u32, LexOrder>(3, &[(1, &[1, 0, 0]), (-1, &[0, 1 << 19, 0])]);

        let (q, r) = p.divrem_ideal(&[g.clone()]).unwrap();
        assert_eq!(r, poly::<u32, LexOrder>(3, &[(1, &[0, 1 << 20, 0])]));
        check_identity(&p, &[g.clone()], &q, &r);

        let wide = p
            .divrem_ideal_with_settings(
                &[g],
                &DivisionSettings {
                    initial_bits: Some(64),
                },
            )
            .unwrap();
        assert_eq!((q, r), wide);
    }

    #[test]
    fn exponent_type_overflow() {
        let p = poly::<u32, LexOrder>(2, &[(1, &[2, 0])]);
        let g = poly::<u32, LexOrder>(2, &[(1, &[1, 0]), (-1, &[0, 1 << 31])]);

        assert!(matches!(
            p.divrem_ideal(&[g]),
            Err(DivisionError::ExponentOverflow { .. })
        ));
    }

    #[test]
    fn remainder_is_reduced() {
        let p = poly::<u16, GrevLexOrder>(
            3,
            &[(7, &[3, 1, 0]), (-4, &[1, 1, 1]), (5, &[0, 2, 0]), (1, &[0, 0, 0])],
        );
        let g1 = poly::<u16, GrevLexOrder>(3, &[(2, &[1, 1, 0]), (-1, &[0, 0, 1])]);
        let g2 = poly::<u16, GrevLexOrder>(3, &[(1, &[0, 1, 0]), (3, &[0, 0, 0])]);
        let gens = [g1, g2];

        let (q, r) = p.divrem_ideal(&gens).unwrap();
        check_identity(&p, &gens, &q, &r);

        // a second pass changes nothing
        let (q2, r2) = r.divrem_ideal(&gens).unwrap();
        assert!(q2.iter().all(|q| q.is_zero()));
        assert_eq!(r2, r);

        let mut s = p.clone();
        let q3 = s.divrem_ideal_assign(&gens).unwrap();
        assert_eq!(q3, q);
        assert_eq!(s, r);
        assert_eq!(p.rem_ideal(&gens).unwrap(), r);
    }

    #[test]
    fn large_coefficients() {
        let big = Integer::from(3).pow(90);
        let vars = Arc::new(vec![Variable::from("x"), Variable::from("y")]);

        let g = MultivariatePolynomial::<_, u8, LexOrder>::from_terms(
            &Z,
            vars.clone(),
            [(big.clone(), vec![1, 0]), (Integer::from(-5), vec![0, 1])],
        );
        let h = MultivariatePolynomial::<_, u8, LexOrder>::from_terms(
            &Z,
            vars,
            [(big.clone(), vec![2, 1]), (Integer::from(7), vec![0, 3])],
        );
        let p = &(&g * &h) + &h.constant(Integer::from(11));

        let (q, r) = p.divrem_ideal(&[g.clone()]).unwrap();
        check_identity(&p, &[g.clone()], &q, &r);
        for t in &r {
            assert!(!t.is_divisible_by(g.max_exp()) || t.coefficient.abs_cmp(&big).is_lt());
        }
    }
}
