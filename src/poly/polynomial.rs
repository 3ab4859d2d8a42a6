use std::cmp::Ordering;
use std::fmt::Display;
use std::marker::PhantomData;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use crate::domains::Ring;

use super::{Exponent, LexOrder, MonomialOrder, Variable};

/// A sparse multivariate polynomial.
///
/// The `i`-th term is stored as `coefficients[i]` together with the exponents
/// `exponents[i * nvars..(i + 1) * nvars]`. Terms are sorted from the leading
/// monomial downwards by `O`, coefficients are never zero and no two terms
/// share a monomial.
#[derive(Clone)]
pub struct MultivariatePolynomial<F: Ring, E: Exponent = u16, O: MonomialOrder = LexOrder> {
    pub coefficients: Vec<F::Element>,
    pub exponents: Vec<E>,
    pub field: F,
    pub variables: Arc<Vec<Variable>>,
    pub(crate) _phantom: PhantomData<O>,
}

impl<F: Ring, E: Exponent, O: MonomialOrder> MultivariatePolynomial<F, E, O> {
    /// Constructs a zero polynomial. Polynomials derived from it with
    /// [Self::zero], [Self::constant] or [Self::monomial] share its field and variables.
    #[inline]
    pub fn new(field: &F, cap: Option<usize>, variables: Arc<Vec<Variable>>) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap.unwrap_or(0)),
            exponents: Vec::with_capacity(cap.unwrap_or(0) * variables.len()),
            field: field.clone(),
            variables,
            _phantom: PhantomData,
        }
    }

    /// Constructs a polynomial from a list of terms in any order.
    /// Terms with equal exponents are merged.
    pub fn from_terms<I: IntoIterator<Item = (F::Element, Vec<E>)>>(
        field: &F,
        variables: Arc<Vec<Variable>>,
        terms: I,
    ) -> Self {
        let mut res = Self::new(field, None, variables);
        for (c, e) in terms {
            res.append_monomial(c, &e);
        }
        res
    }

    #[inline]
    pub fn zero(&self) -> Self {
        self.zero_with_capacity(0)
    }

    #[inline]
    pub fn zero_with_capacity(&self, cap: usize) -> Self {
        Self::new(&self.field, Some(cap), self.variables.clone())
    }

    #[inline]
    pub fn constant(&self, coeff: F::Element) -> Self {
        self.monomial(coeff, vec![E::zero(); self.nvars()])
    }

    /// Constructs a polynomial with a single term.
    pub fn monomial(&self, coeff: F::Element, exponents: Vec<E>) -> Self {
        let mut res = self.zero_with_capacity(1);
        res.append_monomial_back(coeff, &exponents);
        res
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.nterms() == 0
    }

    #[inline]
    pub fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    /// Get the leading coefficient.
    pub fn lcoeff(&self) -> F::Element {
        self.coefficients
            .first()
            .cloned()
            .unwrap_or_else(|| self.field.zero())
    }

    /// Get the exponents of the leading monomial.
    #[inline]
    pub fn max_exp(&self) -> &[E] {
        self.exponents(0)
    }

    /// Get a reference to the exponents of term `index`.
    #[inline]
    pub fn exponents(&self, index: usize) -> &[E] {
        term(&self.exponents, index, self.nvars())
    }

    /// Get the exponents of the smallest monomial.
    #[inline]
    pub fn last_exponents(&self) -> &[E] {
        self.exponents(self.nterms() - 1)
    }

    /// Iterate over the exponents of all monomials.
    #[inline]
    pub fn exponents_iter(&self) -> std::slice::Chunks<E> {
        self.exponents.chunks(self.nvars().max(1))
    }

    /// Get the highest power of the variable `x`.
    pub fn degree(&self, x: usize) -> E {
        self.exponents_iter()
            .filter_map(|e| e.get(x).copied())
            .max()
            .unwrap_or_else(E::zero)
    }

    /// Get the highest total degree of all terms.
    pub fn total_degree(&self) -> u64 {
        self.exponents_iter()
            .map(|e| e.iter().map(|x| x.to_u32() as u64).sum())
            .max()
            .unwrap_or(0)
    }

    /// Check if the polynomial is sorted and has only non-zero coefficients
    pub fn check_consistency(&self) {
        assert_eq!(self.exponents.len(), self.nterms() * self.nvars());

        for c in &self.coefficients {
            if F::is_zero(c) {
                panic!("Inconsistent polynomial (0 coefficient): {}", self);
            }
        }

        for t in 1..self.nterms() {
            match O::cmp(self.exponents(t), self.exponents(t - 1)) {
                Ordering::Equal => panic!("Inconsistent polynomial (equal monomials): {}", self),
                Ordering::Greater => panic!(
                    "Inconsistent polynomial (wrong monomial ordering): {}",
                    self
                ),
                Ordering::Less => {}
            }
        }
    }

    /// Append a monomial to the back. It merges with the last monomial if the
    /// exponents are equal. The monomial must not be larger than the last one.
    #[inline]
    pub fn append_monomial_back(&mut self, coefficient: F::Element, exponents: &[E]) {
        if F::is_zero(&coefficient) {
            return;
        }

        let nterms = self.nterms();
        if nterms > 0 && exponents == self.last_exponents() {
            self.field
                .add_assign(&mut self.coefficients[nterms - 1], &coefficient);

            if F::is_zero(&self.coefficients[nterms - 1]) {
                self.coefficients.pop();
                self.exponents.truncate((nterms - 1) * self.nvars());
            }
        } else {
            debug_assert!(nterms == 0 || O::cmp(exponents, self.last_exponents()).is_lt());
            self.coefficients.push(coefficient);
            self.exponents.extend_from_slice(exponents);
        }
    }

    /// Appends a monomial to the polynomial.
    pub fn append_monomial(&mut self, coefficient: F::Element, exponents: &[E]) {
        if F::is_zero(&coefficient) {
            return;
        }
        if self.nvars() != exponents.len() {
            panic!(
                "nvars mismatched: got {}, expected {}",
                exponents.len(),
                self.nvars()
            );
        }

        // should we append to the back?
        if self.nterms() == 0 || O::cmp(self.last_exponents(), exponents).is_gt() {
            self.coefficients.push(coefficient);
            self.exponents.extend_from_slice(exponents);
            return;
        }

        // Binary search for the first term that is not larger than the new one.
        let mut l = 0;
        let mut r = self.nterms();
        while l < r {
            let m = (l + r) / 2;
            if O::cmp(self.exponents(m), exponents).is_gt() {
                l = m + 1;
            } else {
                r = m;
            }
        }

        if l < self.nterms() && O::cmp(self.exponents(l), exponents).is_eq() {
            self.field
                .add_assign(&mut self.coefficients[l], &coefficient);
            if F::is_zero(&self.coefficients[l]) {
                // The coefficient becomes zero. Remove this monomial.
                self.coefficients.remove(l);
                let i = l * self.nvars();
                self.exponents.drain(i..i + self.nvars());
            }
            return;
        }

        self.coefficients.insert(l, coefficient);
        let i = l * self.nvars();
        self.exponents.splice(i..i, exponents.iter().cloned());
    }

    /// Multiply every coefficient with `other`.
    pub fn mul_coeff(mut self, other: F::Element) -> Self {
        for c in &mut self.coefficients {
            self.field.mul_assign(c, &other);
        }

        // a ring may have zero divisors
        if self.coefficients.iter().any(|c| F::is_zero(c)) {
            let mut res = self.zero_with_capacity(self.nterms());
            for t in &self {
                res.append_monomial_back(t.coefficient.clone(), t.exponents);
            }
            return res;
        }

        self
    }

    /// Multiply the polynomial by a single term. The ordering
    /// of the terms is preserved.
    pub fn mul_monomial(mut self, coefficient: &F::Element, exponents: &[E]) -> Self {
        debug_assert_eq!(self.nvars(), exponents.len());

        let nvars = self.nvars();
        if nvars > 0 {
            for e in self.exponents.chunks_mut(nvars) {
                for (e1, e2) in e.iter_mut().zip(exponents) {
                    *e1 = e1
                        .checked_add(e2)
                        .unwrap_or_else(|| panic!("Exponent overflow in multiplication"));
                }
            }
        }

        self.mul_coeff(coefficient.clone())
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> std::fmt::Debug for MultivariatePolynomial<F, E, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_list()
            .entries(self.into_iter().map(|t| (t.coefficient, t.exponents)))
            .finish()
    }
}

struct CoefficientPrinter<'a, F: Ring> {
    field: &'a F,
    element: &'a F::Element,
    in_product: bool,
}

impl<'a, F: Ring> Display for CoefficientPrinter<'a, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.field.fmt_display(self.element, self.in_product, f)
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Display for MultivariatePolynomial<F, E, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        for (i, monomial) in self.into_iter().enumerate() {
            let is_constant = monomial.exponents.iter().all(|e| e.is_zero());
            let coeff = CoefficientPrinter {
                field: &self.field,
                element: monomial.coefficient,
                in_product: !is_constant,
            }
            .to_string();

            if i > 0 && !coeff.starts_with('-') {
                write!(f, "+")?;
            }

            let mut first_factor = true;
            if is_constant || !self.field.is_one(monomial.coefficient) {
                write!(f, "{}", coeff)?;
                first_factor = false;
            }

            for (var, e) in self.variables.iter().zip(monomial.exponents) {
                if e.is_zero() {
                    continue;
                }

                if !first_factor {
                    write!(f, "*")?;
                }
                first_factor = false;

                if e.to_u32() == 1 {
                    write!(f, "{}", var)?;
                } else {
                    write!(f, "{}^{}", var, e)?;
                }
            }
        }

        Ok(())
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> PartialEq for MultivariatePolynomial<F, E, O> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if self.nvars() != other.nvars() {
            return self.is_zero() && other.is_zero();
        }
        if self.nterms() != other.nterms() {
            return false;
        }
        self.exponents.eq(&other.exponents) && self.coefficients.eq(&other.coefficients)
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Eq for MultivariatePolynomial<F, E, O> {}

#[inline]
fn term<E>(exponents: &[E], index: usize, nvars: usize) -> &[E] {
    &exponents[index * nvars..(index + 1) * nvars]
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Add for MultivariatePolynomial<F, E, O> {
    type Output = Self;

    /// Merge the terms of both polynomials.
    fn add(self, other: Self) -> Self::Output {
        debug_assert_eq!(self.variables, other.variables);

        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }

        let nvars = self.nvars();
        let mut res = self.zero_with_capacity(self.nterms() + other.nterms());
        let mut a = self.coefficients.into_iter().enumerate().peekable();
        let mut b = other.coefficients.into_iter().enumerate().peekable();

        loop {
            let ord = match (a.peek(), b.peek()) {
                (Some((i, _)), Some((j, _))) => O::cmp(
                    term(&self.exponents, *i, nvars),
                    term(&other.exponents, *j, nvars),
                ),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => break,
            };

            match ord {
                Ordering::Greater => {
                    if let Some((i, c)) = a.next() {
                        res.coefficients.push(c);
                        res.exponents.extend_from_slice(term(&self.exponents, i, nvars));
                    }
                }
                Ordering::Less => {
                    if let Some((j, c)) = b.next() {
                        res.coefficients.push(c);
                        res.exponents.extend_from_slice(term(&other.exponents, j, nvars));
                    }
                }
                Ordering::Equal => {
                    if let (Some((i, c1)), Some((_, c2))) = (a.next(), b.next()) {
                        let c = res.field.add(&c1, &c2);
                        if !F::is_zero(&c) {
                            res.coefficients.push(c);
                            res.exponents.extend_from_slice(term(&self.exponents, i, nvars));
                        }
                    }
                }
            }
        }

        res
    }
}

impl<'a, 'b, F: Ring, E: Exponent, O: MonomialOrder> Add<&'a MultivariatePolynomial<F, E, O>>
    for &'b MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    fn add(self, other: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        self.clone() + other.clone()
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Sub for MultivariatePolynomial<F, E, O> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self.add(other.neg())
    }
}

impl<'a, 'b, F: Ring, E: Exponent, O: MonomialOrder> Sub<&'a MultivariatePolynomial<F, E, O>>
    for &'b MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    fn sub(self, other: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        self.clone() + other.clone().neg()
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Neg for MultivariatePolynomial<F, E, O> {
    type Output = Self;
    fn neg(mut self) -> Self::Output {
        // Negate coefficients of all terms.
        for c in &mut self.coefficients {
            *c = self.field.neg(c);
        }
        self
    }
}

impl<'a, 'b, F: Ring, E: Exponent, O: MonomialOrder> Mul<&'a MultivariatePolynomial<F, E, O>>
    for &'b MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    /// Multiply two polynomials by merging the products of `rhs` with every term of `self`.
    fn mul(self, rhs: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        if self.nterms() == 0 || rhs.nterms() == 0 {
            return self.zero();
        }

        if self.nterms() > rhs.nterms() {
            return rhs * self;
        }

        let mut res = self.zero();
        for t in self {
            res = res + rhs.clone().mul_monomial(t.coefficient, t.exponents);
        }
        res
    }
}

impl<'a, F: Ring, E: Exponent, O: MonomialOrder> Mul<&'a MultivariatePolynomial<F, E, O>>
    for MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    #[inline]
    fn mul(self, rhs: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        (&self) * rhs
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::integer::{Integer, Z};
    use crate::poly::{GrevLexOrder, LexOrder, Variable};

    use super::MultivariatePolynomial;

    fn vars() -> Arc<Vec<Variable>> {
        Arc::new(vec!["x".into(), "y".into()])
    }

    #[test]
    fn construction_is_canonical() {
        let p = MultivariatePolynomial::<_, u16, LexOrder>::from_terms(
            &Z,
            vars(),
            [
                (Integer::from(3), vec![0, 1]),
                (Integer::from(1), vec![2, 0]),
                (Integer::from(-2), vec![0, 0]),
                (Integer::from(4), vec![1, 1]),
                (Integer::from(-3), vec![0, 1]),
            ],
        );

        p.check_consistency();
        assert_eq!(p.nterms(), 3);
        assert_eq!(p.max_exp(), &[2, 0]);
        assert_eq!(p.lcoeff(), 1);
        assert_eq!(p.to_string(), "x^2+4*x*y-2");
    }

    #[test]
    fn ring_operations() {
        let x = MultivariatePolynomial::<_, u16, GrevLexOrder>::new(&Z, None, vars())
            .monomial(Integer::one(), vec![1, 0]);
        let y = x.monomial(Integer::one(), vec![0, 1]);

        let s = &x + &y;
        let d = &x - &y;
        let p = &s * &d;
        p.check_consistency();
        assert_eq!(p, &(&x * &x) - &(&y * &y));
        assert_eq!(p.total_degree(), 2);
        assert_eq!(p.degree(1), 2);
        assert!((&p - &p).is_zero());
        assert_eq!(p.to_string(), "x^2-y^2");
    }
}
