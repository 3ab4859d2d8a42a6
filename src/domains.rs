//! Coefficient domains.
//!
//! A [Ring] is a value that performs the arithmetic on its associated
//! element type, so that the polynomial container can stay generic over
//! its coefficients. The only ring needed for division is the ring of
//! integers [Z](type@integer::Z), with elements of type [Integer](integer::Integer).
pub mod integer;

use std::fmt::{Debug, Display, Error, Formatter};
use std::hash::Hash;

/// A set with addition and multiplication, acting on elements of type [Ring::Element].
pub trait Ring: Clone + PartialEq + Eq + Hash + Debug + Display {
    type Element: Clone + PartialEq + Eq + Hash + Debug;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn neg(&self, a: &Self::Element) -> Self::Element;
    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;
    fn is_zero(a: &Self::Element) -> bool;
    fn is_one(&self, a: &Self::Element) -> bool;

    /// Draw a random element from `range.0..range.1`.
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element;

    /// Format a ring element. If `in_product` is set, the element is
    /// written as a factor of a larger product.
    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error>;
}
