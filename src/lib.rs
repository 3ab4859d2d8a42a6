//! Multidiv divides sparse multivariate polynomials with integer coefficients
//! by an ordered list of polynomials, yielding a quotient for every divisor
//! and a remainder.
//!
//! The division merges the products of divisor terms and quotient terms in a heap,
//! packs monomials into machine words and accumulates coefficients in fixed-width
//! integers for as long as the input allows it.
//!
//! For example:
//!
//! ```
//! use std::sync::Arc;
//! use multidiv::domains::integer::{Integer, Z};
//! use multidiv::poly::{polynomial::MultivariatePolynomial, GrevLexOrder};
//!
//! let vars = Arc::new(vec!["x".into(), "y".into()]);
//! let p = MultivariatePolynomial::<_, u16, GrevLexOrder>::from_terms(
//!     &Z,
//!     vars,
//!     [(Integer::from(6), vec![2, 1]), (Integer::from(-4), vec![0, 1])],
//! );
//! let g = p.monomial(Integer::from(3), vec![1, 0]);
//!
//! let (q, r) = p.divrem_ideal(&[g]).unwrap();
//! assert_eq!(q[0].to_string(), "2*x*y");
//! assert_eq!(r.to_string(), "-4*y");
//! ```

pub mod domains;
pub mod poly;
