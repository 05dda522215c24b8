//! Degree-(T-1) polynomials over a curve's scalar field and Shamir shares.

use crate::crypto::{ECPoint, ECScalar, Rng};
use crate::error::{Error, Result};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A share `(id, y)`: `id` is the participant's 1-indexed x-coordinate,
/// `y` is the polynomial's value there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share<S: ECScalar> {
    pub id: u16,
    pub y: S,
}

/// `[a_0, a_1, ..., a_{degree}]`, a polynomial over the scalar field with
/// `a_0` the shared secret.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Polynomial<S: ECScalar> {
    coefficients: Vec<S>,
}

impl<S: ECScalar> Polynomial<S> {
    /// Builds a degree-`degree` polynomial with constant term `secret` and
    /// every other coefficient sampled uniformly in `[1, q-1]`.
    ///
    /// `degree` must be at least 1 — a constant polynomial shares nothing.
    pub fn init(secret: S, degree: u16, rng: &mut Rng) -> Result<Self> {
        if degree < 1 {
            return Err(Error::Config("polynomial degree must be at least 1"));
        }
        let mut coefficients = Vec::with_capacity(degree as usize + 1);
        coefficients.push(secret);
        for _ in 0..degree {
            coefficients.push(S::random(rng));
        }
        Ok(Polynomial { coefficients })
    }

    pub fn degree(&self) -> u16 {
        (self.coefficients.len() - 1) as u16
    }

    pub fn coefficients(&self) -> &[S] {
        &self.coefficients
    }

    /// `Σ a_i * x^i mod q`, Horner's method.
    pub fn evaluate(&self, x: u16) -> Share<S> {
        let x_scalar = S::from(x as u32);
        let mut acc = S::zero();
        for coefficient in self.coefficients.iter().rev() {
            acc = acc * x_scalar.clone() + coefficient.clone();
        }
        Share { id: x, y: acc }
    }

    /// Evaluates at every id in `1..=n`.
    pub fn evaluate_all(&self, n: u16) -> Vec<Share<S>> {
        (1..=n).map(|id| self.evaluate(id)).collect()
    }

    /// The Feldman verifier vector `[a_0*G, a_1*G, ..., a_degree*G]`.
    pub fn commitments<P: ECPoint<Scalar = S>>(&self) -> Vec<P> {
        self.coefficients.iter().map(P::from_scalar).collect()
    }
}

/// `Σ_i λ_i(S) * share_i.y mod q`, the Lagrange interpolation of the
/// polynomial at `x=0` from the given shares.
///
/// Errors if two shares share an id (the corresponding Lagrange
/// denominator would be zero, so no modular inverse exists).
pub fn recover_secret<S: ECScalar>(shares: &[Share<S>]) -> Result<S> {
    let mut secret = S::zero();
    for (i, share_i) in shares.iter().enumerate() {
        let lambda = lagrange_coefficient_at_zero(shares, i)?;
        secret = secret + share_i.y.clone() * lambda;
    }
    Ok(secret)
}

/// `λ_i(S) = Π_{j≠i} x_j * (x_j - x_i)^-1 mod q` for the id at `shares[i]`.
pub fn lagrange_coefficient_at_zero<S: ECScalar>(shares: &[Share<S>], i: usize) -> Result<S> {
    let xi = S::from(shares[i].id as u32);
    let mut lambda = S::from(1);
    for (j, share_j) in shares.iter().enumerate() {
        if i == j {
            continue;
        }
        if share_j.id == shares[i].id {
            return Err(Error::Config("duplicate share id in reconstruction set"));
        }
        let xj = S::from(share_j.id as u32);
        let denom = xj.clone() - xi.clone();
        let denom_inv = denom
            .invert()
            .ok_or(Error::Config("duplicate share id in reconstruction set"))?;
        lambda = lambda * xj * denom_inv;
    }
    Ok(lambda)
}

/// `λ_i(devotee_list)` for a specific id, used by the refresh seeding rule
/// where the reconstruction set is fixed in advance rather than derived
/// from the shares actually received this round.
pub fn lagrange_coefficient_for_id<S: ECScalar>(devotee_ids: &[u16], id: u16) -> Result<S> {
    let xi = S::from(id as u32);
    let mut lambda = S::from(1);
    for &other_id in devotee_ids {
        if other_id == id {
            continue;
        }
        let xj = S::from(other_id as u32);
        let denom = xj.clone() - xi.clone();
        let denom_inv = denom
            .invert()
            .ok_or(Error::Config("duplicate id in devotee list"))?;
        lambda = lambda * xj * denom_inv;
    }
    Ok(lambda)
}

impl<S: ECScalar> Zeroize for Polynomial<S> {
    fn zeroize(&mut self) {
        self.coefficients.zeroize();
    }
}
