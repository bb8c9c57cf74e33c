use rand::Rng;

/// Default modulus: 2^64 + 13, the smallest prime above 2^64.
///
/// Any two `i64` keys differ by less than `2^64`, so no pair of distinct keys is
/// congruent modulo this prime and every pair can be separated by some `(a, b)`.
pub const MODULUS: u128 = (1u128 << 64) + 13;

/// Largest supported modulus. `eval` splits `a` into a 64-bit low word and a
/// one-bit high word, which needs `a < 2^65`.
pub const MAX_MODULUS: u128 = 1u128 << 65;

/// Affine universal hash `h(x) = (a * x + b) mod p` with `1 <= a, b <= p`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AffineHash {
    a: u128,
    b: u128,
    p: u128,
}

impl AffineHash {
    /// Panics if `p` is out of range or `a`, `b` are outside `[1, p]`.
    pub fn new(a: u128, b: u128, p: u128) -> Self {
        assert!(is_valid_modulus(p), "modulus {p} outside (1, 2^65]");
        assert!((1..=p).contains(&a) && (1..=p).contains(&b), "parameters must lie in [1, p]");
        Self { a, b, p }
    }

    /// Draw `a` and `b` uniformly from `[1, p]`.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, p: u128) -> Self {
        debug_assert!(is_valid_modulus(p));
        let a = rng.gen_range(1..=p);
        let b = rng.gen_range(1..=p);
        Self { a, b, p }
    }

    /// `(a * x + b) mod p`, always in `[0, p)`.
    #[inline]
    pub fn eval(&self, x: i64) -> u128 {
        let p = self.p;
        // a == p and b == p are legal draws and reduce to zero.
        let a = if self.a == p { 0 } else { self.a };
        let b = if self.b == p { 0 } else { self.b };
        let mut ax = mul_mod(a, x.unsigned_abs(), p);
        if x < 0 && ax != 0 {
            ax = p - ax;
        }
        (ax + b) % p
    }

    /// `eval(x) mod n` as an index into a table of `n` slots.
    #[inline]
    pub fn bucket(&self, x: i64, n: usize) -> usize {
        debug_assert!(n > 0);
        (self.eval(x) % n as u128) as usize
    }

    #[inline]
    pub fn a(&self) -> u128 {
        self.a
    }

    #[inline]
    pub fn b(&self) -> u128 {
        self.b
    }

    #[inline]
    pub fn modulus(&self) -> u128 {
        self.p
    }
}

#[inline]
pub fn is_valid_modulus(p: u128) -> bool {
    p > 1 && p <= MAX_MODULUS
}

/// `a * y mod p` for `a < p <= 2^65` without overflowing `u128`.
///
/// a = hi * 2^64 + lo with hi in {0, 1}; both partial products fit in 128 bits.
#[inline]
fn mul_mod(a: u128, y: u64, p: u128) -> u128 {
    let y = y as u128;
    let lo = ((a as u64) as u128 * y) % p;
    let hi = if a >> 64 == 0 { 0 } else { (y << 64) % p };
    (lo + hi) % p
}
