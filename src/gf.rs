use alloc::vec;
use alloc::vec::Vec;


/// GF(2^m) in polynomial basis, with the field fixed by its reduction
/// polynomial. Elements are m-bit values in the low bits of a u16.
///
/// `mul`/`sqr`/`inv` run with a trace independent of the element values and
/// are the forms used wherever secret key material flows at run time. The
/// table-backed variants live in [`GfTables`] and are reserved for key
/// generation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Gf {
    pub(crate) m: u32,
    pub(crate) poly: u32,
}


/// GF(2^12), reduced by z^12 + z^3 + 1.
pub(crate) const GF12: Gf = Gf { m: 12, poly: 0x1009 };

/// GF(2^13), reduced by z^13 + z^4 + z^3 + z + 1.
pub(crate) const GF13: Gf = Gf { m: 13, poly: 0x201B };


impl Gf {
    /// Mask covering the m payload bits of an element.
    pub(crate) const fn elt_mask(self) -> u16 { ((1u32 << self.m) - 1) as u16 }

    /// Reduce a carryless product of degree at most 2m-2 back below degree m.
    #[allow(clippy::cast_possible_truncation)] // acc < 2^m at the end
    fn reduce(self, mut acc: u32) -> u16 {
        let mut k = 2 * self.m - 2;
        while k >= self.m {
            let mask = 0u32.wrapping_sub((acc >> k) & 1);
            acc ^= (self.poly << (k - self.m)) & mask;
            k -= 1;
        }
        acc as u16
    }

    /// Product in GF(2^m): shift-and-add carryless multiply, all m partial
    /// products formed, then polynomial reduction.
    pub(crate) fn mul(self, a: u16, b: u16) -> u16 {
        let mut acc = 0u32;
        let aa = u32::from(a);
        for i in 0..self.m {
            acc ^= (aa << i) & 0u32.wrapping_sub(u32::from((b >> i) & 1));
        }
        self.reduce(acc)
    }

    /// Square in GF(2^m): interleave zero bits, then reduce. Squaring is
    /// F2-linear, so no partial products are needed.
    pub(crate) fn sqr(self, a: u16) -> u16 {
        let mut x = u32::from(a);
        x = (x | (x << 8)) & 0x00FF_00FF;
        x = (x | (x << 4)) & 0x0F0F_0F0F;
        x = (x | (x << 2)) & 0x3333_3333;
        x = (x | (x << 1)) & 0x5555_5555;
        self.reduce(x)
    }

    fn sqr_n(self, mut a: u16, n: u32) -> u16 {
        for _ in 0..n {
            a = self.sqr(a);
        }
        a
    }

    /// Inverse by exponentiation to 2^m - 2, Itoh-Tsujii style addition
    /// chain through a^(2^(m-1) - 1). Returns 0 for input 0.
    pub(crate) fn inv(self, a: u16) -> u16 {
        let e2 = self.mul(self.sqr(a), a);
        if self.m == 12 {
            let e4 = self.mul(self.sqr_n(e2, 2), e2);
            let e5 = self.mul(self.sqr(e4), a);
            let e10 = self.mul(self.sqr_n(e5, 5), e5);
            let e11 = self.mul(self.sqr(e10), a);
            self.sqr(e11)
        } else {
            let e3 = self.mul(self.sqr(e2), a);
            let e6 = self.mul(self.sqr_n(e3, 3), e3);
            let e12 = self.mul(self.sqr_n(e6, 6), e6);
            self.sqr(e12)
        }
    }
}


/// Log/antilog tables over GF(2^m). Lookups are not constant-time; the only
/// caller is the Goppa-polynomial screening loop in key generation, which
/// burns millions of products per candidate and never touches them again
/// once a polynomial is accepted.
pub(crate) struct GfTables {
    pub(crate) gf: Gf,
    order: usize,
    log: Vec<u16>,
    exp: Vec<u16>,
}


impl GfTables {
    pub(crate) fn new(gf: Gf) -> Self {
        let order = (1usize << gf.m) - 1;
        let g = primitive_element(gf);
        let mut log = vec![0u16; order + 1];
        let mut exp = vec![0u16; 2 * order];
        let mut x = 1u16;
        #[allow(clippy::cast_possible_truncation)] // i < order < 2^16
        for i in 0..order {
            exp[i] = x;
            exp[i + order] = x;
            log[usize::from(x)] = i as u16;
            x = gf.mul(x, g);
        }
        GfTables { gf, order, log, exp }
    }

    pub(crate) fn mul(&self, a: u16, b: u16) -> u16 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp[usize::from(self.log[usize::from(a)]) + usize::from(self.log[usize::from(b)])]
    }

    pub(crate) fn sqr(&self, a: u16) -> u16 {
        if a == 0 {
            return 0;
        }
        self.exp[2 * usize::from(self.log[usize::from(a)])]
    }

    pub(crate) fn inv(&self, a: u16) -> u16 {
        if a == 0 {
            return 0;
        }
        self.exp[self.order - usize::from(self.log[usize::from(a)])]
    }
}


/// Smallest element generating the full multiplicative group. 2^13 - 1 is
/// prime, so for m=13 any element beyond 1 qualifies; 2^12 - 1 = 3^2*5*7*13
/// needs the cofactor checks (z itself has order 45 under z^12 + z^3 + 1).
fn primitive_element(gf: Gf) -> u16 {
    let order = (1u32 << gf.m) - 1;
    let factors: &[u32] = if gf.m == 12 { &[3, 5, 7, 13] } else { &[8191] };
    let mut g = 2u16;
    loop {
        if factors.iter().all(|&p| pow_vartime(gf, g, order / p) != 1) {
            return g;
        }
        g += 1;
    }
}


fn pow_vartime(gf: Gf, a: u16, mut e: u32) -> u16 {
    let mut base = a;
    let mut acc = 1u16;
    while e != 0 {
        if e & 1 == 1 {
            acc = gf.mul(acc, base);
        }
        base = gf.sqr(base);
        e >>= 1;
    }
    acc
}
