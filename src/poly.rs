use crate::gf::GfTables;
use alloc::vec;
use alloc::vec::Vec;


// Polynomial arithmetic over GF(2^m) for Goppa-candidate screening. All of
// this runs inside key generation on freshly drawn candidates, so it uses the
// table-backed field forms; rejected candidates never become key material.


/// Degree of a coefficient vector, or None for the zero polynomial.
fn degree(p: &[u16]) -> Option<usize> {
    p.iter().rposition(|&c| c != 0)
}


/// Square `u` and reduce modulo the monic polynomial `g` (degree t).
/// `u` has t coefficients (degree below t) and is updated in place.
fn sqr_mod(tables: &GfTables, u: &mut [u16], g: &[u16]) {
    let t = g.len() - 1;
    let mut v = vec![0u16; 2 * t - 1];
    for (i, &c) in u.iter().enumerate() {
        v[2 * i] = tables.sqr(c);
    }
    for i in (t..2 * t - 1).rev() {
        let c = v[i];
        if c != 0 {
            for (j, &gj) in g.iter().enumerate().take(t) {
                v[i - t + j] ^= tables.mul(c, gj);
            }
            v[i] = 0;
        }
    }
    u.copy_from_slice(&v[..t]);
}


/// Remainder of `a` modulo `b` (b nonzero), in place on a working copy.
fn rem(tables: &GfTables, a: &[u16], b: &[u16]) -> Vec<u16> {
    let mut r = a.to_vec();
    let db = degree(b).expect("rem by zero polynomial");
    let lead_inv = tables.inv(b[db]);
    while let Some(dr) = degree(&r) {
        if dr < db {
            break;
        }
        let c = tables.mul(r[dr], lead_inv);
        for j in 0..=db {
            r[dr - db + j] ^= tables.mul(c, b[j]);
        }
        r[dr] = 0;
    }
    r
}


/// Monic gcd of two polynomials.
fn gcd(tables: &GfTables, a: &[u16], b: &[u16]) -> Vec<u16> {
    let mut x = a.to_vec();
    let mut y = b.to_vec();
    while degree(&y).is_some() {
        let r = rem(tables, &x, &y);
        x = y;
        y = r;
    }
    if let Some(d) = degree(&x) {
        let s = tables.inv(x[d]);
        for c in &mut x {
            *c = tables.mul(*c, s);
        }
    }
    x
}


/// Ben-Or distinct-degree irreducibility test for a monic degree-t candidate.
/// Tracks u = z^(q^k) mod g for k = 1..t/2 (q = 2^m, one Frobenius step is m
/// modular squarings) and rejects as soon as gcd(u + z, g) is nontrivial; a
/// composite of degree t always has a factor of degree at most t/2.
pub(crate) fn is_irreducible(tables: &GfTables, g: &[u16]) -> bool {
    let t = g.len() - 1;
    debug_assert!(t >= 2 && g[t] == 1);
    let mut u = vec![0u16; t];
    u[1] = 1;
    for _k in 1..=t / 2 {
        for _ in 0..tables.gf.m {
            sqr_mod(tables, &mut u, g);
        }
        let mut u_plus_z = u.clone();
        u_plus_z[1] ^= 1;
        let d = gcd(tables, &u_plus_z, g);
        if degree(&d) != Some(0) {
            return false;
        }
    }
    true
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf::{Gf, GfTables, GF12, GF13};
    use rand::{Rng, SeedableRng};

    fn eval(gf: Gf, f: &[u16], x: u16) -> u16 {
        crate::fft::horner(gf, f, x)
    }

    #[test]
    fn test_rejects_products() {
        let tables = GfTables::new(GF13);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);
        // (z + a)(z + b) = z^2 + (a+b) z + ab is never irreducible
        for _ in 0..50 {
            let a = rng.gen::<u16>() & GF13.elt_mask();
            let b = rng.gen::<u16>() & GF13.elt_mask();
            let g = [tables.mul(a, b), a ^ b, 1];
            assert!(!is_irreducible(&tables, &g));
        }
    }

    #[test]
    fn test_accepted_candidates_have_no_roots() {
        let tables = GfTables::new(GF12);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(6);
        let t = 8;
        let mut found = 0;
        for _ in 0..2000 {
            let mut g: Vec<u16> = (0..t).map(|_| rng.gen::<u16>() & GF12.elt_mask()).collect();
            g.push(1);
            if is_irreducible(&tables, &g) {
                found += 1;
                for x in (0..4096u16).step_by(7) {
                    assert_ne!(eval(GF12, &g, x), 0);
                }
                // irreducible of degree 8 over GF(2^12) cannot share a factor
                // with (z + x)(z + y)
                let pr = [tables.mul(3, 5), 3 ^ 5, 1];
                let d = gcd(&tables, &g, &pr);
                assert_eq!(degree(&d), Some(0));
                if found >= 3 {
                    break;
                }
            }
        }
        assert!(found >= 3, "no irreducible degree-8 candidates in 2000 draws");
    }

    #[test]
    fn test_sqr_mod_agrees_with_rem() {
        let tables = GfTables::new(GF13);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let t = 6;
            let mut g: Vec<u16> = (0..t).map(|_| rng.gen::<u16>() & GF13.elt_mask()).collect();
            g.push(1);
            let u: Vec<u16> = (0..t).map(|_| rng.gen::<u16>() & GF13.elt_mask()).collect();
            let mut w = u.clone();
            sqr_mod(&tables, &mut w, &g);
            let mut usq = vec![0u16; 2 * t - 1];
            for (i, &c) in u.iter().enumerate() {
                usq[2 * i] = tables.sqr(c);
            }
            let r = rem(&tables, &usq, &g);
            assert_eq!(&r[..t], &w[..]);
        }
    }
}
