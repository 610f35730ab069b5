use alloc::vec;
use alloc::vec::Vec;


/// Dense matrix over GF(2), one row per 64-byte-aligned stride of u64 words,
/// bit i of a row at word i/64, bit i%64. Padding bits past `ncols` stay
/// zero; every constructor starts from an all-zero buffer, so equality over
/// the packed buffer is equality of the matrices.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct MatrixF2 {
    nrows: usize,
    ncols: usize,
    nblocks: usize,
    stride: usize,
    v: Vec<u64>,
}


/// Strip width of the Four-Russians elimination.
const M4R_K: usize = 8;


impl MatrixF2 {
    pub(crate) fn zeros(nrows: usize, ncols: usize) -> Self {
        debug_assert!(nrows > 0 && ncols > 0);
        let nblocks = (ncols + 63) / 64;
        let stride = (nblocks + 7) & !7;
        MatrixF2 { nrows, ncols, nblocks, stride, v: vec![0u64; stride * nrows] }
    }

    pub(crate) fn nrows(&self) -> usize { self.nrows }

    pub(crate) fn ncols(&self) -> usize { self.ncols }

    pub(crate) fn row(&self, r: usize) -> &[u64] {
        &self.v[r * self.stride..r * self.stride + self.nblocks]
    }

    pub(crate) fn row_mut(&mut self, r: usize) -> &mut [u64] {
        &mut self.v[r * self.stride..r * self.stride + self.nblocks]
    }

    pub(crate) fn get(&self, r: usize, c: usize) -> u64 {
        (self.v[r * self.stride + (c >> 6)] >> (c & 63)) & 1
    }

    pub(crate) fn set(&mut self, r: usize, c: usize, bit: u64) {
        let w = &mut self.v[r * self.stride + (c >> 6)];
        *w = (*w & !(1u64 << (c & 63))) | (bit << (c & 63));
    }

    fn xor_row_from(&mut self, dst: usize, src: usize) {
        let (d0, s0) = (dst * self.stride, src * self.stride);
        for w in 0..self.nblocks {
            let x = self.v[s0 + w];
            self.v[d0 + w] ^= x;
        }
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (a0, b0) = (a * self.stride, b * self.stride);
        for w in 0..self.nblocks {
            self.v.swap(a0 + w, b0 + w);
        }
    }

    /// Swap columns `a` and `b`. Column swapping is expensive, so identical
    /// indices are skipped.
    pub(crate) fn column_swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (wa, sa) = (a >> 6, a & 63);
        let (wb, sb) = (b >> 6, b & 63);
        for r in 0..self.nrows {
            let base = r * self.stride;
            let va = (self.v[base + wa] >> sa) & 1;
            let vb = (self.v[base + wb] >> sb) & 1;
            self.v[base + wa] = (self.v[base + wa] & !(1u64 << sa)) | (vb << sa);
            self.v[base + wb] = (self.v[base + wb] & !(1u64 << sb)) | (va << sb);
        }
    }

    fn strip_bits(&self, r: usize, c0: usize, k: usize) -> usize {
        let mut x = 0usize;
        for p in 0..k {
            x |= (self.get(r, c0 + p) as usize) << p;
        }
        x
    }

    /// Reduced row echelon form by the Method of Four Russians, in place.
    /// Pivots march left to right; a column with no usable pivot is swapped
    /// with the rightmost untried column and retried, and each swap is pushed
    /// onto the returned list so the caller can commute its column labels the
    /// same way. On a full-rank system the result is [I | A]. Returns the
    /// rank and the swap list.
    pub(crate) fn rref(&mut self) -> (usize, Vec<(u32, u32)>) {
        let mut swaps: Vec<(u32, u32)> = Vec::new();
        let mut table = vec![0u64; (1 << M4R_K) * self.nblocks];
        let mut limit = self.ncols;
        let mut r = 0;
        while r < self.nrows && r < self.ncols {
            let k = M4R_K.min(self.nrows - r).min(self.ncols - r);
            // gather k pivots for columns r..r+k, keeping the pivot block in
            // unit form as it grows
            let mut npiv = 0;
            while npiv < k {
                let c = r + npiv;
                let mut sel = None;
                for i in (r + npiv)..self.nrows {
                    for p in 0..npiv {
                        if self.get(i, r + p) == 1 {
                            self.xor_row_from(i, r + p);
                        }
                    }
                    if self.get(i, c) == 1 {
                        sel = Some(i);
                        break;
                    }
                }
                match sel {
                    Some(i) => {
                        self.swap_rows(i, r + npiv);
                        for p in 0..npiv {
                            if self.get(r + p, c) == 1 {
                                self.xor_row_from(r + p, r + npiv);
                            }
                        }
                        npiv += 1;
                    }
                    None => {
                        if limit <= c + 1 {
                            return (r + npiv, swaps);
                        }
                        limit -= 1;
                        self.column_swap(c, limit);
                        #[allow(clippy::cast_possible_truncation)] // ncols < 2^32
                        swaps.push((c as u32, limit as u32));
                    }
                }
            }
            // table of the 2^k pivot-row combinations
            for w in &mut table[..self.nblocks] {
                *w = 0;
            }
            for x in 1usize..(1 << k) {
                let low = x.trailing_zeros() as usize;
                let prev = (x & (x - 1)) * self.nblocks;
                let piv = (r + low) * self.stride;
                for w in 0..self.nblocks {
                    table[x * self.nblocks + w] = table[prev + w] ^ self.v[piv + w];
                }
            }
            // one table lookup clears the strip in every other row
            for i in 0..self.nrows {
                if i >= r && i < r + k {
                    continue;
                }
                let idx = self.strip_bits(i, r, k);
                if idx != 0 {
                    let base = i * self.stride;
                    for w in 0..self.nblocks {
                        self.v[base + w] ^= table[idx * self.nblocks + w];
                    }
                }
            }
            r += k;
        }
        (r, swaps)
    }
}
