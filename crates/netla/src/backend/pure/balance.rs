//! Balancing (`DGEBAL`) and back transformation (`DGEBAK`).
//!
//! The balanced matrix is `D⁻¹ Pᵀ A P D`. `scale[j]` holds the 1-based index
//! row/column `j` was interchanged with when `j` lies outside `ilo..=ihi`,
//! and the diagonal scaling factor otherwise.

use crate::Balance;

const RADIX: f64 = 2.0;
const FACTOR: f64 = 0.95;

pub(super) struct Balancing {
    /// 0-based, inclusive.
    pub ilo: usize,
    /// 0-based, inclusive.
    pub ihi: usize,
    pub scale: Vec<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum Side {
    Left,
    Right,
}

fn swap_cols(a: &mut [f64], n: usize, rows: usize, p: usize, q: usize) {
    for i in 0..rows {
        a.swap(p * n + i, q * n + i);
    }
}

fn swap_rows(a: &mut [f64], n: usize, from_col: usize, p: usize, q: usize) {
    for j in from_col..n {
        a.swap(j * n + p, j * n + q);
    }
}

/// Balance the dense `n`×`n` matrix `a` in place.
pub(super) fn gebal(job: Balance, n: usize, a: &mut [f64]) -> Balancing {
    let mut scale = vec![1.0; n];
    if n == 0 || job == Balance::None {
        return Balancing { ilo: 0, ihi: n.saturating_sub(1), scale };
    }

    // `k..l` is the active window, `l` exclusive.
    let mut k = 0;
    let mut l = n;

    if job.permutes() {
        // Rows with zero off-diagonal part move to the bottom.
        'rows: loop {
            for i in (0..l).rev() {
                let isolated = (0..l).all(|j| j == i || a[j * n + i] == 0.0);
                if !isolated {
                    continue;
                }
                let last = l - 1;
                scale[last] = (i + 1) as f64;
                if i != last {
                    swap_cols(a, n, l, i, last);
                    swap_rows(a, n, k, i, last);
                }
                if l == 1 {
                    return Balancing { ilo: 0, ihi: 0, scale };
                }
                l -= 1;
                continue 'rows;
            }
            break;
        }

        // Columns with zero off-diagonal part move to the left.
        'cols: loop {
            for j in k..l {
                let isolated = (k..l).all(|i| i == j || a[j * n + i] == 0.0);
                if !isolated {
                    continue;
                }
                scale[k] = (j + 1) as f64;
                if j != k {
                    swap_cols(a, n, l, j, k);
                    swap_rows(a, n, k, j, k);
                }
                k += 1;
                continue 'cols;
            }
            break;
        }
    }

    if !job.scales() {
        return Balancing { ilo: k, ihi: l - 1, scale };
    }

    let sfmin1 = f64::MIN_POSITIVE / f64::EPSILON;
    let sfmax1 = 1.0 / sfmin1;
    let sfmin2 = sfmin1 * RADIX;
    let sfmax2 = 1.0 / sfmin2;

    let mut noconv = true;
    while noconv {
        noconv = false;
        for i in k..l {
            let mut c = (k..l).map(|r| a[i * n + r].powi(2)).sum::<f64>().sqrt();
            let mut r = (k..l).map(|col| a[col * n + i].powi(2)).sum::<f64>().sqrt();
            let mut ca = (0..l).map(|row| a[i * n + row].abs()).fold(0.0, f64::max);
            let mut ra = (k..n).map(|col| a[col * n + i].abs()).fold(0.0, f64::max);

            if c == 0.0 || r == 0.0 || (c + ca + r + ra).is_nan() {
                continue;
            }

            let mut g = r / RADIX;
            let mut f = 1.0_f64;
            let s = c + r;
            while c < g && f.max(c).max(ca) < sfmax2 && r.min(g).min(ra) > sfmin2 {
                f *= RADIX;
                c *= RADIX;
                ca *= RADIX;
                r /= RADIX;
                g /= RADIX;
                ra /= RADIX;
            }
            g = c / RADIX;
            while g >= r && r.max(ra) < sfmax2 && f.min(c).min(g).min(ca) > sfmin2 {
                f /= RADIX;
                c /= RADIX;
                g /= RADIX;
                ca /= RADIX;
                r *= RADIX;
                ra *= RADIX;
            }

            if c + r >= FACTOR * s {
                continue;
            }
            if f < 1.0 && scale[i] < 1.0 && f * scale[i] <= sfmin1 {
                continue;
            }
            if f > 1.0 && scale[i] > 1.0 && scale[i] >= sfmax1 / f {
                continue;
            }

            scale[i] *= f;
            noconv = true;
            for col in k..n {
                a[col * n + i] /= f;
            }
            for row in 0..l {
                a[i * n + row] *= f;
            }
        }
    }

    Balancing { ilo: k, ihi: l - 1, scale }
}

/// Map eigenvectors of the balanced matrix back to the original one.
pub(super) fn gebak(job: Balance, bal: &Balancing, n: usize, v: &mut [f64], side: Side) {
    if n == 0 || job == Balance::None {
        return;
    }
    let (ilo, ihi) = (bal.ilo, bal.ihi);

    if job.scales() && ilo != ihi {
        for i in ilo..=ihi {
            let s = match side {
                Side::Right => bal.scale[i],
                Side::Left => 1.0 / bal.scale[i],
            };
            for j in 0..n {
                v[j * n + i] *= s;
            }
        }
    }

    if job.permutes() {
        for ii in 0..n {
            if (ilo..=ihi).contains(&ii) {
                continue;
            }
            let i = if ii < ilo { ilo - 1 - ii } else { ii };
            let k = bal.scale[i] as usize - 1;
            if k != i {
                for j in 0..n {
                    v.swap(j * n + i, j * n + k);
                }
            }
        }
    }
}
