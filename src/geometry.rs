//! Hyperbolic domain geometry: pixel-to-disk mapping and the iterative
//! fold of a disk point into the canonical fundamental domain.

use std::f64::consts::PI;
use std::fmt;

pub use num_complex::Complex64;

/// Substituted for `q` when the caller asks for an ideal-vertex tiling.
pub const Q_INFINITY: u32 = 1 << 10;

/// Only precision loss can push |z| past the unit circle mid-fold.
const DISK_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    NotHyperbolic { p: u32, q: u32 },
    AlternatingOddP { p: u32 },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotHyperbolic { p, q } => write!(
                f,
                "{{{p},{q}}} is not hyperbolic: (p - 2) * (q - 2) must exceed 4"
            ),
            Self::AlternatingOddP { p } => {
                write!(f, "alternating mode cannot be used with odd p (p = {p})")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Terminal state of one pixel's reduction loop.
#[derive(Debug, Clone, Copy)]
pub struct Reduction {
    pub z: Complex64,
    /// Count of orientation-reversing operations applied.
    pub parity: u32,
    /// Iteration budget ran out before the point reached the domain.
    pub nonconvergent: bool,
    /// Point left the unit disk during reduction.
    pub escaped: bool,
}

impl Reduction {
    pub fn converged(&self) -> bool {
        !self.nonconvergent && !self.escaped
    }
}

/// Immutable per-render constants of the {p,q} fundamental domain: the
/// wedge of half-angle pi/p about the positive real axis (2pi/p under
/// alternation), cut off by the inversion circle of radius
/// `r = sqrt(sin^2(pi/p) / (cos^2(pi/q) - sin^2(pi/p)))` centred at
/// `d = sqrt(cos^2(pi/q) / (cos^2(pi/q) - sin^2(pi/p)))` on the real axis.
#[derive(Debug, Clone)]
pub struct Geometry {
    rotator: Complex64,
    wedge_slope: f64,
    /// Always tan(pi/p); selects the active inversion circle when the
    /// alternating wedge spans two single sectors.
    single_slope: f64,
    centre: Complex64,
    rot_centre: Complex64,
    r2: f64,
    alternating: bool,
    polygon: bool,
    max_iterations: u32,
    spin_limit: u32,
    input_sector: f64,
}

impl Geometry {
    /// Validate tiling parameters and precompute the domain constants;
    /// `q < 0` means infinity.
    pub fn new(
        p: u32,
        q: i64,
        alternating: bool,
        polygon: bool,
        max_iterations: u32,
    ) -> Result<Self, GeometryError> {
        let q = if q < 0 {
            Q_INFINITY
        } else {
            u32::try_from(q).unwrap_or(u32::MAX)
        };
        if (p as i64 - 2) * (q as i64 - 2) <= 4 {
            return Err(GeometryError::NotHyperbolic { p, q });
        }
        if alternating && p % 2 == 1 {
            return Err(GeometryError::AlternatingOddP { p });
        }

        let (pf, qf) = (f64::from(p), f64::from(q));
        let cos2_q = (PI / qf).cos().powi(2);
        let sin2_p = (PI / pf).sin().powi(2);
        let denom = cos2_q - sin2_p;
        let d = (cos2_q / denom).sqrt();
        let r = (sin2_p / denom).sqrt();

        // Domain extents along the two axes.
        let phi = PI / 2.0 - (PI / pf + PI / qf);
        let input_sector = (d - phi.cos() * r).max(phi.sin() * r);

        let sector = Complex64::from_polar(1.0, 2.0 * PI / pf);
        let centre = Complex64::new(d, 0.0);

        Ok(Self {
            rotator: if alternating { sector * sector } else { sector },
            wedge_slope: if alternating {
                (2.0 * PI / pf).tan()
            } else {
                (PI / pf).tan()
            },
            single_slope: (PI / pf).tan(),
            centre,
            rot_centre: sector * centre,
            r2: r * r,
            alternating,
            polygon,
            max_iterations,
            spin_limit: 2 * p,
            input_sector,
        })
    }

    /// Larger of the domain's horizontal and vertical extents.
    pub fn input_sector(&self) -> f64 {
        self.input_sector
    }

    /// Inside the wedge angle and outside the inversion circle(s).
    pub fn in_domain(&self, z: Complex64) -> bool {
        let in_wedge = z.im >= 0.0 && z.im < self.wedge_slope * z.re;
        if !in_wedge {
            return false;
        }
        let outside_primary = (z - self.centre).norm_sqr() > self.r2;
        if self.alternating {
            outside_primary && (z - self.rot_centre).norm_sqr() > self.r2
        } else {
            outside_primary
        }
    }

    /// Sweep `z` into the angular wedge by whole-sector rotations. Bounded:
    /// an orbit landing exactly on the wedge boundary can otherwise flip
    /// between the two neighboring sectors forever under rounding.
    fn rotate_into_wedge(&self, mut z: Complex64) -> Complex64 {
        for _ in 0..self.spin_limit {
            if z.im.abs() <= self.wedge_slope * z.re {
                break;
            }
            if z.im < 0.0 {
                z *= self.rotator;
            } else {
                z /= self.rotator;
            }
        }
        z
    }

    /// Invert `z` in the active boundary circle, accepted only when it
    /// strictly contracts |z|; the guard is what rules out cycling.
    pub fn invert(&self, z: Complex64) -> Option<Complex64> {
        let local = if !self.alternating || z.im.abs() < self.single_slope * z.re {
            self.centre
        } else {
            self.rot_centre
        };
        let w = z - local;
        let candidate = local + w * self.r2 / w.norm_sqr();
        (candidate.norm_sqr() < z.norm_sqr()).then_some(candidate)
    }

    /// Fold `z` into the canonical fundamental domain, recording the
    /// orientation parity of the folding.
    pub fn reduce(&self, mut z: Complex64) -> Reduction {
        let mut parity = 0u32;
        let done = |z, parity| Reduction {
            z,
            parity,
            nonconvergent: false,
            escaped: false,
        };

        for _ in 0..self.max_iterations {
            z = self.rotate_into_wedge(z);
            if self.in_domain(z) {
                return done(z, parity);
            }

            // Polygon mode treats reflections as non-chromatic.
            z = z.conj();
            if !self.polygon {
                parity += 1;
            }
            if self.in_domain(z) {
                return done(z, parity);
            }

            if let Some(next) = self.invert(z) {
                z = next;
                parity += 1;
            }
            if self.in_domain(z) {
                return done(z, parity);
            }

            if z.norm_sqr() > 1.0 + DISK_EPSILON {
                return Reduction {
                    z,
                    parity,
                    nonconvergent: false,
                    escaped: true,
                };
            }
        }

        Reduction {
            z,
            parity,
            nonconvergent: true,
            escaped: false,
        }
    }
}

/// How pixel coordinates land in the complex plane.
#[derive(Debug, Clone, Copy)]
pub enum Viewport {
    /// Conformal map sending the upper half-plane onto the unit disk.
    HalfPlane,
    /// Direct affine view of the disk: `z = translate + (X + iY) * zoom`.
    Affine { zoom: f64, translate: Complex64 },
}

impl Viewport {
    /// Map a pixel to a disk point; `None` when it falls outside the disk.
    pub fn to_disk(&self, x: u32, y: u32, size: u32) -> Option<Complex64> {
        let s = f64::from(size);
        let z = match *self {
            Self::HalfPlane => {
                let w = Complex64::new(
                    2.0 * f64::from(x) / s,
                    2.0 * (s - f64::from(y)) / s,
                );
                (w - Complex64::i()) / (-Complex64::i() * w + 1.0)
            }
            Self::Affine { zoom, translate } => {
                let xy = Complex64::new(
                    2.0 * f64::from(x) / s - 1.0,
                    2.0 * f64::from(y) / s - 1.0,
                );
                translate + xy * zoom
            }
        };
        (z.norm_sqr() <= 1.0).then_some(z)
    }
}

/// Global Mobius post-transform, deliberately the literal
/// `(z + m)/(1 + z*m)` rather than the conjugated disk-automorphism form.
pub fn mobius(z: Complex64, m: Complex64) -> Complex64 {
    (z + m) / (z * m + 1.0)
}
