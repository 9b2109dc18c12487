//! A stand-alone batch worker: read the parameters of a Gaussian from
//! a file, sample it on a fixed grid and write the samples to
//! `output.txt`.  It stands in for large codes that an external
//! supervisor prepares inputs for, launches and collects outputs from.
//!
//! The pipeline is Read → Validate → Sample → Write:
//!
//! ```
//! use gauss_worker::{Parameters, GridSpec, Sampling};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let p = Parameters { mean: 0., sigma: 1., amplitude: 1. }.validate()?;
//! let s = Sampling::gaussian(&p, &GridSpec::default());
//! assert_eq!(s.len(), 100);
//! # Ok(()) }
//! ```

use std::{fmt::{self, Display, Formatter},
          io::{self, Write},
          path::{Path, PathBuf}};
use tracing::{info, warn};

mod error;
pub mod format;
pub mod input;
pub mod output;

pub use error::{Error, ValidationError};

/// Name of the file the worker writes its results to (in the current
/// working directory).
pub const OUTPUT_FILE: &str = "output.txt";

////////////////////////////////////////////////////////////////////////
//
// Parameters

/// Parameters of the Gaussian `amplitude * exp(-(mean-x)²/(2 sigma²))`.
///
/// As read from a file any field may be NaN (missing or unparseable
/// line).  After [`Parameters::validate`], `sigma > 0` and
/// `amplitude >= 0`; `mean` is not checked and may still be NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub mean: f64,
    pub sigma: f64,
    pub amplitude: f64,
}

impl Parameters {
    /// Check `sigma > 0` then `amplitude >= 0`.  NaN fails both
    /// comparisons, hence is rejected for these two fields.
    pub fn validate(self) -> Result<Self, ValidationError> {
        if !(self.sigma > 0.) {
            return Err(ValidationError::SigmaNotPositive(self.sigma))
        }
        if !(self.amplitude >= 0.) {
            return Err(ValidationError::NegativeAmplitude(self.amplitude))
        }
        if self.mean.is_nan() {
            warn!("mean is NaN, all samples will be NaN");
        }
        Ok(self)
    }

    /// Value of the Gaussian at `x`.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        gaussian(self.mean, self.sigma, self.amplitude, x)
    }

    /// Write the parameters in the format of an input file: mean,
    /// sigma and amplitude each on its own line, printed as `%g`.
    pub fn write_input(&self, f: &mut impl Write) -> Result<(), io::Error> {
        for v in [self.mean, self.sigma, self.amplitude] {
            write!(f, "{}\n", format::general(v))?;
        }
        Ok(())
    }
}

/// The bell-shaped curve `amplitude * exp(-(mean-x)²/(2 sigma²))`.
#[inline]
pub fn gaussian(mean: f64, sigma: f64, amplitude: f64, x: f64) -> f64 {
    amplitude * (-(mean - x) * (mean - x) / (2. * sigma * sigma)).exp()
}

////////////////////////////////////////////////////////////////////////
//
// Grid

/// The interval \[`min_x`, `max_x`\[ divided in `n` cells.  The left
/// end of each cell is a sample point; `max_x` itself is never sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub min_x: f64,
    pub max_x: f64,
    pub n: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec { min_x: -10., max_x: 10., n: 100 }
    }
}

impl GridSpec {
    /// Distance between two consecutive sample points.
    #[inline]
    pub fn dx(&self) -> f64 {
        (self.max_x - self.min_x) / self.n as f64
    }

    /// The `i`-th sample point, `min_x + i * dx`.
    #[inline]
    pub fn x(&self, i: usize) -> f64 {
        self.min_x + i as f64 * self.dx()
    }

    /// Iterate on the `n` sample points in increasing order.
    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        (0 .. self.n).map(move |i| self.x(i))
    }
}

/// A box \[`xmin`, `xmax`\] × \[`ymin`, `ymax`\].
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl BoundingBox {
    /// Return `true` if the bounding box has a non-empty interior.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.xmin < self.xmax && self.ymin < self.ymax) // NAN ⟹ empty
    }
}

////////////////////////////////////////////////////////////////////////
//
// Sampling

/// The samples `(x, y)` of a function on a grid, in grid order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    points: Vec<[f64; 2]>,
}

impl Sampling {
    /// Return the number of samples.
    #[inline]
    pub fn len(&self) -> usize { self.points.len() }

    /// Return `true` if the sampling has no point.
    #[inline]
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// Iterate on the samples `[x, y]` in grid order.
    pub fn iter(&self) -> std::slice::Iter<'_, [f64; 2]> {
        self.points.iter()
    }

    /// Return the smallest rectangle enclosing all the points of the
    /// sampling `self` with finite coordinates.  If there are none,
    /// the "min" fields of the bounding box are set to +∞ and "max"
    /// fields to -∞.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox {
            xmin: f64::INFINITY,  xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,  ymax: f64::NEG_INFINITY };
        for &[x, y] in self.iter() {
            if !(x.is_finite() && y.is_finite()) { continue }
            if x < bb.xmin { bb.xmin = x }
            if bb.xmax < x { bb.xmax = x }
            if y < bb.ymin { bb.ymin = y }
            if bb.ymax < y { bb.ymax = y }
        }
        bb
    }

    /// Create a sampling of the graph of `f` on \[`a`, `b`\[ with
    /// evenly spaced values of the argument.
    ///
    /// Panics if `a` or `b` is not finite.
    ///
    /// # Example
    ///
    /// ```
    /// use gauss_worker::Sampling;
    /// let s = Sampling::grid(|x| x * x, 0., 1.).n(4).build();
    /// let xs: Vec<f64> = s.iter().map(|p| p[0]).collect();
    /// assert_eq!(xs, [0., 0.25, 0.5, 0.75]);
    /// ```
    #[must_use]
    pub fn grid<F>(f: F, a: f64, b: f64) -> Grid<F>
    where F: FnMut(f64) -> f64 {
        if !a.is_finite() {
            panic!("gauss_worker::grid: a = {} must be finite", a);
        }
        if !b.is_finite() {
            panic!("gauss_worker::grid: b = {} must be finite", b);
        }
        let n = GridSpec::default().n;
        Grid { f, cells: GridSpec { min_x: a, max_x: b, n } }
    }

    /// Sample the Gaussian with parameters `p` on `grid`.
    pub fn gaussian(p: &Parameters, grid: &GridSpec) -> Sampling {
        Sampling::grid(|x| p.eval(x), grid.min_x, grid.max_x)
            .n(grid.n).build()
    }
}

/// Options of a grid sampling.  See [`Sampling::grid`].
pub struct Grid<F> {
    f: F,
    cells: GridSpec,
}

impl<F> Grid<F>
where F: FnMut(f64) -> f64 {
    /// Set the number of evaluations of the function.  Panic if
    /// `n == 0`.  Default: 100.
    pub fn n(mut self, n: usize) -> Self {
        if n == 0 {
            panic!("gauss_worker: n = {} must at least be 1", n)
        }
        self.cells.n = n;
        self
    }

    /// Return the sampling.
    pub fn build(&mut self) -> Sampling {
        let mut points = Vec::with_capacity(self.cells.n);
        for x in self.cells.points() {
            points.push([x, (self.f)(x)]);
        }
        Sampling { points }
    }
}

impl From<Vec<[f64; 2]>> for Sampling {
    fn from(points: Vec<[f64; 2]>) -> Self { Sampling { points } }
}

////////////////////////////////////////////////////////////////////////
//
// Output

/// Digits after the decimal point of the `y` values written.
pub const Y_DIGITS: usize = 25;

impl Sampling {
    /// Write the sampling to `f` in a tabular form: each point is
    /// written as "x y" on a single line, `x` as with `%g` and `y`
    /// with [`Y_DIGITS`] decimals.  This format is compatible with
    /// Gnuplot.
    pub fn write(&self, f: &mut impl Write) -> Result<(), io::Error> {
        write!(f, "{}", self)
    }
}

impl Display for Sampling {
    /// Display the sampling in the same format as [`Sampling::write`].
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        for &[x, y] in self.iter() {
            write!(f, "{} {}\n", format::general(x), format::fixed(y, Y_DIGITS))?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////
//
// Running

/// Settings of a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub grid: GridSpec,
    /// Where the samples are written.
    pub output: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig { grid: GridSpec::default(), output: OUTPUT_FILE.into() }
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct Report {
    pub parameters: Parameters,
    pub samples: usize,
    pub output: PathBuf,
}

/// Run the whole pipeline on the input file `input`.  Diagnostic text
/// (the parameters read and the x span) goes to `log`; failing to
/// write it is not an error.  Nothing is written to the output file
/// unless all previous stages succeed.
pub fn run(config: &RunConfig, input: impl AsRef<Path>,
           log: &mut impl Write) -> Result<Report, Error> {
    let p = input::read_parameters(input)?;
    let _ = write!(log, "got      mean = {}\n\
                         got     sigma = {}\n\
                         got amplitude = {}\n",
                   format::general(p.mean), format::general(p.sigma),
                   format::general(p.amplitude));
    let p = p.validate()?;
    let grid = &config.grid;
    let _ = write!(log, "=> x span from {} to {}\n",
                   format::general(grid.min_x), format::general(grid.max_x));
    let s = Sampling::gaussian(&p, grid);
    output::write_file(&s, &config.output)?;
    info!("wrote {} samples to {}", s.len(), config.output.display());
    Ok(Report { parameters: p, samples: s.len(), output: config.output.clone() })
}

////////////////////////////////////////////////////////////////////////
//
// Tests

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use crate::{gaussian, GridSpec, Parameters, Sampling, ValidationError};

    fn params(mean: f64, sigma: f64, amplitude: f64) -> Parameters {
        Parameters { mean, sigma, amplitude }
    }

    #[test]
    fn validate_accepts() {
        let p = params(0., 1., 0.);
        assert_eq!(p.validate(), Ok(p));
        let p = params(-3., 1e-300, 5.);
        assert_eq!(p.validate(), Ok(p));
    }

    #[test]
    fn validate_sigma() {
        for sigma in [0., -0., -1., f64::NAN] {
            match params(0., sigma, 1.).validate() {
                Err(ValidationError::SigmaNotPositive(_)) => (),
                r => panic!("sigma = {}: {:?}", sigma, r),
            }
        }
    }

    #[test]
    fn validate_amplitude() {
        assert_eq!(params(0., 1., -1.).validate(),
                   Err(ValidationError::NegativeAmplitude(-1.)));
        assert!(matches!(params(0., 1., f64::NAN).validate(),
                         Err(ValidationError::NegativeAmplitude(_))));
        // The sigma check comes first.
        assert!(matches!(params(0., f64::NAN, f64::NAN).validate(),
                         Err(ValidationError::SigmaNotPositive(_))));
    }

    #[test]
    fn nan_mean_flows_through() {
        let p = params(f64::NAN, 1., 1.).validate().unwrap();
        let s = Sampling::gaussian(&p, &GridSpec::default());
        assert_eq!(s.len(), 100);
        assert!(s.iter().all(|&[x, y]| x.is_finite() && y.is_nan()));
    }

    #[test]
    fn default_grid() {
        let g = GridSpec::default();
        let xs: Vec<f64> = g.points().collect();
        assert_eq!(xs.len(), 100);
        assert_eq!(xs[0], -10.);
        assert_eq!(xs[50], 0.);
        assert!(xs[99] < 10.);
        for w in xs.windows(2) {
            assert!(w[0] < w[1]);
            assert!((w[1] - w[0] - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn peak_at_mean() {
        let mut rng = StdRng::seed_from_u64(0x6A055);
        for _ in 0 .. 256 {
            let mean = rng.gen_range(-10.0 .. 10.0);
            let sigma = rng.gen_range(1e-3 .. 10.0);
            let amplitude = rng.gen_range(0.0 .. 100.0);
            assert_eq!(gaussian(mean, sigma, amplitude, mean), amplitude);
        }
    }

    #[test]
    fn symmetric_about_mean() {
        let mut rng = StdRng::seed_from_u64(0x5E7);
        for _ in 0 .. 256 {
            let p = params(rng.gen_range(-10.0 .. 10.0),
                           rng.gen_range(1e-1 .. 10.0),
                           rng.gen_range(0.0 .. 100.0));
            let d = rng.gen_range(0.0 .. 20.0);
            let l = p.eval(p.mean - d);
            let r = p.eval(p.mean + d);
            assert!((l - r).abs() <= 1e-12 * p.amplitude,
                    "{:?}, d = {}: {} ≠ {}", p, d, l, r);
        }
    }

    #[test]
    fn sampling_values() {
        let p = params(0., 1., 1.);
        let s = Sampling::gaussian(&p, &GridSpec::default());
        let pts: Vec<[f64; 2]> = s.iter().copied().collect();
        assert_eq!(pts[50], [0., 1.]);
        assert_eq!(pts[55][1], (-0.5f64).exp());
        let bb = s.bounding_box();
        assert_eq!((bb.xmin, bb.ymax), (-10., 1.));
        assert!(!bb.is_empty());
    }

    #[test]
    fn grid_builder() {
        let s = Sampling::grid(|x| 2. * x, -1., 1.).n(4).build();
        assert_eq!(s.iter().copied().collect::<Vec<_>>(),
                   vec![[-1., -2.], [-0.5, -1.], [0., 0.], [0.5, 1.]]);
        let s = Sampling::grid(|x| x, 3., 3.).n(2).build();
        assert_eq!(s.iter().copied().collect::<Vec<_>>(),
                   vec![[3., 3.], [3., 3.]]);
    }

    #[test]
    #[should_panic]
    fn grid_rejects_zero_points() {
        let _ = Sampling::grid(|x| x, 0., 1.).n(0);
    }

    #[test]
    fn display_format() {
        let s = Sampling::from(vec![[0., 1.], [-9.8, 0.5]]);
        assert_eq!(s.to_string(),
                   "0 1.0000000000000000000000000\n\
                    -9.8 0.5000000000000000000000000\n");
        let mut buf = vec![];
        s.write(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), s.to_string());
        let mut buf = vec![];
        Sampling::from(vec![[1e-5, f64::NAN]]).write(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1e-05 nan\n");
    }

    #[test]
    fn write_input_format() {
        let mut buf = vec![];
        params(0.5, 2., 1e-7).write_input(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "0.5\n2\n1e-07\n");
    }
}
