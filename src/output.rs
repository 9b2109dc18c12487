//! Output files: one sample "x y" per line.

use std::{fs::File,
          io::{BufRead, BufWriter, Write},
          path::Path};
use tracing::debug;
use crate::{Error, Sampling};

/// Write `s` to the file `path`, replacing any previous content.  The
/// file is closed on every exit path.
pub fn write_file(s: &Sampling, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let fh = File::create(path).map_err(|e| Error::output(path, e))?;
    let mut fh = BufWriter::new(fh);
    s.write(&mut fh).map_err(|e| Error::output(path, e))?;
    fh.flush().map_err(|e| Error::output(path, e))?;
    debug!("{} lines written to {}", s.len(), path.display());
    Ok(())
}

impl Sampling {
    /// Read a sampling in the format produced by [`Sampling::write`].
    /// Blank lines are skipped; only the first two fields of each
    /// line are considered.
    pub fn read(r: impl BufRead) -> Result<Sampling, Error> {
        let mut points = vec![];
        for (i, line) in r.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let (x, y) = match (fields.next(), fields.next()) {
                (None, _) => continue,
                (Some(x), Some(y)) => (parse_float(x), parse_float(y)),
                (Some(_), None) => (None, None),
            };
            match (x, y) {
                (Some(x), Some(y)) => points.push([x, y]),
                _ => return Err(Error::Parse { line: i + 1,
                                               content: line }),
            }
        }
        Ok(Sampling::from(points))
    }

    /// Read the file `path` written by [`write_file`].
    pub fn read_file(path: impl AsRef<Path>) -> Result<Sampling, Error> {
        let path = path.as_ref();
        let fh = File::open(path).map_err(|source| Error::Input {
            path: path.to_path_buf(), source })?;
        Sampling::read(std::io::BufReader::new(fh))
    }
}

/// Parse a number as written by [`crate::format`], including the C
/// spellings of non-finite values.
fn parse_float(s: &str) -> Option<f64> {
    match s {
        "nan" | "-nan" => Some(f64::NAN),
        "inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        _ => s.parse().ok(),
    }
}
