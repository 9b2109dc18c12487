//! Reading the parameters of a run.
//!
//! The input file holds one number per line, in the order mean,
//! sigma, amplitude.  A missing or unreadable line does not abort the
//! reading: the corresponding value is `None` and ends up as NaN in
//! [`Parameters`], so that [`Parameters::validate`] reports it.

use std::{fs::File,
          io::{BufRead, BufReader},
          path::Path};
use tracing::{debug, warn};
use crate::{Error, Parameters};

/// Length of the longest prefix of `s` that is a decimal floating
/// point literal `[+-]? (d+ [. d*] | . d+) ([eE] [+-]? d+)?`.
fn numeric_prefix(s: &[u8]) -> usize {
    let digits = |mut i: usize| {
        while i < s.len() && s[i].is_ascii_digit() { i += 1 }
        i
    };
    let mut i = 0;
    if i < s.len() && (s[i] == b'+' || s[i] == b'-') { i += 1 }
    let int_end = digits(i);
    let mut end = int_end;
    let mut has_digits = int_end > i;
    if end < s.len() && s[end] == b'.' {
        let frac_end = digits(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits { return 0 }
    // An exponent is only part of the literal if digits follow.
    if end < s.len() && (s[end] == b'e' || s[end] == b'E') {
        let mut j = end + 1;
        if j < s.len() && (s[j] == b'+' || s[j] == b'-') { j += 1 }
        let exp_end = digits(j);
        if exp_end > j { end = exp_end }
    }
    end
}

/// C `isspace`, which includes the vertical tab.
fn is_space(b: u8) -> bool {
    b == b' ' || (b'\t'..=b'\r').contains(&b)
}

/// Parse the number at the start of `line` the way `atof` does:
/// leading white space is skipped and parsing stops at the first byte
/// that cannot continue the literal, whatever the encoding of the
/// rest of the line.  Return `None` if there is no number or if it is
/// not finite.  Hexadecimal literals are not recognised: `0x1p3`
/// reads as 0.
pub fn parse_bytes(line: &[u8]) -> Option<f64> {
    let start = line.iter().position(|&b| !is_space(b)).unwrap_or(line.len());
    let s = &line[start ..];
    let len = numeric_prefix(s);
    if len == 0 { return None }
    // The prefix is ASCII.
    let literal = std::str::from_utf8(&s[.. len]).ok()?;
    match literal.parse::<f64>() {
        Ok(x) if x.is_finite() => Some(x),
        _ => None,
    }
}

/// Same as [`parse_bytes`] on a string.
pub fn parse_lenient(line: &str) -> Option<f64> {
    parse_bytes(line.as_bytes())
}

/// Read the next line of `r` and parse it.  End of file, a read error
/// or an unparseable line all give `None`.  The line need not be
/// valid UTF-8.
pub fn read_value(r: &mut impl BufRead) -> Option<f64> {
    let mut line = Vec::new();
    match r.read_until(b'\n', &mut line) {
        Ok(0) => None,
        Ok(_) => parse_bytes(&line),
        Err(e) => {
            debug!("read error: {}", e);
            None
        }
    }
}

/// Read the three parameters (mean, sigma, amplitude) from `r`.
pub fn read_from(r: &mut impl BufRead) -> Parameters {
    let mut next = |name: &str| {
        let v = read_value(&mut *r);
        if v.is_none() {
            warn!("no valid value for {}, using NaN", name);
        }
        v.unwrap_or(f64::NAN)
    };
    let mean = next("mean");
    let sigma = next("sigma");
    let amplitude = next("amplitude");
    Parameters { mean, sigma, amplitude }
}

/// Open `path` and read the parameters from it.  The file is closed
/// before returning.
pub fn read_parameters(path: impl AsRef<Path>) -> Result<Parameters, Error> {
    let path = path.as_ref();
    let fh = File::open(path).map_err(|source| Error::Input {
        path: path.to_path_buf(), source })?;
    let p = read_from(&mut BufReader::new(fh));
    debug!(mean = p.mean, sigma = p.sigma, amplitude = p.amplitude,
           "read {}", path.display());
    Ok(p)
}
