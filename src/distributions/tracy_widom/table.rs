use super::{Beta, TracyWidomError};

// Scale of the integer abscissa grid.
const X_SCALE: f64 = 1.0e-2;
// Scale of the fixed-point CDF values.
const Y_SCALE: f64 = 1.0e-6;

// Tabulated CDF values, stored as little-endian `i32` scaled by `1/Y_SCALE`.
static BETA_1: &[u8] = include_bytes!("data/beta1.bin");
static BETA_2: &[u8] = include_bytes!("data/beta2.bin");
static BETA_4: &[u8] = include_bytes!("data/beta4.bin");

/// Embedded table and its integer abscissa range `[lo, hi)`.
fn source(beta: Beta) -> (&'static [u8], (i32, i32)) {
    match beta {
        Beta::One => (BETA_1, (-389, 360)),
        Beta::Two => (BETA_2, (-389, 250)),
        Beta::Four => (BETA_4, (-399, 70)),
    }
}

/// Decodes the embedded CDF table of the specified ensemble into abscissae
/// and CDF values.
pub(super) fn decode(beta: Beta) -> Result<(Vec<f64>, Vec<f64>), TracyWidomError> {
    let (blob, grid) = source(beta);

    decode_blob(beta, blob, grid)
}

fn decode_blob(
    beta: Beta,
    blob: &[u8],
    (lo, hi): (i32, i32),
) -> Result<(Vec<f64>, Vec<f64>), TracyWidomError> {
    let expected = (hi - lo) as usize * 4;
    if blob.len() != expected {
        return Err(TracyWidomError::CorruptTable {
            beta,
            len: blob.len(),
            expected,
        });
    }

    let x = (lo..hi).map(|i| f64::from(i) * X_SCALE).collect();
    let y = blob
        .chunks_exact(4)
        .map(|b| f64::from(i32::from_le_bytes([b[0], b[1], b[2], b[3]])) * Y_SCALE)
        .collect();

    Ok((x, y))
}
