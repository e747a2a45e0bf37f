//! Reader for the IDX binary format used by MNIST and its derivatives.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   magic 0x00000803 (2051: uint8 data, 3 dimensions)
//! bytes  4-7:   N      (number of images, big-endian u32)
//! bytes  8-11:  rows   (image height in pixels, big-endian u32)
//! bytes 12-15:  cols   (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   magic 0x00000801 (2049: uint8 data, 1 dimension)
//! bytes  4-7:   N      (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index
//! ```

use std::path::Path;

use tracing::debug;

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

pub const IMAGE_MAGIC: u32 = 2051;
pub const LABEL_MAGIC: u32 = 2049;

const IMAGE_HEADER_LEN: usize = 16;
const LABEL_HEADER_LEN: usize = 8;

fn read_u32_be(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

fn fault(msg: String) -> Error {
    Error::DataLoad(msg)
}

/// Parses an image/label IDX pair into a `Dataset` whose inputs are
/// `(rows * cols) × 1` column vectors with pixels scaled to `[0, 1]`.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8]) -> Result<Dataset> {
    // ── Image header ────────────────────────────────────────────────────────

    if image_bytes.len() < IMAGE_HEADER_LEN {
        return Err(fault(format!(
            "IDX image file too short: expected at least {} header bytes, got {}",
            IMAGE_HEADER_LEN,
            image_bytes.len()
        )));
    }
    let magic = read_u32_be(image_bytes, 0);
    if magic != IMAGE_MAGIC {
        return Err(fault(format!(
            "invalid magic number in images file: expected {}, got {}",
            IMAGE_MAGIC, magic
        )));
    }

    let n_items = read_u32_be(image_bytes, 4) as usize;
    let rows = read_u32_be(image_bytes, 8) as usize;
    let cols = read_u32_be(image_bytes, 12) as usize;

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
        fault(format!("IDX image file: rows * cols overflows (rows={}, cols={})", rows, cols))
    })?;
    let data_len = n_items.checked_mul(n_pixels).ok_or_else(|| {
        fault(format!(
            "IDX image file: n_items * n_pixels overflows (n_items={}, n_pixels={})",
            n_items, n_pixels
        ))
    })?;
    if image_bytes.len() - IMAGE_HEADER_LEN < data_len {
        return Err(fault(format!(
            "IDX image file too short: header declares {} images of {}x{} pixels \
             ({} data bytes), but only {} follow the header",
            n_items,
            rows,
            cols,
            data_len,
            image_bytes.len() - IMAGE_HEADER_LEN
        )));
    }

    // ── Label header ────────────────────────────────────────────────────────

    if label_bytes.len() < LABEL_HEADER_LEN {
        return Err(fault(format!(
            "IDX label file too short: expected at least {} header bytes, got {}",
            LABEL_HEADER_LEN,
            label_bytes.len()
        )));
    }
    let magic = read_u32_be(label_bytes, 0);
    if magic != LABEL_MAGIC {
        return Err(fault(format!(
            "invalid magic number in labels file: expected {}, got {}",
            LABEL_MAGIC, magic
        )));
    }

    let label_count = read_u32_be(label_bytes, 4) as usize;
    if label_count != n_items {
        return Err(fault(format!(
            "number of images and labels don't match: {} images, {} labels",
            n_items, label_count
        )));
    }
    if label_bytes.len() - LABEL_HEADER_LEN < n_items {
        return Err(fault(format!(
            "IDX label file too short: header declares {} labels but only {} follow the header",
            n_items,
            label_bytes.len() - LABEL_HEADER_LEN
        )));
    }

    // ── Samples ─────────────────────────────────────────────────────────────

    let pixels = &image_bytes[IMAGE_HEADER_LEN..IMAGE_HEADER_LEN + data_len];
    let inputs: Vec<Matrix> = if n_pixels == 0 {
        vec![Matrix::zeros(0, 1); n_items]
    } else {
        pixels
            .chunks_exact(n_pixels)
            .map(|chunk| {
                let values: Vec<f64> = chunk.iter().map(|&px| px as f64 / 255.0).collect();
                Matrix::column(&values)
            })
            .collect()
    };
    let labels = label_bytes[LABEL_HEADER_LEN..LABEL_HEADER_LEN + n_items]
        .iter()
        .map(|&l| l as usize)
        .collect();

    debug!(samples = n_items, rows, cols, "parsed IDX pair");
    Dataset::new(inputs, labels)
}

/// Reads and parses an image/label IDX pair from disk.
pub fn load_idx_pair(images_path: impl AsRef<Path>, labels_path: impl AsRef<Path>) -> Result<Dataset> {
    let images_path = images_path.as_ref();
    let labels_path = labels_path.as_ref();
    let image_bytes = std::fs::read(images_path).map_err(|e| {
        fault(format!("cannot open images file {}: {}", images_path.display(), e))
    })?;
    let label_bytes = std::fs::read(labels_path).map_err(|e| {
        fault(format!("cannot open labels file {}: {}", labels_path.display(), e))
    })?;
    parse_idx_pair(&image_bytes, &label_bytes)
}
