//! Axes, n-dimensional sample buffers, and the factory that creates them.
//!
//! A [`Dataset`] stores `f64` samples with the first dimension varying
//! fastest, so position `[x, y, c]` in a `[w, h, 3]` dataset lives at
//! `x + w * (y + h * c)`.

#[cfg(test)]
#[path = "dataset_test.rs"]
mod dataset_test;

use serde::{Deserialize, Serialize};

/// A named dimension of a display or dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
    Channel,
    Time,
    Spectra,
}

impl Axis {
    /// Whether this is one of the two planar axes.
    #[must_use]
    pub fn is_xy(self) -> bool {
        matches!(self, Self::X | Self::Y)
    }
}

/// Errors from creating or addressing a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// `dims` and `axes` disagree on the number of dimensions.
    #[error("dataset has {dims} dimensions but {axes} axes")]
    AxisCount { dims: usize, axes: usize },
    /// A dimension length is zero.
    #[error("dataset dimension {index} has zero length")]
    EmptyDimension { index: usize },
    /// A position has the wrong rank or lies outside the dataset.
    #[error("position {position:?} is outside dataset of shape {dims:?}")]
    OutOfBounds { position: Vec<usize>, dims: Vec<usize> },
}

/// A writable n-dimensional sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    dims: Vec<usize>,
    axes: Vec<Axis>,
    bits_per_sample: u32,
    signed: bool,
    floating: bool,
    rgb_merged: bool,
    samples: Vec<f64>,
}

impl Dataset {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[must_use]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    #[must_use]
    pub fn bits_per_sample(&self) -> u32 {
        self.bits_per_sample
    }

    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    #[must_use]
    pub fn is_floating(&self) -> bool {
        self.floating
    }

    /// Whether the channel axis holds merged R, G, B components.
    #[must_use]
    pub fn is_rgb_merged(&self) -> bool {
        self.rgb_merged
    }

    pub fn set_rgb_merged(&mut self, merged: bool) {
        self.rgb_merged = merged;
    }

    /// Read the sample at `position`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `position` has the wrong rank or exceeds a dimension.
    pub fn get(&self, position: &[usize]) -> Result<f64, DatasetError> {
        let i = self.offset(position)?;
        Ok(self.samples[i])
    }

    /// Write the sample at `position`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `position` has the wrong rank or exceeds a dimension.
    pub fn set(&mut self, position: &[usize], value: f64) -> Result<(), DatasetError> {
        let i = self.offset(position)?;
        self.samples[i] = value;
        Ok(())
    }

    fn offset(&self, position: &[usize]) -> Result<usize, DatasetError> {
        let out_of_bounds = || DatasetError::OutOfBounds { position: position.to_vec(), dims: self.dims.clone() };
        if position.len() != self.dims.len() {
            return Err(out_of_bounds());
        }
        let mut offset = 0;
        let mut stride = 1;
        for (&p, &d) in position.iter().zip(&self.dims) {
            if p >= d {
                return Err(out_of_bounds());
            }
            offset += p * stride;
            stride *= d;
        }
        Ok(offset)
    }
}

/// Creates empty datasets on request.
pub trait DatasetFactory {
    /// Create a zero-filled dataset.
    ///
    /// # Errors
    ///
    /// Implementations reject shapes they cannot allocate.
    fn create(
        &self,
        dims: &[usize],
        name: &str,
        axes: &[Axis],
        bits_per_sample: u32,
        signed: bool,
        floating: bool,
    ) -> Result<Dataset, DatasetError>;
}

/// In-memory factory backed by a flat `Vec<f64>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDatasetFactory;

impl DatasetFactory for DefaultDatasetFactory {
    fn create(
        &self,
        dims: &[usize],
        name: &str,
        axes: &[Axis],
        bits_per_sample: u32,
        signed: bool,
        floating: bool,
    ) -> Result<Dataset, DatasetError> {
        if dims.len() != axes.len() {
            return Err(DatasetError::AxisCount { dims: dims.len(), axes: axes.len() });
        }
        if let Some(index) = dims.iter().position(|&d| d == 0) {
            return Err(DatasetError::EmptyDimension { index });
        }
        let len = dims.iter().product();
        Ok(Dataset {
            name: name.to_string(),
            dims: dims.to_vec(),
            axes: axes.to_vec(),
            bits_per_sample,
            signed,
            floating,
            rgb_merged: false,
            samples: vec![0.0; len],
        })
    }
}
