//! Dense (horizon, conversation, feature) tensor.

use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

/// Dense 3-dimensional tensor stored row-major: the feature index varies
/// fastest, so each (horizon, conversation) fiber is a contiguous slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTensor")]
pub struct Tensor3 {
    shape: [usize; 3],
    data: Vec<f64>,
}

#[derive(Deserialize)]
struct RawTensor {
    shape: [usize; 3],
    data: Vec<f64>,
}

impl TryFrom<RawTensor> for Tensor3 {
    type Error = TensorError;

    fn try_from(raw: RawTensor) -> Result<Self, Self::Error> {
        Tensor3::from_vec(raw.shape, raw.data)
    }
}

impl Tensor3 {
    /// A tensor of the given shape filled with zeros.
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.iter().product()],
        }
    }

    /// Wrap row-major data, checking that its length matches the shape.
    pub fn from_vec(shape: [usize; 3], data: Vec<f64>) -> Result<Self, TensorError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(TensorError::InvalidShape {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Build a tensor from a generator over `(horizon, conversation, feature)`.
    pub fn from_fn(shape: [usize; 3], mut f: impl FnMut(usize, usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(shape.iter().product());
        for h in 0..shape[0] {
            for c in 0..shape[1] {
                for k in 0..shape[2] {
                    data.push(f(h, c, k));
                }
            }
        }
        Self { shape, data }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn horizons(&self) -> usize {
        self.shape[0]
    }

    pub fn conversations(&self) -> usize {
        self.shape[1]
    }

    pub fn features(&self) -> usize {
        self.shape[2]
    }

    /// Smallest dimension; an upper bound many solvers place on the rank.
    pub fn min_dimension(&self) -> usize {
        self.shape.iter().copied().min().unwrap_or(0)
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, h: usize, c: usize, f: usize) -> Option<f64> {
        if h >= self.shape[0] || c >= self.shape[1] || f >= self.shape[2] {
            return None;
        }
        self.data.get(self.offset(h, c) + f).copied()
    }

    /// The feature vector at (horizon, conversation).
    ///
    /// Panics if either index is out of range.
    pub fn fiber(&self, h: usize, c: usize) -> &[f64] {
        let start = self.offset(h, c);
        &self.data[start..start + self.shape[2]]
    }

    /// Mutable feature vector at (horizon, conversation).
    ///
    /// Panics if either index is out of range.
    pub fn fiber_mut(&mut self, h: usize, c: usize) -> &mut [f64] {
        let start = self.offset(h, c);
        let len = self.shape[2];
        &mut self.data[start..start + len]
    }

    /// Replace every missing (non-finite) cell with `value`.
    /// Returns the number of cells replaced.
    pub fn impute_missing(&mut self, value: f64) -> usize {
        let mut replaced = 0;
        for cell in self.data.iter_mut().filter(|v| !v.is_finite()) {
            *cell = value;
            replaced += 1;
        }
        replaced
    }

    /// Number of missing (non-finite) cells.
    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_finite()).count()
    }

    fn offset(&self, h: usize, c: usize) -> usize {
        assert!(
            h < self.shape[0] && c < self.shape[1],
            "fiber index ({h}, {c}) out of range for shape {:?}",
            self.shape
        );
        (h * self.shape[1] + c) * self.shape[2]
    }
}
