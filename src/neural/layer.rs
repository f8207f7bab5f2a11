//! A single stage of a [`NeuralNet`](super::NeuralNet): either a weight
//! matrix or a bias row, plus the per-layer genetic operators.

use ndarray::{Array1, Array2, Axis, Zip};
use rand::Rng;
use rand::distributions::{Bernoulli, Distribution};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use super::error::NetworkError;

/// What a layer does to the vector flowing through it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerKind {
    /// `input x array`, shape `input_dim x output_dim`
    Weights,
    /// `input + array`, shape `1 x dim`
    Bias,
}

/// Cut position for index-based crossover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutIndex {
    /// Offset into the row-major flattened array
    Flat(usize),
    /// Row/column pair, flattened as `cols * row + col`
    Cell { row: usize, col: usize },
}

impl CutIndex {
    fn offset(&self, rows: usize, cols: usize) -> Result<usize, NetworkError> {
        let out_of_range = || NetworkError::CutOutOfRange {
            cut: *self,
            rows,
            cols,
        };

        match *self {
            CutIndex::Flat(offset) if offset <= rows * cols => Ok(offset),
            CutIndex::Cell { row, col } if row < rows && col < cols => Ok(cols * row + col),
            _ => Err(out_of_range()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    kind: LayerKind,
    array: Array2<f64>,
}

impl Layer {
    pub fn weights(array: Array2<f64>) -> Self {
        Self {
            kind: LayerKind::Weights,
            array,
        }
    }

    pub fn bias(values: Array1<f64>) -> Self {
        Self {
            kind: LayerKind::Bias,
            array: values.insert_axis(Axis(0)),
        }
    }

    /// Gaussian-initialised `inputs x outputs` weight matrix
    pub fn random_weights<R: Rng + ?Sized>(
        inputs: usize,
        outputs: usize,
        mean: f64,
        std: f64,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        let normal = normal(mean, std)?;
        Ok(Self::weights(Array2::from_shape_fn((inputs, outputs), |_| {
            normal.sample(rng)
        })))
    }

    /// Gaussian-initialised bias row of width `dim`
    pub fn random_bias<R: Rng + ?Sized>(
        dim: usize,
        mean: f64,
        std: f64,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        let normal = normal(mean, std)?;
        Ok(Self {
            kind: LayerKind::Bias,
            array: Array2::from_shape_fn((1, dim), |_| normal.sample(rng)),
        })
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn array(&self) -> &Array2<f64> {
        &self.array
    }

    pub fn shape(&self) -> (usize, usize) {
        self.array.dim()
    }

    /// Width of the vector this layer accepts
    pub fn input_dim(&self) -> usize {
        match self.kind {
            LayerKind::Weights => self.array.nrows(),
            LayerKind::Bias => self.array.ncols(),
        }
    }

    /// Width of the vector this layer produces
    pub fn output_dim(&self) -> usize {
        self.array.ncols()
    }

    pub fn parameter_count(&self) -> usize {
        self.array.len()
    }

    pub fn forward_pass(&self, input: &Array1<f64>) -> Array1<f64> {
        match self.kind {
            LayerKind::Weights => input.dot(&self.array),
            LayerKind::Bias => input + &self.array.row(0),
        }
    }

    /// Add independent Gaussian noise to every element
    pub fn mutate<R: Rng + ?Sized>(&mut self, noise: &Normal<f64>, rng: &mut R) {
        self.array.mapv_inplace(|value| value + noise.sample(rng));
    }

    /// Clip every element into `[min, max]`
    pub fn cap(&mut self, min: f64, max: f64) -> Result<(), NetworkError> {
        check_bounds(min, max)?;
        self.array.mapv_inplace(|value| value.clamp(min, max));
        Ok(())
    }

    /// Split both flattened arrays at `cuts` and interleave the segments.
    ///
    /// Segment 0 of the first child comes from `self`, segment 1 from `other`,
    /// and so on; the second child takes the mirror assignment.
    pub fn cross_over_index(
        &self,
        other: &Layer,
        cuts: &[CutIndex],
    ) -> Result<(Layer, Layer), NetworkError> {
        self.check_compatible(other)?;

        let (rows, cols) = self.shape();
        let mut offsets = cuts
            .iter()
            .map(|cut| cut.offset(rows, cols))
            .collect::<Result<Vec<_>, _>>()?;
        offsets.sort_unstable();

        // Parity of the number of cuts at or before an element picks its source
        let swapped = |flat: usize| offsets.partition_point(|&cut| cut <= flat) % 2 == 1;

        let first = Array2::from_shape_fn((rows, cols), |(r, c)| {
            if swapped(cols * r + c) {
                other.array[[r, c]]
            } else {
                self.array[[r, c]]
            }
        });
        let second = Array2::from_shape_fn((rows, cols), |(r, c)| {
            if swapped(cols * r + c) {
                self.array[[r, c]]
            } else {
                other.array[[r, c]]
            }
        });

        Ok((
            Layer {
                kind: self.kind,
                array: first,
            },
            Layer {
                kind: other.kind,
                array: second,
            },
        ))
    }

    /// Swap each element pair independently with probability `probability`.
    ///
    /// The two children are exact complements of each other.
    pub fn cross_over_uniform<R: Rng + ?Sized>(
        &self,
        other: &Layer,
        probability: f64,
        rng: &mut R,
    ) -> Result<(Layer, Layer), NetworkError> {
        self.check_compatible(other)?;
        let coin = Bernoulli::new(probability)
            .map_err(|_| NetworkError::InvalidProbability(probability))?;

        let mut first = self.array.clone();
        let mut second = other.array.clone();
        Zip::from(&mut first).and(&mut second).for_each(|a, b| {
            if coin.sample(rng) {
                std::mem::swap(a, b);
            }
        });

        Ok((
            Layer {
                kind: self.kind,
                array: first,
            },
            Layer {
                kind: other.kind,
                array: second,
            },
        ))
    }

    fn check_compatible(&self, other: &Layer) -> Result<(), NetworkError> {
        if self.kind != other.kind {
            return Err(NetworkError::KindMismatch {
                left: self.kind,
                right: other.kind,
            });
        }
        if self.shape() != other.shape() {
            return Err(NetworkError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }
}

pub(crate) fn normal(mean: f64, std: f64) -> Result<Normal<f64>, NetworkError> {
    if !mean.is_finite() {
        return Err(NetworkError::InvalidDistribution { mean, std });
    }
    Normal::new(mean, std).map_err(|_| NetworkError::InvalidDistribution { mean, std })
}

pub(crate) fn check_bounds(min: f64, max: f64) -> Result<(), NetworkError> {
    // Also rejects NaN on either side
    if min <= max {
        Ok(())
    } else {
        Err(NetworkError::InvalidBounds { min, max })
    }
}
