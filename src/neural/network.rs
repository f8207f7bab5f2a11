//! Sequential stack of [`Layer`]s and the network-level genetic operators.
//!
//! A network is validated once when it is built: every layer must accept the
//! width the previous layer produces. Forward passes, mutation and crossover
//! preserve the layer shapes, so the check is never repeated.
//!
//! # Example
//!
//! ```rust
//! use evo_snake::neural::NetworkBuilder;
//! use rand::{SeedableRng, rngs::SmallRng};
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let net = NetworkBuilder::new(8)
//!     .random_weights(16, 0.0, 0.04, &mut rng)?
//!     .random_bias(0.0, 0.04, &mut rng)?
//!     .random_weights(4, 0.0, 0.04, &mut rng)?
//!     .build()?;
//!
//! assert_eq!(net.input_width(), 8);
//! assert_eq!(net.output_width(), 4);
//! # Ok::<(), evo_snake::neural::NetworkError>(())
//! ```

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::NetworkError;
use super::layer::{CutIndex, Layer, LayerKind, check_bounds, normal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Layer>", into = "Vec<Layer>")]
pub struct NeuralNet {
    layers: Vec<Layer>,
}

impl NeuralNet {
    /// Build a network, checking that adjacent layer widths line up
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, NetworkError> {
        if layers.is_empty() {
            return Err(NetworkError::Empty);
        }

        for (index, layer) in layers.iter().enumerate() {
            if layer.kind() == LayerKind::Bias && layer.shape().0 != 1 {
                return Err(NetworkError::BiasShape {
                    rows: layer.shape().0,
                });
            }

            if index > 0 {
                let expected = layers[index - 1].output_dim();
                if layer.input_dim() != expected {
                    return Err(NetworkError::Topology {
                        index,
                        expected,
                        actual: layer.input_dim(),
                    });
                }
            }
        }

        Ok(Self { layers })
    }

    /// Gaussian-initialised network: a weights and bias pair per stage
    pub fn random<R: Rng + ?Sized>(
        input_width: usize,
        hidden: &[usize],
        output_width: usize,
        mean: f64,
        std: f64,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        let mut builder = NetworkBuilder::new(input_width);
        for &width in hidden.iter().chain(std::iter::once(&output_width)) {
            builder = builder
                .random_weights(width, mean, std, rng)?
                .random_bias(mean, std, rng)?;
        }
        builder.build()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_width(&self) -> usize {
        self.layers[0].input_dim()
    }

    pub fn output_width(&self) -> usize {
        self.layers[self.layers.len() - 1].output_dim()
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }

    /// Thread `input` through every layer in order
    ///
    /// # Panics
    ///
    /// Panics if `input.len()` differs from [`input_width`](Self::input_width).
    /// Use [`try_forward`](Self::try_forward) for unchecked inputs.
    pub fn forward(&self, input: &Array1<f64>) -> Array1<f64> {
        self.layers
            .iter()
            .fold(input.clone(), |activation, layer| layer.forward_pass(&activation))
    }

    /// Like [`forward`](Self::forward), rejecting an input of the wrong width
    pub fn try_forward(&self, input: &Array1<f64>) -> Result<Array1<f64>, NetworkError> {
        if input.len() != self.input_width() {
            return Err(NetworkError::InputWidth {
                expected: self.input_width(),
                actual: input.len(),
            });
        }
        Ok(self.forward(input))
    }

    /// Index of the largest output, first occurrence on ties
    pub fn best_output(&self, input: &Array1<f64>) -> usize {
        argmax(&self.forward(input))
    }

    /// Add Gaussian noise to every parameter of every layer
    pub fn mutate_with_normal<R: Rng + ?Sized>(
        &mut self,
        mean: f64,
        std: f64,
        rng: &mut R,
    ) -> Result<(), NetworkError> {
        let noise = normal(mean, std)?;
        for layer in &mut self.layers {
            layer.mutate(&noise, rng);
        }
        Ok(())
    }

    /// Clip every parameter into `[min, max]`
    pub fn cap(&mut self, min: f64, max: f64) -> Result<(), NetworkError> {
        check_bounds(min, max)?;
        for layer in &mut self.layers {
            layer.cap(min, max)?;
        }
        Ok(())
    }

    /// Index-based crossover with one cut list per layer
    pub fn cross_over_index(
        &self,
        other: &NeuralNet,
        cuts: &[Vec<CutIndex>],
    ) -> Result<(NeuralNet, NeuralNet), NetworkError> {
        self.check_depth(other)?;
        if cuts.len() != self.layers.len() {
            return Err(NetworkError::CutListMismatch {
                expected: self.layers.len(),
                actual: cuts.len(),
            });
        }

        let (first, second): (Vec<Layer>, Vec<Layer>) = self
            .layers
            .iter()
            .zip(&other.layers)
            .zip(cuts)
            .map(|((mine, theirs), layer_cuts)| mine.cross_over_index(theirs, layer_cuts))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .unzip();

        Ok((Self { layers: first }, Self { layers: second }))
    }

    /// Uniform crossover: every parameter pair swaps with `probability`
    pub fn cross_over_uniform<R: Rng + ?Sized>(
        &self,
        other: &NeuralNet,
        probability: f64,
        rng: &mut R,
    ) -> Result<(NeuralNet, NeuralNet), NetworkError> {
        self.check_depth(other)?;

        let mut first = Vec::with_capacity(self.layers.len());
        let mut second = Vec::with_capacity(self.layers.len());
        for (mine, theirs) in self.layers.iter().zip(&other.layers) {
            let (a, b) = mine.cross_over_uniform(theirs, probability, rng)?;
            first.push(a);
            second.push(b);
        }

        Ok((Self { layers: first }, Self { layers: second }))
    }

    fn check_depth(&self, other: &NeuralNet) -> Result<(), NetworkError> {
        if self.layers.len() != other.layers.len() {
            return Err(NetworkError::LayerCountMismatch {
                left: self.layers.len(),
                right: other.layers.len(),
            });
        }
        Ok(())
    }
}

impl TryFrom<Vec<Layer>> for NeuralNet {
    type Error = NetworkError;

    fn try_from(layers: Vec<Layer>) -> Result<Self, Self::Error> {
        Self::from_layers(layers)
    }
}

impl From<NeuralNet> for Vec<Layer> {
    fn from(net: NeuralNet) -> Self {
        net.layers
    }
}

/// Index-based crossover over two equal-length parent lists, pairwise.
pub fn cross_over_index_pairs(
    firsts: &[NeuralNet],
    seconds: &[NeuralNet],
    cuts: &[Vec<CutIndex>],
) -> Result<Vec<(NeuralNet, NeuralNet)>, NetworkError> {
    if firsts.len() != seconds.len() {
        return Err(NetworkError::ParentCountMismatch {
            left: firsts.len(),
            right: seconds.len(),
        });
    }

    firsts
        .iter()
        .zip(seconds)
        .map(|(a, b)| a.cross_over_index(b, cuts))
        .collect()
}

/// Index of the maximum value; ties go to the lowest index
pub fn argmax(values: &Array1<f64>) -> usize {
    let mut best = 0;
    for (index, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = index;
        }
    }
    best
}

/// Incrementally assembles a [`NeuralNet`], sizing each new layer from the previous one
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    input_width: usize,
    layers: Vec<Layer>,
}

impl NetworkBuilder {
    pub fn new(input_width: usize) -> Self {
        Self {
            input_width,
            layers: Vec::new(),
        }
    }

    fn current_width(&self) -> usize {
        self.layers
            .last()
            .map(Layer::output_dim)
            .unwrap_or(self.input_width)
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn random_weights<R: Rng + ?Sized>(
        self,
        outputs: usize,
        mean: f64,
        std: f64,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        let layer = Layer::random_weights(self.current_width(), outputs, mean, std, rng)?;
        Ok(self.layer(layer))
    }

    pub fn random_bias<R: Rng + ?Sized>(
        self,
        mean: f64,
        std: f64,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        let layer = Layer::random_bias(self.current_width(), mean, std, rng)?;
        Ok(self.layer(layer))
    }

    pub fn build(self) -> Result<NeuralNet, NetworkError> {
        if let Some(first) = self.layers.first() {
            if first.input_dim() != self.input_width {
                return Err(NetworkError::Topology {
                    index: 0,
                    expected: self.input_width,
                    actual: first.input_dim(),
                });
            }
        }
        NeuralNet::from_layers(self.layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, arr1, arr2};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn small_net(rng: &mut SmallRng) -> NeuralNet {
        NeuralNet::random(3, &[5], 2, 0.0, 1.0, rng).unwrap()
    }

    #[test]
    fn test_forward_threads_layers_in_order() {
        let net = NeuralNet::from_layers(vec![
            Layer::weights(arr2(&[[1.0, 0.0], [0.0, 2.0]])),
            Layer::bias(arr1(&[1.0, -1.0])),
            Layer::weights(arr2(&[[1.0], [1.0]])),
        ])
        .unwrap();

        assert_eq!(net.forward(&arr1(&[3.0, 4.0])), arr1(&[11.0]));
        assert_eq!(net.input_width(), 2);
        assert_eq!(net.output_width(), 1);
    }

    #[test]
    fn test_topology_checked_at_construction() {
        let result = NeuralNet::from_layers(vec![
            Layer::weights(Array2::zeros((4, 3))),
            Layer::bias(Array1::zeros(2)),
        ]);
        assert_eq!(
            result,
            Err(NetworkError::Topology {
                index: 1,
                expected: 3,
                actual: 2
            })
        );

        assert_eq!(NeuralNet::from_layers(Vec::new()), Err(NetworkError::Empty));
    }

    #[test]
    fn test_builder_sizes_layers() {
        let mut rng = SmallRng::seed_from_u64(3);
        let net = NeuralNet::random(8, &[64, 64], 4, 0.0, 0.04, &mut rng).unwrap();

        let shapes: Vec<_> = net.layers().iter().map(Layer::shape).collect();
        assert_eq!(
            shapes,
            vec![(8, 64), (1, 64), (64, 64), (1, 64), (64, 4), (1, 4)]
        );
        assert_eq!(net.parameter_count(), 8 * 64 + 64 + 64 * 64 + 64 + 64 * 4 + 4);
    }

    #[test]
    fn test_builder_rejects_wrong_first_layer() {
        let result = NetworkBuilder::new(8)
            .layer(Layer::weights(Array2::zeros((6, 4))))
            .build();
        assert!(matches!(result, Err(NetworkError::Topology { index: 0, .. })));
    }

    #[test]
    fn test_argmax_prefers_first_maximum() {
        assert_eq!(argmax(&arr1(&[0.1, 0.9, 0.9, 0.2])), 1);
        assert_eq!(argmax(&arr1(&[-1.0, -2.0])), 0);
        assert_eq!(argmax(&arr1(&[2.0, 2.0, 2.0, 2.0])), 0);
    }

    #[test]
    fn test_mutation_on_copy_leaves_original() {
        let mut rng = SmallRng::seed_from_u64(5);
        let original = small_net(&mut rng);
        let mut copy = original.clone();

        copy.mutate_with_normal(0.0, 0.5, &mut rng).unwrap();

        assert_ne!(copy, original);
        assert_eq!(copy.layers().len(), original.layers().len());
    }

    #[test]
    fn test_mutation_rejects_bad_distribution() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut net = small_net(&mut rng);
        assert!(matches!(
            net.mutate_with_normal(0.0, -1.0, &mut rng),
            Err(NetworkError::InvalidDistribution { .. })
        ));
    }

    #[test]
    fn test_cap_is_idempotent() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut net = NeuralNet::random(3, &[5], 2, 0.0, 4.0, &mut rng).unwrap();

        net.cap(-1.0, 1.0).unwrap();
        let once = net.clone();
        net.cap(-1.0, 1.0).unwrap();

        assert_eq!(net, once);
        assert!(
            net.layers()
                .iter()
                .flat_map(|layer| layer.array().iter())
                .all(|v| (-1.0..=1.0).contains(v))
        );
    }

    #[test]
    fn test_index_crossover_round_trip() {
        let mut rng = SmallRng::seed_from_u64(7);
        let a = small_net(&mut rng);
        let b = small_net(&mut rng);
        let cuts: Vec<Vec<CutIndex>> = a
            .layers()
            .iter()
            .map(|layer| vec![CutIndex::Flat(layer.parameter_count() / 2)])
            .collect();

        let (c, d) = a.cross_over_index(&b, &cuts).unwrap();
        assert_ne!(c, a);

        let (back_a, back_b) = c.cross_over_index(&d, &cuts).unwrap();
        assert_eq!(back_a, a);
        assert_eq!(back_b, b);
    }

    #[test]
    fn test_index_crossover_needs_cut_per_layer() {
        let mut rng = SmallRng::seed_from_u64(8);
        let a = small_net(&mut rng);
        let b = small_net(&mut rng);

        assert_eq!(
            a.cross_over_index(&b, &[vec![CutIndex::Flat(1)]]),
            Err(NetworkError::CutListMismatch {
                expected: 4,
                actual: 1
            })
        );
    }

    #[test]
    fn test_crossover_rejects_different_depths() {
        let mut rng = SmallRng::seed_from_u64(9);
        let shallow = NeuralNet::random(3, &[], 2, 0.0, 1.0, &mut rng).unwrap();
        let deep = small_net(&mut rng);

        assert!(matches!(
            shallow.cross_over_uniform(&deep, 0.5, &mut rng),
            Err(NetworkError::LayerCountMismatch { left: 2, right: 4 })
        ));
    }

    #[test]
    fn test_uniform_crossover_extremes() {
        let mut rng = SmallRng::seed_from_u64(10);
        let a = small_net(&mut rng);
        let b = small_net(&mut rng);

        let (c, d) = a.cross_over_uniform(&b, 0.0, &mut rng).unwrap();
        assert_eq!((c, d), (a.clone(), b.clone()));

        let (c, d) = a.cross_over_uniform(&b, 1.0, &mut rng).unwrap();
        assert_eq!((c, d), (b, a));
    }

    #[test]
    fn test_try_forward_checks_input_width() {
        let mut rng = SmallRng::seed_from_u64(13);
        let net = small_net(&mut rng);
        let input = Array1::from_elem(net.input_width(), 1.0);

        assert_eq!(net.try_forward(&input).unwrap(), net.forward(&input));
        assert_eq!(
            net.try_forward(&arr1(&[1.0])),
            Err(NetworkError::InputWidth {
                expected: net.input_width(),
                actual: 1
            })
        );
    }

    #[test]
    fn test_pairwise_crossover_rejects_unequal_lists() {
        let mut rng = SmallRng::seed_from_u64(11);
        let nets = vec![small_net(&mut rng), small_net(&mut rng)];
        let cuts = vec![vec![]; 4];

        let err = cross_over_index_pairs(&nets, &nets[..1], &cuts).unwrap_err();
        assert_eq!(err, NetworkError::ParentCountMismatch { left: 2, right: 1 });
        assert_eq!(err.to_string(), "parent lists differ in length: 2 vs 1");
        assert_eq!(cross_over_index_pairs(&nets, &nets, &cuts).unwrap().len(), 2);
    }

    #[test]
    fn test_serde_round_trip_revalidates() {
        let mut rng = SmallRng::seed_from_u64(12);
        let net = small_net(&mut rng);

        let json = serde_json::to_string(&net).unwrap();
        let restored: NeuralNet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, net);

        let broken = vec![
            Layer::weights(Array2::zeros((3, 5))),
            Layer::weights(Array2::zeros((4, 2))),
        ];
        let json = serde_json::to_string(&broken).unwrap();
        assert!(serde_json::from_str::<NeuralNet>(&json).is_err());
    }
}
