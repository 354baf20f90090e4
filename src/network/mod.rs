//! Fixed-topology feed-forward networks. Training never changes a network's shape, only the
//! weights and biases inside it.

pub mod layer;

pub use layer::{Layer, Neuron};

use crate::{
    config::ConfigError,
    random::{MutationRate, Span},
};
use rand::RngCore;
use rulinalg::vector::Vector;
use serde::Serialize;

pub type Activation = fn(f64) -> f64;

pub mod activate {
    use core::f64::consts::E;

    pub fn sigmoid(x: f64) -> f64 {
        1. / (1. + E.powf(-x))
    }

    pub fn steep_sigmoid(x: f64) -> f64 {
        1. / (1. + E.powf(-4.9 * x))
    }

    pub fn relu(x: f64) -> f64 {
        if x < 0. {
            0.
        } else {
            x
        }
    }

    /// Look up an activation by its command line name
    pub fn named(name: &str) -> Option<super::Activation> {
        match name {
            "sigmoid" => Some(sigmoid),
            "steep_sigmoid" => Some(steep_sigmoid),
            "relu" => Some(relu),
            _ => None,
        }
    }
}

/// The shape of a network: `depth` hidden layers of `size` neurons, reading `input` values and
/// producing `output` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Topology {
    depth: usize,
    input: usize,
    size: usize,
    output: usize,
}

impl Topology {
    pub fn new(depth: usize, input: usize, size: usize, output: usize) -> Result<Self, ConfigError> {
        if depth == 0 || input == 0 || size == 0 || output == 0 {
            return Err(ConfigError::Topology {
                depth,
                input,
                size,
                output,
            });
        }
        Ok(Self {
            depth,
            input,
            size,
            output,
        })
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn input(&self) -> usize {
        self.input
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn output(&self) -> usize {
        self.output
    }

    /// Total count of weights and biases
    pub fn params(&self) -> usize {
        let first = self.input * self.size + self.size;
        let hidden = (self.depth - 1) * (self.size * self.size + self.size);
        let output = self.size * self.output + self.output;
        first + hidden + output
    }

    /// Scale a per-parameter rate by depth, so deeper networks see proportionally more change
    pub fn scaled_rate(&self, base: f64) -> Result<MutationRate, ConfigError> {
        MutationRate::new(base * self.depth as f64)
    }
}

#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    hidden: Vec<Layer>,
    output: Layer,
}

impl Network {
    /// A network of the given shape with every weight and bias at zero
    pub fn new(topology: Topology) -> Self {
        let mut hidden = Vec::with_capacity(topology.depth);
        hidden.push(Layer::new(topology.input, topology.size));
        hidden.extend((1..topology.depth).map(|_| Layer::new(topology.size, topology.size)));
        Self {
            topology,
            hidden,
            output: Layer::new(topology.size, topology.output),
        }
    }

    pub fn random(topology: Topology, span: &Span, rng: &mut impl RngCore) -> Self {
        let mut network = Self::new(topology);
        network.randomize(span, rng);
        network
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn hidden(&self) -> &[Layer] {
        &self.hidden
    }

    pub fn hidden_mut(&mut self) -> &mut [Layer] {
        &mut self.hidden
    }

    pub fn output_layer(&self) -> &Layer {
        &self.output
    }

    pub fn output_layer_mut(&mut self) -> &mut Layer {
        &mut self.output
    }

    /// Replace every parameter with `f` of itself. Hidden layers are visited first to last and the
    /// output layer after them, each neuron's weights before its bias.
    pub fn update(&mut self, mut f: impl FnMut(f64) -> f64) {
        for layer in self.hidden.iter_mut() {
            layer.update(&mut f);
        }
        self.output.update(&mut f);
    }

    /// Every parameter in [Network::update] order
    pub fn params(&self) -> impl Iterator<Item = f64> + '_ {
        self.hidden
            .iter()
            .chain(Some(&self.output))
            .flat_map(|layer| layer.params())
    }

    /// Redraw every parameter from `span`
    pub fn randomize(&mut self, span: &Span, rng: &mut impl RngCore) {
        self.update(|_| span.sample(rng));
    }

    /// Redraw each parameter from `span` independently with probability `rate`
    pub fn mutate(&mut self, rate: &MutationRate, span: &Span, rng: &mut impl RngCore) {
        self.update(|w| if rate.happens(rng) { span.sample(rng) } else { w });
    }

    /// Feed `input` through the network. The first hidden layer passes its affine output on
    /// unactivated, every later hidden layer and the output layer apply σ.
    ///
    /// Panics if `input` is not exactly [Topology::input] wide.
    pub fn forward(&self, input: &[f64], σ: impl Fn(f64) -> f64) -> Vec<f64> {
        assert_eq!(
            input.len(),
            self.topology.input,
            "network input width mismatch"
        );
        let mut data = Vector::new(input.to_vec());
        for (idx, layer) in self.hidden.iter().enumerate() {
            data = layer.calculate(&data);
            if idx > 0 {
                data = data.apply(&σ);
            }
        }
        self.output.calculate(&data).apply(&σ).into_vec()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{assert_f64_approx, random::WyRng};

    fn topology() -> Topology {
        Topology::new(2, 4, 4, 3).unwrap()
    }

    #[test]
    fn test_topology_rejects_zero() {
        assert!(Topology::new(0, 1, 1, 1).is_err());
        assert!(Topology::new(1, 0, 1, 1).is_err());
        assert!(Topology::new(1, 1, 0, 1).is_err());
        assert!(Topology::new(1, 1, 1, 0).is_err());
    }

    #[test]
    fn test_shape() {
        let network = Network::new(topology());
        assert_eq!(network.hidden().len(), 2);
        assert_eq!(network.hidden()[0].inputs(), 4);
        assert_eq!(network.hidden()[1].inputs(), 4);
        assert_eq!(network.output_layer().width(), 3);
        assert_eq!(network.params().count(), topology().params());
    }

    #[test]
    fn test_connect4_shape() {
        let t = Topology::new(2, 64, 64, 8).unwrap();
        assert_eq!(t.params(), 64 * 65 * 2 + 8 * 65);
    }

    #[test]
    fn test_scaled_rate() {
        let t = Topology::new(2, 64, 64, 8).unwrap();
        assert_f64_approx!(t.scaled_rate(0.05).unwrap().p(), 0.1);
        assert!(Topology::new(30, 1, 1, 1).unwrap().scaled_rate(0.05).is_err());
    }

    #[test]
    fn test_randomize_is_deterministic() {
        let l = Network::random(topology(), &Span::unit(), &mut WyRng::seeded(11));
        let r = Network::random(topology(), &Span::unit(), &mut WyRng::seeded(11));
        assert!(l.params().eq(r.params()));
    }

    #[test]
    fn test_randomize_within_span() {
        let span = Span::new(-0.25, 0.5).unwrap();
        let network = Network::random(topology(), &span, &mut WyRng::seeded(2));
        assert!(network.params().all(|w| span.contains(w)));
    }

    #[test]
    fn test_mutate_never() {
        let mut rng = WyRng::seeded(3);
        let before = Network::random(topology(), &Span::unit(), &mut rng);
        let mut after = before.clone();
        after.mutate(&MutationRate::new(0.).unwrap(), &Span::unit(), &mut rng);
        assert!(before.params().eq(after.params()));
    }

    #[test]
    fn test_mutate_always() {
        let mut rng = WyRng::seeded(4);
        let span = Span::new(2., 3.).unwrap();
        let mut network = Network::random(topology(), &Span::unit(), &mut rng);
        network.mutate(&MutationRate::new(1.).unwrap(), &span, &mut rng);
        assert!(network.params().all(|w| span.contains(w)));
    }

    #[test]
    fn test_mutate_leaves_clone() {
        let mut rng = WyRng::seeded(5);
        let parent = Network::random(topology(), &Span::unit(), &mut rng);
        let snapshot: Vec<f64> = parent.params().collect();
        let mut child = parent.clone();
        child.mutate(&MutationRate::new(1.).unwrap(), &Span::unit(), &mut rng);
        assert!(parent.params().eq(snapshot.into_iter()));
        assert!(!parent.params().eq(child.params()));
    }

    #[test]
    fn test_forward_single_weight() {
        let mut network = Network::new(Topology::new(1, 1, 1, 1).unwrap());
        network.hidden_mut()[0].weights_mut()[0] = 1.;
        network.output_layer_mut().weights_mut()[0] = 1.;
        let out = network.forward(&[0.5], activate::sigmoid);
        assert_eq!(out.len(), 1);
        assert!((out[0] - 0.6225).abs() < 1e-4);
    }

    #[test]
    fn test_forward_output_bias() {
        let mut network = Network::new(Topology::new(1, 32, 32, 1).unwrap());
        network.output_layer_mut().biases_mut()[0] = -0.5;
        let out = network.forward(&[0.; 32], activate::sigmoid);
        assert!((out[0] - 0.6225).abs() < 1e-4);
        assert_f64_approx!(out[0], activate::sigmoid(0.5));
    }

    #[test]
    fn test_forward_is_deterministic() {
        let mut rng = WyRng::seeded(12);
        let network = Network::random(topology(), &Span::unit(), &mut rng);
        let input = [0.25, -0.5, 1., 0.];
        let first = network.forward(&input, activate::sigmoid);
        assert!((0..10).all(|_| network.forward(&input, activate::sigmoid) == first));
    }

    #[test]
    fn test_forward_first_layer_unactivated() {
        let mut network = Network::new(Topology::new(1, 1, 1, 1).unwrap());
        network.hidden_mut()[0].weights_mut()[0] = 10.;
        network.output_layer_mut().weights_mut()[0] = 1.;
        // an activated first layer would hand the output layer 1, not 10
        let out = network.forward(&[1.], |x| if x > 5. { 1. } else { 0. });
        assert_eq!(out, vec![1.]);
    }

    #[test]
    fn test_forward_later_layers_activated() {
        let mut network = Network::new(Topology::new(2, 1, 1, 1).unwrap());
        for layer in network.hidden_mut() {
            layer.weights_mut()[0] = 10.;
        }
        network.output_layer_mut().weights_mut()[0] = 1.;
        // the second hidden layer squashes 100 down to 1, so the output never clears 5
        let out = network.forward(&[1.], |x| if x > 5. { 1. } else { 0. });
        assert_eq!(out, vec![0.]);
    }

    #[test]
    fn test_forward_bounded() {
        let mut rng = WyRng::seeded(6);
        let network = Network::random(Topology::new(2, 64, 64, 8).unwrap(), &Span::unit(), &mut rng);
        let input: Vec<f64> = (0..64).map(|i| (i % 3) as f64).collect();
        let out = network.forward(&input, activate::sigmoid);
        assert_eq!(out.len(), 8);
        assert!(out.iter().all(|v| (0. ..=1.).contains(v)));
    }

    #[test]
    #[should_panic(expected = "network input width mismatch")]
    fn test_forward_wrong_width() {
        Network::new(topology()).forward(&[0.; 3], activate::sigmoid);
    }
}
