use rulinalg::{
    matrix::{BaseMatrix, Matrix},
    vector::Vector,
};

/// One neuron of a [Layer]: a row of its weight matrix plus its bias
#[derive(Debug, Clone, Copy)]
pub struct Neuron<'a> {
    pub weights: &'a [f64],
    pub bias: f64,
}

impl Neuron<'_> {
    /// `Σ(input_i * weight_i) - bias`
    pub fn calculate(&self, input: &[f64]) -> f64 {
        debug_assert_eq!(input.len(), self.weights.len());
        input
            .iter()
            .zip(self.weights)
            .fold(-self.bias, |acc, (x, w)| acc + x * w)
    }
}

/// A fully connected layer, one weight row and one bias per neuron
#[derive(Debug, Clone)]
pub struct Layer {
    /// `[neuron, input]`
    w: Matrix<f64>,
    θ: Vector<f64>,
}

impl Layer {
    pub fn new(inputs: usize, width: usize) -> Self {
        Self {
            w: Matrix::zeros(width, inputs),
            θ: Vector::zeros(width),
        }
    }

    #[inline]
    pub fn inputs(&self) -> usize {
        self.w.cols()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w.rows()
    }

    /// The affine output of every neuron, unactivated
    pub fn calculate(&self, input: &Vector<f64>) -> Vector<f64> {
        debug_assert_eq!(input.size(), self.inputs());
        let weighted = &self.w * input;
        &weighted - &self.θ
    }

    pub fn neuron(&self, idx: usize) -> Neuron<'_> {
        let cols = self.inputs();
        Neuron {
            weights: &self.w.data()[idx * cols..(idx + 1) * cols],
            bias: self.θ[idx],
        }
    }

    pub fn neurons(&self) -> impl Iterator<Item = Neuron<'_>> {
        (0..self.width()).map(|idx| self.neuron(idx))
    }

    /// Row-major weights, `inputs()` per neuron
    #[inline]
    pub fn weights_mut(&mut self) -> &mut [f64] {
        self.w.mut_data()
    }

    #[inline]
    pub fn biases_mut(&mut self) -> &mut [f64] {
        self.θ.mut_data()
    }

    /// Replace each neuron's weights and then its bias with `f` of itself, neuron by neuron
    pub fn update(&mut self, f: &mut impl FnMut(f64) -> f64) {
        let cols = self.w.cols();
        for (row, bias) in self.w.mut_data().chunks_mut(cols).zip(self.θ.mut_data()) {
            for w in row {
                *w = f(*w);
            }
            *bias = f(*bias);
        }
    }

    pub fn params(&self) -> impl Iterator<Item = f64> + '_ {
        self.neurons()
            .flat_map(|n| n.weights.iter().copied().chain(Some(n.bias)))
    }
}
