use ndarray::{Array1, Array2, Dimension};
use serde::{Deserialize, Serialize};

/// A gradient-descent rule applied layer by layer.
///
/// `layer` is the index of the layer being updated so stateful optimizers
/// can keep separate moment estimates per tensor.
pub trait Optimizer {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);

    /// Called once before the per-layer updates of a single optimization step.
    fn begin_step(&mut self) {}
}

/// Which optimizer a configuration asks for.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OptimizerKind {
    Sgd,
    #[default]
    Adam,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl OptimizerWrapper {
    pub fn from_kind(kind: OptimizerKind) -> Self {
        match kind {
            OptimizerKind::Sgd => OptimizerWrapper::SGD(SGD::new()),
            OptimizerKind::Adam => OptimizerWrapper::Adam(Adam::default()),
        }
    }
}

impl Optimizer for OptimizerWrapper {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
        }
    }

    fn begin_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.begin_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.begin_step(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Array2<f32>>,
    v_weights: Vec<Array2<f32>>,
    m_biases: Vec<Array1<f32>>,
    v_biases: Vec<Array1<f32>>,
    pub t: i32,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
            t: 0,
        }
    }

    fn adam_step<D: Dimension>(
        &self,
        param: &mut ndarray::Array<f32, D>,
        gradients: &ndarray::Array<f32, D>,
        m: &mut ndarray::Array<f32, D>,
        v: &mut ndarray::Array<f32, D>,
        learning_rate: f32,
    ) {
        let (beta1, beta2) = (self.beta1, self.beta2);
        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        let t = self.t.max(1);
        let bias1 = 1.0 - beta1.powi(t);
        let bias2 = 1.0 - beta2.powi(t);
        let eps = self.epsilon;

        ndarray::Zip::from(param).and(&*m).and(&*v).for_each(|p, &m, &v| {
            let m_hat = m / bias1;
            let v_hat = v / bias2;
            *p -= learning_rate * m_hat / (v_hat.sqrt() + eps);
        });
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

/// Grow a per-layer moment list so that `layer` has a zeroed slot shaped like `like`.
fn ensure_slot<D: Dimension>(slots: &mut Vec<ndarray::Array<f32, D>>, layer: usize, like: &ndarray::Array<f32, D>) {
    while slots.len() <= layer {
        slots.push(ndarray::Array::zeros(like.raw_dim()));
    }
    if slots[layer].raw_dim() != like.raw_dim() {
        slots[layer] = ndarray::Array::zeros(like.raw_dim());
    }
}

impl Optimizer for Adam {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        ensure_slot(&mut self.m_weights, layer, weights);
        ensure_slot(&mut self.v_weights, layer, weights);
        let mut m = std::mem::take(&mut self.m_weights[layer]);
        let mut v = std::mem::take(&mut self.v_weights[layer]);
        self.adam_step(weights, gradients, &mut m, &mut v, learning_rate);
        self.m_weights[layer] = m;
        self.v_weights[layer] = v;
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        ensure_slot(&mut self.m_biases, layer, biases);
        ensure_slot(&mut self.v_biases, layer, biases);
        let mut m = std::mem::take(&mut self.m_biases[layer]);
        let mut v = std::mem::take(&mut self.v_biases[layer]);
        self.adam_step(biases, gradients, &mut m, &mut v, learning_rate);
        self.m_biases[layer] = m;
        self.v_biases[layer] = v;
    }

    fn begin_step(&mut self) {
        self.t += 1;
    }
}
