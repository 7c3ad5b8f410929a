//! A two-layer feed-forward binary classifier.
//!
//! `Dense(n_inputs -> hidden, ReLU) -> Dense(hidden -> 1, sigmoid)`, trained on
//! binary cross-entropy with Adam over shuffled mini-batches.

use ndarray::{Array, Array1, Array2, ArrayView1, ArrayView2, Axis, Dimension, Zip};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Probabilities are clipped to `[EPSILON, 1 - EPSILON]` before taking logs.
const EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
}

impl Default for Adam {
    fn default() -> Self {
        Adam {
            learning_rate: 0.001,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitParams {
    pub epochs: usize,
    pub batch_size: usize,
    pub optimizer: Adam,
}

impl Default for FitParams {
    fn default() -> Self {
        FitParams {
            epochs: 100,
            batch_size: 32,
            optimizer: Adam::default(),
        }
    }
}

/// Loss and accuracy after one pass over the training data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub loss: f64,
    pub accuracy: f64,
    pub val_loss: Option<f64>,
    pub val_accuracy: Option<f64>,
}

#[derive(Debug, Clone)]
struct Dense {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl Dense {
    /// Glorot-uniform weights, zero bias.
    fn glorot_uniform<R: Rng>(n_in: usize, n_out: usize, rng: &mut R) -> Self {
        let limit = (6.0 / (n_in + n_out) as f64).sqrt();
        Dense {
            weights: Array2::from_shape_simple_fn((n_in, n_out), || {
                rng.random_range(-limit..limit)
            }),
            bias: Array1::zeros(n_out),
        }
    }

    fn forward(&self, x: ArrayView2<f64>) -> Array2<f64> {
        x.dot(&self.weights) + &self.bias
    }
}

/// First and second moment estimates for one layer.
#[derive(Debug, Clone)]
struct Moments {
    m_weights: Array2<f64>,
    v_weights: Array2<f64>,
    m_bias: Array1<f64>,
    v_bias: Array1<f64>,
}

impl Moments {
    fn for_layer(layer: &Dense) -> Self {
        Moments {
            m_weights: Array2::zeros(layer.weights.raw_dim()),
            v_weights: Array2::zeros(layer.weights.raw_dim()),
            m_bias: Array1::zeros(layer.bias.raw_dim()),
            v_bias: Array1::zeros(layer.bias.raw_dim()),
        }
    }

    fn apply(
        &mut self,
        layer: &mut Dense,
        grad_w: &Array2<f64>,
        grad_b: &Array1<f64>,
        opt: &Adam,
        lr_t: f64,
    ) {
        adam_update(
            &mut layer.weights,
            grad_w,
            &mut self.m_weights,
            &mut self.v_weights,
            opt,
            lr_t,
        );
        adam_update(&mut layer.bias, grad_b, &mut self.m_bias, &mut self.v_bias, opt, lr_t);
    }
}

fn adam_update<D: Dimension>(
    param: &mut Array<f64, D>,
    grad: &Array<f64, D>,
    m: &mut Array<f64, D>,
    v: &mut Array<f64, D>,
    opt: &Adam,
    lr_t: f64,
) {
    Zip::from(param)
        .and(grad)
        .and(m)
        .and(v)
        .for_each(|p, &g, m, v| {
            *m = opt.beta1 * *m + (1.0 - opt.beta1) * g;
            *v = opt.beta2 * *v + (1.0 - opt.beta2) * g * g;
            *p -= lr_t * *m / (v.sqrt() + opt.epsilon);
        });
}

fn relu(z: f64) -> f64 {
    z.max(0.0)
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn binary_cross_entropy(p: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    let total: f64 = p
        .iter()
        .zip(y.iter())
        .map(|(&p, &y)| {
            let p = p.clamp(EPSILON, 1.0 - EPSILON);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    total / p.len().max(1) as f64
}

fn accuracy(p: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    let correct = p
        .iter()
        .zip(y.iter())
        .filter(|&(&p, &y)| (p > 0.5) == (y > 0.5))
        .count();
    correct as f64 / p.len().max(1) as f64
}

fn labels_to_f64(y: &Array1<usize>) -> Array1<f64> {
    y.mapv(|label| label as f64)
}

#[derive(Debug, Clone)]
pub struct Mlp {
    hidden: Dense,
    output: Dense,
}

impl Mlp {
    /// Creates an untrained network with Glorot-initialised weights.
    pub fn new<R: Rng>(n_inputs: usize, hidden_units: usize, rng: &mut R) -> Self {
        let hidden = Dense::glorot_uniform(n_inputs, hidden_units, rng);
        let output = Dense::glorot_uniform(hidden_units, 1, rng);
        Mlp { hidden, output }
    }

    /// Positive-class probability for every row of `x`.
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Array1<f64> {
        let a1 = self.hidden.forward(x).mapv(relu);
        self.output.forward(a1.view()).column(0).mapv(sigmoid)
    }

    /// Trains in place and returns one metrics entry per epoch.
    ///
    /// `validation` is only evaluated, never fitted.
    pub fn fit<R: Rng>(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<usize>,
        validation: Option<(&Array2<f64>, &Array1<usize>)>,
        params: &FitParams,
        rng: &mut R,
    ) -> Vec<EpochMetrics> {
        let y = labels_to_f64(y);
        let validation = validation.map(|(vx, vy)| (vx, labels_to_f64(vy)));
        let opt = params.optimizer;
        let batch_size = params.batch_size.max(1);

        let mut hidden_moments = Moments::for_layer(&self.hidden);
        let mut output_moments = Moments::for_layer(&self.output);
        let mut step = 0i32;
        let mut order: Vec<usize> = (0..x.nrows()).collect();
        let mut history = Vec::with_capacity(params.epochs);

        for epoch in 1..=params.epochs {
            order.shuffle(rng);
            let mut loss_sum = 0.0;
            let mut correct = 0.0;

            for batch in order.chunks(batch_size) {
                let xb = x.select(Axis(0), batch);
                let yb = y.select(Axis(0), batch);
                let m = batch.len() as f64;

                let z1 = self.hidden.forward(xb.view());
                let a1 = z1.mapv(relu);
                let p = self.output.forward(a1.view()).mapv(sigmoid);

                loss_sum += binary_cross_entropy(p.column(0), yb.view()) * m;
                correct += accuracy(p.column(0), yb.view()) * m;

                let dz2 = (&p - &yb.view().insert_axis(Axis(1))) / m;
                let grad_w2 = a1.t().dot(&dz2);
                let grad_b2 = dz2.sum_axis(Axis(0));

                let mut dz1 = dz2.dot(&self.output.weights.t());
                Zip::from(&mut dz1).and(&z1).for_each(|d, &z| {
                    if z <= 0.0 {
                        *d = 0.0;
                    }
                });
                let grad_w1 = xb.t().dot(&dz1);
                let grad_b1 = dz1.sum_axis(Axis(0));

                step += 1;
                let lr_t = opt.learning_rate * (1.0 - opt.beta2.powi(step)).sqrt()
                    / (1.0 - opt.beta1.powi(step));
                output_moments.apply(&mut self.output, &grad_w2, &grad_b2, &opt, lr_t);
                hidden_moments.apply(&mut self.hidden, &grad_w1, &grad_b1, &opt, lr_t);
            }

            let n = x.nrows().max(1) as f64;
            let (val_loss, val_accuracy) = match &validation {
                Some((vx, vy)) => {
                    let vp = self.predict_proba(vx.view());
                    (
                        Some(binary_cross_entropy(vp.view(), vy.view())),
                        Some(accuracy(vp.view(), vy.view())),
                    )
                }
                None => (None, None),
            };
            let metrics = EpochMetrics {
                epoch,
                loss: loss_sum / n,
                accuracy: correct / n,
                val_loss,
                val_accuracy,
            };
            tracing::debug!(
                epoch,
                loss = metrics.loss,
                accuracy = metrics.accuracy,
                val_loss = ?metrics.val_loss,
                val_accuracy = ?metrics.val_accuracy,
                "epoch finished"
            );
            history.push(metrics);
        }

        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn separable(n: usize, rng: &mut StdRng) -> (Array2<f64>, Array1<usize>) {
        let x = Array2::from_shape_simple_fn((n, 2), || rng.random_range(-3.0..3.0));
        let y = x.column(0).mapv(|v| usize::from(v > 0.0));
        (x, y)
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(!sigmoid(-1000.0).is_nan());
    }

    #[test]
    fn cross_entropy_clips_certain_mistakes() {
        let loss = binary_cross_entropy(array![0.0].view(), array![1.0].view());
        assert!(loss.is_finite());
        assert!((loss - (-(EPSILON.ln()))).abs() < 1e-9);
    }

    #[test]
    fn learns_a_separable_problem() {
        let mut rng = StdRng::seed_from_u64(1);
        let (x, y) = separable(200, &mut rng);
        let (vx, vy) = separable(100, &mut rng);

        let mut mlp = Mlp::new(2, 16, &mut rng);
        let params = FitParams {
            epochs: 60,
            batch_size: 32,
            optimizer: Adam {
                learning_rate: 0.01,
                ..Adam::default()
            },
        };
        let history = mlp.fit(&x, &y, Some((&vx, &vy)), &params, &mut rng);

        assert_eq!(history.len(), 60);
        let first = history.first().unwrap();
        let last = history.last().unwrap();
        assert!(last.loss < first.loss);
        assert!(last.accuracy > 0.9, "{last:?}");
        assert!(last.val_accuracy.unwrap() > 0.85, "{last:?}");
    }

    #[test]
    fn probabilities_are_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let mlp = Mlp::new(4, 16, &mut rng);
        let x = Array2::from_shape_simple_fn((50, 4), || rng.random_range(-100.0..100.0));
        for p in mlp.predict_proba(x.view()) {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn same_seed_same_weights() {
        let (x, y) = separable(64, &mut StdRng::seed_from_u64(5));
        let train = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut mlp = Mlp::new(2, 16, &mut rng);
            let params = FitParams {
                epochs: 5,
                ..FitParams::default()
            };
            mlp.fit(&x, &y, None, &params, &mut rng);
            mlp.predict_proba(x.view())
        };
        assert_eq!(train(9), train(9));
    }
}
