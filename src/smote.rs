//! Synthetic minority oversampling.
//!
//! Each synthetic row sits on the segment between a minority row and one of
//! its nearest minority neighbours, so the minority class grows until it
//! matches the majority class.

use anyhow::{Context, Result, bail};
use linfa_nn::distance::L2Dist;
use linfa_nn::{CommonNearestNeighbour, NearestNeighbour, NearestNeighbourIndex};
use ndarray::{Array1, Array2, Axis, concatenate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic minority oversampling over k nearest same-class neighbours.
#[derive(Debug, Clone, Copy)]
pub struct Smote {
    pub k_neighbors: usize,
    pub seed: u64,
}

impl Smote {
    /// Returns the input rows followed by the synthetic minority rows.
    ///
    /// Labels must be `0` or `1`.
    pub fn fit_resample(
        &self,
        x: &Array2<f64>,
        y: &Array1<usize>,
    ) -> Result<(Array2<f64>, Array1<usize>)> {
        if x.nrows() != y.len() {
            bail!("{} feature rows but {} labels", x.nrows(), y.len());
        }
        if self.k_neighbors == 0 {
            bail!("k_neighbors must be at least 1");
        }

        let positives = y.iter().filter(|&&label| label == 1).count();
        let negatives = y.len() - positives;
        if positives == negatives {
            return Ok((x.clone(), y.clone()));
        }
        let (minority_label, n_minority, n_majority) = if positives < negatives {
            (1, positives, negatives)
        } else {
            (0, negatives, positives)
        };
        if n_minority < 2 {
            bail!(
                "cannot oversample class {minority_label}: {n_minority} row(s), need at least 2"
            );
        }

        let minority_rows: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == minority_label)
            .map(|(i, _)| i)
            .collect();
        let minority = x.select(Axis(0), &minority_rows);
        let k = self.k_neighbors.min(n_minority - 1);

        let index = CommonNearestNeighbour::KdTree
            .from_batch(&minority, L2Dist)
            .context("failed to index minority rows")?;

        let mut neighbours = Vec::with_capacity(n_minority);
        for (i, row) in minority.rows().into_iter().enumerate() {
            let found = index
                .k_nearest(row, k + 1)
                .context("nearest neighbour query failed")?;
            let nn: Vec<usize> = found
                .into_iter()
                .map(|(_, j)| j)
                .filter(|&j| j != i)
                .take(k)
                .collect();
            neighbours.push(nn);
        }

        let n_synthetic = n_majority - n_minority;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut synthetic = Array2::zeros((n_synthetic, x.ncols()));
        for mut out in synthetic.rows_mut() {
            let i = rng.random_range(0..n_minority);
            let nn = &neighbours[i];
            let j = nn[rng.random_range(0..nn.len())];
            let gap: f64 = rng.random();

            let base = minority.row(i);
            let toward = minority.row(j);
            out.assign(&(&base + &((&toward - &base) * gap)));
        }

        tracing::info!(
            minority_label,
            n_minority,
            n_synthetic,
            k,
            "oversampled minority class"
        );

        let x_res = concatenate![Axis(0), x.view(), synthetic.view()];
        let y_res = concatenate![
            Axis(0),
            y.view(),
            Array1::from_elem(n_synthetic, minority_label).view()
        ];
        Ok((x_res, y_res))
    }
}
