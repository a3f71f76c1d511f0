// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Feed-forward classifier backend
//!
//! Loads a dense network exported as JSON and evaluates it with `ndarray`:
//!
//! ```json
//! {
//!   "name": "symptom-classifier-v1",
//!   "layers": [
//!     {"weights": [[...50 values...], ...32 rows], "bias": [...32], "activation": "relu"},
//!     {"weights": [[...32 values...], ...10 rows], "bias": [...10], "activation": "softmax"}
//!   ]
//! }
//! ```
//!
//! Weights are shaped `[out][in]`, so each layer computes `activation(W · x + b)`.

use crate::backend::{BackendError, InferenceBackend};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;
use telecare_core::{ConfigError, FeatureVector};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
}

impl Activation {
    fn apply(self, x: Array1<f32>) -> Array1<f32> {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.mapv(|v| v.max(0.0)),
            Activation::Sigmoid => x.mapv(|v| 1.0 / (1.0 + (-v).exp())),
            Activation::Tanh => x.mapv(f32::tanh),
            Activation::Softmax => softmax(x),
        }
    }
}

fn softmax(x: Array1<f32>) -> Array1<f32> {
    let max = x.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
    let exp = x.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    if sum > 0.0 {
        exp / sum
    } else {
        exp
    }
}

/// Serialized layer as stored in the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

/// Serialized network as stored in the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub layers: Vec<LayerSpec>,
}

#[derive(Debug, Clone)]
struct DenseLayer {
    weights: Array2<f32>,
    bias: Array1<f32>,
    activation: Activation,
}

impl DenseLayer {
    fn from_spec(position: usize, spec: LayerSpec) -> Result<Self, ConfigError> {
        let rows = spec.weights.len();
        let cols = spec.weights.first().map(Vec::len).unwrap_or(0);

        if rows == 0 || cols == 0 {
            return Err(ConfigError::InvalidModel(format!(
                "layer {} has an empty weight matrix",
                position
            )));
        }
        if let Some(bad) = spec.weights.iter().position(|row| row.len() != cols) {
            return Err(ConfigError::InvalidModel(format!(
                "layer {} row {} has {} weights, expected {}",
                position,
                bad,
                spec.weights[bad].len(),
                cols
            )));
        }
        if spec.bias.len() != rows {
            return Err(ConfigError::InvalidModel(format!(
                "layer {} bias has {} entries, expected {}",
                position,
                spec.bias.len(),
                rows
            )));
        }

        let flat: Vec<f32> = spec.weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| ConfigError::InvalidModel(format!("layer {}: {}", position, e)))?;

        Ok(Self {
            weights,
            bias: Array1::from_vec(spec.bias),
            activation: spec.activation,
        })
    }

    fn input_width(&self) -> usize {
        self.weights.ncols()
    }

    fn output_width(&self) -> usize {
        self.weights.nrows()
    }

    fn forward(&self, x: &Array1<f32>) -> Array1<f32> {
        self.activation.apply(self.weights.dot(x) + &self.bias)
    }
}

/// Dense feed-forward classifier.
#[derive(Debug, Clone)]
pub struct DenseNetwork {
    name: String,
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Build from a parsed artifact, checking that consecutive layers chain.
    pub fn from_spec(spec: NetworkSpec) -> Result<Self, ConfigError> {
        if spec.layers.is_empty() {
            return Err(ConfigError::InvalidModel("network has no layers".to_string()));
        }

        let layers = spec
            .layers
            .into_iter()
            .enumerate()
            .map(|(i, layer)| DenseLayer::from_spec(i, layer))
            .collect::<Result<Vec<_>, _>>()?;

        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_width() != pair[1].input_width() {
                return Err(ConfigError::InvalidModel(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i,
                    pair[0].output_width(),
                    i + 1,
                    pair[1].input_width()
                )));
            }
        }

        Ok(Self {
            name: spec.name.unwrap_or_else(|| "dense".to_string()),
            layers,
        })
    }

    /// Load a JSON artifact from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec: NetworkSpec =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let network = Self::from_spec(spec)?;

        info!(
            "Loaded dense network '{}' from {:?}: {} layers, {} -> {}",
            network.name,
            path,
            network.layers.len(),
            network.input_width(),
            network.output_width()
        );
        Ok(network)
    }

    pub fn forward(&self, input: &[f32]) -> Result<Array1<f32>, BackendError> {
        if input.len() != self.input_width() {
            return Err(BackendError::InputShape {
                expected: self.input_width(),
                actual: input.len(),
            });
        }

        let mut x = Array1::from_vec(input.to_vec());
        for layer in &self.layers {
            x = layer.forward(&x);
        }
        Ok(x)
    }
}

impl InferenceBackend for DenseNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_width(&self) -> usize {
        self.layers.first().map(DenseLayer::input_width).unwrap_or(0)
    }

    fn output_width(&self) -> usize {
        self.layers.last().map(DenseLayer::output_width).unwrap_or(0)
    }

    fn infer(&self, features: &FeatureVector) -> Result<Vec<f32>, BackendError> {
        Ok(self.forward(features.as_slice())?.to_vec())
    }
}
