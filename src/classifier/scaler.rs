use serde::{Deserialize, Serialize};

/// Fitted normalization step of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Normalization {
    /// `x * scale + min`
    MinMax { scale: Vec<f64>, min: Vec<f64> },
    /// `(x - mean) / scale`; either part may be absent.
    Standard {
        #[serde(default)]
        mean: Option<Vec<f64>>,
        #[serde(default)]
        scale: Option<Vec<f64>>,
    },
}

impl Normalization {
    /// Check every parameter vector matches the number of input columns.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        let widths: Vec<(&str, usize)> = match self {
            Normalization::MinMax { scale, min } => vec![("scale", scale.len()), ("min", min.len())],
            Normalization::Standard { mean, scale } => mean
                .iter()
                .map(|m| ("mean", m.len()))
                .chain(scale.iter().map(|s| ("scale", s.len())))
                .collect(),
        };

        for (name, width) in widths {
            if width != n_features {
                return Err(format!(
                    "normalization {name} has {width} entries, expected {n_features}"
                ));
            }
        }
        Ok(())
    }

    pub fn transform(&self, x: &[f64]) -> Vec<f64> {
        match self {
            Normalization::MinMax { scale, min } => x
                .iter()
                .zip(scale.iter().zip(min))
                .map(|(v, (s, m))| v * s + m)
                .collect(),
            Normalization::Standard { mean, scale } => x
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let centered = match mean {
                        Some(mean) => v - mean[i],
                        None => *v,
                    };
                    match scale {
                        // Constant features are fitted with a zero scale.
                        Some(scale) if scale[i] != 0.0 => centered / scale[i],
                        _ => centered,
                    }
                })
                .collect(),
        }
    }
}
