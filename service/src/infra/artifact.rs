//! Trained regression artifact.

use std::{fs, io, path::Path};

use common::operations::Perform;
use derive_more::{Display, Error as StdError, From};
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{feature::Schema, FeatureVector},
    infra::{self, Infra},
};

/// Pre-trained regression tree ensemble.
///
/// Loaded once at process start and immutable afterwards, so freely shared
/// across concurrent requests. Prediction is the average of all the trees'
/// outputs, and is fully deterministic for a fixed artifact and input.
#[derive(Debug)]
pub struct Ensemble {
    /// Feature [`Schema`] this [`Ensemble`] was fit on.
    schema: Schema,

    /// Fitted [`Tree`]s of this [`Ensemble`].
    trees: Vec<Tree>,
}

impl Ensemble {
    /// Loads an [`Ensemble`] from the serialized artifact at the given
    /// `path`.
    ///
    /// # Errors
    ///
    /// If the file cannot be read, doesn't parse, contains no trees, or
    /// references features outside its own [`Schema`]. All of these are
    /// fatal at startup: there is no fallback artifact to serve with.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Traced<LoadError>> {
        let raw = fs::read(path).map_err(tracerr::from_and_wrap!())?;
        let Manifest { schema, trees } =
            serde_json::from_slice(&raw).map_err(tracerr::from_and_wrap!())?;
        Self::new(schema, trees).map_err(tracerr::wrap!())
    }

    /// Creates a new [`Ensemble`] from the given `schema` and `trees`,
    /// validating their compatibility.
    ///
    /// # Errors
    ///
    /// If there are no `trees`, or any of them splits on a feature outside
    /// the `schema`.
    pub fn new(
        schema: Schema,
        trees: Vec<Tree>,
    ) -> Result<Self, Traced<LoadError>> {
        if trees.is_empty() {
            return Err(tracerr::new!(LoadError::NoTrees));
        }
        let width = schema.width();
        if let Some(feature) = trees
            .iter()
            .filter_map(|t| t.root.max_feature())
            .find(|f| *f >= width)
        {
            return Err(tracerr::new!(LoadError::OutOfSchema {
                feature,
                width,
            }));
        }
        Ok(Self { schema, trees })
    }

    /// Returns the feature [`Schema`] this [`Ensemble`] was fit on.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Predicts a price for the given feature `values`.
    fn predict(&self, values: &[f64]) -> Result<f64, InferenceError> {
        let expected = self.schema.width();
        if values.len() != expected {
            return Err(InferenceError::DimensionMismatch {
                expected,
                actual: values.len(),
            });
        }

        #[expect(clippy::cast_precision_loss, reason = "few trees")]
        let count = self.trees.len() as f64;
        Ok(self.trees.iter().map(|t| t.root.output(values)).sum::<f64>()
            / count)
    }
}

impl Infra<Perform<FeatureVector>> for Ensemble {
    type Ok = f64;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        Perform(vector): Perform<FeatureVector>,
    ) -> Result<Self::Ok, Self::Err> {
        self.predict(vector.values())
            .map_err(tracerr::from_and_wrap!())
    }
}

/// Serialized form of an [`Ensemble`]: the feature [`Schema`] published
/// alongside the fitted trees, in a single JSON document.
#[derive(Debug, Deserialize)]
struct Manifest {
    /// Feature [`Schema`] the artifact was fit on.
    schema: Schema,

    /// Fitted [`Tree`]s.
    trees: Vec<Tree>,
}

/// Single fitted decision tree of an [`Ensemble`].
#[derive(Debug, Deserialize)]
pub struct Tree {
    /// Root [`Node`] of this [`Tree`].
    pub root: Node,
}

/// Node of a [`Tree`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Inner node splitting on a single feature.
    Split {
        /// Index of the feature this [`Node`] splits on, in [`Schema`]
        /// order.
        feature_idx: usize,

        /// Threshold of the split: values less than or equal to it descend
        /// left, greater ones descend right.
        threshold: f64,

        /// Left subtree.
        left: Box<Node>,

        /// Right subtree.
        right: Box<Node>,
    },

    /// Leaf node holding a fitted output value.
    Leaf {
        /// Fitted output value.
        value: f64,
    },
}

impl Node {
    /// Returns the output value of this subtree for the given feature
    /// `values`.
    fn output(&self, values: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                Self::Leaf { value } => return *value,
                Self::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    node = if values[*feature_idx] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Returns the maximum feature index referenced by this subtree, if it
    /// splits at all.
    fn max_feature(&self) -> Option<usize> {
        match self {
            Self::Leaf { .. } => None,
            Self::Split {
                feature_idx,
                left,
                right,
                ..
            } => Some(
                (*feature_idx)
                    .max(left.max_feature().unwrap_or(0))
                    .max(right.max_feature().unwrap_or(0)),
            ),
        }
    }
}

/// Error of loading an [`Ensemble`].
#[derive(Debug, Display, From, StdError)]
pub enum LoadError {
    /// Failed to read the artifact file.
    #[display("Failed to read artifact file: {_0}")]
    Io(io::Error),

    /// Artifact file doesn't parse as an [`Ensemble`] manifest.
    #[display("Malformed artifact: {_0}")]
    Malformed(serde_json::Error),

    /// Artifact contains no fitted trees.
    #[display("Artifact contains no fitted trees")]
    NoTrees,

    /// Artifact splits on a feature outside its own [`Schema`].
    #[display(
        "Artifact splits on feature {feature} \
         while its schema is {width} columns wide"
    )]
    OutOfSchema {
        /// Offending feature index.
        feature: usize,

        /// Width of the artifact's [`Schema`].
        width: usize,
    },
}

/// Error of an [`Ensemble`] inference.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum InferenceError {
    /// Provided [`FeatureVector`] doesn't match the [`Schema`] the
    /// [`Ensemble`] was fit on.
    #[display(
        "`FeatureVector` is {actual} columns wide \
         while the artifact expects {expected}"
    )]
    DimensionMismatch {
        /// Width the [`Ensemble`] expects.
        expected: usize,

        /// Width of the provided [`FeatureVector`].
        actual: usize,
    },
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use super::{Ensemble, LoadError, Manifest, Node, Tree};

    fn manifest() -> Manifest {
        serde_json::from_value(json!({
            "schema": {
                "numeric": [
                    {"name": "area", "mean": 1000.0, "deviation": 500.0},
                ],
                "categorical": [],
            },
            "trees": [
                {"root": {
                    "feature_idx": 0,
                    "threshold": 0.0,
                    "left": {"value": 2_000_000.0},
                    "right": {"value": 6_000_000.0},
                }},
                {"root": {"value": 4_000_000.0}},
            ],
        }))
        .unwrap()
    }

    #[test]
    fn averages_over_trees() {
        let Manifest { schema, trees } = manifest();
        let ensemble = Ensemble::new(schema, trees).unwrap();

        assert_eq!(ensemble.predict(&[-1.0]).unwrap(), 3_000_000.0);
        assert_eq!(ensemble.predict(&[1.0]).unwrap(), 5_000_000.0);
    }

    #[test]
    fn is_deterministic() {
        let Manifest { schema, trees } = manifest();
        let ensemble = Ensemble::new(schema, trees).unwrap();

        let first = ensemble.predict(&[0.5]).unwrap();
        let second = ensemble.predict(&[0.5]).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn rejects_mismatched_width() {
        let Manifest { schema, trees } = manifest();
        let ensemble = Ensemble::new(schema, trees).unwrap();

        assert!(ensemble.predict(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn rejects_empty_artifact() {
        let Manifest { schema, .. } = manifest();

        let err = Ensemble::new(schema, vec![]).unwrap_err();
        assert!(matches!(err.as_ref(), LoadError::NoTrees));
    }

    #[test]
    fn rejects_splits_outside_schema() {
        let Manifest { schema, .. } = manifest();
        let tree = Tree {
            root: Node::Split {
                feature_idx: 7,
                threshold: 0.0,
                left: Box::new(Node::Leaf { value: 1.0 }),
                right: Box::new(Node::Leaf { value: 2.0 }),
            },
        };

        let err = Ensemble::new(schema, vec![tree]).unwrap_err();
        assert!(matches!(
            err.as_ref(),
            LoadError::OutOfSchema { feature: 7, .. },
        ));
    }
}
