//! newsclf Classifiers
//!
//! Adapter around the externally trained news category model.
//!
//! The service only depends on the [`Classifier`] trait. The bundled
//! [`LinearTextClassifier`] evaluates a bag-of-words linear model exported to a
//! JSON [`ModelArtifact`]; training the model happens elsewhere.

pub mod artifact;
pub mod classifier;
pub mod linear;

pub use artifact::{ModelArtifact, SUPPORTED_FORMAT_VERSION};
pub use classifier::Classifier;
pub use linear::LinearTextClassifier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::linear::LinearTextClassifier;
}
