//! Batch assembly of named initial shapes into a generation request.

use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use serde::Serialize;

use crate::error::{BatchError, BatchResult, BatchValidationError};
use crate::shape::InitialShape;

/// A named shape within a generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedShape {
    /// Caller-chosen name, unique within the request.
    pub name: String,

    /// The shape definition.
    pub shape: InitialShape,
}

/// A validated batch of initial shapes bound for one generation call.
///
/// Immutable once built: the builder copies values in and only read
/// accessors exist afterwards. Holds no reference to any session; a request
/// can be dropped, cloned, or reused across `generate` calls freely.
///
/// # Example
///
/// ```
/// use mesh_procgen::{GenerationRequest, InitialShape};
///
/// let quad = InitialShape {
///     rule_file: "bin/candler.01.cgb".to_string(),
///     start_rule: "Default$Lot".to_string(),
///     random_seed: 666,
///     vertices: vec![0.0, 0.0, 0.0, 0.0, 0.0, 50.0, 50.0, 0.0, 50.0, 50.0, 0.0, 0.0],
///     face_indices: vec![0, 1, 2, 3],
///     face_counts: vec![4],
/// };
///
/// let request = GenerationRequest::builder()
///     .add_shape("theBigShape", quad)
///     .build(
///         "file:/rules/candler.01.rpk",
///         "com.esri.prt.codecs.OBJEncoder",
///         "/tmp/prt4py",
///     )
///     .unwrap();
/// assert_eq!(request.shapes().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    shapes: Vec<NamedShape>,
    rule_package_uri: String,
    encoder_id: String,
    output_destination: PathBuf,
}

impl GenerationRequest {
    /// Start assembling a request.
    #[must_use]
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }

    /// The shapes in the batch, in insertion order.
    #[must_use]
    pub fn shapes(&self) -> &[NamedShape] {
        &self.shapes
    }

    /// Locator of the rule-package asset shared by the batch.
    #[must_use]
    pub fn rule_package_uri(&self) -> &str {
        &self.rule_package_uri
    }

    /// Identifier of the output encoder.
    #[must_use]
    pub fn encoder_id(&self) -> &str {
        &self.encoder_id
    }

    /// Where the encoded geometry is written.
    #[must_use]
    pub fn output_destination(&self) -> &Path {
        &self.output_destination
    }
}

/// Builder collecting named shapes for a [`GenerationRequest`].
#[derive(Debug, Default)]
pub struct GenerationRequestBuilder {
    shapes: Vec<NamedShape>,
}

impl GenerationRequestBuilder {
    /// Append a named shape. Insertion order is preserved through to the
    /// engine; name uniqueness is checked in [`build`](Self::build).
    #[must_use]
    pub fn add_shape(mut self, name: impl Into<String>, shape: InitialShape) -> Self {
        self.shapes.push(NamedShape {
            name: name.into(),
            shape,
        });
        self
    }

    /// Validate the batch and produce an immutable request.
    ///
    /// Every shape is validated and all failures are collected, so one call
    /// reports every problem in the batch rather than the first.
    ///
    /// # Errors
    ///
    /// - [`BatchError::EmptyBatch`] when no shapes were added.
    /// - [`BatchError::DuplicateName`] for the first name that repeats, in
    ///   insertion order.
    /// - [`BatchError::Invalid`] aggregating every shape that failed
    ///   validation, tagged by name.
    pub fn build(
        self,
        rule_package_uri: impl Into<String>,
        encoder_id: impl Into<String>,
        output_destination: impl Into<PathBuf>,
    ) -> BatchResult<GenerationRequest> {
        if self.shapes.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        {
            let mut seen: HashSet<&str> = HashSet::with_capacity(self.shapes.len());
            for named in &self.shapes {
                if !seen.insert(named.name.as_str()) {
                    return Err(BatchError::DuplicateName {
                        name: named.name.clone(),
                    });
                }
            }
        }

        let failures: Vec<_> = self
            .shapes
            .iter()
            .filter_map(|named| {
                named
                    .shape
                    .validate()
                    .err()
                    .map(|err| (named.name.clone(), err))
            })
            .collect();
        if !failures.is_empty() {
            return Err(BatchValidationError { failures }.into());
        }

        Ok(GenerationRequest {
            shapes: self.shapes,
            rule_package_uri: rule_package_uri.into(),
            encoder_id: encoder_id.into(),
            output_destination: output_destination.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;

    fn quad() -> InitialShape {
        InitialShape {
            rule_file: "bin/candler.01.cgb".to_string(),
            start_rule: "Default$Lot".to_string(),
            random_seed: 666,
            vertices: vec![
                0.0, 0.0, 0.0, 0.0, 0.0, 50.0, 50.0, 0.0, 50.0, 50.0, 0.0, 0.0,
            ],
            face_indices: vec![0, 1, 2, 3],
            face_counts: vec![4],
        }
    }

    #[test]
    fn test_empty_batch_rejected() {
        let err = GenerationRequest::builder()
            .build("file:/rules/a.rpk", "enc", "/tmp/out")
            .unwrap_err();
        assert_eq!(err, BatchError::EmptyBatch);
    }

    #[test]
    fn test_first_duplicate_name_wins() {
        let err = GenerationRequest::builder()
            .add_shape("a", quad())
            .add_shape("b", quad())
            .add_shape("b", quad())
            .add_shape("a", quad())
            .build("file:/rules/a.rpk", "enc", "/tmp/out")
            .unwrap_err();
        assert_eq!(
            err,
            BatchError::DuplicateName {
                name: "b".to_string()
            }
        );
    }

    #[test]
    fn test_all_validation_failures_aggregated() {
        let mut no_rule = quad();
        no_rule.rule_file = String::new();
        let mut bad_counts = quad();
        bad_counts.face_indices = vec![0, 1, 2];

        let err = GenerationRequest::builder()
            .add_shape("first", no_rule)
            .add_shape("ok", quad())
            .add_shape("second", bad_counts)
            .build("file:/rules/a.rpk", "enc", "/tmp/out")
            .unwrap_err();

        let BatchError::Invalid(batch) = err else {
            panic!("expected Invalid, got {err:?}");
        };
        assert_eq!(batch.failures.len(), 2);
        assert_eq!(batch.failures[0].0, "first");
        assert_eq!(batch.failures[0].1.kind, ValidationErrorKind::EmptyRuleFile);
        assert_eq!(batch.failures[1].0, "second");
        assert_eq!(
            batch.failures[1].1.kind,
            ValidationErrorKind::FaceCountMismatch
        );
    }

    #[test]
    fn test_built_request_preserves_order_and_fields() {
        let request = GenerationRequest::builder()
            .add_shape("theBigShape", quad())
            .add_shape("theSmallShape", quad())
            .build(
                "file:/rules/candler.01.rpk",
                "com.esri.prt.codecs.OBJEncoder",
                "/tmp/prt4py",
            )
            .unwrap();

        let names: Vec<_> = request.shapes().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["theBigShape", "theSmallShape"]);
        assert_eq!(request.rule_package_uri(), "file:/rules/candler.01.rpk");
        assert_eq!(request.encoder_id(), "com.esri.prt.codecs.OBJEncoder");
        assert_eq!(
            request.output_destination(),
            Path::new("/tmp/prt4py")
        );
    }

    #[test]
    fn test_duplicate_check_runs_before_validation() {
        // A batch that is both duplicated and invalid reports the duplicate.
        let mut broken = quad();
        broken.start_rule = String::new();
        let err = GenerationRequest::builder()
            .add_shape("a", broken.clone())
            .add_shape("a", broken)
            .build("file:/rules/a.rpk", "enc", "/tmp/out")
            .unwrap_err();
        assert!(matches!(err, BatchError::DuplicateName { .. }));
    }
}
