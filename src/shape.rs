//! Initial shape definition and validation.
//!
//! An initial shape is the base polygon a rule grammar is applied to: flat
//! vertex coordinates, polygon face topology, and the rule attachment (rule
//! file, start rule, random seed). Validation happens here, once, before a
//! shape ever crosses the engine boundary.

// Vertex and index counts fit in usize on supported targets
#![allow(clippy::cast_possible_truncation)]

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{ShapeResult, ValidationError, ValidationErrorKind};

/// One initial shape: a base polygon plus its rule attachment.
///
/// Plain value type with no behavior beyond [`validate`](Self::validate).
/// Safe to discard or clone freely; it holds no reference to any session.
///
/// # Example
///
/// ```
/// use mesh_procgen::InitialShape;
///
/// let quad = InitialShape {
///     rule_file: "bin/candler.01.cgb".to_string(),
///     start_rule: "Default$Lot".to_string(),
///     random_seed: 666,
///     vertices: vec![0.0, 0.0, 0.0, 0.0, 0.0, 50.0, 50.0, 0.0, 50.0, 50.0, 0.0, 0.0],
///     face_indices: vec![0, 1, 2, 3],
///     face_counts: vec![4],
/// };
/// assert!(quad.validate().is_ok());
/// assert_eq!(quad.vertex_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialShape {
    /// Compiled rule-grammar asset applied to this shape
    /// (e.g. `"bin/candler.01.cgb"`). Must not be empty.
    pub rule_file: String,

    /// Entry production rule (e.g. `"Default$Lot"`). Must not be empty.
    pub start_rule: String,

    /// Seed for the grammar's stochastic derivations. Any integer; the same
    /// seed and rule asset yield deterministic output. Passed through to the
    /// engine unmodified.
    pub random_seed: i32,

    /// Flat vertex coordinates, three per vertex (x, y, z). Length must be a
    /// positive multiple of 3.
    pub vertices: Vec<f64>,

    /// Vertex indices describing face topology, partitioned per
    /// [`face_counts`](Self::face_counts).
    pub face_indices: Vec<u32>,

    /// Number of indices consumed from [`face_indices`](Self::face_indices)
    /// by each face, in order. Every entry must be strictly positive and the
    /// entries must sum to `face_indices.len()`.
    pub face_counts: Vec<u32>,
}

impl InitialShape {
    /// Build a single-face polygon from 3D points.
    ///
    /// The points become the flat vertex list in order, with one face
    /// spanning all of them.
    #[must_use]
    pub fn from_points(
        rule_file: impl Into<String>,
        start_rule: impl Into<String>,
        random_seed: i32,
        points: &[Point3<f64>],
    ) -> Self {
        let mut vertices = Vec::with_capacity(points.len() * 3);
        for p in points {
            vertices.extend_from_slice(&[p.x, p.y, p.z]);
        }
        Self {
            rule_file: rule_file.into(),
            start_rule: start_rule.into(),
            random_seed,
            vertices,
            face_indices: (0..points.len() as u32).collect(),
            face_counts: vec![points.len() as u32],
        }
    }

    /// Number of vertices described by [`vertices`](Self::vertices).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Check that the shape is well-formed.
    ///
    /// Read-only; no field is modified. Checks run in a fixed order and stop
    /// at the first violation: empty `rule_file`, empty `start_rule`, vertex
    /// length, non-positive face count, face-count sum mismatch, and finally
    /// out-of-range indices.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] whose `kind` names the first check that
    /// failed.
    pub fn validate(&self) -> ShapeResult<()> {
        if self.rule_file.is_empty() {
            return Err(ValidationError {
                kind: ValidationErrorKind::EmptyRuleFile,
                detail: "rule_file must not be empty".to_string(),
            });
        }

        if self.start_rule.is_empty() {
            return Err(ValidationError {
                kind: ValidationErrorKind::EmptyStartRule,
                detail: "start_rule must not be empty".to_string(),
            });
        }

        if self.vertices.is_empty() || self.vertices.len() % 3 != 0 {
            return Err(ValidationError {
                kind: ValidationErrorKind::BadVertexCount,
                detail: format!(
                    "vertices length must be a positive multiple of 3, got {}",
                    self.vertices.len()
                ),
            });
        }

        if let Some(pos) = self.face_counts.iter().position(|&c| c == 0) {
            return Err(ValidationError {
                kind: ValidationErrorKind::NonPositiveFaceCount,
                detail: format!("face_counts[{pos}] must be strictly positive"),
            });
        }

        let index_total: usize = self.face_counts.iter().map(|&c| c as usize).sum();
        if index_total != self.face_indices.len() {
            return Err(ValidationError {
                kind: ValidationErrorKind::FaceCountMismatch,
                detail: format!(
                    "face_counts sums to {index_total} but {} face indices were provided",
                    self.face_indices.len()
                ),
            });
        }

        let vertex_count = self.vertex_count();
        if let Some(pos) = self
            .face_indices
            .iter()
            .position(|&i| i as usize >= vertex_count)
        {
            return Err(ValidationError {
                kind: ValidationErrorKind::IndexOutOfRange,
                detail: format!(
                    "face_indices[{pos}] is {} but only {vertex_count} vertices exist",
                    self.face_indices[pos]
                ),
            });
        }

        Ok(())
    }
}
