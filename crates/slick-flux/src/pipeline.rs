//! Flux pipeline validation and stability bounds.
//!
//! [`validate_terms`] runs once at engine initialization to check the term
//! list and the configured time step against every term's stability limit.
//! Explicit terms add their outflow rates, so the combined bound is the
//! harmonic sum of the individual limits: `1 / Σ (1 / max_dt)`.

use indexmap::IndexSet;
use slick_core::CellId;
use slick_mesh::Mesh;
use thiserror::Error;

use crate::fields::CellFields;
use crate::term::FluxTerm;

// ── Errors ─────────────────────────────────────────────────────────

/// Errors from pipeline validation (initialization-time, not per-step).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PipelineError {
    /// No flux terms registered.
    #[error("pipeline has no flux terms")]
    EmptyPipeline,

    /// Two terms share a name, making metrics and errors ambiguous.
    #[error("flux term '{name}' registered twice")]
    DuplicateTerm {
        /// The repeated name.
        name: String,
    },

    /// A per-cell field does not have one entry per mesh cell.
    #[error("{field} field has {found} entries, mesh has {expected} cells")]
    FieldLength {
        /// Which field.
        field: &'static str,
        /// Mesh cell count.
        expected: usize,
        /// Entries supplied.
        found: usize,
    },

    /// A per-cell field value is non-finite or out of range.
    #[error("{field} value {value} at cell {cell} is invalid")]
    InvalidFieldValue {
        /// Which field.
        field: &'static str,
        /// First offending cell.
        cell: CellId,
        /// The offending value (magnitude for vectors).
        value: f64,
    },

    /// The configured dt is not a valid timestep (NaN, infinity, zero, or negative).
    #[error("dt must be finite and positive, got {value}")]
    InvalidDt {
        /// The invalid dt value.
        value: f64,
    },

    /// A term's `max_dt()` returned a non-finite or non-positive value.
    #[error("flux term '{term}' returned invalid max_dt: {value} (must be finite and positive)")]
    InvalidMaxDt {
        /// Which term.
        term: String,
        /// The invalid max_dt value.
        value: f64,
    },

    /// The configured dt exceeds the combined stability bound.
    #[error(
        "dt {configured_dt} exceeds stability bound {max_supported} \
         (tightest term '{constraining_term}')"
    )]
    DtTooLarge {
        /// The dt that was requested.
        configured_dt: f64,
        /// The combined bound.
        max_supported: f64,
        /// The term with the smallest individual limit.
        constraining_term: String,
    },
}

// ── Stability ──────────────────────────────────────────────────────

/// Per-term stability limits and their combination.
#[derive(Clone, Debug, PartialEq)]
pub struct StabilityReport {
    /// `(term name, max_dt)` for every term that imposes a limit, in
    /// pipeline order.
    pub limits: Vec<(String, f64)>,
    /// Combined bound, or `None` when no term imposes a limit.
    pub bound: Option<f64>,
}

impl StabilityReport {
    /// Name of the term with the smallest individual limit.
    pub fn constraining_term(&self) -> Option<&str> {
        self.limits
            .iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, _)| name.as_str())
    }
}

/// Compute the stability bound of a term list.
///
/// Checks performed:
///
/// 1. Pipeline is non-empty.
/// 2. Term names are unique.
/// 3. Every `max_dt` is finite and positive when present.
pub fn stability_bound(
    terms: &[Box<dyn FluxTerm>],
    mesh: &Mesh,
    fields: &CellFields,
) -> Result<StabilityReport, PipelineError> {
    // 1. Non-empty
    if terms.is_empty() {
        return Err(PipelineError::EmptyPipeline);
    }

    // 2. Unique names
    let mut names = IndexSet::new();
    for term in terms {
        if !names.insert(term.name()) {
            return Err(PipelineError::DuplicateTerm {
                name: term.name().to_string(),
            });
        }
    }

    // 3. Limits
    let mut limits = Vec::new();
    let mut rate_sum = 0.0;
    for term in terms {
        if let Some(max) = term.max_dt(mesh, fields) {
            if !max.is_finite() || max <= 0.0 {
                return Err(PipelineError::InvalidMaxDt {
                    term: term.name().to_string(),
                    value: max,
                });
            }
            rate_sum += 1.0 / max;
            limits.push((term.name().to_string(), max));
        }
    }

    let bound = (!limits.is_empty()).then(|| 1.0 / rate_sum);
    Ok(StabilityReport { limits, bound })
}

/// Validate a term list against a configured time step.
///
/// Runs [`stability_bound`] and additionally checks that `dt` is finite,
/// positive, and within the combined bound.
pub fn validate_terms(
    terms: &[Box<dyn FluxTerm>],
    mesh: &Mesh,
    fields: &CellFields,
    dt: f64,
) -> Result<StabilityReport, PipelineError> {
    // 0. dt must be finite and positive
    if !dt.is_finite() || dt <= 0.0 {
        return Err(PipelineError::InvalidDt { value: dt });
    }

    let report = stability_bound(terms, mesh, fields)?;
    if let Some(bound) = report.bound {
        if dt > bound {
            return Err(PipelineError::DtTooLarge {
                configured_dt: dt,
                max_supported: bound,
                constraining_term: report.constraining_term().unwrap_or_default().to_string(),
            });
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FluxContext;
    use slick_mesh::EdgeGeometry;
    use slick_test_utils::fixtures;

    // ── Test terms ─────────────────────────────────────────────

    struct Limited {
        name: &'static str,
        max: Option<f64>,
    }

    impl FluxTerm for Limited {
        fn name(&self) -> &str {
            self.name
        }
        fn max_dt(&self, _: &Mesh, _: &CellFields) -> Option<f64> {
            self.max
        }
        fn edge_flux(&self, _: &FluxContext<'_>, _: CellId, _: &EdgeGeometry) -> f64 {
            0.0
        }
    }

    fn term(name: &'static str, max: Option<f64>) -> Box<dyn FluxTerm> {
        Box::new(Limited { name, max })
    }

    fn setup() -> (Mesh, CellFields) {
        let mesh = fixtures::two_cell_square();
        let fields = CellFields::still(mesh.cell_count());
        (mesh, fields)
    }

    #[test]
    fn empty_pipeline_rejected() {
        let (mesh, fields) = setup();
        match validate_terms(&[], &mesh, &fields, 0.1) {
            Err(PipelineError::EmptyPipeline) => {}
            other => panic!("expected EmptyPipeline, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_names_rejected() {
        let (mesh, fields) = setup();
        let terms = vec![term("adv", None), term("adv", Some(1.0))];
        match validate_terms(&terms, &mesh, &fields, 0.1) {
            Err(PipelineError::DuplicateTerm { name }) => assert_eq!(name, "adv"),
            other => panic!("expected DuplicateTerm, got {other:?}"),
        }
    }

    #[test]
    fn invalid_dt_rejected() {
        let (mesh, fields) = setup();
        let terms = vec![term("a", None)];
        for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            match validate_terms(&terms, &mesh, &fields, dt) {
                Err(PipelineError::InvalidDt { .. }) => {}
                other => panic!("expected InvalidDt for {dt}, got {other:?}"),
            }
        }
    }

    #[test]
    fn invalid_max_dt_rejected() {
        let (mesh, fields) = setup();
        let terms = vec![term("bad", Some(f64::NAN))];
        match validate_terms(&terms, &mesh, &fields, 0.1) {
            Err(PipelineError::InvalidMaxDt { term, .. }) => assert_eq!(term, "bad"),
            other => panic!("expected InvalidMaxDt, got {other:?}"),
        }
    }

    #[test]
    fn limits_combine_harmonically() {
        let (mesh, fields) = setup();
        let terms = vec![term("a", Some(1.0)), term("b", None), term("c", Some(1.0))];
        let report = stability_bound(&terms, &mesh, &fields).unwrap();
        assert_eq!(report.limits.len(), 2);
        assert_eq!(report.bound, Some(0.5));
        assert!(validate_terms(&terms, &mesh, &fields, 0.5).is_ok());
    }

    #[test]
    fn dt_too_large_names_tightest_term() {
        let (mesh, fields) = setup();
        let terms = vec![term("slow", Some(4.0)), term("fast", Some(1.0))];
        match validate_terms(&terms, &mesh, &fields, 1.0) {
            Err(PipelineError::DtTooLarge {
                constraining_term,
                max_supported,
                ..
            }) => {
                assert_eq!(constraining_term, "fast");
                assert!((max_supported - 0.8).abs() < 1e-12);
            }
            other => panic!("expected DtTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn unconstrained_pipeline_accepts_any_dt() {
        let (mesh, fields) = setup();
        let terms = vec![term("free", None)];
        let report = validate_terms(&terms, &mesh, &fields, 1e6).unwrap();
        assert_eq!(report.bound, None);
        assert_eq!(report.constraining_term(), None);
    }
}
