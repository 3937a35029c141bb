//! # Form Definition
//!
//! [`FormDefinition`] owns a loaded form schema, its flattened
//! [`FormModel`] and the compiled structural validator, and validates
//! reports and datasets against them.
//!
//! ## Report Stages
//!
//! Run in this order; the first failure ends the report.
//!
//! 1. Exactly one paragraph.
//! 2. Every QA id is `<report_id>_<question_id>`, unused so far in the
//!    run, and names a question of the form. Each accepted id is recorded
//!    in the caller's `used_ids`.
//! 3. Every answer's evidence is found in the context.
//! 4. Every `enumeration_value_id` is in its question's answer domain.
//! 5. Optionally, the answers reassembled into a nested document pass
//!    the form's JSON Schema.
//!
//! ## Run State
//!
//! The model is read-only after construction. The only mutable state is
//! the set of used QA ids, owned by the caller for the length of one run.
//! [`FormDefinition::validate_dataset`] creates a fresh set per call, so
//! concurrent dataset runs never share one.

use std::collections::HashSet;
use std::path::Path;

use resq_core::{DataType, QaId, QuestionId};
use resq_schema::{
    flatten_schema, load_document, load_schema, nest_answers, FormModel, OptionSet,
    StructuralValidator,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FormError, ReportError};
use crate::evidence::validate_answer;
use crate::report::{Dataset, Qa, Report};
use crate::summary::{DatasetSummary, ReportFailure};

/// Default location of the form schema, relative to the working directory.
pub const DEFAULT_SCHEMA_PATH: &str = "resources/schema.json";

/// QA ids already used in a validation run.
pub type UsedQaIds = HashSet<QaId>;

/// A loaded form schema, ready to validate reports.
#[derive(Debug)]
pub struct FormDefinition {
    schema: Value,
    model: FormModel,
    structural: StructuralValidator,
}

impl FormDefinition {
    /// Load the schema at `schema_path` (JSON or YAML).
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, declares an
    /// unsupported type, or is not a compilable JSON Schema.
    pub fn new(schema_path: impl AsRef<Path>) -> Result<Self, FormError> {
        let schema_path = schema_path.as_ref();
        let schema = load_schema(schema_path)?;
        let definition = Self::build(schema_path.display().to_string(), schema)?;
        tracing::debug!(
            schema = %schema_path.display(),
            questions = definition.model.question_count(),
            "loaded form schema"
        );
        Ok(definition)
    }

    /// Build from an already parsed schema.
    pub fn from_schema(schema: Value) -> Result<Self, FormError> {
        let name = schema
            .get("$id")
            .or_else(|| schema.get("title"))
            .and_then(Value::as_str)
            .unwrap_or("form schema")
            .to_string();
        Self::build(name, schema)
    }

    fn build(name: String, schema: Value) -> Result<Self, FormError> {
        let model = flatten_schema(&schema)?;
        let structural = StructuralValidator::new(name, &schema)?;
        Ok(Self {
            schema,
            model,
            structural,
        })
    }

    /// The schema as loaded.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The flattened form model.
    pub fn model(&self) -> &FormModel {
        &self.model
    }

    /// All question ids of the form, sorted.
    pub fn question_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.model.question_ids()
    }

    /// The answer domain of `question_id`.
    pub fn possible_options(&self, question_id: &str) -> Option<&OptionSet> {
        self.model.options_for(question_id)
    }

    /// Whether `question_id` accepts answers of kind `data_type`.
    ///
    /// Boolean and null are checked by literal membership, `enum` by the
    /// presence of any enum literal, everything else by a typed option of
    /// that kind. Unknown questions accept nothing.
    pub fn question_includes_datatype(&self, question_id: &str, data_type: DataType) -> bool {
        self.model.includes_datatype(question_id, data_type)
    }

    /// Validate one report.
    ///
    /// `used_ids` carries QA ids across the reports of one run; every id
    /// accepted in stage 2 is inserted, even if a later stage fails.
    pub fn validate_report(
        &self,
        report: &Report,
        structural_check: bool,
        used_ids: &mut UsedQaIds,
    ) -> Result<(), ReportError> {
        let [paragraph] = report.paragraphs.as_slice() else {
            return Err(ReportError::ParagraphCount {
                found: report.paragraphs.len(),
            });
        };

        for qa in &paragraph.qas {
            self.validate_qa_identity(qa, report, used_ids)?;
        }

        for qa in &paragraph.qas {
            for answer in &qa.answers {
                validate_answer(answer, &paragraph.context)?;
            }
        }

        for qa in &paragraph.qas {
            self.validate_enumeration_value(qa)?;
        }

        if structural_check {
            let answers = nest_answers(
                paragraph
                    .qas
                    .iter()
                    .map(|qa| (qa.question_id.as_str(), &qa.enumeration_value_id)),
            );
            self.structural
                .validate(&answers)
                .map_err(ReportError::Structural)?;
        }

        Ok(())
    }

    fn validate_qa_identity(
        &self,
        qa: &Qa,
        report: &Report,
        used_ids: &mut UsedQaIds,
    ) -> Result<(), ReportError> {
        let expected = QaId::expected(&report.report_id, &qa.question_id);
        if qa.id != expected.as_str() {
            return Err(ReportError::QaIdFormat {
                id: qa.id.clone(),
                expected: expected.to_string(),
            });
        }
        if used_ids.contains(&expected) {
            return Err(ReportError::DuplicateQaId {
                id: qa.id.clone(),
                report_id: report.report_id.to_string(),
            });
        }
        if !self.model.contains(&qa.question_id) {
            return Err(ReportError::UnknownQuestion {
                question_id: qa.question_id.clone(),
            });
        }
        used_ids.insert(expected);
        Ok(())
    }

    fn validate_enumeration_value(&self, qa: &Qa) -> Result<(), ReportError> {
        let options = self.model.options_for(&qa.question_id).ok_or_else(|| {
            ReportError::UnknownQuestion {
                question_id: qa.question_id.clone(),
            }
        })?;
        if options.accepts(&qa.enumeration_value_id) {
            Ok(())
        } else {
            Err(ReportError::InvalidEnumerationValue {
                value: qa.enumeration_value_id.to_string(),
                question_id: qa.question_id.clone(),
                valid_options: options.describe(),
            })
        }
    }

    /// Validate every report of a dataset.
    ///
    /// Never stops early: each invalid report is logged, recorded in the
    /// summary, and the run moves on. QA id uniqueness is checked across
    /// the whole dataset.
    pub fn validate_dataset(&self, dataset: &Dataset, structural_check: bool) -> DatasetSummary {
        let mut used_ids = UsedQaIds::new();
        let mut failures = Vec::new();

        for raw in &dataset.data {
            let report_id = report_id_of(raw);
            let result = Report::deserialize(raw)
                .map_err(|e| ReportError::MalformedReport {
                    reason: e.to_string(),
                })
                .and_then(|report| self.validate_report(&report, structural_check, &mut used_ids));

            if let Err(error) = result {
                let failure = ReportFailure { report_id, error };
                tracing::error!(
                    report_id = %failure.report_id,
                    structural = failure.error.is_structural(),
                    "{failure}"
                );
                failures.push(failure);
            }
        }

        let summary = DatasetSummary {
            total: dataset.len(),
            failures,
        };
        tracing::info!(
            invalid = summary.invalid_count(),
            total = summary.total,
            "{summary}"
        );
        summary
    }

    /// Load a dataset document (JSON or YAML) and validate it.
    ///
    /// # Errors
    ///
    /// Fails only if the document cannot be loaded or has no `data` list;
    /// invalid reports are recorded in the summary.
    pub fn validate_dataset_file(
        &self,
        path: impl AsRef<Path>,
        structural_check: bool,
    ) -> Result<DatasetSummary, FormError> {
        let document = load_document(path.as_ref())?;
        let dataset = Dataset::from_value(document)?;
        Ok(self.validate_dataset(&dataset, structural_check))
    }
}

fn report_id_of(raw: &Value) -> String {
    match raw.get("report_id") {
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
        None => "<unknown>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resq_core::ReportId;
    use serde_json::json;

    fn definition() -> FormDefinition {
        FormDefinition::from_schema(json!({
            "type": "object",
            "required": ["symptoms"],
            "properties": {
                "symptoms": {
                    "type": "object",
                    "required": ["fever"],
                    "properties": {
                        "fever": {"type": "boolean"},
                        "onset": {"type": "string", "format": "date"}
                    }
                },
                "severity": {"enum": ["mild", "severe"]},
                "temperature": {"type": "number", "minimum": 30, "maximum": 45}
            }
        }))
        .unwrap()
    }

    const CONTEXT: &str = "Onset 2023-02-28, high fever, severe course.";

    fn report(id: &str, qas: Value) -> Report {
        serde_json::from_value(json!({
            "report_id": id,
            "paragraphs": [{"context": CONTEXT, "qas": qas}]
        }))
        .unwrap()
    }

    fn qa(report_id: &str, question_id: &str, value: Value, text: &str) -> Value {
        let start = CONTEXT.find(text).unwrap();
        json!({
            "id": format!("{report_id}_{question_id}"),
            "question_id": question_id,
            "enumeration_value_id": value,
            "answers": [{"answer_type": "single", "text": text, "answer_start": start}]
        })
    }

    fn good_qas(report_id: &str) -> Value {
        json!([
            qa(report_id, "symptoms.fever", json!(true), "high fever"),
            qa(report_id, "symptoms.onset", json!("2023-02-28"), "2023-02-28"),
            qa(report_id, "severity", json!("severe"), "severe"),
        ])
    }

    #[test]
    fn test_valid_report() {
        let def = definition();
        let mut used = UsedQaIds::new();
        def.validate_report(&report("R1", good_qas("R1")), true, &mut used)
            .unwrap();
        assert_eq!(used.len(), 3);
        assert!(used.contains(&QaId::expected(&ReportId("R1".into()), "severity")));
    }

    #[test]
    fn test_paragraph_count() {
        let def = definition();
        let report: Report = serde_json::from_value(json!({
            "report_id": "R1",
            "paragraphs": [
                {"context": "a", "qas": []},
                {"context": "b", "qas": []}
            ]
        }))
        .unwrap();
        let err = def
            .validate_report(&report, false, &mut UsedQaIds::new())
            .unwrap_err();
        assert!(matches!(err, ReportError::ParagraphCount { found: 2 }));

        let empty: Report =
            serde_json::from_value(json!({"report_id": "R1", "paragraphs": []})).unwrap();
        assert!(matches!(
            def.validate_report(&empty, false, &mut UsedQaIds::new()),
            Err(ReportError::ParagraphCount { found: 0 })
        ));
    }

    #[test]
    fn test_qa_id_format() {
        let def = definition();
        let mut bad = qa("R1", "severity", json!("severe"), "severe");
        bad["id"] = json!("R1-severity");
        let err = def
            .validate_report(&report("R1", json!([bad])), false, &mut UsedQaIds::new())
            .unwrap_err();
        match err {
            ReportError::QaIdFormat { id, expected } => {
                assert_eq!(id, "R1-severity");
                assert_eq!(expected, "R1_severity");
            }
            other => panic!("Expected QaIdFormat, got: {other}"),
        }
    }

    #[test]
    fn test_duplicate_within_report() {
        let def = definition();
        let qas = json!([
            qa("R1", "severity", json!("severe"), "severe"),
            qa("R1", "severity", json!("severe"), "severe"),
        ]);
        let err = def
            .validate_report(&report("R1", qas), false, &mut UsedQaIds::new())
            .unwrap_err();
        assert!(matches!(err, ReportError::DuplicateQaId { .. }));
    }

    #[test]
    fn test_duplicate_across_reports_shares_used_ids() {
        let def = definition();
        let mut used = UsedQaIds::new();
        let r = report("R1", good_qas("R1"));
        def.validate_report(&r, false, &mut used).unwrap();
        let err = def.validate_report(&r, false, &mut used).unwrap_err();
        match err {
            ReportError::DuplicateQaId { id, report_id } => {
                assert_eq!(id, "R1_symptoms.fever");
                assert_eq!(report_id, "R1");
            }
            other => panic!("Expected DuplicateQaId, got: {other}"),
        }

        // A fresh run starts with no used ids.
        def.validate_report(&r, false, &mut UsedQaIds::new()).unwrap();
    }

    #[test]
    fn test_unknown_question() {
        let def = definition();
        let qas = json!([qa("R1", "symptoms", json!(true), "fever")]);
        let err = def
            .validate_report(&report("R1", qas), false, &mut UsedQaIds::new())
            .unwrap_err();
        assert!(matches!(err, ReportError::UnknownQuestion { .. }));
    }

    #[test]
    fn test_identity_stage_runs_before_evidence_stage() {
        let def = definition();
        let mut bad_evidence = qa("R1", "severity", json!("severe"), "severe");
        bad_evidence["answers"][0]["answer_start"] = json!(0);
        let qas = json!([bad_evidence, qa("R1", "nope", json!(1), "fever")]);
        let err = def
            .validate_report(&report("R1", qas), false, &mut UsedQaIds::new())
            .unwrap_err();
        assert!(matches!(err, ReportError::UnknownQuestion { .. }));
    }

    #[test]
    fn test_evidence_mismatch() {
        let def = definition();
        let mut bad = qa("R1", "severity", json!("severe"), "severe");
        bad["answers"][0]["answer_start"] = json!(31);
        let err = def
            .validate_report(&report("R1", json!([bad])), false, &mut UsedQaIds::new())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("\"severe\""), "{message}");
        assert!(message.contains("31"), "{message}");
    }

    #[test]
    fn test_invalid_enumeration_value_lists_options() {
        let def = definition();
        let qas = json!([qa("R1", "severity", json!("moderate"), "severe")]);
        let err = def
            .validate_report(&report("R1", qas), false, &mut UsedQaIds::new())
            .unwrap_err();
        match &err {
            ReportError::InvalidEnumerationValue { valid_options, .. } => {
                assert_eq!(valid_options, &vec!["\"mild\"".to_string(), "\"severe\"".to_string()]);
            }
            other => panic!("Expected InvalidEnumerationValue, got: {other}"),
        }
        assert!(err.to_string().contains("\"moderate\""));
        assert!(!err.is_structural());
    }

    #[test]
    fn test_impossible_date_rejected() {
        let def = definition();
        let qas = json!([qa("R1", "symptoms.onset", json!("2023-02-30"), "2023-02-28")]);
        let err = def
            .validate_report(&report("R1", qas), false, &mut UsedQaIds::new())
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidEnumerationValue { .. }));
    }

    #[test]
    fn test_short_year_date_rejected() {
        let def = definition();
        for value in ["23-02-28", " 2023-02-28", "+2023-02-28"] {
            let qas = json!([qa("R1", "symptoms.onset", json!(value), "2023-02-28")]);
            let err = def
                .validate_report(&report("R1", qas), false, &mut UsedQaIds::new())
                .unwrap_err();
            assert!(
                matches!(err, ReportError::InvalidEnumerationValue { .. }),
                "{value:?} accepted as a date: {err}"
            );
        }
    }

    #[test]
    fn test_number_bounds() {
        let def = definition();
        let ok = json!([qa("R1", "temperature", json!(39.5), "high fever")]);
        def.validate_report(&report("R1", ok), false, &mut UsedQaIds::new())
            .unwrap();
        let hot = json!([qa("R1", "temperature", json!(50), "high fever")]);
        assert!(def
            .validate_report(&report("R1", hot), false, &mut UsedQaIds::new())
            .is_err());
    }

    #[test]
    fn test_structural_check_is_optional() {
        let def = definition();
        // No symptoms.fever answer: semantically fine, structurally incomplete.
        let qas = json!([qa("R1", "severity", json!("severe"), "severe")]);
        def.validate_report(&report("R1", qas.clone()), false, &mut UsedQaIds::new())
            .unwrap();
        let err = def
            .validate_report(&report("R1", qas), true, &mut UsedQaIds::new())
            .unwrap_err();
        assert!(err.is_structural(), "Expected structural error, got: {err}");
    }

    #[test]
    fn test_question_includes_datatype() {
        let def = definition();
        assert!(def.question_includes_datatype("symptoms.fever", DataType::Boolean));
        assert!(!def.question_includes_datatype("symptoms.fever", DataType::Null));
        assert!(def.question_includes_datatype("severity", DataType::Enum));
        assert!(!def.question_includes_datatype("severity", DataType::String));
        assert!(def.question_includes_datatype("symptoms.onset", DataType::Date));
        assert!(def.question_includes_datatype("temperature", DataType::Number));
        assert!(!def.question_includes_datatype("temperature", DataType::Integer));
        assert!(!def.question_includes_datatype("unknown", DataType::Boolean));
    }

    #[test]
    fn test_dataset_counts_invalid_reports() {
        let def = definition();
        let mut bad = qa("R2", "severity", json!("severe"), "severe");
        bad["answers"][0]["answer_start"] = json!(32);
        let dataset = Dataset {
            data: vec![
                json!({"report_id": "R1", "paragraphs": [{"context": CONTEXT, "qas": good_qas("R1")}]}),
                json!({"report_id": "R2", "paragraphs": [{"context": CONTEXT, "qas": [bad]}]}),
            ],
        };
        let summary = def.validate_dataset(&dataset, true);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.invalid_count(), 1);
        let failure = summary.failure_for("R2").unwrap();
        assert!(matches!(failure.error, ReportError::EvidenceMismatch { start: 32, .. }));
    }

    #[test]
    fn test_numeric_report_id() {
        let def = definition();
        let dataset = Dataset {
            data: vec![
                json!({"report_id": 7, "paragraphs": [{"context": CONTEXT, "qas": good_qas("7")}]}),
                json!({"report_id": 8, "paragraphs": [{"context": CONTEXT, "qas": good_qas("R8")}]}),
            ],
        };
        let summary = def.validate_dataset(&dataset, true);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.invalid_count(), 1);
        match &summary.failure_for("8").unwrap().error {
            ReportError::QaIdFormat { expected, .. } => assert!(expected.starts_with("8_")),
            other => panic!("Expected QaIdFormat, got: {other}"),
        }
    }

    #[test]
    fn test_malformed_report_is_counted_not_fatal() {
        let def = definition();
        let dataset = Dataset {
            data: vec![
                json!({"report_id": "R0"}),
                json!({"paragraphs": []}),
                json!({"report_id": "R1", "paragraphs": [{"context": CONTEXT, "qas": good_qas("R1")}]}),
            ],
        };
        let summary = def.validate_dataset(&dataset, false);
        assert_eq!(summary.invalid_count(), 2);
        assert!(matches!(
            summary.failure_for("R0").unwrap().error,
            ReportError::MalformedReport { .. }
        ));
        assert!(summary.failure_for("<unknown>").is_some());
    }

    #[test]
    fn test_unsupported_schema_type_is_fatal() {
        let err = FormDefinition::from_schema(json!({
            "properties": {"tags": {"type": "array"}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("array"));
    }
}
