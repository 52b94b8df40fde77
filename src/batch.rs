//! Class-roster scoring: join answers to keys and grade every row.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::{Result, ScoringError};
use crate::pipeline::ScoringPipeline;
use crate::records::{AnswerKeyRecord, QuestionId, ScoredRecord, StudentAnswerRecord};
use crate::scoring::score;

/// A student row without a matching answer key.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRow {
    /// 1-based row in the student-answer table.
    pub row: usize,
    /// Student name.
    pub student_name: String,
    /// Identifier that found no key (`None` when the cell was empty).
    pub question_id: Option<QuestionId>,
}

/// A joined row excluded because its vectors could not be compared.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRow {
    /// 1-based row in the student-answer table.
    pub row: usize,
    /// Student name.
    pub student_name: String,
    /// Question identifier.
    pub question_id: QuestionId,
    /// Why the row was excluded.
    pub reason: String,
}

/// Result of one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Graded rows, in student-answer table order.
    pub scored: Vec<ScoredRecord>,
    /// Unmatched student rows (inner-join drops).
    pub dropped: Vec<DroppedRow>,
    /// Rows excluded by per-row isolation.
    pub failed: Vec<FailedRow>,
}

/// Checks table-level invariants before any embedding work happens.
///
/// Fails when the answer key repeats a question id, or when one table uses only
/// numeric ids while the other uses only text ids.
pub fn validate(keys: &[AnswerKeyRecord], answers: &[StudentAnswerRecord]) -> Result<()> {
    let key_kind = id_kind(keys.iter().filter_map(|k| k.question_id.as_ref()));
    let answer_kind = id_kind(answers.iter().filter_map(|a| a.question_id.as_ref()));
    if let (Some(key_kind), Some(answer_kind)) = (key_kind, answer_kind) {
        if key_kind != "mixed" && answer_kind != "mixed" && key_kind != answer_kind {
            return Err(ScoringError::KeyTypeMismatch {
                key_kind,
                answer_kind,
            });
        }
    }
    key_index(keys).map(|_| ())
}

fn id_kind<'a>(ids: impl Iterator<Item = &'a QuestionId>) -> Option<&'static str> {
    let mut kind = None;
    for id in ids {
        match kind {
            None => kind = Some(id.kind()),
            Some(seen) if seen != id.kind() => return Some("mixed"),
            Some(_) => {}
        }
    }
    kind
}

fn key_index(keys: &[AnswerKeyRecord]) -> Result<HashMap<&QuestionId, &AnswerKeyRecord>> {
    let mut index = HashMap::with_capacity(keys.len());
    for key in keys {
        let Some(id) = key.question_id.as_ref() else {
            continue;
        };
        if index.insert(id, key).is_some() {
            return Err(ScoringError::DuplicateQuestion(id.to_string()));
        }
    }
    Ok(index)
}

/// Inner-joins `answers` to `keys` on question id and grades each joined row.
///
/// All reference texts go to the encoder in one call and all student texts in a
/// second call. A failed call fails the batch; a row whose vectors cannot be
/// compared, or do not match the encoder's dimension, is reported in
/// [`BatchReport::failed`] and the rest still score.
pub fn align_and_score(
    pipeline: &ScoringPipeline,
    keys: &[AnswerKeyRecord],
    answers: &[StudentAnswerRecord],
) -> Result<BatchReport> {
    validate(keys, answers)?;
    let index = key_index(keys)?;

    let mut report = BatchReport::default();
    let mut joined: Vec<(&StudentAnswerRecord, &QuestionId, &AnswerKeyRecord)> = Vec::new();
    for answer in answers {
        let matched = answer
            .question_id
            .as_ref()
            .and_then(|id| index.get_key_value(id));
        match matched {
            Some((id, key)) => joined.push((answer, *id, *key)),
            None => report.dropped.push(DroppedRow {
                row: answer.row,
                student_name: answer.student_name.clone(),
                question_id: answer.question_id.clone(),
            }),
        }
    }
    if !report.dropped.is_empty() {
        warn!(
            dropped = report.dropped.len(),
            "student rows without a matching answer key were dropped"
        );
        for row in &report.dropped {
            debug!(row = row.row, student = %row.student_name, question = ?row.question_id, "dropped");
        }
    }
    if joined.is_empty() {
        info!("no student rows matched the answer key");
        return Ok(report);
    }

    let key_texts: Vec<String> = joined
        .iter()
        .map(|(_, _, key)| pipeline.preprocess(&key.key_answer))
        .collect();
    let answer_texts: Vec<String> = joined
        .iter()
        .map(|(answer, _, _)| pipeline.preprocess(&answer.answer))
        .collect();

    let client = pipeline.client();
    let key_vectors = client.embed(&key_texts)?;
    let answer_vectors = client.embed(&answer_texts)?;

    for (((answer, id, _), key_vec), answer_vec) in
        joined.iter().zip(&key_vectors).zip(&answer_vectors)
    {
        let graded = client
            .check_dimension(key_vec)
            .and_then(|()| client.check_dimension(answer_vec))
            .and_then(|()| score(key_vec, answer_vec));
        match graded {
            Ok(grade) => report.scored.push(ScoredRecord {
                question_id: (*id).clone(),
                student_name: answer.student_name.clone(),
                score: grade,
            }),
            Err(err) => {
                warn!(row = answer.row, student = %answer.student_name, question = %id, error = %err, "row excluded");
                report.failed.push(FailedRow {
                    row: answer.row,
                    student_name: answer.student_name.clone(),
                    question_id: (*id).clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        scored = report.scored.len(),
        dropped = report.dropped.len(),
        failed = report.failed.len(),
        "batch scoring complete"
    );
    Ok(report)
}
