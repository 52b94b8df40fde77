//! Answer-key and student-answer tables: schema validation, parsing and output.

use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;

use crate::error::{Result, ScoringError};
use crate::scoring::DiscreteScore;

/// Columns the answer-key table must provide.
pub const ANSWER_KEY_COLUMNS: [&str; 4] = ["no_soal", "soal", "kunci_jawaban", "bobot_nilai"];
/// Columns the student-answer table must provide.
pub const STUDENT_ANSWER_COLUMNS: [&str; 4] =
    ["nama_siswa", "nomor_soal", "jawaban_siswa", "nilai_dari_guru"];
/// Header row of the scored output table.
pub const OUTPUT_COLUMNS: [&str; 3] = ["nomor_soal", "nama_siswa", "nilai_dari_sistem"];

const ANSWER_KEY_TABLE: &str = "answer key";
const STUDENT_ANSWER_TABLE: &str = "student answers";

/// Question identifier shared by both tables.
///
/// Integer cells compare numerically, so `"01"` and `"1"` refer to the same question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum QuestionId {
    /// Integer identifier.
    Numeric(i64),
    /// Any other non-empty identifier.
    Text(String),
}

impl QuestionId {
    /// Parses a raw cell. Empty cells carry no identifier.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.parse::<i64>() {
            Ok(number) => Self::Numeric(number),
            Err(_) => Self::Text(trimmed.to_string()),
        })
    }

    /// Short name of the identifier kind, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Numeric(_) => "numeric",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One row of the answer-key table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerKeyRecord {
    /// 1-based data row number (header excluded).
    pub row: usize,
    /// Question identifier (`no_soal`).
    pub question_id: Option<QuestionId>,
    /// Question text (`soal`), carried for display only.
    pub question: String,
    /// Reference answer (`kunci_jawaban`).
    pub key_answer: String,
    /// Maximum weight (`bobot_nilai`), carried through untouched.
    pub max_weight: String,
}

/// One row of the student-answer table.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentAnswerRecord {
    /// 1-based data row number (header excluded).
    pub row: usize,
    /// Student name (`nama_siswa`).
    pub student_name: String,
    /// Question identifier (`nomor_soal`).
    pub question_id: Option<QuestionId>,
    /// Student answer (`jawaban_siswa`).
    pub answer: String,
    /// Teacher-given score (`nilai_dari_guru`); never read by scoring.
    pub teacher_score: Option<String>,
}

/// A student answer joined with its key and graded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    /// Question identifier.
    #[serde(rename = "nomor_soal")]
    pub question_id: QuestionId,
    /// Student name.
    #[serde(rename = "nama_siswa")]
    pub student_name: String,
    /// Computed grade.
    #[serde(rename = "nilai_dari_sistem")]
    pub score: DiscreteScore,
}

/// Column positions resolved from a header row.
struct Columns<const N: usize>([usize; N]);

impl<const N: usize> Columns<N> {
    fn resolve(table: &'static str, headers: &StringRecord, wanted: [&str; N]) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let mut positions = [0usize; N];
        let mut missing = Vec::new();
        for (slot, column) in positions.iter_mut().zip(wanted) {
            match names.iter().position(|name| name == column) {
                Some(index) => *slot = index,
                None => missing.push(column.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(ScoringError::MissingColumns {
                table,
                columns: missing,
            });
        }
        Ok(Self(positions))
    }

    /// Cell text for column `i`; short rows yield an empty string.
    fn cell<'r>(&self, record: &'r StringRecord, i: usize) -> &'r str {
        record.get(self.0[i]).unwrap_or("")
    }
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new().flexible(true).from_reader(input)
}

/// Parses the answer-key table, failing fast when a required column is absent.
pub fn read_answer_key<R: Read>(input: R) -> Result<Vec<AnswerKeyRecord>> {
    let mut reader = reader(input);
    let columns = Columns::resolve(ANSWER_KEY_TABLE, reader.headers()?, ANSWER_KEY_COLUMNS)?;
    let mut records = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        records.push(AnswerKeyRecord {
            row: index + 1,
            question_id: QuestionId::parse(columns.cell(&record, 0)),
            question: columns.cell(&record, 1).to_string(),
            key_answer: columns.cell(&record, 2).to_string(),
            max_weight: columns.cell(&record, 3).trim().to_string(),
        });
    }
    Ok(records)
}

/// Parses the student-answer table, failing fast when a required column is absent.
pub fn read_student_answers<R: Read>(input: R) -> Result<Vec<StudentAnswerRecord>> {
    let mut reader = reader(input);
    let columns = Columns::resolve(
        STUDENT_ANSWER_TABLE,
        reader.headers()?,
        STUDENT_ANSWER_COLUMNS,
    )?;
    let mut records = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let teacher_score = columns.cell(&record, 3).trim();
        records.push(StudentAnswerRecord {
            row: index + 1,
            student_name: columns.cell(&record, 0).trim().to_string(),
            question_id: QuestionId::parse(columns.cell(&record, 1)),
            answer: columns.cell(&record, 2).to_string(),
            teacher_score: (!teacher_score.is_empty()).then(|| teacher_score.to_string()),
        });
    }
    Ok(records)
}

/// Opens and parses an answer-key CSV file.
pub fn load_answer_key(path: &Path) -> Result<Vec<AnswerKeyRecord>> {
    read_answer_key(File::open(path)?)
}

/// Opens and parses a student-answer CSV file.
pub fn load_student_answers(path: &Path) -> Result<Vec<StudentAnswerRecord>> {
    read_student_answers(File::open(path)?)
}

/// Writes scored rows as UTF-8 CSV with a header row, even when there are no rows.
pub fn write_scored<W: Write>(output: W, records: &[ScoredRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    writer.write_record(OUTPUT_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_answer_key_with_reordered_columns() {
        let csv = "soal,no_soal,bobot_nilai,kunci_jawaban\n\
                   Apa itu kucing?,1,10,\"Kucing itu lucu, sekali.\"\n";
        let keys = read_answer_key(csv.as_bytes()).unwrap();
        assert_eq!(
            keys,
            vec![AnswerKeyRecord {
                row: 1,
                question_id: Some(QuestionId::Numeric(1)),
                question: "Apa itu kucing?".into(),
                key_answer: "Kucing itu lucu, sekali.".into(),
                max_weight: "10".into(),
            }]
        );
    }

    #[test]
    fn missing_columns_are_named() {
        let csv = "no_soal,soal\n1,apa\n";
        let err = read_answer_key(csv.as_bytes()).unwrap_err();
        match err {
            ScoringError::MissingColumns { table, columns } => {
                assert_eq!(table, "answer key");
                assert_eq!(columns, vec!["kunci_jawaban", "bobot_nilai"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn short_rows_coerce_to_empty_text() {
        let csv = "nama_siswa,nomor_soal,jawaban_siswa,nilai_dari_guru\nBudi,2\n";
        let answers = read_student_answers(csv.as_bytes()).unwrap();
        assert_eq!(answers[0].answer, "");
        assert_eq!(answers[0].teacher_score, None);
        assert_eq!(answers[0].question_id, Some(QuestionId::Numeric(2)));
    }

    #[test]
    fn header_bom_and_padding_are_ignored() {
        let csv = "\u{feff}nama_siswa, nomor_soal ,jawaban_siswa,nilai_dari_guru\nAni,A1,jawab,8\n";
        let answers = read_student_answers(csv.as_bytes()).unwrap();
        assert_eq!(answers[0].question_id, Some(QuestionId::Text("A1".into())));
        assert_eq!(answers[0].teacher_score.as_deref(), Some("8"));
    }

    #[test]
    fn question_ids_parse_numeric_text_and_empty() {
        assert_eq!(QuestionId::parse(" 01 "), Some(QuestionId::Numeric(1)));
        assert_eq!(QuestionId::parse("1a"), Some(QuestionId::Text("1a".into())));
        assert_eq!(QuestionId::parse("  "), None);
    }

    #[test]
    fn writes_header_and_rows() {
        let rows = vec![
            ScoredRecord {
                question_id: QuestionId::Numeric(1),
                student_name: "Ani".into(),
                score: DiscreteScore::new(10),
            },
            ScoredRecord {
                question_id: QuestionId::Text("B2".into()),
                student_name: "Budi, S.".into(),
                score: DiscreteScore::new(1),
            },
        ];
        let mut out = Vec::new();
        write_scored(&mut out, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "nomor_soal,nama_siswa,nilai_dari_sistem\n1,Ani,10\nB2,\"Budi, S.\",1\n"
        );
    }

    #[test]
    fn empty_output_still_has_header() {
        let mut out = Vec::new();
        write_scored(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "nomor_soal,nama_siswa,nilai_dari_sistem\n"
        );
    }
}
