use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use essay_scorer::records::{load_answer_key, load_student_answers, write_scored};
use essay_scorer::{batch, init_logging, BatchReport, EncoderArgs};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(
    name = "essay-score-batch",
    about = "Grade a class roster of answers against an answer key CSV"
)]
struct BatchCli {
    /// Answer-key CSV (no_soal, soal, kunci_jawaban, bobot_nilai)
    #[arg(long, env = "ESSAY_ANSWER_KEY")]
    answer_key: PathBuf,

    /// Student-answer CSV (nama_siswa, nomor_soal, jawaban_siswa, nilai_dari_guru)
    #[arg(long, env = "ESSAY_ANSWERS")]
    answers: PathBuf,

    /// Output CSV (nomor_soal, nama_siswa, nilai_dari_sistem)
    #[arg(long, env = "ESSAY_OUTPUT", default_value = "hasil_penilaian.csv")]
    output: PathBuf,

    #[command(flatten)]
    encoder: EncoderArgs,
}

fn main() -> Result<()> {
    init_logging();
    let cli = BatchCli::parse();

    let keys = load_answer_key(&cli.answer_key)
        .with_context(|| format!("failed to read answer key {:?}", cli.answer_key))?;
    let answers = load_student_answers(&cli.answers)
        .with_context(|| format!("failed to read student answers {:?}", cli.answers))?;
    // Table shape errors surface before the encoder is contacted.
    batch::validate(&keys, &answers).context("input tables are inconsistent")?;

    let pipeline = cli
        .encoder
        .load_pipeline()
        .with_context(|| format!("failed to initialize the {} encoder", cli.encoder.encoder))?;
    let report = pipeline
        .score_batch(&keys, &answers)
        .context("batch scoring failed")?;

    let output =
        File::create(&cli.output).with_context(|| format!("failed to create {:?}", cli.output))?;
    let mut writer = BufWriter::new(output);
    write_scored(&mut writer, &report.scored)
        .with_context(|| format!("failed to write {:?}", cli.output))?;
    writer.flush()?;

    print_table(&report)?;
    report_skipped(&report);
    println!(
        "Penilaian selesai! {} jawaban dinilai, hasil disimpan ke {}",
        report.scored.len(),
        cli.output.display()
    );
    Ok(())
}

fn print_table(report: &BatchReport) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let name_width = report
        .scored
        .iter()
        .map(|row| row.student_name.chars().count())
        .chain(std::iter::once("nama_siswa".len()))
        .max()
        .unwrap_or(0);
    writeln!(
        out,
        "{:<10}  {:<name_width$}  {}",
        "nomor_soal", "nama_siswa", "nilai_dari_sistem"
    )?;
    for row in &report.scored {
        writeln!(
            out,
            "{:<10}  {:<name_width$}  {}",
            row.question_id.to_string(),
            row.student_name,
            row.score
        )?;
    }
    Ok(())
}

fn report_skipped(report: &BatchReport) {
    for row in &report.dropped {
        let question = row
            .question_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        warn!(
            row = row.row,
            student = %row.student_name,
            question = %question,
            "no answer key for this question, row skipped"
        );
    }
    for row in &report.failed {
        warn!(
            row = row.row,
            student = %row.student_name,
            question = %row.question_id,
            reason = %row.reason,
            "row could not be scored"
        );
    }
}
