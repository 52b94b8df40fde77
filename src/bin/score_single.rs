use anyhow::{Context, Result};
use clap::Parser;
use essay_scorer::{init_logging, EncoderArgs};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "essay-score",
    about = "Grade one student answer against a reference answer on a 1-10 scale"
)]
struct SingleCli {
    /// Student name, echoed in the report
    #[arg(long, default_value = "")]
    name: String,

    /// Question text, echoed in the report
    #[arg(long, default_value = "")]
    question: String,

    /// Reference answer
    #[arg(long)]
    answer_key: String,

    /// Student answer
    #[arg(long)]
    answer: String,

    /// Print a JSON object instead of the plain report
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(flatten)]
    encoder: EncoderArgs,
}

#[derive(Serialize)]
struct SingleReport<'a> {
    name: &'a str,
    question: &'a str,
    encoder: &'static str,
    similarity: f64,
    score: u8,
}

fn main() -> Result<()> {
    init_logging();
    let cli = SingleCli::parse();

    let pipeline = cli
        .encoder
        .load_pipeline()
        .with_context(|| format!("failed to initialize the {} encoder", cli.encoder.encoder))?;
    let result = pipeline
        .score_single(&cli.answer_key, &cli.answer)
        .context("failed to score answer")?;

    if cli.json {
        let report = SingleReport {
            name: &cli.name,
            question: &cli.question,
            encoder: cli.encoder.encoder.as_str(),
            similarity: result.similarity,
            score: result.score.value(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Nama Siswa: {}", cli.name);
        println!("Soal: {}", cli.question);
        println!("Bobot Jawaban Siswa: {}", result.score);
    }
    Ok(())
}
