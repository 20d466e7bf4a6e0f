use clap::Args;
use serde_json::Value;
use std::path::PathBuf;
use tamizaje::error::AppError;
use tamizaje::workflows::screening::{PayloadAssembler, RawAnswers, ScreeningResult};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding a raw answers object, or a full submission with `respuestas`
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Pretty-print the JSON result
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let contents = std::fs::read_to_string(&args.answers)?;
    let result = score_document(serde_json::from_str(&contents)?);
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn score_document(document: Value) -> ScreeningResult {
    let answers = match document {
        Value::Object(mut fields) if fields.contains_key("respuestas") => fields
            .remove("respuestas")
            .map(RawAnswers::from_value)
            .unwrap_or_default(),
        other => RawAnswers::from_value(other),
    };
    PayloadAssembler::default().evaluate(&answers).result
}
