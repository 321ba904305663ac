use chrono::Local;
use clap::{Args, ValueEnum};
use risk_profiler::error::AppError;
use risk_profiler::questionnaire::catalog::{builtin, fixtures};
use risk_profiler::questionnaire::rating::derive_rating;
use risk_profiler::questionnaire::{catalog_views, AnswerSelection};
use risk_profiler::report::template::{self, TemplateParams};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Rating to preview; "1".."5" pick the matching band, anything else
    /// exercises the Unknown fallback
    #[arg(long, default_value = "3")]
    pub(crate) rating: String,
    /// Where to write the compiled HTML
    #[arg(long, default_value = "preview-output.html")]
    pub(crate) out: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct RatingArgs {
    /// Canned answer profile to derive a rating for
    #[arg(long, value_enum, default_value_t = AnswerProfile::Medium)]
    pub(crate) profile: AnswerProfile,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub(crate) enum AnswerProfile {
    Low,
    Medium,
    High,
}

impl AnswerProfile {
    fn selections(self) -> Vec<AnswerSelection> {
        match self {
            AnswerProfile::Low => fixtures::low_risk_answers(),
            AnswerProfile::Medium => fixtures::medium_risk_answers(),
            AnswerProfile::High => fixtures::high_risk_answers(),
        }
    }
}

fn answers_for_rating(rating: &str) -> Vec<AnswerSelection> {
    match rating {
        "1" | "2" => fixtures::low_risk_answers(),
        "4" | "5" => fixtures::high_risk_answers(),
        _ => fixtures::medium_risk_answers(),
    }
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let questions_json =
        serde_json::to_string(&catalog_views(builtin())).expect("catalog serializes");
    let answers_json =
        serde_json::to_string(&answers_for_rating(&args.rating)).expect("answers serialize");

    let html = template::compile(&TemplateParams {
        risk_rating: args.rating.clone(),
        questions_json: template::html_encode(&questions_json),
        answers_json: template::html_encode(&answers_json),
        date: Local::now().format("%d/%m/%Y").to_string(),
    });

    std::fs::write(&args.out, html)?;
    println!(
        "Preview written to {} (rating: {})",
        args.out.display(),
        args.rating
    );
    Ok(())
}

pub(crate) fn run_rating(args: RatingArgs) -> Result<(), AppError> {
    let rating = derive_rating(builtin(), &args.profile.selections())?;
    let band = rating.band();
    println!("Rating:      {} of 5", rating.value());
    println!("Band:        {} ({})", band.label, band.short_label);
    println!("Description: {}", band.description);
    Ok(())
}
