use crate::infra::{scoring_service, InMemoryLeadStore};
use clap::Args;
use lead_intent::config::AppConfig;
use lead_intent::error::AppError;
use lead_intent::scoring::{write_results, OfferSubmission, ScoringReport};
use lead_intent::telemetry;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Offer definition as JSON (`name`, `value_props`, `ideal_use_cases`)
    #[arg(long)]
    pub(crate) offer: PathBuf,
    /// Lead CSV with a header row
    #[arg(long)]
    pub(crate) leads: PathBuf,
    /// Print the scoring report as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
    /// Also write the results as CSV to this path
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

pub(crate) async fn run_score_report(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let outcome = score_files(&args, &config).await;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    emit_outcome(&mut out, &args, outcome)
}

/// Print and export a finished run. An aborted run still emits the results written before
/// the failure, then returns its error.
pub(crate) fn emit_outcome<W: Write>(
    out: &mut W,
    args: &ScoreArgs,
    outcome: Result<ScoringReport, AppError>,
) -> Result<(), AppError> {
    match outcome {
        Ok(report) => emit_report(out, args, &report),
        Err(AppError::Scoring(err)) => {
            if let Some(partial) = err.partial_report() {
                if !args.json {
                    writeln!(
                        out,
                        "Scoring run aborted after {} lead(s); partial results follow",
                        partial.leads_scored
                    )?;
                }
                emit_report(out, args, &partial)?;
            }
            Err(err.into())
        }
        Err(err) => Err(err),
    }
}

fn emit_report<W: Write>(
    out: &mut W,
    args: &ScoreArgs,
    report: &ScoringReport,
) -> Result<(), AppError> {
    if args.json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
    } else {
        render_report(out, report)?;
    }

    if let Some(path) = &args.export {
        write_results(File::create(path)?, &report.results)?;
        info!(path = %path.display(), rows = report.results.len(), "exported scoring results");
    }
    Ok(())
}

/// Score one offer file against one lead CSV using a throwaway store.
pub(crate) async fn score_files(
    args: &ScoreArgs,
    config: &AppConfig,
) -> Result<ScoringReport, AppError> {
    let offer: OfferSubmission = serde_json::from_reader(BufReader::new(File::open(&args.offer)?))?;
    let service = scoring_service(config, Arc::new(InMemoryLeadStore::default()))?;

    service.save_offer(offer)?;
    let imported = service.import_leads_csv(BufReader::new(File::open(&args.leads)?))?;
    info!(leads = imported.len(), path = %args.leads.display(), "imported leads");

    Ok(service.run_scoring().await?)
}

pub(crate) fn render_report<W: Write>(out: &mut W, report: &ScoringReport) -> io::Result<()> {
    writeln!(out, "Lead scoring report ({} leads)", report.leads_scored)?;
    for (rank, result) in report.results.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} | {} @ {} | {} | {} (rules {} + ai {})",
            rank + 1,
            result.name,
            result.role,
            result.company,
            result.intent,
            result.final_score,
            result.rule_score,
            result.ai_score
        )?;
        writeln!(out, "     {}", result.reasoning)?;
    }
    Ok(())
}
