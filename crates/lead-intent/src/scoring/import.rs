use std::io::{Read, Write};

use csv::StringRecord;

use super::domain::{LeadProfile, ScoreResult};

/// Failure turning an upload into lead profiles.
#[derive(Debug, thiserror::Error)]
pub enum LeadImportError {
    #[error("invalid lead CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("lead upload contained no rows")]
    Empty,
}

/// Parse a header-driven CSV of leads. Unknown columns are ignored, missing columns and
/// short rows yield empty fields, and fully blank rows are skipped.
pub fn parse_leads<R: Read>(reader: R) -> Result<Vec<LeadProfile>, LeadImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let columns = LeadColumns::from_headers(csv_reader.headers()?);
    let mut leads = Vec::new();

    for record in csv_reader.records() {
        let profile = columns.profile(&record?);
        if !profile.is_blank() {
            leads.push(profile);
        }
    }

    if leads.is_empty() {
        return Err(LeadImportError::Empty);
    }
    Ok(leads)
}

/// Header position of each profile field, `None` when the column is absent.
#[derive(Debug, Default)]
struct LeadColumns {
    name: Option<usize>,
    role: Option<usize>,
    company: Option<usize>,
    industry: Option<usize>,
    location: Option<usize>,
    linkedin_bio: Option<usize>,
}

impl LeadColumns {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut columns = Self::default();
        for (idx, header) in headers.iter().enumerate() {
            let slot = match header.to_ascii_lowercase().as_str() {
                "name" => &mut columns.name,
                "role" => &mut columns.role,
                "company" => &mut columns.company,
                "industry" => &mut columns.industry,
                "location" => &mut columns.location,
                "linkedin_bio" => &mut columns.linkedin_bio,
                _ => continue,
            };
            slot.get_or_insert(idx);
        }
        columns
    }

    fn profile(&self, record: &StringRecord) -> LeadProfile {
        let field = |column: Option<usize>| {
            column
                .and_then(|idx| record.get(idx))
                .unwrap_or_default()
                .to_string()
        };
        LeadProfile {
            name: field(self.name),
            role: field(self.role),
            company: field(self.company),
            industry: field(self.industry),
            location: field(self.location),
            linkedin_bio: field(self.linkedin_bio),
        }
    }
}

/// Write score results as CSV with a fixed header row.
pub fn write_results<W: Write>(writer: W, results: &[ScoreResult]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "name",
        "role",
        "company",
        "industry",
        "intent",
        "score",
        "reasoning",
    ])?;

    for result in results {
        let score = result.final_score.to_string();
        csv_writer.write_record([
            result.name.as_str(),
            result.role.as_str(),
            result.company.as_str(),
            result.industry.as_str(),
            result.intent.label(),
            score.as_str(),
            result.reasoning.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
