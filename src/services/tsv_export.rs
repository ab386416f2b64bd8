use std::{fs::File, io, path::Path};

use anyhow::Context;

use crate::domain::company::{company_id, Company, CompanyField};

pub const TSV_HEADERS: [&str; 16] = [
    "Name",
    "Rating",
    "Review Counts",
    "Website",
    "Headquarters",
    "Part of",
    "Size",
    "Founded",
    "Type",
    "Industry",
    "Revenue",
    "Competitors",
    "Logo URL",
    "Overview URL",
    "Reviews URL",
    "LinkedIn URL",
];

fn header_fields() -> Vec<CompanyField> {
    TSV_HEADERS
        .iter()
        .filter_map(|header| CompanyField::from_key(header))
        .collect()
}

/// Plain tab separated values with no quoting, absent values are written as
/// empty cells. Values must not contain tabs or newlines.
pub fn write_tsv<W: io::Write>(companies: &[Company], writer: W) -> Result<(), csv::Error> {
    let fields = header_fields();
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    wtr.write_record(TSV_HEADERS)?;
    for company in companies {
        wtr.write_record(fields.iter().map(|f| company.get(*f).unwrap_or_default()))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Empty cells come back as absent values, the id is derived from `Name`.
pub fn read_tsv<R: io::Read>(reader: R) -> Result<Vec<Company>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut companies = vec![];
    for record in rdr.records() {
        let record = record?;
        let data: Vec<(String, Option<String>)> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| {
                let value = match cell.is_empty() {
                    true => None,
                    false => Some(cell.to_string()),
                };
                (header.to_string(), value)
            })
            .collect();

        let name = data
            .iter()
            .find(|(header, _)| CompanyField::from_key(header) == Some(CompanyField::Name))
            .and_then(|(_, value)| value.as_deref())
            .unwrap_or_default();

        let mut company = Company::new(company_id(name));
        company.update_data(data);
        companies.push(company);
    }

    Ok(companies)
}

pub fn write_tsv_file(companies: &[Company], path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_tsv(companies, file).with_context(|| format!("writing {}", path.display()))?;

    log::info!("Wrote {} companies to {}", companies.len(), path.display());
    Ok(())
}

pub fn read_tsv_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<Company>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    read_tsv(file).with_context(|| format!("reading {}", path.display()))
}
