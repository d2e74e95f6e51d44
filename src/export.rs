// CSV export of the vendor store

use crate::records::VendorRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Separator for list fields inside a single CSV cell
pub const LIST_SEPARATOR: &str = "; ";

#[derive(Debug, Serialize)]
struct VendorRow<'a> {
    submitted_at: &'a str,
    company_name: &'a str,
    product_name: &'a str,
    website: &'a str,
    category: &'a str,
    features: String,
    integrations: String,
    pricing_model: &'a str,
    contact_email: &'a str,
    phone: &'a str,
    source: &'a str,
}

impl<'a> From<&'a VendorRecord> for VendorRow<'a> {
    fn from(record: &'a VendorRecord) -> Self {
        VendorRow {
            submitted_at: &record.submitted_at,
            company_name: &record.company_name,
            product_name: &record.product_name,
            website: &record.website,
            category: &record.category,
            features: record.features.join(LIST_SEPARATOR),
            integrations: record.integrations.join(LIST_SEPARATOR),
            pricing_model: &record.pricing_model,
            contact_email: &record.contact_email,
            phone: record.phone.as_deref().unwrap_or_default(),
            source: record.source.as_deref().unwrap_or_default(),
        }
    }
}

/// Write `records` as CSV with a header row; returns the number of rows written
pub fn write_vendors_csv<W, I>(writer: W, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = VendorRecord>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    let mut count = 0;

    for record in records {
        wtr.serialize(VendorRow::from(&record))
            .context("Failed to serialize vendor row")?;
        count += 1;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(count)
}

pub fn export_vendors_csv<I>(path: &Path, records: I) -> Result<usize>
where
    I: IntoIterator<Item = VendorRecord>,
{
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_vendors_csv(file, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ManualVendorForm, VendorForm};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_csv_has_header_and_joined_lists() {
        let form = ManualVendorForm {
            vendor: VendorForm {
                company_name: "Acme".to_string(),
                product_name: "Widget".to_string(),
                website: "https://acme.example".to_string(),
                category: "LMS".to_string(),
                features: "quizzes, grading".to_string(),
                integrations: "Canvas LMS".to_string(),
                pricing_model: "Per seat".to_string(),
                contact_email: "hi@acme.example".to_string(),
            },
            phone: "555-0100".to_string(),
        };
        let record = VendorRecord::from_manual_form(
            &form,
            Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap(),
        );

        let mut out = Vec::new();
        let count = write_vendors_csv(&mut out, vec![record]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(count, 1);
        assert_eq!(
            lines.next().unwrap(),
            "submitted_at,company_name,product_name,website,category,features,integrations,pricing_model,contact_email,phone,source"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2025-02-01T08:00:00Z,Acme,Widget,https://acme.example,LMS,quizzes; grading,Canvas LMS,Per seat,hi@acme.example,555-0100,manual"
        );
    }

    #[test]
    fn test_empty_export_writes_nothing() {
        let mut out = Vec::new();
        let count = write_vendors_csv(&mut out, Vec::new()).unwrap();

        assert_eq!(count, 0);
        assert!(out.is_empty());
    }
}
