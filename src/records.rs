// Record types for vendor and faculty submissions
// Constructors apply trimming and list splitting once; stored records never change

use crate::error::{DirectoryError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Provenance tag for vendors entered through the manual form
pub const SOURCE_MANUAL: &str = "manual";

// ============================================================================
// FORM INPUT (raw, as posted)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VendorForm {
    pub company_name: String,
    pub product_name: String,
    pub website: String,
    pub category: String,
    pub features: String,
    pub integrations: String,
    pub pricing_model: String,
    pub contact_email: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ManualVendorForm {
    #[serde(flatten)]
    pub vendor: VendorForm,
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FacultyForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub courses: String,
    pub tools: String,
}

// ============================================================================
// VENDOR RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub submitted_at: String,
    pub company_name: String,
    pub product_name: String,
    pub website: String,
    pub category: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub integrations: Vec<String>,
    pub pricing_model: String,
    pub contact_email: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Where the record came from (e.g. "manual")
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl VendorRecord {
    pub fn from_form(form: &VendorForm, submitted_at: DateTime<Utc>) -> Self {
        VendorRecord {
            submitted_at: timestamp(submitted_at),
            company_name: form.company_name.trim().to_string(),
            product_name: form.product_name.trim().to_string(),
            website: form.website.trim().to_string(),
            category: form.category.trim().to_string(),
            features: split_list(&form.features, ','),
            integrations: split_list(&form.integrations, ','),
            pricing_model: form.pricing_model.trim().to_string(),
            contact_email: form.contact_email.trim().to_string(),
            phone: None,
            source: None,
        }
    }

    /// Manual entries carry a phone number and the `manual` source tag
    pub fn from_manual_form(form: &ManualVendorForm, submitted_at: DateTime<Utc>) -> Self {
        let mut record = VendorRecord::from_form(&form.vendor, submitted_at);
        record.phone = Some(form.phone.trim().to_string());
        record.source = Some(SOURCE_MANUAL.to_string());
        record
    }

    /// Case-insensitive substring test against any integration
    pub fn integrates_with(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.integrations
            .iter()
            .any(|integration| integration.to_lowercase().contains(&needle))
    }
}

// ============================================================================
// FACULTY RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyRecord {
    pub submitted_at: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl FacultyRecord {
    /// Fails unless the email belongs to a `.edu` domain
    pub fn from_form(form: &FacultyForm, submitted_at: DateTime<Utc>) -> Result<Self> {
        let email = form.email.trim();
        validate_edu_email(email)?;

        Ok(FacultyRecord {
            submitted_at: timestamp(submitted_at),
            name: form.name.trim().to_string(),
            email: email.to_string(),
            phone: form.phone.trim().to_string(),
            courses: split_courses(&form.courses),
            tools: split_list(&form.tools, ','),
        })
    }
}

pub fn validate_edu_email(email: &str) -> Result<()> {
    let domain = match email.trim().rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => domain,
        _ => {
            return Err(DirectoryError::validation(
                "email",
                format!("'{}' is not a valid email address", email),
            ))
        }
    };

    if !domain.to_lowercase().ends_with(".edu") {
        return Err(DirectoryError::validation(
            "email",
            "faculty submissions require an institutional .edu email address",
        ));
    }

    Ok(())
}

// ============================================================================
// NORMALIZATION HELPERS
// ============================================================================

/// UTC timestamp as stored in `submitted_at`, e.g. `2025-01-15T09:30:00Z`
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Split on `delimiter`, trim each entry and drop the empty ones
pub fn split_list(raw: &str, delimiter: char) -> Vec<String> {
    raw.split(delimiter)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Courses are `;`-separated when any `;` appears, comma-separated otherwise.
/// Mixed input such as "A, B; C" splits only on `;`.
pub fn split_courses(raw: &str) -> Vec<String> {
    if raw.contains(';') {
        split_list(raw, ';')
    } else {
        split_list(raw, ',')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap()
    }

    fn sample_vendor_form() -> VendorForm {
        VendorForm {
            company_name: "  Acme Learning ".to_string(),
            product_name: "Quizzly".to_string(),
            website: " https://acme.example ".to_string(),
            category: "Assessment".to_string(),
            features: "quizzes, , analytics ,grading".to_string(),
            integrations: "Canvas LMS, Google Classroom".to_string(),
            pricing_model: " Freemium ".to_string(),
            contact_email: "sales@acme.example".to_string(),
        }
    }

    #[test]
    fn test_vendor_from_form_trims_and_splits() {
        let record = VendorRecord::from_form(&sample_vendor_form(), fixed_time());

        assert_eq!(record.submitted_at, "2025-01-15T09:30:00Z");
        assert_eq!(record.company_name, "Acme Learning");
        assert_eq!(record.website, "https://acme.example");
        assert_eq!(record.features, vec!["quizzes", "analytics", "grading"]);
        assert_eq!(record.integrations, vec!["Canvas LMS", "Google Classroom"]);
        assert_eq!(record.pricing_model, "Freemium");
        assert_eq!(record.phone, None);
        assert_eq!(record.source, None);
    }

    #[test]
    fn test_manual_vendor_is_tagged() {
        let form = ManualVendorForm {
            vendor: sample_vendor_form(),
            phone: " 555-0100 ".to_string(),
        };
        let record = VendorRecord::from_manual_form(&form, fixed_time());

        assert_eq!(record.phone.as_deref(), Some("555-0100"));
        assert_eq!(record.source.as_deref(), Some(SOURCE_MANUAL));
    }

    #[test]
    fn test_optional_fields_are_omitted_from_json() {
        let record = VendorRecord::from_form(&sample_vendor_form(), fixed_time());
        let json = serde_json::to_string(&record).unwrap();

        assert!(!json.contains("\"source\""));
        assert!(!json.contains("\"phone\""));
    }

    #[test]
    fn test_integrates_with_is_case_insensitive_substring() {
        let record = VendorRecord::from_form(&sample_vendor_form(), fixed_time());

        assert!(record.integrates_with("canvas"));
        assert!(record.integrates_with("CLASSROOM"));
        assert!(!record.integrates_with("moodle"));
    }

    #[test]
    fn test_faculty_requires_edu_email() {
        let mut form = FacultyForm {
            name: "Dr. Rivera".to_string(),
            email: "prof@school.edu".to_string(),
            phone: "555-0101".to_string(),
            courses: "BIO 101; BIO 202".to_string(),
            tools: "Canvas, Zoom".to_string(),
        };

        let record = FacultyRecord::from_form(&form, fixed_time()).unwrap();
        assert_eq!(record.courses, vec!["BIO 101", "BIO 202"]);
        assert_eq!(record.tools, vec!["Canvas", "Zoom"]);

        form.email = "prof@gmail.com".to_string();
        let err = FacultyRecord::from_form(&form, fixed_time()).unwrap_err();
        assert!(matches!(err, DirectoryError::Validation { .. }));
    }

    #[test]
    fn test_edu_email_rules() {
        assert!(validate_edu_email("prof@cs.state.EDU").is_ok());
        assert!(validate_edu_email("prof@school.edu.au").is_err());
        assert!(validate_edu_email("school.edu").is_err());
        assert!(validate_edu_email("@school.edu").is_err());
        assert!(validate_edu_email("prof@").is_err());
    }

    #[test]
    fn test_course_delimiter_heuristic() {
        assert_eq!(split_courses("Algebra, Geometry"), vec!["Algebra", "Geometry"]);
        assert_eq!(split_courses("Algebra; Geometry"), vec!["Algebra", "Geometry"]);
        // semicolon wins for mixed input
        assert_eq!(split_courses("A, B; C"), vec!["A, B", "C"]);
        assert!(split_courses("  ").is_empty());
    }
}
