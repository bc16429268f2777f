//! Form submission input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_CURRENCY;
use crate::error::{FormError, FormResult};

/// One form entry's field values and options.
///
/// Required text fields default to empty when absent from JSON input so
/// that validation can name the missing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub entry_id: u64,
    pub meta_id_start: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub dojo_name: String,
    /// `DD/MM/YYYY`, passed through as written.
    #[serde(default)]
    pub birth_date: String,
    /// `M` or `F`.
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub stripe_transaction_id: String,
    /// Decimal string such as `375.00`.
    #[serde(default)]
    pub stripe_amount: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub party: bool,
    #[serde(default)]
    pub t_shirt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_shirt_size: Option<String>,
    /// Federation licence number, stored in `text-1` when given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffst_id: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS`; generation time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl FormSubmission {
    /// Check every unconditionally required field is present.
    pub fn validate(&self) -> FormResult<()> {
        let required: [(&'static str, &str); 11] = [
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("grade", self.grade.as_str()),
            ("dojo_name", self.dojo_name.as_str()),
            ("birth_date", self.birth_date.as_str()),
            ("gender", self.gender.as_str()),
            ("stripe_transaction_id", self.stripe_transaction_id.as_str()),
            ("stripe_amount", self.stripe_amount.as_str()),
            ("currency", self.currency.as_str()),
        ];

        if let Some(&(field, _)) = required.iter().find(|(_, v)| v.is_empty()) {
            return Err(FormError::missing(self.entry_id, field));
        }
        Gender::parse(self.entry_id, &self.gender)?;
        Ok(())
    }

    /// Federation licence number, when non-empty.
    pub fn licence(&self) -> Option<&str> {
        self.ffst_id.as_deref().filter(|s| !s.is_empty())
    }

    /// T-shirt size, only when a t-shirt is ordered and a size was given.
    pub fn shirt_size(&self) -> Option<&str> {
        if !self.t_shirt {
            return None;
        }
        self.t_shirt_size.as_deref().filter(|s| !s.is_empty())
    }
}

/// Gender codes accepted on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Map the submitted code. Anything but `M` or `F` is rejected.
    pub fn parse(entry_id: u64, code: &str) -> FormResult<Self> {
        match code {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            other => Err(FormError::InvalidGender {
                entry_id,
                code: other.to_string(),
            }),
        }
    }

    /// Bilingual option label stored by the form.
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Masculin / Male",
            Gender::Female => "Féminin / Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Submission file contents: one object or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SubmissionInput {
    Many(Vec<FormSubmission>),
    One(Box<FormSubmission>),
}

/// Parse submissions from JSON text.
pub fn parse_submissions(json: &str) -> FormResult<Vec<FormSubmission>> {
    let input: SubmissionInput = serde_json::from_str(json)?;
    Ok(match input {
        SubmissionInput::Many(all) => all,
        SubmissionInput::One(one) => vec![*one],
    })
}
