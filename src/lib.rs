//! # forminator-sql
//!
//! Generates the `wp_frmt_form_entry_meta` INSERT statements the Forminator
//! WordPress plugin would have written for a form entry, byte for byte.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use forminator_sql::prelude::*;
//!
//! let submissions = parse_submissions(&std::fs::read_to_string("entries.json")?)?;
//! for statement in generate_multiple_entries(&submissions)? {
//!     println!("{statement}");
//! }
//! ```
//!
//! ## Stored values
//!
//! | Kind       | Example `meta_value`                          |
//! |------------|-----------------------------------------------|
//! | Literal    | `Miko Dojo`                                   |
//! | Array      | `a:1:{s:13:"calculation-2";s:6:"350.00";}`    |
//! | Options    | `Fête Finale / Final Party, T-Shirt`          |

pub mod composer;
pub mod config;
pub mod encoder;
pub mod error;
pub mod parser;
pub mod script;
pub mod sql;
pub mod submission;

pub mod prelude {
    pub use crate::composer::{Composer, Condition, FieldRule, FieldValue, FIELD_RULES};
    pub use crate::config::Settings;
    pub use crate::encoder::{serialize_array, sql_escape};
    pub use crate::error::*;
    pub use crate::parser::parse_array;
    pub use crate::script::SqlScript;
    pub use crate::sql::{MetaRow, ToSql};
    pub use crate::submission::{parse_submissions, FormSubmission, Gender};
    pub use crate::{generate_each, generate_entry_inserts, generate_multiple_entries};
}

use composer::Composer;
use error::FormResult;
use submission::FormSubmission;

/// INSERT statements for one submission, with default settings.
///
/// # Example
///
/// ```
/// use forminator_sql::prelude::*;
///
/// let json = r#"{
///     "entry_id": 668, "meta_id_start": 6031,
///     "first_name": "Lamine", "last_name": "Djama",
///     "email": "l@example.com", "phone": "+33 6", "grade": "6 Dan",
///     "dojo_name": "Miko Dojo", "birth_date": "02/03/1973", "gender": "M",
///     "stripe_transaction_id": "pi_1", "stripe_amount": "350.00",
///     "date_created": "2025-07-21 14:05:09"
/// }"#;
/// let submission = &parse_submissions(json).unwrap()[0];
/// let statements = generate_entry_inserts(submission).unwrap();
/// assert_eq!(statements.len(), 12);
/// ```
pub fn generate_entry_inserts(submission: &FormSubmission) -> FormResult<Vec<String>> {
    Composer::default().entry_inserts(submission)
}

/// Statements for every submission in order. Stops at the first invalid one.
pub fn generate_multiple_entries(submissions: &[FormSubmission]) -> FormResult<Vec<String>> {
    Composer::default().multiple_entries(submissions)
}

/// One result per submission; invalid submissions do not affect the others.
pub fn generate_each(submissions: &[FormSubmission]) -> Vec<FormResult<Vec<String>>> {
    Composer::default().each(submissions)
}
