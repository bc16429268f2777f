//! Entry composer.
//!
//! Turns one [`FormSubmission`] into the ordered meta rows Forminator writes
//! for it. The field layout lives in [`FIELD_RULES`]: each rule names a meta
//! key, the condition under which it is emitted, and how its value is built.
//! Rules are applied in table order; only emitted rows consume a meta id.

use chrono::{Local, NaiveDateTime};

use crate::config::{NO_FEE, Settings};
use crate::encoder::serialize_array;
use crate::error::{FormError, FormResult};
use crate::sql::{MetaRow, TIMESTAMP_FORMAT};
use crate::submission::{FormSubmission, Gender};

/// `checkbox-2` option for the final party.
pub const PARTY_OPTION: &str = "Fête Finale / Final Party";

/// `checkbox-2` option for the t-shirt.
pub const T_SHIRT_OPTION: &str = "T-Shirt";

/// Literal stored by always-checked selects (`select-4`, `select-5`).
pub const CHECKED: &str = "1";

/// Submission date format stored in `hidden-2`.
pub const SUBMISSION_DATE_FORMAT: &str = "%d/%m/%Y";

/// Value of one meta row before SQL rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Plain text stored as-is.
    Literal(String),
    /// Ordered pairs stored as a serialized array.
    Array(Vec<(&'static str, String)>),
}

impl FieldValue {
    /// Text stored in `meta_value`, before escaping.
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Literal(s) => s,
            FieldValue::Array(pairs) => serialize_array(pairs),
        }
    }
}

/// When a rule emits its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Every submission.
    Always,
    /// A federation licence number was given.
    Licence,
    /// A t-shirt was ordered.
    TShirt,
    /// A t-shirt was ordered with a size.
    TShirtWithSize,
    /// The party or a t-shirt was selected.
    PartyOrTShirt,
}

impl Condition {
    /// Whether the row is emitted for this submission.
    pub fn holds(self, submission: &FormSubmission) -> bool {
        match self {
            Condition::Always => true,
            Condition::Licence => submission.licence().is_some(),
            Condition::TShirt => submission.t_shirt,
            Condition::TShirtWithSize => submission.shirt_size().is_some(),
            Condition::PartyOrTShirt => submission.party || submission.t_shirt,
        }
    }

    /// Label used in the rule listing.
    pub fn describe(self) -> &'static str {
        match self {
            Condition::Always => "always",
            Condition::Licence => "ffst_id given",
            Condition::TShirt => "t_shirt",
            Condition::TShirtWithSize => "t_shirt and size given",
            Condition::PartyOrTShirt => "party or t_shirt",
        }
    }
}

/// Everything a value builder may read.
#[derive(Debug, Clone, Copy)]
pub struct EntryContext<'a> {
    pub submission: &'a FormSubmission,
    pub settings: &'a Settings,
    pub gender: Gender,
    pub created: NaiveDateTime,
}

/// One row of the field layout.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub key: &'static str,
    pub when: Condition,
    /// Short description of the stored value.
    pub shape: &'static str,
    build: fn(&EntryContext<'_>) -> FieldValue,
}

impl FieldRule {
    /// Build this rule's value.
    pub fn value(&self, ctx: &EntryContext<'_>) -> FieldValue {
        (self.build)(ctx)
    }
}

/// Forminator field layout, in emission order.
pub static FIELD_RULES: &[FieldRule] = &[
    FieldRule { key: "hidden-1", when: Condition::Always, shape: "entry id", build: entry_id },
    FieldRule { key: "hidden-2", when: Condition::Always, shape: "submission date DD/MM/YYYY", build: submission_date },
    FieldRule { key: "calculation-1", when: Condition::Always, shape: "a:1 {calculation-1: t-shirt fee or 0}", build: t_shirt_fee },
    FieldRule { key: "calculation-2", when: Condition::Always, shape: "a:1 {calculation-2: stripe_amount}", build: total_amount },
    FieldRule { key: "name-1", when: Condition::Always, shape: "a:2 {first-name, last-name}", build: name },
    FieldRule { key: "email-1", when: Condition::Always, shape: "email", build: email },
    FieldRule { key: "phone-1", when: Condition::Always, shape: "phone", build: phone },
    FieldRule { key: "select-1", when: Condition::Always, shape: "grade", build: grade },
    FieldRule { key: "text-1", when: Condition::Licence, shape: "ffst_id", build: licence },
    FieldRule { key: "text-3", when: Condition::Always, shape: "dojo_name", build: dojo_name },
    FieldRule { key: "date-1", when: Condition::Always, shape: "birth_date", build: birth_date },
    FieldRule { key: "select-2", when: Condition::TShirt, shape: "gender label", build: gender },
    FieldRule { key: "select-3", when: Condition::TShirtWithSize, shape: "t_shirt_size", build: shirt_size },
    FieldRule { key: "select-4", when: Condition::TShirt, shape: "\"1\"", build: checked },
    FieldRule { key: "select-5", when: Condition::Always, shape: "\"1\"", build: checked },
    FieldRule { key: "checkbox-2", when: Condition::PartyOrTShirt, shape: "selected options", build: options },
    FieldRule { key: "stripe-ocs-1", when: Condition::Always, shape: "a:4 {transaction_id, amount, currency, status}", build: payment },
];

fn literal(text: &str) -> FieldValue {
    FieldValue::Literal(text.to_string())
}

fn entry_id(ctx: &EntryContext<'_>) -> FieldValue {
    FieldValue::Literal(ctx.submission.entry_id.to_string())
}

fn submission_date(ctx: &EntryContext<'_>) -> FieldValue {
    FieldValue::Literal(ctx.created.format(SUBMISSION_DATE_FORMAT).to_string())
}

fn t_shirt_fee(ctx: &EntryContext<'_>) -> FieldValue {
    let fee = if ctx.submission.t_shirt {
        ctx.settings.t_shirt_fee.clone()
    } else {
        NO_FEE.to_string()
    };
    FieldValue::Array(vec![("calculation-1", fee)])
}

fn total_amount(ctx: &EntryContext<'_>) -> FieldValue {
    FieldValue::Array(vec![("calculation-2", ctx.submission.stripe_amount.clone())])
}

fn name(ctx: &EntryContext<'_>) -> FieldValue {
    FieldValue::Array(vec![
        ("first-name", ctx.submission.first_name.clone()),
        ("last-name", ctx.submission.last_name.clone()),
    ])
}

fn email(ctx: &EntryContext<'_>) -> FieldValue {
    literal(&ctx.submission.email)
}

fn phone(ctx: &EntryContext<'_>) -> FieldValue {
    literal(&ctx.submission.phone)
}

fn grade(ctx: &EntryContext<'_>) -> FieldValue {
    literal(&ctx.submission.grade)
}

fn licence(ctx: &EntryContext<'_>) -> FieldValue {
    literal(ctx.submission.licence().unwrap_or_default())
}

fn dojo_name(ctx: &EntryContext<'_>) -> FieldValue {
    literal(&ctx.submission.dojo_name)
}

fn birth_date(ctx: &EntryContext<'_>) -> FieldValue {
    literal(&ctx.submission.birth_date)
}

fn gender(ctx: &EntryContext<'_>) -> FieldValue {
    literal(ctx.gender.label())
}

fn shirt_size(ctx: &EntryContext<'_>) -> FieldValue {
    literal(ctx.submission.shirt_size().unwrap_or_default())
}

fn checked(_: &EntryContext<'_>) -> FieldValue {
    literal(CHECKED)
}

fn options(ctx: &EntryContext<'_>) -> FieldValue {
    let mut selected = Vec::with_capacity(2);
    if ctx.submission.party {
        selected.push(PARTY_OPTION);
    }
    if ctx.submission.t_shirt {
        selected.push(T_SHIRT_OPTION);
    }
    FieldValue::Literal(selected.join(", "))
}

fn payment(ctx: &EntryContext<'_>) -> FieldValue {
    let s = ctx.submission;
    FieldValue::Array(vec![
        ("transaction_id", s.stripe_transaction_id.clone()),
        ("amount", s.stripe_amount.clone()),
        ("currency", s.currency.clone()),
        ("status", ctx.settings.payment_status.clone()),
    ])
}

/// Builds meta rows and INSERT statements for submissions.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    settings: Settings,
}

impl Composer {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Compose the rows of one submission.
    ///
    /// The current local time stands in for a missing `date_created`; it is
    /// read once and shared by every row.
    pub fn compose(&self, submission: &FormSubmission) -> FormResult<Vec<MetaRow>> {
        self.compose_at(submission, Local::now().naive_local())
    }

    /// Compose with an explicit fallback for a missing `date_created`.
    pub fn compose_at(
        &self,
        submission: &FormSubmission,
        now: NaiveDateTime,
    ) -> FormResult<Vec<MetaRow>> {
        // All checks run before any row exists
        submission.validate()?;
        let gender = Gender::parse(submission.entry_id, &submission.gender)?;
        let created = match submission.date_created.as_deref() {
            Some(value) => parse_timestamp(submission.entry_id, value)?,
            None => now,
        };

        let ctx = EntryContext {
            submission,
            settings: &self.settings,
            gender,
            created,
        };
        let date_created = created.format(TIMESTAMP_FORMAT).to_string();

        let emitted: Vec<&FieldRule> = FIELD_RULES
            .iter()
            .filter(|r| r.when.holds(submission))
            .collect();
        let last = emitted.len().saturating_sub(1) as u64;
        if submission.meta_id_start.checked_add(last).is_none() {
            return Err(FormError::MetaIdOverflow {
                entry_id: submission.entry_id,
                start: submission.meta_id_start,
                rows: emitted.len(),
            });
        }

        let mut rows = Vec::with_capacity(emitted.len());
        for (meta_id, rule) in (submission.meta_id_start..=u64::MAX).zip(emitted) {
            tracing::debug!(meta_id, meta_key = rule.key, "emit");
            rows.push(MetaRow::new(
                meta_id,
                submission.entry_id,
                rule.key,
                rule.value(&ctx).into_text(),
                date_created.clone(),
            ));
        }

        tracing::info!(entry_id = submission.entry_id, rows = rows.len(), "composed entry");
        Ok(rows)
    }

    /// INSERT statements for one submission.
    pub fn entry_inserts(&self, submission: &FormSubmission) -> FormResult<Vec<String>> {
        let rows = self.compose(submission)?;
        Ok(self.render(&rows))
    }

    /// INSERT statements for one submission with an explicit clock.
    pub fn entry_inserts_at(
        &self,
        submission: &FormSubmission,
        now: NaiveDateTime,
    ) -> FormResult<Vec<String>> {
        let rows = self.compose_at(submission, now)?;
        Ok(self.render(&rows))
    }

    /// Statements for all submissions, in input order.
    ///
    /// Fail-fast: the first invalid submission aborts the batch and no
    /// statements are returned.
    pub fn multiple_entries(&self, submissions: &[FormSubmission]) -> FormResult<Vec<String>> {
        let mut all = Vec::new();
        for submission in submissions {
            all.extend(self.entry_inserts(submission)?);
        }
        Ok(all)
    }

    /// One result per submission, in input order. Failures do not stop the
    /// remaining submissions.
    pub fn each(&self, submissions: &[FormSubmission]) -> Vec<FormResult<Vec<String>>> {
        submissions
            .iter()
            .map(|submission| {
                let result = self.entry_inserts(submission);
                if let Err(e) = &result {
                    tracing::warn!(entry_id = submission.entry_id, "skipping entry: {}", e);
                }
                result
            })
            .collect()
    }

    fn render(&self, rows: &[MetaRow]) -> Vec<String> {
        rows.iter()
            .map(|row| row.insert_into(&self.settings.table_name))
            .collect()
    }
}

fn parse_timestamp(entry_id: u64, value: &str) -> FormResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| {
        FormError::InvalidTimestamp {
            entry_id,
            value: value.to_string(),
        }
    })
}
