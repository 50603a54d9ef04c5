use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::AddOnId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown form field `{0}`")]
    UnknownField(String),
    #[error("`{value}` is not a valid value for {field} (expected one of: {expected})")]
    InvalidOption { field: FormField, value: String, expected: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentReadiness {
    NotStarted,
    Partial,
    MostlyReady,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetsAvailable {
    None,
    Basic,
    Good,
    Excellent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "ASAP (1-2 weeks)")]
    Asap,
    #[serde(rename = "1 month")]
    OneMonth,
    #[serde(rename = "2-3 months")]
    TwoToThreeMonths,
    #[serde(rename = "3-6 months")]
    ThreeToSixMonths,
    #[serde(rename = "Flexible")]
    Flexible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BudgetRange {
    #[serde(rename = "Under KES 30,000")]
    Under30k,
    #[serde(rename = "KES 30,000 - 50,000")]
    From30kTo50k,
    #[serde(rename = "KES 50,000 - 100,000")]
    From50kTo100k,
    #[serde(rename = "KES 100,000 - 200,000")]
    From100kTo200k,
    #[serde(rename = "KES 200,000+")]
    Over200k,
    #[serde(rename = "Not sure yet")]
    NotSure,
}

/// Fixed answer sets shared by parsing, error messages, and the review screen.
pub trait Choice: Copy + Sized + 'static {
    const ALL: &'static [Self];

    /// Value as stored and accepted on input.
    fn key(self) -> &'static str;

    fn label(self) -> &'static str {
        self.key()
    }

    fn parse_choice(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.iter().copied().find(|choice| choice.key().eq_ignore_ascii_case(value))
    }

    fn expected() -> String {
        Self::ALL.iter().map(|choice| choice.key()).collect::<Vec<_>>().join(", ")
    }
}

impl Choice for ContentReadiness {
    const ALL: &'static [Self] = &[Self::NotStarted, Self::Partial, Self::MostlyReady, Self::Complete];

    fn key(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::Partial => "partial",
            Self::MostlyReady => "mostly-ready",
            Self::Complete => "complete",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started - need help creating content",
            Self::Partial => "Partially ready - have some content",
            Self::MostlyReady => "Mostly ready - just need organization",
            Self::Complete => "Complete - all content ready to go",
        }
    }
}

impl Choice for AssetsAvailable {
    const ALL: &'static [Self] = &[Self::None, Self::Basic, Self::Good, Self::Excellent];

    fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::None => "No assets - need everything created",
            Self::Basic => "Basic assets - logo, some images",
            Self::Good => "Good assets - professional photos, branding",
            Self::Excellent => "Excellent assets - high-quality everything",
        }
    }
}

impl Choice for Timeline {
    const ALL: &'static [Self] = &[
        Self::Asap,
        Self::OneMonth,
        Self::TwoToThreeMonths,
        Self::ThreeToSixMonths,
        Self::Flexible,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Asap => "ASAP (1-2 weeks)",
            Self::OneMonth => "1 month",
            Self::TwoToThreeMonths => "2-3 months",
            Self::ThreeToSixMonths => "3-6 months",
            Self::Flexible => "Flexible",
        }
    }
}

impl Choice for BudgetRange {
    const ALL: &'static [Self] = &[
        Self::Under30k,
        Self::From30kTo50k,
        Self::From50kTo100k,
        Self::From100kTo200k,
        Self::Over200k,
        Self::NotSure,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Under30k => "Under KES 30,000",
            Self::From30kTo50k => "KES 30,000 - 50,000",
            Self::From50kTo100k => "KES 50,000 - 100,000",
            Self::From100kTo200k => "KES 100,000 - 200,000",
            Self::Over200k => "KES 200,000+",
            Self::NotSure => "Not sure yet",
        }
    }
}

/// Questionnaire answers. Every field stays optional until its owning step validates it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub business_name: Option<String>,
    pub business_type: Option<String>,
    pub industry: Option<String>,
    pub contact_email: Option<String>,
    pub phone_number: Option<String>,
    pub content_readiness: Option<ContentReadiness>,
    pub assets_available: Option<AssetsAvailable>,
    pub timeline: Option<Timeline>,
    pub budget: Option<BudgetRange>,
    pub project_goals: Option<String>,
    pub target_audience: Option<String>,
    pub add_ons: BTreeSet<AddOnId>,
    pub additional_notes: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    BusinessName,
    BusinessType,
    Industry,
    ContactEmail,
    PhoneNumber,
    ContentReadiness,
    AssetsAvailable,
    Timeline,
    Budget,
    ProjectGoals,
    TargetAudience,
    AddOns,
    AdditionalNotes,
}

impl FormField {
    pub const ALL: [Self; 13] = [
        Self::BusinessName,
        Self::BusinessType,
        Self::Industry,
        Self::ContactEmail,
        Self::PhoneNumber,
        Self::ContentReadiness,
        Self::AssetsAvailable,
        Self::Timeline,
        Self::Budget,
        Self::ProjectGoals,
        Self::TargetAudience,
        Self::AddOns,
        Self::AdditionalNotes,
    ];

    /// Key used in the persisted record and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::BusinessName => "businessName",
            Self::BusinessType => "businessType",
            Self::Industry => "industry",
            Self::ContactEmail => "contactEmail",
            Self::PhoneNumber => "phoneNumber",
            Self::ContentReadiness => "contentReadiness",
            Self::AssetsAvailable => "assetsAvailable",
            Self::Timeline => "timeline",
            Self::Budget => "budget",
            Self::ProjectGoals => "projectGoals",
            Self::TargetAudience => "targetAudience",
            Self::AddOns => "addOns",
            Self::AdditionalNotes => "additionalNotes",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            value.trim().chars().filter(|ch| *ch != '_' && *ch != '-').collect();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.key().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| FormError::UnknownField(value.to_string()))
    }
}

/// One typed field assignment. `None` clears the field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormUpdate {
    BusinessName(Option<String>),
    BusinessType(Option<String>),
    Industry(Option<String>),
    ContactEmail(Option<String>),
    PhoneNumber(Option<String>),
    ContentReadiness(Option<ContentReadiness>),
    AssetsAvailable(Option<AssetsAvailable>),
    Timeline(Option<Timeline>),
    Budget(Option<BudgetRange>),
    ProjectGoals(Option<String>),
    TargetAudience(Option<String>),
    AddOns(BTreeSet<AddOnId>),
    AdditionalNotes(Option<String>),
}

impl FormUpdate {
    /// Parses a raw answer for `field`. Blank input clears the field; add-ons are comma separated.
    pub fn parse(field: FormField, raw: &str) -> Result<Self, FormError> {
        let text = non_blank(raw);
        let update = match field {
            FormField::BusinessName => Self::BusinessName(text),
            FormField::BusinessType => Self::BusinessType(text),
            FormField::Industry => Self::Industry(text),
            FormField::ContactEmail => Self::ContactEmail(text),
            FormField::PhoneNumber => Self::PhoneNumber(text),
            FormField::ContentReadiness => Self::ContentReadiness(parse_choice(field, raw)?),
            FormField::AssetsAvailable => Self::AssetsAvailable(parse_choice(field, raw)?),
            FormField::Timeline => Self::Timeline(parse_choice(field, raw)?),
            FormField::Budget => Self::Budget(parse_choice(field, raw)?),
            FormField::ProjectGoals => Self::ProjectGoals(text),
            FormField::TargetAudience => Self::TargetAudience(text),
            FormField::AddOns => Self::AddOns(
                raw.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(AddOnId::new)
                    .collect(),
            ),
            FormField::AdditionalNotes => Self::AdditionalNotes(text),
        };
        Ok(update)
    }

    pub fn field(&self) -> FormField {
        match self {
            Self::BusinessName(_) => FormField::BusinessName,
            Self::BusinessType(_) => FormField::BusinessType,
            Self::Industry(_) => FormField::Industry,
            Self::ContactEmail(_) => FormField::ContactEmail,
            Self::PhoneNumber(_) => FormField::PhoneNumber,
            Self::ContentReadiness(_) => FormField::ContentReadiness,
            Self::AssetsAvailable(_) => FormField::AssetsAvailable,
            Self::Timeline(_) => FormField::Timeline,
            Self::Budget(_) => FormField::Budget,
            Self::ProjectGoals(_) => FormField::ProjectGoals,
            Self::TargetAudience(_) => FormField::TargetAudience,
            Self::AddOns(_) => FormField::AddOns,
            Self::AdditionalNotes(_) => FormField::AdditionalNotes,
        }
    }
}

impl FormData {
    /// Merges a single field, leaving the others untouched.
    pub fn apply(&mut self, update: FormUpdate) {
        match update {
            FormUpdate::BusinessName(value) => self.business_name = value,
            FormUpdate::BusinessType(value) => self.business_type = value,
            FormUpdate::Industry(value) => self.industry = value,
            FormUpdate::ContactEmail(value) => self.contact_email = value,
            FormUpdate::PhoneNumber(value) => self.phone_number = value,
            FormUpdate::ContentReadiness(value) => self.content_readiness = value,
            FormUpdate::AssetsAvailable(value) => self.assets_available = value,
            FormUpdate::Timeline(value) => self.timeline = value,
            FormUpdate::Budget(value) => self.budget = value,
            FormUpdate::ProjectGoals(value) => self.project_goals = value,
            FormUpdate::TargetAudience(value) => self.target_audience = value,
            FormUpdate::AddOns(value) => self.add_ons = value,
            FormUpdate::AdditionalNotes(value) => self.additional_notes = value,
        }
    }

    /// Adds the add-on when absent, removes it when present. Returns whether it is now selected.
    pub fn toggle_add_on(&mut self, add_on_id: AddOnId) -> bool {
        if self.add_ons.remove(&add_on_id) {
            false
        } else {
            self.add_ons.insert(add_on_id);
            true
        }
    }

    /// Display form of a field's current answer, `None` when unanswered.
    pub fn display_value(&self, field: FormField) -> Option<String> {
        match field {
            FormField::BusinessName => self.business_name.clone(),
            FormField::BusinessType => self.business_type.clone(),
            FormField::Industry => self.industry.clone(),
            FormField::ContactEmail => self.contact_email.clone(),
            FormField::PhoneNumber => self.phone_number.clone(),
            FormField::ContentReadiness => self.content_readiness.map(|v| v.label().to_string()),
            FormField::AssetsAvailable => self.assets_available.map(|v| v.label().to_string()),
            FormField::Timeline => self.timeline.map(|v| v.label().to_string()),
            FormField::Budget => self.budget.map(|v| v.label().to_string()),
            FormField::ProjectGoals => self.project_goals.clone(),
            FormField::TargetAudience => self.target_audience.clone(),
            FormField::AddOns => (!self.add_ons.is_empty()).then(|| {
                self.add_ons.iter().map(|id| id.0.as_str()).collect::<Vec<_>>().join(", ")
            }),
            FormField::AdditionalNotes => self.additional_notes.clone(),
        }
    }
}

fn non_blank(raw: &str) -> Option<String> {
    (!raw.trim().is_empty()).then(|| raw.to_string())
}

fn parse_choice<C: Choice>(field: FormField, raw: &str) -> Result<Option<C>, FormError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    C::parse_choice(raw).map(Some).ok_or_else(|| FormError::InvalidOption {
        field,
        value: raw.to_string(),
        expected: C::expected(),
    })
}
