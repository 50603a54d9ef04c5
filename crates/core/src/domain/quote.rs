use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{AddOnId, Service, ServicePackage};
use crate::domain::form::{FormData, FormUpdate};

pub const TOTAL_STEPS: u8 = 5;
pub const FIRST_STEP: u8 = 1;

const QUOTE_ID_PREFIX: &str = "Q-";
const RANDOM_TOKEN_LEN: usize = 5;
const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

impl QuoteId {
    /// `Q-<base36 millis>-<5 random base36 chars>`, always uppercase.
    pub fn generate<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Self {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let token: String = (0..RANDOM_TOKEN_LEN)
            .map(|_| char::from(BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())]))
            .collect();
        Self(format!("{QUOTE_ID_PREFIX}{}-{token}", to_base36(millis)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `value` has the canonical quote id shape.
    pub fn is_well_formed(value: &str) -> bool {
        let Some(rest) = value.strip_prefix(QUOTE_ID_PREFIX) else {
            return false;
        };
        let Some((timestamp, token)) = rest.split_once('-') else {
            return false;
        };
        let base36 = |part: &str| part.bytes().all(|byte| BASE36_DIGITS.contains(&byte));
        !timestamp.is_empty()
            && base36(timestamp)
            && token.len() == RANDOM_TOKEN_LEN
            && base36(token)
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Everything one visitor has chosen and answered so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteState {
    pub selected_service: Option<Service>,
    pub selected_package: Option<ServicePackage>,
    pub form_data: FormData,
    pub current_step: u8,
    pub quote_id: Option<QuoteId>,
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for QuoteState {
    fn default() -> Self {
        Self {
            selected_service: None,
            selected_package: None,
            form_data: FormData::default(),
            current_step: FIRST_STEP,
            quote_id: None,
            generated_at: None,
        }
    }
}

impl QuoteState {
    pub fn set_selected_service(&mut self, service: Service) {
        self.discard_quote();
        self.selected_service = Some(service);
    }

    pub fn set_selected_package(&mut self, package: ServicePackage) {
        self.discard_quote();
        self.selected_package = Some(package);
    }

    /// Any change to the selection or answers discards an issued quote.
    pub fn update_form_data(&mut self, update: FormUpdate) {
        self.discard_quote();
        self.form_data.apply(update);
    }

    pub fn toggle_add_on(&mut self, add_on_id: AddOnId) -> bool {
        self.discard_quote();
        self.form_data.toggle_add_on(add_on_id)
    }

    /// Drops the quote id and its timestamp together.
    pub fn discard_quote(&mut self) {
        self.quote_id = None;
        self.generated_at = None;
    }

    /// Unchecked jump; callers enforce bounds.
    pub fn set_current_step(&mut self, step: u8) {
        self.current_step = step;
    }

    pub fn next_step(&mut self) {
        if self.current_step < TOTAL_STEPS {
            self.current_step += 1;
        }
    }

    pub fn previous_step(&mut self) {
        if self.current_step > FIRST_STEP {
            self.current_step -= 1;
        }
    }

    /// Issues a fresh quote id. Every call yields a new id, so call it once per completed pass.
    pub fn generate_quote(&mut self) -> QuoteId {
        self.generate_quote_at(Utc::now(), &mut rand::thread_rng())
    }

    pub fn generate_quote_at<R: Rng>(
        &mut self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> QuoteId {
        let quote_id = QuoteId::generate(now, rng);
        self.quote_id = Some(quote_id.clone());
        self.generated_at = Some(now);
        quote_id
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_selection(&self) -> bool {
        self.selected_service.is_some() && self.selected_package.is_some()
    }

    /// Service and package are both set and the package belongs to the service.
    pub fn selection_is_consistent(&self) -> bool {
        match (&self.selected_service, &self.selected_package) {
            (Some(service), Some(package)) => service.owns(package),
            _ => false,
        }
    }
}
