use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{AddOnId, Catalog, ServicePackage};

/// All prices are whole Kenyan shillings.
pub const CURRENCY: &str = "KES";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLine {
    pub label: String,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub package: PriceLine,
    pub add_ons: Vec<PriceLine>,
    /// Selected ids missing from the catalog; priced at zero.
    pub ignored_add_ons: Vec<AddOnId>,
    pub add_ons_total: u64,
    pub total: u64,
}

/// `package.price` plus the price of every selected add-on found in the catalog.
pub fn compute_total(
    package: &ServicePackage,
    add_on_ids: &BTreeSet<AddOnId>,
    catalog: &Catalog,
) -> u64 {
    add_on_ids
        .iter()
        .filter_map(|id| catalog.find_add_on(id))
        .fold(package.price, |total, add_on| total.saturating_add(add_on.price))
}

pub fn price_breakdown(
    package: &ServicePackage,
    add_on_ids: &BTreeSet<AddOnId>,
    catalog: &Catalog,
) -> PriceBreakdown {
    let mut add_ons = Vec::new();
    let mut ignored_add_ons = Vec::new();

    for id in add_on_ids {
        match catalog.find_add_on(id) {
            Some(add_on) => {
                add_ons.push(PriceLine { label: add_on.name.clone(), amount: add_on.price })
            }
            None => ignored_add_ons.push(id.clone()),
        }
    }

    let add_ons_total =
        add_ons.iter().fold(0_u64, |total, line| total.saturating_add(line.amount));

    PriceBreakdown {
        package: PriceLine { label: package.name.clone(), amount: package.price },
        add_ons,
        ignored_add_ons,
        add_ons_total,
        total: compute_total(package, add_on_ids, catalog),
    }
}

/// `KES 40,000` style rendering: whole units, comma grouped.
pub fn format_amount(currency: &str, amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{currency} {grouped}")
}
