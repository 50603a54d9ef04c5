use serde_json::json;

use atelier_core::config::LoadOptions;
use atelier_core::domain::catalog::Catalog;
use atelier_core::pricing::{format_amount, CURRENCY};

use crate::commands::{load_config, CommandResult};

const COMMAND: &str = "services";

pub fn run(options: LoadOptions) -> CommandResult {
    if let Err(result) = load_config(COMMAND, options) {
        return result;
    }

    let catalog = Catalog::standard();
    let services: Vec<_> = catalog
        .services()
        .iter()
        .map(|service| {
            let packages: Vec<_> = service
                .packages
                .iter()
                .map(|package| {
                    json!({
                        "id": package.id.0,
                        "name": package.name,
                        "price": package.price,
                        "display_price": format_amount(CURRENCY, package.price),
                        "description": package.description,
                        "features": package.features,
                    })
                })
                .collect();
            json!({
                "id": service.id.0,
                "name": service.name,
                "description": service.description,
                "icon": service.icon,
                "packages": packages,
            })
        })
        .collect();
    let add_ons: Vec<_> = catalog
        .add_ons()
        .iter()
        .map(|add_on| {
            json!({
                "id": add_on.id.0,
                "name": add_on.name,
                "price": add_on.price,
                "display_price": format_amount(CURRENCY, add_on.price),
                "description": add_on.description,
            })
        })
        .collect();

    CommandResult::success_with_data(
        COMMAND,
        format!("{} services, {} add-ons", services.len(), add_ons.len()),
        json!({ "currency": CURRENCY, "services": services, "add_ons": add_ons }),
    )
}
