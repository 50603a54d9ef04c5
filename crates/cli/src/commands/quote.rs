use serde_json::json;

use atelier_core::config::LoadOptions;
use atelier_core::pricing::{format_amount, CURRENCY};

use crate::commands::{with_session, CommandResult};

const COMMAND: &str = "quote";

pub fn run(options: LoadOptions) -> CommandResult {
    with_session(COMMAND, options, |session, _| async move {
        let snapshot = match session.snapshot() {
            Ok(snapshot) => snapshot,
            Err(error) => return CommandResult::from_application_error(COMMAND, error),
        };

        CommandResult::success_with_data(
            COMMAND,
            format!(
                "quote {} for {}: {}",
                snapshot.quote_id,
                snapshot.business_name(),
                format_amount(CURRENCY, snapshot.total)
            ),
            json!({
                "display_total": format_amount(CURRENCY, snapshot.total),
                "snapshot": snapshot,
            }),
        )
    })
}
