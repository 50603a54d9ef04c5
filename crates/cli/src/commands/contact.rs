use serde_json::json;

use atelier_core::config::LoadOptions;
use atelier_core::contact::{build_mailto_link, chat_link_for};

use crate::commands::{with_session, CommandResult};
use crate::ContactChannel;

const COMMAND: &str = "contact";

pub fn run(options: LoadOptions, channel: ContactChannel) -> CommandResult {
    with_session(COMMAND, options, |session, config| async move {
        let snapshot = match session.snapshot() {
            Ok(snapshot) => snapshot,
            Err(error) => return CommandResult::from_application_error(COMMAND, error),
        };

        let (channel_name, link) = match channel {
            ContactChannel::Whatsapp => {
                ("whatsapp", chat_link_for(&config.contact.whatsapp_number, &snapshot))
            }
            ContactChannel::Email => ("email", build_mailto_link(&config.contact.email, &snapshot)),
        };
        tracing::info!(
            event_name = "contact.link_built",
            channel = channel_name,
            quote_id = %snapshot.quote_id,
            "contact link built"
        );

        CommandResult::success_with_data(
            COMMAND,
            link.clone(),
            json!({ "channel": channel_name, "link": link, "quote_id": snapshot.quote_id }),
        )
    })
}
