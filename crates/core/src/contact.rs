use url::form_urlencoded;

use crate::pricing::{format_amount, CURRENCY};
use crate::snapshot::QuoteSnapshot;

const CHAT_BASE_URL: &str = "https://wa.me/";

/// Percent-encodes text for a URL query value, spaces as `%20`.
pub fn encode_component(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect::<String>().replace('+', "%20")
}

/// Prefilled chat message, already encoded for use as a link query value.
pub fn format_chat_message(
    service_name: &str,
    package_name: &str,
    total: u64,
    business_name: &str,
    contact_email: &str,
) -> String {
    let message = format!(
        "Hi! I'm interested in your creative services.\n\n\
         Service: {service_name}\n\
         Package: {package_name}\n\
         Total: {}\n\
         Business: {business_name}\n\
         Email: {contact_email}\n\n\
         I'd like to discuss this quote and proceed with the project. \
         When can we schedule a consultation?",
        format_amount(CURRENCY, total)
    );
    encode_component(&message)
}

/// Chat link for `destination`; anything but digits is dropped from the number.
pub fn build_chat_link(destination: &str, encoded_message: &str) -> String {
    let number: String = destination.chars().filter(char::is_ascii_digit).collect();
    format!("{CHAT_BASE_URL}{number}?text={encoded_message}")
}

pub fn chat_link_for(destination: &str, snapshot: &QuoteSnapshot) -> String {
    let message = format_chat_message(
        &snapshot.service.name,
        &snapshot.package.name,
        snapshot.total,
        snapshot.business_name(),
        snapshot.contact_email(),
    );
    build_chat_link(destination, &message)
}

pub fn build_mailto_link(address: &str, snapshot: &QuoteSnapshot) -> String {
    let subject = format!("Quote Inquiry - {}", snapshot.service.name);
    let body = format!(
        "Hi,\n\n\
         I'm interested in proceeding with the quote for:\n\n\
         Service: {}\n\
         Package: {}\n\
         Total: {}\n\
         Quote ID: {}\n\n\
         Please let me know the next steps.\n\n\
         Best regards,\n\
         {}\n\
         {}",
        snapshot.service.name,
        snapshot.package.name,
        format_amount(CURRENCY, snapshot.total),
        snapshot.quote_id,
        snapshot.business_name(),
        snapshot.contact_email(),
    );
    format!(
        "mailto:{address}?subject={}&body={}",
        encode_component(&subject),
        encode_component(&body)
    )
}
