use std::sync::OnceLock;

use regex::Regex;

static EMAIL: OnceLock<Regex> = OnceLock::new();
static MOBILE_NUMBER: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

fn mobile_number_pattern() -> &'static Regex {
    MOBILE_NUMBER.get_or_init(|| {
        Regex::new(r"^(\+254|0)[17][0-9]{8}$").expect("mobile pattern is a valid regex")
    })
}

/// `local@domain.tld` with no whitespace anywhere.
pub fn validate_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Kenyan mobile numbers: `+254` or `0`, then `7` or `1`, then eight digits. Whitespace is ignored.
pub fn validate_phone_number(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|ch| !ch.is_whitespace()).collect();
    mobile_number_pattern().is_match(&compact)
}

#[cfg(test)]
mod tests {
    use super::{validate_email, validate_phone_number};

    #[test]
    fn accepts_plain_addresses() {
        for email in ["x@y.z", "hello@creativeagency.co.ke", "first.last+tag@studio.io"] {
            assert!(validate_email(email), "{email} should be accepted");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in
            ["", "plainaddress", "no-domain@", "user@nodot", "@example.com", "a b@c.de", "a@b .cd"]
        {
            assert!(!validate_email(email), "{email:?} should be rejected");
        }
    }

    #[test]
    fn accepts_regional_mobile_numbers() {
        for phone in ["+254712345678", "0712345678", "0112345678", "+254 112 345 678", " 0712 345 678 "]
        {
            assert!(validate_phone_number(phone), "{phone:?} should be accepted");
        }
    }

    #[test]
    fn rejects_other_number_shapes() {
        for phone in [
            "0202345678",
            "+254212345678",
            "071234567",
            "07123456789",
            "+255712345678",
            "254712345678",
            "07123-45678",
            "07١٢٣٤٥٦٧٨",
            "+2547１２３４５６７８",
            "",
        ] {
            assert!(!validate_phone_number(phone), "{phone:?} should be rejected");
        }
    }
}
