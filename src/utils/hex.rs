use log::error;
use once_cell::sync::Lazy;
use regex::Regex;

/// A standalone two-digit hex octet, as in `7E 00 68`
static HEX_OCTET: Lazy<Option<Regex>> = Lazy::new(|| match Regex::new(r"\b[0-9A-Fa-f]{2}\b") {
    Ok(re) => Some(re),
    Err(e) => {
        error!("Failed to compile hex octet pattern: {}", e);
        None
    }
});

/// Count the hex octets in pasted log text
pub fn count_hex_octets(text: &str) -> usize {
    match HEX_OCTET.as_ref() {
        Some(re) => re.find_iter(text).count(),
        None => 0,
    }
}
