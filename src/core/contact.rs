//! Contact handoff: pure string formatting for the attendant deep link.
//!
//! No network, no state. The presentation layer opens the resulting URL.

use urlencoding::encode;

use super::vehicle::Vehicle;

/// Strip everything but digits, then leading zeros. Numbers are trusted to
/// already be in international format upstream.
pub fn sanitize_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let trimmed = digits.trim_start_matches('0');
    trimmed.to_string()
}

/// Shareable link back into the catalog: `{origin}?{param}={id}`.
pub fn share_link(origin: &str, param: &str, vehicle: &Vehicle) -> String {
    format!("{origin}?{param}={}", vehicle.id)
}

/// Full send URL for one attendant number, carrying the interest message
/// with the share link embedded.
pub fn interest_link(number: &str, origin: &str, param: &str, vehicle: &Vehicle) -> String {
    let link = share_link(origin, param, vehicle);
    let message = format!(
        "Olá! Vi no catálogo o veículo: {}.\nAinda está disponível?\nLink: {link}",
        vehicle.name
    );
    format!(
        "https://api.whatsapp.com/send?phone={}&text={}",
        sanitize_number(number),
        encode(&message)
    )
}
