use axum::http::{header, HeaderMap, HeaderName};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Cookie carrying the opaque session identifier for display preferences.
pub const SESSION_COOKIE: &str = "offerboard_session";

/// The browsing session behind a request. `fresh` marks an identifier minted
/// for this request, which must be sent back via `Set-Cookie`.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub fresh: bool,
}

/// Reads the session identifier from the request's cookies, minting a new
/// one when absent.
pub fn session_from_headers(headers: &HeaderMap) -> Session {
    let existing = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string());

    match existing {
        Some(id) if !id.is_empty() => Session { id, fresh: false },
        _ => Session {
            id: Uuid::new_v4().to_string(),
            fresh: true,
        },
    }
}

/// Headers establishing a freshly minted session cookie; empty for an
/// already-cookied request.
pub fn session_cookie_headers(session: &Session) -> Vec<(HeaderName, String)> {
    if !session.fresh {
        return Vec::new();
    }
    vec![(
        header::SET_COOKIE,
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, session.id
        ),
    )]
}

/// Renders a monetary value for display: currency symbol, thousands
/// separators, two decimal places; a dash when absent.
pub fn format_currency(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };

    let raw = format!("{:.2}", value.round_dp(2));
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}{}.{}", sign, grouped, frac_part)
}
