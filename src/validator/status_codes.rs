use super::{join_path, OperationCheck};
use crate::model::{KnownNames, OperationKey, OperationMetadata, ValidationFinding};
use serde_json::Value;

/// Registered HTTP status codes
pub const STANDARD_STATUS_CODES: [u16; 63] = [
    100, 101, 102, 103, //
    200, 201, 202, 203, 204, 205, 206, 207, 208, 226, //
    300, 301, 302, 303, 304, 305, 306, 307, 308, //
    400, 401, 402, 403, 404, 405, 406, 407, 408, 409, 410, 411, 412, 413, 414, 415, 416, 417,
    418, 421, 422, 423, 424, 425, 426, 428, 429, 431, 451, //
    500, 501, 502, 503, 504, 505, 506, 507, 508, 510, 511,
];

/// Warns about response keys that are not `default`, a `<digit>XX` range or a
/// registered status code.
pub struct StatusCodeCheck;

impl OperationCheck for StatusCodeCheck {
    fn name(&self) -> &'static str {
        "status_codes"
    }

    fn check(
        &self,
        operation: &OperationMetadata,
        key: &OperationKey,
        _known: &KnownNames,
    ) -> Vec<ValidationFinding> {
        let Some(Value::Object(responses)) = operation.get("responses") else {
            return Vec::new();
        };

        responses
            .keys()
            .filter(|code| !is_valid_status_key(code))
            .map(|code| {
                ValidationFinding::warning(
                    key,
                    join_path("responses", code),
                    format!("'{}' is not a standard HTTP status code", code),
                )
            })
            .collect()
    }
}

/// Whether a response key is `default`, a range such as `5XX`, or a registered code.
///
/// # Arguments
///
/// * `code` - A key of the operation's `responses` map
///
/// # Returns
///
/// Returns `true` for `default`, for `<digit>XX`, and for exactly three ASCII digits
/// naming a code in [`STANDARD_STATUS_CODES`]. Signs and leading zeros are rejected.
pub fn is_valid_status_key(code: &str) -> bool {
    if code == "default" {
        return true;
    }

    let bytes = code.as_bytes();
    if bytes.len() == 3 && bytes[0].is_ascii_digit() && &bytes[1..] == b"XX" {
        return true;
    }

    if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }

    code.parse::<u16>()
        .map(|n| STANDARD_STATUS_CODES.contains(&n))
        .unwrap_or(false)
}
