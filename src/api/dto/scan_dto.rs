//! Scan request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::visit_dto::VisitDto;
use crate::domain::{ScanResult, VehicleToken};
use crate::error::ParkingError;

/// Request body for `POST /scan`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Token decoded from the vehicle's QR sticker.
    pub token: String,
}

impl ScanRequest {
    /// Returns the trimmed token.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::InvalidRequest`] if the token is blank.
    pub fn token(&self) -> Result<VehicleToken, ParkingError> {
        parse_token(&self.token)
    }
}

/// Normalises a token received from a client, whether in a body or a path.
///
/// # Errors
///
/// Returns [`ParkingError::InvalidRequest`] if the token is blank.
pub fn parse_token(raw: &str) -> Result<VehicleToken, ParkingError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(ParkingError::InvalidRequest("token is required".to_string()));
    }
    Ok(VehicleToken::new(token))
}

/// Response body for `POST /scan`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    /// `check_in` or `check_out`.
    #[serde(rename = "type")]
    pub kind: String,
    /// User-facing summary, e.g. `"checked out, fee=20"`.
    pub message: String,
    /// The visit opened or closed by the scan.
    pub visit: VisitDto,
    /// Whole minutes parked (check-out only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    /// Fee charged (check-out only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<i64>,
    /// Currency of `fee` (check-out only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl ScanResponse {
    /// Builds the response for `result`, labelling fees with `currency`.
    #[must_use]
    pub fn new(result: ScanResult, currency: &str) -> Self {
        let kind = result.kind_str().to_string();
        let message = result.message();
        match result {
            ScanResult::CheckedIn { visit } => Self {
                kind,
                message,
                visit: VisitDto::from(visit),
                duration_minutes: None,
                fee: None,
                currency: None,
            },
            ScanResult::CheckedOut {
                visit,
                duration_minutes,
                fee,
            } => Self {
                kind,
                message,
                visit: VisitDto::from(visit),
                duration_minutes: Some(duration_minutes),
                fee: Some(fee),
                currency: Some(currency.to_string()),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::{VehicleId, Visit};

    #[test]
    fn check_out_carries_fee_and_currency() {
        let now = Utc::now();
        let Some(closed) = Visit::open(VehicleId::new(), now).closed(now, 3, 20) else {
            panic!("open visit must close");
        };
        let response = ScanResponse::new(
            ScanResult::CheckedOut {
                visit: closed,
                duration_minutes: 3,
                fee: 20,
            },
            "EGP",
        );
        assert_eq!(response.kind, "check_out");
        assert_eq!(response.message, "checked out, fee=20");
        assert_eq!(response.fee, Some(20));
        assert_eq!(response.currency.as_deref(), Some("EGP"));
    }

    #[test]
    fn blank_token_is_rejected() {
        let blank = ScanRequest {
            token: "  ".to_string(),
        };
        assert!(matches!(blank.token(), Err(ParkingError::InvalidRequest(_))));

        let padded = ScanRequest {
            token: " CAR-abc\n".to_string(),
        };
        assert!(matches!(padded.token(), Ok(t) if t.as_str() == "CAR-abc"));
        assert!(matches!(parse_token("\tCAR-abc "), Ok(t) if t.as_str() == "CAR-abc"));
        assert!(matches!(parse_token(""), Err(ParkingError::InvalidRequest(_))));
    }

    #[test]
    fn check_in_omits_fee_fields() {
        let response = ScanResponse::new(
            ScanResult::CheckedIn {
                visit: Visit::open(VehicleId::new(), Utc::now()),
            },
            "EGP",
        );
        let Ok(json) = serde_json::to_value(&response) else {
            panic!("serialization failed");
        };
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("check_in"));
        assert!(json.get("fee").is_none());
        assert!(json.get("currency").is_none());
    }
}
