//! Response shapes printed by the CLI.

use chrono::NaiveDate;
use common::{Error, PredictionPoint};
use serde::Serialize;

/// One dated forecast in whole price units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub predicted_date: NaiveDate,
    pub predicted_price: i64,
}

impl From<&PredictionPoint> for PricePoint {
    fn from(point: &PredictionPoint) -> Self {
        Self {
            predicted_date: point.date,
            predicted_price: point.value.trunc() as i64,
        }
    }
}

/// Prices in both fields are truncated toward zero.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub region: String,
    pub crop: String,
    pub predictions: Vec<PricePoint>,
    pub prices: Vec<i64>,
}

impl ForecastResponse {
    pub fn new(region: &str, crop: &str, points: &[PredictionPoint]) -> Self {
        let predictions: Vec<PricePoint> = points.iter().map(PricePoint::from).collect();
        let prices = predictions.iter().map(|p| p.predicted_price).collect();
        Self {
            region: region.to_string(),
            crop: crop.to_string(),
            predictions,
            prices,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub region: String,
    pub crops: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl From<&Error> for ErrorResponse {
    fn from(e: &Error) -> Self {
        Self {
            error: e.to_string(),
            status: e.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices_are_truncated() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let response = ForecastResponse::new(
            "Salem",
            "Maize",
            &[
                PredictionPoint { date, value: 2150.9 },
                PredictionPoint { date, value: 1999.2 },
            ],
        );
        assert_eq!(response.prices, vec![2150, 1999]);
        assert_eq!(response.predictions[0].predicted_price, 2150);
        assert_eq!(response.predictions[1].predicted_price, 1999);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["region"], "Salem");
        assert_eq!(json["predictions"][0]["predicted_date"], "2024-05-01");
        assert_eq!(json["predictions"][0]["predicted_price"], 2150);
    }

    #[test]
    fn test_error_response_carries_status() {
        let body = ErrorResponse::from(&Error::UnknownName("district \"X\"".into()));
        assert_eq!(body.status, 400);
        assert!(body.error.contains("Unknown name"));
    }
}
