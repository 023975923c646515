use serde::{Deserialize, Serialize};

/// One decoded food prediction: label, confidence and calorie density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: String,
    pub probability: f64,
    #[serde(default)]
    pub calories_per_100g: u32,
}

/// Response body of `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: PredictionResult,
}

/// A server-persisted prediction with identity and timestamp.
///
/// `id` is server-assigned and unique within a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub filename: String,
    pub prediction: PredictionResult,
    pub timestamp: String,
}

/// Response body of `GET /predictions`.
///
/// `total_count` is reported by the server independently of the
/// materialized `predictions` page and may exceed its length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionPage {
    pub predictions: Vec<PredictionRecord>,
    pub total_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_prediction() {
        let body = r#"{"prediction":{"label":"banana","probability":0.93,"calories_per_100g":105}}"#;
        let response: PredictResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.prediction.label, "banana");
        assert_eq!(response.prediction.probability, 0.93);
        assert_eq!(response.prediction.calories_per_100g, 105);
    }

    #[test]
    fn calories_default_to_zero_when_absent() {
        let body = r#"{"prediction":{"label":"lettuce","probability":0.71}}"#;
        let response: PredictResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.prediction.calories_per_100g, 0);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = r#"{"prediction":{"label":"apple","probability":0.88,"model_version":"v3"},"elapsed_ms":12}"#;
        let response: PredictResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.prediction.label, "apple");
    }

    #[test]
    fn missing_label_fails_to_decode() {
        let body = r#"{"prediction":{"probability":0.5}}"#;
        let response: Result<PredictResponse, _> = serde_json::from_str(body);
        assert!(response.is_err());
    }

    #[test]
    fn missing_probability_fails_to_decode() {
        let body = r#"{"prediction":{"label":"apple"}}"#;
        let response: Result<PredictResponse, _> = serde_json::from_str(body);
        assert!(response.is_err());
    }

    #[test]
    fn decodes_empty_prediction_page() {
        let body = r#"{"predictions":[],"total_count":0}"#;
        let page: PredictionPage = serde_json::from_str(body).unwrap();

        assert!(page.predictions.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn record_fields_round_trip() {
        let body = r#"{"_id":"abc123","filename":"image.jpg","prediction":{"label":"banana","probability":0.93,"calories_per_100g":105},"timestamp":"2025-05-01T12:00:00Z"}"#;
        let record: PredictionRecord = serde_json::from_str(body).unwrap();

        assert_eq!(record.id, "abc123");
        assert_eq!(record.filename, "image.jpg");
        assert_eq!(record.timestamp, "2025-05-01T12:00:00Z");

        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(encoded["_id"], "abc123");
        assert_eq!(encoded["prediction"]["label"], "banana");
        assert_eq!(encoded["prediction"]["probability"], 0.93);
        assert_eq!(encoded["prediction"]["calories_per_100g"], 105);
    }
}
