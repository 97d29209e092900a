use axum::Json;
use serde::{Deserialize, Serialize};

/// JSON envelope shared by every endpoint: `{success, message?, data?, count?}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> ApiResult<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
        })
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            count: None,
        })
    }
}

impl<T: Serialize> ApiResult<Vec<T>> {
    pub fn list(items: Vec<T>) -> Json<Self> {
        let count = items.len();
        Json(Self {
            success: true,
            message: None,
            data: Some(items),
            count: Some(count),
        })
    }
}

impl ApiResult<()> {
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data: None,
            count: None,
        })
    }

    pub fn error(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            message: Some(message.into()),
            data: None,
            count: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_envelope_omits_data_and_count() {
        let Json(body) = ApiResult::error("Book not found");
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"success": false, "message": "Book not found"})
        );
    }

    #[test]
    fn list_envelope_carries_count() {
        let Json(body) = ApiResult::list(vec!["a", "b", "c"]);
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"success": true, "data": ["a", "b", "c"], "count": 3})
        );
    }

    #[test]
    fn empty_list_still_reports_count() {
        let Json(body) = ApiResult::<Vec<u32>>::list(Vec::new());
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"success": true, "data": [], "count": 0})
        );
    }
}
