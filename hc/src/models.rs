//! Wire types shared by the manager, the workers and the client
//!
//! JSON field names are camelCase.

use serde::{Deserialize, Deserializer, Serialize};

use crate::coordinator::RequestStatus;

/// Client request to crack a hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrackHashRequest {
    pub hash: String,
    pub max_length: usize,
}

/// Reply to a crack submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrackHashResponse {
    pub request_id: String,
}

/// Poll reply; `data` is only present once the request is READY
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: RequestStatus,
    pub data: Option<Vec<String>>,
}

/// One contiguous slice of a request's search space, addressed to one worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub request_id: String,
    pub hash: String,
    pub max_length: usize,
    pub alphabet: String,
    /// 1-based
    pub part_number: u32,
    pub part_count: u32,
}

/// Matches found by one share, pushed back to the manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialResult {
    pub request_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub words: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of every non-2xx reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query string of the status endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub request_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crack_request_deserialize() {
        let json = r#"{"hash":"e2fc714c4727ee9395f324cd2e7f331f","maxLength":4}"#;
        let req: CrackHashRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.hash, "e2fc714c4727ee9395f324cd2e7f331f");
        assert_eq!(req.max_length, 4);
    }

    #[test]
    fn test_share_serialize_uses_camel_case() {
        let share = Share {
            request_id: "req-1".to_string(),
            hash: "abcd".to_string(),
            max_length: 2,
            alphabet: "ab".to_string(),
            part_number: 1,
            part_count: 2,
        };
        let json = serde_json::to_string(&share).unwrap();
        assert_eq!(
            json,
            r#"{"requestId":"req-1","hash":"abcd","maxLength":2,"alphabet":"ab","partNumber":1,"partCount":2}"#
        );
    }

    #[test]
    fn test_status_response_serialize() {
        let resp = StatusResponse {
            status: RequestStatus::Ready,
            data: Some(vec!["ba".to_string()]),
        };
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"status":"READY","data":["ba"]}"#
        );

        let resp = StatusResponse {
            status: RequestStatus::InProgress,
            data: None,
        };
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"status":"IN_PROGRESS","data":null}"#
        );
    }

    #[test]
    fn test_partial_result_accepts_missing_or_null_words() {
        let result: PartialResult = serde_json::from_str(r#"{"requestId":"r"}"#).unwrap();
        assert!(result.words.is_empty());

        let result: PartialResult = serde_json::from_str(r#"{"requestId":"r","words":null}"#).unwrap();
        assert!(result.words.is_empty());

        let result: PartialResult = serde_json::from_str(r#"{"requestId":"r","words":["ba"]}"#).unwrap();
        assert_eq!(result.words, vec!["ba"]);
    }
}
