use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One endpoint file: the method it answers and its candidate responses.
///
/// The order of `responses` matters: earlier candidates win ties and the
/// last one doubles as the catch-all default.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EndpointDefinition {
    pub method: String,
    #[serde(default)]
    pub responses: Vec<ResponseCandidate>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResponseCandidate {
    pub status: u16,
    #[serde(default)]
    pub body: Value,
    /// Expected request payload. `None` (or JSON null) matches unconditionally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ResponseCandidate {
    pub fn new(status: u16, body: Value) -> Self {
        ResponseCandidate {
            status,
            body,
            input_body: None,
            description: None,
        }
    }

    pub fn with_input(mut self, input_body: Value) -> Self {
        self.input_body = Some(input_body);
        self
    }

    /// The declared input body, treating an explicit JSON null as absent.
    pub fn expected_input(&self) -> Option<&Value> {
        self.input_body.as_ref().filter(|v| !v.is_null())
    }
}
