use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::registry::Registry;

pub const CATALOGUE_PATH: &str = "/endpoints";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResponseInfo {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_body: Option<Value>,
    #[serde(rename = "response_body", default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EndpointInfo {
    pub method: String,
    pub responses: Vec<ResponseInfo>,
}

/// Document served from `GET /endpoints`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Catalogue {
    pub status: String,
    pub endpoints: BTreeMap<String, EndpointInfo>,
}

fn non_null(value: &Value) -> Option<Value> {
    (!value.is_null()).then(|| value.clone())
}

pub fn catalogue(registry: &Registry) -> Catalogue {
    let mut endpoints: BTreeMap<String, EndpointInfo> = registry
        .iter()
        .map(|(path, def)| {
            let responses = def
                .responses
                .iter()
                .map(|r| ResponseInfo {
                    status: r.status,
                    input_body: r.expected_input().cloned(),
                    body: non_null(&r.body),
                })
                .collect();
            (
                path.to_string(),
                EndpointInfo {
                    method: def.method.clone(),
                    responses,
                },
            )
        })
        .collect();

    endpoints.insert(
        CATALOGUE_PATH.to_string(),
        EndpointInfo {
            method: "GET".to_string(),
            responses: vec![ResponseInfo {
                status: 200,
                input_body: None,
                body: None,
            }],
        },
    );

    Catalogue {
        status: "success".to_string(),
        endpoints,
    }
}
