#![allow(dead_code)]

use async_trait::async_trait;
use passcard::api::{ApiClient, ApiError, ApiRequest, ApiResponse, HttpTransport, Method};
use passcard::records::RecordService;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory `/password-card` backend. Records every request it sees.
pub struct FakeBackend {
    rows: Mutex<BTreeMap<u64, Value>>,
    next_id: Mutex<u64>,
    seen: Mutex<Vec<ApiRequest>>,
    /// Leave passwords out of list responses, like the real service does.
    pub withhold_passwords: bool,
}

impl FakeBackend {
    pub fn new(withhold_passwords: bool) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: Mutex::new(1),
            seen: Mutex::new(Vec::new()),
            withhold_passwords,
        })
    }

    pub fn seed(&self, name: &str, url: &str, username: &str, password: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        self.rows.lock().unwrap().insert(
            id,
            json!({"id": id, "name": name, "url": url, "username": username, "password": password}),
        );
        id.to_string()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.seen.lock().unwrap().clear();
    }

    pub fn row(&self, id: &str) -> Option<Value> {
        let id: u64 = id.parse().ok()?;
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn reply(status: u16, body: &Value) -> Result<ApiResponse, ApiError> {
        Ok(ApiResponse {
            status,
            body: serde_json::to_vec(body)?,
        })
    }

    fn not_found() -> Result<ApiResponse, ApiError> {
        Ok(ApiResponse {
            status: 404,
            body: b"{\"message\":\"Not Found\"}".to_vec(),
        })
    }
}

#[async_trait]
impl HttpTransport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.seen.lock().unwrap().push(request.clone());

        let id = request
            .path
            .strip_prefix("/password-card/")
            .map(|s| s.parse::<u64>().unwrap_or(u64::MAX));
        let body: Option<Value> = match &request.body {
            Some(b) => Some(serde_json::from_slice(b)?),
            None => None,
        };

        match (request.method, id) {
            (Method::Get, None) => {
                let rows = self.rows.lock().unwrap();
                let list: Vec<Value> = rows
                    .values()
                    .map(|r| {
                        let mut r = r.clone();
                        if self.withhold_passwords {
                            if let Some(obj) = r.as_object_mut() {
                                obj.remove("password");
                            }
                        }
                        r
                    })
                    .collect();
                Self::reply(200, &Value::Array(list))
            }
            (Method::Get, Some(id)) => match self.rows.lock().unwrap().get(&id) {
                Some(r) => Self::reply(200, r),
                None => Self::not_found(),
            },
            (Method::Post, None) => {
                let mut row = body.unwrap_or_else(|| json!({}));
                let mut next = self.next_id.lock().unwrap();
                let id = *next;
                *next += 1;
                row["id"] = json!(id);
                self.rows.lock().unwrap().insert(id, row.clone());
                Self::reply(201, &row)
            }
            (Method::Put, Some(id)) => {
                let mut rows = self.rows.lock().unwrap();
                if !rows.contains_key(&id) {
                    return Self::not_found();
                }
                let mut row = body.unwrap_or_else(|| json!({}));
                row["id"] = json!(id);
                rows.insert(id, row.clone());
                Self::reply(200, &row)
            }
            (Method::Delete, Some(id)) => match self.rows.lock().unwrap().remove(&id) {
                Some(_) => Ok(ApiResponse {
                    status: 204,
                    body: Vec::new(),
                }),
                None => Self::not_found(),
            },
            _ => Self::reply(405, &json!({"message": "Method Not Allowed"})),
        }
    }
}

pub fn service_for(backend: &Arc<FakeBackend>) -> RecordService {
    RecordService::new(ApiClient::new(backend.clone()))
}
