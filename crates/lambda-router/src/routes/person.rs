//! `/v1/person`: create and list people.
//!
//! | Verb | Input | Output |
//! |---|---|---|
//! | `POST` | JSON body with `client_id`, `name`, `email` | the stored person |
//! | `GET` | `?limit=N`, 1 to 100 | `{"Items": [...], "Count": n}` |

use crate::storage::{Person, PersonStore};
use lambda_router_core::{AuditRecord, Request, RouterError, RouterResult};
use lambda_router_dispatch::{MethodReturn, Resource};
use lambda_router_middleware::BoxFuture;
use std::sync::Arc;

/// Longest accepted `name`, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Longest accepted `email`, in characters.
pub const MAX_EMAIL_LEN: usize = 1024;

/// Largest accepted `limit`.
pub const MAX_LIMIT: usize = 100;

/// Person resource backed by a [`PersonStore`].
#[derive(Clone)]
pub struct PersonResource {
    store: Arc<dyn PersonStore>,
}

impl PersonResource {
    /// Creates the resource over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for PersonResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonResource")
            .field("table_name", &self.store.table_name())
            .finish()
    }
}

/// Returns the non-empty string field `name` if it fits in `max` characters.
fn bounded<'a>(request: &'a Request, name: &str, max: usize) -> Option<&'a str> {
    request
        .body_str(name)
        .filter(|v| !v.is_empty() && v.chars().count() <= max)
}

/// Validates a create body, in field order.
fn validate_create(request: &Request) -> RouterResult<Person> {
    let client_id = request
        .body_str("client_id")
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RouterError::validation("Field: client_id is required"))?;
    let name = bounded(request, "name", MAX_NAME_LEN).ok_or_else(|| {
        RouterError::validation(format!(
            "Field: name is required and can not be longer than {MAX_NAME_LEN} characters"
        ))
    })?;
    let email = bounded(request, "email", MAX_EMAIL_LEN).ok_or_else(|| {
        RouterError::validation(format!(
            "Field: email is required and can not be longer than {MAX_EMAIL_LEN} characters"
        ))
    })?;
    Ok(Person::new(client_id, name, email))
}

/// Parses `?limit`, which must be an integer from 1 to [`MAX_LIMIT`].
fn parse_limit(request: &Request) -> RouterResult<usize> {
    request
        .query_param("limit")
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|limit| (1..=MAX_LIMIT).contains(limit))
        .ok_or_else(|| {
            RouterError::validation(format!(
                "Field: limit is required and can not be more than {MAX_LIMIT}"
            ))
        })
}

impl Resource for PersonResource {
    fn post<'a>(
        &'a self,
        request: &'a Request,
        _audit: &'a AuditRecord,
    ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
        Box::pin(async move {
            let person = validate_create(request)?;
            self.store.put(&person).await?;
            Ok(MethodReturn::new(serde_json::to_value(&person)?))
        })
    }

    fn get<'a>(
        &'a self,
        request: &'a Request,
        _audit: &'a AuditRecord,
    ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
        Box::pin(async move {
            let limit = parse_limit(request)?;
            let page = self.store.find_first(limit).await?;
            Ok(MethodReturn::new(serde_json::to_value(&page)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryPersonStore;
    use http::Method;
    use lambda_router_core::{DeploymentInfo, ResponseCode};
    use serde_json::{json, Value};

    fn audit() -> AuditRecord {
        AuditRecord::start("t", "o", &DeploymentInfo::default())
    }

    fn resource() -> (Arc<MemoryPersonStore>, PersonResource) {
        let store = Arc::new(MemoryPersonStore::new("people"));
        (store.clone(), PersonResource::new(store))
    }

    fn create(body: Value) -> Request {
        Request::new(Method::POST, "/v1/person").with_body(body)
    }

    async fn create_err(body: Value) -> String {
        let (_, resource) = resource();
        let err = resource.post(&create(body), &audit()).await.unwrap_err();
        assert_eq!(err.response_code(), ResponseCode::Validation);
        err.message().to_string()
    }

    #[tokio::test]
    async fn test_create_person() {
        let (store, resource) = resource();
        let body = json!({"client_id": "c-1", "name": "Rehan", "email": "rehan@example.com"});
        let ret = resource.post(&create(body), &audit()).await.unwrap();

        assert_eq!(ret.body["name"], "Rehan");
        assert_eq!(ret.body["client_id"], "c-1");
        let person_id = ret.body["person_id"].as_str().unwrap();
        assert!(store.get(person_id).is_some());
    }

    #[tokio::test]
    async fn test_validation_order() {
        assert_eq!(create_err(Value::Null).await, "Field: client_id is required");
        assert_eq!(
            create_err(json!({"client_id": "c-1", "email": "x"})).await,
            "Field: name is required and can not be longer than 50 characters"
        );
        assert_eq!(
            create_err(json!({"client_id": "c-1", "name": "Rehan"})).await,
            "Field: email is required and can not be longer than 1024 characters"
        );
    }

    #[tokio::test]
    async fn test_name_length_limit() {
        let name = "a".repeat(MAX_NAME_LEN);
        let (_, resource) = resource();
        let body = json!({"client_id": "c", "name": name, "email": "e"});
        assert!(resource.post(&create(body), &audit()).await.is_ok());

        let too_long = "a".repeat(MAX_NAME_LEN + 1);
        let msg = create_err(json!({"client_id": "c", "name": too_long, "email": "e"})).await;
        assert!(msg.starts_with("Field: name"));
    }

    #[tokio::test]
    async fn test_email_length_limit() {
        let email = "e".repeat(MAX_EMAIL_LEN + 1);
        let msg = create_err(json!({"client_id": "c", "name": "n", "email": email})).await;
        assert!(msg.starts_with("Field: email"));
    }

    #[tokio::test]
    async fn test_list_people() {
        let (store, resource) = resource();
        for i in 0..3 {
            store
                .put(&Person::new("c-1", format!("p{i}"), "e@example.com"))
                .await
                .unwrap();
        }

        let request = Request::new(Method::GET, "/v1/person").with_query_param("limit", "2");
        let ret = resource.get(&request, &audit()).await.unwrap();
        assert_eq!(ret.body["Count"], 2);
        assert_eq!(ret.body["Items"][0]["name"], "p0");
    }

    #[tokio::test]
    async fn test_limit_validation() {
        let (_, resource) = resource();
        for limit in [None, Some("0"), Some("101"), Some("ten")] {
            let mut request = Request::new(Method::GET, "/v1/person");
            if let Some(limit) = limit {
                request = request.with_query_param("limit", limit);
            }
            let err = resource.get(&request, &audit()).await.unwrap_err();
            assert_eq!(
                err.message(),
                "Field: limit is required and can not be more than 100"
            );
        }
    }
}
