//! Function routes.
//!
//! | Path | Resource |
//! |---|---|
//! | `/v1/ping` | [`Ping`] |
//! | `/v1/person` | [`PersonResource`] |

mod person;
mod ping;

pub use person::{PersonResource, MAX_EMAIL_LEN, MAX_LIMIT, MAX_NAME_LEN};
pub use ping::Ping;

use crate::storage::PersonStore;
use lambda_router_core::di::Container;
use lambda_router_dispatch::{Resource, Router};
use std::sync::Arc;

/// Health check path.
pub const PING_PATH: &str = "/v1/ping";

/// Person resource path.
pub const PERSON_PATH: &str = "/v1/person";

/// Registers every route.
///
/// `/v1/person` resolves its store from the container at dispatch time, so
/// the container must provide a `dyn PersonStore`.
pub fn register_routes(router: &mut Router) {
    router.insert_shared(PING_PATH, Arc::new(Ping));
    router.insert(PERSON_PATH, |container: &Container| {
        let store = container.inject::<dyn PersonStore>()?;
        let resource: Arc<dyn Resource> = Arc::new(PersonResource::new(store));
        Ok(resource)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryPersonStore;

    #[test]
    fn test_register_routes() {
        let mut router = Router::new();
        register_routes(&mut router);
        assert_eq!(router.paths().collect::<Vec<_>>(), vec![PERSON_PATH, PING_PATH]);
    }

    #[test]
    fn test_person_requires_store() {
        let mut router = Router::new();
        register_routes(&mut router);

        let empty = Container::new();
        assert!(router.resolve(PERSON_PATH, &empty).is_err());

        let mut container = Container::new();
        container.provide::<dyn PersonStore>(Arc::new(MemoryPersonStore::new("people")));
        assert!(router.resolve(PERSON_PATH, &container).is_ok());
        assert!(router.resolve(PING_PATH, &empty).is_ok());
    }
}
