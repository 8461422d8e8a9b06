//! Conventional verb-to-route mapping for a REST resource
//!
//! A resource named `uploads` maps its operations onto:
//!
//! | operation | method | path              |
//! |-----------|--------|-------------------|
//! | create    | POST   | `/uploads`        |
//! | list      | GET    | `/uploads`        |
//! | find      | GET    | `/uploads/{uid}`  |
//! | update    | PATCH  | `/uploads/{uid}`  |
//! | replace   | PUT    | `/uploads/{uid}`  |
//! | destroy   | DELETE | `/uploads/{uid}`  |
//!
//! Every path also matches with a trailing slash. Methods a resource does not
//! register answer 405 on paths that exist.

use axum::handler::Handler;
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;

pub struct RestResource<S> {
    name: &'static str,
    collection: Option<MethodRouter<S>>,
    item: Option<MethodRouter<S>>,
    extra: Vec<(String, MethodRouter<S>)>,
}

impl<S> RestResource<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            collection: None,
            item: None,
            extra: Vec::new(),
        }
    }

    /// `POST /{name}`
    pub fn create<H, T>(mut self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.collection = Some(add(self.collection, MethodFilter::POST, handler));
        self
    }

    /// `GET /{name}`
    pub fn list<H, T>(mut self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.collection = Some(add(self.collection, MethodFilter::GET, handler));
        self
    }

    /// `GET /{name}/{uid}`
    pub fn find<H, T>(mut self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.item = Some(add(self.item, MethodFilter::GET, handler));
        self
    }

    /// `PATCH /{name}/{uid}`
    pub fn update<H, T>(mut self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.item = Some(add(self.item, MethodFilter::PATCH, handler));
        self
    }

    /// `PUT /{name}/{uid}`
    pub fn replace<H, T>(mut self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.item = Some(add(self.item, MethodFilter::PUT, handler));
        self
    }

    /// `DELETE /{name}/{uid}`
    pub fn destroy<H, T>(mut self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.item = Some(add(self.item, MethodFilter::DELETE, handler));
        self
    }

    /// Extra route below the resource, e.g. `/{uid}/file`.
    pub fn route(mut self, path: &str, method_router: MethodRouter<S>) -> Self {
        self.extra.push((path.to_string(), method_router));
        self
    }

    pub fn base_path(&self) -> String {
        format!("/{}", self.name)
    }

    pub fn into_router(self) -> Router<S> {
        let base = self.base_path();
        let mut router = Router::new();

        if let Some(collection) = self.collection {
            router = with_trailing_slash(router, &base, collection);
        }
        if let Some(item) = self.item {
            router = with_trailing_slash(router, &format!("{}/{{uid}}", base), item);
        }
        for (path, method_router) in self.extra {
            router = with_trailing_slash(router, &format!("{}{}", base, path), method_router);
        }

        router
    }
}

fn add<H, T, S>(existing: Option<MethodRouter<S>>, filter: MethodFilter, handler: H) -> MethodRouter<S>
where
    H: Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    match existing {
        Some(method_router) => method_router.on(filter, handler),
        None => on(filter, handler),
    }
}

fn with_trailing_slash<S>(router: Router<S>, path: &str, method_router: MethodRouter<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route(path, method_router.clone())
        .route(&format!("{}/", path), method_router)
}
