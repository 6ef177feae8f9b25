#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use stocktrack_backend::app::create_app;
use stocktrack_backend::auth::TokenKeys;
use stocktrack_backend::db::{CommentRepository, StockRepository, StoreError, UserRepository};
use stocktrack_backend::models::{
    AppUser, Comment, CommentChanges, NewComment, NewStock, NewUser, Role, SortField, Stock,
    StockChanges, StockQuery,
};
use stocktrack_backend::state::AppState;

/// In-memory stand-in for the three Postgres repositories, sharing one set of tables.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    stocks: BTreeMap<i32, Stock>,
    comments: BTreeMap<i32, Comment>,
    users: Vec<(AppUser, Vec<String>)>,
    next_stock_id: i32,
    next_comment_id: i32,
    clock: i64,
}

impl Tables {
    fn comments_for(&self, stock_id: i32) -> Vec<Comment> {
        self.comments
            .values()
            .filter(|c| c.stock_id == stock_id)
            .cloned()
            .collect()
    }

    fn with_comments(&self, stock: &Stock) -> Stock {
        let mut stock = stock.clone();
        stock.comments = self.comments_for(stock.id);
        stock
    }
}

impl MemoryStore {
    pub fn comment_count(&self) -> usize {
        self.inner.lock().unwrap().comments.len()
    }

    pub fn stock_count(&self) -> usize {
        self.inner.lock().unwrap().stocks.len()
    }

    pub fn add_user(&self, username: &str) -> AppUser {
        let user = AppUser {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .users
            .push((user.clone(), vec![Role::User.name().to_string()]));
        user
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl StockRepository for MemoryStore {
    async fn create(&self, stock: NewStock) -> Result<Stock, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        tables.next_stock_id += 1;
        let created = Stock::from_new(tables.next_stock_id, stock);
        tables.stocks.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Stock>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.stocks.get(&id).map(|s| tables.with_comments(s)))
    }

    async fn get_all(&self, query: &StockQuery) -> Result<Vec<Stock>, StoreError> {
        let tables = self.inner.lock().unwrap();
        let mut rows: Vec<Stock> = tables
            .stocks
            .values()
            .filter(|s| {
                query
                    .company_name
                    .as_deref()
                    .map_or(true, |n| contains_ci(&s.company_name, n))
            })
            .filter(|s| query.symbol.as_deref().map_or(true, |n| contains_ci(&s.symbol, n)))
            .map(|s| tables.with_comments(s))
            .collect();

        if let Some(sort) = query.sort {
            match sort.field {
                SortField::Symbol => rows.sort_by(|a, b| {
                    let ord = a.symbol.cmp(&b.symbol);
                    let ord = if sort.descending { ord.reverse() } else { ord };
                    ord.then(a.id.cmp(&b.id))
                }),
            }
        }

        Ok(rows
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit() as usize)
            .collect())
    }

    async fn update(&self, id: i32, changes: StockChanges) -> Result<Option<Stock>, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let Some(stock) = tables.stocks.get_mut(&id) else {
            return Ok(None);
        };
        stock.apply(changes);
        let stock = stock.clone();
        Ok(Some(tables.with_comments(&stock)))
    }

    async fn delete(&self, id: i32) -> Result<Option<Stock>, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        let Some(stock) = tables.stocks.remove(&id) else {
            return Ok(None);
        };
        let snapshot = Stock {
            comments: tables.comments_for(id),
            ..stock
        };
        tables.comments.retain(|_, c| c.stock_id != id);
        Ok(Some(snapshot))
    }

    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().stocks.contains_key(&id))
    }

    async fn get_by_symbol(&self, symbol: &str) -> Result<Option<Stock>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.stocks.values().find(|s| s.symbol == symbol).cloned())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        if !tables.stocks.contains_key(&comment.stock_id) {
            return Err(StoreError::MissingParent("stock"));
        }
        let author = tables
            .users
            .iter()
            .find(|(u, _)| u.id == comment.app_user_id)
            .map(|(u, _)| u.username.clone())
            .ok_or(StoreError::MissingParent("user"))?;

        tables.next_comment_id += 1;
        tables.clock += 1;
        let created = Comment {
            id: tables.next_comment_id,
            title: comment.title,
            content: comment.content,
            created_on: Utc::now() + Duration::milliseconds(tables.clock),
            stock_id: comment.stock_id,
            app_user_id: comment.app_user_id,
            created_by: author,
        };
        tables.comments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Comment>, StoreError> {
        Ok(self.inner.lock().unwrap().comments.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Comment>, StoreError> {
        Ok(self.inner.lock().unwrap().comments.values().cloned().collect())
    }

    async fn update(&self, id: i32, changes: CommentChanges) -> Result<Option<Comment>, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        Ok(tables.comments.get_mut(&id).map(|c| {
            c.title = changes.title;
            c.content = changes.content;
            c.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<Option<Comment>, StoreError> {
        Ok(self.inner.lock().unwrap().comments.remove(&id))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser, role: Role) -> Result<AppUser, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        if tables.users.iter().any(|(u, _)| u.username == user.username) {
            return Err(StoreError::Duplicate("username"));
        }
        let created = AppUser {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables
            .users
            .push((created.clone(), vec![role.name().to_string()]));
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AppUser>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, _)| u.clone()))
    }

    async fn roles(&self, user_id: Uuid) -> Result<Vec<String>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| u.id == user_id)
            .map(|(_, roles)| roles.clone())
            .unwrap_or_default())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub tokens: TokenKeys,
    /// Bearer token of a user registered at startup, for routes that need a caller.
    pub reader_token: String,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let tokens = TokenKeys::new(b"integration-test-secret", 1);
        let state = AppState {
            stocks: store.clone(),
            comments: store.clone(),
            users: store.clone(),
            tokens: tokens.clone(),
        };
        let reader = store.add_user("reader");
        let reader_token = tokens
            .issue(reader.id, &reader.username, vec![Role::User.name().to_string()])
            .unwrap();
        Self {
            router: create_app(state),
            store,
            tokens,
            reader_token,
        }
    }

    /// Registers a user directly in the store and returns a bearer token for it.
    pub fn login_as(&self, username: &str) -> String {
        let user = self.store.add_user(username);
        self.tokens
            .issue(user.id, &user.username, vec![Role::User.name().to_string()])
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    /// GET as the startup user.
    pub async fn get_authed(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Some(&self.reader_token)).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body), None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, None).await
    }

    /// Creates a stock through the API and returns its id.
    pub async fn create_stock(&self, symbol: &str, company_name: &str) -> i64 {
        let response = self
            .post(
                "/api/stock",
                serde_json::json!({
                    "symbol": symbol,
                    "companyName": company_name,
                    "purchase": 25.5,
                    "lastDiv": 1.2,
                    "industry": "Technology",
                    "marketCap": 1_000_000
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}
