use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::Utc;
use fake::faker::address::en::StreetName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::auth::model::{AuthenticatedUser, AUTHENTICATED_ROLE};
use crate::features::search::services::{CandidateQuery, ReviewRating, ShopDirectory};
use crate::features::search::SearchError;
use crate::features::shops::models::{Shop, ShopTier};
use crate::modules::storage::ObjectStore;

pub const TEST_USER_ID: &str = "0b6f3c1e-7d2a-4c55-9e1f-3a8b9c0d1e2f";

pub fn create_member_user() -> AuthenticatedUser {
    member_user_with_id(TEST_USER_ID)
}

pub fn member_user_with_id(user_id: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: user_id.to_string(),
        email: Some(SafeEmail().fake()),
        role: AUTHENTICATED_ROLE.to_string(),
        session_id: Some("test-session".to_string()),
        is_anonymous: false,
    }
}

pub fn create_anonymous_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: "anon-user".to_string(),
        email: None,
        role: AUTHENTICATED_ROLE.to_string(),
        session_id: None,
        is_anonymous: true,
    }
}

async fn inject_member_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_member_user());
    next.run(request).await
}

/// Every request is made as [`create_member_user`]
pub fn with_member_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_member_middleware))
}

/// Every request is made as `user`
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

pub fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Standard-tier shop with random contact details at the given position
pub fn shop_at(name: &str, lat: f64, lng: f64) -> Shop {
    let now = Utc::now();
    Shop {
        id: Uuid::new_v4(),
        owner_id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        airport_code: "KTEB".to_string(),
        address: StreetName().fake(),
        latitude: lat,
        longitude: lng,
        contact_person: Some(Name().fake()),
        phone: Some(PhoneNumber().fake()),
        email: Some(SafeEmail().fake()),
        description: None,
        specializations_aircraft: tags(&["Cessna"]),
        specializations_services: tags(&["Annual"]),
        faa_certifications: Vec::new(),
        tier: ShopTier::Standard,
        photos: Vec::new(),
        is_verified: false,
        created_at: now,
        updated_at: now,
    }
}

/// Directory that applies the same prefilter as the Postgres query
pub struct InMemoryShopDirectory {
    shops: Vec<Shop>,
    ratings: Vec<ReviewRating>,
    fail: bool,
    candidate_calls: AtomicUsize,
    rating_calls: AtomicUsize,
}

impl InMemoryShopDirectory {
    pub fn new(shops: Vec<Shop>) -> Self {
        Self {
            shops,
            ratings: Vec::new(),
            fail: false,
            candidate_calls: AtomicUsize::new(0),
            rating_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_ratings(mut self, ratings: Vec<ReviewRating>) -> Self {
        self.ratings = ratings;
        self
    }

    pub fn candidate_calls(&self) -> usize {
        self.candidate_calls.load(Ordering::SeqCst)
    }

    pub fn rating_calls(&self) -> usize {
        self.rating_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShopDirectory for InMemoryShopDirectory {
    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<Shop>, SearchError> {
        self.candidate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SearchError::Unavailable("connection refused".to_string()));
        }
        Ok(self
            .shops
            .iter()
            .filter(|shop| query.admits(shop))
            .cloned()
            .collect())
    }

    async fn review_ratings(&self, shop_ids: &[Uuid]) -> Result<Vec<ReviewRating>, SearchError> {
        self.rating_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SearchError::Unavailable("connection refused".to_string()));
        }
        Ok(self
            .ratings
            .iter()
            .filter(|r| shop_ids.contains(&r.shop_id))
            .copied()
            .collect())
    }
}

const TEST_STORAGE_URL: &str = "http://storage.test/fixaplane";

/// Object store kept in memory, with switchable failures
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<BTreeSet<String>>,
    fail_upload_at: Option<usize>,
    fail_deletes: bool,
    uploads: AtomicUsize,
    delete_attempts: AtomicUsize,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `n`th upload (1-based) fails
    pub fn failing_upload_at(n: usize) -> Self {
        Self {
            fail_upload_at: Some(n),
            ..Self::default()
        }
    }

    pub fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, key: &str) {
        self.objects.lock().unwrap().insert(key.to_string());
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().iter().cloned().collect()
    }

    pub fn delete_attempts(&self) -> usize {
        self.delete_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn public_key(&self, path: &str) -> String {
        format!("public/{}", path.trim_start_matches('/'))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", TEST_STORAGE_URL, key)
    }

    fn extract_key_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&format!("{}/", TEST_STORAGE_URL))
            .map(str::to_string)
    }

    async fn upload(
        &self,
        key: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, AppError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_upload_at == Some(n) {
            return Err(AppError::Internal("upload refused".to_string()));
        }
        self.insert(key);
        Ok(key.to_string())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.delete_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes {
            return Err(AppError::Internal("delete refused".to_string()));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
