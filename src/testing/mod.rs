//! In-memory store and request helpers for router-level tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::database::models::{
    Alert, Consent, ConsumptionData, NewAlert, NewConsent, NewConsumption, NewProperty, NewUser,
    Property, PropertyChanges, User,
};
use crate::database::{Store, StoreError};
use crate::router;
use crate::state::AppState;

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    properties: Vec<Property>,
    consumption: Vec<ConsumptionData>,
    alerts: Vec<Alert>,
    consents: Vec<Consent>,
}

impl Tables {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn drop_property_children(&mut self, property_id: i64) {
        self.consumption.retain(|c| c.property_id != property_id);
        self.alerts.retain(|a| a.property_id != property_id);
        self.consents.retain(|c| c.property_id != property_id);
    }
}

/// Store double with the same uniqueness, cascade and ordering rules as
/// the PostgreSQL schema
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail like a lost connection
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::QueryError("store offline".to_string()));
        }
        Ok(self.tables.lock().unwrap())
    }

    pub fn consumption_count(&self) -> usize {
        self.tables.lock().unwrap().consumption.len()
    }

    pub fn alert_count(&self) -> usize {
        self.tables.lock().unwrap().alerts.len()
    }

    pub fn consent_count(&self) -> usize {
        self.tables.lock().unwrap().consents.len()
    }

    /// Insert a reading with an arbitrary date, bypassing the API
    pub fn seed_consumption(&self, property_id: i64, date: NaiveDate, kwh: f64) {
        let mut t = self.tables.lock().unwrap();
        let id = t.id();
        t.consumption.push(ConsumptionData {
            id,
            property_id,
            date,
            kwh,
            max_power: None,
            source: "MANUAL".to_string(),
            created_at: Utc::now(),
        });
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        self.tables().map(|_| ())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut t = self.tables()?;
        if t.users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::Conflict("email"));
        }
        let now = Utc::now();
        let user = User {
            id: t.id(),
            email: new_user.email,
            hashed_password: new_user.hashed_password,
            phone: new_user.phone,
            company_name: new_user.company_name,
            siret: new_user.siret,
            is_active: true,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables()?;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        if t.users.len() == before {
            return Ok(false);
        }

        let owned: Vec<i64> = t.properties.iter().filter(|p| p.owner_id == id).map(|p| p.id).collect();
        t.properties.retain(|p| p.owner_id != id);
        for property_id in owned {
            t.drop_property_children(property_id);
        }
        for alert in t.alerts.iter_mut().filter(|a| a.treated_by == Some(id)) {
            alert.treated_by = None;
        }
        Ok(true)
    }

    async fn create_property(&self, owner_id: i64, new_property: NewProperty) -> Result<Property, StoreError> {
        let mut t = self.tables()?;
        if t.properties.iter().any(|p| p.pdl == new_property.pdl) {
            return Err(StoreError::Conflict("pdl"));
        }
        let now = Utc::now();
        let property = Property {
            id: t.id(),
            owner_id,
            label: new_property.label,
            address: new_property.address,
            city: new_property.city,
            postal_code: new_property.postal_code,
            pdl: new_property.pdl,
            status: new_property.status,
            latitude: new_property.latitude,
            longitude: new_property.longitude,
            threshold_alert: new_property.threshold_alert,
            enedis_token: None,
            enedis_refresh_token: None,
            token_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        t.properties.push(property.clone());
        Ok(property)
    }

    async fn find_property(&self, id: i64) -> Result<Option<Property>, StoreError> {
        Ok(self.tables()?.properties.iter().find(|p| p.id == id).cloned())
    }

    async fn list_properties(&self, owner_id: i64) -> Result<Vec<Property>, StoreError> {
        let t = self.tables()?;
        let mut properties: Vec<Property> =
            t.properties.iter().filter(|p| p.owner_id == owner_id).cloned().collect();
        properties.sort_by_key(|p| p.id);
        Ok(properties)
    }

    async fn update_property(&self, id: i64, changes: PropertyChanges) -> Result<Option<Property>, StoreError> {
        let mut t = self.tables()?;
        if let Some(pdl) = &changes.pdl {
            if t.properties.iter().any(|p| p.id != id && &p.pdl == pdl) {
                return Err(StoreError::Conflict("pdl"));
            }
        }
        let Some(property) = t.properties.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        changes.apply_to(property);
        Ok(Some(property.clone()))
    }

    async fn delete_property(&self, id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables()?;
        let before = t.properties.len();
        t.properties.retain(|p| p.id != id);
        if t.properties.len() == before {
            return Ok(false);
        }
        t.drop_property_children(id);
        Ok(true)
    }

    async fn create_consumption(&self, property_id: i64, new_row: NewConsumption) -> Result<ConsumptionData, StoreError> {
        let mut t = self.tables()?;
        let row = ConsumptionData {
            id: t.id(),
            property_id,
            date: new_row.date,
            kwh: new_row.kwh,
            max_power: new_row.max_power,
            source: new_row.source,
            created_at: Utc::now(),
        };
        t.consumption.push(row.clone());
        Ok(row)
    }

    async fn import_consumption(&self, property_id: i64, rows: Vec<NewConsumption>) -> Result<u64, StoreError> {
        let mut t = self.tables()?;
        let count = rows.len() as u64;
        for new_row in rows {
            let id = t.id();
            t.consumption.push(ConsumptionData {
                id,
                property_id,
                date: new_row.date,
                kwh: new_row.kwh,
                max_power: new_row.max_power,
                source: new_row.source,
                created_at: Utc::now(),
            });
        }
        Ok(count)
    }

    async fn list_consumption(&self, property_id: i64, since: NaiveDate) -> Result<Vec<ConsumptionData>, StoreError> {
        let t = self.tables()?;
        let mut rows: Vec<ConsumptionData> = t
            .consumption
            .iter()
            .filter(|c| c.property_id == property_id && c.date >= since)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn create_alert(&self, new_alert: NewAlert) -> Result<Alert, StoreError> {
        let mut t = self.tables()?;
        let alert = Alert {
            id: t.id(),
            property_id: new_alert.property_id,
            level: new_alert.level,
            event_type: new_alert.event_type,
            consumption_detected: new_alert.consumption_detected,
            confidence_score: new_alert.confidence_score,
            message: new_alert.message,
            status: new_alert.status,
            treated_by: None,
            treated_at: None,
            created_at: Utc::now(),
        };
        t.alerts.push(alert.clone());
        Ok(alert)
    }

    async fn find_alert(&self, id: i64) -> Result<Option<Alert>, StoreError> {
        Ok(self.tables()?.alerts.iter().find(|a| a.id == id).cloned())
    }

    async fn list_alerts(&self, property_id: i64) -> Result<Vec<Alert>, StoreError> {
        let t = self.tables()?;
        let mut alerts: Vec<Alert> = t.alerts.iter().filter(|a| a.property_id == property_id).cloned().collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(alerts)
    }

    async fn create_consent(&self, new_consent: NewConsent) -> Result<Consent, StoreError> {
        let mut t = self.tables()?;
        let consent = Consent {
            id: t.id(),
            property_id: new_consent.property_id,
            holder_email: new_consent.holder_email,
            holder_name: new_consent.holder_name,
            status: new_consent.status,
            permissions: new_consent.permissions,
            expires_at: new_consent.expires_at,
            created_at: Utc::now(),
        };
        t.consents.push(consent.clone());
        Ok(consent)
    }

    async fn find_consent(&self, id: i64) -> Result<Option<Consent>, StoreError> {
        Ok(self.tables()?.consents.iter().find(|c| c.id == id).cloned())
    }

    async fn list_consents(&self, property_id: i64) -> Result<Vec<Consent>, StoreError> {
        let t = self.tables()?;
        let mut consents: Vec<Consent> = t.consents.iter().filter(|c| c.property_id == property_id).cloned().collect();
        consents.sort_by_key(|c| c.id);
        Ok(consents)
    }
}

pub const TEST_SECRET: &str = "router-test-secret";
pub const TEST_PASSWORD: &str = "password123";

/// Development defaults with a fixed secret and the cheapest bcrypt cost
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.security.bcrypt_cost = 4;
    config.api.frontend_dir = std::env::temp_dir().join("alerte-compteur-no-frontend");
    config
}

/// Router wired to a fresh in-memory store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), test_config());
        Self {
            router: router::app(state),
            store,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn json(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        };
        self.send(request.unwrap()).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.json(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.json(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn register(&self, email: &str) -> TestResponse {
        self.json(
            Method::POST,
            "/api/users/",
            None,
            Some(serde_json::json!({ "email": email, "password": TEST_PASSWORD })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        let form = format!("username={}&password={}", email, password);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        self.send(request).await
    }

    /// Register, log in and return the bearer token
    pub async fn token_for(&self, email: &str) -> String {
        let registered = self.register(email).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.text);
        let login = self.login(email, TEST_PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.text);
        login.body["access_token"].as_str().unwrap().to_string()
    }

    /// Create a property and return its id
    pub async fn property_for(&self, token: &str, pdl: &str) -> i64 {
        let created = self
            .post(
                "/api/properties/",
                token,
                serde_json::json!({ "label": "Flat A", "address": "1 Rue X", "pdl": pdl }),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{}", created.text);
        created.body["id"].as_i64().unwrap()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}
