//! Shared fakes and fixtures for handler tests

use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

use crate::config::Settings;
use crate::db::models::{Billboard, Store};
use crate::db::{BillboardRecords, DbError, StoreRecords};
use crate::storage::{BlobDescriptor, BlobError, BlobStore};
use crate::AppState;

pub const SECRET: &str = "test-secret";
pub const BOUNDARY: &str = "handler-test-boundary";

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    exp: usize,
}

pub fn session_token(user_id: &str) -> String {
    encode(
        &Header::default(),
        &TestClaims {
            sub: user_id.to_string(),
            exp: (Utc::now().timestamp() + 3600) as usize,
        },
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn store(id: &str, user_id: &str) -> Store {
    Store {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: format!("{} store", id),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn billboard(id: &str, store_id: &str, label: &str, image_url: &str) -> Billboard {
    Billboard {
        id: id.to_string(),
        store_id: store_id.to_string(),
        label: label.to_string(),
        image_url: image_url.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub struct MemoryStores {
    pub stores: Vec<Store>,
}

#[async_trait]
impl StoreRecords for MemoryStores {
    async fn find_for_user(
        &self,
        store_id: &str,
        user_id: &str,
    ) -> Result<Option<Store>, DbError> {
        Ok(self
            .stores
            .iter()
            .find(|s| s.id == store_id && s.user_id == user_id)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryBillboards {
    pub rows: Mutex<Vec<Billboard>>,
}

impl MemoryBillboards {
    pub fn rows(&self) -> Vec<Billboard> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl BillboardRecords for MemoryBillboards {
    async fn find_in_store(
        &self,
        billboard_id: &str,
        store_id: &str,
    ) -> Result<Option<Billboard>, DbError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == billboard_id && b.store_id == store_id)
            .cloned())
    }

    async fn list_for_store(&self, store_id: &str) -> Result<Vec<Billboard>, DbError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        store_id: &str,
        label: &str,
        image_url: &str,
    ) -> Result<Billboard, DbError> {
        let billboard = Billboard {
            id: Uuid::new_v4().to_string(),
            store_id: store_id.to_string(),
            label: label.to_string(),
            image_url: image_url.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(billboard.clone());
        Ok(billboard)
    }

    async fn image_url(&self, billboard_id: &str) -> Result<Option<String>, DbError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == billboard_id)
            .map(|b| b.image_url.clone()))
    }

    async fn update(
        &self,
        billboard_id: &str,
        label: &str,
        image_url: &str,
    ) -> Result<u64, DbError> {
        let mut rows = self.rows.lock().unwrap();
        let mut count = 0;
        for b in rows.iter_mut().filter(|b| b.id == billboard_id) {
            b.label = label.to_string();
            b.image_url = image_url.to_string();
            b.updated_at = Utc::now();
            count += 1;
        }
        Ok(count)
    }

    async fn delete(&self, billboard_id: &str) -> Result<u64, DbError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| b.id != billboard_id);
        Ok((before - rows.len()) as u64)
    }
}

/// One observed call against the blob store fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobCall {
    Put(String),
    Delete(String),
}

#[derive(Default)]
pub struct RecordingBlobStore {
    calls: Mutex<Vec<BlobCall>>,
}

impl RecordingBlobStore {
    pub fn calls(&self) -> Vec<BlobCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    async fn put(
        &self,
        filename: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<BlobDescriptor, BlobError> {
        self.calls
            .lock()
            .unwrap()
            .push(BlobCall::Put(filename.to_string()));
        Ok(BlobDescriptor {
            url: format!("https://blobs.test/{}", filename),
            pathname: format!("uploads/{}", filename),
            content_type: content_type.to_string(),
            size: data.len() as u64,
        })
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        self.calls
            .lock()
            .unwrap()
            .push(BlobCall::Delete(url.to_string()));
        Ok(())
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub billboards: Arc<MemoryBillboards>,
    pub blob: Arc<RecordingBlobStore>,
}

pub fn test_state(stores: Vec<Store>, rows: Vec<Billboard>) -> TestContext {
    let mut settings = Settings::default();
    settings.auth.session_secret = SECRET.to_string();
    settings.uploads.max_bytes = 1024 * 1024;

    let billboards = Arc::new(MemoryBillboards {
        rows: Mutex::new(rows),
    });
    let blob = Arc::new(RecordingBlobStore::default());

    let state = web::Data::new(AppState {
        settings,
        stores: Arc::new(MemoryStores { stores }),
        billboards: billboards.clone(),
        blob: blob.clone(),
    });

    TestContext {
        state,
        billboards,
        blob,
    }
}

pub fn text_part(name: &str, value: &str) -> Vec<u8> {
    format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
        BOUNDARY, name, value
    )
    .into_bytes()
}

pub fn file_part(name: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut part = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
        BOUNDARY, name, filename, content_type
    )
    .into_bytes();
    part.extend_from_slice(data);
    part.extend_from_slice(b"\r\n");
    part
}

pub fn multipart_body(parts: Vec<Vec<u8>>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(&part);
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
