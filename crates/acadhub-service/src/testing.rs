//! In-memory fakes for the blob store and repositories, used by the
//! orchestrator tests. Failure injection flags let tests drive each
//! documented failure path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use acadhub_core::error::AppError;
use acadhub_core::result::AppResult;
use acadhub_core::traits::blobstore::{BlobStore, ObjectLinks, StoredObject};
use acadhub_database::repositories::{AuditSink, FileRecordStore, TagStore, UserStore};
use acadhub_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use acadhub_entity::file::{CreateFileRecord, FileRecord, FileRecordWithOwner};
use acadhub_entity::tag::Tag;
use acadhub_entity::user::{AccountType, CreateUser, User};

use crate::audit::AuditWriter;
use crate::context::RequestContext;
use crate::file::delete::DeletionService;
use crate::file::upload::UploadService;

/// A fresh request context for a distinct user.
pub fn test_context() -> RequestContext {
    RequestContext::new(Uuid::new_v4(), AccountType::Student, "Test User".to_string())
}

/// In-memory blob store with failure injection.
#[derive(Debug, Default)]
pub struct FakeBlobStore {
    objects: Mutex<HashMap<String, String>>,
    store_calls: AtomicUsize,
    fail_store: AtomicBool,
    fail_grant: AtomicBool,
    fail_resolve: AtomicBool,
    fail_delete: AtomicBool,
}

impl FakeBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_store(&self) {
        self.fail_store.store(true, Ordering::SeqCst);
    }

    pub fn fail_grant(&self) {
        self.fail_grant.store(true, Ordering::SeqCst);
    }

    pub fn fail_resolve(&self) {
        self.fail_resolve.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn contains(&self, remote_id: &str) -> bool {
        self.objects.lock().unwrap().contains_key(remote_id)
    }

    pub fn remote_ids(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Remove an object out-of-band, simulating deletion by a third party.
    pub fn remove_directly(&self, remote_id: &str) {
        self.objects.lock().unwrap().remove(remote_id);
    }
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    fn provider_type(&self) -> &str {
        "fake"
    }

    async fn store(
        &self,
        _data: Bytes,
        display_name: &str,
        _mime_type: &str,
    ) -> AppResult<StoredObject> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(AppError::upload_failed("fake store unavailable"));
        }

        let remote_id = format!("fake-{}", Uuid::new_v4().simple());
        self.objects
            .lock()
            .unwrap()
            .insert(remote_id.clone(), display_name.to_string());

        Ok(StoredObject {
            download_url: self.fallback_download_url(&remote_id),
            view_url: Some(self.fallback_view_url(&remote_id)),
            remote_id,
        })
    }

    async fn grant_public_read(&self, _remote_id: &str) -> AppResult<()> {
        if self.fail_grant.load(Ordering::SeqCst) {
            return Err(AppError::internal("fake permission grant failed"));
        }
        Ok(())
    }

    async fn resolve_links(&self, remote_id: &str) -> AppResult<ObjectLinks> {
        if self.fail_resolve.load(Ordering::SeqCst) {
            return Err(AppError::internal("fake link resolution failed"));
        }
        Ok(ObjectLinks {
            download_url: Some(format!("https://blob.test/resolved?download={remote_id}")),
            view_url: Some(format!("https://blob.test/resolved?view={remote_id}")),
        })
    }

    async fn delete_by_id(&self, remote_id: &str) -> AppResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::delete_failed("fake delete unavailable"));
        }
        match self.objects.lock().unwrap().remove(remote_id) {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(format!(
                "Remote object {remote_id} not found"
            ))),
        }
    }

    fn extract_remote_id(&self, file_url: &str) -> Option<String> {
        // Same shape as the drive client: first long run of id characters.
        let mut current = String::new();
        for c in file_url.chars() {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                current.push(c);
            } else {
                if current.len() >= 25 {
                    return Some(current);
                }
                current.clear();
            }
        }
        (current.len() >= 25).then_some(current)
    }

    fn fallback_download_url(&self, remote_id: &str) -> String {
        format!("https://blob.test/uc?export=download&id={remote_id}")
    }

    fn fallback_view_url(&self, remote_id: &str) -> String {
        format!("https://blob.test/file/d/{remote_id}/view")
    }
}

/// In-memory tag store.
#[derive(Debug, Default)]
pub struct InMemoryTagStore {
    tags: Mutex<Vec<Tag>>,
}

impl InMemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<String> {
        self.tags.lock().unwrap().iter().map(|t| t.name.clone()).collect()
    }

    fn name_of(&self, id: Uuid) -> Option<String> {
        self.tags
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.clone())
    }
}

#[async_trait]
impl TagStore for InMemoryTagStore {
    async fn find_or_create(&self, name: &str) -> AppResult<Tag> {
        let mut tags = self.tags.lock().unwrap();
        if let Some(existing) = tags.iter().find(|t| t.name == name) {
            return Ok(existing.clone());
        }
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tags.push(tag.clone());
        Ok(tag)
    }

    async fn list_names(&self) -> AppResult<Vec<String>> {
        let mut names = self.names();
        names.sort();
        Ok(names)
    }
}

/// In-memory file record store with failure injection.
#[derive(Debug)]
pub struct InMemoryFileStore {
    records: Mutex<HashMap<Uuid, (FileRecord, Vec<Uuid>)>>,
    tags: Arc<InMemoryTagStore>,
    fail_insert: AtomicBool,
}

impl InMemoryFileStore {
    pub fn new(tags: Arc<InMemoryTagStore>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            tags,
            fail_insert: AtomicBool::new(false),
        }
    }

    pub fn fail_insert(&self) {
        self.fail_insert.store(true, Ordering::SeqCst);
    }

    pub fn all_records(&self) -> Vec<FileRecord> {
        self.records
            .lock()
            .unwrap()
            .values()
            .map(|(r, _)| r.clone())
            .collect()
    }

    pub fn tag_names_for(&self, record_id: Uuid) -> Vec<String> {
        let records = self.records.lock().unwrap();
        let Some((_, tag_ids)) = records.get(&record_id) else {
            return vec![];
        };
        tag_ids
            .iter()
            .filter_map(|id| self.tags.name_of(*id))
            .collect()
    }

    pub fn overwrite_file_url(&self, record_id: Uuid, url: &str) {
        let mut records = self.records.lock().unwrap();
        if let Some((record, _)) = records.get_mut(&record_id) {
            record.file_url = url.to_string();
        }
    }

    fn with_owner(&self, record: &FileRecord, tag_ids: &[Uuid]) -> FileRecordWithOwner {
        FileRecordWithOwner {
            record: record.clone(),
            owner_name: "Test User".to_string(),
            owner_account_type: AccountType::Student,
            tags: tag_ids
                .iter()
                .filter_map(|id| self.tags.name_of(*id))
                .collect(),
        }
    }
}

#[async_trait]
impl FileRecordStore for InMemoryFileStore {
    async fn insert(&self, data: &CreateFileRecord) -> AppResult<FileRecord> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::database("fake database unavailable"));
        }
        let now = Utc::now();
        let record = FileRecord {
            id: Uuid::new_v4(),
            filename: data.filename.clone(),
            file_url: data.file_url.clone(),
            view_url: data.view_url.clone(),
            title: data.title.clone(),
            subject: data.subject.clone(),
            semester: data.semester.clone(),
            subject_code: data.subject_code.clone(),
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.records
            .lock()
            .unwrap()
            .insert(record.id, (record.clone(), data.tag_ids.clone()));
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&id)
            .map(|(r, _)| r.clone()))
    }

    async fn list_all(&self) -> AppResult<Vec<FileRecordWithOwner>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .map(|(r, tag_ids)| self.with_owner(r, tag_ids))
            .collect())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FileRecordWithOwner>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .filter(|(r, _)| r.owner_id == owner_id)
            .map(|(r, tag_ids)| self.with_owner(r, tag_ids))
            .collect())
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.records.lock().unwrap().remove(&id).is_some())
    }
}

/// In-memory audit sink with failure injection.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditLogEntry>>,
    fail: AtomicBool,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn append(&self, data: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::database("fake audit sink unavailable"));
        }
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            actor_id: data.actor_id,
            action: data.action,
            target_id: data.target_id,
            detail: data.detail.clone(),
            created_at: Utc::now(),
        };
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }
}

/// In-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == data.email) {
            return Err(AppError::conflict(
                "An account with this email already exists",
            ));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            account_type: data.account_type,
            name: data.name.clone(),
            email: data.email.clone(),
            enrollment_no: data.enrollment_no.clone(),
            semester: data.semester.clone(),
            password_hash: data.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

/// Bundles the fakes and wires services over them.
pub struct TestHarness {
    pub blob: Arc<FakeBlobStore>,
    pub files: Arc<InMemoryFileStore>,
    pub tags: Arc<InMemoryTagStore>,
    pub audit: Arc<InMemoryAuditSink>,
}

impl TestHarness {
    pub fn new() -> Self {
        let tags = Arc::new(InMemoryTagStore::new());
        Self {
            blob: Arc::new(FakeBlobStore::new()),
            files: Arc::new(InMemoryFileStore::new(tags.clone())),
            tags,
            audit: Arc::new(InMemoryAuditSink::new()),
        }
    }

    pub fn upload_service(&self) -> UploadService {
        UploadService::new(
            self.blob.clone(),
            self.files.clone(),
            self.tags.clone(),
            AuditWriter::new(self.audit.clone()),
        )
    }

    pub fn deletion_service(&self) -> DeletionService {
        DeletionService::new(
            self.blob.clone(),
            self.files.clone(),
            AuditWriter::new(self.audit.clone()),
        )
    }
}
