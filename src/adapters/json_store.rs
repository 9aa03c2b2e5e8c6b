use crate::adapters::snapshot::StoreSnapshot;
use crate::domain::model::{
    Address, CreateAddressParams, CreateEnrollmentParams, Enrollment, EnrollmentWithAddresses,
    UpdateAddressParams, UpdateEnrollmentParams,
};
use crate::domain::ports::{AddressRepository, EnrollmentRepository, Storage};
use crate::utils::error::{EnrollmentError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_FILE_NAME: &str = "enrollments.json";

/// Repositories persisted as one JSON snapshot written through a [`Storage`].
///
/// Every call reads the whole snapshot and every write rewrites it. Clones share the lock,
/// so writes from one process never interleave.
pub struct JsonFileStore<S: Storage> {
    storage: Arc<S>,
    file_name: String,
    lock: Arc<Mutex<()>>,
}

impl<S: Storage> Clone for JsonFileStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            file_name: self.file_name.clone(),
            lock: Arc::clone(&self.lock),
        }
    }
}

impl<S: Storage> JsonFileStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_file_name(storage, DEFAULT_FILE_NAME)
    }

    pub fn with_file_name(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage: Arc::new(storage),
            file_name: file_name.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub(crate) async fn load(&self) -> Result<StoreSnapshot> {
        match self.storage.read_file(&self.file_name).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(EnrollmentError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No snapshot at {}, starting empty", self.file_name);
                Ok(StoreSnapshot::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        let data = serde_json::to_vec_pretty(snapshot)?;
        tracing::debug!("Writing snapshot ({} bytes) to {}", data.len(), self.file_name);
        self.storage.write_file(&self.file_name, &data).await
    }
}

#[async_trait]
impl<S: Storage> EnrollmentRepository for JsonFileStore<S> {
    async fn find_with_address_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<EnrollmentWithAddresses>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.find_with_addresses(user_id))
    }

    async fn upsert(
        &self,
        user_id: i32,
        create: CreateEnrollmentParams,
        update: UpdateEnrollmentParams,
    ) -> Result<Enrollment> {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.load().await?;
        let enrollment = snapshot.upsert_enrollment(user_id, create, update, Utc::now());
        self.save(&snapshot).await?;
        Ok(enrollment)
    }
}

#[async_trait]
impl<S: Storage> AddressRepository for JsonFileStore<S> {
    async fn upsert(
        &self,
        enrollment_id: i32,
        create: CreateAddressParams,
        update: UpdateAddressParams,
    ) -> Result<Address> {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.load().await?;
        let address = snapshot.upsert_address(enrollment_id, create, update, Utc::now())?;
        self.save(&snapshot).await?;
        Ok(address)
    }
}
