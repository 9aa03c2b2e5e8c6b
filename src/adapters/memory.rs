use crate::adapters::snapshot::StoreSnapshot;
use crate::domain::model::{
    Address, CreateAddressParams, CreateEnrollmentParams, Enrollment, EnrollmentWithAddresses,
    UpdateAddressParams, UpdateEnrollmentParams,
};
use crate::domain::ports::{AddressRepository, EnrollmentRepository};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-local store. Clones share the same data, so one instance can back both repositories.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreSnapshot>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(snapshot)),
        }
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn find_with_address_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<EnrollmentWithAddresses>> {
        let state = self.state.lock().await;
        Ok(state.find_with_addresses(user_id))
    }

    async fn upsert(
        &self,
        user_id: i32,
        create: CreateEnrollmentParams,
        update: UpdateEnrollmentParams,
    ) -> Result<Enrollment> {
        let mut state = self.state.lock().await;
        Ok(state.upsert_enrollment(user_id, create, update, Utc::now()))
    }
}

#[async_trait]
impl AddressRepository for InMemoryStore {
    async fn upsert(
        &self,
        enrollment_id: i32,
        create: CreateAddressParams,
        update: UpdateAddressParams,
    ) -> Result<Address> {
        let mut state = self.state.lock().await;
        state.upsert_address(enrollment_id, create, update, Utc::now())
    }
}
