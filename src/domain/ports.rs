use crate::domain::model::{
    Address, CreateAddressParams, CreateEnrollmentParams, Enrollment, EnrollmentWithAddresses,
    UpdateAddressParams, UpdateEnrollmentParams,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn via_cep_api(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn data_dir(&self) -> &str;
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn find_with_address_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<EnrollmentWithAddresses>>;

    /// Inserts `create` when no enrollment exists for `user_id`, otherwise applies `update`.
    async fn upsert(
        &self,
        user_id: i32,
        create: CreateEnrollmentParams,
        update: UpdateEnrollmentParams,
    ) -> Result<Enrollment>;
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn upsert(
        &self,
        enrollment_id: i32,
        create: CreateAddressParams,
        update: UpdateAddressParams,
    ) -> Result<Address>;
}
