use crate::core::cep::ViaCepClient;
use crate::core::{
    AddressInfo, AddressRepository, EnrollmentRepository, EnrollmentView,
    EnrollmentWithAddressInput,
};
use crate::domain::model::CreateEnrollmentParams;
use crate::utils::error::{EnrollmentError, Result};
use chrono::{DateTime, NaiveDate, Utc};

pub struct EnrollmentService<E: EnrollmentRepository, A: AddressRepository> {
    enrollments: E,
    addresses: A,
    cep_client: ViaCepClient,
}

impl<E: EnrollmentRepository, A: AddressRepository> EnrollmentService<E, A> {
    pub fn new(enrollments: E, addresses: A, cep_client: ViaCepClient) -> Self {
        Self {
            enrollments,
            addresses,
            cep_client,
        }
    }

    pub async fn get_address_from_cep(&self, cep: &str) -> Result<AddressInfo> {
        self.cep_client.get_address_from_cep(cep).await
    }

    pub async fn get_one_with_address_by_user_id(&self, user_id: i32) -> Result<EnrollmentView> {
        tracing::debug!("Loading enrollment for user {}", user_id);

        let record = self
            .enrollments
            .find_with_address_by_user_id(user_id)
            .await?
            .ok_or(EnrollmentError::BadRequest)?;

        Ok(EnrollmentView::from(record))
    }

    /// Validates the address CEP, then upserts the enrollment and its address in that order.
    ///
    /// The two writes are not atomic: if the address upsert fails the enrollment stays written.
    pub async fn create_or_update_enrollment_with_address(
        &self,
        params: EnrollmentWithAddressInput,
    ) -> Result<()> {
        let enrollment = CreateEnrollmentParams {
            name: params.name,
            cpf: params.cpf,
            birthday: parse_birthday(&params.birthday)?,
            phone: params.phone,
            user_id: params.user_id,
        };
        let address = params.address.to_upsert_params();

        // 只用來驗證 CEP，查詢結果不寫入地址
        self.cep_client.get_address_from_cep(&address.cep).await?;

        let update = enrollment.to_update();
        let saved = self
            .enrollments
            .upsert(params.user_id, enrollment, update)
            .await?;
        tracing::debug!(
            "Upserted enrollment {} for user {}",
            saved.id,
            params.user_id
        );

        let stored = self
            .addresses
            .upsert(saved.id, address.clone(), address)
            .await?;
        tracing::debug!("Upserted address {} for enrollment {}", stored.id, saved.id);

        Ok(())
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_birthday(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .ok_or_else(|| EnrollmentError::InvalidField {
            field: "birthday".to_string(),
            reason: format!("'{}' is not a valid date", value),
        })
}
