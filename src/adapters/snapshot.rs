use crate::domain::model::{
    Address, CreateAddressParams, CreateEnrollmentParams, Enrollment, EnrollmentWithAddresses,
    UpdateAddressParams, UpdateEnrollmentParams,
};
use crate::utils::error::{EnrollmentError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full store contents. Enrollments are unique per `userId`, addresses unique per `enrollmentId`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    last_enrollment_id: i32,
    #[serde(default)]
    last_address_id: i32,
}

impl StoreSnapshot {
    pub fn find_with_addresses(&self, user_id: i32) -> Option<EnrollmentWithAddresses> {
        let enrollment = self
            .enrollments
            .iter()
            .find(|enrollment| enrollment.user_id == user_id)?
            .clone();

        let addresses = self
            .addresses
            .iter()
            .filter(|address| address.enrollment_id == enrollment.id)
            .cloned()
            .collect();

        Some(EnrollmentWithAddresses {
            enrollment,
            addresses,
        })
    }

    pub fn upsert_enrollment(
        &mut self,
        user_id: i32,
        create: CreateEnrollmentParams,
        update: UpdateEnrollmentParams,
        now: DateTime<Utc>,
    ) -> Enrollment {
        if let Some(existing) = self
            .enrollments
            .iter_mut()
            .find(|enrollment| enrollment.user_id == user_id)
        {
            existing.name = update.name;
            existing.cpf = update.cpf;
            existing.birthday = update.birthday;
            existing.phone = update.phone;
            existing.updated_at = now;
            return existing.clone();
        }

        self.last_enrollment_id += 1;
        let enrollment = Enrollment {
            id: self.last_enrollment_id,
            name: create.name,
            cpf: create.cpf,
            birthday: create.birthday,
            phone: create.phone,
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.enrollments.push(enrollment.clone());
        enrollment
    }

    pub fn upsert_address(
        &mut self,
        enrollment_id: i32,
        create: CreateAddressParams,
        update: UpdateAddressParams,
        now: DateTime<Utc>,
    ) -> Result<Address> {
        if !self
            .enrollments
            .iter()
            .any(|enrollment| enrollment.id == enrollment_id)
        {
            return Err(EnrollmentError::InvalidField {
                field: "enrollmentId".to_string(),
                reason: format!("no enrollment with id {}", enrollment_id),
            });
        }

        if let Some(existing) = self
            .addresses
            .iter_mut()
            .find(|address| address.enrollment_id == enrollment_id)
        {
            existing.cep = update.cep;
            existing.street = update.street;
            existing.city = update.city;
            existing.state = update.state;
            existing.number = update.number;
            existing.neighborhood = update.neighborhood;
            // 省略的 addressDetail 不覆寫既有值
            if let Some(detail) = update.address_detail {
                existing.address_detail = Some(detail);
            }
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        self.last_address_id += 1;
        let address = Address {
            id: self.last_address_id,
            cep: create.cep,
            street: create.street,
            city: create.city,
            state: create.state,
            number: create.number,
            neighborhood: create.neighborhood,
            address_detail: create.address_detail,
            enrollment_id,
            created_at: now,
            updated_at: now,
        };
        self.addresses.push(address.clone());
        Ok(address)
    }
}
