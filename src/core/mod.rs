pub mod cep;
pub mod enrollments;

pub use crate::domain::model::{
    AddressInfo, EnrollmentView, EnrollmentWithAddressInput, ViaCepResponse,
};
pub use crate::domain::ports::{AddressRepository, ConfigProvider, EnrollmentRepository, Storage};
pub use crate::utils::error::Result;
