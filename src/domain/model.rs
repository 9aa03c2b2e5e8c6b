use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i32,
    pub name: String,
    pub cpf: String,
    pub birthday: DateTime<Utc>,
    pub phone: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: i32,
    pub cep: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub number: String,
    pub neighborhood: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_detail: Option<String>,
    pub enrollment_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Enrollment joined with its addresses, as the repository returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentWithAddresses {
    pub enrollment: Enrollment,
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentParams {
    pub name: String,
    pub cpf: String,
    pub birthday: DateTime<Utc>,
    pub phone: String,
    pub user_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnrollmentParams {
    pub name: String,
    pub cpf: String,
    pub birthday: DateTime<Utc>,
    pub phone: String,
}

impl CreateEnrollmentParams {
    /// 更新時使用的欄位：與建立相同，但不含 userId
    pub fn to_update(&self) -> UpdateEnrollmentParams {
        UpdateEnrollmentParams {
            name: self.name.clone(),
            cpf: self.cpf.clone(),
            birthday: self.birthday,
            phone: self.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressParams {
    pub cep: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub number: String,
    pub neighborhood: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_detail: Option<String>,
}

pub type UpdateAddressParams = CreateAddressParams;

/// Address payload as sent by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub cep: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub number: String,
    pub neighborhood: String,
    #[serde(default)]
    pub address_detail: Option<String>,
}

impl AddressInput {
    /// Projects the payload for persistence. An empty detail is dropped, never stored as "".
    pub fn to_upsert_params(&self) -> CreateAddressParams {
        CreateAddressParams {
            cep: self.cep.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            number: self.number.clone(),
            neighborhood: self.neighborhood.clone(),
            address_detail: self
                .address_detail
                .as_ref()
                .filter(|detail| !detail.is_empty())
                .cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWithAddressInput {
    pub name: String,
    pub cpf: String,
    pub birthday: String,
    pub phone: String,
    pub user_id: i32,
    pub address: AddressInput,
}

/// Public representation of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
    pub id: i32,
    pub cep: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub number: String,
    pub neighborhood: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_detail: Option<String>,
}

impl From<Address> for AddressView {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            cep: address.cep,
            street: address.street,
            city: address.city,
            state: address.state,
            number: address.number,
            neighborhood: address.neighborhood,
            address_detail: address.address_detail,
        }
    }
}

/// Public representation of an enrollment: no owner, no timestamps, at most one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentView {
    pub id: i32,
    pub name: String,
    pub cpf: String,
    pub birthday: DateTime<Utc>,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressView>,
}

impl From<EnrollmentWithAddresses> for EnrollmentView {
    fn from(record: EnrollmentWithAddresses) -> Self {
        let EnrollmentWithAddresses {
            enrollment,
            addresses,
        } = record;

        Self {
            id: enrollment.id,
            name: enrollment.name,
            cpf: enrollment.cpf,
            birthday: enrollment.birthday,
            phone: enrollment.phone,
            address: addresses.into_iter().next().map(AddressView::from),
        }
    }
}

/// ViaCEP 回傳的原始格式
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViaCepResponse {
    #[serde(deserialize_with = "null_as_empty")]
    pub cep: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub logradouro: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub complemento: String,
    pub unidade: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub bairro: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub localidade: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub uf: String,
    pub estado: Option<String>,
    pub regiao: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub ibge: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub gia: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub ddd: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub siafi: String,
    #[serde(deserialize_with = "deserialize_erro")]
    pub erro: bool,
}

// ViaCEP 對沒有值的欄位有時回傳 null
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// 舊版 API 回傳 `true`，新版回傳 `"true"`
fn deserialize_erro<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(flag) => flag,
        serde_json::Value::String(text) => text.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Address data resolved from a CEP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressInfo {
    pub logradouro: String,
    pub complemento: String,
    pub bairro: String,
    pub uf: String,
    pub cidade: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unidade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regiao: Option<String>,
}

impl From<ViaCepResponse> for AddressInfo {
    fn from(response: ViaCepResponse) -> Self {
        Self {
            logradouro: response.logradouro,
            complemento: response.complemento,
            bairro: response.bairro,
            uf: response.uf,
            cidade: response.localidade,
            unidade: response.unidade,
            estado: response.estado,
            regiao: response.regiao,
        }
    }
}
