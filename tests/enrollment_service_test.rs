use async_trait::async_trait;
use enrollments::domain::model::{
    Address, AddressInput, CreateAddressParams, CreateEnrollmentParams, Enrollment,
    EnrollmentWithAddressInput, EnrollmentWithAddresses, UpdateAddressParams,
    UpdateEnrollmentParams,
};
use enrollments::domain::ports::{AddressRepository, EnrollmentRepository};
use enrollments::{EnrollmentError, EnrollmentService, InMemoryStore, Result, ViaCepClient};
use httpmock::prelude::*;
use std::sync::{Arc, Mutex};

/// In-memory store that remembers every repository call.
#[derive(Clone, Default)]
struct RecordingStore {
    inner: InMemoryStore,
    calls: Arc<Mutex<Vec<String>>>,
    address_payloads: Arc<Mutex<Vec<CreateAddressParams>>>,
}

impl RecordingStore {
    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn address_payloads(&self) -> Vec<CreateAddressParams> {
        self.address_payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl EnrollmentRepository for RecordingStore {
    async fn find_with_address_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<EnrollmentWithAddresses>> {
        self.record("enrollment.find");
        self.inner.find_with_address_by_user_id(user_id).await
    }

    async fn upsert(
        &self,
        user_id: i32,
        create: CreateEnrollmentParams,
        update: UpdateEnrollmentParams,
    ) -> Result<Enrollment> {
        self.record("enrollment.upsert");
        EnrollmentRepository::upsert(&self.inner, user_id, create, update).await
    }
}

#[async_trait]
impl AddressRepository for RecordingStore {
    async fn upsert(
        &self,
        enrollment_id: i32,
        create: CreateAddressParams,
        update: UpdateAddressParams,
    ) -> Result<Address> {
        self.record("address.upsert");
        self.address_payloads.lock().unwrap().push(create.clone());
        AddressRepository::upsert(&self.inner, enrollment_id, create, update).await
    }
}

/// Address repository that always fails, to observe the non-atomic write order.
#[derive(Clone, Default)]
struct FailingAddressRepository;

#[async_trait]
impl AddressRepository for FailingAddressRepository {
    async fn upsert(
        &self,
        _enrollment_id: i32,
        _create: CreateAddressParams,
        _update: UpdateAddressParams,
    ) -> Result<Address> {
        Err(EnrollmentError::IoError(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }
}

fn via_cep_body() -> serde_json::Value {
    serde_json::json!({
        "cep": "01001-000",
        "logradouro": "Praça da Sé",
        "complemento": "lado ímpar",
        "bairro": "Sé",
        "localidade": "São Paulo",
        "uf": "SP",
        "ibge": "3550308",
        "gia": "1004",
        "ddd": "11",
        "siafi": "7107"
    })
}

fn enrollment_input(user_id: i32, cep: &str, detail: Option<&str>) -> EnrollmentWithAddressInput {
    EnrollmentWithAddressInput {
        name: "Maria Silva".to_string(),
        cpf: "12345678909".to_string(),
        birthday: "1990-05-20T00:00:00.000Z".to_string(),
        phone: "21999998888".to_string(),
        user_id,
        address: AddressInput {
            cep: cep.to_string(),
            street: "Praça da Sé".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            number: "100".to_string(),
            neighborhood: "Sé".to_string(),
            address_detail: detail.map(str::to_string),
        },
    }
}

async fn valid_cep_server() -> MockServer {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/01001000/json/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(via_cep_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/99999999/json/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({ "erro": true }));
        })
        .await;
    server
}

fn service_for(
    server: &MockServer,
    store: &RecordingStore,
) -> EnrollmentService<RecordingStore, RecordingStore> {
    EnrollmentService::new(
        store.clone(),
        store.clone(),
        ViaCepClient::new(server.base_url()),
    )
}

#[tokio::test]
async fn test_service_resolves_cep() {
    let server = valid_cep_server().await;
    let store = RecordingStore::default();
    let service = service_for(&server, &store);

    let address = service.get_address_from_cep("01001000").await.unwrap();
    assert_eq!(address.cidade, "São Paulo");

    let result = service.get_address_from_cep("99999999").await;
    assert!(matches!(result, Err(EnrollmentError::BadRequest)));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_user_is_bad_request() {
    let server = valid_cep_server().await;
    let store = RecordingStore::default();
    let service = service_for(&server, &store);

    let result = service.get_one_with_address_by_user_id(404).await;

    assert!(matches!(result, Err(EnrollmentError::BadRequest)));
    assert_eq!(
        result.unwrap_err().to_application_error().name,
        "badRequestError"
    );
}

#[tokio::test]
async fn test_enrollment_without_address_has_no_address_key() {
    let server = valid_cep_server().await;
    let store = RecordingStore::default();
    let create = CreateEnrollmentParams {
        name: "João".to_string(),
        cpf: "98765432100".to_string(),
        birthday: enrollments::core::enrollments::parse_birthday("1985-01-02").unwrap(),
        phone: "11988887777".to_string(),
        user_id: 5,
    };
    let update = create.to_update();
    EnrollmentRepository::upsert(&store.inner, 5, create, update)
        .await
        .unwrap();

    let service = service_for(&server, &store);
    let view = service.get_one_with_address_by_user_id(5).await.unwrap();

    assert!(view.address.is_none());
    let json = serde_json::to_value(&view).unwrap();
    let object = json.as_object().unwrap();
    for hidden in ["address", "userId", "createdAt", "updatedAt"] {
        assert!(!object.contains_key(hidden), "unexpected key {}", hidden);
    }
    assert_eq!(object["name"], "João");
}

#[tokio::test]
async fn test_enrollment_with_address_hides_internal_fields() {
    let server = valid_cep_server().await;
    let store = RecordingStore::default();
    let service = service_for(&server, &store);

    service
        .create_or_update_enrollment_with_address(enrollment_input(42, "01001000", Some("Apto 12")))
        .await
        .unwrap();

    let view = service.get_one_with_address_by_user_id(42).await.unwrap();
    let json = serde_json::to_value(&view).unwrap();

    let object = json.as_object().unwrap();
    for hidden in ["userId", "createdAt", "updatedAt"] {
        assert!(!object.contains_key(hidden), "unexpected key {}", hidden);
    }

    let address = object["address"].as_object().unwrap();
    for hidden in ["createdAt", "updatedAt", "enrollmentId"] {
        assert!(!address.contains_key(hidden), "unexpected key {}", hidden);
    }
    assert_eq!(address["addressDetail"], "Apto 12");
    assert_eq!(address["cep"], "01001000");
}

#[tokio::test]
async fn test_invalid_cep_blocks_persistence() {
    let server = valid_cep_server().await;
    let store = RecordingStore::default();
    let service = service_for(&server, &store);

    let unknown = service
        .create_or_update_enrollment_with_address(enrollment_input(42, "99999999", None))
        .await;
    assert!(matches!(unknown, Err(EnrollmentError::BadRequest)));

    let short = service
        .create_or_update_enrollment_with_address(enrollment_input(42, "0100100", None))
        .await;
    assert!(matches!(short, Err(EnrollmentError::BadRequest)));

    assert!(store.calls().is_empty());
    assert!(store.inner.snapshot().await.enrollments.is_empty());
}

#[tokio::test]
async fn test_invalid_birthday_blocks_lookup_and_persistence() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(via_cep_body());
        })
        .await;
    let store = RecordingStore::default();
    let service = service_for(&server, &store);

    let mut input = enrollment_input(42, "01001000", None);
    input.birthday = "twentieth of may".to_string();
    let result = service.create_or_update_enrollment_with_address(input).await;

    assert!(matches!(result, Err(EnrollmentError::InvalidField { .. })));
    assert_eq!(api_mock.hits_async().await, 0);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_missing_detail_is_omitted_from_persisted_address() {
    let server = valid_cep_server().await;
    let store = RecordingStore::default();
    let service = service_for(&server, &store);

    service
        .create_or_update_enrollment_with_address(enrollment_input(42, "01001000", None))
        .await
        .unwrap();
    service
        .create_or_update_enrollment_with_address(enrollment_input(43, "01001000", Some("")))
        .await
        .unwrap();

    let payloads = store.address_payloads();
    assert_eq!(payloads.len(), 2);
    for payload in payloads {
        assert_eq!(payload.address_detail, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("addressDetail").is_none());
    }

    let snapshot = store.inner.snapshot().await;
    for address in &snapshot.addresses {
        let json = serde_json::to_value(address).unwrap();
        assert!(json.get("addressDetail").is_none());
    }
}

#[tokio::test]
async fn test_repeated_upsert_keeps_single_records() {
    let server = valid_cep_server().await;
    let store = RecordingStore::default();
    let service = service_for(&server, &store);

    service
        .create_or_update_enrollment_with_address(enrollment_input(42, "01001000", Some("Apto 1")))
        .await
        .unwrap();

    let mut second = enrollment_input(42, "01001000", None);
    second.name = "Maria Souza".to_string();
    second.address.number = "200".to_string();
    service
        .create_or_update_enrollment_with_address(second)
        .await
        .unwrap();

    let snapshot = store.inner.snapshot().await;
    assert_eq!(snapshot.enrollments.len(), 1);
    assert_eq!(snapshot.addresses.len(), 1);
    assert_eq!(snapshot.enrollments[0].name, "Maria Souza");
    assert_eq!(snapshot.addresses[0].number, "200");
    assert_eq!(snapshot.addresses[0].address_detail.as_deref(), Some("Apto 1"));
    assert_eq!(snapshot.addresses[0].enrollment_id, snapshot.enrollments[0].id);

    assert_eq!(
        store.calls(),
        vec![
            "enrollment.upsert",
            "address.upsert",
            "enrollment.upsert",
            "address.upsert"
        ]
    );
}

#[tokio::test]
async fn test_address_failure_leaves_enrollment_written() {
    let server = valid_cep_server().await;
    let store = InMemoryStore::new();
    let service = EnrollmentService::new(
        store.clone(),
        FailingAddressRepository,
        ViaCepClient::new(server.base_url()),
    );

    let result = service
        .create_or_update_enrollment_with_address(enrollment_input(42, "01001000", None))
        .await;

    assert!(matches!(result, Err(EnrollmentError::IoError(_))));
    let view = service.get_one_with_address_by_user_id(42).await.unwrap();
    assert!(view.address.is_none());
}
