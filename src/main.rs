use clap::Parser;
use enrollments::config::Command;
use enrollments::core::ConfigProvider;
use enrollments::domain::model::EnrollmentWithAddressInput;
use enrollments::utils::logger::{self, LogFormat};
use enrollments::{
    AppConfig, CliConfig, EnrollmentError, EnrollmentService, JsonFileStore, LocalStorage,
    ViaCepClient,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(LogFormat::from_json_flag(cli.json_logs), cli.verbose);

    tracing::info!("Starting enrollments CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!("❌ Command failed: {} ({})", e, e.name());

        let error = e.to_application_error();
        match serde_json::to_string(&error) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", e),
        }

        // 根據錯誤種類決定退出碼
        let exit_code = if e.is_client_error() {
            1
        } else if matches!(
            e,
            EnrollmentError::ConfigError { .. }
                | EnrollmentError::ConfigValidationError { .. }
                | EnrollmentError::InvalidConfigValueError { .. }
        ) {
            3
        } else {
            2
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: &CliConfig) -> enrollments::Result<()> {
    let config = cli.resolve()?;
    let service = build_service(&config)?;

    match &cli.command {
        Command::Cep { cep } => {
            let address = service.get_address_from_cep(cep).await?;
            println!("{}", serde_json::to_string_pretty(&address)?);
        }
        Command::Show { user_id } => {
            let enrollment = service.get_one_with_address_by_user_id(*user_id).await?;
            println!("{}", serde_json::to_string_pretty(&enrollment)?);
        }
        Command::Upsert { input } => {
            let content = tokio::fs::read(input).await?;
            let params: EnrollmentWithAddressInput = serde_json::from_slice(&content)?;
            let user_id = params.user_id;

            service
                .create_or_update_enrollment_with_address(params)
                .await?;
            tracing::info!("✅ Enrollment saved for user {}", user_id);

            let enrollment = service.get_one_with_address_by_user_id(user_id).await?;
            println!("{}", serde_json::to_string_pretty(&enrollment)?);
        }
    }

    Ok(())
}

type FileService = EnrollmentService<JsonFileStore<LocalStorage>, JsonFileStore<LocalStorage>>;

fn build_service(config: &AppConfig) -> enrollments::Result<FileService> {
    let storage = LocalStorage::new(config.data_dir().to_string());
    let store = JsonFileStore::with_file_name(storage, config.file_name());
    let cep_client = ViaCepClient::from_config(config)?;

    tracing::debug!(
        "Using ViaCEP at {} and data dir {}",
        cep_client.base_url(),
        config.data_dir()
    );

    Ok(EnrollmentService::new(store.clone(), store, cep_client))
}
