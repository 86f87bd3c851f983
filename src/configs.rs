mod database;
pub mod logging;

pub use database::DatabaseConfig;

use serde::Deserialize;
use std::env;

/// 데이터베이스 비밀번호를 읽어올 환경 변수
pub const PASSWORD_ENV: &str = "BOOKSHELF_DB_PASSWORD";

const ENV_PREFIX: &str = "BOOKSHELF";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    db: DatabaseConfig,
    logger: Option<logging::Config>,
}

impl AppConfig {
    pub fn db(&self) -> &DatabaseConfig {
        &self.db
    }

    pub fn logger(&self) -> Option<&logging::Config> {
        self.logger.as_ref()
    }
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

/// 실행 환경(`RUN_MODE`, 기본값 development)에 맞는 설정을 읽는다.
pub fn load_config() -> Result<AppConfig, config::ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
    let password = env::var(PASSWORD_ENV).ok();

    build_config(&run_mode, password)
}

/// 설정 값은 다음 순서로 덮어 쓴다.
///
/// 1. 기본값 (`localhost:5432`, `library_db`, `library_user`)
/// 2. `config/{run_mode}.json` (없어도 됨)
/// 3. `BOOKSHELF_` 접두어 환경 변수 (예: `BOOKSHELF_DB__HOST`)
/// 4. 비밀번호, 전달 되지 않으면 빈 문자열
pub fn build_config(run_mode: &str, password: Option<String>) -> Result<AppConfig, config::ConfigError> {
    let config = config::Config::builder()
        .set_default("db.host", "localhost")?
        .set_default("db.port", 5432)?
        .set_default("db.username", "library_user")?
        .set_default("db.dbname", "library_db")?
        .add_source(config::File::with_name(&format!("config/{}.json", run_mode)).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
        )
        .set_override("db.password", password.unwrap_or_default())?
        .build()?;

    config.try_deserialize()
}
