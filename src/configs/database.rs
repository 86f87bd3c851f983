use serde::Deserialize;

/// 데이터베이스 접속 정보
///
/// 비밀번호는 설정 파일이 아닌 환경 변수로만 전달 되며, 설정 되지 않은 경우 빈 문자열이 된다.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    host: String,
    port: u16,
    username: String,
    #[serde(default)]
    password: String,
    dbname: String,
}

impl DatabaseConfig {
    pub fn new(host: &str, port: u16, username: &str, password: &str, dbname: &str) -> Self {
        Self {
            host: host.to_owned(),
            port,
            username: username.to_owned(),
            password: password.to_owned(),
            dbname: dbname.to_owned(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn dbname(&self) -> &str {
        &self.dbname
    }

    /// libpq 키워드/값 형식의 접속 문자열을 만든다.
    /// 모든 값은 작은따옴표로 감싸며 값 안의 `\`와 `'`는 이스케이프 한다.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            quote(&self.host),
            self.port,
            quote(&self.username),
            quote(&self.password),
            quote(&self.dbname)
        )
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_string_quotes_every_value() {
        let db = DatabaseConfig::new("localhost", 5432, "library_user", "secret", "library_db");

        assert_eq!(
            db.connection_string(),
            "host='localhost' port=5432 user='library_user' password='secret' dbname='library_db'"
        );
    }

    #[test]
    fn connection_string_keeps_empty_password() {
        let db = DatabaseConfig::new("db.local", 6543, "reader", "", "books");

        assert!(db.connection_string().contains("password=''"));
    }

    #[test]
    fn connection_string_escapes_quotes_and_backslashes() {
        let db = DatabaseConfig::new("localhost", 5432, "user", r"it's a \ pass word", "library_db");

        assert!(db.connection_string().contains(r"password='it\'s a \\ pass word'"));
    }
}
