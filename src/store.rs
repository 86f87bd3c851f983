use crate::book::repo::{logging_with_default_vec, BookPgStore};
use crate::book::{parse_read_date, Book, BookRepository, InputError, NewBook, ReadState, RepositoryError};
use crate::configs::DatabaseConfig;
use chrono::NaiveDate;
use tracing::{debug, error, info};

/// 스토어 요청 실패
///
/// 입력 오류는 저장소에 도달하기 전에 거부 되며, 저장소 오류와 구분 되어 호출자가
/// 사용자에게 구체적인 안내를 할 수 있도록 한다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// 오늘 날짜를 반환하는 시계
pub type Clock = fn() -> NaiveDate;

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// 도서 기록 스토어
///
/// 네 가지 요청(목록, 등록, 독서 상태 변경, 독서일 변경)만 제공하며 각 요청은 하나의 행만
/// 변경하는 독립된 트랜잭션이다. 자동 재시도는 하지 않는다.
pub struct BookStore<R: BookRepository> {
    repository: R,
    clock: Clock,
}

impl BookStore<BookPgStore> {

    /// PostgreSQL에 연결된 스토어를 연다.
    ///
    /// 연결에 실패하면 에러를 로깅하고 연결 없는 스토어를 반환한다. 이 스토어의 모든 요청은
    /// [`RepositoryError::Disconnected`]로 실패하며 프로세스를 재시작 하기 전까지 복구 되지 않는다.
    pub fn open(db: &DatabaseConfig) -> Self {
        let repository = match BookPgStore::connect(&db.connection_string()) {
            Ok(repository) => {
                info!("데이터베이스에 연결 되었습니다. ({}:{}/{})", db.host(), db.port(), db.dbname());
                repository
            }
            Err(e) => {
                error!("데이터베이스 연결에 실패 하였습니다. ({}:{}/{}) => {}", db.host(), db.port(), db.dbname(), e);
                BookPgStore::disconnected()
            }
        };

        Self::new(repository)
    }

    pub fn is_connected(&self) -> bool {
        self.repository.is_connected()
    }
}

impl<R: BookRepository> BookStore<R> {
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, local_today)
    }

    pub fn with_clock(repository: R, clock: Clock) -> Self {
        Self { repository, clock }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// 모든 도서를 등록일 최신순으로 가져온다.
    ///
    /// 저장소 에러가 발생하면 에러를 로깅하고 빈 목록을 반환한다. 에러가 필요한 경우
    /// [`BookStore::try_list_all`]을 사용한다.
    pub fn list_all(&mut self) -> Vec<Book> {
        self.repository.find_all()
            .unwrap_or_else(|e| logging_with_default_vec(e))
    }

    pub fn try_list_all(&mut self) -> Result<Vec<Book>, StoreError> {
        self.repository.find_all()
            .map_err(|e| logging_storage_error("도서 목록 조회", e))
    }

    /// 신규 도서를 등록한다. 저자와 제목은 앞뒤 공백을 제거한 뒤 저장 된다.
    pub fn insert(&mut self, author: &str, title: &str) -> Result<Book, StoreError> {
        let book = NewBook::new(author, title)?;

        let saved = self.repository.insert(&book)
            .map_err(|e| logging_storage_error("도서 등록", e))?;

        debug!("도서가 등록 되었습니다. (ID: {}, {})", saved.id(), saved);
        Ok(saved)
    }

    /// 읽음으로 변경하면 독서일은 오늘이 되고, 읽지 않음으로 변경하면 독서일은 지워진다.
    /// 존재하지 않는 아이디는 아무것도 변경하지 않고 성공한다.
    pub fn set_read_status(&mut self, id: i64, is_read: bool) -> Result<(), StoreError> {
        let state = if is_read {
            ReadState::Read((self.clock)())
        } else {
            ReadState::Unread
        };

        self.update_read_state(id, state)
    }

    /// 독서일을 변경한다. 이전 상태와 상관 없이 도서는 읽음 상태가 된다.
    pub fn set_read_date(&mut self, id: i64, date: NaiveDate) -> Result<(), StoreError> {
        self.update_read_state(id, ReadState::Read(date))
    }

    /// `YYYY-MM-DD` 형식의 독서일을 검사한 후 [`BookStore::set_read_date`]를 호출한다.
    pub fn set_read_date_str(&mut self, id: i64, date: &str) -> Result<(), StoreError> {
        let date = parse_read_date(date)?;
        self.set_read_date(id, date)
    }

    /// 테이블이 없으면 생성한다.
    pub fn ensure_schema(&mut self) -> Result<(), StoreError> {
        self.repository.ensure_schema()
            .map_err(|e| logging_storage_error("테이블 생성", e))
    }

    /// 저장소 연결을 닫는다.
    pub fn close(mut self) {
        self.repository.close();
    }

    fn update_read_state(&mut self, id: i64, state: ReadState) -> Result<(), StoreError> {
        let updated_count = self.repository.update_read_state(id, state)
            .map_err(|e| logging_storage_error("독서 상태 변경", e))?;

        if updated_count == 0 {
            debug!("독서 상태를 변경할 도서가 없습니다. (ID: {})", id);
        }
        Ok(())
    }
}

fn logging_storage_error(operation: &str, e: RepositoryError) -> StoreError {
    error!("{} 중 에러가 발생 하였습니다. => {:?}", operation, e);
    StoreError::Storage(e)
}
