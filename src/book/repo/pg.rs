use super::schema::books;
use crate::book::{Book, BookRepository, NewBook, ReadState, RepositoryError};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use tracing::{debug, info, warn};

const SCHEMA_SQL: &str = include_str!("../../../sql/schema.sql");

#[derive(Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookEntity {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub is_read: bool,
    pub date_read: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl BookEntity {
    pub fn to_domain(self) -> Book {
        let read_state = match (self.is_read, self.date_read) {
            (true, Some(date)) => ReadState::Read(date),
            (false, None) => ReadState::Unread,
            (false, Some(date)) => {
                warn!("읽지 않은 도서에 독서일이 설정 되어 있어 읽은 도서로 처리 합니다. (ID: {}, 독서일: {})", self.id, date);
                ReadState::Read(date)
            }
            (true, None) => {
                warn!("읽은 도서에 독서일이 없어 읽지 않은 도서로 처리 합니다. (ID: {})", self.id);
                ReadState::Unread
            }
        };

        Book::new(self.id, self.author, self.title, read_state, self.created_at)
    }
}

#[derive(Insertable)]
#[diesel(table_name = books)]
pub struct NewBookEntity<'a> {
    pub author: &'a str,
    pub title: &'a str,
    pub created_at: NaiveDateTime,
}

impl <'a, 'b> NewBookEntity<'a> where 'b: 'a {
    pub fn from(book: &'b NewBook) -> Self {
        Self {
            author: book.author(),
            title: book.title(),
            created_at: chrono::Local::now().naive_local(),
        }
    }
}

/// 독서 상태 변경 폼. `date_read`가 `None`이면 `NULL`로 갱신한다.
#[derive(AsChangeset)]
#[diesel(table_name = books)]
#[diesel(treat_none_as_null = true)]
pub struct ReadStateForm {
    pub is_read: bool,
    pub date_read: Option<NaiveDate>,
}

impl From<ReadState> for ReadStateForm {
    fn from(state: ReadState) -> Self {
        Self {
            is_read: state.is_read(),
            date_read: state.date_read(),
        }
    }
}

/// PostgreSQL 도서 저장소
///
/// 하나의 연결만 소유하며 연결이 끊어지더라도 재연결 하지 않는다.
/// 연결 없이 생성된 저장소는 모든 요청에 [`RepositoryError::Disconnected`]를 반환한다.
pub struct BookPgStore {
    connection: Option<PgConnection>,
}

impl BookPgStore {
    pub fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let connection = PgConnection::establish(database_url)
            .map_err(|e| RepositoryError::ConnectError(e.to_string()))?;

        Ok(Self { connection: Some(connection) })
    }

    pub fn disconnected() -> Self {
        Self { connection: None }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn connection(&mut self) -> Result<&mut PgConnection, RepositoryError> {
        self.connection.as_mut().ok_or(RepositoryError::Disconnected)
    }
}

impl BookRepository for BookPgStore {
    fn find_all(&mut self) -> Result<Vec<Book>, RepositoryError> {
        let connection = self.connection()?;
        let results = books::table
            .order_by((books::created_at.desc(), books::id.desc()))
            .select(BookEntity::as_select())
            .load(connection)
            .map_err(|e| RepositoryError::SqlExecuteError(e.to_string()))?;

        Ok(results.into_iter().map(|entity| entity.to_domain()).collect())
    }

    fn insert(&mut self, book: &NewBook) -> Result<Book, RepositoryError> {
        let connection = self.connection()?;
        let saved = diesel::insert_into(books::table)
            .values(&NewBookEntity::from(book))
            .returning(BookEntity::as_select())
            .get_result(connection)
            .map_err(|e| RepositoryError::SqlExecuteError(e.to_string()))?;

        Ok(saved.to_domain())
    }

    fn update_read_state(&mut self, id: i64, state: ReadState) -> Result<usize, RepositoryError> {
        let connection = self.connection()?;
        let updated_count = diesel::update(books::table.find(id))
            .set(ReadStateForm::from(state))
            .execute(connection)
            .map_err(|e| RepositoryError::SqlExecuteError(e.to_string()))?;

        Ok(updated_count)
    }

    fn ensure_schema(&mut self) -> Result<(), RepositoryError> {
        let connection = self.connection()?;
        connection.batch_execute(SCHEMA_SQL)
            .map_err(|e| RepositoryError::SqlExecuteError(e.to_string()))?;

        debug!("books 테이블을 확인 하였습니다.");
        Ok(())
    }

    fn close(&mut self) {
        if self.connection.take().is_some() {
            info!("데이터베이스 연결을 종료 합니다.");
        }
    }
}
