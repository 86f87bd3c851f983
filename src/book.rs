pub mod repo;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

/// 독서 날짜 입력 형식 (`YYYY-MM-DD`)
pub const READ_DATE_FORMAT: &str = "%Y-%m-%d";

static READ_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap()
});

/// 저장소에 도달하기 전에 거부 되는 입력 오류
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// 저자가 비어 있음 (공백 제거 후)
    #[error("author must not be empty")]
    EmptyAuthor,

    /// 제목이 비어 있음 (공백 제거 후)
    #[error("title must not be empty")]
    EmptyTitle,

    /// `YYYY-MM-DD` 형식이 아니거나 존재하지 않는 날짜
    #[error("malformed date {0:?}, expected YYYY-MM-DD (e.g. 2025-08-25)")]
    MalformedDate(String),
}

/// 저장소 구현체에서 발생하는 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// 연결이 수립 되지 않았거나 이미 닫힘
    #[error("not connected to the database")]
    Disconnected,

    #[error("connect error: {0}")]
    ConnectError(String),

    #[error("sql execute error: {0}")]
    SqlExecuteError(String),
}

/// 도서의 독서 상태
///
/// 읽음 여부와 읽은 날짜는 항상 함께 움직이므로 하나의 열거형으로 표현한다.
/// 읽지 않은 도서는 날짜를 가질 수 없고, 읽은 도서는 반드시 날짜를 가진다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadState {
    #[default]
    Unread,
    Read(NaiveDate),
}

impl ReadState {
    pub fn is_read(&self) -> bool {
        matches!(self, ReadState::Read(_))
    }

    pub fn date_read(&self) -> Option<NaiveDate> {
        match self {
            ReadState::Unread => None,
            ReadState::Read(date) => Some(*date),
        }
    }
}

/// 도서 기록
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: i64,
    author: String,
    title: String,
    read_state: ReadState,
    created_at: NaiveDateTime,
}

impl Book {
    pub fn new(
        id: i64,
        author: String,
        title: String,
        read_state: ReadState,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            author,
            title,
            read_state,
            created_at,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn read_state(&self) -> ReadState {
        self.read_state
    }

    pub fn is_read(&self) -> bool {
        self.read_state.is_read()
    }

    pub fn date_read(&self) -> Option<NaiveDate> {
        self.read_state.date_read()
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.author, self.title)
    }
}

/// 저장 전의 신규 도서
///
/// 생성 시점에 저자와 제목의 앞뒤 공백을 제거하고 비어 있는지 검사한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    author: String,
    title: String,
}

impl NewBook {
    pub fn new(author: &str, title: &str) -> Result<Self, InputError> {
        let author = author.trim();
        if author.is_empty() {
            return Err(InputError::EmptyAuthor);
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(InputError::EmptyTitle);
        }

        Ok(Self {
            author: author.to_owned(),
            title: title.to_owned(),
        })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// `YYYY-MM-DD` 형식의 문자열을 날짜로 변환한다.
///
/// 연도는 네 자리, 월과 일은 두 자리여야 하며 실제로 존재하는 날짜만 허용한다.
/// 앞뒤 공백은 무시한다.
///
/// # Example
/// ```
/// use book_shelf_rust::book::parse_read_date;
///
/// let date = parse_read_date("2024-03-01").unwrap();
/// assert_eq!(date.to_string(), "2024-03-01");
/// assert!(parse_read_date("2024-3-1").is_err());
/// assert!(parse_read_date("2024-02-30").is_err());
/// ```
pub fn parse_read_date(s: &str) -> Result<NaiveDate, InputError> {
    let s = s.trim();
    if !READ_DATE_PATTERN.is_match(s) {
        return Err(InputError::MalformedDate(s.to_owned()));
    }

    NaiveDate::parse_from_str(s, READ_DATE_FORMAT)
        .map_err(|_| InputError::MalformedDate(s.to_owned()))
}

/// 도서 저장소
///
/// 각 함수는 하나의 SQL 문으로 실행 되며 독립적으로 커밋 된다.
pub trait BookRepository {

    /// 모든 도서를 등록일 최신순으로 가져온다. 등록일이 같으면 아이디 역순으로 정렬한다.
    fn find_all(&mut self) -> Result<Vec<Book>, RepositoryError>;

    /// 신규 도서를 저장하고 아이디와 등록일이 부여된 도서를 반환한다.
    fn insert(&mut self, book: &NewBook) -> Result<Book, RepositoryError>;

    /// 도서의 독서 상태를 변경하고 변경된 행의 수를 반환한다.
    fn update_read_state(&mut self, id: i64, state: ReadState) -> Result<usize, RepositoryError>;

    /// 테이블이 없으면 생성한다.
    fn ensure_schema(&mut self) -> Result<(), RepositoryError>;

    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn new_book_trims_author_and_title() {
        let book = NewBook::new("  Leo Tolstoy ", "\tWar and Peace\n").unwrap();

        assert_eq!(book.author(), "Leo Tolstoy");
        assert_eq!(book.title(), "War and Peace");
    }

    #[test]
    fn new_book_rejects_blank_fields() {
        assert_matches!(NewBook::new("", "Title"), Err(InputError::EmptyAuthor));
        assert_matches!(NewBook::new("   ", "Title"), Err(InputError::EmptyAuthor));
        assert_matches!(NewBook::new("Author", ""), Err(InputError::EmptyTitle));
        assert_matches!(NewBook::new("Author", " \t "), Err(InputError::EmptyTitle));
    }

    #[test]
    fn parse_read_date_accepts_calendar_dates() {
        assert_eq!(
            parse_read_date("2024-03-01"),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(
            parse_read_date(" 2024-02-29 "),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
    }

    #[test]
    fn parse_read_date_rejects_malformed_input() {
        for input in ["", "2024-3-1", "01.03.2024", "2024/03/01", "2023-02-29", "2024-13-01", "20240-01-01", "today"] {
            assert_matches!(parse_read_date(input), Err(InputError::MalformedDate(_)), "{input}");
        }
    }

    #[test]
    fn read_state_keeps_date_only_when_read() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();

        assert!(!ReadState::Unread.is_read());
        assert_eq!(ReadState::Unread.date_read(), None);
        assert!(ReadState::Read(date).is_read());
        assert_eq!(ReadState::Read(date).date_read(), Some(date));
        assert_eq!(ReadState::default(), ReadState::Unread);
    }
}
