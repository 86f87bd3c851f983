use crate::book::{Book, BookRepository, NewBook, ReadState, RepositoryError};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// 테스트용 메모리 저장소
///
/// `fail_with`에 에러를 설정하면 이후 모든 요청이 해당 에러로 실패한다.
pub struct MemoryBookRepository {
    books: Vec<Book>,
    next_id: i64,
    calls: usize,
    fail_with: Option<RepositoryError>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self {
            books: Vec::new(),
            next_id: 1,
            calls: 0,
            fail_with: None,
        }
    }

    pub fn fail_with(&mut self, err: RepositoryError) {
        self.fail_with = Some(err);
    }

    /// 저장소에 도달한 요청 수
    pub fn calls(&self) -> usize {
        self.calls
    }

    fn check(&mut self) -> Result<(), RepositoryError> {
        self.calls += 1;
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    // 삽입 순서대로 1분씩 증가하는 등록일
    fn next_created_at(&self) -> NaiveDateTime {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        base + TimeDelta::minutes(self.next_id)
    }
}

impl BookRepository for MemoryBookRepository {
    fn find_all(&mut self) -> Result<Vec<Book>, RepositoryError> {
        self.check()?;

        let mut books = self.books.clone();
        books.sort_by(|a, b| {
            b.created_at().cmp(&a.created_at()).then(b.id().cmp(&a.id()))
        });
        Ok(books)
    }

    fn insert(&mut self, book: &NewBook) -> Result<Book, RepositoryError> {
        self.check()?;

        let saved = Book::new(
            self.next_id,
            book.author().to_owned(),
            book.title().to_owned(),
            ReadState::Unread,
            self.next_created_at(),
        );
        self.next_id += 1;
        self.books.push(saved.clone());
        Ok(saved)
    }

    fn update_read_state(&mut self, id: i64, state: ReadState) -> Result<usize, RepositoryError> {
        self.check()?;

        let mut updated_count = 0;
        for book in self.books.iter_mut().filter(|b| b.id() == id) {
            *book = Book::new(
                book.id(),
                book.author().to_owned(),
                book.title().to_owned(),
                state,
                book.created_at(),
            );
            updated_count += 1;
        }
        Ok(updated_count)
    }

    fn ensure_schema(&mut self) -> Result<(), RepositoryError> {
        self.check()
    }
}
