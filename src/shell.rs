use crate::book::{parse_read_date, Book, BookRepository};
use crate::store::{BookStore, StoreError};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::cmp::Ordering;
use std::io;
use std::io::Write;

const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";
const HEADERS: [&str; 6] = ["ID", "Author", "Title", "Status", "Date read", "Added"];

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),

    #[error("cannot serialize books: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShellError {
    /// 입력 오류는 2, 그 외 실패는 1
    pub fn exit_code(&self) -> u8 {
        match self {
            ShellError::Store(StoreError::InvalidInput(_)) => 2,
            _ => 1,
        }
    }
}

/// 개인 독서 기록
#[derive(Debug, Parser)]
#[command(name = "book-shelf", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 도서 목록을 표로 출력한다. 기본 정렬은 등록일 최신순이다.
    List {
        /// 정렬 기준 열
        #[arg(long, value_enum)]
        sort: Option<SortKey>,

        /// 내림차순 정렬 (--sort와 함께 사용)
        #[arg(long, requires = "sort")]
        desc: bool,

        /// 표 대신 JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 신규 도서를 등록한다.
    Add {
        #[arg(long)]
        author: String,

        #[arg(long)]
        title: String,
    },

    /// 도서를 오늘 읽은 것으로 표시한다.
    Read { id: i64 },

    /// 도서를 읽지 않은 것으로 표시한다. 독서일은 지워진다.
    Unread { id: i64 },

    /// 독서일을 변경한다 (YYYY-MM-DD). 도서는 읽음 상태가 된다.
    Date { id: i64, date: String },

    /// books 테이블이 없으면 생성한다.
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Id,
    Author,
    Title,
    Status,
    DateRead,
    Created,
}

#[derive(Serialize)]
struct BookView<'a> {
    id: i64,
    author: &'a str,
    title: &'a str,
    is_read: bool,
    date_read: Option<NaiveDate>,
    created_at: NaiveDateTime,
}

impl<'a> From<&'a Book> for BookView<'a> {
    fn from(book: &'a Book) -> Self {
        Self {
            id: book.id(),
            author: book.author(),
            title: book.title(),
            is_read: book.is_read(),
            date_read: book.date_read(),
            created_at: book.created_at(),
        }
    }
}

/// 명령을 실행하고 결과를 `out`에 출력한다.
pub fn execute<R, W>(store: &mut BookStore<R>, command: Command, out: &mut W) -> Result<(), ShellError>
where
    R: BookRepository,
    W: Write,
{
    match command {
        Command::List { sort, desc, json } => {
            let mut books = store.try_list_all()?;
            if let Some(key) = sort {
                sort_books(&mut books, key, desc);
            }

            if json {
                let views: Vec<BookView> = books.iter().map(BookView::from).collect();
                serde_json::to_writer_pretty(&mut *out, &views)?;
                writeln!(out)?;
            } else {
                write_table(out, &books)?;
            }
        }
        Command::Add { author, title } => {
            let book = store.insert(&author, &title)?;
            writeln!(out, "Added #{}: {}", book.id(), book)?;
        }
        Command::Read { id } => {
            store.set_read_status(id, true)?;
            writeln!(out, "Marked #{} as read", id)?;
        }
        Command::Unread { id } => {
            store.set_read_status(id, false)?;
            writeln!(out, "Marked #{} as want to read", id)?;
        }
        Command::Date { id, date } => {
            let date = parse_read_date(&date).map_err(StoreError::from)?;
            store.set_read_date(id, date)?;
            writeln!(out, "Set date read of #{} to {}", id, date.format(DISPLAY_DATE_FORMAT))?;
        }
        Command::Init => {
            store.ensure_schema()?;
            writeln!(out, "Table books is ready")?;
        }
    }

    Ok(())
}

/// 선택한 열 기준으로 안정 정렬한다. 독서일이 없는 도서는 오름차순에서 앞에 온다.
pub fn sort_books(books: &mut [Book], key: SortKey, desc: bool) {
    books.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        if desc { ordering.reverse() } else { ordering }
    });
}

fn compare(a: &Book, b: &Book, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id().cmp(&b.id()),
        SortKey::Author => a.author().to_lowercase().cmp(&b.author().to_lowercase()),
        SortKey::Title => a.title().to_lowercase().cmp(&b.title().to_lowercase()),
        SortKey::Status => a.is_read().cmp(&b.is_read()),
        SortKey::DateRead => a.date_read().cmp(&b.date_read()),
        SortKey::Created => a.created_at().cmp(&b.created_at()),
    }
}

fn status_label(book: &Book) -> &'static str {
    if book.is_read() { "Read" } else { "Want to read" }
}

fn row(book: &Book) -> [String; 6] {
    [
        book.id().to_string(),
        book.author().to_owned(),
        book.title().to_owned(),
        status_label(book).to_owned(),
        book.date_read()
            .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
            .unwrap_or_default(),
        book.created_at().format(DISPLAY_DATE_FORMAT).to_string(),
    ]
}

fn write_table<W: Write>(out: &mut W, books: &[Book]) -> io::Result<()> {
    let rows: Vec<[String; 6]> = books.iter().map(row).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &HEADERS.map(str::to_owned), &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    writeln!(out, "{} book(s)", books.len())
}

fn write_row<W: Write>(out: &mut W, cells: &[String; 6], widths: &[usize; 6]) -> io::Result<()> {
    let padded: Vec<String> = cells.iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(out, "{}", padded.join(" | ").trim_end())
}
