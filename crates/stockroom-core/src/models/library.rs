use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::Id;
use super::timestamp;
use crate::store::Record;

pub type BookId = Id<Book, u64>;
pub type StudentId = Id<Student, u64>;
pub type LoanId = Id<Loan, u64>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Free text as entered ("1965", "c. 1600").
    #[serde(rename = "year")]
    pub release_year: String,
    pub available: bool,
}

impl Record for Book {
    type Id = BookId;
    const COLLECTION: &'static str = "books";
    const FIELDS: &'static [&'static str] = &["id", "title", "author", "year", "available"];

    fn id(&self) -> BookId {
        self.id
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | {} by {} ({}) | {}",
            self.id,
            self.title,
            self.author,
            self.release_year,
            if self.available { "available" } else { "on loan" }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

impl Record for Student {
    type Id = StudentId;
    const COLLECTION: &'static str = "students";
    const FIELDS: &'static [&'static str] = &["id", "name", "last_name", "phone_number", "email"];

    fn id(&self) -> StudentId {
        self.id
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | {} | phone: {} | email: {}",
            self.id,
            self.full_name(),
            self.phone_number,
            self.email
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub book_id: BookId,
    pub student_id: StudentId,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    /// Date the book is due back.
    #[serde(with = "timestamp")]
    pub return_date: DateTime<Utc>,
}

impl Record for Loan {
    type Id = LoanId;
    const COLLECTION: &'static str = "loans";
    const FIELDS: &'static [&'static str] = &["id", "book_id", "student_id", "date", "return_date"];

    fn id(&self) -> LoanId {
        self.id
    }
}
