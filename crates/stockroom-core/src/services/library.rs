use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::open_manager;
use crate::config::{Collection, StorageConfig};
use crate::error::Result;
use crate::models::library::{Book, BookId, Loan, Student, StudentId};
use crate::store::Manager;

/// Days a book may stay out.
pub const LOAN_PERIOD_DAYS: i64 = 10;

/// Student details before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanOutcome {
    Lent(Loan),
    UnknownStudent,
    /// The book does not exist or is already out.
    BookUnavailable,
}

/// One loan joined with the names it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanView {
    pub loan_id: u64,
    pub student: String,
    pub book: String,
    pub date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
}

pub struct Library {
    books: Manager<Book>,
    students: Manager<Student>,
    loans: Manager<Loan>,
}

impl Library {
    pub fn open(config: &StorageConfig) -> Result<Self> {
        Ok(Self {
            students: open_manager(&config.path_for(Collection::LibraryStudents))?,
            books: open_manager(&config.path_for(Collection::Books))?,
            loans: open_manager(&config.path_for(Collection::Loans))?,
        })
    }

    pub fn add_student(&mut self, new: NewStudent) -> Result<Student> {
        let student = Student {
            id: self.students.next_id()?,
            name: new.name,
            last_name: new.last_name,
            phone_number: new.phone_number,
            email: new.email,
        };
        self.students.create(student.clone())?;
        info!(id = %student.id, "Student added");
        Ok(student)
    }

    pub fn add_book(&mut self, title: &str, author: &str, year: &str) -> Result<Book> {
        let book = Book {
            id: self.books.next_id()?,
            title: title.to_string(),
            author: author.to_string(),
            release_year: year.to_string(),
            available: true,
        };
        self.books.create(book.clone())?;
        info!(id = %book.id, title, "Book added");
        Ok(book)
    }

    pub fn students(&self) -> &[Student] {
        self.students.items()
    }

    pub fn books(&self) -> &[Book] {
        self.books.items()
    }

    pub fn available_books(&self) -> Vec<Book> {
        self.books.filter(|book| book.available)
    }

    pub fn loans(&self) -> &[Loan] {
        self.loans.items()
    }

    /// Lend `book_id` to `student_id` for `LOAN_PERIOD_DAYS`.
    ///
    /// The loan is written before the book is marked out. If the second
    /// write fails the loan stays on file and the error is returned.
    pub fn lend_book(&mut self, student_id: StudentId, book_id: BookId) -> Result<LoanOutcome> {
        if self.students.get(&student_id)?.is_none() {
            return Ok(LoanOutcome::UnknownStudent);
        }
        let Some(mut book) = self.books.get(&book_id)?.filter(|book| book.available) else {
            return Ok(LoanOutcome::BookUnavailable);
        };

        let date = Utc::now();
        let loan = Loan {
            id: self.loans.next_id()?,
            book_id,
            student_id,
            date,
            return_date: date + Duration::days(LOAN_PERIOD_DAYS),
        };
        self.loans.create(loan.clone())?;

        book.available = false;
        self.books.update(&book)?;

        info!(loan = %loan.id, book = %book_id, student = %student_id, "Book lent");
        Ok(LoanOutcome::Lent(loan))
    }

    /// Open loans with student and book names. Loans pointing at a removed
    /// student or book are left out.
    pub fn active_loans(&self) -> Result<Vec<LoanView>> {
        let mut views = Vec::new();
        for loan in self.loans.items() {
            let (Some(student), Some(book)) =
                (self.students.get(&loan.student_id)?, self.books.get(&loan.book_id)?)
            else {
                continue;
            };
            views.push(LoanView {
                loan_id: loan.id.get(),
                student: student.full_name(),
                book: book.title,
                date: loan.date,
                return_date: loan.return_date,
            });
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::App;
    use crate::store::Repository;
    use tempfile::{tempdir, TempDir};

    fn open(dir: &TempDir) -> Library {
        Library::open(&StorageConfig::in_dir(App::Library, dir.path())).unwrap()
    }

    fn ana() -> NewStudent {
        NewStudent {
            name: "Ana".to_string(),
            last_name: "Diaz".to_string(),
            phone_number: "555-0101".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let dir = tempdir().unwrap();
        let mut library = open(&dir);
        assert_eq!(library.add_student(ana()).unwrap().id.get(), 1);
        assert_eq!(library.add_student(ana()).unwrap().id.get(), 2);
        assert_eq!(library.add_book("Dune", "Herbert", "1965").unwrap().id.get(), 1);
        assert!(library.books()[0].available);
    }

    #[test]
    fn test_lend_marks_book_unavailable() {
        let dir = tempdir().unwrap();
        let mut library = open(&dir);
        let student = library.add_student(ana()).unwrap();
        let book = library.add_book("Dune", "Herbert", "1965").unwrap();

        let LoanOutcome::Lent(loan) = library.lend_book(student.id, book.id).unwrap() else {
            panic!("expected a loan");
        };
        assert_eq!(loan.id.get(), 1);
        assert_eq!(loan.return_date - loan.date, Duration::days(LOAN_PERIOD_DAYS));
        assert!(!library.books()[0].available);
        assert!(library.available_books().is_empty());

        let reopened = open(&dir);
        assert_eq!(reopened.loans(), &[loan]);
    }

    #[test]
    fn test_lending_unavailable_book_changes_nothing() {
        let dir = tempdir().unwrap();
        let mut library = open(&dir);
        let student = library.add_student(ana()).unwrap();
        let book = library.add_book("Dune", "Herbert", "1965").unwrap();
        library.lend_book(student.id, book.id).unwrap();

        let books_before = library.books().to_vec();
        assert_eq!(
            library.lend_book(student.id, book.id).unwrap(),
            LoanOutcome::BookUnavailable
        );
        assert_eq!(library.loans().len(), 1);
        assert_eq!(library.books(), books_before.as_slice());
    }

    #[test]
    fn test_lend_rejects_unknown_ids() {
        let dir = tempdir().unwrap();
        let mut library = open(&dir);
        let student = library.add_student(ana()).unwrap();
        let book = library.add_book("Dune", "Herbert", "1965").unwrap();

        assert_eq!(
            library.lend_book(StudentId::new(99), book.id).unwrap(),
            LoanOutcome::UnknownStudent
        );
        assert_eq!(
            library.lend_book(student.id, BookId::new(99)).unwrap(),
            LoanOutcome::BookUnavailable
        );
        assert!(library.loans().is_empty());
        assert!(library.books()[0].available);
    }

    #[test]
    fn test_loans_stay_on_file_and_ids_never_repeat() {
        let dir = tempdir().unwrap();
        let mut library = open(&dir);
        let student = library.add_student(ana()).unwrap();
        let dune = library.add_book("Dune", "Herbert", "1965").unwrap();
        let emma = library.add_book("Emma", "Austen", "1815").unwrap();
        library.lend_book(student.id, dune.id).unwrap();
        let LoanOutcome::Lent(first) = library.lend_book(student.id, emma.id).unwrap() else {
            panic!("expected a loan");
        };

        // Put the book back on the shelf by hand and lend it again
        let books: Repository<Book> = Repository::new(dir.path().join("books.json"));
        let mut shelved = emma.clone();
        shelved.available = true;
        books.update(&shelved).unwrap();

        let mut library = open(&dir);
        let LoanOutcome::Lent(again) = library.lend_book(student.id, emma.id).unwrap() else {
            panic!("expected a loan");
        };
        assert_ne!(again.id, first.id);
        assert_eq!(again.id.get(), 3);
        let ids: Vec<u64> = library.loans().iter().map(|loan| loan.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_active_loans_skip_dangling_references() {
        let dir = tempdir().unwrap();
        let mut library = open(&dir);
        let student = library.add_student(ana()).unwrap();
        let dune = library.add_book("Dune", "Herbert", "1965").unwrap();
        let emma = library.add_book("Emma", "Austen", "1815").unwrap();
        library.lend_book(student.id, dune.id).unwrap();
        library.lend_book(student.id, emma.id).unwrap();

        // Remove a book behind the service's back
        let books: Repository<Book> = Repository::new(dir.path().join("books.json"));
        books.delete(&emma.id).unwrap();

        let views = library.active_loans().unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].student, "Ana Diaz");
        assert_eq!(views[0].book, "Dune");
    }
}
