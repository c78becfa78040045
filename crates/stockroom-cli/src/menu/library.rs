use std::io::{BufRead, Write};

use anyhow::Result;
use stockroom_core::models::library::{BookId, StudentId};
use stockroom_core::services::{Library, LoanOutcome, NewStudent};
use stockroom_core::utils::{format_date, format_phone};

use super::{invalid_option, print_all, select};
use crate::prompt::Prompt;

const OPTIONS: &[&str] = &[
    "Add student",
    "Show students",
    "Add book",
    "Show books",
    "Lend a book",
    "Show loans",
    "Quit",
];

pub fn run<R: BufRead, W: Write>(mut library: Library, prompt: &mut Prompt<R, W>) -> Result<()> {
    loop {
        match select(prompt, "Library", OPTIONS)? {
            1 => {
                let new = NewStudent {
                    name: prompt.text("First name:")?,
                    last_name: prompt.text("Last name:")?,
                    phone_number: format_phone(&prompt.text("Phone number:")?),
                    email: prompt.text("Email:")?,
                };
                let student = library.add_student(new)?;
                writeln!(prompt.out(), "Student added with ID {}.", student.id)?;
            }
            2 => print_all(prompt.out(), library.students(), "No students registered.")?,
            3 => {
                let title = prompt.text("Title:")?;
                let author = prompt.text("Author:")?;
                let year = prompt.text("Year:")?;
                let book = library.add_book(&title, &author, &year)?;
                writeln!(prompt.out(), "Book added with ID {}.", book.id)?;
            }
            4 => print_all(prompt.out(), library.books(), "No books registered.")?,
            5 => lend_book(&mut library, prompt)?,
            6 => print_loans(&library, prompt.out())?,
            7 => return Ok(()),
            _ => invalid_option(prompt.out())?,
        }
    }
}

fn lend_book<R: BufRead, W: Write>(library: &mut Library, prompt: &mut Prompt<R, W>) -> Result<()> {
    let student_id = StudentId::new(prompt.number("Student ID:")?);
    let book_id = BookId::new(prompt.number("Book ID:")?);

    let out = prompt.out();
    match library.lend_book(student_id, book_id)? {
        LoanOutcome::Lent(loan) => writeln!(
            out,
            "Loan {} created. Due back {}.",
            loan.id,
            format_date(&loan.return_date)
        )?,
        LoanOutcome::UnknownStudent => writeln!(out, "Student not found.")?,
        LoanOutcome::BookUnavailable => writeln!(out, "Book not found or not available.")?,
    }
    Ok(())
}

fn print_loans<W: Write>(library: &Library, out: &mut W) -> Result<()> {
    let loans = library.active_loans()?;
    if loans.is_empty() {
        writeln!(out, "No active loans.")?;
        return Ok(());
    }
    writeln!(out, "{:>4}  {:<24} {:<28} {:<20} {}", "ID", "Student", "Book", "Date", "Due")?;
    for loan in loans {
        writeln!(
            out,
            "{:>4}  {:<24} {:<28} {:<20} {}",
            loan.loan_id,
            loan.student,
            loan.book,
            format_date(&loan.date),
            format_date(&loan.return_date)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::tests::{output, scripted};
    use stockroom_core::{App, StorageConfig};
    use tempfile::tempdir;

    fn session(dir: &std::path::Path, lines: &[&str]) -> String {
        let library = Library::open(&StorageConfig::in_dir(App::Library, dir)).unwrap();
        let mut prompt = scripted(lines);
        run(library, &mut prompt).unwrap();
        output(&prompt)
    }

    #[test]
    fn test_lend_session() {
        let dir = tempdir().unwrap();
        let out = session(
            dir.path(),
            &[
                "1", "Ana", "Diaz", "88880000", "ana@example.com",
                "3", "Dune", "Frank Herbert", "1965",
                "3", "Emma", "Jane Austen", "1815",
                "5", "1", "1",
                "5", "1", "1",
                "5", "1", "2",
                "6",
                "7",
            ],
        );
        assert!(out.contains("Student added with ID 1."));
        assert!(out.contains("Book added with ID 1."));
        assert!(out.contains("Loan 1 created."));
        assert!(out.contains("Book not found or not available."));
        assert!(out.contains("Loan 2 created."));
        assert!(out.contains("Ana Diaz"));
        assert!(!out.contains("Return a book"));

        let library = Library::open(&StorageConfig::in_dir(App::Library, dir.path())).unwrap();
        assert_eq!(library.students()[0].phone_number, "8888-0000");
        assert_eq!(library.loans().len(), 2);
        assert!(library.available_books().is_empty());
    }

    #[test]
    fn test_unknown_student() {
        let dir = tempdir().unwrap();
        let out = session(dir.path(), &["5", "3", "1", "6", "7"]);
        assert!(out.contains("Student not found."));
        assert!(out.contains("No active loans."));
    }
}
