use std::io::{BufRead, Write};

use anyhow::Result;
use stockroom_core::models::school::{CourseId, StudentId};
use stockroom_core::services::{EnrollmentOutcome, NewSchoolStudent, School};
use stockroom_core::utils::format_phone;

use super::{invalid_option, print_all, select};
use crate::prompt::Prompt;

const OPTIONS: &[&str] = &[
    "Add student",
    "Show students",
    "Add course",
    "Show courses",
    "Enroll student",
    "Show enrollments",
    "Quit",
];

pub fn run<R: BufRead, W: Write>(mut school: School, prompt: &mut Prompt<R, W>) -> Result<()> {
    loop {
        match select(prompt, "School", OPTIONS)? {
            1 => {
                let new = NewSchoolStudent {
                    name: prompt.text("First name:")?,
                    last_name: prompt.text("Last name:")?,
                    phone_number: format_phone(&prompt.text("Phone number:")?),
                    email: prompt.text("Email:")?,
                    address: prompt.text("Address:")?,
                };
                let student = school.add_student(new)?;
                writeln!(prompt.out(), "Student added with ID {}.", student.id)?;
            }
            2 => print_all(prompt.out(), school.students(), "No students registered.")?,
            3 => {
                let description = prompt.text("Description:")?;
                let max_students: u32 = prompt.number("Maximum students:")?;
                let course = school.add_course(&description, max_students)?;
                writeln!(prompt.out(), "Course added with ID {}.", course.id)?;
            }
            4 => print_all(prompt.out(), school.courses(), "No courses registered.")?,
            5 => enroll(&mut school, prompt)?,
            6 => print_enrollments(&school, prompt.out())?,
            7 => return Ok(()),
            _ => invalid_option(prompt.out())?,
        }
    }
}

fn enroll<R: BufRead, W: Write>(school: &mut School, prompt: &mut Prompt<R, W>) -> Result<()> {
    // Ids are typed in any case; stored ids are upper case
    let student_id = StudentId::from(prompt.text("Student ID:")?.to_uppercase());
    let course_id = CourseId::from(prompt.text("Course ID:")?.to_uppercase());

    let out = prompt.out();
    match school.enroll(&student_id, &course_id)? {
        EnrollmentOutcome::Enrolled(_) => writeln!(out, "Student enrolled.")?,
        EnrollmentOutcome::UnknownStudent => writeln!(out, "Student not found.")?,
        EnrollmentOutcome::UnknownCourse => writeln!(out, "Course not found.")?,
        EnrollmentOutcome::AlreadyEnrolled => {
            writeln!(out, "The student is already enrolled in this course.")?
        }
        EnrollmentOutcome::CourseFull => writeln!(out, "The course is full.")?,
    }
    Ok(())
}

fn print_enrollments<W: Write>(school: &School, out: &mut W) -> Result<()> {
    let views = school.enrollments_view()?;
    if views.is_empty() {
        writeln!(out, "No enrollments yet.")?;
    }
    for view in views {
        writeln!(
            out,
            "Course {} - {}. Student: {} ({})",
            view.course_id, view.course, view.student, view.student_id
        )?;
    }
    Ok(())
}
