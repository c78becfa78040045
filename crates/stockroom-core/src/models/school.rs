use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::{Id, IdPrefix};
use crate::store::Record;

pub type StudentId = Id<Student, String>;
pub type CourseId = Id<Course, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

impl IdPrefix for Student {
    const PREFIX: &'static str = "STU";
}

impl Record for Student {
    type Id = StudentId;
    const COLLECTION: &'static str = "students";
    const FIELDS: &'static [&'static str] =
        &["id", "name", "last_name", "phone_number", "email", "address"];

    fn id(&self) -> StudentId {
        self.id.clone()
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | {} | phone: {} | email: {} | address: {}",
            self.id,
            self.full_name(),
            self.phone_number,
            self.email,
            self.address
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub description: String,
    pub max_students: u32,
}

impl Course {
    /// True once `enrolled` has reached the course capacity.
    pub fn is_full(&self, enrolled: usize) -> bool {
        enrolled >= self.max_students as usize
    }
}

impl IdPrefix for Course {
    const PREFIX: &'static str = "CRS";
}

impl Record for Course {
    type Id = CourseId;
    const COLLECTION: &'static str = "courses";
    const FIELDS: &'static [&'static str] = &["id", "description", "max_students"];

    fn id(&self) -> CourseId {
        self.id.clone()
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | {} | max students: {}",
            self.id, self.description, self.max_students
        )
    }
}

/// A student's membership in a course. Identified by the pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: StudentId,
    pub course_id: CourseId,
}

impl Enrollment {
    pub fn new(student_id: StudentId, course_id: CourseId) -> Self {
        Self {
            student_id,
            course_id,
        }
    }
}

/// Composite key of an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnrollmentKey {
    pub student_id: StudentId,
    pub course_id: CourseId,
}

impl fmt::Display for EnrollmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.student_id, self.course_id)
    }
}

impl Record for Enrollment {
    type Id = EnrollmentKey;
    const COLLECTION: &'static str = "enrollments";
    const FIELDS: &'static [&'static str] = &["student_id", "course_id"];

    fn id(&self) -> EnrollmentKey {
        EnrollmentKey {
            student_id: self.student_id.clone(),
            course_id: self.course_id.clone(),
        }
    }
}
