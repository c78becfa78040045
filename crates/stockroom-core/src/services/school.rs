use tracing::info;

use super::open_manager;
use crate::config::{Collection, StorageConfig};
use crate::error::Result;
use crate::models::school::{Course, CourseId, Enrollment, Student, StudentId};
use crate::store::Manager;

/// Student details before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSchoolStudent {
    pub name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    Enrolled(Enrollment),
    UnknownStudent,
    UnknownCourse,
    AlreadyEnrolled,
    /// The course has reached `max_students`.
    CourseFull,
}

/// One enrollment joined with course and student details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentView {
    pub course_id: CourseId,
    pub course: String,
    pub student_id: StudentId,
    pub student: String,
}

pub struct School {
    students: Manager<Student>,
    courses: Manager<Course>,
    enrollments: Manager<Enrollment>,
}

impl School {
    pub fn open(config: &StorageConfig) -> Result<Self> {
        Ok(Self {
            students: open_manager(&config.path_for(Collection::SchoolStudents))?,
            courses: open_manager(&config.path_for(Collection::Courses))?,
            enrollments: open_manager(&config.path_for(Collection::Enrollments))?,
        })
    }

    pub fn add_student(&mut self, new: NewSchoolStudent) -> Result<Student> {
        let student = Student {
            id: self.students.next_id()?,
            name: new.name,
            last_name: new.last_name,
            phone_number: new.phone_number,
            email: new.email,
            address: new.address,
        };
        self.students.create(student.clone())?;
        info!(id = %student.id, "Student added");
        Ok(student)
    }

    pub fn add_course(&mut self, description: &str, max_students: u32) -> Result<Course> {
        let course = Course {
            id: self.courses.next_id()?,
            description: description.to_string(),
            max_students,
        };
        self.courses.create(course.clone())?;
        info!(id = %course.id, max_students, "Course added");
        Ok(course)
    }

    pub fn students(&self) -> &[Student] {
        self.students.items()
    }

    pub fn courses(&self) -> &[Course] {
        self.courses.items()
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        self.enrollments.items()
    }

    /// Enroll after checking both ids, duplicates, then capacity.
    pub fn enroll(&mut self, student_id: &StudentId, course_id: &CourseId) -> Result<EnrollmentOutcome> {
        if self.students.get(student_id)?.is_none() {
            return Ok(EnrollmentOutcome::UnknownStudent);
        }
        let Some(course) = self.courses.get(course_id)? else {
            return Ok(EnrollmentOutcome::UnknownCourse);
        };

        let enrollment = Enrollment::new(student_id.clone(), course_id.clone());
        if self.enrollments.items().contains(&enrollment) {
            return Ok(EnrollmentOutcome::AlreadyEnrolled);
        }

        let enrolled = self
            .enrollments
            .repository()
            .find(|e| e.course_id == *course_id)?
            .len();
        if course.is_full(enrolled) {
            return Ok(EnrollmentOutcome::CourseFull);
        }

        self.enrollments.create(enrollment.clone())?;
        info!(student = %student_id, course = %course_id, "Student enrolled");
        Ok(EnrollmentOutcome::Enrolled(enrollment))
    }

    /// Enrollments pointing at a removed student or course are left out.
    pub fn enrollments_view(&self) -> Result<Vec<EnrollmentView>> {
        let mut views = Vec::new();
        for enrollment in self.enrollments.items() {
            let (Some(student), Some(course)) = (
                self.students.get(&enrollment.student_id)?,
                self.courses.get(&enrollment.course_id)?,
            ) else {
                continue;
            };
            views.push(EnrollmentView {
                course_id: course.id,
                course: course.description,
                student: student.full_name(),
                student_id: student.id,
            });
        }
        Ok(views)
    }
}
