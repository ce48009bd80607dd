use course_allocation_optimizer::ClassLetter;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("no class with letter {0} exists, create it before importing into it")]
    UnknownClass(ClassLetter),
    #[error("no valid student lines found, check the format")]
    NoValidStudents,
}
