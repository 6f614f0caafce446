//! Model construction errors.

/// Reason a configuration cannot be turned into a solvable model.
///
/// Every variant maps to [`SolverStatus::ModelInvalid`](crate::cp::SolverStatus::ModelInvalid);
/// search is never attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Malformed identifiers in the configuration.
    InvalidConfig(String),
    /// A teacher must give more lessons than it has available slots.
    TeacherOverloaded {
        teacher: String,
        required: usize,
        capacity: usize,
    },
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            ModelError::TeacherOverloaded {
                teacher,
                required,
                capacity,
            } => write!(
                f,
                "teacher {teacher} needs {required} lesson slots but only {capacity} are available"
            ),
        }
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ModelError::TeacherOverloaded {
            teacher: "T1".into(),
            required: 6,
            capacity: 4,
        };
        assert_eq!(
            err.to_string(),
            "teacher T1 needs 6 lesson slots but only 4 are available"
        );
        assert_eq!(
            ModelError::InvalidConfig("duplicate room: R1".into()).to_string(),
            "invalid configuration: duplicate room: R1"
        );
    }
}
