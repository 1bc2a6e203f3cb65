//! The closed set of policy shapes.
//!
//! | Shape | Allows when | Otherwise |
//! |---|---|---|
//! | `Authenticated` | the token resolved | - |
//! | `TeacherOrStudent` | the identity holds any role | `neither teacher nor student` |
//! | `StudentSelf` | a student acting on their own record | `not a student` / `not own record` |
//! | `TeacherOnly` | the identity teaches | `not a teacher` |
//! | `TeacherOnResource` | the identity teaches | `not a teacher` |
//!
//! `TeacherOrStudent` admits either role without further distinction, even
//! on operations whose names suggest they are teacher-only.
//! `TeacherOnResource` carries a resource reference but does not compare it
//! against the teacher.

use std::fmt;
use std::str::FromStr;

use lectern_core::{AccessError, AccessResult, DenyReason, Identity, ResourceRef};
use serde::{Deserialize, Serialize};

/// One of the five authorization rules a protected operation is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyShape {
    /// Any caller whose token resolves.
    Authenticated,
    /// Any teacher or student.
    TeacherOrStudent,
    /// A student acting on the record named by the resource reference.
    StudentSelf,
    /// Teachers only.
    TeacherOnly,
    /// Teachers only; the resource reference is carried but not compared.
    TeacherOnResource,
}

impl PolicyShape {
    /// All shapes, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Authenticated,
        Self::TeacherOrStudent,
        Self::StudentSelf,
        Self::TeacherOnly,
        Self::TeacherOnResource,
    ];

    /// The snake_case name used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::TeacherOrStudent => "teacher_or_student",
            Self::StudentSelf => "student_self",
            Self::TeacherOnly => "teacher_only",
            Self::TeacherOnResource => "teacher_on_resource",
        }
    }

    /// Whether the shape cannot be evaluated without a resource reference.
    #[must_use]
    pub const fn requires_resource(self) -> bool {
        matches!(self, Self::StudentSelf)
    }

    /// Decide whether `identity` may proceed.
    ///
    /// Pure: reads nothing but its arguments.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Forbidden`] with the reason for refusal.
    pub fn evaluate(self, identity: &Identity, resource: Option<&ResourceRef>) -> AccessResult<()> {
        match self {
            Self::Authenticated => Ok(()),
            Self::TeacherOrStudent => {
                if identity.is_teacher() || identity.is_student() {
                    Ok(())
                } else {
                    Err(AccessError::Forbidden(DenyReason::NeitherTeacherNorStudent))
                }
            },
            Self::StudentSelf => {
                if !identity.is_student() {
                    return Err(AccessError::Forbidden(DenyReason::NotAStudent));
                }
                match resource {
                    Some(record) if identity.owns(record) => Ok(()),
                    _ => Err(AccessError::Forbidden(DenyReason::NotOwnRecord)),
                }
            },
            Self::TeacherOnly | Self::TeacherOnResource => {
                if identity.is_teacher() {
                    Ok(())
                } else {
                    Err(AccessError::Forbidden(DenyReason::NotATeacher))
                }
            },
        }
    }
}

impl fmt::Display for PolicyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shape name that is not one of the five known shapes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy shape '{0}'")]
pub struct UnknownShape(pub String);

impl FromStr for PolicyShape {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.as_str() == s)
            .ok_or_else(|| UnknownShape(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::Role;

    fn student(id: &str) -> Identity {
        Identity::new(id, Role::Student)
    }

    fn teacher(id: &str) -> Identity {
        Identity::new(id, Role::Teacher)
    }

    fn forbidden(reason: DenyReason) -> AccessResult<()> {
        Err(AccessError::Forbidden(reason))
    }

    #[test]
    fn test_authenticated_allows_everyone() {
        assert_eq!(PolicyShape::Authenticated.evaluate(&student("s1"), None), Ok(()));
        assert_eq!(PolicyShape::Authenticated.evaluate(&teacher("t1"), None), Ok(()));
    }

    #[test]
    fn test_teacher_or_student_allows_either_role() {
        let shape = PolicyShape::TeacherOrStudent;
        assert_eq!(shape.evaluate(&student("s1"), None), Ok(()));
        assert_eq!(shape.evaluate(&teacher("t1"), None), Ok(()));
        assert_eq!(shape.evaluate(&Identity::new("ta", Role::Both), None), Ok(()));
    }

    #[test]
    fn test_student_self_own_record() {
        let shape = PolicyShape::StudentSelf;
        let s1 = student("s1");
        assert_eq!(shape.evaluate(&s1, Some(&ResourceRef::from("s1"))), Ok(()));
        assert_eq!(
            shape.evaluate(&s1, Some(&ResourceRef::from("s2"))),
            forbidden(DenyReason::NotOwnRecord)
        );
    }

    #[test]
    fn test_student_self_without_reference_denies() {
        assert_eq!(
            PolicyShape::StudentSelf.evaluate(&student("s1"), None),
            forbidden(DenyReason::NotOwnRecord)
        );
    }

    #[test]
    fn test_student_self_rejects_teachers_first() {
        assert_eq!(
            PolicyShape::StudentSelf.evaluate(&teacher("t1"), Some(&ResourceRef::from("t1"))),
            forbidden(DenyReason::NotAStudent)
        );
    }

    #[test]
    fn test_teacher_only() {
        let shape = PolicyShape::TeacherOnly;
        assert_eq!(shape.evaluate(&teacher("t1"), None), Ok(()));
        assert_eq!(
            shape.evaluate(&student("s1"), None),
            forbidden(DenyReason::NotATeacher)
        );
        assert_eq!(shape.evaluate(&Identity::new("ta", Role::Both), None), Ok(()));
    }

    #[test]
    fn test_teacher_on_resource_ignores_reference() {
        let shape = PolicyShape::TeacherOnResource;
        assert_eq!(
            shape.evaluate(&teacher("t1"), Some(&ResourceRef::from("someone-else"))),
            Ok(())
        );
        assert_eq!(
            shape.evaluate(&student("s1"), Some(&ResourceRef::from("s1"))),
            forbidden(DenyReason::NotATeacher)
        );
    }

    #[test]
    fn test_names_round_trip() {
        for shape in PolicyShape::ALL {
            assert_eq!(shape.as_str().parse::<PolicyShape>(), Ok(shape));
            let json = serde_json::to_string(&shape).unwrap();
            assert_eq!(json, format!("\"{shape}\""));
        }
        assert_eq!(
            "admin_only".parse::<PolicyShape>(),
            Err(UnknownShape("admin_only".to_owned()))
        );
    }
}
