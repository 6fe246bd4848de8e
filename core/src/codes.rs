//! The fixed catalog of diagnostic codes and their message templates.

use std::fmt;

use serde::{Serialize, Serializer};

/// Every diagnostic the checker can emit.
///
/// The numbering groups codes by family: ANN0xx for arguments, ANN1xx for
/// the implicit self/cls slots, ANN2xx for return annotations, ANN3xx for
/// annotation-style hygiene, ANN4xx for opinionated warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Code {
    UntypedArgument,
    UntypedVararg,
    UntypedKwarg,
    UntypedSelf,
    UntypedCls,
    UntypedPropertySelf,
    UntypedReturnPublic,
    UntypedReturnProtected,
    UntypedReturnPrivate,
    UntypedReturnSpecial,
    UntypedReturnStaticmethod,
    UntypedReturnClassmethod,
    UntypedReturnProperty,
    MixedAnnotationStyles,
    DynamicTyping,
}

impl Code {
    pub fn as_str(&self) -> &'static str {
        match self {
            Code::UntypedArgument => "ANN001",
            Code::UntypedVararg => "ANN002",
            Code::UntypedKwarg => "ANN003",
            Code::UntypedSelf => "ANN101",
            Code::UntypedCls => "ANN102",
            Code::UntypedPropertySelf => "ANN103",
            Code::UntypedReturnPublic => "ANN201",
            Code::UntypedReturnProtected => "ANN202",
            Code::UntypedReturnPrivate => "ANN203",
            Code::UntypedReturnSpecial => "ANN204",
            Code::UntypedReturnStaticmethod => "ANN205",
            Code::UntypedReturnClassmethod => "ANN206",
            Code::UntypedReturnProperty => "ANN207",
            Code::MixedAnnotationStyles => "ANN301",
            Code::DynamicTyping => "ANN401",
        }
    }

    /// Reverse lookup for code filters; case-insensitive.
    pub fn parse(text: &str) -> Option<Code> {
        let text = text.trim().to_ascii_uppercase();
        ALL_CODES.iter().copied().find(|code| code.as_str() == text)
    }

    /// Fill the message template with the subject (argument or function
    /// name); codes with constant messages ignore the subject.
    pub fn message(&self, subject: &str) -> String {
        match self {
            Code::UntypedArgument => {
                format!("Missing type annotation for function argument '{subject}'")
            }
            Code::UntypedVararg => format!("Missing type annotation for *{subject}"),
            Code::UntypedKwarg => format!("Missing type annotation for **{subject}"),
            Code::UntypedSelf => "Missing type annotation for self in method".to_owned(),
            Code::UntypedCls => "Missing type annotation for cls in classmethod".to_owned(),
            Code::UntypedPropertySelf => {
                "Missing type annotation for self in property".to_owned()
            }
            Code::UntypedReturnPublic => {
                "Missing return type annotation for public function".to_owned()
            }
            Code::UntypedReturnProtected => {
                "Missing return type annotation for protected function".to_owned()
            }
            Code::UntypedReturnPrivate => {
                "Missing return type annotation for private function".to_owned()
            }
            Code::UntypedReturnSpecial => {
                "Missing return type annotation for special method".to_owned()
            }
            Code::UntypedReturnStaticmethod => {
                "Missing return type annotation for staticmethod".to_owned()
            }
            Code::UntypedReturnClassmethod => {
                "Missing return type annotation for classmethod".to_owned()
            }
            Code::UntypedReturnProperty => {
                "Missing return type annotation for property".to_owned()
            }
            Code::MixedAnnotationStyles => {
                "Mixing type annotations and type comments is not allowed".to_owned()
            }
            Code::DynamicTyping => {
                "Dynamically typed expressions (Any) are disallowed".to_owned()
            }
        }
    }
}

pub const ALL_CODES: &[Code] = &[
    Code::UntypedArgument,
    Code::UntypedVararg,
    Code::UntypedKwarg,
    Code::UntypedSelf,
    Code::UntypedCls,
    Code::UntypedPropertySelf,
    Code::UntypedReturnPublic,
    Code::UntypedReturnProtected,
    Code::UntypedReturnPrivate,
    Code::UntypedReturnSpecial,
    Code::UntypedReturnStaticmethod,
    Code::UntypedReturnClassmethod,
    Code::UntypedReturnProperty,
    Code::MixedAnnotationStyles,
    Code::DynamicTyping,
];

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_their_string_form() {
        for code in ALL_CODES {
            assert_eq!(Code::parse(code.as_str()), Some(*code));
        }
        assert_eq!(Code::parse("ann101"), Some(Code::UntypedSelf));
        assert_eq!(Code::parse("ANN999"), None);
    }

    #[test]
    fn argument_messages_interpolate_the_subject() {
        assert_eq!(
            Code::UntypedArgument.message("payload"),
            "Missing type annotation for function argument 'payload'"
        );
        assert_eq!(
            Code::UntypedVararg.message("args"),
            "Missing type annotation for *args"
        );
        assert_eq!(
            Code::UntypedKwarg.message("kwargs"),
            "Missing type annotation for **kwargs"
        );
    }
}
