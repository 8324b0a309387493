//! Error code definitions. Every error that can be reported carries a stable
//! code so that tooling and users can refer to it.
use std::fmt;

macro_rules! error_codes {
    ($($name:ident = $code:expr),* $(,)?) => {
        /// All of the error codes that can be attached to a
        /// [crate::report::Report].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ErrorCode {
            $($name,)*
        }

        impl ErrorCode {
            /// Get the numeric value of the [ErrorCode].
            pub fn to_num(&self) -> u32 {
                match self {
                    $(ErrorCode::$name => $code,)*
                }
            }

            /// Get the name of the [ErrorCode].
            pub fn name(&self) -> &'static str {
                match self {
                    $(ErrorCode::$name => stringify!($name),)*
                }
            }
        }
    };
}

error_codes! {
    // Declaration errors
    DuplicateVariantName = 1,
    EmptySchema = 2,
    DuplicateFieldName = 3,
    UnknownFieldType = 4,
    MalformedDeclaration = 5,
    ReservedVariantName = 6,

    // Construction errors
    UnknownVariant = 10,
    ArityMismatch = 11,
    TypeMismatch = 12,
    VariantOutOfBounds = 13,

    // Access errors
    InactiveVariantAccess = 20,
    FieldOutOfBounds = 21,
    SchemaMismatch = 22,

    // Matching diagnostics
    NonExhaustiveMatch = 30,
    UnreachableHandler = 31,

    // Driver errors
    InvalidArgument = 40,
    Io = 41,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.to_num())
    }
}
