//! Dunion driver arguments management.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dunion::settings::CompilerSettings;
use dunion_reporting::{error_codes::ErrorCode, report::Report};
use dunion_target::{Target, TargetName};
use dunion_utils::printing::{CharacterSet, SequenceDisplay};
use dunion_value::Comparability;

/// A structural representation of the arguments that `dunionc` accepts.
#[derive(Parser)]
#[command(
    name = "dunionc",
    version,
    author = "The Dunion authors",
    about = "Plan layouts, check matches and construct values of discriminated unions"
)]
pub(crate) struct DunionArgs {
    /// Run the driver in debug mode
    #[arg(short, long)]
    pub(crate) debug: bool,

    /// The target to compute layouts for, defaults to the host
    #[arg(short, long)]
    pub(crate) target: Option<String>,

    /// Draw tables with ASCII characters only
    #[arg(long)]
    pub(crate) ascii: bool,

    /// Report unreachable handlers as errors rather than warnings
    #[arg(long)]
    pub(crate) unreachable_errors: bool,

    /// How values of different unions are compared
    #[arg(long, value_enum, default_value_t = ComparabilityArg::Nominal)]
    pub(crate) comparability: ComparabilityArg,

    #[command(subcommand)]
    pub(crate) mode: Mode,
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum ComparabilityArg {
    Nominal,
    Structural,
}

impl From<ComparabilityArg> for Comparability {
    fn from(arg: ComparabilityArg) -> Self {
        match arg {
            ComparabilityArg::Nominal => Comparability::Nominal,
            ComparabilityArg::Structural => Comparability::Structural,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Mode {
    /// Print the layout of the declared unions
    Layout {
        /// The file of union declarations
        filename: PathBuf,

        /// Only print the layout of this union
        #[arg(short, long)]
        union: Option<String>,
    },

    /// Check a list of match arms against a union, `_` is a wildcard arm
    Check {
        /// The file of union declarations
        filename: PathBuf,

        /// The union that is matched on
        union: String,

        /// The arms of the match, in order
        arms: Vec<String>,
    },

    /// Construct a value of a variant
    Construct {
        /// The file of union declarations
        filename: PathBuf,

        /// The union of the value
        union: String,

        /// The variant of the value
        variant: String,

        /// The values of the fields, in declared order
        values: Vec<String>,

        /// Also construct the value in this union, and compare the two
        #[arg(long)]
        compare_with: Option<String>,
    },
}

impl TryFrom<&DunionArgs> for CompilerSettings {
    type Error = Report;

    fn try_from(args: &DunionArgs) -> Result<Self, Self::Error> {
        let target = match &args.target {
            Some(name) => Target::from_string(name).ok_or_else(|| {
                let mut report = Report::new();
                report
                    .code(ErrorCode::InvalidArgument)
                    .title(format!("unknown target `{name}`"))
                    .add_note(
                        "help",
                        format!(
                            "the supported targets are {}",
                            SequenceDisplay::all(&TargetName::ALL)
                        ),
                    );
                report
            })?,
            None => Target::default(),
        };

        let character_set = if args.ascii { CharacterSet::Ascii } else { CharacterSet::Unicode };

        Ok(Self {
            debug: args.debug,
            target,
            character_set,
            unreachable_handlers_are_errors: args.unreachable_errors,
            comparability: args.comparability.into(),
        })
    }
}
