//! Settings that control the behaviour of the driver.
use dunion_target::{Target, data_layout::TargetDataLayout};
use dunion_utils::printing::CharacterSet;
use dunion_value::Comparability;

/// Various settings that are present on the driver.
#[derive(Debug, Clone, Default)]
pub struct CompilerSettings {
    /// Print debug logs.
    pub debug: bool,

    /// The target that layouts are computed for.
    pub target: Target,

    /// The characters that are used when drawing tables.
    pub character_set: CharacterSet,

    /// Whether unreachable handlers are reported as errors rather than
    /// warnings.
    pub unreachable_handlers_are_errors: bool,

    /// How values of different unions are compared.
    pub comparability: Comparability,
}

impl CompilerSettings {
    /// The data layout of the selected target.
    pub fn data_layout(&self) -> TargetDataLayout {
        TargetDataLayout::from_target(&self.target)
    }
}
