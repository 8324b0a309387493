//! Definitions to describe the target whose data layout the union layouts
//! are planned for.

pub mod abi;
pub mod alignment;
pub mod data_layout;
pub mod primitives;
pub mod size;

use std::{env::consts::ARCH, fmt};

/// The target that layouts are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// The size of the pointer for the target in bytes.
    pub pointer_width: usize,

    /// The name of the target.
    pub name: TargetName,
}

/// The architectures that layouts can be computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetName {
    X86,
    X86_64,
    Aarch64,
    Arm,
}

impl TargetName {
    /// Every supported architecture, in the order they are listed to users.
    pub const ALL: [TargetName; 4] =
        [TargetName::X86, TargetName::X86_64, TargetName::Arm, TargetName::Aarch64];

    pub fn as_str(self) -> &'static str {
        match self {
            TargetName::X86 => "x86",
            TargetName::X86_64 => "x86_64",
            TargetName::Aarch64 => "aarch64",
            TargetName::Arm => "arm",
        }
    }

    /// The pointer width of the architecture, in bytes.
    pub fn pointer_width(self) -> usize {
        match self {
            TargetName::X86 | TargetName::Arm => 4,
            TargetName::X86_64 | TargetName::Aarch64 => 8,
        }
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Target {
    /// Create a new target from the given name and pointer width.
    pub fn new(name: TargetName, pointer_width: usize) -> Self {
        Self { name, pointer_width }
    }

    /// Look up a supported target by the name of its architecture.
    pub fn from_string(name: &str) -> Option<Self> {
        let name = TargetName::ALL.into_iter().find(|target| target.as_str() == name)?;
        Some(Self::new(name, name.pointer_width()))
    }
}

impl Default for Target {
    /// The host, or `x86_64` if the host architecture is not supported.
    fn default() -> Self {
        Self::from_string(ARCH)
            .unwrap_or_else(|| Self::new(TargetName::X86_64, TargetName::X86_64.pointer_width()))
    }
}
