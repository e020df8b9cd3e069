use levelq::Level;

/// Repair urgency, mapped onto queue levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum RepairPriority {
    /// Routine maintenance (served last)
    Low = 1,

    /// Regular repairs
    Medium = 11,

    /// Cars that cannot be driven (served first)
    High = 111,
}

impl RepairPriority {
    /// All priority levels, low to high
    pub fn all() -> &'static [RepairPriority] {
        &[Self::Low, Self::Medium, Self::High]
    }

    pub fn level(self) -> Level {
        self as Level
    }

    pub fn from_level(level: Level) -> Option<Self> {
        match level {
            1 => Some(Self::Low),
            11 => Some(Self::Medium),
            111 => Some(Self::High),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}
