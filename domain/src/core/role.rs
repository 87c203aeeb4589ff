//! Role value object representing a council domain

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The seven fixed council domains (Value Object)
///
/// The set is closed at compile time; every round consults all seven.
/// `Safety` is the only role allowed to veto a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Mind,
    Body,
    Fuel,
    Rest,
    Belong,
    Safety,
    Purpose,
}

impl Role {
    /// Get the string identifier for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mind => "mind",
            Role::Body => "body",
            Role::Fuel => "fuel",
            Role::Rest => "rest",
            Role::Belong => "belong",
            Role::Safety => "safety",
            Role::Purpose => "purpose",
        }
    }

    /// All seven roles, in declaration order
    pub fn all() -> [Role; 7] {
        [
            Role::Mind,
            Role::Body,
            Role::Fuel,
            Role::Rest,
            Role::Belong,
            Role::Safety,
            Role::Purpose,
        ]
    }

    /// Static description of this role's focus and expertise
    pub fn description(&self) -> &'static str {
        match self {
            Role::Mind => {
                "Cognitive health, emotional processing, mental clarity, learning, and decision-making patterns"
            }
            Role::Body => {
                "Physical health, movement, medical needs, pain management, and energy levels"
            }
            Role::Fuel => "Nutrition, resources, energy inputs, and sustainable consumption patterns",
            Role::Rest => "Sleep, recovery, restoration, and processing time",
            Role::Belong => "Connection, relationships, community, and shared purpose",
            Role::Safety => {
                "Physical and emotional security, risk assessment, boundary protection, and harm prevention (holds veto power)"
            }
            Role::Purpose => "Meaning, goals, contribution, and legacy building",
        }
    }

    /// Check if this is the safety role (the only one with veto privileges)
    pub fn is_safety(&self) -> bool {
        matches!(self, Role::Safety)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mind" => Ok(Role::Mind),
            "body" => Ok(Role::Body),
            "fuel" => Ok(Role::Fuel),
            "rest" => Ok(Role::Rest),
            "belong" => Ok(Role::Belong),
            "safety" => Ok(Role::Safety),
            "purpose" => Ok(Role::Purpose),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
