// File: glowbot-common/src/models/command.rs

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum privilege required to fire a command.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Regular,
    Patreon,
    SuperChat,
}

impl Default for AccessLevel {
    fn default() -> Self {
        AccessLevel::Regular
    }
}

impl AccessLevel {
    /// Numeric rank used when comparing an invoker against a command gate.
    pub fn rank(&self) -> u8 {
        match self {
            AccessLevel::Regular => 1,
            AccessLevel::Patreon => 2,
            AccessLevel::SuperChat => 3,
        }
    }
}

/// One entry in the command table. The trigger phrase is the table key and
/// lands in `name`; the JSON object holds the rest. What a command does is
/// derived from its name (sound prefix, built-in effect names), not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    /// Per-command cooldown in seconds. Zero means no cooldown.
    #[serde(rename = "timeout", default)]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub access_level: AccessLevel,
}

/// The full command table, in file order. Order matters: when several
/// triggers match one message, the earliest entry in the file wins.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    pub commands: Vec<Command>,
}

impl CommandTable {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }
}

impl Serialize for CommandTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.commands.len()))?;
        for cmd in &self.commands {
            map.serialize_entry(&cmd.name, cmd)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CommandTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = CommandTable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of command name to command body")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut commands = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, mut cmd)) = access.next_entry::<String, Command>()? {
                    if name.is_empty() {
                        return Err(de::Error::custom("command name cannot be empty"));
                    }
                    cmd.name = name;
                    commands.push(cmd);
                }
                Ok(CommandTable { commands })
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_deserialize_preserves_file_order() {
        let raw = r#"{
            "!sound_airhorn": {"enabled": true, "timeout": 5},
            "!bubbles": {"enabled": false},
            "!sound_fanfare": {"enabled": true, "access_level": "superchat"}
        }"#;
        let table: CommandTable = serde_json::from_str(raw).unwrap();
        let names: Vec<&str> = table.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["!sound_airhorn", "!bubbles", "!sound_fanfare"]);
        assert_eq!(table.get("!sound_airhorn").unwrap().timeout_seconds, 5);
        assert_eq!(
            table.get("!bubbles").unwrap().access_level,
            AccessLevel::Regular
        );
        assert_eq!(
            table.get("!sound_fanfare").unwrap().access_level,
            AccessLevel::SuperChat
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let raw = r#"{"!bare": {}}"#;
        let table: CommandTable = serde_json::from_str(raw).unwrap();
        let cmd = table.get("!bare").unwrap();
        assert!(!cmd.enabled);
        assert_eq!(cmd.timeout_seconds, 0);
        assert_eq!(cmd.access_level, AccessLevel::Regular);
    }

    #[test]
    fn serialize_keeps_stored_field_names() {
        let raw = r#"{"!sound_tada": {"enabled": true, "timeout": 30, "access_level": "patreon"}}"#;
        let table: CommandTable = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_string(&table).unwrap();
        assert!(back.contains("\"timeout\":30"));
        assert!(back.contains("\"access_level\":\"patreon\""));
        assert!(!back.contains("timeout_seconds"));
    }

    #[test]
    fn access_level_ranks_are_ordered() {
        assert!(AccessLevel::SuperChat.rank() > AccessLevel::Patreon.rank());
        assert!(AccessLevel::Patreon.rank() > AccessLevel::Regular.rank());
    }
}
