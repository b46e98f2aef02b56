//! Game servers: provisioned and controlled by the backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;
use crate::time::{Timestamp, parse_backend_timestamp};

/// Supported game-server flavours.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameserverKind {
    #[default]
    MinecraftJava,
    MinecraftBedrock,
    BeamMp,
    Valheim,
    Battlefield2Aix,
    Other(String),
}

impl GameserverKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MinecraftJava => "minecraft-java",
            Self::MinecraftBedrock => "minecraft-bedrock",
            Self::BeamMp => "beammp",
            Self::Valheim => "valheim",
            Self::Battlefield2Aix => "battlefield2-aix",
            Self::Other(raw) => raw,
        }
    }

    /// Display label for listings.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::MinecraftJava => "Minecraft Java Edition",
            Self::MinecraftBedrock => "Minecraft Bedrock Edition",
            Self::BeamMp => "BeamMP (BeamNG.drive)",
            Self::Valheim => "Valheim",
            Self::Battlefield2Aix => "Battlefield 2 AIX Mod",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for GameserverKind {
    fn from(raw: &str) -> Self {
        match raw {
            "minecraft-java" => Self::MinecraftJava,
            "minecraft-bedrock" => Self::MinecraftBedrock,
            "beammp" => Self::BeamMp,
            "valheim" => Self::Valheim,
            "battlefield2-aix" => Self::Battlefield2Aix,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for GameserverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for GameserverKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GameserverKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// Run state of a game server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameserverStatus {
    Running,
    Installing,
    Error,
    #[default]
    #[serde(other)]
    Stopped,
}

impl fmt::Display for GameserverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::Stopped => f.write_str("stopped"),
            Self::Installing => f.write_str("installing"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Lifecycle verb for `gameserver/{name}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameserverAction {
    Start,
    Stop,
    Restart,
}

impl GameserverAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }
}

impl fmt::Display for GameserverAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameserverAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "restart" => Ok(Self::Restart),
            other => Err(ValidationError::UnknownVariant {
                kind: "game server action",
                value: other.to_string(),
            }),
        }
    }
}

/// A game server as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gameserver {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: GameserverKind,
    #[serde(default, deserialize_with = "lenient_u16")]
    pub port: u16,
    #[serde(default, deserialize_with = "lenient_u16")]
    pub ram: u16,
    #[serde(default)]
    pub status: GameserverStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

impl Gameserver {
    #[must_use]
    pub fn created_at(&self) -> Option<Timestamp> {
        self.created.as_deref().and_then(parse_backend_timestamp)
    }

    /// Whether `action` makes sense in the current state.
    #[must_use]
    pub fn allows(&self, action: GameserverAction) -> bool {
        match action {
            GameserverAction::Start => !matches!(
                self.status,
                GameserverStatus::Running | GameserverStatus::Installing
            ),
            GameserverAction::Stop | GameserverAction::Restart => {
                self.status == GameserverStatus::Running
            }
        }
    }

    /// Deleting a running server is refused.
    #[must_use]
    pub fn allows_delete(&self) -> bool {
        self.status != GameserverStatus::Running
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::NotAllowed`] when [`allows`](Self::allows) is false.
    pub fn ensure_allows(&self, action: GameserverAction) -> Result<(), ValidationError> {
        if self.allows(action) {
            Ok(())
        } else {
            Err(self.not_allowed(action.as_str()))
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::NotAllowed`] while the server is running.
    pub fn ensure_deletable(&self) -> Result<(), ValidationError> {
        if self.allows_delete() {
            Ok(())
        } else {
            Err(self.not_allowed("delete"))
        }
    }

    fn not_allowed(&self, action: &'static str) -> ValidationError {
        ValidationError::NotAllowed {
            action,
            target: self.name.clone(),
            state: self.status.to_string(),
        }
    }
}

/// The backend stores form input verbatim, so numbers may arrive as strings.
fn lenient_u16<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u16),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Creation request for a new game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameserverSpec {
    #[serde(rename = "type")]
    pub kind: GameserverKind,
    pub name: String,
    pub port: u16,
    pub ram: u16,
}

impl GameserverSpec {
    /// Build a validated creation request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the name is blank, the port is
    /// zero or less than 1 GB of RAM is requested.
    pub fn new(
        kind: GameserverKind,
        name: &str,
        port: u16,
        ram: u16,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if port == 0 {
            return Err(ValidationError::ZeroPort);
        }
        if ram == 0 {
            return Err(ValidationError::InsufficientRam);
        }
        Ok(Self {
            kind,
            name: name.to_string(),
            port,
            ram,
        })
    }
}

/// Main configuration file of a game server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameserverConfig {
    #[serde(default = "default_config_file")]
    pub file: String,
    pub content: String,
}

fn default_config_file() -> String {
    "config".to_string()
}

/// Recent logs of a game server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameserverLogs {
    pub last_error: Option<String>,
    pub logs: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(status: GameserverStatus) -> Gameserver {
        Gameserver {
            name: "survival".to_string(),
            kind: GameserverKind::MinecraftJava,
            port: 25565,
            ram: 4,
            status,
            created: None,
        }
    }

    #[test]
    fn should_roundtrip_known_and_custom_kinds() {
        assert_eq!(GameserverKind::from("valheim"), GameserverKind::Valheim);
        let custom = GameserverKind::from("terraria");
        assert_eq!(custom.as_str(), "terraria");
        assert_eq!(custom.label(), "terraria");
    }

    #[test]
    fn should_accept_numbers_sent_as_strings() {
        let server: Gameserver = serde_json::from_str(
            r#"{"name":"s","type":"beammp","port":"30814","ram":"2","status":"running"}"#,
        )
        .unwrap();
        assert_eq!(server.port, 30814);
        assert_eq!(server.ram, 2);
        assert_eq!(server.kind, GameserverKind::BeamMp);
    }

    #[test]
    fn should_treat_unrecognised_status_as_stopped() {
        let server: Gameserver =
            serde_json::from_str(r#"{"name":"s","port":1,"ram":1,"status":""}"#).unwrap();
        assert_eq!(server.status, GameserverStatus::Stopped);

        let server: Gameserver =
            serde_json::from_str(r#"{"name":"s","port":1,"ram":1,"status":"crashed"}"#).unwrap();
        assert_eq!(server.status, GameserverStatus::Stopped);
    }

    #[test]
    fn should_decode_known_statuses() {
        let statuses: Vec<GameserverStatus> =
            serde_json::from_str(r#"["running","installing","error","stopped"]"#).unwrap();
        assert_eq!(
            statuses,
            [
                GameserverStatus::Running,
                GameserverStatus::Installing,
                GameserverStatus::Error,
                GameserverStatus::Stopped,
            ]
        );
        assert_eq!(
            serde_json::to_string(&GameserverStatus::Installing).unwrap(),
            r#""installing""#
        );
    }

    #[test]
    fn should_only_allow_start_when_idle() {
        assert!(server(GameserverStatus::Stopped).allows(GameserverAction::Start));
        assert!(!server(GameserverStatus::Running).allows(GameserverAction::Start));
        assert!(!server(GameserverStatus::Installing).allows(GameserverAction::Start));
    }

    #[test]
    fn should_only_allow_stop_and_restart_when_running() {
        assert!(server(GameserverStatus::Running).allows(GameserverAction::Stop));
        assert!(!server(GameserverStatus::Error).allows(GameserverAction::Restart));
    }

    #[test]
    fn should_refuse_delete_while_running() {
        assert!(!server(GameserverStatus::Running).allows_delete());
        assert!(server(GameserverStatus::Error).allows_delete());
        assert_eq!(
            server(GameserverStatus::Running)
                .ensure_deletable()
                .unwrap_err()
                .to_string(),
            "cannot delete 'survival' while it is running"
        );
    }

    #[test]
    fn should_validate_spec() {
        let kind = GameserverKind::MinecraftJava;
        assert_eq!(
            GameserverSpec::new(kind.clone(), " ", 25565, 4),
            Err(ValidationError::EmptyField("name"))
        );
        assert_eq!(
            GameserverSpec::new(kind.clone(), "s", 0, 4),
            Err(ValidationError::ZeroPort)
        );
        assert_eq!(
            GameserverSpec::new(kind.clone(), "s", 25565, 0),
            Err(ValidationError::InsufficientRam)
        );
        assert!(GameserverSpec::new(kind, "s", 25565, 4).is_ok());
    }

    #[test]
    fn should_serialize_spec_with_type_field() {
        let spec = GameserverSpec::new(GameserverKind::Valheim, "viking", 2456, 8).unwrap();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "valheim");
        assert_eq!(json["port"], 2456);
    }
}
