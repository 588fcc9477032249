use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightState {
    Off,
    On,
    Deciding,
    SigningIn,
}

impl LightState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Deciding => "deciding",
            Self::SigningIn => "signing-in",
        }
    }

    /// The bulb keeps glowing while either overlay is up.
    pub fn is_lit(&self) -> bool {
        !matches!(self, Self::Off)
    }

    pub fn shows_overlay(&self) -> bool {
        matches!(self, Self::Deciding | Self::SigningIn)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
}

impl User {
    pub fn signed_in(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_logged_in: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersistedLight {
    On,
    Off,
}

impl PersistedLight {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_off_is_unlit() {
        assert!(!LightState::Off.is_lit());
        assert!(LightState::On.is_lit());
        assert!(LightState::Deciding.is_lit());
        assert!(LightState::SigningIn.is_lit());
    }

    #[test]
    fn user_record_uses_camel_case_flag() {
        let json = serde_json::to_string(&User::signed_in("ada")).unwrap();
        assert_eq!(json, r#"{"username":"ada","isLoggedIn":true}"#);
    }

    #[test]
    fn persisted_light_rejects_unknown_values() {
        assert_eq!(PersistedLight::parse("on"), Some(PersistedLight::On));
        assert_eq!(PersistedLight::parse("off"), Some(PersistedLight::Off));
        assert_eq!(PersistedLight::parse("ON"), None);
        assert_eq!(PersistedLight::parse(""), None);
    }
}
