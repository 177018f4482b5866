// ------------------------------------------------------------------------------------------------
// --- Spoken commands of the voice interaction mode
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VoiceSpeed {
    Slow,
    Normal,
    Fast,
}

/// What a spoken phrase asks the app to do.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum VoiceCommand {
    Emergency,
    Navigate {
        destination: &'static str,
    },
    FindAccessibleRoutes,
    SelectRoute {
        #[serde(rename = "routeIndex")]
        route_index: usize,
    },
    Confirm {
        value: bool,
    },
    Repeat,
    ChangeVoiceSpeed,
    SetSpeed {
        speed: VoiceSpeed,
    },
    ChangeLanguage,
    EmergencyContacts,
    PostUpdate,
    NearbyUpdates,
    AskHelp,
    Next,
    ClearAlerts,
    Unknown {
        command: String,
    },
}

struct Rule {
    phrases: &'static [&'static str],
    command: VoiceCommand,
}

const fn rule(phrases: &'static [&'static str], command: VoiceCommand) -> Rule {
    Rule { phrases, command }
}

// First match wins. Phrases are matched as substrings, so earlier rules shadow
// later ones: "emergency contact" is an emergency, "normal" is a "no" and
// "clear alerts" opens the alerts page.
static RULES: &[Rule] = &[
    rule(&["emergency", "help me", "urgent"], VoiceCommand::Emergency),
    rule(
        &["navigate", "navigation"],
        VoiceCommand::Navigate {
            destination: "/navigate",
        },
    ),
    rule(&["home"], VoiceCommand::Navigate { destination: "/" }),
    rule(
        &["alert"],
        VoiceCommand::Navigate {
            destination: "/alerts",
        },
    ),
    rule(
        &["community"],
        VoiceCommand::Navigate {
            destination: "/community",
        },
    ),
    rule(
        &["setting"],
        VoiceCommand::Navigate {
            destination: "/settings",
        },
    ),
    rule(
        &["find accessible route", "accessible route"],
        VoiceCommand::FindAccessibleRoutes,
    ),
    rule(
        &["route 1", "route one", "first route", "option 1"],
        VoiceCommand::SelectRoute { route_index: 0 },
    ),
    rule(
        &["route 2", "route two", "second route", "option 2"],
        VoiceCommand::SelectRoute { route_index: 1 },
    ),
    rule(
        &["route 3", "route three", "third route", "option 3"],
        VoiceCommand::SelectRoute { route_index: 2 },
    ),
    rule(
        &["confirm", "yes", "correct", "okay", "ok", "sure"],
        VoiceCommand::Confirm { value: true },
    ),
    rule(
        &["no", "cancel", "wrong", "incorrect"],
        VoiceCommand::Confirm { value: false },
    ),
    rule(&["repeat", "say again", "again"], VoiceCommand::Repeat),
    rule(
        &["change voice speed", "voice speed"],
        VoiceCommand::ChangeVoiceSpeed,
    ),
    rule(
        &["slow"],
        VoiceCommand::SetSpeed {
            speed: VoiceSpeed::Slow,
        },
    ),
    rule(
        &["normal"],
        VoiceCommand::SetSpeed {
            speed: VoiceSpeed::Normal,
        },
    ),
    rule(
        &["fast"],
        VoiceCommand::SetSpeed {
            speed: VoiceSpeed::Fast,
        },
    ),
    rule(&["change language"], VoiceCommand::ChangeLanguage),
    rule(&["emergency contact"], VoiceCommand::EmergencyContacts),
    rule(&["post update"], VoiceCommand::PostUpdate),
    rule(
        &["hear nearby update", "nearby update"],
        VoiceCommand::NearbyUpdates,
    ),
    rule(&["ask for help"], VoiceCommand::AskHelp),
    rule(&["next"], VoiceCommand::Next),
    rule(&["clear alert"], VoiceCommand::ClearAlerts),
];

/// Maps a recognised phrase to a command. Matching ignores case and the
/// surrounding whitespace.
pub fn process_voice_command(phrase: &str) -> VoiceCommand {
    let phrase = phrase.trim().to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.phrases.iter().any(|p| phrase.contains(p)))
        .map(|rule| rule.command.clone())
        .unwrap_or_else(|| {
            log::debug!("Unrecognised voice command {phrase:?}");
            VoiceCommand::Unknown { command: phrase }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_log::test;

    #[test]
    fn test_emergency_comes_first() {
        assert_eq!(process_voice_command("Help me please"), VoiceCommand::Emergency);
        assert_eq!(
            process_voice_command("call my emergency contact"),
            VoiceCommand::Emergency
        );
    }

    #[test]
    fn test_pages() {
        assert_eq!(
            process_voice_command("  Go HOME "),
            VoiceCommand::Navigate { destination: "/" }
        );
        assert_eq!(
            process_voice_command("clear alerts"),
            VoiceCommand::Navigate {
                destination: "/alerts"
            }
        );
        assert_eq!(
            process_voice_command("open settings"),
            VoiceCommand::Navigate {
                destination: "/settings"
            }
        );
    }

    #[test]
    fn test_route_selection() {
        assert_eq!(
            process_voice_command("route two"),
            VoiceCommand::SelectRoute { route_index: 1 }
        );
        assert_eq!(
            process_voice_command("take the third route"),
            VoiceCommand::SelectRoute { route_index: 2 }
        );
        assert_eq!(
            process_voice_command("find accessible route"),
            VoiceCommand::FindAccessibleRoutes
        );
    }

    #[test]
    fn test_confirmation_and_speed() {
        assert_eq!(process_voice_command("yes"), VoiceCommand::Confirm { value: true });
        assert_eq!(process_voice_command("cancel"), VoiceCommand::Confirm { value: false });
        assert_eq!(
            process_voice_command("slow"),
            VoiceCommand::SetSpeed {
                speed: VoiceSpeed::Slow
            }
        );
        // "normal" contains "no".
        assert_eq!(process_voice_command("normal"), VoiceCommand::Confirm { value: false });
        assert_eq!(process_voice_command("voice speed"), VoiceCommand::ChangeVoiceSpeed);
    }

    #[test]
    fn test_community_phrases() {
        assert_eq!(process_voice_command("post update"), VoiceCommand::PostUpdate);
        assert_eq!(process_voice_command("nearby updates"), VoiceCommand::NearbyUpdates);
        assert_eq!(process_voice_command("ask for help"), VoiceCommand::AskHelp);
        assert_eq!(process_voice_command("change language"), VoiceCommand::ChangeLanguage);
    }

    #[test]
    fn test_unknown_keeps_normalised_phrase() {
        assert_eq!(
            process_voice_command("  What Is This "),
            VoiceCommand::Unknown {
                command: "what is this".to_string()
            }
        );
    }

    #[test]
    fn test_json_shape() {
        assert_eq!(
            serde_json::to_value(process_voice_command("option 1")).unwrap(),
            json!({"action": "selectRoute", "routeIndex": 0})
        );
        assert_eq!(
            serde_json::to_value(process_voice_command("fast")).unwrap(),
            json!({"action": "setSpeed", "speed": "fast"})
        );
    }
}
