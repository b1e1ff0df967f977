//! Fighting-game notation to plain English.

/// Known move names by notation.
const MOVE_NAMES: &[(&str, &str)] = &[
    // Normals
    ("5L", "Light Punch"),
    ("5M", "Medium Punch"),
    ("5H", "Heavy Punch"),
    ("2L", "Crouching Light Kick"),
    ("2M", "Crouching Medium Kick"),
    ("2H", "Crouching Heavy Kick"),
    ("j.L", "Jumping Light Attack"),
    ("j.M", "Jumping Medium Attack"),
    ("j.H", "Jumping Heavy Attack"),
    ("j.2H", "Jumping Down Heavy"),
    // Specials
    ("5S1", "Rocket Grab"),
    ("2S1", "Air Purifier (Down Special)"),
    ("2S2", "Garbage Collection (Command Grab)"),
    ("6S2", "Spinning Turbine"),
    ("j.S1", "Air Rocket Grab"),
    ("j.S2", "Wrecking Ball"),
    // Supers
    ("Super 1", "Helping Hand"),
    ("Super 2", "Static Field"),
    // Universal
    ("Throw", "Throw"),
    ("Air Throw", "Air Throw"),
    ("Tag", "Tag Assist"),
    ("Back Tag", "Back Tag Assist"),
];

fn direction_name(digit: char) -> Option<&'static str> {
    match digit {
        '5' => Some("Neutral"),
        '2' => Some("Down"),
        '6' => Some("Forward"),
        '4' => Some("Back"),
        '8' => Some("Up"),
        _ => None,
    }
}

fn button_name(button: &str) -> &str {
    match button {
        "L" => "Light",
        "M" => "Medium",
        "H" => "Heavy",
        "S" => "Special",
        "S1" => "Special 1",
        "S2" => "Special 2",
        other => other,
    }
}

/// Translate a notation such as `"5L"` or `"2S1"`.
///
/// Unknown notations are parsed structurally (`j.` prefix, numpad direction,
/// button); anything that does not parse is returned unchanged.
pub fn translate(notation: &str) -> String {
    if let Some((_, name)) = MOVE_NAMES.iter().find(|(n, _)| *n == notation) {
        return (*name).to_string();
    }

    let (direction, button) = if let Some(rest) = notation.strip_prefix("j.") {
        (Some("Jumping"), rest)
    } else {
        let mut chars = notation.chars();
        match chars.next() {
            Some(c) if c.is_ascii_digit() && notation.len() >= 2 => {
                (direction_name(c), chars.as_str())
            }
            _ => return notation.to_string(),
        }
    };

    match direction {
        Some(direction) => format!("{} {}", direction, button_name(button)),
        None => button_name(button).to_string(),
    }
}

/// "A", "A, then B", or "A, B, and C". Moves are translated first.
pub fn describe_sequence<S: AsRef<str>>(moves: &[S]) -> String {
    let names: Vec<String> = moves.iter().map(|m| translate(m.as_ref())).collect();
    match names.as_slice() {
        [] => "No moves detected".to_string(),
        [one] => one.clone(),
        [first, second] => format!("{first}, then {second}"),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

/// What the opponent did after `notation` was used.
pub fn describe_response<S: AsRef<str>>(notation: &str, responses: &[S]) -> String {
    let used = translate(notation);
    if responses.is_empty() {
        format!("After {used} was used, opponent did not respond with any moves")
    } else {
        format!(
            "After {used} was used, opponent responded with {}",
            describe_sequence(responses)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup() {
        assert_eq!(translate("5L"), "Light Punch");
        assert_eq!(translate("2S2"), "Garbage Collection (Command Grab)");
        assert_eq!(translate("Super 1"), "Helping Hand");
    }

    #[test]
    fn test_structural_parse() {
        assert_eq!(translate("6H"), "Forward Heavy");
        assert_eq!(translate("4S"), "Back Special");
        assert_eq!(translate("j.2M"), "Jumping 2M");
        assert_eq!(translate("8X"), "Up X");
        assert_eq!(translate("3L"), "Light");
    }

    #[test]
    fn test_untranslatable_returned_verbatim() {
        assert_eq!(translate("Dash"), "Dash");
        assert_eq!(translate("5"), "5");
        assert_eq!(translate(""), "");
    }

    #[test]
    fn test_describe_sequence() {
        let empty: [&str; 0] = [];
        assert_eq!(describe_sequence(&empty), "No moves detected");
        assert_eq!(describe_sequence(&["5L"]), "Light Punch");
        assert_eq!(describe_sequence(&["5L", "5M"]), "Light Punch, then Medium Punch");
        assert_eq!(
            describe_sequence(&["5L", "5M", "5H"]),
            "Light Punch, Medium Punch, and Heavy Punch"
        );
    }

    #[test]
    fn test_describe_response() {
        let none: Vec<String> = Vec::new();
        assert_eq!(
            describe_response("5S1", &none),
            "After Rocket Grab was used, opponent did not respond with any moves"
        );
        assert_eq!(
            describe_response("5S1", &["2L".to_string()]),
            "After Rocket Grab was used, opponent responded with Crouching Light Kick"
        );
    }
}
