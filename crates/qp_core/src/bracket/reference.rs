//! Slot reference grammar.
//!
//! The catalog feed describes bracket participants with loose natural-language
//! fragments, mostly Spanish ("1º Grupo A", "Ganador Partido 77", "3º Grupos
//! A/B/C/D") with the occasional English equivalent. Parsing happens once at
//! data-entry time and produces a tagged reference; resolution passes only
//! ever see the tagged form. Text the parser does not recognize is not an
//! error, it just leaves the slot for an administrator.

use serde::{Deserialize, Serialize};

use crate::models::GroupCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcomeKind {
    Winner,
    Loser,
}

/// Parsed form of a slot reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotReference {
    /// "Position P of group G", P in {1, 2}.
    GroupPosition { group: GroupCode, position: u32 },
    /// "Winner of match N" / "Loser of match N".
    MatchOutcome {
        match_number: u32,
        outcome: MatchOutcomeKind,
    },
    /// "Third place from groups {G1, G2, ...}".
    ThirdPlaceCombo { allowed_groups: Vec<GroupCode> },
}

pub fn parse_reference(text: &str) -> Option<SlotReference> {
    let upper = text.to_uppercase();
    let tokens: Vec<&str> = upper
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.is_empty() {
        return None;
    }

    let has = |word: &str| tokens.iter().any(|token| *token == word);
    let winner = has("GANADOR") || has("WINNER");
    let loser = has("PERDEDOR") || has("LOSER");
    let group_word = has("GRUPO") || has("GRUPOS") || has("GROUP") || has("GROUPS");

    let numbers: Vec<u32> = tokens.iter().filter_map(|token| leading_number(token)).collect();
    let letters: Vec<GroupCode> = tokens
        .iter()
        .filter(|token| token.len() == 1 && token.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|token| GroupCode::new(*token))
        .collect();

    // Match-outcome references: "Ganador Partido 77", "Loser match 61",
    // "Perdedor 49".
    if (winner || loser) && !group_word {
        let match_number = *numbers.first()?;
        let outcome = if winner {
            MatchOutcomeKind::Winner
        } else {
            MatchOutcomeKind::Loser
        };
        return Some(SlotReference::MatchOutcome {
            match_number,
            outcome,
        });
    }

    // "Ganador Grupo A" is the group winner, not a match outcome. There is
    // no "loser of a group".
    if winner && group_word && letters.len() == 1 {
        return Some(SlotReference::GroupPosition {
            group: letters[0].clone(),
            position: 1,
        });
    }
    if loser {
        return None;
    }

    let ordinal = numbers
        .first()
        .copied()
        .or_else(|| spelled_ordinal(&tokens))?;

    match ordinal {
        // "3º Grupos A/B/C/D"; a single allowed group is the degenerate
        // combination.
        3 if !letters.is_empty() => Some(SlotReference::ThirdPlaceCombo {
            allowed_groups: letters,
        }),
        1 | 2 if letters.len() == 1 => Some(SlotReference::GroupPosition {
            group: letters[0].clone(),
            position: ordinal,
        }),
        _ => None,
    }
}

/// "1", "1ST", "2DO", "3RO" all carry their ordinal up front.
fn leading_number(token: &str) -> Option<u32> {
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

fn spelled_ordinal(tokens: &[&str]) -> Option<u32> {
    for token in tokens {
        let ordinal = match *token {
            "PRIMERO" | "PRIMER" | "FIRST" => 1,
            "SEGUNDO" | "SECOND" => 2,
            "TERCERO" | "TERCER" | "THIRD" => 3,
            _ => continue,
        };
        return Some(ordinal);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(code: &str) -> GroupCode {
        GroupCode::new(code)
    }

    #[test]
    fn parses_group_position_references() {
        assert_eq!(
            parse_reference("1º Grupo A"),
            Some(SlotReference::GroupPosition {
                group: group("A"),
                position: 1
            })
        );
        assert_eq!(
            parse_reference("2do Grupo F"),
            Some(SlotReference::GroupPosition {
                group: group("F"),
                position: 2
            })
        );
        assert_eq!(
            parse_reference("Segundo Grupo B"),
            Some(SlotReference::GroupPosition {
                group: group("B"),
                position: 2
            })
        );
        assert_eq!(
            parse_reference("Winner Group C"),
            Some(SlotReference::GroupPosition {
                group: group("C"),
                position: 1
            })
        );
    }

    #[test]
    fn parses_match_outcome_references() {
        assert_eq!(
            parse_reference("Ganador Partido 77"),
            Some(SlotReference::MatchOutcome {
                match_number: 77,
                outcome: MatchOutcomeKind::Winner
            })
        );
        assert_eq!(
            parse_reference("Perdedor 61"),
            Some(SlotReference::MatchOutcome {
                match_number: 61,
                outcome: MatchOutcomeKind::Loser
            })
        );
        assert_eq!(
            parse_reference("Loser of match 49"),
            Some(SlotReference::MatchOutcome {
                match_number: 49,
                outcome: MatchOutcomeKind::Loser
            })
        );
    }

    #[test]
    fn parses_third_place_combinations() {
        assert_eq!(
            parse_reference("3º Grupos A/B/C/D"),
            Some(SlotReference::ThirdPlaceCombo {
                allowed_groups: vec![group("A"), group("B"), group("C"), group("D")]
            })
        );
        assert_eq!(
            parse_reference("Tercero Grupos E-F"),
            Some(SlotReference::ThirdPlaceCombo {
                allowed_groups: vec![group("E"), group("F")]
            })
        );
        assert_eq!(
            parse_reference("3rd place Group B"),
            Some(SlotReference::ThirdPlaceCombo {
                allowed_groups: vec![group("B")]
            })
        );
    }

    #[test]
    fn unrecognized_text_is_not_an_error() {
        assert_eq!(parse_reference(""), None);
        assert_eq!(parse_reference("por definir"), None);
        assert_eq!(parse_reference("4º Grupo A"), None);
        assert_eq!(parse_reference("Perdedor Grupo A"), None);
        assert_eq!(parse_reference("Ganador"), None);
    }

    #[test]
    fn reference_serialization_is_tagged() {
        let reference = SlotReference::MatchOutcome {
            match_number: 77,
            outcome: MatchOutcomeKind::Winner,
        };
        let json = serde_json::to_string(&reference).unwrap();
        assert!(json.contains("\"kind\":\"match_outcome\""));
        let back: SlotReference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reference);
    }
}
