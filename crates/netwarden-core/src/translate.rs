// ── Natural-language rule translation ──
//
// Turns an operator-entered line like "Block traffic from 192.168.1.0/24
// to any port 22" into a structured rule-creation request. Extraction
// rules run in a fixed order with documented fallbacks; a missing port is
// the only hard failure, and ambiguous intent resolves to DROP.

use thiserror::Error;

use crate::model::{ANY_ADDR, Chain, RuleSpec, RuleTarget};

/// Translation failures. Surfaced to the caller synchronously; no write
/// is issued on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// No `port <n>` token in the input. Every rule must name a port.
    #[error("no port specified (e.g. \"port 22\")")]
    MissingPort,
}

/// Translate one free-text line into a rule spec.
///
/// Extraction order and fallbacks:
/// 1. port — the digits following a `port`/`ports` token; absent input
///    fails with [`TranslateError::MissingPort`];
/// 2. source — the token following `from`; `any` (case-insensitive) and
///    absence both normalize to `0.0.0.0/0`;
/// 3. destination — the token following `to`, same normalization;
/// 4. action — a leading verb among block/drop/allow/reject; anything
///    else defaults to DROP.
///
/// The chain is always INPUT and the protocol always TCP; neither is
/// inferred from text.
pub fn translate_rule(text: &str) -> Result<RuleSpec, TranslateError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let port = port_token(&tokens).ok_or(TranslateError::MissingPort)?;
    let source = endpoint_token(&tokens, "from");
    let destination = endpoint_token(&tokens, "to");
    let target = action_verb(tokens.first().copied());

    Ok(RuleSpec {
        chain: Chain::Input,
        target,
        protocol: "tcp".into(),
        port,
        source,
        destination,
    })
}

/// The digits following a `port`/`ports` keyword token. Keyword
/// occurrences without a numeric successor are skipped.
fn port_token(tokens: &[&str]) -> Option<u16> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| matches!(t.to_ascii_lowercase().as_str(), "port" | "ports"))
        .find_map(|(i, _)| {
            let value = tokens.get(i + 1)?;
            let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
}

/// The token following `keyword` (`from`/`to`), normalized: a literal
/// `any` and an absent token both map to the canonical any-address.
fn endpoint_token(tokens: &[&str], keyword: &str) -> String {
    let value = tokens
        .iter()
        .position(|t| t.eq_ignore_ascii_case(keyword))
        .and_then(|i| tokens.get(i + 1));

    match value {
        Some(v) if v.eq_ignore_ascii_case("any") => ANY_ADDR.into(),
        Some(v) => trim_punctuation(v).to_owned(),
        None => ANY_ADDR.into(),
    }
}

/// Map the leading verb to a target. Unrecognized or absent verbs default
/// to DROP — ambiguous intent is treated as a block.
fn action_verb(first: Option<&str>) -> RuleTarget {
    match first.map(str::to_ascii_lowercase).as_deref() {
        Some("allow") => RuleTarget::Accept,
        Some("reject") => RuleTarget::Reject,
        Some("block" | "drop") => RuleTarget::Drop,
        _ => RuleTarget::Drop,
    }
}

/// Strip trailing sentence punctuation from an address token.
fn trim_punctuation(token: &str) -> &str {
    token.trim_end_matches([',', '.', ';', '!'])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn allow_with_source_destination_and_port() {
        let spec = translate_rule("Allow traffic from 10.0.0.5 to 192.168.1.10 port 80").unwrap();
        assert_eq!(
            spec,
            RuleSpec {
                chain: Chain::Input,
                target: RuleTarget::Accept,
                protocol: "tcp".into(),
                port: 80,
                source: "10.0.0.5".into(),
                destination: "192.168.1.10".into(),
            }
        );
    }

    #[test]
    fn missing_port_is_the_only_hard_failure() {
        let err = translate_rule("Block traffic from 192.168.1.0/24").unwrap_err();
        assert_eq!(err, TranslateError::MissingPort);
    }

    #[test]
    fn any_normalizes_to_canonical_address_in_any_case() {
        for text in [
            "Block traffic from any to ANY port 22",
            "Block traffic from Any to anY port 22",
        ] {
            let spec = translate_rule(text).unwrap();
            assert_eq!(spec.source, ANY_ADDR);
            assert_eq!(spec.destination, ANY_ADDR);
        }
    }

    #[test]
    fn absent_endpoints_default_to_any() {
        let spec = translate_rule("Block traffic on port 3389").unwrap();
        assert_eq!(spec.source, ANY_ADDR);
        assert_eq!(spec.destination, ANY_ADDR);
    }

    #[test]
    fn block_and_drop_both_map_to_drop() {
        for verb in ["Block", "drop", "DROP"] {
            let spec = translate_rule(&format!("{verb} traffic from any port 22")).unwrap();
            assert_eq!(spec.target, RuleTarget::Drop);
        }
    }

    #[test]
    fn reject_maps_to_reject() {
        let spec = translate_rule("reject traffic from 203.0.113.0/24 port 25").unwrap();
        assert_eq!(spec.target, RuleTarget::Reject);
    }

    #[test]
    fn unrecognized_or_absent_action_defaults_to_drop() {
        for text in [
            "Filter traffic from 10.0.0.1 port 22",
            "traffic from 10.0.0.1 port 22",
            "permit traffic port 22",
        ] {
            let spec = translate_rule(text).unwrap();
            assert_eq!(spec.target, RuleTarget::Drop, "input: {text}");
        }
    }

    #[test]
    fn plural_ports_keyword_also_matches() {
        let spec = translate_rule("Block traffic on ports 8080").unwrap();
        assert_eq!(spec.port, 8080);
    }

    #[test]
    fn chain_and_protocol_are_fixed() {
        let spec = translate_rule("allow traffic from any port 443").unwrap();
        assert_eq!(spec.chain, Chain::Input);
        assert_eq!(spec.protocol, "tcp");
    }

    #[test]
    fn port_with_trailing_text_takes_leading_digits() {
        let spec = translate_rule("Block traffic on port 22, immediately").unwrap();
        assert_eq!(spec.port, 22);
    }
}
