//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use chrono::{Duration, TimeZone, Utc};
    use giftclaim_core::{
        AuditAction, AuditEvent, ClaimReport, CodeClaims, CodeSet, GiftCode, PairResult, Player,
        PlayerId, PlayerStats, RequestMeta,
    };
    use serde_json::json;

    fn id(raw: &str) -> PlayerId {
        PlayerId::parse(raw).unwrap()
    }

    #[test]
    fn test_format_codes_active_only() {
        let formatter = TextFormatter::new(false);
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        let codes: CodeSet = [
            GiftCode::active("WINTER2025"),
            GiftCode::expired("SUMMER2024"),
        ]
        .into_iter()
        .collect();

        let output = formatter.format_codes(&codes, false, now);

        assert!(output.contains("Active codes (1)"));
        assert!(output.contains("WINTER2025"));
        assert!(output.contains("no expiry"));
        assert!(!output.contains("SUMMER2024"));
    }

    #[test]
    fn test_format_codes_with_expired() {
        let formatter = TextFormatter::new(false);
        let now = Utc::now();
        let codes: CodeSet = [GiftCode::expired("SUMMER2024")].into_iter().collect();

        let output = formatter.format_codes(&codes, true, now);

        assert!(output.contains("none listed"));
        assert!(output.contains("Expired codes (1)"));
        assert!(output.contains("SUMMER2024"));
    }

    #[test]
    fn test_format_code_claims() {
        let formatter = TextFormatter::new(false);
        let now = Utc::now();
        let mut code = GiftCode::active("ABC123");
        code.expires_at = Some(now + Duration::minutes(30));
        let entries = vec![
            CodeClaims::new(code, vec!["12345678".into(), "87654321".into()]),
            CodeClaims::new(GiftCode::active("DEF456"), vec!["12345678".into()]),
        ];

        let output = formatter.format_code_claims(&entries, now);

        assert!(output.contains("2 claims"));
        assert!(output.contains("1 claim\n"));
        assert!(output.contains("87654321"));
        assert!(output.contains("expires in"));
    }

    #[test]
    fn test_format_players() {
        let formatter = TextFormatter::new(false);
        let mut player = Player::new(id("12345678")).verified_with(None);
        player.total_claims = 7;

        let output = formatter.format_players(&[player]);

        assert!(output.contains("Player"));
        assert!(output.contains("12345678"));
        assert!(output.contains('✓'));
        assert!(output.contains(" 7 "));
    }

    #[test]
    fn test_format_players_empty() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_players(&[]), "No players registered");
    }

    #[test]
    fn test_format_player_added_shows_nickname() {
        let formatter = TextFormatter::new(false);
        let player = Player::new(id("12345678"))
            .verified_with(Some(json!({"code": 0, "data": {"nickname": "Lord Tester"}})));

        let output = formatter.format_player_added(&player);

        assert_eq!(output, "✓ Added player 12345678 (Lord Tester)");
    }

    #[test]
    fn test_format_stats_unregistered() {
        let formatter = TextFormatter::new(false);
        let stats = PlayerStats {
            player_id: id("12345678"),
            total_claims: 3,
            last_claimed: None,
            added_at: None,
        };

        let output = formatter.format_stats(&stats);

        assert!(output.contains("Player 12345678"));
        assert!(output.contains("Claims:       3"));
        assert!(output.contains("Added:        −"));
    }

    #[test]
    fn test_format_report() {
        let formatter = TextFormatter::new(false);
        let mut report = ClaimReport {
            total_codes: 1,
            skipped: 2,
            ..ClaimReport::default()
        };
        report.push(PairResult::failure(id("10000001"), "ABC123", "Login failed"));
        report.push(PairResult::success(id("10000002"), "ABC123"));

        let output = formatter.format_report(&report);

        assert!(output.contains("✗ 10000001 ABC123 Login failed"));
        assert!(output.contains("✓ 10000002 ABC123"));
        assert!(output.contains("1 of 1 codes claimed: 1 succeeded, 1 failed, 2 skipped"));
    }

    #[test]
    fn test_format_report_colors_failures() {
        let formatter = TextFormatter::new(true);
        let mut report = ClaimReport::default();
        report.push(PairResult::failure(id("10000001"), "ABC123", "Code expired"));

        let output = formatter.format_report(&report);

        assert!(output.contains("\x1b[31m✗"));
    }

    #[test]
    fn test_format_audit() {
        let formatter = TextFormatter::new(false);
        let meta = RequestMeta::default();
        let mut details = serde_json::Map::new();
        details.insert("details".into(), json!("Player 12345678 added"));
        let event = AuditEvent::new(AuditAction::PlayerAdded, &meta, details);

        let output = formatter.format_audit(&[event]);

        assert!(output.contains("PLAYER_ADDED"));
        assert!(output.contains("Player 12345678 added"));
        assert_eq!(formatter.format_audit(&[]), "No audit events");
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use chrono::{TimeZone, Utc};
    use giftclaim_core::{ClaimReport, CodeClaims, GiftCode, PairResult, PlayerId};
    use serde_json::Value;

    #[test]
    fn test_claim_report_field_names() {
        let formatter = JsonFormatter::new(false);
        let mut report = ClaimReport {
            total_codes: 1,
            ..ClaimReport::default()
        };
        report.push(PairResult::success(PlayerId::parse("12345678").unwrap(), "ABC123"));

        let output = formatter.format(&report).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["codesClaimed"][0], "ABC123");
        assert_eq!(value["totalCodes"], 1);
        assert_eq!(value["results"][0]["playerId"], "12345678");
        assert_eq!(value["results"][0]["giftCode"], "ABC123");
        assert_eq!(value["results"][0]["success"], true);
    }

    #[test]
    fn test_code_claims_output() {
        let formatter = JsonFormatter::new(false);
        let fetched_at = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        let entries = vec![CodeClaims::new(
            GiftCode::active("ABC123"),
            vec!["12345678".into()],
        )];

        let output = formatter.format_code_claims(&entries, fetched_at).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["fetchedAt"], "2025-01-10T12:00:00+00:00");
        assert_eq!(value["codes"][0]["code"], "ABC123");
        assert_eq!(value["codes"][0]["claimCount"], 1);
        assert_eq!(value["codes"][0]["claimedBy"][0], "12345678");
    }
}
