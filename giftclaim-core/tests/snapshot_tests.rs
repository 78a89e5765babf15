//! Integration tests for core model behavior.

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use giftclaim_core::{CodeSet, GiftCode, Player, PlayerId, PlayerUpdate};

#[test]
fn test_expiry_is_compared_as_utc_instant() {
    // 2025-06-01 00:30 at UTC+02:00 is 2025-05-31 22:30 UTC.
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let expires = offset
        .with_ymd_and_hms(2025, 6, 1, 0, 30, 0)
        .unwrap()
        .with_timezone(&Utc);
    let before = Utc.with_ymd_and_hms(2025, 5, 31, 22, 29, 59).unwrap();
    let at = Utc.with_ymd_and_hms(2025, 5, 31, 22, 30, 0).unwrap();

    assert!(GiftCode::classify("SUMMER", true, Some(expires), before).is_active());
    assert!(!GiftCode::classify("SUMMER", true, Some(expires), at).is_active());
    assert!(!GiftCode::classify("SUMMER", true, Some(expires), at + Duration::hours(5)).is_active());
}

#[test]
fn test_code_set_from_iter_dedupes() {
    let set: CodeSet = vec![
        GiftCode::active("AAA111"),
        GiftCode::active("BBB222"),
        GiftCode::active("AAA111"),
    ]
    .into_iter()
    .collect();

    assert_eq!(set.len(), 2);
    assert_eq!(set.active_codes(), vec!["AAA111", "BBB222"]);
}

#[test]
fn test_player_update_empty() {
    assert!(PlayerUpdate::default().is_empty());
    let update = PlayerUpdate {
        verified: Some(true),
        ..Default::default()
    };
    assert!(!update.is_empty());

    let mut player = Player::new(PlayerId::parse("10000001").unwrap());
    player.apply(&update);
    assert!(player.verified);
}
