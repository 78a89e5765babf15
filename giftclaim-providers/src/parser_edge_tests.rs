//! Extraction edge case tests.
//!
//! These run the full Kingshot extraction chain over malformed, partial,
//! duplicated, and mixed-encoding listing payloads.

#[cfg(test)]
mod kingshot_extraction_edge_tests {
    use chrono::{DateTime, TimeZone, Utc};
    use giftclaim_core::CodeStatus;

    use crate::kingshot::kingshot_pipeline;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    // ========================================================================
    // Structured Records
    // ========================================================================

    #[test]
    fn test_winter_scenario() {
        let payload = r#"{"code":"WINTER2025","isActive":true,"rewards":"gems","expiresAt":null}"#;
        let outcome = kingshot_pipeline().execute(payload, Utc::now());

        assert_eq!(outcome.codes.len(), 1);
        let code = &outcome.codes.active[0];
        assert_eq!(code.code, "WINTER2025");
        assert_eq!(code.status, CodeStatus::Active);
        assert!(code.expires_at.is_none());
    }

    #[test]
    fn test_same_code_three_times_mixed_quoting() {
        let payload = concat!(
            r#"<script>self.__next_f.push([1,"[{\"code\":\"DUPE2025\",\"isActive\":true,\"expiresAt\":null}]"])</script>"#,
            r#"<script id="data">[{"code":"DUPE2025","isActive":true,"expiresAt":null}]</script>"#,
            r#"<div data-x='{\"code\":\"DUPE2025\",\"isActive\":false,\"expiresAt\":null}'></div>"#,
        );
        let outcome = kingshot_pipeline().execute(payload, Utc::now());

        assert_eq!(outcome.codes.len(), 1);
        assert_eq!(outcome.codes.active_codes(), vec!["DUPE2025"]);
        assert!(outcome.codes.expired.is_empty());
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let payload = r#"{"code":"EDGE1234","isActive":true,"expiresAt":"$D2025-01-01T00:00:00.000Z"}"#;
        let expiry = at(2025, 1, 1, 0, 0, 0);

        let before = kingshot_pipeline().execute(payload, expiry - chrono::Duration::seconds(1));
        let exactly = kingshot_pipeline().execute(payload, expiry);
        let after = kingshot_pipeline().execute(payload, expiry + chrono::Duration::hours(5));

        assert!(before.codes.active[0].is_active());
        assert_eq!(exactly.codes.expired[0].code, "EDGE1234");
        assert_eq!(after.codes.expired[0].code, "EDGE1234");
    }

    #[test]
    fn test_offset_expiry_compared_as_instant() {
        // 02:00 at +03:00 is 23:00 UTC the previous day.
        let payload = r#"{"code":"TZCODE12","isActive":true,"expiresAt":"2025-01-02T02:00:00+03:00"}"#;

        let outcome = kingshot_pipeline().execute(payload, at(2025, 1, 1, 23, 30, 0));

        assert!(outcome.codes.active.is_empty());
        assert_eq!(outcome.codes.expired[0].code, "TZCODE12");
    }

    #[test]
    fn test_malformed_record_skipped_others_kept() {
        let payload = r#"[{"code":"BROKEN11","isActive":maybe},{"code":"GOOD2025","isActive":true,"expiresAt":"not a date"}]"#;
        let outcome = kingshot_pipeline().execute(payload, Utc::now());

        assert_eq!(outcome.codes.active_codes(), vec!["GOOD2025"]);
        assert!(outcome.codes.active[0].expires_at.is_none());
    }

    #[test]
    fn test_lowercase_code_value_ignored_by_structured() {
        let payload = r#"{"code":"en","isActive":true}"#;
        let outcome = kingshot_pipeline().execute(payload, Utc::now());
        assert!(outcome.codes.is_empty());
    }

    #[test]
    fn test_multibyte_text_inside_record_window() {
        let filler = "é".repeat(3000);
        let payload = format!(
            r#"{{"code":"UTF8CODE","title":"{filler}","isActive":true,"expiresAt":null}}"#
        );
        let outcome = kingshot_pipeline().execute(&payload, Utc::now());

        // The flag sits beyond the record window, so the structured record is
        // skipped and the broad scan picks the token up as active.
        assert_eq!(outcome.successful_strategy(), Some("kingshot.broad"));
        assert_eq!(outcome.codes.active_codes(), vec!["UTF8CODE"]);
    }

    // ========================================================================
    // Fallbacks
    // ========================================================================

    #[test]
    fn test_section_fallback_splits_active_and_expired() {
        let html = r#"<!DOCTYPE html><html><body>
            <h2>Active Gift Codes</h2>
            <div class="card"><span>Active</span><span>KSNEW2025</span><span>Expires</span><span>Not specified yet</span></div>
            <h2>Expired Gift Codes</h2>
            <div class="card"><span>KSOLD2024</span><span>Expired</span></div>
        </body></html>"#;
        let outcome = kingshot_pipeline().execute(html, Utc::now());

        assert_eq!(outcome.successful_strategy(), Some("kingshot.sections"));
        assert_eq!(outcome.codes.active_codes(), vec!["KSNEW2025"]);
        assert_eq!(outcome.codes.expired[0].code, "KSOLD2024");
    }

    #[test]
    fn test_broad_fallback_last() {
        let text = "Today: HOLIDAY777 is live. Expired ones: OLDONE111";
        let outcome = kingshot_pipeline().execute(text, Utc::now());

        assert_eq!(outcome.successful_strategy(), Some("kingshot.broad"));
        assert_eq!(outcome.attempts_count(), 3);
        assert_eq!(outcome.codes.active_codes(), vec!["HOLIDAY777"]);
    }

    #[test]
    fn test_empty_payload() {
        let outcome = kingshot_pipeline().execute("", Utc::now());
        assert!(outcome.codes.is_empty());
        assert_eq!(outcome.attempts_count(), 3);
    }

    #[test]
    fn test_chrome_words_only() {
        let html = "<h2>Active Gift Codes</h2><p>COPY</p><p>SHARE</p><h2>Expired Gift Codes</h2>";
        let outcome = kingshot_pipeline().execute(html, Utc::now());
        assert!(outcome.codes.is_empty());
    }
}
