//! Integration tests for chatlog-viewer.
//!
//! These tests load the JSON fixtures under `tests/fixtures` through the
//! public session API and check the merged timeline, search, navigation and
//! import reporting end to end.

use chatlog_viewer::prelude::*;
use chatlog_viewer::search::{FixedClock, SearchEngine};
use chatlog_viewer::session::SessionOptions;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

/// Get the path to a fixture file.
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Read a fixture as a `(name, text)` pair.
fn fixture(name: &str) -> (String, String) {
    let text = std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {name}: {e}"));
    (name.to_string(), text)
}

fn contents(messages: &[Message]) -> Vec<&str> {
    messages.iter().map(|m| m.content.as_str()).collect()
}

/// Family and work threads loaded together, with the clock pinned.
fn loaded_session() -> ChatSession {
    let engine = SearchEngine::with_clock(FixedClock(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()));
    let mut session = ChatSession::new().with_engine(engine);
    let report = session.import_files([fixture("family_chat.json"), fixture("work_chat.json")]);
    assert!(report.is_complete());
    session
}

mod importing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merged_timeline_order() {
        let session = loaded_session();

        assert_eq!(
            contents(session.all_messages()),
            vec![
                "thanks mom",
                "Happy birthday Sam!",
                "Welcome back",
                "I'll bring dessert",
                "Dinner at 7?",
                "can't stay late, family dinner",
                "standup moved to 10",
            ]
        );
        assert_eq!(session.filtered_messages().len(), 7);
    }

    #[test]
    fn test_participants_accumulate_in_order() {
        let session = loaded_session();
        let names: Vec<&str> = session.participants().iter().map(String::as_str).collect();
        assert_eq!(names, vec!["Mom", "Dad", "Sam", "Lee"]);
    }

    #[test]
    fn test_thread_summaries() {
        let session = loaded_session();
        let threads = session.threads();

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].title.as_deref(), Some("Family"));
        assert_eq!(threads[0].message_count, 4);
        assert_eq!(threads[0].dropped_count, 2);
        assert_eq!(&*threads[1].source_file, "work_chat.json");
    }

    #[test]
    fn test_provenance_and_unknown_fields() {
        let session = loaded_session();
        let birthday = &session.all_messages()[1];

        assert_eq!(birthday.thread_title.as_deref(), Some("Family"));
        assert_eq!(&*birthday.thread_source_file, "family_chat.json");
        assert!(birthday.extra.contains_key("reactions"));

        let json = serde_json::to_value(birthday).unwrap();
        assert_eq!(json["reactions"][0]["actor"], "Sam");
    }

    #[test]
    fn test_broken_file_is_reported_by_name() {
        let mut session = ChatSession::new();
        let report = session.import_files([
            fixture("family_chat.json"),
            fixture("broken.json"),
            fixture("work_chat.json"),
        ]);

        assert_eq!(report.imported_count(), 2);
        let (file, error) = report.failures().next().unwrap();
        assert_eq!(file, "broken.json");
        assert!(error.to_string().contains("broken.json"));
        assert_eq!(session.all_messages().len(), 7);
    }

    #[test]
    fn test_abort_policy_matches_all_or_nothing() {
        let mut session = ChatSession::with_options(SessionOptions {
            policy: ImportPolicy::Abort,
            ..SessionOptions::default()
        });
        let report = session.import_files([
            fixture("broken.json"),
            fixture("family_chat.json"),
        ]);

        assert!(report.is_aborted());
        assert!(matches!(report.outcomes()[1], FileOutcome::Skipped { .. }));
        let err = report.into_result().unwrap_err();
        assert!(matches!(err, ViewerError::Parse { ref file, .. } if file == "broken.json"));
        assert_eq!(err.exit_code(), 2);
        assert!(session.all_messages().is_empty());
    }

    #[tokio::test]
    async fn test_import_from_disk() {
        let mut session = ChatSession::new();
        let report = session
            .import_paths(&[fixture_path("work_chat.json"), fixture_path("family_chat.json")])
            .await;

        assert!(report.is_complete());
        assert_eq!(session.all_messages().len(), 7);
        // Thread order follows the batch, message order follows timestamps.
        assert_eq!(session.threads()[0].title.as_deref(), Some("Standup"));
        assert_eq!(session.all_messages()[0].content, "thanks mom");
    }
}

mod scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_out_of_order_messages_are_sorted() {
        let mut session = ChatSession::new();
        session.import_files([(
            "t.json",
            r#"{"messages":[{"sender_name":"A","content":"hi","timestamp_ms":200},
                           {"sender_name":"B","content":"yo","timestamp_ms":100}]}"#,
        )]);

        assert_eq!(contents(session.all_messages()), vec!["yo", "hi"]);
    }

    #[test]
    fn test_blank_message_dropped() {
        let mut session = ChatSession::new();
        session.import_files([(
            "t.json",
            r#"{"messages":[{"sender_name":"A","content":"  "},
                           {"sender_name":"A","content":"ok","timestamp_ms":5}]}"#,
        )]);

        assert_eq!(contents(session.all_messages()), vec!["ok"]);
        assert_eq!(session.all_messages()[0].timestamp_ms, Some(5));
    }

    #[test]
    fn test_today_matches_only_current_message() {
        let now = chrono::Utc::now().timestamp_millis();
        let ten_days_ago = now - 10 * 24 * 60 * 60 * 1000;
        let json = format!(
            r#"{{"messages":[{{"sender_name":"A","content":"old","timestamp_ms":{ten_days_ago}}},
                            {{"sender_name":"A","content":"new","timestamp_ms":{now}}}]}}"#
        );
        let mut session = ChatSession::new();
        session.import_files([("t.json", json)]);

        let outcome = session.search("today", SearchMode::Both);
        assert_eq!(outcome.matches, &[1]);
        assert_eq!(outcome.filtered.len(), 1);
        assert_eq!(outcome.filtered[0].content, "new");
    }

    #[test]
    fn test_relative_dates_at_chrono_limits() {
        let max = chrono::DateTime::<chrono::Utc>::MAX_UTC.timestamp_millis();
        let min = chrono::DateTime::<chrono::Utc>::MIN_UTC.timestamp_millis();
        let json = format!(
            r#"{{"messages":[{{"content":"first","timestamp_ms":{min}}},
                            {{"content":"last","timestamp_ms":{max}}}]}}"#
        );
        let mut session = ChatSession::new();
        session.import_files([("edge.json", json)]);
        assert_eq!(session.all_messages().len(), 2);

        for query in ["today", "yesterday"] {
            let outcome = session.search(query, SearchMode::Both);
            assert!(outcome.matches.is_empty(), "{query}");
        }
        let view = build_view(&session, &ViewOptions::default());
        assert_eq!(view.messages.len(), 2);
    }

    #[test]
    fn test_exact_iso_date() {
        let mut session = loaded_session();
        let outcome = session.search("2024-01-15", SearchMode::Both);

        assert_eq!(outcome.matches, &[1, 2, 3]);
    }

    #[test]
    fn test_zero_matches_leaves_cursor_unset() {
        let mut session = loaded_session();
        let outcome = session.search("volcano", SearchMode::Both);
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.cursor, None);

        assert_eq!(session.navigate(Direction::Next), None);
        assert_eq!(session.navigate(Direction::Previous), None);
        assert_eq!(session.search_state().status(), "No matches");
    }
}

mod searching {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_search_covers_sender_and_content() {
        let mut session = loaded_session();
        let outcome = session.search("sam", SearchMode::Text);

        assert_eq!(outcome.matches, &[0, 1, 5]);
        assert_eq!(outcome.filtered.len(), 3);
    }

    #[test]
    fn test_date_mode_filters_but_navigation_uses_both() {
        let mut session = loaded_session();
        let outcome = session.search("sam", SearchMode::Date);

        assert!(outcome.filtered.is_empty());
        assert_eq!(outcome.matches, &[0, 1, 5]);
    }

    #[test]
    fn test_yesterday_with_pinned_clock() {
        let mut session = loaded_session();
        // Clock is pinned to 2024-01-16; fixture times are noon UTC.
        let outcome = session.search("yesterday", SearchMode::Date);
        assert_eq!(outcome.matches, &[1, 2, 3]);
    }

    #[test]
    fn test_year_fragment_matches_every_dated_message() {
        let mut session = loaded_session();
        // "02" is part of "2024", so every dated message matches.
        let outcome = session.search("02", SearchMode::Both);
        assert_eq!(outcome.matches, &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_circular_navigation() {
        let mut session = loaded_session();
        let outcome = session.search("Dinner", SearchMode::Both);
        assert_eq!(outcome.matches, &[4, 5]);

        assert_eq!(session.navigate(Direction::Next), Some(1));
        assert_eq!(session.navigate(Direction::Next), Some(0));
        assert_eq!(session.navigate(Direction::Previous), Some(1));
        assert_eq!(session.search_state().current_position(), Some(5));
    }

    #[test]
    fn test_search_then_clear_round_trip() {
        let mut session = loaded_session();
        session.search("dessert", SearchMode::Both);

        let cleared: Vec<Message> = session.clear_search().into_iter().cloned().collect();
        assert_eq!(cleared, session.all_messages().to_vec());
        assert!(!session.search_state().is_active());
    }

    #[test]
    fn test_reset_clears_session() {
        let mut session = loaded_session();
        session.search("dinner", SearchMode::Both);
        session.reset();

        assert!(session.all_messages().is_empty());
        assert!(session.participants().is_empty());
        assert!(session.filtered_messages().is_empty());
        assert_eq!(session.search_state().cursor(), None);
    }
}

mod presentation {
    use super::*;
    use pretty_assertions::assert_eq;
    use chatlog_viewer::render::{Renderer, TextRenderer};

    #[test]
    fn test_view_of_merged_threads() {
        let mut session = loaded_session();
        session.search("dinner", SearchMode::Both);
        let view = build_view(&session, &ViewOptions::default().with_current_user("Sam"));

        assert_eq!(view.title, "2 Conversations");
        assert_eq!(view.status.as_deref(), Some("1 of 2"));
        assert_eq!(view.messages.len(), 2);
        assert!(view.messages[0].is_current);
        assert!(view.messages[0].show_sender);
        assert!(view.messages[1].is_sent);
        assert!(!view.messages[1].show_sender);
    }

    #[test]
    fn test_plain_text_snapshot() {
        let mut session = ChatSession::new();
        session.import_files([fixture("untitled.json")]);
        session.search("lamp", SearchMode::Both);
        let view = build_view(&session, &ViewOptions::default().with_current_user("Bo"));
        let out = TextRenderer::new().render_to_string(&view).unwrap();

        insta::assert_snapshot!(out.trim_end(), @r"
== Chat ==
search: lamp (1 of 2)
Ana
  [[lamp]] on?
  the [LAMP] is on
");
    }

    #[test]
    fn test_plain_text_without_search() {
        let mut session = ChatSession::new();
        session.import_files([fixture("untitled.json")]);
        let view = build_view(&session, &ViewOptions::default().with_current_user("Bo"));
        let out = TextRenderer::new().render_to_string(&view).unwrap();

        assert_eq!(
            out,
            "== Chat ==\nAna\n  lamp on?\n  the LAMP is on\n> ok\nUnknown\n  who said this\n"
        );
    }
}
