#![allow(clippy::unwrap_used)]
// End-to-end interaction tests against in-memory fakes.

mod common;

use pretty_assertions::assert_eq;
use strum::IntoEnumIterator;

use common::{CHAT, FakeApi, OPERATOR, RecordingTransport, STRANGER, Sent, relay_config};
use shieldbot_core::model::ZoneTraffic;
use shieldbot_core::render::{self, Keyboard};
use shieldbot_core::command::{
    LABEL_ANTI_DDOS, LABEL_DISABLE_PROTECTION, LABEL_ENABLE_PROTECTION, LABEL_SHOW_ANALYTICS,
    LABEL_SHOW_LEVEL, TOKEN_BFM_OFF, TOKEN_BFM_ON, TOKEN_BIC_OFF, TOKEN_BIC_ON,
    TOKEN_REFRESH_ANALYTICS, TOKEN_SELECT_LEVEL,
};
use shieldbot_core::{
    ChatId, Interaction, MessageRef, Origin, Relay, SecurityLevel, SettingName, Toggle,
};

type TestRelay = Relay<FakeApi, RecordingTransport>;

fn relay() -> TestRelay {
    Relay::new(&relay_config(), FakeApi::default(), RecordingTransport::default())
}

fn relay_with_transport(transport: RecordingTransport) -> TestRelay {
    Relay::new(&relay_config(), FakeApi::default(), transport)
}

fn message(identity: shieldbot_core::Identity, token: &str) -> Interaction {
    Interaction {
        identity,
        token: token.into(),
        origin: Origin::Message { chat: CHAT },
    }
}

fn callback(identity: shieldbot_core::Identity, token: &str, keyboard: Option<Keyboard>) -> Interaction {
    Interaction {
        identity,
        token: token.into(),
        origin: Origin::Callback {
            callback_id: "cb-1".into(),
            message: Some(MessageRef {
                chat: ChatId(124_555),
                message_id: 42,
                keyboard,
            }),
        },
    }
}

fn edit_texts(sent: &[Sent]) -> Vec<String> {
    sent.iter()
        .filter_map(|s| match s {
            Sent::Edit { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

// ── Authorization ───────────────────────────────────────────────────

#[tokio::test]
async fn stranger_message_gets_denial_and_no_remote_calls() {
    let relay = relay();
    relay.handle_interaction(message(STRANGER, "🛡️ Enable protection")).await;

    assert_eq!(relay.gateway().api().calls(), 0);
    assert_eq!(
        relay.transport().sent(),
        vec![Sent::Message {
            chat: CHAT,
            text: render::UNAUTHORIZED_MESSAGE.into(),
            keyboard: None,
        }]
    );
}

#[tokio::test]
async fn stranger_callback_gets_prominent_denial() {
    let relay = relay();
    relay.handle_interaction(callback(STRANGER, "bfm_on", None)).await;

    assert_eq!(relay.gateway().api().calls(), 0);
    assert_eq!(
        relay.transport().sent(),
        vec![Sent::Ack {
            callback_id: "cb-1".into(),
            alert: Some(render::UNAUTHORIZED_ALERT.into()),
            prominent: true,
        }]
    );
}

/// Every token that maps to a command, plus one that does not.
fn every_token() -> Vec<String> {
    let mut tokens: Vec<String> = [
        "/start",
        LABEL_ENABLE_PROTECTION,
        LABEL_DISABLE_PROTECTION,
        LABEL_SHOW_LEVEL,
        LABEL_SHOW_ANALYTICS,
        LABEL_ANTI_DDOS,
        TOKEN_SELECT_LEVEL,
        TOKEN_REFRESH_ANALYTICS,
        TOKEN_BFM_ON,
        TOKEN_BFM_OFF,
        TOKEN_BIC_ON,
        TOKEN_BIC_OFF,
        "not a command",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    tokens.extend(SecurityLevel::iter().map(|level| level.as_str().to_string()));
    tokens
}

#[tokio::test]
async fn stranger_is_denied_for_every_token_without_remote_calls() {
    for token in every_token() {
        let relay = relay();
        relay.handle_interaction(message(STRANGER, &token)).await;
        relay.handle_interaction(callback(STRANGER, &token, None)).await;

        assert_eq!(relay.gateway().api().calls(), 0, "token {token:?}");
        assert_eq!(
            relay.transport().sent(),
            vec![
                Sent::Message {
                    chat: CHAT,
                    text: render::UNAUTHORIZED_MESSAGE.into(),
                    keyboard: None,
                },
                Sent::Ack {
                    callback_id: "cb-1".into(),
                    alert: Some(render::UNAUTHORIZED_ALERT.into()),
                    prominent: true,
                },
            ],
            "token {token:?}"
        );
    }
}

#[tokio::test]
async fn unknown_text_is_silently_dropped() {
    let relay = relay();
    relay.handle_interaction(message(OPERATOR, "hello there")).await;

    assert_eq!(relay.gateway().api().calls(), 0);
    assert!(relay.transport().sent().is_empty());
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn start_shows_main_menu() {
    let relay = relay();
    relay.handle_interaction(message(OPERATOR, "/start")).await;

    assert_eq!(
        relay.transport().sent(),
        vec![Sent::Message {
            chat: CHAT,
            text: render::GREETING.into(),
            keyboard: Some(render::main_menu()),
        }]
    );
}

#[tokio::test]
async fn written_level_reads_back() {
    let relay = relay();
    relay.handle_interaction(message(OPERATOR, "🛡️ Enable protection")).await;
    relay.handle_interaction(message(OPERATOR, "👁️ Show current level")).await;

    let sent = relay.transport().sent();
    assert_eq!(sent.len(), 2);
    let Sent::Message { text, .. } = &sent[1] else {
        panic!("expected a new message, got {:?}", sent[1]);
    };
    assert_eq!(text, &render::level_current(SecurityLevel::UnderAttack));
}

#[tokio::test]
async fn level_callback_edits_picker_and_alerts() {
    let relay = relay();
    relay
        .handle_interaction(callback(OPERATOR, "high", Some(render::level_picker())))
        .await;

    assert_eq!(
        relay.transport().sent(),
        vec![
            Sent::Edit {
                message_id: 42,
                text: render::level_set(SecurityLevel::High),
                keyboard: Some(render::level_picker()),
            },
            Sent::Ack {
                callback_id: "cb-1".into(),
                alert: Some("Security level set: high".into()),
                prominent: true,
            },
        ]
    );
}

#[tokio::test]
async fn forbidden_write_is_reported_not_raised() {
    let relay = relay();
    relay.gateway().api().state.lock().unwrap().fail_status = Some(403);
    relay.handle_interaction(message(OPERATOR, "⚪ Disable protection")).await;

    let sent = relay.transport().sent();
    let Sent::Message { text, .. } = &sent[0] else {
        panic!("expected a new message");
    };
    assert!(text.starts_with("❌"), "{text}");
    assert!(text.contains("HTTP 403"), "{text}");
}

#[tokio::test]
async fn analytics_sums_buckets() {
    let relay = relay();
    relay.handle_interaction(message(OPERATOR, "📊 Show analytics")).await;

    let sent = relay.transport().sent();
    let Sent::Message { text, keyboard, .. } = &sent[0] else {
        panic!("expected a new message");
    };
    assert!(text.contains("Total requests: <b>150</b>"), "{text}");
    assert!(text.contains("Threats: <b>15</b>"), "{text}");
    assert!(text.contains("Served by Cloudflare: <b>80</b>"), "{text}");
    assert!(text.contains("Served by origin: <b>70</b>"), "{text}");
    assert_eq!(keyboard, &Some(render::analytics_menu()));
}

#[tokio::test]
async fn analytics_without_zone_says_so() {
    let relay = relay();
    relay.gateway().api().state.lock().unwrap().zones = Vec::new();
    relay.handle_interaction(message(OPERATOR, "📊 Show analytics")).await;

    let Sent::Message { text, .. } = &relay.transport().sent()[0] else {
        panic!("expected a new message");
    };
    assert!(text.contains("zone not found"), "{text}");
}

#[tokio::test]
async fn analytics_with_empty_window_says_so() {
    let relay = relay();
    relay.gateway().api().state.lock().unwrap().zones = vec![ZoneTraffic::default()];
    relay.handle_interaction(message(OPERATOR, "📊 Show analytics")).await;

    let Sent::Message { text, .. } = &relay.transport().sent()[0] else {
        panic!("expected a new message");
    };
    assert!(text.contains("no data for the last 24 hours"), "{text}");
}

#[tokio::test]
async fn anti_ddos_lists_bfm_before_bic() {
    let relay = relay();
    relay.handle_interaction(message(OPERATOR, "🔒 Anti-DDoS")).await;

    let Sent::Message { text, keyboard, .. } = &relay.transport().sent()[0] else {
        panic!("expected a new message");
    };
    let bfm = text.find("Bot Fight Mode: <b>off</b>").unwrap();
    let bic = text.find("Browser Integrity Check: <b>on</b>").unwrap();
    assert!(bfm < bic);
    assert_eq!(keyboard, &Some(render::anti_ddos_menu()));
    assert_eq!(relay.gateway().api().calls(), 2);
}

#[tokio::test]
async fn anti_ddos_with_one_failed_read_still_renders() {
    let relay = relay();
    relay.gateway().api().state.lock().unwrap().fail_read = Some(SettingName::BrowserCheck);
    relay.handle_interaction(message(OPERATOR, "🔒 Anti-DDoS")).await;

    let Sent::Message { text, .. } = &relay.transport().sent()[0] else {
        panic!("expected a new message");
    };
    assert!(text.contains("Bot Fight Mode: <b>off</b>"), "{text}");
    assert!(text.contains("Browser Integrity Check: unavailable (HTTP 403)"), "{text}");
}

#[tokio::test]
async fn toggle_writes_then_shows_composite() {
    let relay = relay();
    relay
        .handle_interaction(callback(OPERATOR, "bfm_on", Some(render::anti_ddos_menu())))
        .await;

    assert_eq!(relay.gateway().api().state.lock().unwrap().bfm, Toggle::On);
    // one write, two reads
    assert_eq!(relay.gateway().api().calls(), 3);

    let sent = relay.transport().sent();
    assert_eq!(sent.len(), 2);
    let Sent::Edit { text, keyboard, .. } = &sent[0] else {
        panic!("expected an edit");
    };
    assert!(text.starts_with("🔒 Anti-DDoS status:"), "{text}");
    assert!(text.contains("Bot Fight Mode: <b>on</b>"), "{text}");
    assert_eq!(keyboard, &Some(render::anti_ddos_menu()));
    assert_eq!(
        sent[1],
        Sent::Ack {
            callback_id: "cb-1".into(),
            alert: Some("Bot Fight Mode set: on".into()),
            prominent: true,
        }
    );
}

// ── No-op reconciliation ────────────────────────────────────────────

#[tokio::test]
async fn noop_refresh_renders_analytics_unchanged() {
    let transport = RecordingTransport::default();
    transport.reject_next_edits(1);
    let relay = relay_with_transport(transport);

    relay
        .handle_interaction(callback(OPERATOR, "refresh_analytics", Some(render::analytics_menu())))
        .await;

    assert_eq!(
        edit_texts(&relay.transport().sent()),
        vec![render::ANALYTICS_UNCHANGED.to_string()]
    );
}

#[tokio::test]
async fn noop_toggle_rereads_with_unchanged_heading() {
    let transport = RecordingTransport::default();
    transport.reject_next_edits(1);
    let relay = relay_with_transport(transport);

    relay
        .handle_interaction(callback(OPERATOR, "bic_on", Some(render::anti_ddos_menu())))
        .await;

    // write + two reads + two re-reads
    assert_eq!(relay.gateway().api().calls(), 5);
    let texts = edit_texts(&relay.transport().sent());
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("🔒 Anti-DDoS status unchanged:"), "{}", texts[0]);
}

#[tokio::test]
async fn noop_toggle_with_failed_read_still_changes_heading() {
    let transport = RecordingTransport::default();
    transport.reject_next_edits(1);
    let relay = relay_with_transport(transport);
    relay.gateway().api().state.lock().unwrap().fail_read = Some(SettingName::BrowserCheck);

    relay
        .handle_interaction(callback(OPERATOR, "bic_on", Some(render::anti_ddos_menu())))
        .await;

    let texts = edit_texts(&relay.transport().sent());
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("🔒 Anti-DDoS status unchanged:"), "{}", texts[0]);
    assert!(
        texts[0].contains("Browser Integrity Check: unavailable (HTTP 403)"),
        "{}",
        texts[0]
    );
}

#[tokio::test]
async fn noop_generic_keeps_current_keyboard() {
    let transport = RecordingTransport::default();
    transport.reject_next_edits(1);
    let relay = relay_with_transport(transport);

    relay
        .handle_interaction(callback(
            OPERATOR,
            "select_security_level",
            Some(render::level_picker()),
        ))
        .await;

    let sent = relay.transport().sent();
    assert_eq!(
        sent[0],
        Sent::Edit {
            message_id: 42,
            text: render::NOTHING_CHANGED.into(),
            keyboard: Some(render::level_picker()),
        }
    );
}

#[tokio::test]
async fn second_noop_is_not_an_error() {
    let transport = RecordingTransport::default();
    transport.reject_next_edits(2);
    let relay = relay_with_transport(transport);

    relay
        .handle_interaction(callback(
            OPERATOR,
            "refresh_analytics",
            Some(render::analytics_menu()),
        ))
        .await;

    assert_eq!(
        relay.transport().sent(),
        vec![Sent::Ack {
            callback_id: "cb-1".into(),
            alert: None,
            prominent: false,
        }]
    );
}

#[tokio::test]
async fn failed_edit_surfaces_generic_alert() {
    let transport = RecordingTransport {
        fail_edits: true,
        ..RecordingTransport::default()
    };
    let relay = relay_with_transport(transport);

    relay
        .handle_interaction(callback(
            OPERATOR,
            "refresh_analytics",
            Some(render::analytics_menu()),
        ))
        .await;

    assert_eq!(
        relay.transport().sent(),
        vec![Sent::Ack {
            callback_id: "cb-1".into(),
            alert: Some(render::FAULT_ALERT.into()),
            prominent: true,
        }]
    );
}

#[tokio::test]
async fn failed_send_falls_back_to_notice() {
    let transport = RecordingTransport::default();
    transport.fail_next_sends(1);
    let relay = relay_with_transport(transport);

    relay.handle_interaction(message(OPERATOR, "👁️ Show current level")).await;

    assert_eq!(
        relay.transport().sent(),
        vec![Sent::Message {
            chat: CHAT,
            text: render::DELIVERY_FAILED.into(),
            keyboard: None,
        }]
    );
}

#[tokio::test]
async fn callback_without_message_is_still_acknowledged() {
    let relay = relay();
    relay
        .handle_interaction(Interaction {
            identity: OPERATOR,
            token: "select_security_level".into(),
            origin: Origin::Callback {
                callback_id: "cb-9".into(),
                message: None,
            },
        })
        .await;

    assert_eq!(
        relay.transport().sent(),
        vec![Sent::Ack {
            callback_id: "cb-9".into(),
            alert: Some(render::FAULT_ALERT.into()),
            prominent: true,
        }]
    );
}
