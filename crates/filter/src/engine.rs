use {
    notifman_common::types::{ChatScope, ClientId, Poke, TextMessage},
    serde::{Deserialize, Serialize},
    tracing::debug,
};

#[cfg(feature = "metrics")]
use notifman_metrics::{counter, filter as filter_metrics, labels};

use crate::{NotificationKind, Sentinel, ToggleState};

/// What the client should do with one inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum FilterVerdict {
    /// Let the client show the event as usual.
    Deliver,
    /// Swallow the event silently.
    Suppress,
    /// Swallow the event and send `sentinel` privately to `target`.
    SuppressAndReply { target: ClientId, sentinel: Sentinel },
}

impl FilterVerdict {
    /// Whether the client must skip its default handling.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Deliver)
    }

    /// Body of the auto-reply, if one is due.
    #[must_use]
    pub fn reply_body(&self) -> Option<&'static str> {
        match self {
            Self::SuppressAndReply { sentinel, .. } => Some(sentinel.text()),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Deliver => "deliver",
            Self::Suppress => "suppress",
            Self::SuppressAndReply { .. } => "suppress_and_reply",
        }
    }
}

/// Judge a text message.
///
/// `local` is the id the client reports for the user on the connection the
/// message arrived on; a message from `local` is the client echoing the
/// user's own outgoing text.
#[must_use]
pub fn evaluate_text_message(
    msg: &TextMessage,
    toggles: &ToggleState,
    local: ClientId,
) -> FilterVerdict {
    let verdict = judge_text_message(msg, toggles, local);
    record("text_message", &verdict);
    verdict
}

fn judge_text_message(msg: &TextMessage, toggles: &ToggleState, local: ClientId) -> FilterVerdict {
    if msg.already_filtered {
        return FilterVerdict::Deliver;
    }

    let from_self = msg.is_from(local);

    // Echo of our own auto-reply: never show it, never answer it.
    if from_self
        && let Some(sentinel) = Sentinel::recognize(&msg.body)
        && !toggles.is_enabled(sentinel.guarded_kind())
    {
        debug!(scope = %msg.scope, ?sentinel, "swallowing echo of own auto-reply");
        #[cfg(feature = "metrics")]
        counter!(filter_metrics::LOOP_GUARD_HITS_TOTAL, labels::SCOPE => msg.scope.to_string())
            .increment(1);
        return FilterVerdict::Suppress;
    }

    if from_self {
        return FilterVerdict::Deliver;
    }

    match msg.scope {
        ChatScope::Private if !toggles.is_enabled(NotificationKind::PrivateChat) => {
            // A peer's auto-reply is muted like any private message but never
            // answered, or two peers with private chats off would bounce
            // sentinels forever. Earlier releases did reply here; that reply
            // is the loop, do not bring it back.
            if Sentinel::recognize(&msg.body).is_some() {
                FilterVerdict::Suppress
            } else {
                FilterVerdict::SuppressAndReply {
                    target: msg.sender,
                    sentinel: Sentinel::PrivateChatsDisabled,
                }
            }
        },
        // Channel and server chats are shared audiences; an auto-reply there
        // would go to everyone, so they are muted without one.
        ChatScope::Channel if !toggles.is_enabled(NotificationKind::ChannelChat) => {
            FilterVerdict::Suppress
        },
        ChatScope::Server if !toggles.is_enabled(NotificationKind::ServerChat) => {
            FilterVerdict::Suppress
        },
        _ => FilterVerdict::Deliver,
    }
}

/// Judge a poke. Pokes are never echoed to the poker, so there is no
/// self-echo case here; the reply itself travels as a private text message
/// and is caught by [`evaluate_text_message`] on the other side.
#[must_use]
pub fn evaluate_poke(poke: &Poke, toggles: &ToggleState) -> FilterVerdict {
    let verdict = if poke.already_filtered || toggles.poke {
        FilterVerdict::Deliver
    } else {
        FilterVerdict::SuppressAndReply {
            target: poke.sender,
            sentinel: Sentinel::PokesDisabled,
        }
    };
    record("poke", &verdict);
    verdict
}

fn record(kind: &'static str, verdict: &FilterVerdict) {
    if verdict.is_handled() {
        debug!(event_kind = kind, verdict = verdict.label(), "event filtered");
    }
    #[cfg(feature = "metrics")]
    counter!(
        filter_metrics::VERDICTS_TOTAL,
        labels::EVENT_KIND => kind,
        labels::VERDICT => verdict.label()
    )
    .increment(1);
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::sentinel,
        notifman_common::types::InboundEvent,
        rstest::rstest,
    };

    const ME: ClientId = ClientId(1);
    const PEER: ClientId = ClientId(7);

    fn message(scope: ChatScope, sender: ClientId, body: &str) -> TextMessage {
        TextMessage {
            scope,
            sender,
            sender_name: format!("client-{sender}"),
            sender_unique_id: format!("uid-{sender}"),
            body: body.into(),
            already_filtered: false,
        }
    }

    fn poke(sender: ClientId) -> Poke {
        Poke {
            sender,
            sender_name: "poker".into(),
            sender_unique_id: "uid-poker".into(),
            body: "wake up".into(),
            already_filtered: false,
        }
    }

    fn evaluate(event: &InboundEvent, toggles: &ToggleState, local: ClientId) -> FilterVerdict {
        match event {
            InboundEvent::TextMessage(msg) => evaluate_text_message(msg, toggles, local),
            InboundEvent::Poke(poke) => evaluate_poke(poke, toggles),
        }
    }

    fn all_off() -> ToggleState {
        ToggleState {
            private_chat: false,
            channel_chat: false,
            server_chat: false,
            poke: false,
        }
    }

    #[rstest]
    #[case(ChatScope::Private, ME)]
    #[case(ChatScope::Private, PEER)]
    #[case(ChatScope::Channel, PEER)]
    #[case(ChatScope::Server, PEER)]
    #[case(ChatScope::Other(9), PEER)]
    fn already_filtered_always_delivers(#[case] scope: ChatScope, #[case] sender: ClientId) {
        for body in ["hello", sentinel::PRIVATE_CHATS_DISABLED, sentinel::POKES_DISABLED] {
            let mut msg = message(scope, sender, body);
            msg.already_filtered = true;
            assert_eq!(
                evaluate_text_message(&msg, &all_off(), ME),
                FilterVerdict::Deliver
            );
        }

        let mut p = poke(sender);
        p.already_filtered = true;
        assert_eq!(evaluate_poke(&p, &all_off()), FilterVerdict::Deliver);
    }

    #[test]
    fn defaults_deliver_everything() {
        let toggles = ToggleState::default();
        for scope in [ChatScope::Private, ChatScope::Channel, ChatScope::Server] {
            assert_eq!(
                evaluate_text_message(&message(scope, PEER, "hi"), &toggles, ME),
                FilterVerdict::Deliver
            );
        }
        assert_eq!(evaluate_poke(&poke(PEER), &toggles), FilterVerdict::Deliver);
    }

    #[test]
    fn muted_private_chat_replies_with_chat_sentinel() {
        let toggles = ToggleState {
            private_chat: false,
            ..ToggleState::default()
        };
        let verdict = evaluate_text_message(&message(ChatScope::Private, PEER, "hi"), &toggles, ME);
        assert_eq!(
            verdict,
            FilterVerdict::SuppressAndReply {
                target: PEER,
                sentinel: Sentinel::PrivateChatsDisabled,
            }
        );
        assert_eq!(
            verdict.reply_body(),
            Some("This user [color=red]disabled[/color] private chats")
        );
        assert!(verdict.is_handled());
    }

    #[test]
    fn own_chat_sentinel_echo_is_swallowed() {
        let toggles = ToggleState {
            private_chat: false,
            ..ToggleState::default()
        };
        let echo = message(ChatScope::Private, ME, sentinel::PRIVATE_CHATS_DISABLED);
        assert_eq!(
            evaluate_text_message(&echo, &toggles, ME),
            FilterVerdict::Suppress
        );

        let own = message(ChatScope::Private, ME, "see you later");
        assert_eq!(
            evaluate_text_message(&own, &toggles, ME),
            FilterVerdict::Deliver
        );
    }

    #[test]
    fn own_poke_sentinel_echo_is_swallowed_only_while_pokes_are_muted() {
        let echo = message(ChatScope::Private, ME, sentinel::POKES_DISABLED);

        let muted = ToggleState {
            poke: false,
            ..ToggleState::default()
        };
        assert_eq!(evaluate_text_message(&echo, &muted, ME), FilterVerdict::Suppress);

        assert_eq!(
            evaluate_text_message(&echo, &ToggleState::default(), ME),
            FilterVerdict::Deliver
        );
    }

    #[test]
    fn loop_guard_ignores_scope() {
        let echo = message(ChatScope::Channel, ME, sentinel::POKES_DISABLED);
        let muted = ToggleState {
            poke: false,
            ..ToggleState::default()
        };
        assert_eq!(evaluate_text_message(&echo, &muted, ME), FilterVerdict::Suppress);
    }

    #[test]
    fn peer_sentinel_is_not_answered_with_another_reply_when_chats_are_open() {
        // The peer muted private chats and answered us; our private chats are
        // open, so the sentinel simply shows up.
        let reply = message(ChatScope::Private, PEER, sentinel::PRIVATE_CHATS_DISABLED);
        assert_eq!(
            evaluate_text_message(&reply, &ToggleState::default(), ME),
            FilterVerdict::Deliver
        );
    }

    #[rstest]
    #[case(sentinel::PRIVATE_CHATS_DISABLED)]
    #[case(sentinel::POKES_DISABLED)]
    fn peer_sentinel_is_muted_but_never_answered(#[case] body: &str) {
        let toggles = ToggleState {
            private_chat: false,
            ..ToggleState::default()
        };
        let reply = message(ChatScope::Private, PEER, body);
        let verdict = evaluate_text_message(&reply, &toggles, ME);
        assert_eq!(verdict, FilterVerdict::Suppress);
        assert_eq!(verdict.reply_body(), None);
    }

    #[rstest]
    #[case(ChatScope::Channel, ToggleState { channel_chat: false, ..ToggleState::default() })]
    #[case(ChatScope::Server, ToggleState { server_chat: false, ..ToggleState::default() })]
    fn muted_group_chat_is_suppressed_without_reply(
        #[case] scope: ChatScope,
        #[case] toggles: ToggleState,
    ) {
        let verdict = evaluate_text_message(&message(scope, PEER, "hi all"), &toggles, ME);
        assert_eq!(verdict, FilterVerdict::Suppress);
        assert_eq!(verdict.reply_body(), None);

        assert_eq!(
            evaluate_text_message(&message(scope, ME, "hi all"), &toggles, ME),
            FilterVerdict::Deliver
        );
    }

    #[test]
    fn unknown_scope_is_never_filtered() {
        let msg = message(ChatScope::Other(5), PEER, "hi");
        assert_eq!(
            evaluate_text_message(&msg, &all_off(), ME),
            FilterVerdict::Deliver
        );
    }

    #[test]
    fn muted_pokes_reply_with_poke_sentinel() {
        let toggles = ToggleState {
            poke: false,
            ..ToggleState::default()
        };
        for sender in [PEER, ClientId(2), ME] {
            let verdict = evaluate_poke(&poke(sender), &toggles);
            assert_eq!(
                verdict,
                FilterVerdict::SuppressAndReply {
                    target: sender,
                    sentinel: Sentinel::PokesDisabled,
                }
            );
            assert_eq!(
                verdict.reply_body(),
                Some("This user [color=red]disabled[/color] pokes")
            );
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let toggles = all_off();
        let events = [
            InboundEvent::TextMessage(message(ChatScope::Private, PEER, "a")),
            InboundEvent::TextMessage(message(ChatScope::Private, ME, sentinel::POKES_DISABLED)),
            InboundEvent::TextMessage(message(ChatScope::Channel, PEER, "b")),
            InboundEvent::Poke(poke(PEER)),
        ];
        for event in &events {
            let first = evaluate(event, &toggles, ME);
            let second = evaluate(event, &toggles, ME);
            assert_eq!(first, second, "{event:?}");
        }
        assert_eq!(toggles, all_off());
    }

    #[test]
    fn toggling_off_and_on_restores_default_behavior() {
        let mut store = crate::ToggleStore::new();
        let event = InboundEvent::TextMessage(message(ChatScope::Private, PEER, "ping"));
        let baseline = evaluate(&event, &store.snapshot(), ME);

        for kind in NotificationKind::ALL {
            store.toggle(*kind);
        }
        assert_ne!(evaluate(&event, &store.snapshot(), ME), baseline);

        for kind in NotificationKind::ALL {
            store.toggle(*kind);
        }
        assert_eq!(evaluate(&event, &store.snapshot(), ME), baseline);
        assert_eq!(
            evaluate(&InboundEvent::Poke(poke(PEER)), &store.snapshot(), ME),
            FilterVerdict::Deliver
        );
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn verdicts_and_flips_are_counted() {
        use {
            metrics_util::debugging::{DebugValue, DebuggingRecorder},
            std::collections::HashMap,
        };

        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            let mut store = crate::ToggleStore::new();
            store.toggle(NotificationKind::Poke);
            let toggles = store.snapshot();
            let _ = evaluate_poke(&poke(PEER), &toggles);
            let _ = evaluate_poke(&poke(PEER), &toggles);
            let _ = evaluate_text_message(&message(ChatScope::Private, PEER, "hi"), &toggles, ME);
            let echo = message(ChatScope::Private, ME, sentinel::POKES_DISABLED);
            let _ = evaluate_text_message(&echo, &toggles, ME);
        });

        let counters: HashMap<(String, Vec<(String, String)>), u64> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(key, _, _, value)| {
                let DebugValue::Counter(n) = value else {
                    return None;
                };
                let key = key.key();
                let mut labels: Vec<(String, String)> = key
                    .labels()
                    .map(|l| (l.key().to_string(), l.value().to_string()))
                    .collect();
                labels.sort();
                Some(((key.name().to_string(), labels), n))
            })
            .collect();
        let count = |name: &str, labels: &[(&str, &str)]| {
            let labels: Vec<(String, String)> = labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            counters.get(&(name.to_string(), labels)).copied()
        };

        assert_eq!(
            count(notifman_metrics::toggles::FLIPS_TOTAL, &[
                ("enabled", "false"),
                ("flag", "poke"),
            ]),
            Some(1)
        );
        assert_eq!(
            count(notifman_metrics::filter::VERDICTS_TOTAL, &[
                ("event_kind", "poke"),
                ("verdict", "suppress_and_reply"),
            ]),
            Some(2)
        );
        assert_eq!(
            count(notifman_metrics::filter::VERDICTS_TOTAL, &[
                ("event_kind", "text_message"),
                ("verdict", "deliver"),
            ]),
            Some(1)
        );
        assert_eq!(
            count(notifman_metrics::filter::VERDICTS_TOTAL, &[
                ("event_kind", "text_message"),
                ("verdict", "suppress"),
            ]),
            Some(1)
        );
        assert_eq!(
            count(notifman_metrics::filter::LOOP_GUARD_HITS_TOTAL, &[("scope", "private")]),
            Some(1)
        );
    }

    #[test]
    fn verdict_serializes_with_tag() {
        let json = serde_json::to_value(FilterVerdict::SuppressAndReply {
            target: PEER,
            sentinel: Sentinel::PokesDisabled,
        })
        .unwrap();
        assert_eq!(json["verdict"], "suppress_and_reply");
        assert_eq!(json["target"], 7);
        assert_eq!(json["sentinel"], "pokes_disabled");
    }
}
