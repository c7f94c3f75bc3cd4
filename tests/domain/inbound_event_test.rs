use voicescribe::domain::{
    AudioFileRef, AudioKind, ChatId, InboundEvent, InboundEventKind, SenderIdentity, VoiceMessage,
};

#[test]
fn given_voice_message_when_wrapping_then_event_keeps_update_id() {
    let message = VoiceMessage {
        chat_id: ChatId::new(1),
        sender: SenderIdentity::new("alice"),
        file: AudioFileRef::new("abc", AudioKind::Audio),
    };

    let event = InboundEvent::voice(99, message.clone());

    assert_eq!(event.update_id, 99);
    assert_eq!(event.kind, InboundEventKind::Voice(message));
}

#[test]
fn given_sender_without_handle_when_displayed_then_marked_anonymous() {
    let sender = SenderIdentity::anonymous();

    assert!(sender.is_empty());
    assert_eq!(sender.to_string(), "<anonymous>");
}
