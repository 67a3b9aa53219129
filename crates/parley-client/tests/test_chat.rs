use parley_client::{ClientError, Message, Role};

mod support;
use support::{chat_lines, MockTransport, Reply};

#[tokio::test]
async fn chat_appends_user_and_assistant_turns() {
    let mock = MockTransport::new().reply(Reply::Lines(chat_lines(&["The sky ", "scatters blue light."])));
    let client = mock.client();
    let history = vec![Message::system("You are a physics tutor.")];

    let response = client
        .chat("mistral", &history, "Why is the sky blue?", None)
        .await
        .unwrap();

    assert_eq!(response.text(), "The sky scatters blue light.");
    assert_eq!(
        response.history,
        vec![
            Message::system("You are a physics tutor."),
            Message::user("Why is the sky blue?"),
            Message::assistant("The sky scatters blue light."),
        ]
    );
    // The caller's history is untouched.
    assert_eq!(history.len(), 1);

    let body = mock.requests()[0].body.clone().unwrap();
    assert_eq!(mock.requests()[0].path, "/api/chat");
    assert_eq!(body["stream"], false);
    let sent = body["messages"].as_array().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1]["role"], "user");
    assert_eq!(sent[1]["content"], "Why is the sky blue?");
}

#[tokio::test]
async fn history_after_n_turns_has_two_n_messages_in_order() {
    let turns = 4;
    let mut mock = MockTransport::new();
    for i in 0..turns {
        let reply = format!("answer {i}");
        mock = mock.reply(Reply::Lines(chat_lines(&[reply.as_str()])));
    }
    let client = mock.client();

    let mut history = Vec::new();
    for i in 0..turns {
        let response = client
            .chat("mistral", &history, &format!("question {i}"), None)
            .await
            .unwrap();
        history = response.history;
    }

    assert_eq!(history.len(), 2 * turns);
    for (i, pair) in history.chunks(2).enumerate() {
        assert_eq!(pair[0], Message::user(format!("question {i}")));
        assert_eq!(pair[1], Message::assistant(format!("answer {i}")));
    }

    // Each request carried the whole history so far plus the new turn.
    let requests = mock.requests();
    for (i, request) in requests.iter().enumerate() {
        let sent = request.body.as_ref().unwrap()["messages"].as_array().unwrap().len();
        assert_eq!(sent, 2 * i + 1);
    }
}

#[tokio::test]
async fn streaming_chat_appends_reply_once_on_final_chunk() {
    let mock = MockTransport::new().reply(Reply::Lines(chat_lines(&["Hel", "lo", "!"])));
    let client = mock.client();

    let mut stream = client.chat_stream("mistral", &[], "hi", None).await.unwrap();
    assert_eq!(stream.history(), &[Message::user("hi")]);

    let mut printed = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        printed.push_str(&chunk.text);
        if !chunk.done {
            assert_eq!(stream.history().len(), 1);
        }
    }
    assert!(stream.is_finished());
    // Further polling must not append again.
    assert!(stream.next().await.is_none());

    let history = stream.into_history();
    assert_eq!(printed, "Hello!");
    assert_eq!(history, vec![Message::user("hi"), Message::assistant("Hello!")]);
    assert_eq!(mock.close_count(), 1);
    assert_eq!(mock.requests()[0].body.as_ref().unwrap()["stream"], true);
}

#[tokio::test]
async fn abandoned_chat_stream_keeps_only_the_user_turn() {
    let mock = MockTransport::new().reply(Reply::Lines(chat_lines(&["a", "b", "c"])));
    let client = mock.client();

    let mut stream = client.chat_stream("mistral", &[], "hi", None).await.unwrap();
    stream.next().await.unwrap().unwrap();
    let history = stream.into_history();

    assert_eq!(history, vec![Message::user("hi")]);
    assert_eq!(mock.close_count(), 1);
}

#[tokio::test]
async fn streaming_chat_collects_into_response() {
    let mock = MockTransport::new().reply(Reply::Lines(chat_lines(&["one ", "two"])));
    let client = mock.client();

    let stream = client
        .chat_stream("mistral", &[Message::user("count"), Message::assistant("ok")], "go", None)
        .await
        .unwrap();
    let response = stream.collect().await.unwrap();

    assert_eq!(response.reply.text, "one two");
    assert_eq!(response.history.len(), 4);
    assert_eq!(response.history[3].role, Role::Assistant);
}

#[tokio::test]
async fn role_alternation_is_not_enforced() {
    let mock = MockTransport::new().reply(Reply::Lines(chat_lines(&["fine"])));
    let history = vec![Message::user("first"), Message::user("second")];

    let response = mock
        .client()
        .chat("mistral", &history, "third", None)
        .await
        .unwrap();

    assert_eq!(response.history.len(), 4);
}

#[tokio::test]
async fn failed_chat_leaves_history_to_the_caller() {
    let mock = MockTransport::new().reply(Reply::Lines(vec![
        r#"{"error":"model \"mistral\" not found, try pulling it first"}"#.into(),
    ]));
    let history = vec![Message::user("earlier"), Message::assistant("reply")];

    let err = mock
        .client()
        .chat("mistral", &history, "again", None)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ModelNotFound { ref model, .. } if model == "mistral"));
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn empty_chat_message_is_rejected_locally() {
    let mock = MockTransport::new();

    let err = mock.client().chat("mistral", &[], " ", None).await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert_eq!(mock.request_count(), 0);
}
