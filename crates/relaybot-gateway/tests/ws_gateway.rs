//! End-to-end gateway tests over a real WebSocket connection.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use relaybot_agent::{Agent, AgentRegistry, EchoEngine, ToolRegistry};
use relaybot_gateway::Gateway;

type WsClient = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Spin up a gateway with an echo agent on an ephemeral port and connect a
/// client to it.
async fn connect_client() -> WsClient {
    let registry = Arc::new(AgentRegistry::new());
    registry
        .register(Agent::new(
            "default",
            "echoes messages back",
            Box::new(EchoEngine::new()),
        ))
        .unwrap();
    registry
        .register(Agent::new(
            "parrot",
            "another echo agent",
            Box::new(EchoEngine::new()),
        ))
        .unwrap();

    let gateway = Arc::new(Gateway::new(registry, Arc::new(ToolRegistry::new()), None));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(gateway.serve(listener));

    let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .unwrap();
    client
}

/// Send a JSON value and read back the next JSON reply.
async fn round_trip(client: &mut WsClient, frame: Value) -> Value {
    client
        .send(WsMessage::Text(frame.to_string().into()))
        .await
        .unwrap();
    loop {
        match client.next().await.unwrap().unwrap() {
            WsMessage::Text(text) => return serde_json::from_str(&text).unwrap(),
            WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_chat_round_trip() {
    let mut client = connect_client().await;

    let reply = round_trip(&mut client, json!({"message": "hello"})).await;
    assert_eq!(reply["type"], "response");
    assert_eq!(reply["content"], "Echo: hello");
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let mut client = connect_client().await;

    let reply = round_trip(&mut client, json!({"message": ""})).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["content"], "Message cannot be empty");
}

#[tokio::test]
async fn test_unknown_agent_rejected() {
    let mut client = connect_client().await;

    let reply = round_trip(&mut client, json!({"agent": "ghost", "message": "hi"})).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["content"], "Agent 'ghost' not found");
}

#[tokio::test]
async fn test_named_agent_routing() {
    let mut client = connect_client().await;

    let reply = round_trip(&mut client, json!({"agent": "parrot", "message": "hi"})).await;
    assert_eq!(reply["type"], "response");
    assert_eq!(reply["content"], "Echo: hi");
}

#[tokio::test]
async fn test_list_agents() {
    let mut client = connect_client().await;

    let reply = round_trip(&mut client, json!({"command": "list_agents"})).await;
    assert_eq!(reply["type"], "agents");

    let names: Vec<&str> = reply["agents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["default", "parrot"]);
}

#[tokio::test]
async fn test_clear_memory() {
    let mut client = connect_client().await;

    let reply = round_trip(
        &mut client,
        json!({"command": "clear_memory", "agent": "default"}),
    )
    .await;
    assert_eq!(reply["type"], "response");
    assert_eq!(reply["content"], "Memory cleared for agent 'default'");
}

#[tokio::test]
async fn test_malformed_frame_gets_error_not_hangup() {
    let mut client = connect_client().await;

    client
        .send(WsMessage::Text("{not valid json".to_string().into()))
        .await
        .unwrap();
    let reply = match client.next().await.unwrap().unwrap() {
        WsMessage::Text(text) => serde_json::from_str::<Value>(&text).unwrap(),
        other => panic!("unexpected frame: {other:?}"),
    };
    assert_eq!(reply["type"], "error");

    // The connection survives and keeps serving.
    let reply = round_trip(&mut client, json!({"message": "still here?"})).await;
    assert_eq!(reply["content"], "Echo: still here?");
}

#[tokio::test]
async fn test_sequential_messages_one_reply_each() {
    let mut client = connect_client().await;

    for i in 0..3 {
        let reply = round_trip(&mut client, json!({"message": format!("msg {i}")})).await;
        assert_eq!(reply["content"], format!("Echo: msg {i}"));
    }
}

#[tokio::test]
async fn test_two_clients_are_independent() {
    let mut a = connect_client().await;
    let mut b = connect_client().await;

    let ra = round_trip(&mut a, json!({"message": "from a"})).await;
    let rb = round_trip(&mut b, json!({"message": "from b"})).await;

    assert_eq!(ra["content"], "Echo: from a");
    assert_eq!(rb["content"], "Echo: from b");
}
