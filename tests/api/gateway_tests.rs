//! WebSocket Gateway Tests
//!
//! End-to-end tests over a real socket: authenticate over HTTP, upgrade at
//! `/gateway`, then drive the room protocol frame by frame.

use serde_json::json;

use crate::common::*;

// ==========================================================================
// Connection Gate Tests
// ==========================================================================

/// Test the upgrade is rejected when no token is presented
#[tokio::test]
async fn test_gateway_rejects_missing_token() {
    // Arrange
    let app = TestApp::new().spawn().await;

    // Act
    let err = connect_gateway(app.addr, "").await.unwrap_err();

    // Assert
    assert_eq!(ws_rejection_status(err), 400);
}

/// Test the upgrade is rejected when the token is empty
#[tokio::test]
async fn test_gateway_rejects_empty_token() {
    // Arrange
    let app = TestApp::new().spawn().await;

    // Act
    let err = connect_gateway(app.addr, "?token=").await.unwrap_err();

    // Assert
    assert_eq!(ws_rejection_status(err), 400);
}

/// Test the upgrade is rejected for a token that was never issued
#[tokio::test]
async fn test_gateway_rejects_unknown_token() {
    // Arrange
    let app = TestApp::new().spawn().await;

    // Act
    let err = connect_ws(app.addr, "00112233445566778899aabbccddeeff")
        .await
        .unwrap_err();

    // Assert
    assert_eq!(ws_rejection_status(err), 401);
}

/// Test a revoked token no longer opens a connection
#[tokio::test]
async fn test_gateway_rejects_revoked_token() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let token = app.issue_token("u1").await;
    app.sessions.revoke(&token).await.unwrap();

    // Act
    let err = connect_ws(app.addr, &token).await.unwrap_err();

    // Assert
    assert_eq!(ws_rejection_status(err), 401);
}

/// Test a valid token opens the connection and the gate confirms identity
#[tokio::test]
async fn test_gateway_accepts_valid_token_and_sends_ready() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let token = app.issue_token("u1").await;

    // Act
    let mut ws = connect_ws(app.addr, &token).await.unwrap();
    let frame = recv_json(&mut ws).await;

    // Assert
    assert_eq!(frame, json!({"op": "ready", "d": {"identity": "u1"}}));
}

/// Test rejected upgrades leave no room or connection state behind
#[tokio::test]
async fn test_rejected_connection_leaves_no_state() {
    // Arrange
    let app = TestApp::new().spawn().await;

    // Act
    let _ = connect_ws(app.addr, "bogus").await.unwrap_err();

    // Assert
    assert_eq!(app.rooms.room_count(), 0);
}

// ==========================================================================
// Room Protocol Tests
// ==========================================================================

/// Test the full flow: join a room, roll the dice, receive the result
#[tokio::test]
async fn test_join_then_roll_dice_round_trip() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let token = app.issue_token("u1").await;
    let mut ws = connect_ws(app.addr, &token).await.unwrap();
    recv_json(&mut ws).await; // ready

    // Act - join
    send_json(&mut ws, json!({"op": "join_room", "d": {"room_id": "table-42"}})).await;
    let joined = recv_json(&mut ws).await;

    // Assert - the joiner hears their own entry
    assert_eq!(joined, json!({"op": "player_joined", "d": {"identity": "u1"}}));

    // Act - roll
    send_json(&mut ws, json!({"op": "roll_dice"})).await;
    let result = recv_json(&mut ws).await;

    // Assert
    assert_eq!(result["op"], "dice_result");
    assert_eq!(result["d"]["identity"], "u1");
    let value = result["d"]["value"].as_u64().unwrap();
    assert!((1..=6).contains(&value), "die face out of range: {value}");
}

/// Test existing members are notified when someone joins
#[tokio::test]
async fn test_join_notifies_existing_members() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let mut alice = connect_ws(app.addr, &app.issue_token("alice").await).await.unwrap();
    let mut bob = connect_ws(app.addr, &app.issue_token("bob").await).await.unwrap();
    recv_json(&mut alice).await; // ready
    recv_json(&mut bob).await; // ready

    send_json(&mut alice, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    recv_json(&mut alice).await; // alice's own player_joined

    // Act
    send_json(&mut bob, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;

    // Assert - both members hear bob's entry
    let heard_by_alice = recv_json(&mut alice).await;
    let heard_by_bob = recv_json(&mut bob).await;
    assert_eq!(heard_by_alice, json!({"op": "player_joined", "d": {"identity": "bob"}}));
    assert_eq!(heard_by_bob, heard_by_alice);
}

/// Test dice results reach every room member in dispatch order
#[tokio::test]
async fn test_dice_results_broadcast_in_order() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let mut alice = connect_ws(app.addr, &app.issue_token("alice").await).await.unwrap();
    let mut bob = connect_ws(app.addr, &app.issue_token("bob").await).await.unwrap();
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;

    send_json(&mut alice, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    recv_json(&mut alice).await;
    send_json(&mut bob, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;

    // Act - alice rolls three times
    for _ in 0..3 {
        send_json(&mut alice, json!({"op": "roll_dice"})).await;
    }

    // Assert - bob sees three results, all attributed to alice, in order
    let mut alice_values = Vec::new();
    let mut bob_values = Vec::new();
    for _ in 0..3 {
        let mine = recv_json(&mut alice).await;
        let theirs = recv_json(&mut bob).await;
        assert_eq!(mine["op"], "dice_result");
        assert_eq!(mine["d"]["identity"], "alice");
        alice_values.push(mine["d"]["value"].as_u64().unwrap());
        bob_values.push(theirs["d"]["value"].as_u64().unwrap());
    }
    assert_eq!(alice_values, bob_values, "members disagree on roll order");
}

/// Test rolling before joining any room yields an error frame
#[tokio::test]
async fn test_roll_before_join_yields_not_in_room() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let token = app.issue_token("u1").await;
    let mut ws = connect_ws(app.addr, &token).await.unwrap();
    recv_json(&mut ws).await;

    // Act
    send_json(&mut ws, json!({"op": "roll_dice"})).await;
    let frame = recv_json(&mut ws).await;

    // Assert
    assert_eq!(frame["op"], "error");
    assert_eq!(frame["d"]["kind"], "not_in_room");

    // The connection survives the error; a join still works
    send_json(&mut ws, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    let joined = recv_json(&mut ws).await;
    assert_eq!(joined["op"], "player_joined");
}

/// Test joining the same room twice produces a single notification
#[tokio::test]
async fn test_rejoining_same_room_is_idempotent() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let token = app.issue_token("u1").await;
    let mut ws = connect_ws(app.addr, &token).await.unwrap();
    recv_json(&mut ws).await;

    send_json(&mut ws, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    recv_json(&mut ws).await;

    // Act - join again, then roll to prove the stream has no stray frames
    send_json(&mut ws, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    send_json(&mut ws, json!({"op": "roll_dice"})).await;
    let frame = recv_json(&mut ws).await;

    // Assert - next frame is the roll result, not a second join notification
    assert_eq!(frame["op"], "dice_result");
    assert_eq!(app.rooms.member_count("table-1"), 1);
}

/// Test joining another room moves the member silently
#[tokio::test]
async fn test_switching_rooms_moves_membership() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let mut alice = connect_ws(app.addr, &app.issue_token("alice").await).await.unwrap();
    let mut bob = connect_ws(app.addr, &app.issue_token("bob").await).await.unwrap();
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;

    send_json(&mut alice, json!({"op": "join_room", "d": {"room_id": "red"}})).await;
    recv_json(&mut alice).await;
    send_json(&mut bob, json!({"op": "join_room", "d": {"room_id": "red"}})).await;
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;

    // Act - bob moves to another room
    send_json(&mut bob, json!({"op": "join_room", "d": {"room_id": "blue"}})).await;
    recv_json(&mut bob).await; // bob's entry into blue

    wait_until(|| app.rooms.member_count("red") == 1, "red room to shrink").await;

    // Assert - alice saw no frame about the departure; her next frame is her
    // own roll result
    send_json(&mut alice, json!({"op": "roll_dice"})).await;
    let frame = recv_json(&mut alice).await;
    assert_eq!(frame["op"], "dice_result");
    assert_eq!(app.rooms.member_count("blue"), 1);
}

/// Test rolls do not leak into other rooms
#[tokio::test]
async fn test_rolls_stay_within_the_room() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let mut alice = connect_ws(app.addr, &app.issue_token("alice").await).await.unwrap();
    let mut bob = connect_ws(app.addr, &app.issue_token("bob").await).await.unwrap();
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;

    send_json(&mut alice, json!({"op": "join_room", "d": {"room_id": "red"}})).await;
    recv_json(&mut alice).await;
    send_json(&mut bob, json!({"op": "join_room", "d": {"room_id": "blue"}})).await;
    recv_json(&mut bob).await;

    // Act - alice rolls in red, then bob rolls in blue
    send_json(&mut alice, json!({"op": "roll_dice"})).await;
    recv_json(&mut alice).await;
    send_json(&mut bob, json!({"op": "roll_dice"})).await;

    // Assert - bob's first frame after joining is his own result, never
    // alice's
    let frame = recv_json(&mut bob).await;
    assert_eq!(frame["d"]["identity"], "bob");
}

// ==========================================================================
// Disconnect Tests
// ==========================================================================

/// Test closing the socket removes the member from their room
#[tokio::test]
async fn test_disconnect_removes_membership() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let mut alice = connect_ws(app.addr, &app.issue_token("alice").await).await.unwrap();
    let mut bob = connect_ws(app.addr, &app.issue_token("bob").await).await.unwrap();
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;

    send_json(&mut alice, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    recv_json(&mut alice).await;
    send_json(&mut bob, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;

    // Act
    drop(bob);
    wait_until(|| app.rooms.member_count("table-1") == 1, "membership cleanup").await;

    // Assert - alice's room still works
    send_json(&mut alice, json!({"op": "roll_dice"})).await;
    let frame = recv_json(&mut alice).await;
    assert_eq!(frame["op"], "dice_result");
}

/// Test the last member leaving dissolves the room
#[tokio::test]
async fn test_last_disconnect_drops_the_room() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let token = app.issue_token("u1").await;
    let mut ws = connect_ws(app.addr, &token).await.unwrap();
    recv_json(&mut ws).await;

    send_json(&mut ws, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    recv_json(&mut ws).await;
    assert_eq!(app.rooms.room_count(), 1);

    // Act
    drop(ws);

    // Assert
    wait_until(|| app.rooms.room_count() == 0, "room teardown").await;
}

/// Test a token stays valid for further connections after a disconnect
#[tokio::test]
async fn test_token_survives_disconnect() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let token = app.issue_token("u1").await;
    let ws = connect_ws(app.addr, &token).await.unwrap();
    drop(ws);

    // Act - same token, new connection
    let mut ws = connect_ws(app.addr, &token).await.unwrap();
    let frame = recv_json(&mut ws).await;

    // Assert
    assert_eq!(frame["d"]["identity"], "u1");
}

/// Test one identity can hold several live connections
#[tokio::test]
async fn test_same_identity_on_two_connections() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let phone = app.issue_token("u1").await;
    let tablet = app.issue_token("u1").await;
    let mut first = connect_ws(app.addr, &phone).await.unwrap();
    let mut second = connect_ws(app.addr, &tablet).await.unwrap();
    recv_json(&mut first).await;
    recv_json(&mut second).await;

    // Act - both join the same room
    send_json(&mut first, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    recv_json(&mut first).await;
    send_json(&mut second, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    recv_json(&mut first).await;
    recv_json(&mut second).await;

    // Assert - two distinct members despite the shared identity
    assert_eq!(app.rooms.member_count("table-1"), 2);
}

/// Test malformed frames yield a scoped error without dropping the connection
#[tokio::test]
async fn test_malformed_frames_yield_error_without_disconnect() {
    // Arrange
    let app = TestApp::new().spawn().await;
    let token = app.issue_token("u1").await;
    let mut ws = connect_ws(app.addr, &token).await.unwrap();
    recv_json(&mut ws).await;

    send_json(&mut ws, json!({"op": "join_room", "d": {"room_id": "table-1"}})).await;
    recv_json(&mut ws).await;

    // Act - garbage, then a real roll
    send_json(&mut ws, json!({"op": "shuffle_deck"})).await;
    send_json(&mut ws, json!({"not": "a frame"})).await;
    send_json(&mut ws, json!({"op": "roll_dice"})).await;

    // Assert - one error per bad frame, then the roll result
    for _ in 0..2 {
        let frame = recv_json(&mut ws).await;
        assert_eq!(frame["op"], "error");
        assert_eq!(frame["d"]["kind"], "validation");
    }
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["op"], "dice_result");
}
