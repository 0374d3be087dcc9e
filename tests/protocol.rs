//! 端到端测试：通过内存缓冲区驱动服务循环，按行解析输出的 JSON

use serde_json::Value;
use std::io::Cursor;
use tictactoe_serial::{
    run_server, Player, ParseErrorPolicy, ProtocolHandler, RandomAI, ServerOptions,
};

fn session(input: &[&str], seed: u64) -> (Vec<Value>, ProtocolHandler) {
    let text = input.iter().map(|l| format!("{}\n", l)).collect::<String>();
    session_bytes(text.into_bytes(), seed)
}

fn session_bytes(input: Vec<u8>, seed: u64) -> (Vec<Value>, ProtocolHandler) {
    let mut handler =
        ProtocolHandler::with_strategy(Box::new(RandomAI::new(Some(seed))), ParseErrorPolicy::Silent);
    let mut out = Vec::new();
    run_server(Cursor::new(input), &mut out, &mut handler, &ServerOptions::default()).unwrap();

    let frames = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (frames, handler)
}

fn types(frames: &[Value]) -> Vec<&str> {
    frames.iter().map(|f| f["type"].as_str().unwrap()).collect()
}

fn count_cells(board: &Value, mark: &str) -> usize {
    board
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap())
        .filter(|c| c.as_str() == Some(mark))
        .count()
}

#[test]
fn test_startup_banner() {
    let (frames, _) = session(&[], 0);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["type"], "info");
    assert_eq!(frames[0]["message"], "Tic-Tac-Toe ready.");
}

#[test]
fn test_x_wins_then_moves_rejected_until_reset() {
    let (frames, handler) = session(
        &[
            r#"{"command": "MOVE", "row": 0, "col": 0}"#,
            r#"{"command": "MOVE", "row": 1, "col": 1}"#,
            r#"{"command": "MOVE", "row": 0, "col": 1}"#,
            r#"{"command": "MOVE", "row": 2, "col": 2}"#,
            r#"{"command": "MOVE", "row": 0, "col": 2}"#,
            r#"{"command": "MOVE", "row": 2, "col": 0}"#,
        ],
        0,
    );
    assert_eq!(
        types(&frames),
        vec!["info", "board", "board", "board", "board", "board", "win_status", "error"]
    );
    assert_eq!(frames[6]["message"], "Player X wins!");
    assert_eq!(frames[7]["message"], "Invalid move.");
    assert_eq!(frames[5]["board"][0], serde_json::json!(["X", "X", "X"]));
    assert!(handler.state().is_game_over());
}

#[test]
fn test_reset_twice_is_idempotent() {
    let (frames, handler) = session(
        &[
            r#"{"command": "MOVE", "row": 1, "col": 1}"#,
            r#"{"command": "RESET"}"#,
            r#"{"command": "RESET"}"#,
        ],
        0,
    );
    assert_eq!(
        types(&frames),
        vec!["info", "board", "game_status", "board", "game_status", "board"]
    );
    assert_eq!(frames[2]["message"], "Game reset.");
    assert_eq!(frames[2..4], frames[4..6]);
    assert_eq!(count_cells(&frames[5]["board"], " "), 9);
    assert_eq!(handler.state().current_player(), Player::X);
    assert!(!handler.state().is_game_over());
}

#[test]
fn test_player_vs_ai_reply() {
    let (frames, handler) = session(
        &[
            r#"{"command": "MODE", "mode": 1}"#,
            r#"{"command": "MOVE", "row": 0, "col": 0}"#,
        ],
        3,
    );
    assert_eq!(
        types(&frames),
        vec!["info", "game_mode", "game_status", "board", "board", "board"]
    );
    assert_eq!(frames[1]["message"], "Game mode set to 1");
    let last = &frames[5]["board"];
    assert_eq!(last[0][0], "X");
    assert_eq!(count_cells(last, "X"), 1);
    assert_eq!(count_cells(last, "O"), 1);
    assert_eq!(handler.state().current_player(), Player::X);
}

#[test]
fn test_ai_vs_ai_autoplay() {
    for seed in 0..20 {
        let (frames, handler) = session(&[r#"{"command": "MODE", "mode": 2}"#], seed);
        let kinds = types(&frames);
        assert_eq!(&kinds[..4], &["info", "game_mode", "game_status", "board"]);
        assert_eq!(*kinds.last().unwrap(), "win_status");
        let msg = frames.last().unwrap()["message"].as_str().unwrap();
        assert!(["Player X wins!", "Player O wins!", "It's a draw!"].contains(&msg));
        assert!(handler.state().is_game_over());
    }
}

#[test]
fn test_malformed_frames_are_silent() {
    let (frames, handler) = session(
        &[
            "{not json",
            r#"{"command": "FLY"}"#,
            r#"{"command": "MOVE", "row": 1}"#,
            r#"{"type": "board"}"#,
        ],
        0,
    );
    assert_eq!(types(&frames), vec!["info"]);
    assert_eq!(handler.dropped_frames(), 4);
    assert_eq!(handler.state().board().empty_count(), 9);
}

#[test]
fn test_invalid_mode_keeps_game() {
    let (frames, handler) = session(
        &[
            r#"{"command": "MOVE", "row": 2, "col": 2}"#,
            r#"{"command": "MODE", "mode": 5}"#,
            r#"{"command": "MOVE", "row": 0, "col": 0}"#,
        ],
        0,
    );
    assert_eq!(types(&frames), vec!["info", "board", "error", "board"]);
    assert_eq!(frames[2]["message"], "Invalid mode.");
    assert_eq!(frames[3]["board"][0][0], "O");
    assert_eq!(handler.state().current_player(), Player::X);
}

#[test]
fn test_binary_noise_is_dropped_and_session_continues() {
    let mut input = vec![0xFF, 0xFE, 0x00, 0xC3, b'\n'];
    input.extend_from_slice(b"{\"command\": \"MOVE\", \"row\": 1, \"col\": 1}\n");
    input.extend_from_slice(&[0x80, b'{', b'\r', b'\n']);
    input.extend_from_slice(b"{\"command\": \"MOVE\", \"row\": 0, \"col\": 0}\n");
    let (frames, handler) = session_bytes(input, 0);
    assert_eq!(types(&frames), vec!["info", "board", "board"]);
    assert_eq!(frames[2]["board"][1][1], "X");
    assert_eq!(frames[2]["board"][0][0], "O");
    assert_eq!(handler.dropped_frames(), 2);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let (frames, handler) = session(
        &[
            r#"{"command": "MOVE", "row": 0, "col": 0, "x": 1}"#,
            r#"{"command": "RESET", "seq": 7, "source": "gui"}"#,
            r#"{"command": "MODE", "mode": 1, "label": "User vs AI"}"#,
        ],
        0,
    );
    assert_eq!(
        types(&frames),
        vec!["info", "board", "game_status", "board", "game_mode", "game_status", "board"]
    );
    assert_eq!(frames[1]["board"][0][0], "X");
    assert_eq!(handler.dropped_frames(), 0);
}
