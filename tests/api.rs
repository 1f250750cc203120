use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use bbc_casino::config::Config;
use bbc_casino::http::{router, AppState};
use bbc_casino::money::{Bbc, Coins};
use bbc_casino::store::Store;

struct TestApp {
    router: Router,
    state: AppState,
}

fn app() -> TestApp {
    let store = Arc::new(Store::new());
    store.seed_demo_accounts().unwrap();
    let config = Config { token_key: [9; 32], ..Config::default() };
    let state = AppState::new(store, &config);
    TestApp { router: router(state.clone(), &config), state }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    /// Log in and return `(token, user id)`.
    async fn login(&self, username: &str, password: &str) -> (String, u64) {
        let (status, body) = self
            .post("/api/auth/login", None, json!({ "username": username, "password": password }))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        (body["token"].as_str().unwrap().to_owned(), body["id"].as_u64().unwrap())
    }

    async fn coins(&self, token: &str) -> Coins {
        let (_, me) = self.get("/api/auth/me", Some(token)).await;
        me["coinBalance"].as_str().unwrap().parse().unwrap()
    }
}

fn coins(s: &str) -> Coins {
    s.parse().unwrap()
}

fn message(body: &Value) -> &str {
    body["message"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn health_check() {
    let app = app();
    let (status, body) = app.get("/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn register_login_and_logout() {
    let app = app();
    let (status, body) = app
        .post("/api/auth/register", None, json!({ "username": "maria", "password": "secret1" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "maria");

    let (status, body) = app
        .post("/api/auth/register", None, json!({ "username": "maria", "password": "secret2" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "Username already exists");

    let (status, body) = app.post("/api/auth/register", None, json!({ "username": "", "password": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "Invalid registration data");

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "username": "maria", "password": "wrong!" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(message(&body), "Invalid credentials");

    let (token, _) = app.login("maria", "secret1").await;
    let (status, me) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "maria");
    assert_eq!(me["coinBalance"], "0.00");
    assert_eq!(me["bbcBalance"], "0.00000000");
    assert_eq!(me["isAdmin"], false);

    let (status, _) = app.post("/api/auth/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn requests_need_a_valid_token() {
    let app = app();
    let (status, body) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(message(&body), "Authentication required");

    let (status, _) = app.get("/api/auth/me", Some("not.a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_bodies_and_unknown_routes_get_json_errors() {
    let app = app();
    let req = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(message(&body).starts_with("Invalid request body"));

    let (status, body) = app.get("/api/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message(&body), "Not found");
}

#[tokio::test]
async fn wrong_methods_get_json_errors() {
    let app = app();
    let (status, body) = app.get("/api/auth/login", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(message(&body), "Method not allowed");

    let (status, body) = app.post("/api/auth/me", None, json!({})).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(message(&body), "Method not allowed");

    let (status, body) = app.send(Method::DELETE, "/api/deposits", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(message(&body), "Method not allowed");
}

#[tokio::test]
async fn unknown_usernames_fail_like_wrong_passwords() {
    let app = app();
    let (status, unknown) = app
        .post("/api/auth/login", None, json!({ "username": "nobody", "password": "password123" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, wrong) = app
        .post("/api/auth/login", None, json!({ "username": "player1", "password": "password124" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);
    assert_eq!(message(&unknown), "Invalid credentials");
}

#[tokio::test]
async fn players_only_see_their_own_account() {
    let app = app();
    let (player, player_id) = app.login("player1", "password123").await;
    app.post("/api/auth/register", None, json!({ "username": "maria", "password": "secret1" }))
        .await;
    let (maria, _) = app.login("maria", "secret1").await;

    let (status, body) = app.get(&format!("/api/user/{player_id}"), Some(&player)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coinBalance"], "12450.75");

    let (status, body) = app.get(&format!("/api/user/{player_id}"), Some(&maria)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(message(&body), "Access denied");

    let (admin, _) = app.login("admin", "admin1234").await;
    let (status, _) = app.get(&format!("/api/user/{player_id}/game-history"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get("/api/user/999", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message(&body), "User not found");
}

#[tokio::test]
async fn players_cannot_act_for_other_accounts() {
    let app = app();
    let (_, player_id) = app.login("player1", "password123").await;
    app.post("/api/auth/register", None, json!({ "username": "maria", "password": "secret1" }))
        .await;
    let (maria, _) = app.login("maria", "secret1").await;
    let (admin, _) = app.login("admin", "admin1234").await;

    let requests = [
        ("/api/deposits", json!({ "userId": player_id, "amount": "50", "paymentMethod": "GCash" })),
        (
            "/api/withdrawals",
            json!({
                "userId": player_id,
                "amount": "50",
                "withdrawalMethod": "GCash",
                "accountDetails": "0917 000 0000",
            }),
        ),
        ("/api/mining/mine", json!({ "userId": player_id })),
        (
            "/api/games/play",
            json!({ "userId": player_id, "gameType": "Luck and Roll", "betAmount": "10.00", "winAmount": "0" }),
        ),
    ];
    for (uri, body) in &requests {
        let (status, resp) = app.post(uri, Some(&maria), body.clone()).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}: {resp}");
        assert_eq!(message(&resp), "Access denied");
    }
    let (status, me) = app.get(&format!("/api/user/{player_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["coinBalance"], "12450.75");
    assert_eq!(me["bbcBalance"], "2.35000000");

    for (uri, body) in requests {
        let (status, resp) = app.post(uri, Some(&admin), body).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {resp}");
        if let Some(user_id) = resp.get("userId") {
            assert_eq!(user_id, player_id);
        }
    }
    let (_, me) = app.get(&format!("/api/user/{player_id}"), Some(&admin)).await;
    // Withdrawal of 50 held and a lost 10.00 bet; the deposit is still pending.
    assert_eq!(me["coinBalance"], "12390.75");
}

#[tokio::test]
async fn converting_between_coins_and_bbc() {
    let app = app();
    let (token, id) = app.login("player1", "password123").await;
    let uri = format!("/api/user/{id}/convert");

    let (status, body) = app.post(&uri, Some(&token), json!({ "type": "toCoins", "amount": "1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coinBalance"], "17450.75");
    assert_eq!(body["bbcBalance"], "1.35000000");

    let (status, body) = app.post(&uri, Some(&token), json!({ "type": "toBBC", "amount": 0.5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coinBalance"], "14950.75");
    assert_eq!(body["bbcBalance"], "1.85000000");

    let (status, body) = app.post(&uri, Some(&token), json!({ "type": "toBBC", "amount": "100" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "Insufficient coins");

    let (status, body) = app.post(&uri, Some(&token), json!({ "type": "toCoins", "amount": "2" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "Insufficient BBC tokens");

    let (status, _) = app.post(&uri, Some(&token), json!({ "type": "sideways", "amount": "1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reported_results_are_bounded() {
    let app = app();
    let (token, id) = app.login("player1", "password123").await;

    let play = |bet: &str, win: &str| {
        json!({ "userId": id, "gameType": "Luck and Roll", "betAmount": bet, "winAmount": win, "result": "1.5x" })
    };

    let (status, body) = app.post("/api/games/play", Some(&token), play("10.00", "15.00")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gameType"], "Luck and Roll");
    assert_eq!(body["winAmount"], "15.00");
    assert_eq!(app.coins(&token).await, coins("12455.75"));

    let (status, body) = app.post("/api/games/play", Some(&token), play("10.00", "101.00")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "Implausible game result");

    let (status, body) = app.post("/api/games/play", Some(&token), play("3.00", "0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "Invalid bet amount");

    let (status, _) = app
        .post("/api/games/play", Some(&token), json!({ "gameType": "Poker", "betAmount": "1.00" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.coins(&token).await, coins("12455.75"));

    let (status, wins) = app.get("/api/games/recent-wins", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wins.as_array().unwrap().len(), 1);
    assert_eq!(wins[0]["username"], "player1");
}

#[tokio::test]
async fn server_rolled_games_settle_against_the_balance() {
    let app = app();
    let (token, id) = app.login("player1", "password123").await;

    let mut expected = coins("12450.75");
    let rounds = [
        ("/api/games/luck-and-roll", json!({ "betAmount": "1.00" }), "Luck and Roll"),
        ("/api/games/paldo", json!({ "betAmount": "0.25" }), "Paldo!"),
        ("/api/games/flip-jonathan", json!({ "betAmount": "2.00", "calls": ["heads", "tails"] }), "Flip it Jonathan!"),
        ("/api/games/ipis-sipi", json!({ "betAmount": "5.00", "steps": 3 }), "Ipis Sipi"),
        ("/api/games/blow-joy-balloon", json!({ "betAmount": "10.00", "cashOutAt": "1.50" }), "Blow Joy Balloon"),
    ];
    for (uri, body, title) in rounds {
        let (status, rolled) = app.post(uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {rolled}");
        assert_eq!(rolled["result"]["gameType"], title);
        assert!(rolled["outcome"]["game"].is_string());

        let bet: Coins = rolled["result"]["betAmount"].as_str().unwrap().parse().unwrap();
        let win: Coins = rolled["result"]["winAmount"].as_str().unwrap().parse().unwrap();
        expected = expected.checked_sub(bet).unwrap().checked_add(win).unwrap();
        assert_eq!(rolled["coinBalance"].as_str().unwrap().parse::<Coins>().unwrap(), expected);
    }
    assert_eq!(app.coins(&token).await, expected);
    let (_, history) = app.get(&format!("/api/user/{id}/game-history"), Some(&token)).await;
    assert_eq!(history.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn invalid_game_inputs_are_rejected() {
    let app = app();
    let (token, _) = app.login("player1", "password123").await;
    let calls: Vec<&str> = vec!["heads"; 11];

    let cases = [
        ("/api/games/luck-and-roll", json!({ "betAmount": "0.30" })),
        ("/api/games/flip-jonathan", json!({ "betAmount": "1.00", "calls": calls })),
        ("/api/games/flip-jonathan", json!({ "betAmount": "1.00", "calls": [] })),
        ("/api/games/ipis-sipi", json!({ "betAmount": "1.00", "steps": 0 })),
        ("/api/games/ipis-sipi", json!({ "betAmount": "1.00", "steps": 10 })),
        ("/api/games/blow-joy-balloon", json!({ "betAmount": "1.00", "cashOutAt": "1.00" })),
        ("/api/games/blow-joy-balloon", json!({ "betAmount": "1.00", "cashOutAt": "50.01" })),
    ];
    for (uri, body) in cases {
        let (status, resp) = app.post(uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}: {resp}");
    }
    assert_eq!(app.coins(&token).await, coins("12450.75"));

    let (admin, _) = app.login("admin", "admin1234").await;
    let (status, _) = app.post("/api/games/paldo", Some(&admin), json!({ "betAmount": "1.00" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deposits_are_credited_once_on_approval() {
    let app = app();
    let (player, player_id) = app.login("player1", "password123").await;
    let (admin, _) = app.login("admin", "admin1234").await;

    let (status, deposit) = app
        .post(
            "/api/deposits",
            Some(&player),
            json!({ "userId": player_id, "amount": "500", "paymentMethod": "GCash", "receiptUrl": "receipt.png" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deposit["status"], "pending");
    assert_eq!(deposit["amount"], "500.00");
    let id = deposit["id"].as_u64().unwrap();

    let (status, _) = app.post(&format!("/api/admin/deposits/{id}/approve"), Some(&player), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, pending) = app.get("/api/admin/pending-deposits", Some(&admin)).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let (status, body) = app.post(&format!("/api/admin/deposits/{id}/approve"), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message(&body), "Deposit approved");
    let (status, _) = app.post(&format!("/api/admin/deposits/{id}/approve"), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = app.post("/api/admin/deposits/77/reject", Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.coins(&player).await, coins("12950.75"));
    let (_, deposits) = app.get(&format!("/api/user/{player_id}/deposits"), Some(&player)).await;
    assert_eq!(deposits[0]["status"], "approved");

    let (_, stats) = app.get("/api/admin/stats", Some(&admin)).await;
    assert_eq!(stats["totalUsers"], 1);
    assert_eq!(stats["totalDeposits"], "500.00");
    assert_eq!(stats["totalBbcInCirculation"], "2.35000000");
    assert_eq!(stats["activeGames"], 0);
}

#[tokio::test]
async fn rejected_withdrawals_are_refunded() {
    let app = app();
    let (player, player_id) = app.login("player1", "password123").await;
    let (admin, _) = app.login("admin", "admin1234").await;

    let request = |amount: &str| {
        json!({ "amount": amount, "withdrawalMethod": "PayMaya", "accountDetails": "0917 555 0101" })
    };
    let (status, body) = app.post("/api/withdrawals", Some(&player), request("20000")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "Insufficient balance");

    let (status, withdrawal) = app.post("/api/withdrawals", Some(&player), request("1000")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(withdrawal["userId"], player_id);
    assert_eq!(app.coins(&player).await, coins("11450.75"));

    let (_, pending) = app.get("/api/admin/pending-withdrawals", Some(&admin)).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let id = withdrawal["id"].as_u64().unwrap();
    let (status, body) = app.post(&format!("/api/admin/withdrawals/{id}/reject"), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message(&body), "Withdrawal rejected");
    assert_eq!(app.coins(&player).await, coins("12450.75"));

    let (status, _) = app.post(&format!("/api/admin/withdrawals/{id}/approve"), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn mining_pays_a_small_bbc_reward() {
    let app = app();
    let (token, id) = app.login("player1", "password123").await;

    let (status, body) = app.post("/api/mining/mine", Some(&token), json!({ "userId": id })).await;
    assert_eq!(status, StatusCode::OK);
    let mined: Bbc = body["bbcMined"].as_str().unwrap().parse().unwrap();
    assert!(mined.is_positive());
    assert!(mined <= Bbc::from_units(1_000));
    assert_eq!(body["activity"]["clicks"], 1);

    let (_, stats) = app.get(&format!("/api/user/{id}/mining-stats"), Some(&token)).await;
    assert_eq!(stats["totalClicks"], 1);
    assert_eq!(stats["totalMined"], body["bbcMined"]);
}

#[tokio::test]
async fn banning_ends_sessions_and_blocks_login() {
    let app = app();
    let (player, player_id) = app.login("player1", "password123").await;
    let (admin, admin_id) = app.login("admin", "admin1234").await;

    let (status, users) = app.get("/api/admin/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(users[0]["isBanned"], false);

    let (status, body) = app.post(&format!("/api/admin/users/{player_id}/ban"), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message(&body), "User banned");
    assert!(app.state.sessions.len() >= 1);

    let (status, _) = app.get("/api/auth/me", Some(&player)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = app
        .post("/api/auth/login", None, json!({ "username": "player1", "password": "password123" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(message(&body), "Account banned");

    let (status, _) = app.post(&format!("/api/admin/users/{admin_id}/ban"), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.post(&format!("/api/admin/users/{player_id}/unban"), Some(&admin), json!({})).await;
    app.login("player1", "password123").await;
}
