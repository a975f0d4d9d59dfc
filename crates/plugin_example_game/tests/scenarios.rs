//! End-to-end lobby scenarios for the Example Game, driven through the
//! command router the same way a chat transport would.

use lobby_server::{
    create_router, CommandRouter, Delivery, DeliveryTarget, LobbyConfig, MemoryGateway, Phase,
    Speaker,
};
use plugin_example_game::ExampleGame;
use std::sync::Arc;

const CHANNEL: &str = "#test";

struct Harness {
    router: CommandRouter,
    gateway: Arc<MemoryGateway>,
    game: ExampleGame,
}

impl Harness {
    fn new() -> Self {
        let game = ExampleGame::new();
        let gateway = Arc::new(MemoryGateway::new());
        let mut config = LobbyConfig::with_channels([CHANNEL]);
        config.moderators.insert("test1".to_string());

        let router = create_router(config, game.descriptor().unwrap(), gateway.clone()).unwrap();
        Self {
            router,
            gateway,
            game,
        }
    }

    async fn say(&self, nick: &str, text: &str) -> Vec<Delivery> {
        self.router
            .dispatch_text(Speaker::new(nick), Some(CHANNEL.to_string()), text)
            .await
            .unwrap()
    }

    async fn whisper(&self, nick: &str, text: &str) -> Vec<Delivery> {
        self.router
            .dispatch_text(Speaker::new(nick), None, text)
            .await
            .unwrap()
    }

    async fn join(&self, nick: &str) -> Vec<Delivery> {
        self.gateway.enter(CHANNEL, nick);
        self.say(nick, "!join").await
    }
}

fn texts(deliveries: &[Delivery]) -> Vec<String> {
    deliveries.iter().map(|d| d.text.clone()).collect()
}

#[tokio::test]
async fn scenario_a_single_player_joins() {
    let h = Harness::new();

    let out = h.join("test1").await;
    assert_eq!(texts(&out), vec!["test1 has joined the game (1/3)"]);
    assert_eq!(out[0].target, DeliveryTarget::Channel(CHANNEL.to_string()));
    assert!(h.gateway.is_voiced(CHANNEL, "test1"));
}

#[tokio::test]
async fn scenario_b_status_after_start() {
    let h = Harness::new();
    h.join("test1").await;
    h.join("test2").await;

    let out = h.say("test1", "!start").await;
    assert_eq!(texts(&out), vec!["Example Game has started! Players: test1, test2"]);
    assert_eq!(h.game.games_started(), 1);
    assert!(h.gateway.is_moderated(CHANNEL));

    for nick in ["test1", "test2"] {
        let out = h.say(nick, "!status").await;
        assert_eq!(texts(&out), vec!["Game started with players test1, test2"]);
    }
    assert_eq!(texts(&h.say("test1", "!who").await), vec!["[test1, test2]"]);
}

#[tokio::test]
async fn scenario_c_join_then_leave() {
    let h = Harness::new();
    h.join("test1").await;

    let out = h.say("test1", "!leave").await;
    assert_eq!(texts(&out), vec!["test1 has left the game (0/3)"]);

    let out = h.say("test1", "!who").await;
    assert_eq!(texts(&out), vec!["No one has joined the game yet."]);
}

#[tokio::test]
async fn scenario_d_overflow() {
    let h = Harness::new();
    for nick in ["test1", "test2", "test3"] {
        h.join(nick).await;
    }

    let out = h.join("test4").await;
    assert_eq!(
        texts(&out),
        vec!["test4: Game is already at 3 players, the maximum supported for Example Game."]
    );
    assert_eq!(h.router.manager().snapshot(CHANNEL).await.players.len(), 3);
}

#[tokio::test]
async fn scenario_e_private_join_without_channel() {
    let h = Harness::new();

    let out = h.whisper("test1", "!join").await;
    assert_eq!(out.len(), 1);
    assert!(out[0].text.contains("must specify the channel"));
    assert_eq!(out[0].target, DeliveryTarget::User("test1".to_string()));
}

#[tokio::test]
async fn scenario_f_start_below_minimum() {
    let h = Harness::new();
    h.join("test1").await;

    // Repeated attempts keep failing the same way
    h.say("test1", "!start").await;
    let out = h.say("test1", "!start").await;
    assert_eq!(
        texts(&out),
        vec!["test1: Need at least 2 to start a game of Example Game."]
    );
    assert_eq!(h.router.manager().snapshot(CHANNEL).await.phase, Phase::Forming);
    assert_eq!(h.game.games_started(), 0);
}

#[tokio::test]
async fn bogus_channel_is_refused_in_place() {
    let h = Harness::new();

    let out = h
        .router
        .dispatch_text(Speaker::new("test1"), Some("#bogus".to_string()), "!join")
        .await
        .unwrap();
    assert_eq!(texts(&out), vec!["test1: #bogus is not a valid channel to join"]);
}

#[tokio::test]
async fn bystander_cannot_start() {
    let h = Harness::new();
    h.join("test1").await;
    h.join("test2").await;

    let out = h.say("test3", "!start").await;
    assert_eq!(texts(&out), vec!["test3: You are not in the game."]);
}

#[tokio::test]
async fn moderators_are_configured_but_inert() {
    let h = Harness::new();
    let config = h.router.manager().config();
    assert!(config.is_moderator(&Speaker::new("test1")));
    assert!(!config.is_moderator(&Speaker::new("test2")));

    // Moderators follow the same rules as everyone else
    h.join("test1").await;
    let out = h.say("test1", "!start").await;
    assert_eq!(
        texts(&out),
        vec!["test1: Need at least 2 to start a game of Example Game."]
    );
}
