//! Line-oriented console transport.
//!
//! Stands in for a chat network so the lobby can be driven from a terminal
//! or a script. Every input line is one event:
//!
//! | Line | Meaning |
//! |------|---------|
//! | `nick #chan text` | `nick` says `text` in `#chan` |
//! | `nick * text` | `nick` says `text` by private message |
//! | `:enter nick #chan` | `nick` enters `#chan` |
//! | `:part nick #chan` | `nick` leaves `#chan` |
//!
//! A nick may carry an authenticated account as `nick/account`. Output lines
//! are `[#chan] text` for channel messages and `[-> nick] text` for private
//! replies.

use crate::signals::ShutdownState;
use lobby_server::{CommandRouter, Delivery, DeliveryTarget, LobbyError, MemoryGateway, Speaker};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// One parsed console input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    Say {
        speaker: Speaker,
        channel: Option<String>,
        text: String,
    },
    Enter {
        speaker: Speaker,
        channel: String,
    },
    Part {
        speaker: Speaker,
        channel: String,
    },
    Blank,
}

fn parse_speaker(token: &str) -> Result<Speaker, String> {
    let (nick, account) = match token.split_once('/') {
        Some((nick, account)) => (nick, Some(account)),
        None => (token, None),
    };
    if nick.is_empty() {
        return Err(format!("Missing nick in {token:?}"));
    }
    Ok(match account.filter(|a| !a.is_empty()) {
        Some(account) => Speaker::authenticated(nick, account),
        None => Speaker::new(nick),
    })
}

fn parse_channel(token: &str) -> Result<String, String> {
    if token.starts_with('#') && token.len() > 1 {
        Ok(token.to_string())
    } else {
        Err(format!("Expected a channel, got {token:?}"))
    }
}

/// Splits off the leading token, returning it with the trimmed remainder.
fn split_token(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (input, ""),
    }
}

/// Parses one console input line. Runs of whitespace separate tokens.
pub fn parse_line(line: &str) -> Result<ConsoleLine, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ConsoleLine::Blank);
    }

    let (first, rest) = split_token(line);
    let (second, rest) = split_token(rest);

    match first {
        ":enter" | ":part" => {
            let speaker = parse_speaker(second)?;
            let channel = parse_channel(rest)?;
            Ok(if first == ":enter" {
                ConsoleLine::Enter { speaker, channel }
            } else {
                ConsoleLine::Part { speaker, channel }
            })
        }
        _ if first.starts_with(':') => Err(format!("Unknown directive {first:?}")),
        _ => {
            let speaker = parse_speaker(first)?;
            let channel = match second {
                "*" => None,
                other => Some(parse_channel(other)?),
            };
            Ok(ConsoleLine::Say {
                speaker,
                channel,
                text: rest.to_string(),
            })
        }
    }
}

/// Renders a delivery as a console output line.
pub fn format_delivery(delivery: &Delivery) -> String {
    match &delivery.target {
        DeliveryTarget::Channel(channel) => format!("[{channel}] {}", delivery.text),
        DeliveryTarget::User(nick) => format!("[-> {nick}] {}", delivery.text),
    }
}

/// Console transport bound to a router and the gateway it reports presence to.
#[derive(Debug, Clone)]
pub struct ConsoleTransport {
    router: CommandRouter,
    gateway: Arc<MemoryGateway>,
    shutdown: ShutdownState,
}

impl ConsoleTransport {
    pub fn new(router: CommandRouter, gateway: Arc<MemoryGateway>, shutdown: ShutdownState) -> Self {
        Self {
            router,
            gateway,
            shutdown,
        }
    }

    /// Applies one parsed line and returns what should be printed.
    pub async fn handle(&self, line: ConsoleLine) -> Result<Vec<Delivery>, LobbyError> {
        match line {
            ConsoleLine::Blank => Ok(Vec::new()),
            ConsoleLine::Say {
                speaker,
                channel,
                text,
            } => self.router.dispatch_text(speaker, channel, &text).await,
            ConsoleLine::Enter { speaker, channel } => {
                debug!("👋 {} entered {}", speaker.nick, channel);
                self.gateway.enter(&channel, &speaker.nick);
                Ok(Vec::new())
            }
            ConsoleLine::Part { speaker, channel } => {
                if !self.gateway.part(&channel, &speaker.nick) {
                    debug!("{} was not in {}", speaker.nick, channel);
                    return Ok(Vec::new());
                }
                debug!("🚪 {} left {}", speaker.nick, channel);
                self.router.departed(&channel, &speaker).await
            }
        }
    }

    /// Reads lines until end of input or shutdown, writing replies as they
    /// are produced.
    ///
    /// Malformed lines and failed commands are logged and skipped.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut processed = 0u64;

        while !self.shutdown.is_shutdown_initiated() {
            let Some(raw) = lines.next_line().await? else {
                info!("📭 Console input closed after {} lines", processed);
                break;
            };
            processed += 1;

            let line = match parse_line(&raw) {
                Ok(line) => line,
                Err(e) => {
                    warn!("⚠️ Ignoring console line {}: {}", processed, e);
                    continue;
                }
            };

            match self.handle(line).await {
                Ok(deliveries) => {
                    for delivery in &deliveries {
                        writer.write_all(format_delivery(delivery).as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                    }
                    writer.flush().await?;
                }
                Err(e) => warn!("⚠️ Dropped console line {} after lobby failure: {}", processed, e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobby_server::{create_router, GameDescriptor, LobbyConfig};
    use tokio::io::BufReader;

    #[test]
    fn test_parse_say_lines() {
        assert_eq!(
            parse_line("test1 #test !join").unwrap(),
            ConsoleLine::Say {
                speaker: Speaker::new("test1"),
                channel: Some("#test".to_string()),
                text: "!join".to_string(),
            }
        );
        assert_eq!(
            parse_line("  alice/acct *   !join #test  ").unwrap(),
            ConsoleLine::Say {
                speaker: Speaker::authenticated("alice", "acct"),
                channel: None,
                text: "!join #test".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_directives() {
        assert_eq!(
            parse_line(":enter test1 #test").unwrap(),
            ConsoleLine::Enter {
                speaker: Speaker::new("test1"),
                channel: "#test".to_string(),
            }
        );
        assert_eq!(
            parse_line(":part bob/ #test").unwrap(),
            ConsoleLine::Part {
                speaker: Speaker::new("bob"),
                channel: "#test".to_string(),
            }
        );
        assert_eq!(parse_line("   ").unwrap(), ConsoleLine::Blank);
    }

    #[test]
    fn test_parse_tolerates_repeated_whitespace() {
        assert_eq!(
            parse_line("test1  #test \t !join  #test").unwrap(),
            ConsoleLine::Say {
                speaker: Speaker::new("test1"),
                channel: Some("#test".to_string()),
                text: "!join  #test".to_string(),
            }
        );
        assert_eq!(
            parse_line(":enter  test1   #test").unwrap(),
            ConsoleLine::Enter {
                speaker: Speaker::new("test1"),
                channel: "#test".to_string(),
            }
        );
        assert_eq!(
            parse_line("test1 *").unwrap(),
            ConsoleLine::Say {
                speaker: Speaker::new("test1"),
                channel: None,
                text: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line(":kick test1 #test").is_err());
        assert!(parse_line(":enter test1 test").is_err());
        assert!(parse_line("test1 test !join").is_err());
        assert!(parse_line("/acct #test !join").is_err());
    }

    #[test]
    fn test_format_delivery() {
        let channel = Delivery {
            target: DeliveryTarget::Channel("#test".to_string()),
            text: "test1 has joined the game (1/3)".to_string(),
        };
        let private = Delivery {
            target: DeliveryTarget::User("test1".to_string()),
            text: "You must specify the channel.".to_string(),
        };
        assert_eq!(format_delivery(&channel), "[#test] test1 has joined the game (1/3)");
        assert_eq!(format_delivery(&private), "[-> test1] You must specify the channel.");
    }

    #[tokio::test]
    async fn test_console_session() {
        let gateway = Arc::new(MemoryGateway::new());
        let router = create_router(
            LobbyConfig::with_channels(["#test"]),
            GameDescriptor::new("Example Game", 2, 3).unwrap(),
            gateway.clone(),
        )
        .unwrap();
        let console = ConsoleTransport::new(router, gateway, ShutdownState::new());

        let input = "\
test1 #test !join
:enter test1 #test
test1 #test !join
garbage
:enter test2 #test
test2 * !join #test
hello there
:part test2 #test
test1 #test !who
";
        let mut output = Vec::new();
        console
            .run(BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec![
                "[#test] test1: You need to be in #test to join the game.",
                "[#test] test1 has joined the game (1/3)",
                "[#test] test2 has joined the game (2/3)",
                "[#test] test2 has left the game (1/3)",
                "[#test] test1",
            ]
        );
    }

    #[tokio::test]
    async fn test_console_stops_on_shutdown() {
        let gateway = Arc::new(MemoryGateway::new());
        let router = create_router(
            LobbyConfig::with_channels(["#test"]),
            GameDescriptor::new("Example Game", 2, 3).unwrap(),
            gateway.clone(),
        )
        .unwrap();
        let shutdown = ShutdownState::new();
        shutdown.initiate_shutdown();
        let console = ConsoleTransport::new(router, gateway, shutdown);

        let mut output = Vec::new();
        console
            .run(BufReader::new(":enter test1 #test\n".as_bytes()), &mut output)
            .await
            .unwrap();
        assert!(output.is_empty());
    }
}
