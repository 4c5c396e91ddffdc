//! src/platforms/twitch/client.rs

use std::io;

use tokio::io::{split, AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tokio_native_tls::native_tls;
use tokio_native_tls::TlsConnector;
use tracing::{debug, error, info};

const IRC_HOST: &str = "irc.chat.twitch.tv";
const IRC_PORT: u16 = 6697;

/// Minimal representation of a parsed IRC line from Twitch.
#[derive(Debug, Clone)]
pub struct ParsedIrcMsg {
    pub tags: Option<String>,
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
    pub trailing: Option<String>,
}

fn take_word(s: &str) -> (&str, &str) {
    match s.find(' ') {
        Some(idx) => (&s[..idx], s[idx + 1..].trim_start()),
        None => (s, ""),
    }
}

impl ParsedIrcMsg {
    pub fn parse(line: &str) -> Self {
        let mut rest = line.trim();
        let mut tags = None;
        let mut prefix = None;

        if let Some(stripped) = rest.strip_prefix('@') {
            let (word, after) = take_word(stripped);
            tags = Some(word.to_string());
            rest = after;
        }
        if let Some(stripped) = rest.strip_prefix(':') {
            let (word, after) = take_word(stripped);
            prefix = Some(word.to_string());
            rest = after;
        }

        let (command, rest) = take_word(rest);

        let (params, trailing) = if let Some(stripped) = rest.strip_prefix(':') {
            (Vec::new(), Some(stripped.to_string()))
        } else if let Some((before, trail)) = rest.split_once(" :") {
            (
                before.split_whitespace().map(str::to_string).collect(),
                Some(trail.to_string()),
            )
        } else {
            (rest.split_whitespace().map(str::to_string).collect(), None)
        };

        Self {
            tags,
            prefix,
            command: command.to_uppercase(),
            params,
            trailing,
        }
    }

    /// Preferred author identity for a PRIVMSG: the display-name tag when
    /// present, else the nick part of the prefix.
    pub fn author(&self) -> Option<String> {
        if let Some(tags) = &self.tags {
            if let Some(dn) = extract_tag_value(tags, "display-name") {
                if !dn.is_empty() {
                    return Some(dn);
                }
            }
        }
        let prefix = self.prefix.as_deref()?;
        let nick = prefix.split('!').next()?;
        if nick.is_empty() {
            None
        } else {
            Some(nick.to_string())
        }
    }
}

/// A PRIVMSG surfaced by the read loop.
#[derive(Debug, Clone)]
pub struct IrcChatMessage {
    pub channel: String,
    pub author: String,
    pub text: String,
}

/// Low-level IRC client that connects to Twitch chat via TLS.
pub struct TwitchIrcClient {
    /// For sending raw lines out:
    raw_outgoing: mpsc::UnboundedSender<String>,

    /// Incoming chat messages; the runtime `take()`s this for its read loop.
    pub incoming: Option<mpsc::UnboundedReceiver<IrcChatMessage>>,

    read_task: JoinHandle<()>,
    write_task: JoinHandle<()>,
}

impl TwitchIrcClient {
    /// Connects with TLS, sends PASS/NICK/CAP, and spawns the read/write
    /// tasks. The token may be given with or without the "oauth:" prefix.
    pub async fn connect(nick: &str, oauth_token: &str) -> io::Result<Self> {
        let tcp = TcpStream::connect((IRC_HOST, IRC_PORT))
            .await
            .map_err(|e| io::Error::other(format!("TCP connect error: {e}")))?;

        let native_connector = native_tls::TlsConnector::new()
            .map_err(|e| io::Error::other(format!("TlsConnector::new() => {e}")))?;
        let connector = TlsConnector::from(native_connector);
        let tls_stream = connector
            .connect(IRC_HOST, tcp)
            .await
            .map_err(|e| io::Error::other(format!("TLS connect() => {e}")))?;

        let (read_half, write_half) = split(tls_stream);

        let (tx_outgoing, rx_outgoing) = mpsc::unbounded_channel::<String>();
        let (tx_incoming, rx_incoming) = mpsc::unbounded_channel::<IrcChatMessage>();

        let write_task = tokio::spawn(Self::writer_loop(write_half, rx_outgoing));

        let pass = if oauth_token.starts_with("oauth:") {
            oauth_token.to_string()
        } else {
            format!("oauth:{oauth_token}")
        };
        tx_outgoing.send(format!("PASS {pass}")).ok();
        tx_outgoing.send(format!("NICK {nick}")).ok();
        tx_outgoing
            .send("CAP REQ :twitch.tv/commands twitch.tv/tags".to_string())
            .ok();

        let read_task = tokio::spawn(Self::reader_loop(
            read_half,
            tx_incoming,
            tx_outgoing.clone(),
        ));

        Ok(Self {
            raw_outgoing: tx_outgoing,
            incoming: Some(rx_incoming),
            read_task,
            write_task,
        })
    }

    async fn reader_loop<R>(
        read_half: R,
        tx_incoming: mpsc::UnboundedSender<IrcChatMessage>,
        tx_outgoing: mpsc::UnboundedSender<String>,
    ) where
        R: tokio::io::AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(read_half);
        let mut line_buffer = String::new();

        loop {
            line_buffer.clear();
            match reader.read_line(&mut line_buffer).await {
                Ok(0) => {
                    info!("(TwitchIrcClient) read_loop => EOF");
                    break;
                }
                Ok(_) => {
                    let line = line_buffer.trim_end();
                    if line.is_empty() {
                        continue;
                    }
                    debug!("<< {}", line);

                    let parsed = ParsedIrcMsg::parse(line);
                    match parsed.command.as_str() {
                        "PING" => {
                            let payload = parsed.trailing.unwrap_or_default();
                            tx_outgoing.send(format!("PONG :{payload}")).ok();
                            debug!("Auto PONG -> {}", payload);
                        }
                        "PRIVMSG" => {
                            let channel =
                                parsed.params.first().cloned().unwrap_or_default();
                            let author = parsed.author().unwrap_or_default();
                            let text = parsed.trailing.clone().unwrap_or_default();
                            let _ = tx_incoming.send(IrcChatMessage {
                                channel,
                                author,
                                text,
                            });
                        }
                        other => {
                            debug!("(TwitchIrcClient) ignoring {} line", other);
                        }
                    }
                }
                Err(e) => {
                    error!("(TwitchIrcClient) read error => {:?}", e);
                    break;
                }
            }
        }

        info!("(TwitchIrcClient) reader_loop ended.");
    }

    async fn writer_loop<W>(mut write_half: W, mut rx_outgoing: mpsc::UnboundedReceiver<String>)
    where
        W: tokio::io::AsyncWrite + Unpin,
    {
        let mut writer = BufWriter::new(&mut write_half);

        while let Some(line) = rx_outgoing.recv().await {
            debug!(">> {}", line);
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                error!("writer error => {:?}", e);
                break;
            }
            if let Err(e) = writer.write_all(b"\r\n").await {
                error!("writer error => {:?}", e);
                break;
            }
            if let Err(e) = writer.flush().await {
                error!("writer flush error => {:?}", e);
                break;
            }
        }

        info!("(TwitchIrcClient) writer_loop ended.");
    }

    pub fn send_raw_line(&self, line: &str) {
        let _ = self.raw_outgoing.send(line.to_string());
    }

    /// Joins a channel. Twitch wants the lowercased "#name" form, so a bare
    /// configured name is normalized here.
    pub fn join_channel(&self, channel: &str) {
        let name = channel.trim().trim_start_matches('#').to_lowercase();
        self.send_raw_line(&format!("JOIN #{name}"));
    }

    /// Aborts the read/write tasks.
    pub fn shutdown(self) {
        self.read_task.abort();
        self.write_task.abort();
    }
}

/// Helper to extract `key=value` from a tag string like `@badge-info=;user-id=1234;...`
fn extract_tag_value(tag_str: &str, key: &str) -> Option<String> {
    for kv in tag_str.trim_start_matches('@').split(';') {
        let mut parts = kv.splitn(2, '=');
        let left = parts.next().unwrap_or("");
        let right = parts.next().unwrap_or("");
        if left == key {
            return Some(right.to_string());
        }
    }
    None
}
